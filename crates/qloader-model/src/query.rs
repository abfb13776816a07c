//! Observable state of a single asynchronous fetch.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Re-triggers the fetch behind a query result.
///
/// Cloning shares the underlying callback. The default handle does nothing.
#[derive(Clone, Default)]
pub struct RefetchHandle {
    callback: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl RefetchHandle {
    /// Wrap a refetch callback.
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }

    /// A handle that does nothing when triggered.
    pub fn noop() -> Self {
        Self::default()
    }

    /// Check whether triggering this handle has no effect.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.callback.is_none()
    }

    /// Invoke the refetch callback.
    pub fn trigger(&self) {
        if let Some(callback) = &self.callback {
            callback();
        }
    }

    /// Combine handles into one that triggers each of them in order.
    pub fn all(handles: impl IntoIterator<Item = RefetchHandle>) -> Self {
        let mut active: Vec<RefetchHandle> =
            handles.into_iter().filter(|h| !h.is_noop()).collect();
        match active.len() {
            0 => Self::noop(),
            1 => active.remove(0),
            _ => Self::new(move || {
                for handle in &active {
                    handle.trigger();
                }
            }),
        }
    }
}

impl fmt::Debug for RefetchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefetchHandle")
            .field("noop", &self.is_noop())
            .finish()
    }
}

/// Primary lifecycle status of a query.
///
/// `is_fetching` is an overlay and is not part of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// Query has not started yet.
    Uninitialized,
    /// First load in flight, no data yet.
    Loading,
    /// Query holds data from a successful load.
    Success,
    /// Last fetch failed.
    Error,
}

impl QueryStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Loading => "Loading",
            Self::Success => "Success",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of one asynchronous data fetch.
///
/// The status booleans come from the query provider and are taken as-is.
/// Exactly one of `is_uninitialized`, `is_loading`, `is_success` and
/// `is_error` is expected to be set; `is_fetching` may accompany any of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    from = "QueryResultRepr<T, E>",
    bound(deserialize = "T: Deserialize<'de>, E: Deserialize<'de>")
)]
pub struct QueryResult<T, E = FetchError> {
    /// Latest payload for any argument ever used.
    pub data: Option<T>,
    /// Latest payload for the current argument.
    pub current_data: Option<T>,
    /// Error of the last failed fetch.
    pub error: Option<E>,
    /// Request identifier assigned by the provider.
    pub request_id: Option<String>,
    /// Endpoint the query belongs to.
    pub endpoint_name: Option<String>,
    /// When the current request started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the last request completed.
    pub fulfilled_at: Option<DateTime<Utc>>,

    pub is_uninitialized: bool,
    pub is_loading: bool,
    pub is_fetching: bool,
    pub is_success: bool,
    pub is_error: bool,

    /// Re-triggers the fetch.
    #[serde(skip)]
    pub refetch: RefetchHandle,
}

/// Wire shape of a snapshot. Every field is optional.
#[derive(Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de>, E: Deserialize<'de>"))]
struct QueryResultRepr<T, E> {
    data: Option<T>,
    current_data: Option<T>,
    error: Option<E>,
    request_id: Option<String>,
    endpoint_name: Option<String>,
    started_at: Option<DateTime<Utc>>,
    fulfilled_at: Option<DateTime<Utc>>,
    is_uninitialized: bool,
    is_loading: bool,
    is_fetching: bool,
    is_success: bool,
    is_error: bool,
}

impl<T, E> Default for QueryResultRepr<T, E> {
    fn default() -> Self {
        Self {
            data: None,
            current_data: None,
            error: None,
            request_id: None,
            endpoint_name: None,
            started_at: None,
            fulfilled_at: None,
            is_uninitialized: false,
            is_loading: false,
            is_fetching: false,
            is_success: false,
            is_error: false,
        }
    }
}

// A snapshot naming no primary status is an uninitialized query.
impl<T, E> From<QueryResultRepr<T, E>> for QueryResult<T, E> {
    fn from(repr: QueryResultRepr<T, E>) -> Self {
        let has_primary =
            repr.is_uninitialized || repr.is_loading || repr.is_success || repr.is_error;
        Self {
            data: repr.data,
            current_data: repr.current_data,
            error: repr.error,
            request_id: repr.request_id,
            endpoint_name: repr.endpoint_name,
            started_at: repr.started_at,
            fulfilled_at: repr.fulfilled_at,
            is_uninitialized: repr.is_uninitialized || !has_primary,
            is_loading: repr.is_loading,
            is_fetching: repr.is_fetching,
            is_success: repr.is_success,
            is_error: repr.is_error,
            refetch: RefetchHandle::noop(),
        }
    }
}

impl<T, E> Default for QueryResult<T, E> {
    fn default() -> Self {
        Self {
            data: None,
            current_data: None,
            error: None,
            request_id: None,
            endpoint_name: None,
            started_at: None,
            fulfilled_at: None,
            is_uninitialized: true,
            is_loading: false,
            is_fetching: false,
            is_success: false,
            is_error: false,
            refetch: RefetchHandle::noop(),
        }
    }
}

/// Structural equality; the refetch handle is not compared.
impl<T: PartialEq, E: PartialEq> PartialEq for QueryResult<T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
            && self.current_data == other.current_data
            && self.error == other.error
            && self.request_id == other.request_id
            && self.endpoint_name == other.endpoint_name
            && self.started_at == other.started_at
            && self.fulfilled_at == other.fulfilled_at
            && self.is_uninitialized == other.is_uninitialized
            && self.is_loading == other.is_loading
            && self.is_fetching == other.is_fetching
            && self.is_success == other.is_success
            && self.is_error == other.is_error
    }
}

impl<T, E> QueryResult<T, E> {
    /// A query that has not started.
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// A query on its first load.
    pub fn loading() -> Self {
        Self::from_status(QueryStatus::Loading, true)
    }

    /// A failed query.
    pub fn failed(error: E) -> Self {
        Self {
            error: Some(error),
            ..Self::from_status(QueryStatus::Error, false)
        }
    }

    /// A successful query holding `data` for the current argument.
    pub fn success(data: T) -> Self
    where
        T: Clone,
    {
        Self {
            current_data: Some(data.clone()),
            data: Some(data),
            ..Self::from_status(QueryStatus::Success, false)
        }
    }

    /// A payload-free result with exactly one primary flag set.
    pub fn from_status(status: QueryStatus, is_fetching: bool) -> Self {
        Self {
            is_uninitialized: status == QueryStatus::Uninitialized,
            is_loading: status == QueryStatus::Loading,
            is_success: status == QueryStatus::Success,
            is_error: status == QueryStatus::Error,
            is_fetching,
            ..Self::default()
        }
    }

    /// Set the fetching overlay.
    #[must_use]
    pub fn fetching(mut self, is_fetching: bool) -> Self {
        self.is_fetching = is_fetching;
        self
    }

    /// Attach a refetch callback.
    #[must_use]
    pub fn with_refetch(mut self, refetch: RefetchHandle) -> Self {
        self.refetch = refetch;
        self
    }

    /// Set the endpoint name.
    #[must_use]
    pub fn with_endpoint(mut self, name: impl Into<String>) -> Self {
        self.endpoint_name = Some(name.into());
        self
    }

    /// Set the payload for the current argument.
    #[must_use]
    pub fn with_current_data(mut self, current_data: Option<T>) -> Self {
        self.current_data = current_data;
        self
    }

    /// Primary status, resolved with error > loading > uninitialized > success.
    ///
    /// A result with no primary flag set reports `Uninitialized`. Aggregation
    /// treats such an input differently: it raises none of the error, loading
    /// or uninitialized conditions, so on its own it aggregates to `Success`.
    pub fn status(&self) -> QueryStatus {
        if self.is_error {
            QueryStatus::Error
        } else if self.is_loading {
            QueryStatus::Loading
        } else if self.is_uninitialized {
            QueryStatus::Uninitialized
        } else if self.is_success {
            QueryStatus::Success
        } else {
            QueryStatus::Uninitialized
        }
    }

    /// Replace both payload fields, keeping status, error, metadata and refetch.
    pub fn with_payload<U>(self, data: Option<U>, current_data: Option<U>) -> QueryResult<U, E> {
        QueryResult {
            data,
            current_data,
            error: self.error,
            request_id: self.request_id,
            endpoint_name: self.endpoint_name,
            started_at: self.started_at,
            fulfilled_at: self.fulfilled_at,
            is_uninitialized: self.is_uninitialized,
            is_loading: self.is_loading,
            is_fetching: self.is_fetching,
            is_success: self.is_success,
            is_error: self.is_error,
            refetch: self.refetch,
        }
    }

    /// Drop both payload fields.
    pub fn without_payload<U>(self) -> QueryResult<U, E> {
        self.with_payload(None, None)
    }
}
