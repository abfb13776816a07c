//! What a loader call returns.

use qloader_model::{FetchError, LoaderPhase, QueryResult, QueryStatus};

/// Payload of a loader result.
///
/// A successful aggregate carries the transform output. Any other status
/// carries the untransformed union of the query payloads, present when every
/// query still holds one (stale data from before an error, for instance).
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderValue<R, D> {
    /// Transform output of a successful aggregate.
    Transformed(R),
    /// Raw payload union of a non-successful aggregate.
    Raw(D),
}

impl<R, D> LoaderValue<R, D> {
    pub fn transformed(&self) -> Option<&R> {
        match self {
            Self::Transformed(data) => Some(data),
            Self::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&D> {
        match self {
            Self::Transformed(_) => None,
            Self::Raw(data) => Some(data),
        }
    }

    pub fn into_transformed(self) -> Option<R> {
        match self {
            Self::Transformed(data) => Some(data),
            Self::Raw(_) => None,
        }
    }
}

/// Aggregate returned by a loader, with the argument its queries ran with.
///
/// - `R`: transform output
/// - `D`: raw payload union of the queries
/// - `A`: query argument
/// - `E`: error payload
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderResult<R, D, A, E = FetchError> {
    pub query: QueryResult<LoaderValue<R, D>, E>,
    /// Argument passed to the queries, if any.
    pub original_args: Option<A>,
}

impl<R, D, A, E> LoaderResult<R, D, A, E> {
    pub fn status(&self) -> QueryStatus {
        self.query.status()
    }

    /// Transform output, present only for a successful aggregate.
    pub fn data(&self) -> Option<&R> {
        self.query.data.as_ref().and_then(LoaderValue::transformed)
    }

    /// Transform output for the current argument.
    pub fn current_data(&self) -> Option<&R> {
        self.query
            .current_data
            .as_ref()
            .and_then(LoaderValue::transformed)
    }

    /// Untransformed payload union carried by a non-successful aggregate.
    pub fn raw_data(&self) -> Option<&D> {
        self.query.data.as_ref().and_then(LoaderValue::raw)
    }

    pub fn into_data(self) -> Option<R> {
        self.query.data.and_then(LoaderValue::into_transformed)
    }

    /// Rendering decision over the transform output.
    ///
    /// Raw data never reaches `Ready`; a view only shows transformed data.
    pub fn phase(&self) -> LoaderPhase<&R, &E> {
        match self.query.phase() {
            LoaderPhase::Uninitialized => LoaderPhase::Uninitialized,
            LoaderPhase::Loading => LoaderPhase::Loading,
            LoaderPhase::Failed { error } => LoaderPhase::Failed { error },
            LoaderPhase::Ready { data, fetching } => match data {
                LoaderValue::Transformed(data) => LoaderPhase::Ready { data, fetching },
                LoaderValue::Raw(_) => LoaderPhase::Loading,
            },
        }
    }

    /// The aggregate without payload, as handed to error views.
    pub fn status_only(&self) -> QueryResult<(), E>
    where
        E: Clone,
    {
        QueryResult {
            data: None,
            current_data: None,
            error: self.query.error.clone(),
            request_id: self.query.request_id.clone(),
            endpoint_name: self.query.endpoint_name.clone(),
            started_at: self.query.started_at,
            fulfilled_at: self.query.fulfilled_at,
            is_uninitialized: self.query.is_uninitialized,
            is_loading: self.query.is_loading,
            is_fetching: self.query.is_fetching,
            is_success: self.query.is_success,
            is_error: self.query.is_error,
            refetch: self.query.refetch.clone(),
        }
    }
}
