//! Reducer for queries driven locally rather than by a query provider.
//!
//! A caller that runs its own async function can feed lifecycle events
//! through [`QueryResult::apply`] and get a result with the same flag
//! discipline a provider would report.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::query::QueryResult;

/// Lifecycle event of a locally driven query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryAction<T, E> {
    /// First request started.
    Load,
    /// Request started, possibly with data from an earlier one.
    Fetch,
    /// Request failed.
    Error { error: E },
    /// Request completed.
    Success { data: T },
}

impl<T, E> QueryResult<T, E> {
    /// Return the state after `action`.
    #[must_use]
    pub fn apply(self, action: QueryAction<T, E>) -> Self
    where
        T: Clone,
    {
        match action {
            QueryAction::Load => Self {
                is_uninitialized: false,
                is_loading: true,
                is_fetching: true,
                is_success: false,
                is_error: false,
                error: None,
                started_at: Some(Utc::now()),
                ..self
            },
            QueryAction::Fetch => {
                let has_data = self.data.is_some();
                Self {
                    is_uninitialized: false,
                    is_loading: !has_data,
                    is_fetching: true,
                    is_success: has_data,
                    is_error: false,
                    error: None,
                    started_at: Some(Utc::now()),
                    ..self
                }
            }
            QueryAction::Error { error } => Self {
                is_uninitialized: false,
                is_loading: false,
                is_fetching: false,
                is_success: false,
                is_error: true,
                error: Some(error),
                current_data: None,
                ..self
            },
            QueryAction::Success { data } => Self {
                is_uninitialized: false,
                is_loading: false,
                is_fetching: false,
                is_success: true,
                is_error: false,
                error: None,
                current_data: Some(data.clone()),
                data: Some(data),
                fulfilled_at: Some(Utc::now()),
                ..self
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::query::QueryStatus;

    type Action = QueryAction<u32, FetchError>;

    #[test]
    fn load_then_success() {
        let query = QueryResult::<u32>::uninitialized().apply(Action::Load);
        assert_eq!(query.status(), QueryStatus::Loading);
        assert!(query.is_fetching);
        assert!(query.started_at.is_some());

        let query = query.apply(Action::Success { data: 9 });
        assert_eq!(query.status(), QueryStatus::Success);
        assert!(!query.is_fetching);
        assert_eq!(query.data, Some(9));
        assert_eq!(query.current_data, Some(9));
        assert!(query.fulfilled_at.is_some());
    }

    #[test]
    fn refetch_keeps_success_while_fetching() {
        let query = QueryResult::<u32>::success(1).apply(Action::Fetch);
        assert!(query.is_success);
        assert!(query.is_fetching);
        assert!(!query.is_loading);
        assert_eq!(query.data, Some(1));
    }

    #[test]
    fn fetch_without_data_is_loading() {
        let query = QueryResult::<u32>::uninitialized().apply(Action::Fetch);
        assert_eq!(query.status(), QueryStatus::Loading);
        assert!(!query.is_uninitialized);
    }

    #[test]
    fn error_keeps_stale_data() {
        let query = QueryResult::<u32>::success(1)
            .apply(Action::Fetch)
            .apply(Action::Error {
                error: FetchError::message("down"),
            });
        assert_eq!(query.status(), QueryStatus::Error);
        assert!(!query.is_success);
        assert!(!query.is_fetching);
        assert_eq!(query.data, Some(1));
        assert_eq!(query.current_data, None);
        assert_eq!(query.error, Some(FetchError::message("down")));
    }

    #[test]
    fn action_wire_shape() {
        let action: Action =
            serde_json::from_str(r#"{"type":"success","data":3}"#).expect("parse action");
        assert_eq!(action, Action::Success { data: 3 });
        let action: Action = serde_json::from_str(r#"{"type":"load"}"#).expect("parse action");
        assert_eq!(action, Action::Load);
    }
}
