//! What a view should show for a query result.

use crate::query::{QueryResult, QueryStatus};

/// Rendering decision derived from a query result.
///
/// Views match on this instead of reading the status flags themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderPhase<T, E> {
    /// Nothing requested yet.
    Uninitialized,
    /// First load in flight; nothing to show.
    Loading,
    /// Fetch failed.
    Failed { error: Option<E> },
    /// Data available; `fetching` is set during a background refetch.
    Ready { data: T, fetching: bool },
}

impl<T, E> QueryResult<T, E> {
    /// Borrowing rendering decision for this result.
    ///
    /// A successful result without data reports `Loading`, since there is
    /// nothing a view could show yet.
    pub fn phase(&self) -> LoaderPhase<&T, &E> {
        match self.status() {
            QueryStatus::Uninitialized => LoaderPhase::Uninitialized,
            QueryStatus::Loading => LoaderPhase::Loading,
            QueryStatus::Error => LoaderPhase::Failed {
                error: self.error.as_ref(),
            },
            QueryStatus::Success => match &self.data {
                Some(data) => LoaderPhase::Ready {
                    data,
                    fetching: self.is_fetching,
                },
                None => LoaderPhase::Loading,
            },
        }
    }
}
