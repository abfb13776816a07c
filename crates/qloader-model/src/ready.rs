//! Query results whose payload is known to be present.

use crate::error::FetchError;
use crate::query::{QueryResult, RefetchHandle};

/// A query result narrowed to carry data.
///
/// Transforms receive these instead of [`QueryResult`] so they never have to
/// deal with a missing payload.
#[derive(Debug, Clone)]
pub struct ReadyQuery<T, E = FetchError> {
    /// Latest payload for any argument ever used.
    pub data: T,
    /// Latest payload for the current argument.
    pub current_data: Option<T>,
    /// Error left over from an earlier fetch, if the provider kept one.
    pub error: Option<E>,
    pub endpoint_name: Option<String>,
    /// Whether a background refetch is in flight.
    pub is_fetching: bool,
    pub refetch: RefetchHandle,
}

/// Structural equality; the refetch handle is not compared.
impl<T: PartialEq, E: PartialEq> PartialEq for ReadyQuery<T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
            && self.current_data == other.current_data
            && self.error == other.error
            && self.endpoint_name == other.endpoint_name
            && self.is_fetching == other.is_fetching
    }
}

impl<T, E> QueryResult<T, E> {
    /// Narrow to a [`ReadyQuery`], or `None` when no data is present.
    pub fn into_ready(self) -> Option<ReadyQuery<T, E>> {
        let data = self.data?;
        Some(ReadyQuery {
            data,
            current_data: self.current_data,
            error: self.error,
            endpoint_name: self.endpoint_name,
            is_fetching: self.is_fetching,
            refetch: self.refetch,
        })
    }

    /// Check whether [`into_ready`](Self::into_ready) would succeed.
    #[inline]
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

impl<T, E> ReadyQuery<T, E> {
    /// Payload for the current argument, falling back to the latest one.
    pub fn latest(&self) -> &T {
        self.current_data.as_ref().unwrap_or(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_requires_data() {
        let empty: QueryResult<u32> = QueryResult::loading();
        assert!(empty.into_ready().is_none());

        let ready = QueryResult::<u32>::success(4)
            .fetching(true)
            .into_ready()
            .expect("data present");
        assert_eq!(ready.data, 4);
        assert!(ready.is_fetching);
    }

    #[test]
    fn latest_prefers_current_data() {
        let mut query: QueryResult<&str> = QueryResult::success("old");
        query.current_data = None;
        let ready = query.into_ready().expect("data present");
        assert_eq!(*ready.latest(), "old");

        let ready = QueryResult::<&str>::success("old")
            .with_current_data(Some("new"))
            .into_ready()
            .expect("data present");
        assert_eq!(*ready.latest(), "new");
    }

    #[test]
    fn equality_ignores_refetch() {
        let plain = QueryResult::<u32>::success(7).into_ready().expect("data present");
        let with_handle = QueryResult::<u32>::success(7)
            .with_refetch(RefetchHandle::new(|| {}))
            .into_ready()
            .expect("data present");
        assert_eq!(plain, with_handle);
        assert_ne!(
            plain,
            QueryResult::<u32>::success(8).into_ready().expect("data present")
        );
    }
}
