//! Derived loaders: queries, aggregation and transform behind one call.

use std::fmt;
use std::sync::Arc;

use qloader_model::{FetchError, QueryResult};

use crate::aggregate::aggregate_status;
use crate::collection::DataUnion;
use crate::error::Result;
use crate::value::{LoaderResult, LoaderValue};

type LoadFn<A, R, D, E> = dyn Fn(Option<A>) -> Result<LoaderResult<R, D, A, E>> + Send + Sync;

/// Runs a loader's queries and returns their aggregate.
///
/// Every call produces the query collection afresh and aggregates it. Only a
/// successful aggregate is transformed; any other aggregate passes through
/// with the raw payload union of its queries and the transform is not called.
///
/// - `A`: query argument
/// - `R`: transform output
/// - `D`: raw payload union of the queries
/// - `E`: error payload
pub struct UseLoader<A, R, D, E = FetchError> {
    load: Arc<LoadFn<A, R, D, E>>,
}

impl<A, R, D, E> Clone for UseLoader<A, R, D, E> {
    fn clone(&self) -> Self {
        Self {
            load: Arc::clone(&self.load),
        }
    }
}

impl<A, R, D, E> fmt::Debug for UseLoader<A, R, D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseLoader").finish_non_exhaustive()
    }
}

impl<A, R, D, E> UseLoader<A, R, D, E> {
    /// Run the queries for `arg` and aggregate them.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::MissingData`](crate::LoaderError::MissingData)
    /// when the aggregate is successful but an input holds no data.
    pub fn load(&self, arg: Option<A>) -> Result<LoaderResult<R, D, A, E>> {
        (self.load)(arg)
    }
}

impl<A, R, D, E> UseLoader<A, R, D, E>
where
    A: Clone + 'static,
    R: Clone + 'static,
    D: 'static,
    E: Clone + 'static,
{
    /// Loader without a transform; its data is the data-required collection.
    pub fn new<Q, C>(queries: Q) -> Self
    where
        Q: Fn(Option<A>) -> C + Send + Sync + 'static,
        C: DataUnion<Error = E, Ready = R, Data = D> + 'static,
    {
        Self::with_transform(queries, |ready: R| ready)
    }

    /// Loader whose data is `transform` applied to the data-required collection.
    pub fn with_transform<Q, C, F>(queries: Q, transform: F) -> Self
    where
        Q: Fn(Option<A>) -> C + Send + Sync + 'static,
        C: DataUnion<Error = E, Data = D> + 'static,
        F: Fn(C::Ready) -> R + Send + Sync + 'static,
    {
        Self {
            load: Arc::new(move |arg: Option<A>| {
                let query = resolve(queries(arg.clone()), &transform)?;
                Ok(LoaderResult {
                    query,
                    original_args: arg,
                })
            }),
        }
    }
}

fn resolve<C, R, F>(
    queries: C,
    transform: &F,
) -> Result<QueryResult<LoaderValue<R, C::Data>, C::Error>>
where
    C: DataUnion,
    R: Clone,
    F: Fn(C::Ready) -> R,
{
    let aggregated = aggregate_status(&queries);
    if !aggregated.is_success {
        let data = queries.data().map(LoaderValue::Raw);
        let current_data = queries.current_data().map(LoaderValue::Raw);
        return Ok(aggregated.with_payload(data, current_data));
    }

    let ready = queries.into_ready().inspect_err(|error| {
        tracing::warn!(%error, "successful aggregate is missing data");
    })?;
    tracing::debug!("transforming aggregated query data");
    let data = transform(ready);
    Ok(aggregated.with_payload(
        Some(LoaderValue::Transformed(data.clone())),
        Some(LoaderValue::Transformed(data)),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use qloader_model::{FetchError, QueryAction, QueryStatus, ReadyQuery};

    use super::*;
    use crate::error::LoaderError;

    #[test]
    fn without_transform_data_is_ready_collection() {
        let loader = UseLoader::new(|_: Option<()>| {
            (
                QueryResult::<u32>::success(1),
                QueryResult::<&str>::success("two"),
            )
        });
        let result = loader.load(None).expect("load");
        assert!(result.current_data().is_some());
        let (first, second): (ReadyQuery<u32>, ReadyQuery<&str>) =
            result.into_data().expect("success data");
        assert_eq!(first.data, 1);
        assert_eq!(second.data, "two");
    }

    #[test]
    fn transform_output_replaces_both_payloads() {
        let loader = UseLoader::with_transform(
            |arg: Option<u32>| vec![QueryResult::<u32>::success(arg.unwrap_or(0))],
            |ready: Vec<ReadyQuery<u32>>| ready[0].data * 10,
        );
        let result = loader.load(Some(4)).expect("load");
        assert_eq!(result.data(), Some(&40));
        assert_eq!(result.current_data(), Some(&40));
        assert!(result.query.is_success);
    }

    #[test]
    fn transform_skipped_unless_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let loader = UseLoader::with_transform(
            |_: Option<()>| {
                vec![
                    QueryResult::<u32>::success(1),
                    QueryResult::failed(FetchError::message("E1")),
                ]
            },
            move |_: Vec<ReadyQuery<u32>>| {
                counter.fetch_add(1, Ordering::SeqCst);
                0u32
            },
        );
        let result = loader.load(None).expect("load");
        assert_eq!(result.status(), QueryStatus::Error);
        assert_eq!(result.query.error, Some(FetchError::message("E1")));
        assert_eq!(result.data(), None);
        assert_eq!(result.raw_data(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_aggregate_keeps_stale_raw_data() {
        let loader = UseLoader::with_transform(
            |_: Option<()>| {
                vec![
                    QueryResult::<u32>::success(1).apply(QueryAction::Error {
                        error: FetchError::message("E1"),
                    }),
                    QueryResult::success(2),
                ]
            },
            |ready: Vec<ReadyQuery<u32>>| ready.len(),
        );
        let result = loader.load(None).expect("load");
        assert!(result.query.is_error);
        assert_eq!(result.query.data, Some(LoaderValue::Raw(vec![1, 2])));
        assert_eq!(result.raw_data(), Some(&vec![1, 2]));
        // the errored input dropped its current_data
        assert_eq!(result.query.current_data, None);
        assert_eq!(result.data(), None);
    }

    #[test]
    fn success_without_data_is_an_error() {
        let loader = UseLoader::new(|_: Option<()>| {
            vec![QueryResult::<u32>::from_status(QueryStatus::Success, false)]
        });
        assert_eq!(
            loader.load(None).unwrap_err(),
            LoaderError::MissingData {
                position: 0,
                len: 1
            }
        );
    }

    #[test]
    fn queries_see_the_argument() {
        let loader = UseLoader::with_transform(
            |arg: Option<&'static str>| vec![QueryResult::<&str>::success(arg.unwrap_or("none"))],
            |ready: Vec<ReadyQuery<&str>>| ready[0].data.to_string(),
        );
        let result = loader.load(None).expect("load");
        assert_eq!(result.data().map(String::as_str), Some("none"));
        assert_eq!(result.original_args, None);

        let result = loader.load(Some("ash")).expect("load");
        assert_eq!(result.data().map(String::as_str), Some("ash"));
        assert_eq!(result.original_args, Some("ash"));
    }
}
