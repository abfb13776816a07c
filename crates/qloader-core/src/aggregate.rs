//! Folding a collection of query results into one aggregate.
//!
//! Primary status follows a fixed precedence, first match wins:
//!
//! 1. error - any input errored; the first errored input's error is kept
//! 2. loading - any input is on its first load
//! 3. uninitialized - any input has not started
//! 4. success - everything else, including the empty collection
//!
//! `is_fetching` is the OR of every input's overlay, independent of the
//! primary status. Aggregates are recomputed from scratch on every call.

use qloader_model::{QueryResult, QueryStatus, RefetchHandle};

use crate::collection::{DataUnion, QueryCollection};

/// Aggregate status, error and refetch of `queries`, without payload.
///
/// The refetch handle triggers every input's refetch in collection order.
pub fn aggregate_status<C>(queries: &C) -> QueryResult<(), C::Error>
where
    C: QueryCollection,
{
    let mut any_error = false;
    let mut any_loading = false;
    let mut any_uninitialized = false;
    let mut any_fetching = false;
    let mut error = None;
    let mut refetches = Vec::with_capacity(queries.query_count());

    queries.for_each_query(|query| {
        if query.is_error() && !any_error {
            any_error = true;
            error = query.error().cloned();
        }
        any_loading |= query.is_loading();
        any_uninitialized |= query.is_uninitialized();
        any_fetching |= query.is_fetching();
        refetches.push(query.refetch().clone());
    });

    let status = if any_error {
        QueryStatus::Error
    } else if any_loading {
        QueryStatus::Loading
    } else if any_uninitialized {
        QueryStatus::Uninitialized
    } else {
        QueryStatus::Success
    };

    tracing::trace!(
        queries = queries.query_count(),
        %status,
        fetching = any_fetching,
        "aggregated query results"
    );

    let mut aggregated =
        QueryResult::from_status(status, any_fetching).with_refetch(RefetchHandle::all(refetches));
    aggregated.error = error;
    aggregated
}

/// Aggregate of `queries` carrying the union of their payloads.
///
/// `data` is present only when every input has data, and likewise for
/// `current_data`. The empty collection yields the empty union.
pub fn aggregate<C>(queries: &C) -> QueryResult<C::Data, C::Error>
where
    C: DataUnion,
{
    let data = queries.data();
    let current_data = queries.current_data();
    aggregate_status(queries).with_payload(data, current_data)
}
