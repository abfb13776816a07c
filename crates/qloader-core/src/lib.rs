//! Aggregation of concurrent query results into one loader state.
//!
//! A view that depends on several independently fetched queries needs one
//! answer to "what do I show?". This crate folds the queries into a single
//! [`QueryResult`](qloader_model::QueryResult) and, once every query has
//! succeeded, hands their payloads to a transform. Until then the loader
//! passes the raw payload union through as [`LoaderValue::Raw`].
//!
//! Scheduling, caching and retries belong to the query provider. Everything
//! here is synchronous and recomputed on each call.
//!
//! # Example
//!
//! ```
//! use qloader_core::{Loader, UseLoader};
//! use qloader_model::{QueryResult, ReadyQuery};
//!
//! let loader: Loader<u32, String, (u32, String), String, u32> = Loader::new(UseLoader::with_transform(
//!     |id: Option<u32>| {
//!         (
//!             QueryResult::<u32>::success(id.unwrap_or(0)),
//!             QueryResult::<String>::success("Kanto".to_string()),
//!         )
//!     },
//!     |(pokemon, region): (ReadyQuery<u32>, ReadyQuery<String>)| {
//!         format!("#{} from {}", pokemon.data, region.data)
//!     },
//! ))
//! .queries_arg(|props: &u32| *props);
//!
//! let result = loader.load_for(&25).unwrap();
//! assert_eq!(result.data().map(String::as_str), Some("#25 from Kanto"));
//! assert_eq!(result.original_args, Some(25));
//! ```
//!
//! # Architecture
//!
//! - `collection.rs` - [`QueryCollection`] over tuples, `Vec` and `BTreeMap`
//! - `aggregate.rs` - status precedence and data union
//! - `use_loader.rs` - [`UseLoader`], queries + aggregate + transform
//! - `loader.rs` - [`Loader`] record, callbacks and `extend`
//! - `value.rs` - [`LoaderResult`] and [`LoaderValue`]
//! - `error.rs` - [`LoaderError`]

mod aggregate;
mod collection;
mod error;
mod loader;
mod use_loader;
mod value;

pub use aggregate::{aggregate, aggregate_status};
pub use collection::{DataUnion, NoQueries, QueryCollection, QueryState};
pub use error::{LoaderError, Result};
pub use loader::{
    Loader, LoaderData, LoaderOutput, LoaderOverrides, OnErrorFn, OnFetchingFn, OnLoadingFn,
    QueriesArgFn, WhileFetching, WhileFetchingFn,
};
pub use use_loader::UseLoader;
pub use value::{LoaderResult, LoaderValue};
