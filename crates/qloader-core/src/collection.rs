//! Ordered collections of query results.
//!
//! A loader's queries come back as a fixed-shape collection known at the call
//! site: a tuple when payload types differ, a `Vec` when they match, or a
//! `BTreeMap` when results are named. [`QueryCollection`] lets the aggregator
//! walk any of them in collection order and lets the loader narrow them to
//! their data-required form.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use qloader_model::{FetchError, QueryResult, ReadyQuery, RefetchHandle};

use crate::error::{LoaderError, Result};

/// Status view of one query result, independent of its payload type.
pub trait QueryState<E> {
    fn is_uninitialized(&self) -> bool;
    fn is_loading(&self) -> bool;
    fn is_fetching(&self) -> bool;
    fn is_success(&self) -> bool;
    fn is_error(&self) -> bool;
    fn error(&self) -> Option<&E>;
    fn refetch(&self) -> &RefetchHandle;
}

impl<T, E> QueryState<E> for QueryResult<T, E> {
    fn is_uninitialized(&self) -> bool {
        self.is_uninitialized
    }

    fn is_loading(&self) -> bool {
        self.is_loading
    }

    fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    fn is_success(&self) -> bool {
        self.is_success
    }

    fn is_error(&self) -> bool {
        self.is_error
    }

    fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    fn refetch(&self) -> &RefetchHandle {
        &self.refetch
    }
}

/// An ordered, fixed-arity collection of query results sharing an error type.
pub trait QueryCollection {
    /// Error payload carried by the results.
    type Error: Clone;

    /// The collection with every element narrowed to [`ReadyQuery`].
    type Ready;

    /// Number of results in the collection.
    fn query_count(&self) -> usize;

    /// Visit every result in collection order.
    fn for_each_query<F>(&self, visit: F)
    where
        F: FnMut(&dyn QueryState<Self::Error>);

    /// Narrow every element to its data-required form.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::MissingData`] for the first element without data.
    fn into_ready(self) -> Result<Self::Ready>;
}

/// Collections whose payloads can be gathered into one value.
pub trait DataUnion: QueryCollection {
    /// Union of every element's payload, in collection shape.
    type Data;

    /// Union of `data`, present only when every element has data.
    fn data(&self) -> Option<Self::Data>;

    /// Union of `current_data`, present only when every element has it.
    fn current_data(&self) -> Option<Self::Data>;
}

/// The empty collection. Aggregates to a vacuous success.
#[derive(Debug)]
pub struct NoQueries<E = FetchError>(PhantomData<fn() -> E>);

impl<E> NoQueries<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for NoQueries<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for NoQueries<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E: Clone> QueryCollection for NoQueries<E> {
    type Error = E;
    type Ready = ();

    fn query_count(&self) -> usize {
        0
    }

    fn for_each_query<F>(&self, _visit: F)
    where
        F: FnMut(&dyn QueryState<E>),
    {
    }

    fn into_ready(self) -> Result<()> {
        Ok(())
    }
}

impl<E: Clone> DataUnion for NoQueries<E> {
    type Data = ();

    fn data(&self) -> Option<()> {
        Some(())
    }

    fn current_data(&self) -> Option<()> {
        Some(())
    }
}

impl<T, E: Clone> QueryCollection for Vec<QueryResult<T, E>> {
    type Error = E;
    type Ready = Vec<ReadyQuery<T, E>>;

    fn query_count(&self) -> usize {
        self.len()
    }

    fn for_each_query<F>(&self, mut visit: F)
    where
        F: FnMut(&dyn QueryState<E>),
    {
        for query in self {
            visit(query);
        }
    }

    fn into_ready(self) -> Result<Self::Ready> {
        let len = self.len();
        self.into_iter()
            .enumerate()
            .map(|(position, query)| {
                query
                    .into_ready()
                    .ok_or(LoaderError::MissingData { position, len })
            })
            .collect()
    }
}

impl<T: Clone, E: Clone> DataUnion for Vec<QueryResult<T, E>> {
    type Data = Vec<T>;

    fn data(&self) -> Option<Vec<T>> {
        self.iter().map(|query| query.data.clone()).collect()
    }

    fn current_data(&self) -> Option<Vec<T>> {
        self.iter().map(|query| query.current_data.clone()).collect()
    }
}

/// Named results; collection order is key order.
impl<K: Ord, T, E: Clone> QueryCollection for BTreeMap<K, QueryResult<T, E>> {
    type Error = E;
    type Ready = BTreeMap<K, ReadyQuery<T, E>>;

    fn query_count(&self) -> usize {
        self.len()
    }

    fn for_each_query<F>(&self, mut visit: F)
    where
        F: FnMut(&dyn QueryState<E>),
    {
        for query in self.values() {
            visit(query);
        }
    }

    fn into_ready(self) -> Result<Self::Ready> {
        let len = self.len();
        self.into_iter()
            .enumerate()
            .map(|(position, (key, query))| {
                query
                    .into_ready()
                    .map(|ready| (key, ready))
                    .ok_or(LoaderError::MissingData { position, len })
            })
            .collect()
    }
}

impl<K: Ord + Clone, T: Clone, E: Clone> DataUnion for BTreeMap<K, QueryResult<T, E>> {
    type Data = BTreeMap<K, T>;

    fn data(&self) -> Option<BTreeMap<K, T>> {
        self.iter()
            .map(|(key, query)| query.data.clone().map(|data| (key.clone(), data)))
            .collect()
    }

    fn current_data(&self) -> Option<BTreeMap<K, T>> {
        self.iter()
            .map(|(key, query)| {
                query
                    .current_data
                    .clone()
                    .map(|data| (key.clone(), data))
            })
            .collect()
    }
}

macro_rules! tuple_collection {
    ($len:literal; $($name:ident : $idx:tt),+) => {
        impl<E: Clone, $($name),+> QueryCollection for ($(QueryResult<$name, E>,)+) {
            type Error = E;
            type Ready = ($(ReadyQuery<$name, E>,)+);

            fn query_count(&self) -> usize {
                $len
            }

            fn for_each_query<F>(&self, mut visit: F)
            where
                F: FnMut(&dyn QueryState<E>),
            {
                $( visit(&self.$idx); )+
            }

            fn into_ready(self) -> Result<Self::Ready> {
                Ok(($(
                    self.$idx
                        .into_ready()
                        .ok_or(LoaderError::MissingData { position: $idx, len: $len })?,
                )+))
            }
        }

        impl<E: Clone, $($name: Clone),+> DataUnion for ($(QueryResult<$name, E>,)+) {
            type Data = ($($name,)+);

            fn data(&self) -> Option<Self::Data> {
                Some(($(self.$idx.data.clone()?,)+))
            }

            fn current_data(&self) -> Option<Self::Data> {
                Some(($(self.$idx.current_data.clone()?,)+))
            }
        }
    };
}

tuple_collection!(1; A: 0);
tuple_collection!(2; A: 0, B: 1);
tuple_collection!(3; A: 0, B: 1, C: 2);
tuple_collection!(4; A: 0, B: 1, C: 2, D: 3);
tuple_collection!(5; A: 0, B: 1, C: 2, D: 3, F0: 4);
tuple_collection!(6; A: 0, B: 1, C: 2, D: 3, F0: 4, G: 5);
tuple_collection!(7; A: 0, B: 1, C: 2, D: 3, F0: 4, G: 5, H: 6);
tuple_collection!(8; A: 0, B: 1, C: 2, D: 3, F0: 4, G: 5, H: 6, I: 7);
