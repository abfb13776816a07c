//! Loader records: a derived loader plus rendering-decision callbacks.
//!
//! A [`Loader`] bundles the [`UseLoader`] that produces the aggregate with
//! the callbacks a view layer consults to decide what to show. The loader
//! never invokes the rendering callbacks itself.
//!
//! Loaders are values. [`Loader::extend`] returns a new loader with fields
//! replaced one by one; the original is left untouched.

use std::fmt;
use std::sync::Arc;

use qloader_model::{FetchError, QueryResult};

use crate::collection::NoQueries;
use crate::error::Result;
use crate::use_loader::UseLoader;
use crate::value::LoaderResult;

/// Builds the query argument from view props.
pub type QueriesArgFn<P, A> = Arc<dyn Fn(&P) -> A + Send + Sync>;

/// What to show while loading with no data to fall back on.
pub type OnLoadingFn<P, V> = Arc<dyn Fn(&P) -> V + Send + Sync>;

/// What to show when the aggregate failed.
///
/// Receives the props, the carried error, and the payload-free aggregate.
pub type OnErrorFn<P, E, V> = Arc<dyn Fn(&P, Option<&E>, &QueryResult<(), E>) -> V + Send + Sync>;

/// Wraps the success view while a refetch is in flight.
///
/// The second argument renders the success view. Wrapping it can discard the
/// view's internal state; prefer [`WhileFetching`].
pub type OnFetchingFn<P, V> = Arc<dyn Fn(&P, &dyn Fn() -> V) -> V + Send + Sync>;

/// Extra view placed beside the success view while a refetch is in flight.
pub type WhileFetchingFn<P, R, V> = Arc<dyn Fn(&P, Option<&R>) -> V + Send + Sync>;

/// Views shown around the success view during a background refetch.
pub struct WhileFetching<P, R, V> {
    /// Placed before the success view.
    pub prepend: Option<WhileFetchingFn<P, R, V>>,
    /// Placed after the success view.
    pub append: Option<WhileFetchingFn<P, R, V>>,
}

impl<P, R, V> Default for WhileFetching<P, R, V> {
    fn default() -> Self {
        Self {
            prepend: None,
            append: None,
        }
    }
}

impl<P, R, V> Clone for WhileFetching<P, R, V> {
    fn clone(&self) -> Self {
        Self {
            prepend: self.prepend.clone(),
            append: self.append.clone(),
        }
    }
}

impl<P, R, V> WhileFetching<P, R, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the view placed before the success view.
    #[must_use]
    pub fn prepend(mut self, view: impl Fn(&P, Option<&R>) -> V + Send + Sync + 'static) -> Self {
        self.prepend = Some(Arc::new(view));
        self
    }

    /// Set the view placed after the success view.
    #[must_use]
    pub fn append(mut self, view: impl Fn(&P, Option<&R>) -> V + Send + Sync + 'static) -> Self {
        self.append = Some(Arc::new(view));
        self
    }
}

/// A derived loader with its rendering-decision callbacks.
///
/// - `P`: props of the view using the loader
/// - `R`: loader data, the transform output
/// - `D`: raw payload union of the queries
/// - `V`: view type the callbacks produce
/// - `A`: query argument
/// - `E`: error payload
pub struct Loader<P, R, D, V, A = (), E = FetchError> {
    /// Runs all queries and returns the aggregate.
    pub use_loader: UseLoader<A, R, D, E>,
    pub queries_arg: Option<QueriesArgFn<P, A>>,
    pub on_loading: Option<OnLoadingFn<P, V>>,
    pub on_error: Option<OnErrorFn<P, E, V>>,
    pub on_fetching: Option<OnFetchingFn<P, V>>,
    pub while_fetching: Option<WhileFetching<P, R, V>>,
}

impl<P, R, D, V, A, E> Clone for Loader<P, R, D, V, A, E> {
    fn clone(&self) -> Self {
        Self {
            use_loader: self.use_loader.clone(),
            queries_arg: self.queries_arg.clone(),
            on_loading: self.on_loading.clone(),
            on_error: self.on_error.clone(),
            on_fetching: self.on_fetching.clone(),
            while_fetching: self.while_fetching.clone(),
        }
    }
}

impl<P, R, D, V, A, E> fmt::Debug for Loader<P, R, D, V, A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("queries_arg", &self.queries_arg.is_some())
            .field("on_loading", &self.on_loading.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_fetching", &self.on_fetching.is_some())
            .field("while_fetching", &self.while_fetching.is_some())
            .finish_non_exhaustive()
    }
}

impl<P, R, D, V, A, E> Loader<P, R, D, V, A, E> {
    /// Loader around `use_loader` with no callbacks.
    pub fn new(use_loader: UseLoader<A, R, D, E>) -> Self {
        Self {
            use_loader,
            queries_arg: None,
            on_loading: None,
            on_error: None,
            on_fetching: None,
            while_fetching: None,
        }
    }

    /// Run the loader for `props`, deriving the argument with `queries_arg`.
    ///
    /// Without `queries_arg` the queries receive no argument.
    pub fn load_for(&self, props: &P) -> Result<LoaderResult<R, D, A, E>> {
        let arg = self.queries_arg.as_ref().map(|queries_arg| queries_arg(props));
        self.use_loader.load(arg)
    }

    /// Return a copy with the fields set in `overrides` replaced.
    ///
    /// A new `use_loader` replaces the whole pipeline, including the
    /// transform. Omitted fields keep their current value.
    #[must_use]
    pub fn extend(&self, overrides: LoaderOverrides<P, R, D, V, A, E>) -> Self {
        Self {
            use_loader: overrides
                .use_loader
                .unwrap_or_else(|| self.use_loader.clone()),
            queries_arg: overrides.queries_arg.or_else(|| self.queries_arg.clone()),
            on_loading: overrides.on_loading.or_else(|| self.on_loading.clone()),
            on_error: overrides.on_error.or_else(|| self.on_error.clone()),
            on_fetching: overrides.on_fetching.or_else(|| self.on_fetching.clone()),
            while_fetching: overrides
                .while_fetching
                .or_else(|| self.while_fetching.clone()),
        }
    }

    /// Return a copy driven by a pipeline with a different data type.
    ///
    /// Callbacks that do not depend on the data type are kept;
    /// `while_fetching` is typed over the old data and is dropped.
    pub fn extend_with<Rb, Db>(
        &self,
        use_loader: UseLoader<A, Rb, Db, E>,
    ) -> Loader<P, Rb, Db, V, A, E> {
        Loader {
            use_loader,
            queries_arg: self.queries_arg.clone(),
            on_loading: self.on_loading.clone(),
            on_error: self.on_error.clone(),
            on_fetching: self.on_fetching.clone(),
            while_fetching: None,
        }
    }

    /// Set the query argument builder.
    #[must_use]
    pub fn queries_arg(mut self, f: impl Fn(&P) -> A + Send + Sync + 'static) -> Self {
        self.queries_arg = Some(Arc::new(f));
        self
    }

    /// Set the loading view.
    #[must_use]
    pub fn on_loading(mut self, f: impl Fn(&P) -> V + Send + Sync + 'static) -> Self {
        self.on_loading = Some(Arc::new(f));
        self
    }

    /// Set the error view.
    #[must_use]
    pub fn on_error(
        mut self,
        f: impl Fn(&P, Option<&E>, &QueryResult<(), E>) -> V + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Set the fetching wrapper.
    #[must_use]
    pub fn on_fetching(mut self, f: impl Fn(&P, &dyn Fn() -> V) -> V + Send + Sync + 'static) -> Self {
        self.on_fetching = Some(Arc::new(f));
        self
    }

    /// Set the views shown beside the success view while fetching.
    #[must_use]
    pub fn while_fetching(mut self, while_fetching: WhileFetching<P, R, V>) -> Self {
        self.while_fetching = Some(while_fetching);
        self
    }
}

impl<P, V, A, E> Loader<P, (), (), V, A, E>
where
    A: Clone + 'static,
    E: Clone + 'static,
{
    /// Loader without queries; it always resolves to a vacuous success.
    pub fn empty() -> Self {
        Self::new(UseLoader::new(|_: Option<A>| NoQueries::<E>::new()))
    }
}

/// Field-by-field replacements for [`Loader::extend`].
pub struct LoaderOverrides<P, R, D, V, A = (), E = FetchError> {
    pub use_loader: Option<UseLoader<A, R, D, E>>,
    pub queries_arg: Option<QueriesArgFn<P, A>>,
    pub on_loading: Option<OnLoadingFn<P, V>>,
    pub on_error: Option<OnErrorFn<P, E, V>>,
    pub on_fetching: Option<OnFetchingFn<P, V>>,
    pub while_fetching: Option<WhileFetching<P, R, V>>,
}

impl<P, R, D, V, A, E> Default for LoaderOverrides<P, R, D, V, A, E> {
    fn default() -> Self {
        Self {
            use_loader: None,
            queries_arg: None,
            on_loading: None,
            on_error: None,
            on_fetching: None,
            while_fetching: None,
        }
    }
}

impl<P, R, D, V, A, E> LoaderOverrides<P, R, D, V, A, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pipeline.
    #[must_use]
    pub fn use_loader(mut self, use_loader: UseLoader<A, R, D, E>) -> Self {
        self.use_loader = Some(use_loader);
        self
    }

    #[must_use]
    pub fn queries_arg(mut self, f: impl Fn(&P) -> A + Send + Sync + 'static) -> Self {
        self.queries_arg = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_loading(mut self, f: impl Fn(&P) -> V + Send + Sync + 'static) -> Self {
        self.on_loading = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_error(
        mut self,
        f: impl Fn(&P, Option<&E>, &QueryResult<(), E>) -> V + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_fetching(mut self, f: impl Fn(&P, &dyn Fn() -> V) -> V + Send + Sync + 'static) -> Self {
        self.on_fetching = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn while_fetching(mut self, while_fetching: WhileFetching<P, R, V>) -> Self {
        self.while_fetching = Some(while_fetching);
        self
    }
}

/// Types that resolve to loader data.
pub trait LoaderOutput {
    type Data;
}

impl<A, R, D, E> LoaderOutput for UseLoader<A, R, D, E> {
    type Data = R;
}

impl<P, R, D, V, A, E> LoaderOutput for Loader<P, R, D, V, A, E> {
    type Data = R;
}

/// Data type a loader resolves to.
pub type LoaderData<L> = <L as LoaderOutput>::Data;
