//! Plain-text view of an aggregate, driven by a [`Loader`].
//!
//! The loader's props are the snapshot set itself: `queries_arg` hands it to
//! the queries and the callbacks describe it when there is no data to show.

use qloader_core::{Loader, LoaderResult, UseLoader, WhileFetching};
use qloader_model::{FetchError, LoaderPhase, ReadyQuery};
use serde_json::Value;

use crate::input::{QueryShape, QuerySet};

/// Loader rendering a snapshot set as one line per query.
pub type TextLoader = Loader<QuerySet, Vec<String>, Value, String, QuerySet>;

pub fn text_loader() -> TextLoader {
    Loader::new(UseLoader::with_transform(
        |set: Option<QuerySet>| set.unwrap_or_else(|| QuerySet::empty(QueryShape::Positional)),
        |ready: Vec<(String, ReadyQuery<Value>)>| {
            ready
                .into_iter()
                .map(|(label, query)| format!("{label}: {}", query.latest()))
                .collect()
        },
    ))
    .queries_arg(QuerySet::clone)
    .on_loading(|set: &QuerySet| {
        let pending = set
            .entries
            .iter()
            .filter(|entry| !entry.query.is_success)
            .count();
        format!("loading ({pending} of {} pending)", set.entries.len())
    })
    .on_error(|_, error: Option<&FetchError>, _| match error {
        Some(error) => format!("error: {error}"),
        None => "error: unknown error".to_string(),
    })
    .while_fetching(WhileFetching::new().append(|_: &QuerySet, _: Option<&Vec<String>>| {
        "(refreshing)".to_string()
    }))
}

/// Load `set` through `loader` and render the resulting phase.
pub fn render_set(loader: &TextLoader, set: &QuerySet) -> qloader_core::Result<String> {
    let result = loader.load_for(set)?;
    Ok(render_view(loader, set, &result))
}

/// Pick the view for `result` from the loader's callbacks.
///
/// `on_fetching` wraps the success view when set; otherwise the
/// `while_fetching` views are placed around it.
pub fn render_view<P, R, D, A>(
    loader: &Loader<P, Vec<R>, D, String, A>,
    props: &P,
    result: &LoaderResult<Vec<R>, D, A>,
) -> String
where
    R: AsRef<str>,
{
    match result.phase() {
        LoaderPhase::Uninitialized => "not started".to_string(),
        LoaderPhase::Loading => match &loader.on_loading {
            Some(on_loading) => on_loading(props),
            None => "loading".to_string(),
        },
        LoaderPhase::Failed { error } => match &loader.on_error {
            Some(on_error) => on_error(props, error, &result.status_only()),
            None => "error".to_string(),
        },
        LoaderPhase::Ready { data, fetching } => {
            let body = || {
                data.iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<&str>>()
                    .join("\n")
            };
            if !fetching {
                return body();
            }
            if let Some(on_fetching) = &loader.on_fetching {
                return on_fetching(props, &body);
            }
            let mut parts = Vec::new();
            let while_fetching = loader.while_fetching.as_ref();
            if let Some(prepend) = while_fetching.and_then(|views| views.prepend.as_ref()) {
                parts.push(prepend(props, Some(data)));
            }
            parts.push(body());
            if let Some(append) = while_fetching.and_then(|views| views.append.as_ref()) {
                parts.push(append(props, Some(data)));
            }
            parts.join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use qloader_core::LoaderOverrides;

    use super::*;

    fn set(text: &str) -> QuerySet {
        QuerySet::from_json(text).expect("parse")
    }

    #[test]
    fn ready_lists_each_query() {
        let loader = text_loader();
        let text = render_set(
            &loader,
            &set(r#"{"pokemon":{"is_success":true,"data":"pikachu"},"level":{"is_success":true,"data":25}}"#),
        )
        .expect("render");
        assert_eq!(text, "level: 25\npokemon: \"pikachu\"");
    }

    #[test]
    fn fetching_appends_refresh_marker() {
        let loader = text_loader();
        let text = render_set(
            &loader,
            &set(r#"[{"is_success":true,"is_fetching":true,"data":1}]"#),
        )
        .expect("render");
        assert_eq!(text, "#0: 1\n(refreshing)");
    }

    #[test]
    fn on_fetching_wraps_instead_of_while_fetching() {
        let loader = text_loader().extend(
            LoaderOverrides::new().on_fetching(|_, view: &dyn Fn() -> String| format!("[{}]", view())),
        );
        let text = render_set(
            &loader,
            &set(r#"[{"is_success":true,"is_fetching":true,"data":1}]"#),
        )
        .expect("render");
        assert_eq!(text, "[#0: 1]");
    }

    #[test]
    fn loading_counts_pending_queries() {
        let loader = text_loader();
        let text = render_set(
            &loader,
            &set(r#"[{"is_success":true,"data":1},{"is_loading":true},{"is_uninitialized":true}]"#),
        )
        .expect("render");
        assert_eq!(text, "loading (2 of 3 pending)");
    }

    #[test]
    fn error_shows_first_error() {
        let loader = text_loader();
        let text = render_set(
            &loader,
            &set(r#"[{"is_error":true,"error":{"kind":"serialized","message":"E1"}},{"is_success":true,"data":5}]"#),
        )
        .expect("render");
        assert_eq!(text, "error: E1");
    }

    #[test]
    fn uninitialized_is_not_started() {
        let loader = text_loader();
        let text = render_set(&loader, &set(r#"[{}]"#)).expect("render");
        assert_eq!(text, "not started");
    }
}
