//! Aggregate shapes for the documented examples.

use std::collections::BTreeMap;

use qloader_core::{Loader, UseLoader, aggregate};
use qloader_model::{FetchError, LoaderPhase, QueryResult, ReadyQuery};

#[test]
fn two_successes_one_fetching() {
    let queries = vec![
        QueryResult::<u32>::success(1),
        QueryResult::success(2).fetching(true),
    ];
    insta::assert_json_snapshot!(aggregate(&queries), @r#"
    {
      "data": [
        1,
        2
      ],
      "current_data": [
        1,
        2
      ],
      "error": null,
      "request_id": null,
      "endpoint_name": null,
      "started_at": null,
      "fulfilled_at": null,
      "is_uninitialized": false,
      "is_loading": false,
      "is_fetching": true,
      "is_success": true,
      "is_error": false
    }
    "#);
}

#[test]
fn error_first_then_success() {
    let queries = vec![
        QueryResult::<u32>::failed(FetchError::message("E1")),
        QueryResult::success(5),
    ];
    insta::assert_json_snapshot!(aggregate(&queries), @r#"
    {
      "data": null,
      "current_data": null,
      "error": {
        "kind": "serialized",
        "message": "E1"
      },
      "request_id": null,
      "endpoint_name": null,
      "started_at": null,
      "fulfilled_at": null,
      "is_uninitialized": false,
      "is_loading": false,
      "is_fetching": false,
      "is_success": false,
      "is_error": true
    }
    "#);
}

#[test]
fn empty_input_is_success_with_empty_union() {
    let aggregated = aggregate(&Vec::<QueryResult<u32>>::new());
    assert!(aggregated.is_success);
    assert!(!aggregated.is_fetching);
    assert_eq!(aggregated.data, Some(Vec::new()));
}

#[test]
fn named_queries_union_by_key() {
    let mut queries = BTreeMap::new();
    queries.insert("pokemon".to_string(), QueryResult::<String>::success("pikachu".into()));
    queries.insert("move".to_string(), QueryResult::<String>::success("thunderbolt".into()));

    let aggregated = aggregate(&queries);
    let data = aggregated.data.expect("union present");
    assert_eq!(data["pokemon"], "pikachu");
    assert_eq!(data["move"], "thunderbolt");
}

#[test]
fn phase_drives_view_selection() {
    let loader: Loader<(), String, (u32, String), String> = Loader::new(UseLoader::with_transform(
        |_: Option<()>| {
            (
                QueryResult::<u32>::success(25).fetching(true),
                QueryResult::<String>::success("electric".to_string()),
            )
        },
        |(id, kind): (ReadyQuery<u32>, ReadyQuery<String>)| format!("#{} ({})", id.data, kind.data),
    ))
    .on_loading(|_| "loading".to_string());

    let result = loader.load_for(&()).expect("load");
    match result.phase() {
        LoaderPhase::Ready { data, fetching } => {
            assert_eq!(data, "#25 (electric)");
            assert!(fetching);
        }
        other => panic!("unexpected phase {other:?}"),
    }
}
