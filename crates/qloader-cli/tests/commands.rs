//! End-to-end command behavior on in-memory inputs.

use std::path::Path;

use qloader_cli::commands::{aggregate_set, replay, run_aggregate};
use qloader_cli::input::{QuerySet, ReplayScript};
use qloader_model::QueryStatus;

#[test]
fn aggregate_report_shape() {
    let set = QuerySet::from_json(
        r#"[
            {"is_success": true, "data": 1, "current_data": 1, "endpoint_name": "getPokemon"},
            {"is_error": true, "error": {"kind": "serialized", "message": "E1"}}
        ]"#,
    )
    .expect("parse");
    let report = aggregate_set(&set).expect("report");
    assert!(report.is_error());
    insta::assert_json_snapshot!(report, @r##"
    {
      "inputs": [
        {
          "label": "getPokemon",
          "status": "success",
          "fetching": false,
          "has_data": true,
          "error": null
        },
        {
          "label": "#1",
          "status": "error",
          "fetching": false,
          "has_data": false,
          "error": {
            "kind": "serialized",
            "message": "E1"
          }
        }
      ],
      "aggregate": {
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
      },
      "view": "error: E1"
    }
    "##);
}

#[test]
fn successful_named_aggregate_renders_each_query() {
    let set = QuerySet::from_json(
        r#"{"trainer": {"is_success": true, "data": "ash"},
            "pokemon": {"is_success": true, "data": "pikachu"}}"#,
    )
    .expect("parse");
    let report = aggregate_set(&set).expect("report");
    assert_eq!(report.aggregate.status(), QueryStatus::Success);
    assert_eq!(report.view, "pokemon: \"pikachu\"\ntrainer: \"ash\"");
}

#[test]
fn success_without_data_is_reported() {
    let set = QuerySet::from_json(r#"[{"is_success": true}]"#).expect("parse");
    let error = aggregate_set(&set).unwrap_err();
    assert!(format!("{error:#}").contains("query 0 of 1 reported success without data"));
}

#[test]
fn missing_file_names_the_path() {
    let error = run_aggregate(Path::new("does-not-exist.json")).unwrap_err();
    assert!(format!("{error:#}").contains("does-not-exist.json"));
}

#[test]
fn replay_walks_through_every_phase() {
    let script = ReplayScript::from_json(
        r#"{
            "queries": ["pokemon", "moves"],
            "steps": [
                {"query": "pokemon", "action": {"type": "load"}},
                {"query": "moves", "action": {"type": "load"}},
                {"query": "pokemon", "action": {"type": "success", "data": "pikachu"}},
                {"query": "moves", "action": {"type": "success", "data": ["thunderbolt"]}},
                {"query": "pokemon", "action": {"type": "fetch"}},
                {"query": "moves", "action": {"type": "error", "error": {"kind": "serialized", "message": "E2"}}}
            ]
        }"#,
    )
    .expect("parse");
    let frames = replay(&script).expect("replay");

    let statuses: Vec<_> = frames
        .iter()
        .map(|frame| frame.report.aggregate.status())
        .collect();
    assert_eq!(
        statuses,
        [
            QueryStatus::Uninitialized,
            QueryStatus::Loading,
            QueryStatus::Loading,
            QueryStatus::Loading,
            QueryStatus::Success,
            QueryStatus::Success,
            QueryStatus::Error,
        ]
    );

    let views: Vec<_> = frames.iter().map(|frame| frame.report.view.as_str()).collect();
    assert_eq!(
        views,
        [
            "not started",
            "loading (2 of 2 pending)",
            "loading (2 of 2 pending)",
            "loading (1 of 2 pending)",
            "pokemon: \"pikachu\"\nmoves: [\"thunderbolt\"]",
            "pokemon: \"pikachu\"\nmoves: [\"thunderbolt\"]\n(refreshing)",
            "error: E2",
        ]
    );

    assert_eq!(frames[0].action, None);
    assert_eq!(frames[5].action, Some("fetch"));
    assert!(frames[5].report.aggregate.is_fetching);
    assert!(frames.last().expect("frames").report.is_error());
}
