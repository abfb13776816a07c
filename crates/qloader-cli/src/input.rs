//! JSON inputs: query snapshot sets and replay scripts.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result, bail};
use qloader_core::{DataUnion, LoaderError, QueryCollection, QueryState};
use qloader_model::{FetchError, QueryAction, QueryResult, ReadyQuery};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Whether the set was given as an array or as an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    Positional,
    Named,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryEntry {
    pub label: String,
    pub query: QueryResult<Value>,
}

/// Query snapshots with JSON payloads, in aggregation order.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySet {
    pub shape: QueryShape,
    pub entries: Vec<QueryEntry>,
}

impl QuerySet {
    /// Parse an array (positional) or object (named) of snapshots.
    ///
    /// Positional entries are labelled by endpoint name when present. Each
    /// snapshot is parsed on its own so a field error names its entry.
    pub fn from_json(text: &str) -> Result<Self> {
        let set = match serde_json::from_str::<Value>(text)? {
            Value::Array(items) => Self {
                shape: QueryShape::Positional,
                entries: items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| -> Result<QueryEntry> {
                        let query = parse_snapshot(item)
                            .with_context(|| format!("snapshot #{index}"))?;
                        Ok(QueryEntry {
                            label: query
                                .endpoint_name
                                .clone()
                                .unwrap_or_else(|| format!("#{index}")),
                            query,
                        })
                    })
                    .collect::<Result<_>>()?,
            },
            Value::Object(items) => Self {
                shape: QueryShape::Named,
                entries: items
                    .into_iter()
                    .collect::<BTreeMap<_, _>>()
                    .into_iter()
                    .map(|(label, item)| -> Result<QueryEntry> {
                        let query =
                            parse_snapshot(item).with_context(|| format!("snapshot `{label}`"))?;
                        Ok(QueryEntry { label, query })
                    })
                    .collect::<Result<_>>()?,
            },
            other => bail!(
                "expected an array or object of query snapshots, found {}",
                json_kind(&other)
            ),
        };
        tracing::debug!(queries = set.entries.len(), shape = ?set.shape, "parsed query set");
        Ok(set)
    }

    /// Empty set of the given shape.
    pub fn empty(shape: QueryShape) -> Self {
        Self {
            shape,
            entries: Vec::new(),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    fn union(&self, pick: impl Fn(&QueryResult<Value>) -> Option<&Value>) -> Option<Value> {
        match self.shape {
            QueryShape::Positional => self
                .entries
                .iter()
                .map(|entry| pick(&entry.query).cloned())
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            QueryShape::Named => self
                .entries
                .iter()
                .map(|entry| pick(&entry.query).map(|data| (entry.label.clone(), data.clone())))
                .collect::<Option<Map<_, _>>>()
                .map(Value::Object),
        }
    }
}

impl QueryCollection for QuerySet {
    type Error = FetchError;
    type Ready = Vec<(String, ReadyQuery<Value>)>;

    fn query_count(&self) -> usize {
        self.entries.len()
    }

    fn for_each_query<F>(&self, mut visit: F)
    where
        F: FnMut(&dyn QueryState<FetchError>),
    {
        for entry in &self.entries {
            visit(&entry.query);
        }
    }

    fn into_ready(self) -> qloader_core::Result<Self::Ready> {
        let len = self.entries.len();
        self.entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| {
                entry
                    .query
                    .into_ready()
                    .map(|ready| (entry.label, ready))
                    .ok_or(LoaderError::MissingData { position, len })
            })
            .collect()
    }
}

impl DataUnion for QuerySet {
    type Data = Value;

    fn data(&self) -> Option<Value> {
        self.union(|query| query.data.as_ref())
    }

    fn current_data(&self) -> Option<Value> {
        self.union(|query| query.current_data.as_ref())
    }
}

fn parse_snapshot(item: Value) -> Result<QueryResult<Value>> {
    Ok(serde_json::from_value(item)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One action applied to one named query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplayStep {
    pub query: String,
    pub action: QueryAction<Value, FetchError>,
}

/// Named queries, all starting uninitialized, and the steps to apply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplayScript {
    pub queries: Vec<String>,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

impl ReplayScript {
    /// Parse and check that every step names a declared query.
    pub fn from_json(text: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(text)?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        let mut declared = BTreeSet::new();
        for name in &self.queries {
            if !declared.insert(name.as_str()) {
                bail!("query `{name}` is declared more than once");
            }
        }
        for (index, step) in self.steps.iter().enumerate() {
            if !declared.contains(step.query.as_str()) {
                bail!(
                    "step {} refers to undeclared query `{}`",
                    index + 1,
                    step.query
                );
            }
        }
        Ok(())
    }

    /// Every declared query, uninitialized, in declaration order.
    pub fn initial_set(&self) -> QuerySet {
        QuerySet {
            shape: QueryShape::Named,
            entries: self
                .queries
                .iter()
                .map(|name| QueryEntry {
                    label: name.clone(),
                    query: QueryResult::uninitialized().with_endpoint(name.clone()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn positional_labels_fall_back_to_index() {
        let set = QuerySet::from_json(
            r#"[{"is_success":true,"data":1,"endpoint_name":"getPokemon"},{"is_loading":true}]"#,
        )
        .expect("parse");
        assert_eq!(set.shape, QueryShape::Positional);
        assert_eq!(set.labels().collect::<Vec<_>>(), ["getPokemon", "#1"]);
        assert!(set.entries[1].query.is_loading);
    }

    #[test]
    fn named_union_is_an_object() {
        let set = QuerySet::from_json(
            r#"{"pokemon":{"is_success":true,"data":"pikachu","current_data":"pikachu"},
                "moves":{"is_success":true,"data":["thunderbolt"],"current_data":["thunderbolt"]}}"#,
        )
        .expect("parse");
        assert_eq!(set.shape, QueryShape::Named);
        assert_eq!(
            set.data(),
            Some(json!({"moves": ["thunderbolt"], "pokemon": "pikachu"}))
        );
    }

    #[test]
    fn positional_union_needs_every_payload() {
        let set = QuerySet::from_json(r#"[{"is_success":true,"data":1},{"is_loading":true}]"#)
            .expect("parse");
        assert_eq!(set.data(), None);
    }

    #[test]
    fn into_ready_keeps_labels() {
        let set = QuerySet::from_json(r#"{"a":{"is_success":true,"data":1}}"#).expect("parse");
        let ready = set.into_ready().expect("ready");
        assert_eq!(ready[0].0, "a");
        assert_eq!(ready[0].1.data, json!(1));
    }

    #[test]
    fn malformed_snapshot_names_entry_and_field() {
        let error = QuerySet::from_json(r#"[{"is_success":true},{"is_success":"yes"}]"#)
            .unwrap_err();
        let message = format!("{error:#}");
        assert!(message.contains("snapshot #1"), "{message}");
        assert!(message.contains("invalid type"), "{message}");

        let error = QuerySet::from_json(r#"{"pokemon":{"error":42}}"#).unwrap_err();
        assert!(format!("{error:#}").contains("snapshot `pokemon`"));
    }

    #[test]
    fn scalar_input_is_rejected() {
        let error = QuerySet::from_json("3").unwrap_err();
        assert!(error.to_string().contains("found a number"));
    }

    #[test]
    fn replay_rejects_unknown_query() {
        let error = ReplayScript::from_json(
            r#"{"queries":["a"],"steps":[{"query":"b","action":{"type":"load"}}]}"#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("undeclared query `b`"));
    }

    #[test]
    fn replay_rejects_duplicate_names() {
        let error = ReplayScript::from_json(r#"{"queries":["a","a"]}"#).unwrap_err();
        assert!(error.to_string().contains("more than once"));
    }

    #[test]
    fn replay_starts_uninitialized() {
        let script = ReplayScript::from_json(r#"{"queries":["a","b"]}"#).expect("parse");
        let set = script.initial_set();
        assert_eq!(set.labels().collect::<Vec<_>>(), ["a", "b"]);
        assert!(set.entries.iter().all(|entry| entry.query.is_uninitialized));
    }
}
