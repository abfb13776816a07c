//! Command implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use qloader_core::aggregate;
use qloader_model::{FetchError, QueryAction, QueryResult, QueryStatus};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::input::{QuerySet, ReplayScript};
use crate::render::{render_set, text_loader};

/// One input row of a report.
#[derive(Debug, Clone, Serialize)]
pub struct InputRow {
    pub label: String,
    pub status: QueryStatus,
    pub fetching: bool,
    pub has_data: bool,
    pub error: Option<FetchError>,
}

/// Inputs, their aggregate, and the text view a loader renders for it.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub inputs: Vec<InputRow>,
    pub aggregate: QueryResult<Value>,
    pub view: String,
}

impl AggregateReport {
    pub fn is_error(&self) -> bool {
        self.aggregate.is_error
    }
}

/// Aggregate state after one replay step. Step 0 is the initial state.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayFrame {
    pub step: usize,
    pub query: Option<String>,
    pub action: Option<&'static str>,
    pub report: AggregateReport,
}

pub fn aggregate_set(set: &QuerySet) -> Result<AggregateReport> {
    let inputs = set
        .entries
        .iter()
        .map(|entry| InputRow {
            label: entry.label.clone(),
            status: entry.query.status(),
            fetching: entry.query.is_fetching,
            has_data: entry.query.has_data(),
            error: entry.query.error.clone(),
        })
        .collect();
    let view = render_set(&text_loader(), set).context("render aggregate view")?;
    Ok(AggregateReport {
        inputs,
        aggregate: aggregate(set),
        view,
    })
}

pub fn run_aggregate(file: &Path) -> Result<AggregateReport> {
    let text = read_input(file)?;
    let set = QuerySet::from_json(&text)
        .with_context(|| format!("parse query snapshots from {}", file.display()))?;
    let report = aggregate_set(&set)?;
    info!(
        queries = set.entries.len(),
        status = %report.aggregate.status(),
        "aggregated snapshot file"
    );
    Ok(report)
}

/// Apply every step in order, reporting the aggregate after each.
pub fn replay(script: &ReplayScript) -> Result<Vec<ReplayFrame>> {
    let mut set = script.initial_set();
    let mut frames = vec![ReplayFrame {
        step: 0,
        query: None,
        action: None,
        report: aggregate_set(&set)?,
    }];
    for (index, step) in script.steps.iter().enumerate() {
        let entry = set
            .entries
            .iter_mut()
            .find(|entry| entry.label == step.query)
            .with_context(|| format!("query `{}` is not declared", step.query))?;
        let query = std::mem::take(&mut entry.query);
        entry.query = query.apply(step.action.clone());
        let report = aggregate_set(&set).with_context(|| format!("step {}", index + 1))?;
        info!(
            step = index + 1,
            query = %step.query,
            action = action_label(&step.action),
            status = %report.aggregate.status(),
            "replayed step"
        );
        frames.push(ReplayFrame {
            step: index + 1,
            query: Some(step.query.clone()),
            action: Some(action_label(&step.action)),
            report,
        });
    }
    Ok(frames)
}

pub fn run_replay(file: &Path) -> Result<Vec<ReplayFrame>> {
    let text = read_input(file)?;
    let script = ReplayScript::from_json(&text)
        .with_context(|| format!("parse replay script from {}", file.display()))?;
    replay(&script)
}

pub fn action_label<T, E>(action: &QueryAction<T, E>) -> &'static str {
    match action {
        QueryAction::Load => "load",
        QueryAction::Fetch => "fetch",
        QueryAction::Error { .. } => "error",
        QueryAction::Success { .. } => "success",
    }
}

fn read_input(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("read {}", file.display()))
}
