use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use qloader_model::{QueryResult, QueryStatus};
use serde_json::Value;

use crate::commands::{AggregateReport, InputRow, ReplayFrame};

pub fn print_aggregate(report: &AggregateReport) {
    println!("{}", aggregate_table(report));
    println!();
    println!("{}", report.view);
}

pub fn print_replay(frames: &[ReplayFrame]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Query"),
        header_cell("Action"),
        header_cell("Aggregate"),
        header_cell("Fetching"),
        header_cell("View"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for frame in frames {
        let aggregate = &frame.report.aggregate;
        table.add_row(vec![
            Cell::new(frame.step),
            frame.query.as_deref().map_or_else(|| dim_cell("-"), Cell::new),
            frame.action.map_or_else(|| dim_cell("-"), Cell::new),
            status_cell(aggregate.status()),
            flag_cell(aggregate.is_fetching),
            Cell::new(&frame.report.view),
        ]);
    }
    println!("{table}");
}

pub fn aggregate_table(report: &AggregateReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Query"),
        header_cell("Status"),
        header_cell("Fetching"),
        header_cell("Data"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Center);
    for row in &report.inputs {
        table.add_row(input_cells(row));
    }
    table.add_row(total_cells(&report.aggregate));
    table
}

fn input_cells(row: &InputRow) -> Vec<Cell> {
    vec![
        Cell::new(&row.label),
        status_cell(row.status),
        flag_cell(row.fetching),
        flag_cell(row.has_data),
        row.error
            .as_ref()
            .map_or_else(|| dim_cell("-"), |error| Cell::new(error).fg(Color::Red)),
    ]
}

fn total_cells(aggregate: &QueryResult<Value>) -> Vec<Cell> {
    vec![
        Cell::new("AGGREGATE")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        status_cell(aggregate.status()).add_attribute(Attribute::Bold),
        flag_cell(aggregate.is_fetching),
        flag_cell(aggregate.data.is_some()),
        aggregate
            .error
            .as_ref()
            .map_or_else(|| dim_cell("-"), |error| {
                Cell::new(error)
                    .fg(Color::Red)
                    .add_attribute(Attribute::Bold)
            }),
    ]
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: QueryStatus) -> Cell {
    let color = match status {
        QueryStatus::Uninitialized => Color::DarkGrey,
        QueryStatus::Loading => Color::Yellow,
        QueryStatus::Success => Color::Green,
        QueryStatus::Error => Color::Red,
    };
    Cell::new(status).fg(color)
}

fn flag_cell(set: bool) -> Cell {
    if set {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::aggregate_set;
    use crate::input::QuerySet;

    #[test]
    fn table_has_a_row_per_input_plus_aggregate() {
        let set = QuerySet::from_json(r#"[{"is_success":true,"data":1},{"is_loading":true}]"#)
            .expect("parse");
        let report = aggregate_set(&set).expect("report");
        let table = aggregate_table(&report);
        assert_eq!(table.row_iter().count(), 3);
        let rendered = table.to_string();
        assert!(rendered.contains("AGGREGATE"));
        assert!(rendered.contains("Loading"));
    }
}
