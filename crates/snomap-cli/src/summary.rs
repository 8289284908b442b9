use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use snomap_model::BatchSummary;

use crate::commands::RunReport;

pub fn print_summary(report: &RunReport) {
    println!();
    if report.full_refresh {
        println!("Processing Summary (full refresh):");
    } else {
        println!("Processing Summary:");
    }
    println!("{}", summary_table(&report.summary));
    println!("Successes: {}", report.layout.success_table().display());
    println!("Failures: {}", report.layout.failure_table().display());
    println!("Responses: {}", report.layout.artifact_dir().display());
}

/// Label/count pairs in display order.
pub fn summary_rows(summary: &BatchSummary) -> [(&'static str, usize); 4] {
    [
        ("Total codes found", summary.total),
        ("Codes skipped (already mapped)", summary.skipped),
        ("Codes processed successfully", summary.succeeded),
        ("Codes with errors/no mapping", summary.failed),
    ]
}

pub fn summary_table(summary: &BatchSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Outcome"), header_cell("Codes")]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for (index, (label, count)) in summary_rows(summary).into_iter().enumerate() {
        let count_cell = match index {
            2 => count_cell(count, Color::Green),
            3 => count_cell(count, Color::Red),
            _ => Cell::new(count),
        };
        table.add_row(vec![Cell::new(label), count_cell]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}
