//! Terminal output for entities.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde_json::Value;

/// Build a table with one row per entity, picking `columns` out of each
/// entity's JSON form.
#[must_use]
pub fn entity_table(columns: &[&str], rows: &[Value]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    table.set_header(columns.iter().copied().map(header_cell).collect::<Vec<_>>());
    for row in rows {
        table.add_row(
            columns
                .iter()
                .map(|column| cell_text(row.get(*column)))
                .collect::<Vec<_>>(),
        );
    }
    table
}

/// Pager line shown under a list.
#[must_use]
pub fn pager_line(page: u32, total_pages: u32, total: u64, has_more: bool) -> String {
    let more = if has_more { ", more available" } else { "" };
    format!("page {page} of {total_pages} ({total} total{more})")
}

/// Display text for one JSON field.
#[must_use]
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
