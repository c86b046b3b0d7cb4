use comfy_table::presets::UTF8_HORIZONTAL_ONLY;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};

/// Renders steps as a numbered, single-column listing in collation order.
pub fn steps_table(steps: &[String]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_HORIZONTAL_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(Color::DarkGrey),
            Cell::new("Step").fg(Color::Cyan),
        ]);

    for (position, step) in steps.iter().enumerate() {
        table.add_row(vec![
            Cell::new(position + 1).fg(Color::DarkGrey),
            Cell::new(step),
        ]);
    }

    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    table
}
