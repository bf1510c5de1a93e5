//! Rendering of report tables for pull request comments and terminals

use size_report_core::Table;

/// Heading that marks a size-limit comment; used to find it again on update
pub const SIZE_LIMIT_HEADING: &str = "## size-limit report 📦 ";

const MIN_COLUMN_WIDTH: usize = 3;

// Width in UTF-16 units, so emoji markers count as two.
fn cell_width(cell: &str) -> usize {
    cell.encode_utf16().count()
}

fn column_widths(table: &Table) -> Vec<usize> {
    let columns = table.iter().map(Vec::len).max().unwrap_or(0);
    (0..columns)
        .map(|col| {
            table
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell_width(cell))
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect()
}

fn markdown_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell_width(cell));
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    format!("| {} |", padded.join(" | "))
}

/// Render a table as Markdown, first row as header
pub fn markdown_table(table: &Table) -> String {
    let widths = column_widths(table);
    if widths.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(table.len() + 1);
    for (i, row) in table.iter().enumerate() {
        let cells = (0..widths.len()).map(|col| row.get(col).map_or("", String::as_str));
        lines.push(markdown_row(cells, &widths));

        if i == 0 {
            let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            lines.push(markdown_row(dashes.iter().map(String::as_str), &widths));
        }
    }

    lines.join("\n")
}

/// Full comment body: heading followed by the Markdown table
pub fn report_body(table: &Table) -> String {
    [SIZE_LIMIT_HEADING.to_string(), markdown_table(table)].join("\r\n")
}

/// Tab-separated rendering for plain terminals
pub fn text_table(table: &Table) -> String {
    table
        .iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}
