use std::fmt::Write as _;

use crate::data::Cell;

/// Renders a report as an elastic-width ASCII table. Count cells are
/// right-aligned under their headers; everything else is left-aligned.
pub fn render_table(headers: &[String], rows: &[Vec<Cell>]) -> String {
    let column_count = headers.len();
    let rendered = rows
        .iter()
        .map(|row| row.iter().map(|cell| sanitize(&cell.as_display())).collect())
        .collect::<Vec<Vec<String>>>();

    let mut widths = headers
        .iter()
        .map(|header| header.chars().count().max(1))
        .collect::<Vec<_>>();
    for row in &rendered {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();

    let header_cells = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| pad_left(header, widths[idx]))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", join_line(&header_cells));

    let separator = widths
        .iter()
        .map(|width| "-".repeat((*width).max(3)))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", join_line(&separator));

    for (cells, row) in rendered.iter().zip(rows) {
        let line_cells = cells
            .iter()
            .enumerate()
            .take(column_count)
            .map(|(idx, cell)| {
                if row.get(idx).is_some_and(Cell::is_count) {
                    pad_right(cell, widths[idx])
                } else {
                    pad_left(cell, widths[idx])
                }
            })
            .collect::<Vec<_>>();
        let _ = writeln!(output, "{}", join_line(&line_cells));
    }

    output
}

pub fn print_table(headers: &[String], rows: &[Vec<Cell>]) {
    print!("{}", render_table(headers, rows));
}

fn join_line(cells: &[String]) -> String {
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn pad_left(value: &str, width: usize) -> String {
    let padding = width.saturating_sub(value.chars().count());
    let mut cell = value.to_string();
    cell.push_str(&" ".repeat(padding));
    cell
}

fn pad_right(value: &str, width: usize) -> String {
    let padding = width.saturating_sub(value.chars().count());
    let mut cell = " ".repeat(padding);
    cell.push_str(value);
    cell
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect()
}
