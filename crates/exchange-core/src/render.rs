//! Plain-text table rendering for chat broadcast.

use crate::table::RateTable;

/// Shown in cells without a rate
pub const ABSENT: &str = "-";

const DATE_HEADER: &str = "Date";

/// Render `table` as a bordered text block
///
/// ```text
/// +----------------------------------+
/// | Exchange rates EUR, USD on 17.10 |
/// +-----+------+---------------------+
/// |     | Date |          17.10.2026 |
/// +-----+------+---------------------+
/// | EUR | Sale |               44.86 |
/// |     |  Buy |               44.00 |
/// +-----+------+---------------------+
/// ```
pub fn render_table(table: &RateTable) -> String {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(table.rows.len() + 1);

    let mut header = vec![String::new(), DATE_HEADER.to_string()];
    header.extend(table.columns.iter().map(|d| d.format("%d.%m.%Y").to_string()));
    grid.push(header);

    for (index, row) in table.rows.iter().enumerate() {
        let label = if index % 2 == 0 { row.currency.clone() } else { String::new() };
        let mut line = vec![label, row.side.label().to_string()];
        line.extend(row.cells.iter().map(|cell| {
            cell.map_or_else(|| ABSENT.to_string(), |rate| format!("{rate:.2}"))
        }));
        grid.push(line);
    }

    let mut widths: Vec<usize> = (0..grid[0].len())
        .map(|col| grid.iter().map(|line| line[col].chars().count()).max().unwrap_or(0))
        .collect();

    // Each column adds 3 chars of padding and border, minus the outer border
    let inner = widths.iter().map(|w| w + 3).sum::<usize>() - 1;
    let title_len = table.title.chars().count() + 2;
    if title_len > inner {
        if let Some(last) = widths.last_mut() {
            *last += title_len - inner;
        }
    }
    let inner = inner.max(title_len);

    let separator = format!(
        "+{}+",
        widths.iter().map(|w| "-".repeat(w + 2)).collect::<Vec<_>>().join("+")
    );

    let mut out = Vec::with_capacity(grid.len() + 5);
    out.push(format!("+{}+", "-".repeat(inner)));
    out.push(format!("|{}|", center(&table.title, inner)));
    out.push(separator.clone());
    for (index, line) in grid.iter().enumerate() {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(text, width)| format!(" {text:>width$} "))
            .collect();
        out.push(format!("|{}|", cells.join("|")));
        if index == 0 {
            out.push(separator.clone());
        }
    }
    out.push(separator);

    out.join("\n")
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let left = width.saturating_sub(len) / 2;
    let right = width.saturating_sub(len + left);
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}
