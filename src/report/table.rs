// file: src/report/table.rs
// description: plain text table for console summaries

/// Renders a header row, a dashed rule per column and the data rows, with
/// columns separated by two spaces. Numeric-looking cells are right aligned.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let numeric: Vec<bool> = (0..headers.len())
        .map(|i| {
            !rows.is_empty()
                && rows
                    .iter()
                    .all(|row| row.get(i).is_some_and(|c| c.parse::<f64>().is_ok()))
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(
        headers.iter().map(|h| h.to_string()),
        &widths,
        &numeric,
    ));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(format_line(row.iter().cloned(), &widths, &numeric));
    }

    lines.join("\n")
}

fn format_line(cells: impl Iterator<Item = String>, widths: &[usize], numeric: &[bool]) -> String {
    cells
        .zip(widths.iter().zip(numeric))
        .map(|(cell, (width, right))| {
            if *right {
                format!("{:>width$}", cell, width = width)
            } else {
                format!("{:<width$}", cell, width = width)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
