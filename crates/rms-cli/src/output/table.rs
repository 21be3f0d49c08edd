//! Aligned plain-text tables.

const MIN_WIDTH: usize = 4;
const SEPARATOR: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render `rows` under `headers`, numbers right-aligned, host statuses colored.
#[must_use]
pub fn render_entity_table(
    headers: &[&str],
    rows: &[Vec<String>],
    options: TableOptions,
) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain([header.chars().count(), MIN_WIDTH])
                .max()
                .unwrap_or(MIN_WIDTH)
        })
        .collect();

    if let Some(max_width) = options.max_width {
        shrink_to(&mut widths, headers, max_width);
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, &width)| pad(&truncate(header, width), width, false))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, &width)| {
                let cell = truncate(row.get(index).map_or("-", String::as_str), width);
                let padded = pad(&cell, width, is_numeric(&cell));
                if options.color {
                    colorize(&cell, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        lines.push(line);
    }
    lines.join("\n")
}

/// Narrow the widest column one character at a time until the table fits.
fn shrink_to(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let separators = widths.len().saturating_sub(1) * SEPARATOR.len();
    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|&(idx, &width)| width > headers[idx].chars().count().max(MIN_WIDTH))
            .max_by_key(|&(_, &width)| width)
            .map(|(idx, _)| idx);
        let Some(idx) = widest else {
            break;
        };
        widths[idx] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit() || ch == '-')
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

fn colorize(cell: &str, padded: String) -> String {
    let code = match cell.to_ascii_lowercase().as_str() {
        "unused" | "ok" | "true" => "32",
        "preselected" | "prepared" => "33",
        "used" | "consumed" | "false" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn columns_align_and_numbers_right_align() {
        let rows = vec![
            vec!["proxy".to_string(), "7".to_string()],
            vec!["backend-master".to_string(), "1024".to_string()],
        ];
        let table = render_entity_table(&["group", "host"], &rows, PLAIN);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "group           host");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "proxy              7");
        assert_eq!(lines[3], "backend-master  1024");
    }

    #[test]
    fn narrow_terminal_truncates_widest_column() {
        let rows = vec![vec!["a-very-long-group-name".to_string(), "1".to_string()]];
        let options = TableOptions {
            max_width: Some(16),
            color: false,
        };
        let table = render_entity_table(&["group", "n"], &rows, options);
        let row = table.lines().nth(2).unwrap_or_default();
        assert_eq!(row.chars().count(), 16);
        assert!(row.contains('…'));
    }

    #[test]
    fn missing_cells_render_as_dash() {
        let table = render_entity_table(&["a", "b"], &[vec!["x".to_string()]], PLAIN);
        assert!(table.lines().nth(2).is_some_and(|row| row.trim_end().ends_with('-')));
    }

    #[test]
    fn statuses_are_colored_when_enabled() {
        let options = TableOptions {
            max_width: None,
            color: true,
        };
        let table = render_entity_table(&["status"], &[vec!["used".to_string()]], options);
        assert!(table.contains("\u{1b}[31m"));
    }
}
