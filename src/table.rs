// Plain text tables for terminal output

use itertools::Itertools;

/// Render `rows` under `headers` with left-aligned, space separated columns
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = (0..headers.len())
        .map(|column| {
            rows.iter()
                .filter_map(|row| row.get(column))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(headers[column].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header = format_row(headers.to_vec());
    let rule = widths.iter().map(|w| "-".repeat(*w)).join("  ");
    std::iter::once(header)
        .chain(std::iter::once(rule))
        .chain(
            rows.iter()
                .map(|row| format_row(row.iter().map(String::as_str).collect())),
        )
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_padded_to_widest_cell() {
        let rendered = render_table(
            &["Pos", "Driver"],
            &[
                vec!["1".to_string(), "VER".to_string()],
                vec!["10".to_string(), "Hamilton".to_string()],
            ],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Pos  Driver");
        assert_eq!(lines[1], "---  --------");
        assert_eq!(lines[2], "1    VER");
        assert_eq!(lines[3], "10   Hamilton");
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let rendered = render_table(&["Lap", "Lap Time"], &[]);
        assert_eq!(rendered, "Lap  Lap Time\n---  --------");
    }
}
