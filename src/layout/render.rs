use crate::core::token::Token;
use crate::layout::columns::split_columns;
use crate::layout::LayoutOptions;

/// Plain reading-order rendering: tokens joined by spaces, rows by
/// newlines.
pub fn render_lines(rows: &[Vec<Token>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Markdown-style table rendering with a uniform column count.
///
/// Every row is split into cells, the maximum observed cell count is
/// clamped to `[min_cols, max_cols]`, and each row is padded or truncated
/// to that width so the table parses cleanly. Literal pipes inside cells
/// become slashes for the same reason.
pub fn render_table(rows: &[Vec<Token>], options: &LayoutOptions) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut line_cells: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    let mut max_observed = 0;
    for row in rows {
        let cells: Vec<String> = split_columns(row, options.min_gap_ratio)
            .iter()
            .map(|col| {
                col.iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
                    .trim()
                    .to_string()
            })
            .collect();
        max_observed = max_observed.max(cells.len());
        line_cells.push(cells);
    }
    let width = max_observed.clamp(options.min_cols, options.max_cols.max(options.min_cols));

    for cells in &mut line_cells {
        cells.resize(width, String::new());
    }

    let header = (1..=width)
        .map(|i| format!("Col {i}"))
        .collect::<Vec<_>>()
        .join(" | ");
    let separator = vec!["---"; width].join(" | ");
    let body = line_cells
        .iter()
        .map(|cells| {
            let row = cells
                .iter()
                .map(|c| c.replace('|', "/"))
                .collect::<Vec<_>>()
                .join(" | ");
            format!("| {row} |")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("| {header} |\n| {separator} |\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Extent;

    fn token(text: &str, x_min: f32, x_max: f32, cy: f32) -> Token {
        Token {
            text: text.to_string(),
            confidence: 0.9,
            center_x: 0.5 * (x_min + x_max),
            center_y: cy,
            extent: Extent::new(x_min, cy - 6.0, x_max, cy + 6.0),
        }
    }

    #[test]
    fn renders_reading_order_lines() {
        let rows = vec![
            vec![token("Serial", 0.0, 40.0, 10.0), token("Number", 44.0, 90.0, 10.0)],
            vec![token("1202", 0.0, 30.0, 40.0)],
        ];
        assert_eq!(render_lines(&rows), "Serial Number\n1202");
    }

    #[test]
    fn every_data_row_has_the_clamped_column_count() {
        let options = LayoutOptions::default();
        let rows = vec![
            vec![token("a", 0.0, 40.0, 10.0), token("b", 200.0, 240.0, 10.0)],
            vec![token("only", 0.0, 40.0, 40.0)],
            vec![
                token("x", 0.0, 40.0, 70.0),
                token("y", 200.0, 240.0, 70.0),
                token("z", 400.0, 440.0, 70.0),
            ],
        ];
        let table = render_table(&rows, &options);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "| Col 1 | Col 2 | Col 3 |");
        assert_eq!(lines[1], "| --- | --- | --- |");
        for line in &lines[2..] {
            assert_eq!(line.matches('|').count(), 4, "row: {line}");
        }
    }

    #[test]
    fn min_cols_pads_narrow_tables() {
        let options = LayoutOptions::default();
        let rows = vec![vec![token("lonely", 0.0, 40.0, 10.0)]];
        let table = render_table(&rows, &options);
        assert!(table.starts_with("| Col 1 | Col 2 |"));
    }

    #[test]
    fn max_cols_truncates_wide_rows() {
        let options = LayoutOptions {
            max_cols: 2,
            ..LayoutOptions::default()
        };
        let row: Vec<Token> = (0..4)
            .map(|i| token(&format!("c{i}"), i as f32 * 200.0, i as f32 * 200.0 + 40.0, 10.0))
            .collect();
        let table = render_table(&[row], &options);
        let data = table.lines().nth(2).unwrap();
        assert_eq!(data, "| c0 | c1 |");
    }

    #[test]
    fn pipes_in_cell_text_become_slashes() {
        let rows = vec![vec![token("AH|0H", 0.0, 40.0, 10.0)]];
        let table = render_table(&rows, &LayoutOptions::default());
        assert!(table.contains("AH/0H"));
        assert!(!table.contains("AH|0H"));
    }

    #[test]
    fn table_keeps_every_surviving_token_text() {
        let options = LayoutOptions::default();
        let rows = vec![
            vec![token("Name", 0.0, 40.0, 10.0), token("VERIN", 200.0, 240.0, 10.0)],
            vec![token("SN", 0.0, 20.0, 40.0), token("1202", 200.0, 240.0, 40.0)],
        ];
        let table = render_table(&rows, &options);
        for text in ["Name", "VERIN", "SN", "1202"] {
            assert!(table.contains(text), "missing {text}");
        }
    }
}
