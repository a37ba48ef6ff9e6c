use crate::core::token::Token;

/// Splits one left-to-right sorted row into columns on large horizontal
/// gaps.
///
/// The cut threshold is `min_gap_ratio × average token width` of that row
/// (average floored at 1.0). A single-token row yields a single
/// single-cell column.
pub fn split_columns(row: &[Token], min_gap_ratio: f32) -> Vec<Vec<Token>> {
    if row.is_empty() {
        return Vec::new();
    }

    let avg_width = (row.iter().map(Token::width).sum::<f32>() / row.len() as f32).max(1.0);
    let threshold = min_gap_ratio * avg_width;

    let mut columns: Vec<Vec<Token>> = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut prev: Option<&Token> = None;
    for token in row {
        if let Some(prev) = prev {
            let gap = token.extent.x_min - prev.extent.x_max;
            if gap > threshold {
                columns.push(std::mem::take(&mut current));
            }
        }
        current.push(token.clone());
        prev = Some(token);
    }
    columns.push(current);
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Extent;

    fn token(text: &str, x_min: f32, x_max: f32) -> Token {
        Token {
            text: text.to_string(),
            confidence: 0.9,
            center_x: 0.5 * (x_min + x_max),
            center_y: 10.0,
            extent: Extent::new(x_min, 4.0, x_max, 16.0),
        }
    }

    fn cell_texts(columns: &[Vec<Token>]) -> Vec<Vec<&str>> {
        columns
            .iter()
            .map(|col| col.iter().map(|t| t.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn splits_on_wide_gaps_only() {
        // Widths 40 each, average 40, threshold 14. The 4-unit gap keeps
        // "part number" together; the 60-unit gap opens a second column.
        let row = vec![
            token("part", 0.0, 40.0),
            token("number", 44.0, 84.0),
            token("261087183", 144.0, 184.0),
        ];
        let columns = split_columns(&row, 0.35);
        assert_eq!(
            cell_texts(&columns),
            vec![vec!["part", "number"], vec!["261087183"]]
        );
    }

    #[test]
    fn single_token_row_is_one_cell() {
        let row = vec![token("ATA", 0.0, 30.0)];
        let columns = split_columns(&row, 0.35);
        assert_eq!(cell_texts(&columns), vec![vec!["ATA"]]);
    }

    #[test]
    fn empty_row_yields_no_columns() {
        assert!(split_columns(&[], 0.35).is_empty());
    }

    #[test]
    fn overlapping_tokens_never_split() {
        let row = vec![token("VE", 0.0, 30.0), token("RIN", 25.0, 60.0)];
        let columns = split_columns(&row, 0.35);
        assert_eq!(columns.len(), 1);
    }
}
