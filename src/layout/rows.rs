use crate::core::token::Token;

/// Groups tokens into reading-order rows.
///
/// Tokens are sorted by (center_y, center_x) first, so clustering is
/// insensitive to input order. The y-tolerance band derives from the
/// median token height over the whole population:
/// `max(8.0, ratio × median_height)`.
///
/// A row's anchor y is the first token assigned to it, not a running
/// mean, so a slowly drifting baseline stays in one row until it leaves
/// the band around that first token.
pub fn cluster_rows(tokens: &[Token], tolerance_ratio: f32) -> Vec<Vec<Token>> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<Token> = tokens.to_vec();
    sorted.sort_by(|a, b| {
        a.center_y
            .total_cmp(&b.center_y)
            .then(a.center_x.total_cmp(&b.center_x))
    });

    let tolerance = (tolerance_ratio * median_height(&sorted)).max(8.0);

    let mut rows: Vec<Vec<Token>> = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut anchor_y = f32::NAN;

    for token in sorted {
        if current.is_empty() || (token.center_y - anchor_y).abs() <= tolerance {
            if current.is_empty() {
                anchor_y = token.center_y;
            }
            current.push(token);
        } else {
            rows.push(finish_row(current));
            anchor_y = token.center_y;
            current = vec![token];
        }
    }
    if !current.is_empty() {
        rows.push(finish_row(current));
    }
    rows
}

fn finish_row(mut row: Vec<Token>) -> Vec<Token> {
    row.sort_by(|a, b| a.center_x.total_cmp(&b.center_x));
    row
}

fn median_height(sorted_tokens: &[Token]) -> f32 {
    let mut heights: Vec<f32> = sorted_tokens.iter().map(Token::height).collect();
    heights.sort_by(f32::total_cmp);
    let mid = heights.len() / 2;
    if heights.len() % 2 == 1 {
        heights[mid]
    } else {
        0.5 * (heights[mid - 1] + heights[mid])
    }
}
