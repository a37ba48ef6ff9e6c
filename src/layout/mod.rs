pub mod columns;
pub mod render;
pub mod rows;

use crate::core::token::{normalize_tokens, TokenPage};

/// Tunables of the token-to-layout reconstruction.
///
/// The observed production values differ slightly between call sites, so
/// none of these are hard-coded constants.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Tokens below this recognition confidence never enter a row.
    pub confidence_threshold: f32,
    /// Row y-tolerance as a fraction of the median token height.
    pub row_tolerance_ratio: f32,
    /// Column cut threshold as a fraction of the row's average token width.
    pub min_gap_ratio: f32,
    pub min_cols: usize,
    pub max_cols: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.30,
            row_tolerance_ratio: 0.6,
            min_gap_ratio: 0.35,
            min_cols: 2,
            max_cols: 10,
        }
    }
}

/// Reading text for one page: a non-empty pre-rendered markdown field wins;
/// otherwise the table is reconstructed from raw token geometry.
pub fn page_markdown(page: &TokenPage, options: &LayoutOptions) -> String {
    if let Some(markdown) = &page.markdown {
        if !markdown.trim().is_empty() {
            return markdown.clone();
        }
    }
    table_from_tokens(page, options)
}

/// Markdown table reconstructed from raw tokens. A page without usable
/// geometry (or with every token filtered out) renders as an empty string,
/// which downstream extraction treats as a mostly-null card, not an error.
pub fn table_from_tokens(page: &TokenPage, options: &LayoutOptions) -> String {
    let tokens = normalize_tokens(page, options.confidence_threshold);
    if tokens.is_empty() {
        return String::new();
    }
    let rows = rows::cluster_rows(&tokens, options.row_tolerance_ratio);
    if rows.is_empty() {
        return String::new();
    }
    render::render_table(&rows, options)
}

/// Plain-text fallback rendering of the same token population.
pub fn lines_from_tokens(page: &TokenPage, options: &LayoutOptions) -> String {
    let tokens = normalize_tokens(page, options.confidence_threshold);
    if tokens.is_empty() {
        return String::new();
    }
    let rows = rows::cluster_rows(&tokens, options.row_tolerance_ratio);
    render::render_lines(&rows)
}
