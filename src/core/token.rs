use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::geometry::{Extent, GeometrySource};

/// Raw recognition payload for one page, in the OCR engine's native shape.
///
/// Engines disagree on geometry: some report axis-aligned boxes
/// (`rec_boxes`), others four-point polygons (`rec_polys`, sometimes under
/// the detector's `dt_polys` key). Scores arrive as numbers or strings.
/// Some engines additionally ship a pre-rendered `markdown` of the page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenPage {
    #[serde(default)]
    pub rec_texts: Vec<String>,
    #[serde(default)]
    pub rec_scores: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rec_boxes: Option<Vec<[f32; 4]>>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "dt_polys")]
    pub rec_polys: Option<Vec<Vec<[f32; 2]>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}

impl TokenPage {
    pub fn from_boxes(texts: Vec<String>, scores: Vec<Value>, boxes: Vec<[f32; 4]>) -> Self {
        Self {
            rec_texts: texts,
            rec_scores: scores,
            rec_boxes: Some(boxes),
            ..Self::default()
        }
    }
}

/// One recognized text fragment with resolved geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub confidence: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub extent: Extent,
}

impl Token {
    pub fn height(&self) -> f32 {
        self.extent.height()
    }

    pub fn width(&self) -> f32 {
        self.extent.width()
    }
}

/// Normalizes a raw payload into confidence-filtered tokens.
///
/// Boxes win over polygons when both are present. Mismatched array lengths
/// make the page ineligible for layout reconstruction: the result is an
/// empty token list, never an error. Unparseable scores count as 0.0 and
/// fall to the confidence filter; empty-after-trim texts are dropped too.
pub fn normalize_tokens(page: &TokenPage, confidence_threshold: f32) -> Vec<Token> {
    let texts = &page.rec_texts;
    let geometries: Vec<GeometrySource> = if let Some(boxes) = &page.rec_boxes {
        if boxes.len() != texts.len() {
            return Vec::new();
        }
        boxes.iter().map(|b| GeometrySource::Box4(*b)).collect()
    } else if let Some(polys) = &page.rec_polys {
        if polys.len() != texts.len() {
            return Vec::new();
        }
        polys
            .iter()
            .map(|p| GeometrySource::Polygon(p.clone()))
            .collect()
    } else {
        return Vec::new();
    };
    if page.rec_scores.len() != texts.len() {
        return Vec::new();
    }

    let mut tokens = Vec::with_capacity(texts.len());
    for ((text, score), geometry) in texts.iter().zip(&page.rec_scores).zip(&geometries) {
        let confidence = score_to_f32(score);
        let trimmed = text.trim();
        if trimmed.is_empty() || confidence < confidence_threshold {
            continue;
        }
        let Some(resolved) = geometry.resolve() else {
            continue;
        };
        tokens.push(Token {
            text: trimmed.to_string(),
            confidence,
            center_x: resolved.center_x,
            center_y: resolved.center_y,
            extent: resolved.extent,
        });
    }
    tokens
}

fn score_to_f32(score: &Value) -> f32 {
    match score {
        Value::Number(n) => n.as_f64().unwrap_or(0.0) as f32,
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
