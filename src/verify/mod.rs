use serde::Deserialize;
use serde_json::{Map, Value};
use strsim::normalized_levenshtein;
use unicode_normalization::UnicodeNormalization;

use crate::core::model::{fields, ConsolidatedDocument};

/// Reference records to validate an extraction run against, in the same
/// `logCards` shape the pipeline emits.
#[derive(Debug, Clone, Deserialize)]
pub struct GroundTruthDocument {
    #[serde(rename = "logCards")]
    pub log_cards: Vec<GroundTruthCard>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroundTruthCard {
    #[serde(rename = "logCard")]
    pub log_card: usize,
    #[serde(rename = "logCardData", default)]
    pub log_card_data: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Correct,
    Incorrect,
    /// The reference has no value for this field.
    NoGroundTruth,
    /// Both sides empty: nothing to verify, nothing wrong.
    BothEmpty,
}

#[derive(Debug, Clone)]
pub struct FieldComparison {
    pub field: String,
    pub extracted: String,
    pub expected: String,
    pub status: FieldStatus,
    /// Normalized Levenshtein of the folded values, reported for misses
    /// so near-hits are easy to spot in the summary.
    pub similarity: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct RecordComparison {
    pub log_card: usize,
    pub has_reference: bool,
    pub fields: Vec<FieldComparison>,
}

#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    pub records: Vec<RecordComparison>,
}

impl VerificationReport {
    pub fn counts(&self) -> FieldCounts {
        let mut counts = FieldCounts::default();
        for record in &self.records {
            for field in &record.fields {
                match field.status {
                    FieldStatus::Correct => counts.correct += 1,
                    FieldStatus::Incorrect => counts.incorrect += 1,
                    FieldStatus::NoGroundTruth => counts.no_ground_truth += 1,
                    FieldStatus::BothEmpty => counts.both_empty += 1,
                }
            }
        }
        counts
    }

    /// Correct over verifiable (correct + incorrect) fields.
    pub fn accuracy(&self) -> f64 {
        let counts = self.counts();
        let verifiable = counts.correct + counts.incorrect;
        if verifiable == 0 {
            return 0.0;
        }
        counts.correct as f64 / verifiable as f64
    }

    pub fn render_text(&self) -> String {
        let counts = self.counts();
        let mut out = String::new();
        for record in &self.records {
            if !record.has_reference {
                out.push_str(&format!(
                    "LogCard {}: no reference record\n",
                    record.log_card
                ));
                continue;
            }
            out.push_str(&format!("LogCard {}:\n", record.log_card));
            for field in &record.fields {
                match field.status {
                    FieldStatus::Correct => {
                        out.push_str(&format!("  {:<28} ok\n", field.field));
                    }
                    FieldStatus::Incorrect => {
                        let similarity = field.similarity.unwrap_or(0.0);
                        out.push_str(&format!(
                            "  {:<28} MISMATCH got {:?}, expected {:?} (similarity {:.2})\n",
                            field.field, field.extracted, field.expected, similarity
                        ));
                    }
                    FieldStatus::NoGroundTruth => {
                        out.push_str(&format!("  {:<28} no reference\n", field.field));
                    }
                    FieldStatus::BothEmpty => {
                        out.push_str(&format!("  {:<28} empty on both sides\n", field.field));
                    }
                }
            }
        }
        out.push_str(&format!(
            "fields: {} correct, {} incorrect, {} without reference, {} empty ({:.1}% accuracy)\n",
            counts.correct,
            counts.incorrect,
            counts.no_ground_truth,
            counts.both_empty,
            self.accuracy() * 100.0
        ));
        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldCounts {
    pub correct: usize,
    pub incorrect: usize,
    pub no_ground_truth: usize,
    pub both_empty: usize,
}

/// Compares every extracted record against the reference record with the
/// same `logCard` id, field by field over the reference's keys.
pub fn compare_documents(
    extracted: &ConsolidatedDocument,
    truth: &GroundTruthDocument,
) -> VerificationReport {
    let mut report = VerificationReport::default();

    for card in &extracted.log_cards {
        let reference = truth
            .log_cards
            .iter()
            .find(|t| t.log_card == card.log_card);

        let Some(reference) = reference else {
            report.records.push(RecordComparison {
                log_card: card.log_card,
                has_reference: false,
                fields: Vec::new(),
            });
            continue;
        };

        let mut field_rows = Vec::new();
        for (field_name, expected) in &reference.log_card_data {
            let extracted_value = card.field(field_name);
            field_rows.push(compare_field(field_name, extracted_value, expected));
        }
        report.records.push(RecordComparison {
            log_card: card.log_card,
            has_reference: true,
            fields: field_rows,
        });
    }
    report
}

fn compare_field(
    field_name: &str,
    extracted: Option<&Value>,
    expected: &Value,
) -> FieldComparison {
    let extracted_display = display_value(extracted.unwrap_or(&Value::Null));
    let expected_display = display_value(expected);
    let status = validate_field(field_name, &extracted_display, &expected_display);
    let similarity = (status == FieldStatus::Incorrect)
        .then(|| normalized_levenshtein(&fold(&extracted_display), &fold(&expected_display)));
    FieldComparison {
        field: field_name.to_string(),
        extracted: extracted_display,
        expected: expected_display,
        status,
        similarity,
    }
}

/// Field equality after folding. `Name` is special: the reference
/// designation only has to be contained in the extracted one, since the
/// cards often append type suffixes the reference omits.
pub fn validate_field(field_name: &str, extracted: &str, expected: &str) -> FieldStatus {
    let extracted_folded = fold(extracted);
    let expected_folded = fold(expected);

    if expected_folded.is_empty() {
        return if extracted_folded.is_empty() {
            FieldStatus::BothEmpty
        } else {
            FieldStatus::NoGroundTruth
        };
    }
    if extracted_folded.is_empty() {
        return FieldStatus::Incorrect;
    }
    let matches = if field_name == fields::NAME {
        extracted_folded.contains(&expected_folded)
    } else {
        extracted_folded == expected_folded
    };
    if matches {
        FieldStatus::Correct
    } else {
        FieldStatus::Incorrect
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Comparison key: NFKD with combining marks stripped (accents vary
/// between the scans and the reference sheets), lowercased, whitespace
/// collapsed, null spellings erased.
fn fold(value: &str) -> String {
    let stripped: String = value
        .nfkd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect();
    let folded = stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    match folded.as_str() {
        "null" | "none" => String::new(),
        _ => folded,
    }
}
