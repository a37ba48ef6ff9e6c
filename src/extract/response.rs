use serde_json::{Map, Value};
use tracing::warn;

use crate::core::model::{fields, ExtractedRecord};

/// Shapes a chat completion into an [`ExtractedRecord`].
///
/// Models wrap the JSON object in prose often enough that the parser cuts
/// from the first `{` to the last `}` before deserializing. A completion
/// with no recoverable object still produces a record: a stub whose data
/// map carries an `extraction_error` marker and whose raw response is kept
/// for later inspection, so the record count stays aligned with the
/// segment count.
pub fn parse_completion(
    record_number: usize,
    page_numbers: &[usize],
    source_markdown: &str,
    completion: &str,
) -> ExtractedRecord {
    match recover_object(completion) {
        Some(object) => {
            let log_card_data = match object.get("logCardData") {
                Some(Value::Object(data)) => data.clone(),
                _ => Map::new(),
            };
            ExtractedRecord {
                log_card: record_number,
                page_numbers: page_numbers.to_vec(),
                log_card_data,
                original_markdown: source_markdown.to_string(),
                raw_llm_response: None,
            }
        }
        None => {
            warn!(record_number, "completion held no parseable JSON object");
            let mut log_card_data = Map::new();
            log_card_data.insert(
                fields::EXTRACTION_ERROR.to_string(),
                Value::String("JSON extraction failed".to_string()),
            );
            ExtractedRecord {
                log_card: record_number,
                page_numbers: page_numbers.to_vec(),
                log_card_data,
                original_markdown: source_markdown.to_string(),
                raw_llm_response: Some(completion.to_string()),
            }
        }
    }
}

fn recover_object(completion: &str) -> Option<Map<String, Value>> {
    let start = completion.find('{')?;
    let end = completion.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str::<Value>(&completion[start..=end]) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}
