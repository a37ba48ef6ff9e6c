use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical field keys of a LogCard record, as the extraction schema and
/// the flattened table export spell them.
pub mod fields {
    pub const ATA: &str = "ATA";
    pub const NAME: &str = "Name";
    pub const MANUFACTURER_PN: &str = "Manufacturer_PN";
    pub const SN: &str = "SN";
    pub const INSTALL_DATE_AC: &str = "install_Date_AC";
    pub const TSN_AC: &str = "TSN_AC";
    pub const CSN_AC: &str = "CSN_AC";
    pub const TSN_PART: &str = "TSN_Part";
    pub const CSN_PART: &str = "CSN_Part";
    pub const INVENTORY_LIFED_COMPONENTS: &str = "Inventory_lifed_components";

    /// Marker key set on stub records when the completion held no JSON.
    pub const EXTRACTION_ERROR: &str = "extraction_error";

    pub const ALL: [&str; 10] = [
        ATA,
        NAME,
        MANUFACTURER_PN,
        SN,
        INSTALL_DATE_AC,
        TSN_AC,
        CSN_AC,
        TSN_PART,
        CSN_PART,
        INVENTORY_LIFED_COMPONENTS,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Logcard,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpecialMark {
    Isolated,
    Normal,
}

/// One contiguous page range produced by segmentation, intended to hold
/// the raw pages of one LogCard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub pages: Vec<usize>,
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    pub start_page: usize,
    pub end_page: usize,
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<SpecialMark>,
}

impl Segment {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Structured output of the LLM extraction step for one segment.
///
/// `log_card_data` stays an open map rather than a fixed struct: the merge
/// walks the key union of both faces, and completions occasionally carry
/// keys beyond the canonical schema that are worth keeping for inspection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    pub log_card: usize,
    pub page_numbers: Vec<usize>,
    pub log_card_data: Map<String, Value>,
    pub original_markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_llm_response: Option<String>,
}

impl ExtractedRecord {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.log_card_data.get(key)
    }
}

/// Front and back source text of a consolidated record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceTextPair {
    #[serde(rename = "front_page_markdown")]
    pub front: String,
    #[serde(rename = "back_page_markdown")]
    pub back: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairInfo {
    #[serde(rename = "front_logCard_index")]
    pub front: usize,
    #[serde(rename = "back_logCard_index")]
    pub back: Option<usize>,
}

/// One logical LogCard after recto/verso consolidation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MergedRecord {
    pub log_card: usize,
    pub page_numbers: Vec<usize>,
    pub log_card_data: Map<String, Value>,
    pub original_markdown: SourceTextPair,
    pub pair_info: PairInfo,
}

impl MergedRecord {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.log_card_data.get(key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub source_file: String,
    pub total_pages: usize,
    pub total_log_cards: usize,
    pub segments_processed: usize,
    pub total_segments: usize,
    /// Caller-supplied run label; the core never reads a clock.
    pub analysis_label: String,
    pub note: String,
}

/// Final pipeline output: document metadata plus consolidated records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedDocument {
    pub document_info: DocumentInfo,
    pub log_cards: Vec<MergedRecord>,
}
