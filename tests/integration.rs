use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use serde_json::json;

use kardex::core::model::fields;
use kardex::core::retry::BackoffPolicy;
use kardex::core::segmenter::{generate_segments, IsolatedCard, StructureConfig};
use kardex::core::token::TokenPage;
use kardex::extract::ChatBackend;
use kardex::layout::{page_markdown, LayoutOptions};
use kardex::pipeline::{
    consolidate_document, export_document, extract_segment_record, segment_markdown,
    PipelineConfig,
};
use kardex::verify::{compare_documents, GroundTruthDocument};

fn temp_output_dir(prefix: &str) -> PathBuf {
    let mut out = std::env::temp_dir();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    let pid = std::process::id();
    out.push(format!("{prefix}-{pid}-{now}"));
    out
}

/// Chat backend that answers from the LogCard number found in the prompt.
struct CannedChat;

impl ChatBackend for CannedChat {
    fn complete(&self, prompt: &str) -> Result<String> {
        if prompt.contains("CONTENT OF LOGCARD 1 ") {
            Ok(r#"Sure, here is the JSON:
{"logCard": 1, "logCardData": {"ATA": "22", "Name": "VERIN SEMA", "SN": null, "TSN_Part": "00:00", "CSN_Part": 0}}"#
                .to_string())
        } else if prompt.contains("CONTENT OF LOGCARD 2 ") {
            Ok(r#"{"logCard": 2, "logCardData": {"ATA": "N/A", "Name": null, "SN": "1202", "Inventory_lifed_components": true}}"#
                .to_string())
        } else {
            Ok("no structured data found on these pages".to_string())
        }
    }
}

fn front_page() -> TokenPage {
    TokenPage::from_boxes(
        vec![
            "Name".into(),
            "VERIN".into(),
            "SEMA".into(),
            "Serial".into(),
            "Number".into(),
            "smudge".into(),
        ],
        vec![
            json!(0.98),
            json!(0.95),
            json!("0.93"),
            json!(0.9),
            json!(0.9),
            json!(0.05),
        ],
        vec![
            [0.0, 10.0, 60.0, 24.0],
            [300.0, 10.0, 360.0, 24.0],
            [366.0, 10.0, 420.0, 24.0],
            [0.0, 50.0, 60.0, 64.0],
            [66.0, 50.0, 140.0, 64.0],
            [300.0, 50.0, 330.0, 64.0],
        ],
    )
}

fn back_page() -> TokenPage {
    TokenPage::from_boxes(
        vec!["AH".into(), "01/03/2019".into(), "0H".into()],
        vec![json!(0.9), json!(0.92), json!(0.88)],
        vec![
            [0.0, 10.0, 30.0, 24.0],
            [100.0, 10.0, 220.0, 24.0],
            [400.0, 10.0, 430.0, 24.0],
        ],
    )
}

fn test_config() -> PipelineConfig {
    let mut config = PipelineConfig::new(
        PathBuf::from("LOGCARDS-INVENTORY.pdf"),
        PathBuf::from("unused"),
    );
    config.ocr_backoff = BackoffPolicy::None;
    config.chat_backoff = BackoffPolicy::None;
    config
}

#[test]
fn full_pipeline_with_synthetic_segments() -> Result<()> {
    // Page 1 is a title page; four content pages pair into two segments.
    let structure = StructureConfig {
        title_pages: vec![1],
        logcard_start_page: 2,
        ..StructureConfig::default()
    };
    let total_pages = 5;
    let segments = generate_segments(total_pages, &structure);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].pages, vec![2, 3]);
    assert_eq!(segments[1].pages, vec![4, 5]);

    let config = test_config();
    let chat = CannedChat;

    let mut records = Vec::new();
    for (position, segment) in segments.iter().enumerate() {
        let token_pages = vec![front_page(), back_page()];
        let record =
            extract_segment_record(&config, segment, position + 1, &token_pages, &chat)?;
        records.push(record);
    }

    // The low-confidence smudge never reaches the prompt text.
    assert!(!records[0].original_markdown.contains("smudge"));
    assert!(records[0].original_markdown.contains("VERIN SEMA"));

    let document = consolidate_document(
        records,
        &config.input,
        total_pages,
        segments.len(),
        "LOGCARDS-INVENTORY",
    );

    // Two faces folded into one logical card; front wins except nulls.
    assert_eq!(document.log_cards.len(), 1);
    let card = &document.log_cards[0];
    assert_eq!(card.log_card_data["ATA"], json!("22"));
    assert_eq!(card.log_card_data["Name"], json!("VERIN SEMA"));
    assert_eq!(card.log_card_data["SN"], json!("1202"));
    assert_eq!(card.log_card_data["Inventory_lifed_components"], json!(true));
    assert_eq!(card.page_numbers, vec![2, 3, 4, 5]);
    assert_eq!(card.pair_info.front, 1);
    assert_eq!(card.pair_info.back, Some(2));
    assert!(card.original_markdown.back.is_some());

    // Export both artifacts and check they round-trip.
    let out = temp_output_dir("kardex-integration");
    fs::create_dir_all(&out)?;
    export_document(&document, &out)?;

    let json_raw = fs::read_to_string(out.join("logcards.json"))?;
    assert!(json_raw.contains("VERIN SEMA"));
    assert!(json_raw.contains("documentInfo"));

    let csv_raw = fs::read_to_string(out.join("logcards.csv"))?;
    assert!(csv_raw.contains("Kardex No"));
    assert!(csv_raw.contains("22-??-????"));
    assert!(csv_raw.contains("00:00 FH & 0 & ?? OCY"));
    assert!(csv_raw.contains("HT LLP"));

    let _ = fs::remove_dir_all(&out);
    Ok(())
}

#[test]
fn garbage_completion_still_yields_a_record() -> Result<()> {
    let structure = StructureConfig::default();
    let segments = generate_segments(2, &structure);
    assert_eq!(segments.len(), 1);

    let config = test_config();
    // Record number 3 gets the unstructured canned answer.
    let record = extract_segment_record(
        &config,
        &segments[0],
        3,
        &[front_page(), back_page()],
        &CannedChat,
    )?;

    assert!(record.log_card_data.contains_key(fields::EXTRACTION_ERROR));
    assert!(record.raw_llm_response.is_some());
    assert_eq!(record.page_numbers, vec![1, 2]);
    Ok(())
}

#[test]
fn isolated_cards_shift_the_scan() {
    let structure = StructureConfig {
        title_pages: vec![1],
        logcard_start_page: 2,
        isolated_logcards: vec![IsolatedCard { page: 6, size: 1 }],
        ..StructureConfig::default()
    };
    let segments = generate_segments(10, &structure);
    let pages: Vec<Vec<usize>> = segments.iter().map(|s| s.pages.clone()).collect();
    assert_eq!(
        pages,
        vec![vec![2, 3], vec![4, 5], vec![6], vec![7, 8], vec![9, 10]]
    );
}

#[test]
fn rendered_table_preserves_surviving_token_texts() {
    // Re-parsing the table cells must recover every token that passed the
    // confidence filter.
    let options = LayoutOptions::default();
    let markdown = page_markdown(&front_page(), &options);

    let cell_text: String = markdown
        .lines()
        .skip(2)
        .flat_map(|line| line.split('|'))
        .collect::<Vec<_>>()
        .join(" ");
    for token in ["Name", "VERIN", "SEMA", "Serial", "Number"] {
        assert!(cell_text.contains(token), "missing token {token}");
    }
    assert!(!cell_text.contains("smudge"));
}

#[test]
fn verification_report_flags_mismatches() -> Result<()> {
    let config = test_config();
    let structure = StructureConfig {
        title_pages: vec![1],
        logcard_start_page: 2,
        ..StructureConfig::default()
    };
    let segments = generate_segments(5, &structure);

    let mut records = Vec::new();
    for (position, segment) in segments.iter().enumerate() {
        records.push(extract_segment_record(
            &config,
            segment,
            position + 1,
            &[front_page(), back_page()],
            &CannedChat,
        )?);
    }
    let document =
        consolidate_document(records, &config.input, 5, segments.len(), "test-run");

    let truth: GroundTruthDocument = serde_json::from_value(json!({
        "logCards": [{
            "logCard": 1,
            "logCardData": {
                "ATA": "22",
                "Name": "vérin sema",
                "SN": "9999"
            }
        }]
    }))?;

    let report = compare_documents(&document, &truth);
    let counts = report.counts();
    // ATA and the accent-folded Name match; the serial does not.
    assert_eq!(counts.correct, 2);
    assert_eq!(counts.incorrect, 1);
    assert!(report.render_text().contains("MISMATCH"));
    Ok(())
}

#[test]
fn segment_markdown_handles_tokenless_pages() {
    let options = LayoutOptions::default();
    let markdown = segment_markdown(&[TokenPage::default(), front_page()], &options);
    // The empty page contributes an empty layout, not a failure.
    assert!(markdown.starts_with("\n\n---\n\n"));
    assert!(markdown.contains("VERIN"));
}
