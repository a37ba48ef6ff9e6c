use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::core::ledger::ProcessingLedger;
use crate::core::model::{ConsolidatedDocument, DocumentInfo, ExtractedRecord, Segment};
use crate::core::retry::{with_retry, BackoffPolicy};
use crate::core::segmenter::{generate_segments, StructureConfig};
use crate::core::token::TokenPage;
use crate::export::{Exporter, JsonExporter, TableExporter};
use crate::extract::prompt::build_prompt;
use crate::extract::response::parse_completion;
use crate::extract::ChatBackend;
use crate::layout::{page_markdown, LayoutOptions};
use crate::merge::consolidate;
use crate::ocr::{page_count, OcrEngine, PageRenderer};

const MERGE_NOTE: &str =
    "recto/verso consolidation: null fields of the front face are filled from the back face";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub dpi: u32,
    pub structure: StructureConfig,
    pub layout: LayoutOptions,
    pub max_attempts: u32,
    pub ocr_backoff: BackoffPolicy,
    pub chat_backoff: BackoffPolicy,
    /// Run label recorded in `documentInfo`; the pipeline never reads a
    /// clock, so identity comes from the caller.
    pub analysis_label: String,
}

impl PipelineConfig {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        let analysis_label = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        Self {
            input,
            output,
            dpi: 200,
            structure: StructureConfig::default(),
            layout: LayoutOptions::default(),
            max_attempts: 3,
            ocr_backoff: BackoffPolicy::Linear(std::time::Duration::from_secs(5)),
            chat_backoff: BackoffPolicy::Linear(std::time::Duration::from_secs(3)),
            analysis_label,
        }
    }

    pub fn with_structure(mut self, structure: StructureConfig) -> Self {
        self.structure = structure;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }
}

/// Full run over one scanned booklet: segment plan, per-segment raster +
/// OCR + layout + extraction, recto/verso consolidation.
///
/// Failures stay per-segment: an exhausted OCR or chat call marks the
/// segment failed and processing continues, so the run reports partial
/// success instead of aborting. Only a plan with zero usable segments is
/// fatal.
pub fn build_document(
    config: &PipelineConfig,
    ocr: &dyn OcrEngine,
    chat: &dyn ChatBackend,
) -> Result<ConsolidatedDocument> {
    let total_pages = page_count(&config.input)?;
    let segments = generate_segments(total_pages, &config.structure);
    if segments.is_empty() {
        anyhow::bail!(
            "structure configuration produced no segments for {} pages",
            total_pages
        );
    }
    info!(total_pages, segments = segments.len(), "segment plan ready");

    let renderer = PageRenderer::new(config.output.join("pages"), config.dpi);
    let mut ledger: ProcessingLedger<ExtractedRecord> = ProcessingLedger::new(segments.len());

    for (position, segment) in segments.iter().enumerate() {
        let record_number = position + 1;
        match process_segment(config, &renderer, ocr, chat, segment, record_number) {
            Ok(record) => {
                info!(record_number, pages = ?segment.pages, "segment extracted");
                ledger.mark_complete(position, record);
            }
            Err(err) => {
                warn!(record_number, error = %err, "segment failed, continuing");
                ledger.mark_failed(position);
            }
        }
    }

    let summary = ledger.summary();
    info!(%summary, "extraction finished");
    if ledger.completed_count() == 0 {
        anyhow::bail!("no segment could be processed ({summary})");
    }

    let records = ledger.into_results();
    Ok(consolidate_document(
        records,
        &config.input,
        total_pages,
        segments.len(),
        &config.analysis_label,
    ))
}

fn process_segment(
    config: &PipelineConfig,
    renderer: &PageRenderer,
    ocr: &dyn OcrEngine,
    chat: &dyn ChatBackend,
    segment: &Segment,
    record_number: usize,
) -> Result<ExtractedRecord> {
    let mut token_pages = Vec::with_capacity(segment.pages.len());
    for &page_number in &segment.pages {
        let rendered = renderer
            .render_page(&config.input, page_number)
            .with_context(|| format!("failed to rasterize page {page_number}"))?;
        let token_page = with_retry(config.max_attempts, config.ocr_backoff, || {
            ocr.recognize_page(&rendered.path)
        })
        .with_context(|| format!("OCR failed for page {page_number}"))?;
        token_pages.push(token_page);
    }
    extract_segment_record(config, segment, record_number, &token_pages, chat)
}

/// Extraction for one segment whose pages are already recognized. The
/// seam the integration tests (and callers with their own raster/OCR
/// wiring) drive directly.
pub fn extract_segment_record(
    config: &PipelineConfig,
    segment: &Segment,
    record_number: usize,
    token_pages: &[TokenPage],
    chat: &dyn ChatBackend,
) -> Result<ExtractedRecord> {
    let markdown = segment_markdown(token_pages, &config.layout);
    let prompt = build_prompt(
        record_number,
        segment.start_page,
        segment.end_page,
        &markdown,
    );
    let completion = with_retry(config.max_attempts, config.chat_backoff, || {
        chat.complete(&prompt)
    })
    .with_context(|| format!("extraction failed for record {record_number}"))?;
    Ok(parse_completion(
        record_number,
        &segment.pages,
        &markdown,
        &completion,
    ))
}

/// Rendered reading text of a whole segment: one layout per page, joined
/// with horizontal rules.
pub fn segment_markdown(token_pages: &[TokenPage], options: &LayoutOptions) -> String {
    token_pages
        .iter()
        .map(|page| page_markdown(page, options))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Consolidates extraction results into the final document: recto/verso
/// pairing plus run metadata.
pub fn consolidate_document(
    records: Vec<ExtractedRecord>,
    source_file: &Path,
    total_pages: usize,
    total_segments: usize,
    analysis_label: &str,
) -> ConsolidatedDocument {
    let segments_processed = records.len();
    let log_cards = consolidate(&records);
    ConsolidatedDocument {
        document_info: DocumentInfo {
            source_file: source_file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            total_pages,
            total_log_cards: log_cards.len(),
            segments_processed,
            total_segments,
            analysis_label: analysis_label.to_string(),
            note: MERGE_NOTE.to_string(),
        },
        log_cards,
    }
}

/// Writes every export format next to each other in the output directory.
pub fn export_document(document: &ConsolidatedDocument, output: &Path) -> Result<()> {
    let json_exporter = JsonExporter::new(output.to_path_buf());
    json_exporter.export(document)?;

    let table_exporter = TableExporter::new(output.to_path_buf());
    table_exporter.export(document)?;

    Ok(())
}
