use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::model::{Segment, SegmentKind, SpecialMark};

/// Document structure description, typically loaded from a JSON file next
/// to the scanned booklet.
///
/// When `manual_segments` is present it wins outright; otherwise the
/// automatic scan rule applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    pub manual_segments: Option<Vec<ManualSegment>>,
    pub title_pages: Vec<usize>,
    pub non_logcard_pages: Vec<usize>,
    pub isolated_logcards: Vec<IsolatedCard>,
    pub logcard_start_page: usize,
    pub default_logcard_size: usize,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            manual_segments: None,
            title_pages: Vec::new(),
            non_logcard_pages: Vec::new(),
            isolated_logcards: Vec::new(),
            logcard_start_page: 1,
            default_logcard_size: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualSegment {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    pub pages: Vec<usize>,
}

/// A card whose raw pages deviate from the default span, keyed by its
/// first page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolatedCard {
    pub page: usize,
    pub size: usize,
}

/// Generates the ordered segment plan for a document.
///
/// Pure in both modes: same `(total_pages, config)` in, same plan out.
/// Segment pages are contiguous, ascending and non-overlapping; the final
/// segment is clipped so it never runs past `total_pages`.
pub fn generate_segments(total_pages: usize, config: &StructureConfig) -> Vec<Segment> {
    match &config.manual_segments {
        Some(entries) => manual_segmentation(entries),
        None => automatic_segmentation(total_pages, config),
    }
}

fn manual_segmentation(entries: &[ManualSegment]) -> Vec<Segment> {
    let mut segments = Vec::new();
    // The index keeps the position in the full manual list, so skipped
    // non-logcard entries still consume one.
    for (index, entry) in entries.iter().enumerate() {
        if entry.kind != SegmentKind::Logcard || entry.pages.is_empty() {
            continue;
        }
        let mut pages = entry.pages.clone();
        pages.sort_unstable();
        pages.dedup();
        segments.push(Segment {
            start_page: pages[0],
            end_page: pages[pages.len() - 1],
            pages,
            kind: SegmentKind::Logcard,
            index,
            special: None,
        });
    }
    segments
}

fn automatic_segmentation(total_pages: usize, config: &StructureConfig) -> Vec<Segment> {
    let skipped: BTreeSet<usize> = config
        .title_pages
        .iter()
        .chain(&config.non_logcard_pages)
        .copied()
        .collect();
    let isolated: BTreeMap<usize, usize> = config
        .isolated_logcards
        .iter()
        .map(|card| (card.page, card.size))
        .collect();

    let default_size = config.default_logcard_size.max(1);
    let mut segments = Vec::new();
    let mut current_page = config.logcard_start_page.max(1);
    let mut segment_index = 0;

    while current_page <= total_pages {
        if skipped.contains(&current_page) {
            // Skipped pages belong to no segment and consume no index.
            current_page += 1;
            continue;
        }

        let (size, special) = match isolated.get(&current_page) {
            Some(size) => ((*size).max(1), Some(SpecialMark::Isolated)),
            None => (default_size, None),
        };
        let end_page = (current_page + size - 1).min(total_pages);
        segments.push(Segment {
            pages: (current_page..=end_page).collect(),
            kind: SegmentKind::Logcard,
            start_page: current_page,
            end_page,
            index: segment_index,
            special,
        });
        current_page += size;
        segment_index += 1;
    }
    segments
}
