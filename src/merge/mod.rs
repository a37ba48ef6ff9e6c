pub mod fields;

use crate::core::model::{ExtractedRecord, MergedRecord, PairInfo, SourceTextPair};
use fields::merge_fields;

/// Folds a front record and an optional back record into one logical card.
///
/// Without a back side the merge degenerates to the front as-is. Page
/// numbers union into a sorted, deduplicated list; both source texts are
/// kept, and the pair records where each half came from.
pub fn merge_pair(front: &ExtractedRecord, back: Option<&ExtractedRecord>) -> MergedRecord {
    let log_card_data = match back {
        Some(back) => merge_fields(&front.log_card_data, &back.log_card_data),
        None => front.log_card_data.clone(),
    };

    let mut page_numbers = front.page_numbers.clone();
    if let Some(back) = back {
        page_numbers.extend(back.page_numbers.iter().copied());
    }
    page_numbers.sort_unstable();
    page_numbers.dedup();

    MergedRecord {
        log_card: front.log_card,
        page_numbers,
        log_card_data,
        original_markdown: SourceTextPair {
            front: front.original_markdown.clone(),
            back: back.map(|b| b.original_markdown.clone()),
        },
        pair_info: PairInfo {
            front: front.log_card,
            back: back.map(|b| b.log_card),
        },
    }
}

/// Walks extraction results two at a time: element i is the recto, i+1 the
/// verso of the same physical card. The caller is responsible for passing
/// the records in segment-generation order.
pub fn consolidate(records: &[ExtractedRecord]) -> Vec<MergedRecord> {
    records
        .chunks(2)
        .map(|pair| merge_pair(&pair[0], pair.get(1)))
        .collect()
}
