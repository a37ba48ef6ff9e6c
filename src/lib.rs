pub mod core;
pub mod export;
pub mod extract;
pub mod layout;
pub mod merge;
pub mod ocr;
pub mod pipeline;
pub mod verify;

pub use crate::core::model::{ConsolidatedDocument, ExtractedRecord, MergedRecord, Segment};
pub use crate::core::segmenter::{generate_segments, StructureConfig};
