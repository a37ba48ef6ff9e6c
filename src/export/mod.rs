pub mod json_export;
pub mod table_export;

use anyhow::Result;

use crate::core::model::ConsolidatedDocument;

pub use json_export::JsonExporter;
pub use table_export::TableExporter;

pub trait Exporter {
    fn export(&self, document: &ConsolidatedDocument) -> Result<()>;
}
