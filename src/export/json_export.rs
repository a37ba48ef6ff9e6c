use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::ConsolidatedDocument;
use crate::export::Exporter;

/// Writes the consolidated `documentInfo` + `logCards` JSON.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, document: &ConsolidatedDocument) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("logcards.json");
        let data = serde_json::to_string_pretty(document)?;
        fs::write(path, data)?;
        Ok(())
    }
}
