use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::token::TokenPage;
use crate::ocr::OcrEngine;

/// Shells out to an OCR helper script that prints one page's token payload
/// (`rec_texts`/`rec_scores` plus `rec_boxes` or `rec_polys`) as JSON on
/// stdout.
#[derive(Debug, Clone)]
pub struct OcrBridge {
    script_path: PathBuf,
    lang: String,
}

impl OcrBridge {
    pub fn new() -> Self {
        Self {
            script_path: PathBuf::from("bridge/ocr_bridge.py"),
            lang: "fr".to_string(),
        }
    }

    pub fn with_script(mut self, script_path: PathBuf) -> Self {
        self.script_path = script_path;
        self
    }

    pub fn with_lang(mut self, lang: String) -> Self {
        self.lang = lang;
        self
    }
}

impl Default for OcrBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for OcrBridge {
    fn recognize_page(&self, image: &Path) -> Result<TokenPage> {
        let output = Command::new("python3")
            .arg(&self.script_path)
            .arg("--image")
            .arg(image)
            .arg("--lang")
            .arg(&self.lang)
            .output()
            .with_context(|| "failed to invoke OCR bridge")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("OCR bridge failed: {stderr}");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let page: TokenPage = serde_json::from_str(&stdout)
            .with_context(|| "failed to parse OCR JSON response")?;
        Ok(page)
    }
}
