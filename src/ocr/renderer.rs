use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Rasterizes single document pages to PNG via poppler's pdftoppm.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    out_dir: PathBuf,
    dpi: u32,
}

impl PageRenderer {
    pub fn new(out_dir: PathBuf, dpi: u32) -> Self {
        Self { out_dir, dpi }
    }

    /// Renders one page (1-based, matching segment page numbers).
    pub fn render_page(&self, pdf_path: &Path, page_number: usize) -> Result<RenderedPage> {
        fs::create_dir_all(&self.out_dir)?;

        let prefix = self.out_dir.join(format!("page_{page_number:03}"));
        let prefix_str = prefix
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non-UTF8 output path not supported"))?;

        let status = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(page_number.to_string())
            .arg("-l")
            .arg(page_number.to_string())
            .arg(pdf_path)
            .arg(prefix_str)
            .status()
            .with_context(|| "failed to invoke pdftoppm; is poppler-utils installed?")?;

        if !status.success() {
            anyhow::bail!("pdftoppm failed with status: {status}");
        }

        // pdftoppm names the single rendered page `<prefix>-<page>.png`
        let image_path = self
            .out_dir
            .join(format!("page_{page_number:03}-{page_number}.png"));

        if !image_path.exists() {
            anyhow::bail!(
                "expected rendered image not found: {}",
                image_path.display()
            );
        }

        let (width, height) = image::image_dimensions(&image_path)
            .with_context(|| format!("failed to read dimensions of {}", image_path.display()))?;

        Ok(RenderedPage {
            path: image_path,
            width,
            height,
        })
    }
}

/// Page count of a PDF, via poppler's pdfinfo.
pub fn page_count(pdf_path: &Path) -> Result<usize> {
    let output = Command::new("pdfinfo")
        .arg(pdf_path)
        .output()
        .with_context(|| format!("failed to invoke pdfinfo on {}", pdf_path.display()))?;

    if !output.status.success() {
        anyhow::bail!("pdfinfo failed with status: {}", output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("Pages:") {
            let num_str = rest.trim();
            let pages: usize = num_str.parse().with_context(|| {
                format!("failed to parse page count from 'Pages:' line: {num_str}")
            })?;
            return Ok(pages);
        }
    }

    anyhow::bail!(
        "pdfinfo output did not contain a 'Pages:' line for {}",
        pdf_path.display()
    );
}
