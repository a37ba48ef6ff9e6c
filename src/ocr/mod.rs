pub mod bridge;
pub mod renderer;

pub use bridge::OcrBridge;
pub use renderer::{page_count, PageRenderer};

use anyhow::Result;
use std::path::Path;

use crate::core::token::TokenPage;

/// Recognizes text tokens on one rendered page image.
pub trait OcrEngine {
    fn recognize_page(&self, image: &Path) -> Result<TokenPage>;
}
