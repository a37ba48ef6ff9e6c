pub mod bridge;
pub mod prompt;
pub mod response;

pub use bridge::ChatBridge;

use anyhow::Result;

/// Produces a chat completion for an extraction prompt.
pub trait ChatBackend {
    fn complete(&self, prompt: &str) -> Result<String>;
}
