use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::extract::ChatBackend;

/// Shells out to a chat helper script. The prompt goes in on stdin, the
/// completion text comes back on stdout; the script owns API keys and
/// transport.
#[derive(Debug, Clone)]
pub struct ChatBridge {
    script_path: PathBuf,
    model: String,
}

impl ChatBridge {
    pub fn new() -> Self {
        Self {
            script_path: PathBuf::from("bridge/chat_bridge.py"),
            model: "mistral-large-latest".to_string(),
        }
    }

    pub fn with_script(mut self, script_path: PathBuf) -> Self {
        self.script_path = script_path;
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }
}

impl Default for ChatBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatBackend for ChatBridge {
    fn complete(&self, prompt: &str) -> Result<String> {
        let mut child = Command::new("python3")
            .arg(&self.script_path)
            .arg("--model")
            .arg(&self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| "failed to invoke chat bridge")?;

        child
            .stdin
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("chat bridge stdin unavailable"))?
            .write_all(prompt.as_bytes())
            .with_context(|| "failed to write prompt to chat bridge")?;

        let output = child
            .wait_with_output()
            .with_context(|| "failed to wait for chat bridge")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("chat bridge failed: {stderr}");
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
