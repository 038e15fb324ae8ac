//! ASCII-art rendering of greeting text.

use figlet_rs::FIGfont;
use shared::{Error, Result};
use std::sync::Arc;

/// FIGlet renderer over the bundled standard font.
#[derive(Clone)]
pub struct Banner {
    font: Arc<FIGfont>,
}

impl Banner {
    pub fn standard() -> Result<Self> {
        let font = FIGfont::standard()
            .map_err(|e| Error::Internal(format!("Failed to load banner font: {}", e)))?;
        Ok(Self {
            font: Arc::new(font),
        })
    }

    /// Renders `text` as a multi-line banner. Empty text renders to nothing.
    pub fn render(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        match self.font.convert(text) {
            Some(figure) => figure.to_string(),
            None => String::new(),
        }
    }
}
