//! Machine translation of recognized text.

mod google;

pub use google::GoogleTranslator;

pub trait Translator: Send + Sync {
    /// Translates `text` from `source` (a language code, or `auto`) into
    /// `target`.
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("Translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Translation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected translation response: {0}")]
    Malformed(String),

    #[error("Failed to start translation runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// For [`Translator`] implementations outside this crate: their own
    /// message, shown to the user as-is.
    #[error("{0}")]
    Backend(String),
}
