//! Google Translate via the public `translate_a/single` endpoint.
//!
//! The endpoint answers with nested arrays: the first element is a list of
//! `[translated, original, ...]` segments, one per sentence.
//!
//! Translation runs inside the pipeline's blocking job, so each call drives
//! its own single-threaded runtime for the async `reqwest` client.

use super::{TranslationError, Translator};
use std::time::{Duration, Instant};

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    endpoint: String,
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self::with_endpoint(ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    async fn request(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let response = client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        parse_response(&body)
    }
}

impl Translator for GoogleTranslator {
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let start = Instant::now();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let translated = runtime.block_on(self.request(text, source, target))?;

        log::info!(
            "[TRANSLATE] {}->{}: {} chars in {}ms",
            source,
            target,
            translated.chars().count(),
            start.elapsed().as_millis()
        );
        Ok(translated)
    }
}

/// Joins the translated segments of a `translate_a/single` response.
fn parse_response(body: &serde_json::Value) -> Result<String, TranslationError> {
    let segments = body
        .get(0)
        .and_then(|s| s.as_array())
        .ok_or_else(|| TranslationError::Malformed("missing sentence list".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|t| t.as_str()))
        .collect();

    if translated.is_empty() {
        return Err(TranslationError::Malformed("no translated segments".to_string()));
    }
    Ok(translated)
}
