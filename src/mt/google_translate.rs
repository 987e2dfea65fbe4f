//! Google Translate provider (unofficial `translate_a/single` endpoint)
//!
//! The endpoint needs no API key and answers with deeply nested arrays:
//!
//! ```text
//! [[["Hola","Hello",null,null,1],[" mundo"," world",null,null,1]],null,"en", ...]
//! ```
//!
//! `[0]` holds one item per sentence segment, each item's first element being
//! the translated segment. `[2]` is the source language Google detected.
//!
//! # Example
//!
//! ```ignore
//! use translingo::mt::{GoogleTranslateProvider, SourceLanguage, TranslationProvider};
//!
//! let provider = GoogleTranslateProvider::new(GoogleTranslateProvider::DEFAULT_URL, client)?;
//! let result = provider.translate("Hello world", &SourceLanguage::Auto, "es").await?;
//! assert_eq!(result.translated_text, "Hola Mundo");
//! ```

use crate::mt::data::{SourceLanguage, TranslationResult};
use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{TranslationProvider, check_status};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

/// Google Translate (gtx client) provider
#[derive(Debug, Clone)]
pub struct GoogleTranslateProvider {
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Endpoint URL, query parameters are appended per request
    base_url: Url,
}

impl GoogleTranslateProvider {
    pub const DEFAULT_URL: &'static str = "https://translate.googleapis.com/translate_a/single";

    /// This endpoint never reports a confidence score
    pub const CONFIDENCE: f64 = 0.95;

    const NAME: &'static str = "Google Translate";

    /// Create a provider for `base_url` sharing `client`
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(MtError)` - If the URL does not parse
    pub fn new(base_url: &str, client: reqwest::Client) -> MtResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            MtError::ConfigError(format!("Invalid Google Translate URL '{}': {}", base_url, e))
        })?;
        Ok(Self { client, base_url })
    }

    fn request_url(&self, text: &str, source: &SourceLanguage, target_language: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", source.code_or_auto())
            .append_pair("tl", target_language)
            .append_pair("dt", "t")
            .append_pair("q", text);
        url
    }

    /// Normalize a gtx response body
    ///
    /// Succeeds only when `[0][0][0]` is a non-empty value. The translation is
    /// every segment's first element joined without a separator, since the
    /// segments already carry their own leading whitespace.
    pub fn parse_response(
        json: &Value,
        source: &SourceLanguage,
        target_language: &str,
    ) -> MtResult<TranslationResult> {
        if !is_present(&json[0][0][0]) {
            return Err(MtError::invalid_response(
                Self::NAME,
                "missing translation segments at [0][0][0]",
            ));
        }

        let translated_text: String = json[0]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|segment| segment_text(&segment[0]))
            .collect();

        let source_language = json[2]
            .as_str()
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| source.reported());

        Ok(TranslationResult::new(
            translated_text,
            source_language,
            target_language,
            Self::CONFIDENCE,
        ))
    }
}

/// JavaScript-style truthiness for the success probe
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn segment_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target_language: &str,
    ) -> MtResult<TranslationResult> {
        let url = self.request_url(text, source, target_language);
        let response = self.client.get(url).send().await?;
        let response = check_status(Self::NAME, response)?;

        let json: Value = response.json().await.map_err(|e| {
            MtError::invalid_response(Self::NAME, format!("Failed to parse body: {}", e))
        })?;
        debug!(provider = Self::NAME, response = %json, "Upstream response");

        Self::parse_response(&json, source, target_language)
    }

    fn provider_name(&self) -> &str {
        Self::NAME
    }
}
