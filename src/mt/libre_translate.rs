//! LibreTranslate provider
//!
//! Posts `{q, source, target, format: "text"}` and reads `translatedText`.
//! When the request was sent with `source: "auto"`, the instance reports what
//! it detected in `detectedLanguage`, either as a bare code or as
//! `{"language": "...", "confidence": ...}` depending on the server version.

use crate::mt::data::{SourceLanguage, TranslationResult};
use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{TranslationProvider, check_status};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Value, json};
use tracing::debug;

/// LibreTranslate provider
#[derive(Clone)]
pub struct LibreTranslateProvider {
    client: reqwest::Client,
    url: Url,
    /// Optional key for instances that require one
    api_key: Option<String>,
}

impl LibreTranslateProvider {
    pub const DEFAULT_URL: &'static str = "https://libretranslate.com/translate";

    /// Fixed confidence, the API reports none for the translation itself
    pub const CONFIDENCE: f64 = 0.9;

    const NAME: &'static str = "LibreTranslate";

    pub fn new(url: &str, client: reqwest::Client) -> MtResult<Self> {
        let url = Url::parse(url).map_err(|e| {
            MtError::ConfigError(format!("Invalid LibreTranslate URL '{}': {}", url, e))
        })?;
        Ok(Self {
            client,
            url,
            api_key: None,
        })
    }

    /// Attach an API key; blank keys are ignored
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    fn request_body(&self, text: &str, source: &SourceLanguage, target_language: &str) -> Value {
        let mut body = json!({
            "q": text,
            "source": source.code_or_default(),
            "target": target_language,
            "format": "text"
        });
        if let Some(key) = &self.api_key {
            body["api_key"] = Value::String(key.clone());
        }
        body
    }

    /// Normalize a LibreTranslate response body
    pub fn parse_response(
        json: &Value,
        source: &SourceLanguage,
        target_language: &str,
    ) -> MtResult<TranslationResult> {
        let translated_text = json["translatedText"]
            .as_str()
            .filter(|text| !text.is_empty())
            .ok_or_else(|| MtError::invalid_response(Self::NAME, "missing 'translatedText'"))?;

        let detected = match &json["detectedLanguage"] {
            Value::String(code) => Some(code.as_str()),
            Value::Object(object) => object.get("language").and_then(Value::as_str),
            _ => None,
        };
        let source_language = detected
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

impl std::fmt::Debug for LibreTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibreTranslateProvider")
            .field("url", &self.url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target_language: &str,
    ) -> MtResult<TranslationResult> {
        let body = self.request_body(text, source, target_language);
        let response = self.client.post(self.url.clone()).json(&body).send().await?;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> LibreTranslateProvider {
        LibreTranslateProvider::new(LibreTranslateProvider::DEFAULT_URL, reqwest::Client::new())
            .unwrap()
    }

    #[test]
    fn test_body_source_auto_only_when_requested() {
        let p = provider();
        assert_eq!(p.request_body("hi", &SourceLanguage::Auto, "fr")["source"], "auto");
        assert_eq!(p.request_body("hi", &SourceLanguage::Unspecified, "fr")["source"], "en");
        assert_eq!(
            p.request_body("hi", &SourceLanguage::Known("de".to_string()), "fr")["source"],
            "de"
        );
    }

    #[test]
    fn test_body_shape() {
        let body = provider().request_body("Hello", &SourceLanguage::Unspecified, "es");
        assert_eq!(
            body,
            json!({"q": "Hello", "source": "en", "target": "es", "format": "text"})
        );
    }

    #[test]
    fn test_body_includes_api_key() {
        let p = provider().with_api_key(Some("secret".to_string()));
        let body = p.request_body("Hello", &SourceLanguage::Auto, "es");
        assert_eq!(body["api_key"], "secret");
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let p = provider().with_api_key(Some("  ".to_string()));
        let body = p.request_body("Hello", &SourceLanguage::Auto, "es");
        assert!(body.get("api_key").is_none());
    }

    #[test]
    fn test_parse_with_detected_language_object() {
        let json = json!({
            "translatedText": "Hola",
            "detectedLanguage": {"confidence": 90.0, "language": "en"}
        });
        let result =
            LibreTranslateProvider::parse_response(&json, &SourceLanguage::Auto, "es").unwrap();
        assert_eq!(result.translated_text, "Hola");
        assert_eq!(result.source_language, "en");
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_parse_with_detected_language_string() {
        let json = json!({"translatedText": "Hallo", "detectedLanguage": "nl"});
        let result =
            LibreTranslateProvider::parse_response(&json, &SourceLanguage::Auto, "de").unwrap();
        assert_eq!(result.source_language, "nl");
    }

    #[test]
    fn test_parse_without_detected_language_uses_source() {
        let json = json!({"translatedText": "Hallo"});
        let source = SourceLanguage::Known("en".to_string());
        let result = LibreTranslateProvider::parse_response(&json, &source, "de").unwrap();
        assert_eq!(result.source_language, "en");

        let result =
            LibreTranslateProvider::parse_response(&json, &SourceLanguage::Auto, "de").unwrap();
        assert_eq!(result.source_language, "en");
    }

    #[test]
    fn test_parse_rejects_missing_or_empty_text() {
        for json in [json!({}), json!({"translatedText": ""}), json!({"error": "x"})] {
            assert!(
                LibreTranslateProvider::parse_response(&json, &SourceLanguage::Auto, "de")
                    .is_err()
            );
        }
    }

    #[test]
    fn test_debug_masks_api_key() {
        let p = provider().with_api_key(Some("secret-key".to_string()));
        let debug_str = format!("{:?}", p);
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("secret-key"));
    }
}
