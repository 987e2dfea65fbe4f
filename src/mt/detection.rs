//! Language detection via the detectlanguage.com v0.2 API
//!
//! ```text
//! POST /0.2/detect   Authorization: Bearer <key>   {"q": "..."}
//! {"data":{"detections":[{"language":"en","isReliable":true,"confidence":11.2}]}}
//! ```
//!
//! The service's confidence is an unbounded score, passed through as-is.

use crate::mt::data::Detection;
use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{LanguageDetector, check_status};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Value, json};

#[derive(Clone)]
pub struct DetectLanguageClient {
    client: reqwest::Client,
    url: Url,
    api_key: String,
}

impl DetectLanguageClient {
    pub const DEFAULT_URL: &'static str = "https://ws.detectlanguage.com/0.2/detect";

    const NAME: &'static str = "DetectLanguage";

    pub fn new(url: &str, api_key: String, client: reqwest::Client) -> MtResult<Self> {
        if api_key.trim().is_empty() {
            return Err(MtError::ConfigError("API key cannot be empty".to_string()));
        }
        let url = Url::parse(url).map_err(|e| {
            MtError::ConfigError(format!("Invalid language detection URL '{}': {}", url, e))
        })?;
        Ok(Self {
            client,
            url,
            api_key,
        })
    }

    /// Read the top-ranked detection from a response body
    pub fn parse_response(json: &Value) -> MtResult<Detection> {
        let top = &json["data"]["detections"][0];
        let language = top["language"]
            .as_str()
            .filter(|code| !code.is_empty())
            .ok_or_else(|| MtError::invalid_response(Self::NAME, "no detections"))?;

        Ok(Detection {
            language: language.to_string(),
            confidence: top["confidence"].as_f64(),
            is_reliable: top["isReliable"].as_bool(),
        })
    }
}

impl std::fmt::Debug for DetectLanguageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectLanguageClient")
            .field("url", &self.url.as_str())
            .field("api_key", &"***")
            .finish()
    }
}

#[async_trait]
impl LanguageDetector for DetectLanguageClient {
    async fn detect(&self, text: &str) -> MtResult<Detection> {
        let response = self
            .client
            .post(self.url.clone())
            .bearer_auth(&self.api_key)
            .json(&json!({ "q": text }))
            .send()
            .await?;
        let response = check_status(Self::NAME, response)?;

        let json: Value = response.json().await.map_err(|e| {
            MtError::invalid_response(Self::NAME, format!("Failed to parse body: {}", e))
        })?;

        Self::parse_response(&json)
    }

    fn provider_name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_empty_key() {
        let result = DetectLanguageClient::new(
            DetectLanguageClient::DEFAULT_URL,
            " ".to_string(),
            reqwest::Client::new(),
        );
        match result {
            Err(MtError::ConfigError(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected ConfigError"),
        }
    }

    #[test]
    fn test_parse_top_detection() {
        let json = json!({"data": {"detections": [
            {"language": "es", "isReliable": true, "confidence": 9.5},
            {"language": "pt", "isReliable": false, "confidence": 2.1}
        ]}});
        let detection = DetectLanguageClient::parse_response(&json).unwrap();
        assert_eq!(detection.language, "es");
        assert_eq!(detection.confidence, Some(9.5));
        assert_eq!(detection.is_reliable, Some(true));
    }

    #[test]
    fn test_parse_rejects_empty_or_malformed() {
        for json in [
            json!({"data": {"detections": []}}),
            json!({"data": {}}),
            json!({"error": {"code": 1, "message": "Invalid API key"}}),
            json!([]),
        ] {
            assert!(DetectLanguageClient::parse_response(&json).is_err());
        }
    }

    #[test]
    fn test_debug_masks_api_key() {
        let client = DetectLanguageClient::new(
            DetectLanguageClient::DEFAULT_URL,
            "demo-key".to_string(),
            reqwest::Client::new(),
        )
        .unwrap();
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("demo-key"));
    }
}
