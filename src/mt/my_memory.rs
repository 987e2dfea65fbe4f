//! MyMemory provider, the terminal fallback of the cascade
//!
//! MyMemory answers every request with its best translation memory hit in
//! `responseData`, plus the full candidate list in `matches`. The raw hit is
//! often a poor human TM entry, so before returning, the candidate list is
//! searched for a machine-translation match of sufficient quality:
//!
//! - Hindi targets: machine provenance, quality ≥ 70, and a translation
//!   longer than 80% of the base translation (guards against truncated hits).
//! - Other targets: the first machine provenance match, kept only if its
//!   quality is ≥ 60.
//!
//! The Hindi rule applies to the exact code `hi` only; `hi-IN` takes the
//! general rule.
//!
//! The thresholds are empirical tuning, not protocol constants.

use crate::mt::data::{SourceLanguage, TranslationResult};
use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{TranslationProvider, check_status};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, info};

const HINDI: &str = "hi";
const HINDI_MIN_QUALITY: f64 = 70.0;
const HINDI_MIN_LENGTH_RATIO: f64 = 0.8;
const MIN_QUALITY: f64 = 60.0;

/// Confidence used when `responseData.match` is absent
const DEFAULT_CONFIDENCE: f64 = 0.8;

/// One entry of the `matches` list
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub translation: String,
    /// Quality score, 0–100
    pub quality: f64,
    /// Match score, 0–1
    pub score: Option<f64>,
    /// Produced by MyMemory's machine translation rather than a TM entry
    pub machine_translated: bool,
}

impl MatchCandidate {
    /// Read a candidate; entries without a translation string are skipped
    pub fn from_value(value: &Value) -> Option<Self> {
        let translation = value["translation"].as_str()?.to_string();
        let machine_translated = value["reference"].as_str() == Some("Machine Translation.")
            || value["created-by"].as_str() == Some("MT!");
        Some(Self {
            translation,
            quality: number(&value["quality"]).unwrap_or(0.0),
            score: number(&value["match"]),
            machine_translated,
        })
    }
}

/// MyMemory accepts numbers and numeric strings interchangeably
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Pick the candidate that should replace the base translation, if any
pub fn select_upgrade<'a>(
    candidates: &'a [MatchCandidate],
    base_translation: &str,
    target_language: &str,
) -> Option<&'a MatchCandidate> {
    if target_language == HINDI {
        let min_length = base_translation.chars().count() as f64 * HINDI_MIN_LENGTH_RATIO;
        candidates.iter().find(|c| {
            c.machine_translated
                && c.quality >= HINDI_MIN_QUALITY
                && !c.translation.is_empty()
                && c.translation.chars().count() as f64 > min_length
        })
    } else {
        candidates
            .iter()
            .find(|c| c.machine_translated)
            .filter(|c| c.quality >= MIN_QUALITY)
    }
}

/// MyMemory provider
#[derive(Clone)]
pub struct MyMemoryProvider {
    client: reqwest::Client,
    url: Url,
    /// Contact address sent as `de`, raises the anonymous daily quota
    email: Option<String>,
}

impl MyMemoryProvider {
    pub const DEFAULT_URL: &'static str = "https://api.mymemory.translated.net/get";

    const NAME: &'static str = "MyMemory";

    pub fn new(url: &str, client: reqwest::Client) -> MtResult<Self> {
        let url = Url::parse(url)
            .map_err(|e| MtError::ConfigError(format!("Invalid MyMemory URL '{}': {}", url, e)))?;
        Ok(Self {
            client,
            url,
            email: None,
        })
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email.filter(|e| !e.trim().is_empty());
        self
    }

    fn request_url(&self, text: &str, source: &SourceLanguage, target_language: &str) -> Url {
        let langpair = format!("{}|{}", source.code_or_auto(), target_language);
        let mut url = self.url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("q", text)
                .append_pair("langpair", &langpair)
                .append_pair("mt", "1");
            if let Some(email) = &self.email {
                query.append_pair("de", email);
            }
        }
        url
    }

    /// Normalize a MyMemory response body, applying the quality upgrade
    pub fn parse_response(
        json: &Value,
        source: &SourceLanguage,
        target_language: &str,
    ) -> MtResult<TranslationResult> {
        if number(&json["responseStatus"]) != Some(200.0) {
            return Err(MtError::invalid_response(
                Self::NAME,
                format!("responseStatus {}", json["responseStatus"]),
            ));
        }

        let base_translation = json["responseData"]["translatedText"]
            .as_str()
            .ok_or_else(|| {
                MtError::invalid_response(Self::NAME, "missing 'responseData.translatedText'")
            })?;
        let base_confidence = number(&json["responseData"]["match"])
            .filter(|m| *m != 0.0)
            .unwrap_or(DEFAULT_CONFIDENCE);

        let candidates: Vec<MatchCandidate> = json["matches"]
            .as_array()
            .map(|matches| matches.iter().filter_map(MatchCandidate::from_value).collect())
            .unwrap_or_default();

        let (translated_text, confidence) =
            match select_upgrade(&candidates, base_translation, target_language) {
                Some(candidate) => {
                    info!(
                        target_language,
                        quality = candidate.quality,
                        "Using machine translation match over translation memory hit"
                    );
                    (
                        candidate.translation.as_str(),
                        candidate.score.unwrap_or(base_confidence),
                    )
                }
                None => (base_translation, base_confidence),
            };

        Ok(TranslationResult::new(
            translated_text,
            source.reported(),
            target_language,
            confidence,
        ))
    }
}

impl std::fmt::Debug for MyMemoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MyMemoryProvider")
            .field("url", &self.url.as_str())
            .field("email", &self.email.as_ref().map(|_| "***"))
            .finish()
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(base: &str, matches: Value) -> Value {
        json!({
            "responseData": {"translatedText": base, "match": 0.85},
            "responseStatus": 200,
            "matches": matches
        })
    }

    fn parse(json: &Value, target: &str) -> TranslationResult {
        MyMemoryProvider::parse_response(json, &SourceLanguage::Known("en".to_string()), target)
            .unwrap()
    }

    // ========== Base Response Tests ==========

    #[test]
    fn test_parse_base_translation() {
        let result = parse(&response("Bonjour", json!([])), "fr");
        assert_eq!(result.translated_text, "Bonjour");
        assert_eq!(result.confidence, 0.85);
        assert_eq!(result.source_language, "en");
        assert_eq!(result.target_language, "fr");
    }

    #[test]
    fn test_parse_default_confidence() {
        let json = json!({"responseData": {"translatedText": "Hallo"}, "responseStatus": 200});
        assert_eq!(parse(&json, "de").confidence, 0.8);
    }

    #[test]
    fn test_parse_string_status() {
        let json = json!({"responseData": {"translatedText": "Hallo"}, "responseStatus": "200"});
        assert_eq!(parse(&json, "de").translated_text, "Hallo");
    }

    #[test]
    fn test_parse_rejects_non_200_status() {
        let json = json!({
            "responseData": {"translatedText": "QUOTA EXCEEDED"},
            "responseStatus": 429
        });
        let result = MyMemoryProvider::parse_response(&json, &SourceLanguage::Auto, "de");
        assert!(matches!(result, Err(MtError::InvalidResponse { .. })));
    }

    #[test]
    fn test_parse_rejects_null_translation() {
        let json = json!({"responseData": {"translatedText": null}, "responseStatus": 200});
        assert!(MyMemoryProvider::parse_response(&json, &SourceLanguage::Auto, "de").is_err());
    }

    #[test]
    fn test_parse_reports_default_source_for_auto() {
        let json = response("Hola", json!([]));
        let result = MyMemoryProvider::parse_response(&json, &SourceLanguage::Auto, "es").unwrap();
        assert_eq!(result.source_language, "en");
    }

    // ========== Hindi Upgrade Tests ==========

    #[test]
    fn test_hindi_upgrade_uses_mt_match() {
        let json = response(
            "X",
            json!([{"translation": "नमस्ते", "quality": 75, "match": 0.99, "created-by": "MT!"}]),
        );
        let result = parse(&json, "hi");
        assert_eq!(result.translated_text, "नमस्ते");
        assert_eq!(result.confidence, 0.99);
    }

    #[test]
    fn test_hindi_upgrade_accepts_reference_provenance_and_string_quality() {
        let json = response(
            "X",
            json!([{"translation": "नमस्ते", "quality": "74", "match": 0.7,
                    "reference": "Machine Translation."}]),
        );
        assert_eq!(parse(&json, "hi").translated_text, "नमस्ते");
    }

    #[test]
    fn test_hindi_rejects_low_quality() {
        let json = response(
            "X",
            json!([{"translation": "नमस्ते", "quality": 65, "match": 0.99, "created-by": "MT!"}]),
        );
        let result = parse(&json, "hi");
        assert_eq!(result.translated_text, "X");
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_hindi_rejects_truncated_match() {
        // 10 chars base, 8 chars candidate: 8 > 8.0 is false
        let json = response(
            "abcdefghij",
            json!([{"translation": "abcdefgh", "quality": 90, "match": 0.99, "created-by": "MT!"}]),
        );
        assert_eq!(parse(&json, "hi").translated_text, "abcdefghij");
    }

    #[test]
    fn test_hindi_skips_to_first_qualifying_match() {
        let json = response(
            "X",
            json!([
                {"translation": "TM hit", "quality": 100, "match": 1.0, "created-by": "user"},
                {"translation": "", "quality": 80, "match": 0.9, "created-by": "MT!"},
                {"translation": "मशीन", "quality": 80, "match": 0.9, "created-by": "MT!"}
            ]),
        );
        assert_eq!(parse(&json, "hi").translated_text, "मशीन");
    }

    #[test]
    fn test_hindi_region_code_uses_general_rules() {
        let json = response(
            "X",
            json!([{"translation": "नमस्ते", "quality": 65, "match": 0.99, "created-by": "MT!"}]),
        );
        assert_eq!(parse(&json, "hi-IN").translated_text, "नमस्ते");
        assert_eq!(parse(&json, "hi").translated_text, "X");
    }

    // ========== Other Language Upgrade Tests ==========

    #[test]
    fn test_french_upgrade_at_quality_65() {
        let json = response(
            "X",
            json!([{"translation": "Bonjour", "quality": 65, "match": 0.77, "created-by": "MT!"}]),
        );
        let result = parse(&json, "fr");
        assert_eq!(result.translated_text, "Bonjour");
        assert_eq!(result.confidence, 0.77);
    }

    #[test]
    fn test_french_no_upgrade_at_quality_50() {
        let json = response(
            "X",
            json!([{"translation": "Bonjour", "quality": 50, "match": 0.77, "created-by": "MT!"}]),
        );
        let result = parse(&json, "fr");
        assert_eq!(result.translated_text, "X");
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_low_quality_first_mt_match_blocks_later_ones() {
        let json = response(
            "X",
            json!([
                {"translation": "low", "quality": 50, "match": 0.6, "created-by": "MT!"},
                {"translation": "high", "quality": 65, "match": 0.77, "created-by": "MT!"}
            ]),
        );
        let result = parse(&json, "fr");
        assert_eq!(result.translated_text, "X");
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_tm_entries_before_first_mt_match_are_skipped() {
        let json = response(
            "X",
            json!([
                {"translation": "TM hit", "quality": 100, "match": 1.0, "created-by": "user"},
                {"translation": "Bonjour", "quality": 65, "match": 0.77, "created-by": "MT!"}
            ]),
        );
        assert_eq!(parse(&json, "fr").translated_text, "Bonjour");
    }

    #[test]
    fn test_non_mt_match_never_upgrades() {
        let json = response(
            "X",
            json!([{"translation": "Bonjour", "quality": 100, "match": 1.0, "reference": "TM"}]),
        );
        assert_eq!(parse(&json, "fr").translated_text, "X");
    }

    #[test]
    fn test_upgrade_without_match_score_keeps_base_confidence() {
        let json = response(
            "X",
            json!([{"translation": "Bonjour", "quality": 70, "created-by": "MT!"}]),
        );
        let result = parse(&json, "fr");
        assert_eq!(result.translated_text, "Bonjour");
        assert_eq!(result.confidence, 0.85);
    }

    // ========== Request Tests ==========

    #[test]
    fn test_request_url_langpair() {
        let provider =
            MyMemoryProvider::new(MyMemoryProvider::DEFAULT_URL, reqwest::Client::new()).unwrap();
        let url = provider.request_url("Hello", &SourceLanguage::Unspecified, "hi");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("langpair".to_string(), "auto|hi".to_string())));
        assert!(pairs.contains(&("mt".to_string(), "1".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "de"));
    }

    #[test]
    fn test_request_url_contact_email() {
        let provider =
            MyMemoryProvider::new(MyMemoryProvider::DEFAULT_URL, reqwest::Client::new())
                .unwrap()
                .with_email(Some("ops@example.org".to_string()));
        let url = provider.request_url("Hello", &SourceLanguage::Known("en".into()), "fr");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("langpair".to_string(), "en|fr".to_string())));
        assert!(pairs.contains(&("de".to_string(), "ops@example.org".to_string())));
    }
}
