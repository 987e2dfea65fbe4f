//! Core data structures for the translation pipeline
//!
//! The request and result types are the wire shapes of the `/api/translate`
//! endpoint and use camelCase field names on the wire.

use serde::{Deserialize, Serialize};

/// Sentinel a caller sends to ask for source-language auto-detection
pub const AUTO: &str = "auto";

/// Source language reported when nothing better is known
pub const DEFAULT_SOURCE: &str = "en";

/// An inbound translation request
///
/// Fields default to empty so that a missing `text` or `targetLanguage`
/// surfaces as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub target_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_language: target_language.into(),
            source_language: None,
        }
    }

    pub fn with_source(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = Some(source_language.into());
        self
    }
}

/// The canonical result every provider response is normalized into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    /// Resolved source language, never `"auto"`
    pub source_language: String,
    pub target_language: String,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

impl TranslationResult {
    pub fn new(
        translated_text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            translated_text: translated_text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Source language of a request after the detection step
///
/// Each provider derives the code it sends upstream and the code it reports
/// back from this value, so the three states must stay distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLanguage {
    /// Caller omitted the source and detection did not resolve it
    Unspecified,
    /// Caller explicitly sent `"auto"` and detection did not resolve it
    Auto,
    /// Caller-supplied or detected code
    Known(String),
}

impl SourceLanguage {
    /// Interpret the optional source field of a request
    pub fn from_request(source: Option<&str>) -> Self {
        match source.map(str::trim) {
            None | Some("") => SourceLanguage::Unspecified,
            Some(code) if code.eq_ignore_ascii_case(AUTO) => SourceLanguage::Auto,
            Some(code) => SourceLanguage::Known(code.to_string()),
        }
    }

    pub fn needs_detection(&self) -> bool {
        !matches!(self, SourceLanguage::Known(_))
    }

    pub fn known(&self) -> Option<&str> {
        match self {
            SourceLanguage::Known(code) => Some(code),
            _ => None,
        }
    }

    /// Code for providers that accept `auto` themselves
    pub fn code_or_auto(&self) -> &str {
        self.known().unwrap_or(AUTO)
    }

    /// `auto` only when the caller asked for it, otherwise the known code or `en`
    pub fn code_or_default(&self) -> &str {
        match self {
            SourceLanguage::Known(code) => code,
            SourceLanguage::Auto => AUTO,
            SourceLanguage::Unspecified => DEFAULT_SOURCE,
        }
    }

    /// Code reported in a result
    pub fn reported(&self) -> &str {
        self.known().unwrap_or(DEFAULT_SOURCE)
    }
}

/// Top-ranked result of a language-detection call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_reliable: Option<bool>,
}
