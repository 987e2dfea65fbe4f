//! Mock providers for testing
//!
//! Deterministic, network-free stand-ins for the translation and detection
//! services. Every call is recorded so tests can assert on cascade order and
//! on the source language each provider received.
//!
//! # Example
//!
//! ```ignore
//! use translingo::mt::{MockMode, MockProvider, SourceLanguage, TranslationProvider};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockProvider::new("mock", MockMode::Suffix);
//!     let result = mock.translate("hello", &SourceLanguage::Auto, "fr").await.unwrap();
//!     assert_eq!(result.translated_text, "hello_fr");
//! }
//! ```

use crate::mt::data::{DEFAULT_SOURCE, Detection, SourceLanguage, TranslationResult};
use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{LanguageDetector, TranslationProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append locale suffix: "hello" → "hello_fr"
    Suffix,

    /// Use predefined mappings for realistic translations
    /// (text, target_locale) → translation
    Mappings(HashMap<(String, String), String>),

    /// Simulate a provider failure
    Error(String),

    /// No-op: return input unchanged
    NoOp,
}

/// One recorded `translate` call
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub text: String,
    pub source: SourceLanguage,
    pub target_language: String,
}

/// Mock translation provider
#[derive(Debug)]
pub struct MockProvider {
    name: String,
    mode: MockMode,
    confidence: f64,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: Mutex<Vec<MockCall>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>, mode: MockMode) -> Self {
        Self {
            name: name.into(),
            mode,
            confidence: 0.5,
            delay_ms: 0,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a MockProvider with simulated network delay
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Calls recorded so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn apply_translation(&self, text: &str, target: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Error(msg) => Err(MtError::invalid_response(&self.name, msg.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn translate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target_language: &str,
    ) -> MtResult<TranslationResult> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall {
                text: text.to_string(),
                source: source.clone(),
                target_language: target_language.to_string(),
            });
        }

        self.apply_delay().await;

        let translated = self.apply_translation(text, target_language)?;
        Ok(TranslationResult::new(
            translated,
            source.reported(),
            target_language,
            self.confidence,
        ))
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}

/// Mock language detector
#[derive(Debug)]
pub struct MockDetector {
    /// `Ok(code)` to detect `code`, `Err(msg)` to fail
    outcome: Result<String, String>,
    calls: Mutex<usize>,
}

impl MockDetector {
    pub fn detecting(language: impl Into<String>) -> Self {
        Self {
            outcome: Ok(language.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| *c).unwrap_or_default()
    }
}

impl Default for MockDetector {
    fn default() -> Self {
        Self::detecting(DEFAULT_SOURCE)
    }
}

#[async_trait]
impl LanguageDetector for MockDetector {
    async fn detect(&self, _text: &str) -> MtResult<Detection> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        match &self.outcome {
            Ok(language) => Ok(Detection {
                language: language.clone(),
                confidence: Some(1.0),
                is_reliable: Some(true),
            }),
            Err(msg) => Err(MtError::NetworkError(msg.clone())),
        }
    }

    fn provider_name(&self) -> &str {
        "Mock Detector"
    }
}
