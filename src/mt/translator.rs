//! Provider traits and locale utilities
//!
//! This module defines the `TranslationProvider` and `LanguageDetector`
//! traits the resolver is written against, so the cascade can run over real
//! HTTP providers or deterministic test doubles alike.
//!
//! # Example
//!
//! ```ignore
//! use translingo::mt::{GoogleTranslateProvider, SourceLanguage, TranslationProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::new(GoogleTranslateProvider::DEFAULT_URL, client)?;
//!     let source = SourceLanguage::Known("en".to_string());
//!     let result = provider.translate("Hello, world!", &source, "fr").await?;
//!     println!("{}", result.translated_text); // "Bonjour le monde !"
//!     Ok(())
//! }
//! ```

use crate::mt::data::{Detection, SourceLanguage, TranslationResult};
use crate::mt::error::{MtError, MtResult};
use async_trait::async_trait;
use std::time::Duration;

/// User agent sent to every upstream service
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; TransLingo/1.0)";

/// A single external translation service
///
/// Implementations normalize their service's response shape into a
/// `TranslationResult`. Any failure, including a 2xx response that lacks the
/// service's success signal, is an `Err` so the resolver can move on.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate `text` into `target_language`
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `source` - Source language after the detection step
    /// * `target_language` - Target language code (e.g., "fr", "hi")
    ///
    /// # Returns
    ///
    /// * `Ok(TranslationResult)` - The normalized translation
    /// * `Err(MtError)` - If the call or its response was unusable
    async fn translate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target_language: &str,
    ) -> MtResult<TranslationResult>;

    /// Get the name of this translation provider
    ///
    /// Used for logging to identify which provider handled a translation.
    fn provider_name(&self) -> &str;
}

/// A language-detection service
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `text`, returning the top-ranked candidate
    async fn detect(&self, text: &str) -> MtResult<Detection>;

    fn provider_name(&self) -> &str;
}

/// Build the HTTP client shared by all providers
///
/// The timeout applies per request, so a hung upstream fails its own step
/// instead of stalling the whole cascade.
pub fn build_http_client(timeout: Duration) -> MtResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))
}

/// Validate that a locale code is in acceptable format
///
/// Checks that the locale code contains only alphanumeric characters,
/// hyphens, and underscores (following ISO 639 conventions).
///
/// # Example
///
/// ```ignore
/// validate_locale("en")?; // OK
/// validate_locale("zh-Hans")?; // OK
/// validate_locale("invalid@code").unwrap_err(); // Error
/// ```
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}

/// Map a non-2xx response to `MtError::HttpStatus`
pub(crate) fn check_status(
    provider: &str,
    response: reqwest::Response,
) -> MtResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(MtError::HttpStatus {
            provider: provider.to_string(),
            status: status.as_u16(),
        })
    }
}
