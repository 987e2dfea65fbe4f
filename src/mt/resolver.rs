//! Translation resolver: detection step plus provider cascade
//!
//! 1. If the request has no source language (or `"auto"`), ask the detector
//!    once. Failure is logged and ignored.
//! 2. Try each provider in order. The first success is returned; every
//!    failure is logged and the next provider is tried.
//! 3. When the last provider fails the request fails with
//!    `MtError::AllProvidersFailed`.
//!
//! Calls are strictly sequential: provider N+1 is only contacted once
//! provider N has failed.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::mt::data::{SourceLanguage, TranslationRequest, TranslationResult};
use crate::mt::detection::DetectLanguageClient;
use crate::mt::error::{MtError, MtResult};
use crate::mt::google_translate::GoogleTranslateProvider;
use crate::mt::libre_translate::LibreTranslateProvider;
use crate::mt::my_memory::MyMemoryProvider;
use crate::mt::translator::{
    LanguageDetector, TranslationProvider, build_http_client, validate_locale,
};

#[derive(Clone)]
pub struct TranslationResolver {
    detector: Option<Arc<dyn LanguageDetector>>,
    providers: Vec<Arc<dyn TranslationProvider>>,
}

impl TranslationResolver {
    /// Build a resolver over an explicit detector and provider chain
    pub fn new(
        detector: Option<Arc<dyn LanguageDetector>>,
        providers: Vec<Arc<dyn TranslationProvider>>,
    ) -> Self {
        Self {
            detector,
            providers,
        }
    }

    /// Build the production chain: Google Translate, LibreTranslate, MyMemory
    ///
    /// All providers share one HTTP client carrying the configured timeout.
    pub fn from_config(config: &ResolverConfig) -> MtResult<Self> {
        let client = build_http_client(config.timeout)?;

        let detector: Option<Arc<dyn LanguageDetector>> = match &config.detect_api_key {
            Some(key) => Some(Arc::new(DetectLanguageClient::new(
                &config.detect_url,
                key.clone(),
                client.clone(),
            )?)),
            None => {
                info!("No language detection key configured, auto-detection disabled");
                None
            }
        };

        let providers: Vec<Arc<dyn TranslationProvider>> = vec![
            Arc::new(GoogleTranslateProvider::new(&config.google_url, client.clone())?),
            Arc::new(
                LibreTranslateProvider::new(&config.libretranslate_url, client.clone())?
                    .with_api_key(config.libretranslate_api_key.clone()),
            ),
            Arc::new(
                MyMemoryProvider::new(&config.mymemory_url, client)?
                    .with_email(config.mymemory_email.clone()),
            ),
        ];

        Ok(Self::new(detector, providers))
    }

    pub fn detector(&self) -> Option<&Arc<dyn LanguageDetector>> {
        self.detector.as_ref()
    }

    /// Names of the providers in cascade order
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.provider_name()).collect()
    }

    /// Resolve a translation request through detection and the cascade
    ///
    /// # Returns
    ///
    /// * `Ok(TranslationResult)` - First successful provider's normalized result
    /// * `Err(MtError::InvalidRequest)` - Text or target missing; nothing was called
    /// * `Err(MtError::AllProvidersFailed)` - Every provider failed
    pub async fn resolve(&self, request: &TranslationRequest) -> MtResult<TranslationResult> {
        validate_request(request)?;

        let text = request.text.as_str();
        let target_language = request.target_language.trim();

        let source = self
            .resolve_source(text, SourceLanguage::from_request(request.source_language.as_deref()))
            .await;
        debug!(?source, target_language, "Source language resolved");

        for provider in &self.providers {
            let name = provider.provider_name();
            match provider.translate(text, &source, target_language).await {
                Ok(mut result) => {
                    result.target_language = request.target_language.clone();
                    info!(
                        provider = name,
                        source = %result.source_language,
                        target_language = %result.target_language,
                        confidence = result.confidence,
                        "Translation succeeded"
                    );
                    return Ok(result);
                }
                Err(e) => warn!(provider = name, error = %e, "Provider failed, falling through"),
            }
        }

        Err(MtError::AllProvidersFailed)
    }

    /// Run the detection step at most once
    async fn resolve_source(&self, text: &str, source: SourceLanguage) -> SourceLanguage {
        if !source.needs_detection() {
            return source;
        }
        let Some(detector) = &self.detector else {
            return source;
        };

        match detector.detect(text).await {
            Ok(detection) => {
                info!(
                    detector = detector.provider_name(),
                    language = %detection.language,
                    "Detected source language"
                );
                SourceLanguage::Known(detection.language)
            }
            Err(e) => {
                warn!(
                    detector = detector.provider_name(),
                    error = %e,
                    "Language detection failed, continuing without it"
                );
                source
            }
        }
    }
}

impl std::fmt::Debug for TranslationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationResolver")
            .field(
                "detector",
                &self.detector.as_ref().map(|d| d.provider_name()),
            )
            .field("providers", &self.provider_names())
            .finish()
    }
}

/// Reject requests that must never reach a provider
pub fn validate_request(request: &TranslationRequest) -> MtResult<()> {
    if request.text.trim().is_empty() || request.target_language.trim().is_empty() {
        return Err(MtError::InvalidRequest(
            "Text and target language are required".to_string(),
        ));
    }

    validate_locale(request.target_language.trim())
        .map_err(|e| MtError::InvalidRequest(e.to_string()))?;
    if let SourceLanguage::Known(code) =
        SourceLanguage::from_request(request.source_language.as_deref())
    {
        validate_locale(&code).map_err(|e| MtError::InvalidRequest(e.to_string()))?;
    }

    Ok(())
}
