/// Machine Translation Module
///
/// This module resolves a translation request through a fixed cascade of
/// public translation services, normalizing each service's response into one
/// canonical `TranslationResult`.
///
/// # Overview
///
/// 1. **Detection** - Optional source-language auto-detection (detectlanguage.com)
/// 2. **Providers** - Google Translate (gtx), LibreTranslate, MyMemory
/// 3. **Resolver** - First-success-wins cascade over the providers
/// 4. **Mocks** - Deterministic providers for tests and offline use
///
/// # Example
///
/// ```ignore
/// use translingo::config::ResolverConfig;
/// use translingo::mt::{TranslationRequest, TranslationResolver};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let resolver = TranslationResolver::from_config(&ResolverConfig::from_env()?)?;
///     let request = TranslationRequest::new("Hello world", "es").with_source("auto");
///     let result = resolver.resolve(&request).await?;
///     println!("{} ({})", result.translated_text, result.confidence);
///     Ok(())
/// }
/// ```
pub mod data;
pub mod detection;
pub mod error;
pub mod google_translate;
pub mod libre_translate;
pub mod mock;
pub mod my_memory;
pub mod resolver;
pub mod translator;

pub use data::{Detection, SourceLanguage, TranslationRequest, TranslationResult};
pub use detection::DetectLanguageClient;
pub use error::{MtError, MtResult};
pub use google_translate::GoogleTranslateProvider;
pub use libre_translate::LibreTranslateProvider;
pub use mock::{MockCall, MockDetector, MockMode, MockProvider};
pub use my_memory::{MatchCandidate, MyMemoryProvider, select_upgrade};
pub use resolver::{TranslationResolver, validate_request};
pub use translator::{LanguageDetector, TranslationProvider, validate_locale};
