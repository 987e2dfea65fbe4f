//! Environment-driven configuration
//!
//! Every setting has a default except the credentials, which are optional.
//! Without `TRANSLINGO_DETECT_API_KEY` the detection step is skipped.

use std::time::Duration;

use crate::mt::error::{MtError, MtResult};
use crate::mt::{DetectLanguageClient, GoogleTranslateProvider, LibreTranslateProvider, MyMemoryProvider};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub google_url: String,
    pub libretranslate_url: String,
    pub libretranslate_api_key: Option<String>,
    pub mymemory_url: String,
    pub mymemory_email: Option<String>,
    pub detect_url: String,
    pub detect_api_key: Option<String>,
    /// Per-request timeout applied to every upstream call
    pub timeout: Duration,
    pub history_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            google_url: GoogleTranslateProvider::DEFAULT_URL.to_string(),
            libretranslate_url: LibreTranslateProvider::DEFAULT_URL.to_string(),
            libretranslate_api_key: None,
            mymemory_url: MyMemoryProvider::DEFAULT_URL.to_string(),
            mymemory_email: None,
            detect_url: DetectLanguageClient::DEFAULT_URL.to_string(),
            detect_api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl ResolverConfig {
    /// Load from the process environment
    pub fn from_env() -> MtResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MtResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout_secs = match get("TRANSLINGO_TIMEOUT_SECS") {
            Some(v) => parse_number::<u64>("TRANSLINGO_TIMEOUT_SECS", &v)?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(MtError::ConfigError(
                "TRANSLINGO_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let history_capacity = match get("TRANSLINGO_HISTORY_CAPACITY") {
            Some(v) => parse_number::<usize>("TRANSLINGO_HISTORY_CAPACITY", &v)?,
            None => DEFAULT_HISTORY_CAPACITY,
        };

        Ok(Self {
            google_url: get("TRANSLINGO_GOOGLE_URL").unwrap_or(defaults.google_url),
            libretranslate_url: get("TRANSLINGO_LIBRETRANSLATE_URL")
                .unwrap_or(defaults.libretranslate_url),
            libretranslate_api_key: get("TRANSLINGO_LIBRETRANSLATE_API_KEY"),
            mymemory_url: get("TRANSLINGO_MYMEMORY_URL").unwrap_or(defaults.mymemory_url),
            mymemory_email: get("TRANSLINGO_MYMEMORY_EMAIL"),
            detect_url: get("TRANSLINGO_DETECT_URL").unwrap_or(defaults.detect_url),
            detect_api_key: get("TRANSLINGO_DETECT_API_KEY"),
            timeout: Duration::from_secs(timeout_secs),
            history_capacity,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> MtResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| MtError::ConfigError(format!("{} must be a number, got '{}'", key, value)))
}
