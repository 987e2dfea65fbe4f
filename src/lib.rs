//! Translation backend over public machine translation services
//!
//! - [`mt`] resolves a request through detection and a provider cascade
//! - [`history`] keeps a bounded, in-memory log of past translations
//! - [`config`] reads service endpoints and credentials from the environment

pub mod config;
pub mod history;
pub mod mt;

pub use config::ResolverConfig;
pub use history::{EntryType, HistoryEntry, HistoryPatch, HistoryStore, NewHistoryEntry};
pub use mt::{MtError, MtResult, TranslationRequest, TranslationResolver, TranslationResult};

/// Install the `tracing` subscriber used by the binaries
///
/// Honors `RUST_LOG`, falling back to `default_directive` (e.g. `"info"`).
/// Later calls are no-ops.
pub fn init_tracing(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
