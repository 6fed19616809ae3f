//! External secret providers.
//!
//! The resolver depends on secret stores only through [`SecretProvider`]:
//! given a lookup path it returns the raw secret value or a
//! [`ProviderError`]. Two implementations ship with the crate:
//! - [`GopassProvider`] shells out to `gopass show -o <path>`
//! - [`MemoryProvider`] serves a fixed map, for tests and offline runs

mod gopass;
mod memory;

pub use gopass::GopassProvider;
pub use memory::MemoryProvider;

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by a secret lookup.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("secret '{0}' not found")]
    NotFound(String),

    #[error("running \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("running \"{command}\": exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("running \"{command}\": timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("running \"{command}\": output exceeds {limit} bytes")]
    OutputTooLarge { command: String, limit: usize },

    #[error("running \"{command}\": output is not valid UTF-8")]
    InvalidOutput { command: String },
}

/// A store that resolves placeholder paths to secret values.
///
/// Lookups are awaited one at a time by the resolver; implementations should
/// not retry or cache on its behalf.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Display name for logging.
    fn name(&self) -> &str;

    /// Resolve a lookup path to the raw secret value.
    async fn lookup(&self, path: &str) -> Result<String, ProviderError>;
}
