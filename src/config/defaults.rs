/// Default configuration constants.

/// Program run to resolve placeholders.
pub const DEFAULT_GOPASS_BIN: &str = "gopass";

/// Maximum time a single lookup may take.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum size of a single secret read from gopass (1 MB).
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// Default `tracing` filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "gopass_secret=info";

/// Environment overrides.
pub const ENV_GOPASS_BIN: &str = "GOPASS_SECRET_BIN";
pub const ENV_TIMEOUT_SECS: &str = "GOPASS_SECRET_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "GOPASS_SECRET_LOG_FORMAT";
