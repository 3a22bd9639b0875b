//! Connection settings read from the environment.

use uniquify_core::env_parse_with_default;

pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5000;
pub const DEFAULT_POOL_SIZE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageConfig {
    pub busy_timeout_ms: u32,
    pub pool_size: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS, pool_size: DEFAULT_POOL_SIZE }
    }
}

impl StorageConfig {
    /// Reads `UNIQUIFY_BUSY_TIMEOUT_MS` and `UNIQUIFY_POOL_SIZE`, falling back
    /// to the defaults for missing or invalid values.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            busy_timeout_ms: env_parse_with_default(
                "UNIQUIFY_BUSY_TIMEOUT_MS",
                DEFAULT_BUSY_TIMEOUT_MS,
            ),
            pool_size: env_parse_with_default("UNIQUIFY_POOL_SIZE", DEFAULT_POOL_SIZE).max(1),
        }
    }
}
