//! Memory pool configuration

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, Result};

/// Environment variable overriding [`PoolConfig::max_buffers`]
pub const ENV_MAX_BUFFERS: &str = "HOSTPOOL_MAX_BUFFERS";
/// Environment variable overriding [`PoolConfig::max_bytes`]
pub const ENV_MAX_BYTES: &str = "HOSTPOOL_MAX_BYTES";

/// Default registry size above which an allocation sweeps first
pub const DEFAULT_MAX_BUFFERS: usize = 100;
/// Default locked byte count at which an allocation sweeps first (1GB)
pub const DEFAULT_MAX_BYTES: usize = 1 << 30;

/// Pressure thresholds for the memory pool
///
/// Both are read on every allocation. Crossing either one makes the next
/// allocation sweep all free buffers before it searches for a reusable one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Sweep when the registry holds more than this many buffers
    pub max_buffers: usize,
    /// Sweep when at least this many bytes are locked by callers
    pub max_bytes: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_buffers: DEFAULT_MAX_BUFFERS,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the buffer count threshold
    pub fn with_max_buffers(mut self, max_buffers: usize) -> Self {
        self.max_buffers = max_buffers;
        self
    }

    /// Set the locked byte threshold
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Load defaults overridden by `HOSTPOOL_MAX_BUFFERS` / `HOSTPOOL_MAX_BYTES`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load defaults overridden by values from `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_MAX_BUFFERS) {
            config.max_buffers = parse_count(ENV_MAX_BUFFERS, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_BYTES) {
            config.max_bytes = parse_count(ENV_MAX_BYTES, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_buffers == 0 {
            return Err(PoolError::invalid_parameter(
                "max_buffers",
                "Max buffers cannot be zero",
            ));
        }

        if self.max_bytes == 0 {
            return Err(PoolError::invalid_parameter(
                "max_bytes",
                "Max bytes cannot be zero",
            ));
        }

        Ok(())
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|err| PoolError::config(format!("{}={:?}: {}", key, value, err)))
}

/// Builder pattern for pool configuration
#[derive(Debug, Default)]
pub struct PoolConfigBuilder {
    config: PoolConfig,
}

impl PoolConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the buffer count threshold
    pub fn max_buffers(mut self, max_buffers: usize) -> Self {
        self.config.max_buffers = max_buffers;
        self
    }

    /// Set the locked byte threshold
    pub fn max_bytes(mut self, max_bytes: usize) -> Self {
        self.config.max_bytes = max_bytes;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<PoolConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.max_buffers, 100);
        assert_eq!(config.max_bytes, 1 << 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_validates() {
        let config = PoolConfigBuilder::new()
            .max_buffers(3)
            .max_bytes(4096)
            .build()
            .unwrap();
        assert_eq!(config, PoolConfig::new().with_max_buffers(3).with_max_bytes(4096));

        assert!(PoolConfigBuilder::new().max_buffers(0).build().is_err());
        assert!(PoolConfigBuilder::new().max_bytes(0).build().is_err());
    }

    #[test]
    fn test_serde_fills_missing_fields() {
        let config: PoolConfig = toml::from_str("max_buffers = 8").unwrap();
        assert_eq!(config.max_buffers, 8);
        assert_eq!(config.max_bytes, DEFAULT_MAX_BYTES);

        let config: PoolConfig = toml::from_str("").unwrap();
        assert_eq!(config, PoolConfig::default());

        let tuned = PoolConfig::new().with_max_buffers(16).with_max_bytes(1 << 20);
        let text = toml::to_string(&tuned).unwrap();
        assert!(text.contains("max_bytes = 1048576"));
        assert_eq!(toml::from_str::<PoolConfig>(&text).unwrap(), tuned);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = PoolConfig::from_lookup(lookup_from(&[
            (ENV_MAX_BUFFERS, "8"),
            (ENV_MAX_BYTES, " 65536 "),
        ]))
        .unwrap();
        assert_eq!(config.max_buffers, 8);
        assert_eq!(config.max_bytes, 65536);

        let config = PoolConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, PoolConfig::default());
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = PoolConfig::from_lookup(lookup_from(&[(ENV_MAX_BUFFERS, "lots")])).unwrap_err();
        assert!(matches!(err, PoolError::Config { .. }));

        let err = PoolConfig::from_lookup(lookup_from(&[(ENV_MAX_BYTES, "0")])).unwrap_err();
        assert!(matches!(err, PoolError::InvalidParameter { .. }));
    }
}
