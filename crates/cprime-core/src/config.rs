//! Runtime configuration.
//!
//! Read from the environment on first use and cached for the life of the
//! process:
//! - `CPRIME_FAULTS`: `translate` (default) installs the fault translator and
//!   turns arithmetic, indexing and unwrap panics inside scopes into
//!   exceptions. `off` leaves signal dispositions and panics alone.
//! - `CPRIME_BUFFER_LIMIT`: largest line or token, in bytes, a reader may
//!   accumulate. Unset, empty or unparsable means unlimited.

use std::sync::OnceLock;

/// Whether faults are translated into exceptions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPolicy {
    #[default]
    Translate,
    Off,
}

impl FaultPolicy {
    /// Parse from string (case-insensitive). Unknown names fall back to the
    /// default.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "translate" | "on" | "default" => Self::Translate,
            "off" | "none" | "disabled" => Self::Off,
            _ => Self::Translate,
        }
    }

    #[must_use]
    pub const fn translates(self) -> bool {
        matches!(self, Self::Translate)
    }
}

/// Parses a byte limit; `None` means unlimited.
#[must_use]
pub fn parse_buffer_limit(s: &str) -> Option<usize> {
    s.trim().parse::<usize>().ok()
}

/// Snapshot of every runtime knob.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub faults: FaultPolicy,
    pub buffer_limit: Option<usize>,
}

impl RuntimeConfig {
    /// Reads the environment directly, bypassing the cache.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            faults: lookup("CPRIME_FAULTS")
                .map(|v| FaultPolicy::from_str_loose(&v))
                .unwrap_or_default(),
            buffer_limit: lookup("CPRIME_BUFFER_LIMIT").and_then(|v| parse_buffer_limit(&v)),
        }
    }
}

static GLOBAL_CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

/// Get the process configuration (reads env vars on first call, caches
/// thereafter).
#[must_use]
pub fn runtime_config() -> RuntimeConfig {
    *GLOBAL_CONFIG.get_or_init(RuntimeConfig::from_env)
}

/// Pins the process configuration before anything reads it.
///
/// Returns `false` if the configuration was already fixed.
pub fn set_runtime_config(config: RuntimeConfig) -> bool {
    GLOBAL_CONFIG.set(config).is_ok()
}

#[must_use]
pub fn fault_policy() -> FaultPolicy {
    runtime_config().faults
}

#[must_use]
pub fn buffer_limit() -> Option<usize> {
    runtime_config().buffer_limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parse_fault_policies() {
        assert_eq!(FaultPolicy::from_str_loose("translate"), FaultPolicy::Translate);
        assert_eq!(FaultPolicy::from_str_loose("ON"), FaultPolicy::Translate);
        assert_eq!(FaultPolicy::from_str_loose("default"), FaultPolicy::Translate);
        assert_eq!(FaultPolicy::from_str_loose("off"), FaultPolicy::Off);
        assert_eq!(FaultPolicy::from_str_loose(" None "), FaultPolicy::Off);
        assert_eq!(FaultPolicy::from_str_loose("disabled"), FaultPolicy::Off);
        assert_eq!(FaultPolicy::from_str_loose("bogus"), FaultPolicy::Translate);
    }

    #[test]
    fn default_translates_without_limit() {
        let config = RuntimeConfig::default();
        assert!(config.faults.translates());
        assert_eq!(config.buffer_limit, None);
    }

    #[test]
    fn buffer_limit_parsing() {
        assert_eq!(parse_buffer_limit("4096"), Some(4096));
        assert_eq!(parse_buffer_limit(" 12 "), Some(12));
        assert_eq!(parse_buffer_limit(""), None);
        assert_eq!(parse_buffer_limit("-1"), None);
        assert_eq!(parse_buffer_limit("lots"), None);
    }

    #[test]
    fn lookup_builds_snapshot() {
        let env = HashMap::from([
            ("CPRIME_FAULTS", "off".to_string()),
            ("CPRIME_BUFFER_LIMIT", "64".to_string()),
        ]);
        let config = RuntimeConfig::from_lookup(|k| env.get(k).cloned());
        assert_eq!(config.faults, FaultPolicy::Off);
        assert_eq!(config.buffer_limit, Some(64));

        let config = RuntimeConfig::from_lookup(|_| None);
        assert_eq!(config, RuntimeConfig::default());
    }
}
