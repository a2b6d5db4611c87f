//! # Cycler Configuration
//!
//! Timing knobs for the phase cycler, loadable from TOML.
//!
//! ```toml
//! min_interval_ms = 4000
//! max_interval_ms = 6000
//! tick_ms = 1
//! initial_phase = "red"
//! seed = 42
//! ```
//!
//! Every key is optional; missing keys take the defaults above (no seed).

use crate::error::{TrafficError, TrafficResult};
use crate::phase::Phase;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default lower bound of a cycle (ms).
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 4000;

/// Default upper bound of a cycle (ms).
pub const DEFAULT_MAX_INTERVAL_MS: u64 = 6000;

/// Default sleep between two loop iterations (ms).
pub const DEFAULT_TICK_MS: u64 = 1;

/// Configuration for a [`crate::PhaseCycler`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CyclerConfig {
    /// Lower bound of the toggle interval (ms, inclusive).
    pub min_interval_ms: u64,
    /// Upper bound of the toggle interval (ms, inclusive).
    pub max_interval_ms: u64,
    /// Polling granularity of the background loop (ms).
    pub tick_ms: u64,
    /// Phase before the first toggle.
    pub initial_phase: Phase,
    /// Seed for interval draws. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for CyclerConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            max_interval_ms: DEFAULT_MAX_INTERVAL_MS,
            tick_ms: DEFAULT_TICK_MS,
            initial_phase: Phase::Red,
            seed: None,
        }
    }
}

impl CyclerConfig {
    /// Test profile: cycles of 10-20ms.
    #[must_use]
    pub const fn accelerated() -> Self {
        Self {
            min_interval_ms: 10,
            max_interval_ms: 20,
            tick_ms: DEFAULT_TICK_MS,
            initial_phase: Phase::Red,
            seed: None,
        }
    }

    /// Sets the interval bounds.
    #[must_use]
    pub fn with_interval_ms(mut self, min: u64, max: u64) -> Self {
        self.min_interval_ms = min;
        self.max_interval_ms = max;
        self
    }

    /// Sets a fixed RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the phase before the first toggle.
    #[must_use]
    pub fn with_initial_phase(mut self, phase: Phase) -> Self {
        self.initial_phase = phase;
        self
    }

    /// Checks that the bounds are ordered and the tick is non-zero and no
    /// longer than the shortest cycle.
    ///
    /// # Errors
    ///
    /// Returns [`TrafficError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> TrafficResult<()> {
        if self.min_interval_ms > self.max_interval_ms {
            return Err(TrafficError::InvalidConfig(format!(
                "min_interval_ms ({}) exceeds max_interval_ms ({})",
                self.min_interval_ms, self.max_interval_ms
            )));
        }
        if self.tick_ms == 0 {
            return Err(TrafficError::InvalidConfig(
                "tick_ms must be at least 1".to_string(),
            ));
        }
        // The loop checks elapsed time and the shutdown flag once per tick
        if self.tick_ms > self.min_interval_ms {
            return Err(TrafficError::InvalidConfig(format!(
                "tick_ms ({}) exceeds min_interval_ms ({})",
                self.tick_ms, self.min_interval_ms
            )));
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`TrafficError::InvalidConfig`] on malformed TOML, unknown keys,
    /// or values rejected by [`CyclerConfig::validate`].
    pub fn from_toml_str(content: &str) -> TrafficResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| TrafficError::InvalidConfig(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TrafficError::InvalidConfig`] if the file cannot be read or
    /// fails [`CyclerConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> TrafficResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TrafficError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Sleep between loop iterations.
    #[must_use]
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CyclerConfig::default();
        assert_eq!(config.min_interval_ms, 4000);
        assert_eq!(config.max_interval_ms, 6000);
        assert_eq!(config.tick_ms, 1);
        assert_eq!(config.initial_phase, Phase::Red);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full() {
        let config = CyclerConfig::from_toml_str(
            r#"
            min_interval_ms = 100
            max_interval_ms = 200
            tick_ms = 2
            initial_phase = "green"
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.min_interval_ms, 100);
        assert_eq!(config.max_interval_ms, 200);
        assert_eq!(config.tick(), Duration::from_millis(2));
        assert_eq!(config.initial_phase, Phase::Green);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_parse_partial_uses_defaults() {
        let config = CyclerConfig::from_toml_str("seed = 1").unwrap();
        assert_eq!(config, CyclerConfig::default().with_seed(1));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = CyclerConfig::from_toml_str("min_interval_ms = 10\nmax_interval_ms = 5")
            .unwrap_err();
        assert!(matches!(err, TrafficError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_zero_tick() {
        let config = CyclerConfig {
            tick_ms: 0,
            ..CyclerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TrafficError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_tick_above_min_interval() {
        let err = CyclerConfig::from_toml_str(
            "min_interval_ms = 10\nmax_interval_ms = 20\ntick_ms = 300",
        )
        .unwrap_err();
        assert!(matches!(err, TrafficError::InvalidConfig(_)));
        assert!(err.to_string().contains("tick_ms (300)"));
    }

    #[test]
    fn test_accepts_tick_equal_to_min_interval() {
        let config = CyclerConfig {
            tick_ms: 10,
            ..CyclerConfig::accelerated()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_key() {
        assert!(CyclerConfig::from_toml_str("cycle_ms = 5").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = CyclerConfig::from_toml_file("/nonexistent/semaphore.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
