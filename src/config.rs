//! Tuning parameters for the search strategies.
//!
//! Every cap and weight is a plain value with a default, so a TOML file only
//! has to name what it changes.
//!
//! # Examples
//!
//! ```
//! use fifteen_solver::config::SolverConfig;
//! use fifteen_solver::solver::Strategy;
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     default_strategy = "bidirectional"
//!
//!     [iterative_deepening]
//!     time_limit_ms = 3000
//!
//!     [weighted_a_star]
//!     high_weight = 1.5
//! "#).unwrap();
//!
//! assert_eq!(config.default_strategy, Strategy::Bidirectional);
//! let limits = config.limits(Strategy::IterativeDeepening);
//! assert_eq!(limits.time_limit, Some(Duration::from_millis(3000)));
//! assert_eq!(config.weighted_a_star.high_weight, 1.5);
//! assert_eq!(config.weighted_a_star.low_weight, 1.1);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::solver::Strategy;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Resource bounds for a single run of one strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of nodes popped (or visited, for IDA*) before giving up.
    pub max_expansions: Option<usize>,
    /// Wall-clock budget measured from the start of the run.
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    fn new(max_expansions: Option<usize>, time_limit_ms: Option<u64>) -> Self {
        SearchLimits {
            max_expansions,
            time_limit: time_limit_ms.map(Duration::from_millis),
        }
    }
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Strategy used when the caller does not pick one.
    pub default_strategy: Strategy,
    pub iterative_deepening: IterativeDeepeningConfig,
    pub weighted_a_star: WeightedAStarConfig,
    pub greedy: GreedyConfig,
    pub bidirectional: BidirectionalConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct IterativeDeepeningConfig {
    pub time_limit_ms: Option<u64>,
    pub max_expansions: Option<usize>,
}

impl Default for IterativeDeepeningConfig {
    fn default() -> Self {
        IterativeDeepeningConfig {
            time_limit_ms: Some(12_000),
            max_expansions: None,
        }
    }
}

/// Weighted A* inflates the heuristic by `low_weight` while `g <= weight_switch_depth`
/// and by `high_weight` beyond it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WeightedAStarConfig {
    pub low_weight: f64,
    pub high_weight: f64,
    pub weight_switch_depth: u32,
    pub max_expansions: Option<usize>,
    pub time_limit_ms: Option<u64>,
}

impl Default for WeightedAStarConfig {
    fn default() -> Self {
        WeightedAStarConfig {
            low_weight: 1.1,
            high_weight: 1.3,
            weight_switch_depth: 30,
            max_expansions: Some(500_000),
            time_limit_ms: None,
        }
    }
}

impl WeightedAStarConfig {
    /// The heuristic weight applied to a node `g` moves from the root.
    pub fn weight(&self, g: u32) -> f64 {
        if g > self.weight_switch_depth {
            self.high_weight
        } else {
            self.low_weight
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GreedyConfig {
    pub max_expansions: Option<usize>,
    pub time_limit_ms: Option<u64>,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        GreedyConfig {
            max_expansions: Some(200_000),
            time_limit_ms: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BidirectionalConfig {
    /// Cap on expansions summed over both directions.
    pub max_expansions: Option<usize>,
    pub time_limit_ms: Option<u64>,
}

impl Default for BidirectionalConfig {
    fn default() -> Self {
        BidirectionalConfig {
            max_expansions: Some(800_000),
            time_limit_ms: None,
        }
    }
}

impl SolverConfig {
    /// Loads configuration from a TOML file, validating it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Checks that weights are usable and that no cap is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weighted = &self.weighted_a_star;
        for (name, weight) in [
            ("low_weight", weighted.low_weight),
            ("high_weight", weighted.high_weight),
        ] {
            if !weight.is_finite() || weight < 1.0 {
                return Err(ConfigError::Invalid(format!(
                    "weighted_a_star.{name} must be a finite number >= 1.0, got {weight}"
                )));
            }
        }
        if weighted.high_weight < weighted.low_weight {
            return Err(ConfigError::Invalid(format!(
                "weighted_a_star.high_weight ({}) is below low_weight ({})",
                weighted.high_weight, weighted.low_weight
            )));
        }

        for strategy in Strategy::ALL {
            let limits = self.limits(strategy);
            if limits.max_expansions == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "{strategy}: max_expansions must be positive"
                )));
            }
            if limits.time_limit == Some(Duration::ZERO) {
                return Err(ConfigError::Invalid(format!(
                    "{strategy}: time_limit_ms must be positive"
                )));
            }
        }
        Ok(())
    }

    /// The resource bounds configured for `strategy`.
    pub fn limits(&self, strategy: Strategy) -> SearchLimits {
        match strategy {
            Strategy::IterativeDeepening => SearchLimits::new(
                self.iterative_deepening.max_expansions,
                self.iterative_deepening.time_limit_ms,
            ),
            Strategy::WeightedAStar => SearchLimits::new(
                self.weighted_a_star.max_expansions,
                self.weighted_a_star.time_limit_ms,
            ),
            Strategy::Greedy => {
                SearchLimits::new(self.greedy.max_expansions, self.greedy.time_limit_ms)
            }
            Strategy::Bidirectional => SearchLimits::new(
                self.bidirectional.max_expansions,
                self.bidirectional.time_limit_ms,
            ),
        }
    }
}
