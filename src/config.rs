use std::path::Path;

use crate::ai::{Difficulty, HeuristicWeights, TierConfig};
use crate::error::ConfigError;

/// Deepest search any tier may request.
pub const MAX_DEPTH: usize = 12;

/// Top-level engine configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub easy: TierConfig,
    pub medium: TierConfig,
    pub hard: TierConfig,
    pub heuristic: HeuristicWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            easy: TierConfig::easy(),
            medium: TierConfig::medium(),
            hard: TierConfig::hard(),
            heuristic: HeuristicWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Settings for one difficulty tier.
    pub fn tier(&self, difficulty: Difficulty) -> &TierConfig {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for level in Difficulty::ALL {
            let tier = self.tier(level);
            if tier.depth == 0 || tier.depth > MAX_DEPTH {
                return Err(ConfigError::Validation(format!(
                    "{level}.depth must be in [1, {MAX_DEPTH}]"
                )));
            }
            if !(0.0..=1.0).contains(&tier.random_move_probability) {
                return Err(ConfigError::Validation(format!(
                    "{level}.random_move_probability must be in [0, 1]"
                )));
            }
            if tier.node_budget == Some(0) {
                return Err(ConfigError::Validation(format!(
                    "{level}.node_budget must be > 0"
                )));
            }
            if tier.time_budget_ms == Some(0) {
                return Err(ConfigError::Validation(format!(
                    "{level}.time_budget_ms must be > 0"
                )));
            }
        }

        // Strength must not decrease from easy to hard
        for pair in Difficulty::ALL.windows(2) {
            let (weaker, stronger) = (self.tier(pair[0]), self.tier(pair[1]));
            if weaker.depth > stronger.depth {
                return Err(ConfigError::Validation(format!(
                    "{}.depth must be <= {}.depth",
                    pair[0], pair[1]
                )));
            }
            if weaker.random_move_probability < stronger.random_move_probability {
                return Err(ConfigError::Validation(format!(
                    "{}.random_move_probability must be >= {}.random_move_probability",
                    pair[0], pair[1]
                )));
            }
        }

        let h = &self.heuristic;
        if h.own_three < 0 || h.own_two < 0 || h.opponent_three < 0 || h.opponent_two < 0 {
            return Err(ConfigError::Validation(
                "heuristic window weights must be >= 0".into(),
            ));
        }
        if h.center < 0 {
            return Err(ConfigError::Validation(
                "heuristic.center must be >= 0".into(),
            ));
        }
        if h.own_three <= h.own_two {
            return Err(ConfigError::Validation(
                "heuristic.own_three must be > heuristic.own_two".into(),
            ));
        }
        if h.opponent_three <= h.opponent_two {
            return Err(ConfigError::Validation(
                "heuristic.opponent_three must be > heuristic.opponent_two".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&EngineConfig::default())
    }
}
