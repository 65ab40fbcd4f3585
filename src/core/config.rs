//! Combat configuration with documented constants
//!
//! The attribute derivations live in `squad::constants`; the values here are
//! the knobs of the damage pipeline that balance passes actually tune.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::constants::{
    COUNTERATTACK_DAMAGE_MULTIPLIER, COUNTERATTACK_HIT_PENALTY, CRIT_MULTIPLIER, DICE_SIDES,
    MIN_DAMAGE_ON_HIT,
};
use crate::core::error::{Result, TacticsError};

/// Configuration for the damage pipeline
///
/// Passed explicitly into the combat resolver so that independent battles
/// can run with different settings side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    // === ROLLS ===
    /// Sides on the percentile die used for hit, dodge and crit rolls
    ///
    /// Thresholds are expressed on the same scale, so 100 means a threshold
    /// of 80 succeeds 80% of the time.
    pub dice_sides: u32,

    /// Damage multiplier applied on a critical hit
    ///
    /// Applied to base damage before resistance, truncated toward zero.
    pub crit_multiplier: f64,

    /// Floor for a hit that was not dodged
    ///
    /// Both the resistance stage and the cover stage re-apply this floor,
    /// so armor and cover can never fully negate a landed hit.
    pub min_damage: i32,

    // === COUNTERATTACKS ===
    /// Subtracted from the counter-attacker's hit threshold (floored at 0)
    pub counter_hit_penalty: i32,

    /// Multiplier applied to counterattack damage after the crit stage
    pub counter_damage_multiplier: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            dice_sides: DICE_SIDES,
            crit_multiplier: CRIT_MULTIPLIER,
            min_damage: MIN_DAMAGE_ON_HIT,
            counter_hit_penalty: COUNTERATTACK_HIT_PENALTY,
            counter_damage_multiplier: COUNTERATTACK_DAMAGE_MULTIPLIER,
        }
    }
}

impl CombatConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CombatConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.dice_sides == 0 {
            return Err(TacticsError::InvalidConfig(
                "dice_sides must be at least 1".into(),
            ));
        }

        if !self.crit_multiplier.is_finite() || self.crit_multiplier < 1.0 {
            return Err(TacticsError::InvalidConfig(format!(
                "crit_multiplier ({}) should be >= 1.0",
                self.crit_multiplier
            )));
        }

        if self.min_damage < 1 {
            return Err(TacticsError::InvalidConfig(format!(
                "min_damage ({}) must be positive",
                self.min_damage
            )));
        }

        if !(0.0..=1.0).contains(&self.counter_damage_multiplier) {
            return Err(TacticsError::InvalidConfig(format!(
                "counter_damage_multiplier ({}) should be within [0, 1]",
                self.counter_damage_multiplier
            )));
        }

        if self.counter_hit_penalty < 0 {
            return Err(TacticsError::InvalidConfig(
                "counter_hit_penalty cannot be negative".into(),
            ));
        }

        Ok(())
    }
}
