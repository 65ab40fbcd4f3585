//! Combat system constants - all tunable values in one place
//!
//! These are the defaults behind `CombatConfig`; a loaded config overrides
//! them per battle.

// Rolls
pub const DICE_SIDES: u32 = 100;
pub const CRIT_MULTIPLIER: f64 = 1.5;
pub const MIN_DAMAGE_ON_HIT: i32 = 1;

// Cover
pub const MAX_COVER_REDUCTION: f64 = 1.0;

// Counterattacks
pub const COUNTERATTACK_HIT_PENALTY: i32 = 20;
pub const COUNTERATTACK_DAMAGE_MULTIPLIER: f64 = 0.5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_constants_reasonable() {
        assert_eq!(DICE_SIDES, 100);
        assert!(CRIT_MULTIPLIER > 1.0);
        assert!(MIN_DAMAGE_ON_HIT >= 1);
    }

    #[test]
    fn test_counterattack_is_weaker() {
        assert!(COUNTERATTACK_HIT_PENALTY > 0);
        assert!(COUNTERATTACK_DAMAGE_MULTIPLIER > 0.0 && COUNTERATTACK_DAMAGE_MULTIPLIER < 1.0);
    }
}
