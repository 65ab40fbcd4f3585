//! Damage pipeline for one attacker-vs-defender exchange
//!
//! Stages run in a fixed order and stop at the first failure:
//! hit roll, dodge roll, base damage, crit roll, resistance, cover.
//! Nothing here writes to the world; the orchestrator applies the result.

use crate::combat::cover::calculate_cover_breakdown;
use crate::combat::dice::RollSource;
use crate::combat::events::{AttackEvent, HitType};
use crate::core::config::CombatConfig;
use crate::core::types::UnitId;
use crate::ecs::World;

/// Resolve a normal attack; returns the final damage and the itemized event
pub fn resolve_attack<R: RollSource + ?Sized>(
    world: &World,
    config: &CombatConfig,
    attacker_id: UnitId,
    defender_id: UnitId,
    rolls: &mut R,
) -> (i32, AttackEvent) {
    resolve_exchange(world, config, attacker_id, defender_id, rolls, false)
}

/// Resolve a counterattack: reduced hit threshold and halved damage
pub fn resolve_counterattack<R: RollSource + ?Sized>(
    world: &World,
    config: &CombatConfig,
    attacker_id: UnitId,
    defender_id: UnitId,
    rolls: &mut R,
) -> (i32, AttackEvent) {
    resolve_exchange(world, config, attacker_id, defender_id, rolls, true)
}

fn resolve_exchange<R: RollSource + ?Sized>(
    world: &World,
    config: &CombatConfig,
    attacker_id: UnitId,
    defender_id: UnitId,
    rolls: &mut R,
    counter: bool,
) -> (i32, AttackEvent) {
    let defender = world.unit(defender_id);
    let hp_before = defender.map(|d| d.current_health()).unwrap_or(0);
    let mut event = AttackEvent::new(attacker_id, defender_id, hp_before);
    event.is_counterattack = counter;

    let (Some(attacker), Some(defender)) = (world.unit(attacker_id), defender) else {
        return (0, event);
    };
    let attack = &attacker.attributes;
    let defense = &defender.attributes;

    // Hit
    let mut hit_threshold = attack.hit_rate();
    if counter {
        hit_threshold = (hit_threshold - config.counter_hit_penalty).max(0);
    }
    let hit_roll = rolls.roll(config.dice_sides);
    event.hit_result.hit_roll = hit_roll;
    event.hit_result.hit_threshold = hit_threshold;
    if hit_roll as i32 > hit_threshold {
        event.hit_result.hit_type = HitType::Miss;
        return (0, event);
    }

    // Dodge
    let dodge_threshold = defense.dodge_chance();
    let dodge_roll = rolls.roll(config.dice_sides);
    event.hit_result.dodge_roll = dodge_roll;
    event.hit_result.dodge_threshold = dodge_threshold;
    if dodge_roll as i32 <= dodge_threshold {
        event.hit_result.hit_type = HitType::Dodge;
        return (0, event);
    }

    // Base damage; spells use the magic pair
    let is_magic = attacker.targeting.as_ref().is_some_and(|t| t.is_magic());
    let (mut damage, resistance) = if is_magic {
        (attack.magic_damage(), defense.magic_defense())
    } else {
        (attack.physical_damage(), defense.physical_resistance())
    };
    event.base_damage = damage;

    // Crit
    let crit_threshold = attack.crit_chance();
    let crit_roll = rolls.roll(config.dice_sides);
    event.hit_result.crit_roll = crit_roll;
    event.hit_result.crit_threshold = crit_threshold;
    if crit_roll as i32 <= crit_threshold {
        damage = (damage as f64 * config.crit_multiplier) as i32;
        event.crit_multiplier = config.crit_multiplier;
        event.hit_result.hit_type = HitType::Critical;
    } else if counter {
        event.hit_result.hit_type = HitType::Counterattack;
    } else {
        event.hit_result.hit_type = HitType::Normal;
    }

    if counter {
        damage = ((damage as f64 * config.counter_damage_multiplier) as i32).max(config.min_damage);
    }

    // Resistance
    event.resistance = resistance;
    let mut total = (damage - resistance).max(config.min_damage);

    // Cover
    let cover = calculate_cover_breakdown(world, defender_id);
    if cover.total_reduction > 0.0 {
        total = ((total as f64 * (1.0 - cover.total_reduction)) as i32).max(config.min_damage);
    }
    event.cover = cover;

    event.final_damage = total;
    event.defender_hp_after = hp_before - total;
    event.was_killed = event.defender_hp_after <= 0;

    (total, event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::dice::ScriptedRolls;
    use crate::core::types::{GridCell, SquadId, WorldPos};
    use crate::squad::roster;
    use crate::squad::template::UnitTemplate;
    use crate::squad::unit::{Attributes, CoverProfile, Targeting};

    struct Duel {
        world: World,
        attackers: SquadId,
        defenders: SquadId,
    }

    impl Duel {
        fn new() -> Self {
            let mut world = World::new();
            let attackers = roster::create_squad(&mut world, "Red", WorldPos::new(0, 0));
            let defenders = roster::create_squad(&mut world, "Blue", WorldPos::new(1, 0));
            Self {
                world,
                attackers,
                defenders,
            }
        }

        fn attacker(&mut self, template: UnitTemplate) -> UnitId {
            roster::place_unit(&mut self.world, self.attackers, &template.with_range(1), 0, 0).unwrap()
        }

        fn defender(&mut self, template: UnitTemplate, row: usize, col: usize) -> UnitId {
            roster::place_unit(&mut self.world, self.defenders, &template, row, col).unwrap()
        }
    }

    // Base damage 10, hit 100, crit 5
    fn brute() -> UnitTemplate {
        UnitTemplate::new("brute", Attributes::new(20, 10, 0, 0, 0, 0)).with_targeting(Targeting::front_row())
    }

    // Resistance 3, dodge 0
    fn target() -> UnitTemplate {
        UnitTemplate::new("target", Attributes::new(4, 0, 0, 0, 1, 0))
    }

    #[test]
    fn test_normal_hit_subtracts_resistance() {
        let mut duel = Duel::new();
        let a = duel.attacker(brute());
        let d = duel.defender(target(), 0, 0);
        let mut rolls = ScriptedRolls::new([50, 50, 99]);

        let (damage, event) = resolve_attack(&duel.world, &CombatConfig::default(), a, d, &mut rolls);
        assert_eq!(damage, 7);
        assert_eq!(event.hit_result.hit_type, HitType::Normal);
        assert_eq!(event.base_damage, 10);
        assert_eq!(event.resistance, 3);
        assert_eq!(event.crit_multiplier, 1.0);
        assert_eq!(event.hit_result.hit_threshold, 100);
        assert_eq!(event.hit_result.crit_threshold, 5);
        assert_eq!(event.defender_hp_before, 28);
        assert_eq!(event.defender_hp_after, 21);
        assert!(!event.was_killed);
    }

    #[test]
    fn test_crit_multiplies_before_resistance() {
        let mut duel = Duel::new();
        let a = duel.attacker(brute());
        let d = duel.defender(target(), 0, 0);
        let mut rolls = ScriptedRolls::new([50, 50, 1]);

        let (damage, event) = resolve_attack(&duel.world, &CombatConfig::default(), a, d, &mut rolls);
        assert_eq!(damage, 12);
        assert_eq!(event.hit_result.hit_type, HitType::Critical);
        assert_eq!(event.crit_multiplier, 1.5);
    }

    #[test]
    fn test_miss_and_dodge_short_circuit() {
        let mut duel = Duel::new();
        let weak = UnitTemplate::new("weak", Attributes::new(2, 0, 0, 0, 0, 1));
        let a = duel.attacker(weak.with_targeting(Targeting::front_row()));
        let nimble = UnitTemplate::new("nimble", Attributes::new(2, 60, 0, 0, 0, 0));
        let d = duel.defender(nimble, 0, 0);

        // Hit rate 80
        let mut rolls = ScriptedRolls::new([81]);
        let (damage, event) = resolve_attack(&duel.world, &CombatConfig::default(), a, d, &mut rolls);
        assert_eq!(damage, 0);
        assert_eq!(event.hit_result.hit_type, HitType::Miss);
        assert_eq!(event.hit_result.dodge_roll, 0);
        assert_eq!(event.defender_hp_after, event.defender_hp_before);

        // Dodge chance 20
        let mut rolls = ScriptedRolls::new([80, 20]);
        let (damage, event) = resolve_attack(&duel.world, &CombatConfig::default(), a, d, &mut rolls);
        assert_eq!(damage, 0);
        assert_eq!(event.hit_result.hit_type, HitType::Dodge);
        assert_eq!(event.hit_result.dodge_threshold, 20);
        assert_eq!(event.hit_result.crit_roll, 0);
    }

    #[test]
    fn test_landed_hit_never_below_minimum() {
        let mut duel = Duel::new();
        let weak = UnitTemplate::new("weak", Attributes::new(1, 0, 0, 0, 0, 0));
        let a = duel.attacker(weak.with_targeting(Targeting::front_row()));
        let wall = UnitTemplate::new("wall", Attributes::new(1, 0, 0, 0, 0, 0)).with_cover(CoverProfile::new(1.0, 1));
        duel.defender(wall, 0, 0);
        let armored = UnitTemplate::new("armored", Attributes::new(8, 0, 0, 0, 10, 0));
        let d = duel.defender(armored, 1, 0);

        let mut rolls = ScriptedRolls::new([1, 100, 100]);
        let (damage, event) = resolve_attack(&duel.world, &CombatConfig::default(), a, d, &mut rolls);
        assert_eq!(damage, 1);
        assert_eq!(event.cover.total_reduction, 1.0);
    }

    #[test]
    fn test_cover_reduces_and_truncates() {
        let mut duel = Duel::new();
        let a = duel.attacker(brute());
        let shield = UnitTemplate::new("shield", Attributes::new(1, 0, 0, 0, 0, 0)).with_cover(CoverProfile::new(0.25, 1));
        duel.defender(shield, 0, 0);
        let d = duel.defender(target(), 1, 0);

        let mut rolls = ScriptedRolls::new([1, 100, 100]);
        let (damage, event) = resolve_attack(&duel.world, &CombatConfig::default(), a, d, &mut rolls);
        // (10 - 3) * 0.75 = 5.25
        assert_eq!(damage, 5);
        assert_eq!(event.cover.providers.len(), 1);
    }

    #[test]
    fn test_magic_uses_magic_pair() {
        let mut duel = Duel::new();
        let mage = UnitTemplate::new("mage", Attributes::new(2, 10, 10, 0, 0, 0)).with_targeting(Targeting::Magic {
            cells: vec![GridCell::new(0, 0)],
        });
        let a = duel.attacker(mage);
        // Magic defense 4/2 + 5 = 7
        let priest = UnitTemplate::new("priest", Attributes::new(10, 0, 4, 0, 5, 0));
        let d = duel.defender(priest, 0, 0);

        let mut rolls = ScriptedRolls::new([1, 100, 100]);
        let (damage, event) = resolve_attack(&duel.world, &CombatConfig::default(), a, d, &mut rolls);
        assert_eq!(event.base_damage, 30);
        assert_eq!(event.resistance, 7);
        assert_eq!(damage, 23);
    }

    #[test]
    fn test_counterattack_penalties() {
        let mut duel = Duel::new();
        let a = duel.attacker(brute());
        let d = duel.defender(target(), 0, 0);
        let config = CombatConfig::default();

        let mut rolls = ScriptedRolls::new([80, 50, 99]);
        let (damage, event) = resolve_counterattack(&duel.world, &config, a, d, &mut rolls);
        assert!(event.is_counterattack);
        assert_eq!(event.hit_result.hit_threshold, 80);
        assert_eq!(event.hit_result.hit_type, HitType::Counterattack);
        // 10 * 0.5 = 5, minus 3
        assert_eq!(damage, 2);

        let mut rolls = ScriptedRolls::new([81]);
        let (damage, event) = resolve_counterattack(&duel.world, &config, a, d, &mut rolls);
        assert_eq!(damage, 0);
        assert_eq!(event.hit_result.hit_type, HitType::Miss);
    }

    #[test]
    fn test_counter_threshold_floors_at_zero() {
        let mut duel = Duel::new();
        let a = duel.attacker(brute());
        let d = duel.defender(target(), 0, 0);
        let config = CombatConfig {
            counter_hit_penalty: 500,
            ..CombatConfig::default()
        };
        let mut rolls = ScriptedRolls::new([1]);
        let (damage, event) = resolve_counterattack(&duel.world, &config, a, d, &mut rolls);
        assert_eq!(event.hit_result.hit_threshold, 0);
        assert_eq!(damage, 0);
    }

    #[test]
    fn test_kill_flag_uses_unclamped_hp() {
        let mut duel = Duel::new();
        let a = duel.attacker(brute());
        let d = duel.defender(target(), 0, 0);
        roster::set_unit_health(&mut duel.world, d, 4).unwrap();

        let mut rolls = ScriptedRolls::new([1, 100, 100]);
        let (_, event) = resolve_attack(&duel.world, &CombatConfig::default(), a, d, &mut rolls);
        assert_eq!(event.defender_hp_after, -3);
        assert!(event.was_killed);
    }

    #[test]
    fn test_missing_units_resolve_to_miss() {
        let mut duel = Duel::new();
        let a = duel.attacker(brute());
        let d = duel.defender(target(), 0, 0);
        roster::remove_unit(&mut duel.world, d).unwrap();

        let mut rolls = ScriptedRolls::constant(1);
        let (damage, event) = resolve_attack(&duel.world, &CombatConfig::default(), a, d, &mut rolls);
        assert_eq!(damage, 0);
        assert_eq!(event.hit_result.hit_type, HitType::Miss);
        assert_eq!(event.hit_result.hit_roll, 0);
    }
}
