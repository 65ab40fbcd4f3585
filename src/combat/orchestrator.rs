//! Squad attack orchestration
//!
//! Walks the acting squad's members in placement order, lets every eligible
//! unit pick targets and resolve its blows, and applies damage as it goes.
//! A unit killed early in the sequence is skipped by later selections.

use ahash::AHashMap;

use crate::combat::damage::{resolve_attack, resolve_counterattack};
use crate::combat::dice::RollSource;
use crate::combat::events::{AttackEvent, CombatLog, SquadStatus, TargetInfo, UnitSnapshot};
use crate::combat::targeting::{can_unit_attack, select_targets};
use crate::core::config::CombatConfig;
use crate::core::types::{SquadId, UnitId};
use crate::ecs::World;
use crate::squad::queries::{is_squad_destroyed, squad_distance};
use crate::squad::roster::refresh_squad;

const UNKNOWN_SQUAD: &str = "Unknown Squad";

/// Outcome of one squad attack or counterattack
#[derive(Debug, Clone)]
pub struct CombatResult {
    /// Damage that landed on living units
    pub total_damage: i32,
    /// Units brought to 0 HP by this exchange, in order of death
    pub units_killed: Vec<UnitId>,
    pub damage_by_unit: AHashMap<UnitId, i32>,
    pub target_destroyed: bool,
    pub log: CombatLog,
}

impl CombatResult {
    fn new(log: CombatLog) -> Self {
        Self {
            total_damage: 0,
            units_killed: Vec::new(),
            damage_by_unit: AHashMap::new(),
            target_destroyed: false,
            log,
        }
    }
}

/// Resolves squad combat with an explicit config and roll source
///
/// Holding both here keeps separate battles independent: each one builds its
/// own resolver over its own world.
pub struct CombatResolver<'a, R: RollSource + ?Sized> {
    config: &'a CombatConfig,
    rolls: &'a mut R,
}

impl<'a, R: RollSource + ?Sized> CombatResolver<'a, R> {
    pub fn new(config: &'a CombatConfig, rolls: &'a mut R) -> Self {
        Self { config, rolls }
    }

    pub fn config(&self) -> &CombatConfig {
        self.config
    }

    /// Target preview for UI and AI; may draw from the roll source
    pub fn select_targets(&mut self, world: &World, attacker_id: UnitId, defender_squad: SquadId) -> Vec<UnitId> {
        select_targets(world, attacker_id, defender_squad, &mut *self.rolls)
    }

    /// Resolve one exchange without touching the world
    pub fn resolve_attack(&mut self, world: &World, attacker_id: UnitId, defender_id: UnitId) -> (i32, AttackEvent) {
        resolve_attack(world, self.config, attacker_id, defender_id, &mut *self.rolls)
    }

    /// Every eligible unit of `attacker_squad` strikes `defender_squad`
    pub fn execute_squad_attack(
        &mut self,
        world: &mut World,
        attacker_squad: SquadId,
        defender_squad: SquadId,
    ) -> CombatResult {
        self.run(world, attacker_squad, defender_squad, false)
    }

    /// The defender strikes back with counterattack penalties
    pub fn execute_squad_counterattack(
        &mut self,
        world: &mut World,
        defender_squad: SquadId,
        attacker_squad: SquadId,
    ) -> CombatResult {
        self.run(world, defender_squad, attacker_squad, true)
    }

    fn run(&mut self, world: &mut World, acting: SquadId, target: SquadId, counter: bool) -> CombatResult {
        let distance = squad_distance(world, acting, target);
        let mut log = CombatLog::new(
            acting,
            target,
            squad_name(world, acting),
            squad_name(world, target),
            distance,
        );
        if distance < 0 {
            tracing::debug!("{} or {} is missing, no attack", acting, target);
            return CombatResult::new(log);
        }

        log.attacking_units = snapshot_units(world, acting, Some(distance));
        log.defending_units = snapshot_units(world, target, None);
        let mut result = CombatResult::new(log);

        let mut attack_index = 0;
        for attacker_id in world.squad_unit_ids(acting) {
            if !can_unit_attack(world, attacker_id, distance) {
                continue;
            }

            let mode = world
                .unit(attacker_id)
                .and_then(|u| u.targeting.as_ref())
                .map(|t| t.mode_name())
                .unwrap_or_default();

            for defender_id in select_targets(world, attacker_id, target, &mut *self.rolls) {
                attack_index += 1;
                let (damage, mut event) = if counter {
                    resolve_counterattack(world, self.config, attacker_id, defender_id, &mut *self.rolls)
                } else {
                    resolve_attack(world, self.config, attacker_id, defender_id, &mut *self.rolls)
                };

                event.attack_index = attack_index;
                if let Some(defender) = world.unit(defender_id) {
                    event.target_info = TargetInfo {
                        target_row: defender.footprint.anchor_row,
                        target_col: defender.footprint.anchor_col,
                        target_mode: mode.to_string(),
                    };
                }

                tracing::debug!(
                    "#{} {} -> {}: {} for {} ({} -> {})",
                    attack_index,
                    attacker_id,
                    defender_id,
                    event.hit_result.hit_type,
                    damage,
                    event.defender_hp_before,
                    event.defender_hp_after
                );

                apply_damage(world, defender_id, damage, &mut result);
                result.log.push(event);
            }
        }

        // Destroyed flag is recomputed once, after every blow has landed
        refresh_squad(world, target);

        result.total_damage = result.damage_by_unit.values().sum();
        result.target_destroyed = is_squad_destroyed(world, target);
        result.log.total_damage = result.total_damage;
        result.log.units_killed = result.units_killed.len();
        result.log.defender_status = squad_status(world, target);

        tracing::info!(
            "{}{} vs {}: {} damage over {} blows, {} killed",
            if counter { "Counter: " } else { "" },
            result.log.attacker_name,
            result.log.defender_name,
            result.total_damage,
            result.log.events.len(),
            result.units_killed.len()
        );
        result
    }
}

/// Subtract damage from a living unit; dead or missing units are left alone
fn apply_damage(world: &mut World, unit_id: UnitId, damage: i32, result: &mut CombatResult) {
    if damage <= 0 {
        return;
    }
    let Some(unit) = world.unit_mut(unit_id) else {
        return;
    };
    if !unit.is_alive() {
        return;
    }

    let attributes = &mut unit.attributes;
    attributes.current_health = (attributes.current_health - damage).max(0);
    *result.damage_by_unit.entry(unit_id).or_insert(0) += damage;

    if attributes.current_health == 0 {
        result.units_killed.push(unit_id);
    }
}

fn squad_name(world: &World, squad_id: SquadId) -> String {
    world
        .squad(squad_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| UNKNOWN_SQUAD.to_string())
}

/// Units as they stand now; with a distance, only those able to attack
pub fn snapshot_units(world: &World, squad_id: SquadId, distance: Option<i32>) -> Vec<UnitSnapshot> {
    world
        .squad_units(squad_id)
        .filter(|unit| distance.map_or(true, |d| can_unit_attack(world, unit.id, d)))
        .map(|unit| UnitSnapshot {
            unit_id: unit.id,
            unit_name: unit.name.clone(),
            grid_row: unit.footprint.anchor_row,
            grid_col: unit.footprint.anchor_col,
            attack_range: unit.attack_range,
            role: unit.role,
        })
        .collect()
}

/// Living and total member counts with pooled HP percent of the living
pub fn squad_status(world: &World, squad_id: SquadId) -> SquadStatus {
    let mut status = SquadStatus::default();
    let mut hp = 0i64;
    let mut max_hp = 0i64;

    for unit in world.squad_units(squad_id) {
        status.total_units += 1;
        if unit.is_alive() {
            status.alive_units += 1;
            hp += i64::from(unit.attributes.current_health);
            max_hp += i64::from(unit.attributes.max_health);
        }
    }

    if max_hp > 0 {
        status.average_hp_percent = (hp * 100 / max_hp) as i32;
    }
    status
}
