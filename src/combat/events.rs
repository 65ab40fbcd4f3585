//! Attack events and combat logs
//!
//! Plain data records. The JSON exporter and the text renderer in the
//! skirmish binary both read these without reaching back into the world.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{SquadId, UnitId};
use crate::squad::unit::UnitRole;

/// Outcome of one attacker-vs-defender exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HitType {
    #[default]
    Miss,
    Dodge,
    Normal,
    Critical,
    /// A counterattack that landed without a crit
    Counterattack,
}

impl HitType {
    pub fn landed(&self) -> bool {
        !matches!(self, HitType::Miss | HitType::Dodge)
    }
}

impl fmt::Display for HitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HitType::Miss => "MISS",
            HitType::Dodge => "DODGE",
            HitType::Normal => "HIT",
            HitType::Critical => "CRIT",
            HitType::Counterattack => "COUNTER",
        };
        f.write_str(name)
    }
}

/// Every roll of the pipeline with the threshold it was checked against
///
/// Stages that never ran keep roll and threshold at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HitResult {
    pub hit_type: HitType,
    pub hit_roll: u32,
    pub hit_threshold: i32,
    pub dodge_roll: u32,
    pub dodge_threshold: i32,
    pub crit_roll: u32,
    pub crit_threshold: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverProvider {
    pub unit_id: UnitId,
    pub unit_name: String,
    pub cover_value: f64,
    pub grid_row: usize,
    pub grid_col: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoverBreakdown {
    /// Summed provider values, capped at 1.0
    pub total_reduction: f64,
    pub providers: Vec<CoverProvider>,
}

/// Where the blow landed and which mode chose it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TargetInfo {
    pub target_row: usize,
    pub target_col: usize,
    pub target_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackEvent {
    pub attacker_id: UnitId,
    pub defender_id: UnitId,
    /// 1-based position within the squad attack
    pub attack_index: usize,
    pub target_info: TargetInfo,
    pub hit_result: HitResult,
    pub base_damage: i32,
    pub crit_multiplier: f64,
    pub resistance: i32,
    pub cover: CoverBreakdown,
    pub final_damage: i32,
    pub defender_hp_before: i32,
    /// May go negative; the unit's stored health saturates at 0
    pub defender_hp_after: i32,
    pub was_killed: bool,
    pub is_counterattack: bool,
}

impl AttackEvent {
    /// Empty event for an exchange that has not been resolved yet
    pub fn new(attacker_id: UnitId, defender_id: UnitId, defender_hp: i32) -> Self {
        Self {
            attacker_id,
            defender_id,
            attack_index: 0,
            target_info: TargetInfo::default(),
            hit_result: HitResult::default(),
            base_damage: 0,
            crit_multiplier: 1.0,
            resistance: 0,
            cover: CoverBreakdown::default(),
            final_damage: 0,
            defender_hp_before: defender_hp,
            defender_hp_after: defender_hp,
            was_killed: false,
            is_counterattack: false,
        }
    }
}

/// Unit as it stood before the exchange began
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub unit_id: UnitId,
    pub unit_name: String,
    pub grid_row: usize,
    pub grid_col: usize,
    pub attack_range: Option<u32>,
    pub role: UnitRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SquadStatus {
    pub alive_units: usize,
    pub total_units: usize,
    /// Summed living HP over summed living max HP, as a whole percent
    pub average_hp_percent: i32,
}

/// Full record of one squad attack or counterattack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatLog {
    pub attacker_squad: SquadId,
    pub defender_squad: SquadId,
    pub attacker_name: String,
    pub defender_name: String,
    pub squad_distance: i32,
    pub events: Vec<AttackEvent>,
    pub attacking_units: Vec<UnitSnapshot>,
    pub defending_units: Vec<UnitSnapshot>,
    pub total_damage: i32,
    pub units_killed: usize,
    pub defender_status: SquadStatus,
}

impl CombatLog {
    pub fn new(
        attacker_squad: SquadId,
        defender_squad: SquadId,
        attacker_name: String,
        defender_name: String,
        squad_distance: i32,
    ) -> Self {
        Self {
            attacker_squad,
            defender_squad,
            attacker_name,
            defender_name,
            squad_distance,
            events: Vec::new(),
            attacking_units: Vec::new(),
            defending_units: Vec::new(),
            total_damage: 0,
            units_killed: 0,
            defender_status: SquadStatus::default(),
        }
    }

    pub fn push(&mut self, event: AttackEvent) {
        self.events.push(event);
    }

    /// Events whose hit landed
    pub fn hits(&self) -> impl Iterator<Item = &AttackEvent> + '_ {
        self.events.iter().filter(|e| e.hit_result.hit_type.landed())
    }
}
