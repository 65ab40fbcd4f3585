//! Squad combat: target selection, cover, the damage pipeline and the
//! orchestrator that drives them

pub mod constants;
pub mod cover;
pub mod damage;
pub mod dice;
pub mod events;
pub mod orchestrator;
pub mod targeting;

pub use cover::{calculate_cover, calculate_cover_breakdown, cover_providers};
pub use damage::{resolve_attack, resolve_counterattack};
pub use dice::{RollSource, ScriptedRolls};
pub use events::{
    AttackEvent, CombatLog, CoverBreakdown, CoverProvider, HitResult, HitType, SquadStatus,
    TargetInfo, UnitSnapshot,
};
pub use orchestrator::{squad_status, CombatResolver, CombatResult};
pub use targeting::{can_unit_attack, select_targets};
