//! Roster operations - the only code that changes squad membership or layout
//!
//! Every function here ends with `refresh_squad`, so the capacity pair and
//! the destroyed flag are never stale once control returns to the caller.

use crate::core::error::{Result, TacticsError};
use crate::core::types::{SquadId, UnitId, WorldPos};
use crate::ecs::World;
use crate::squad::capacity::{can_add_unit, is_over_capacity, refresh_capacity, remaining_capacity};
use crate::squad::grid::check_placement;
use crate::squad::queries::refresh_destroyed;
use crate::squad::template::UnitTemplate;
use crate::squad::unit::{Footprint, Unit};

/// Recompute every cached value on the squad; false if the squad is gone
pub fn refresh_squad(world: &mut World, squad_id: SquadId) -> bool {
    if !refresh_capacity(world, squad_id) {
        return false;
    }
    refresh_destroyed(world, squad_id);
    true
}

pub fn create_squad(world: &mut World, name: impl Into<String>, position: WorldPos) -> SquadId {
    let squad_id = world.spawn_squad(name, position);
    refresh_squad(world, squad_id);
    tracing::debug!("Created {} at ({}, {})", squad_id, position.x, position.y);
    squad_id
}

/// Seat a new unit built from `template` with its anchor at (row, col)
///
/// Checks run in a fixed order: template shape, anchor bounds, grid extent,
/// collisions, then capacity. The first failure is returned.
pub fn place_unit(
    world: &mut World,
    squad_id: SquadId,
    template: &UnitTemplate,
    row: usize,
    col: usize,
) -> Result<UnitId> {
    template.validate()?;

    if world.squad(squad_id).is_none() {
        return Err(TacticsError::SquadNotFound(squad_id));
    }

    let footprint = Footprint::new(row, col, template.width, template.height);
    check_placement(world, squad_id, &footprint, None)?;

    let cost = template.attributes.capacity_cost();
    if !can_add_unit(world, squad_id, cost) {
        return Err(TacticsError::InsufficientCapacity {
            needed: cost,
            remaining: remaining_capacity(world, squad_id),
        });
    }

    let unit_id = world.spawn_unit(|id| Unit::from_template(id, squad_id, template, row, col));
    if let Some(squad) = world.squad_mut(squad_id) {
        squad.members.push(unit_id);
    }
    refresh_squad(world, squad_id);

    tracing::debug!(
        "Placed {} ({}) in {} at ({}, {}), cost {:.1}",
        template.name,
        unit_id,
        squad_id,
        row,
        col,
        cost
    );
    Ok(unit_id)
}

/// Remove a unit from its squad and free its slot
///
/// Removing the leader leaves the squad leaderless (default capacity).
pub fn remove_unit(world: &mut World, unit_id: UnitId) -> Result<()> {
    let unit = world
        .despawn_unit(unit_id)
        .ok_or(TacticsError::UnitNotFound(unit_id))?;

    if let Some(squad) = world.squad_mut(unit.squad) {
        squad.members.retain(|id| *id != unit_id);
        if squad.leader == Some(unit_id) {
            squad.leader = None;
        }
    }
    refresh_squad(world, unit.squad);

    if is_over_capacity(world, unit.squad) {
        tracing::warn!("{} is over capacity after removing {}", unit.squad, unit_id);
    }
    tracing::debug!("Removed {} ({}) from {}", unit.name, unit_id, unit.squad);
    Ok(())
}

/// Re-anchor a unit inside its squad's grid
pub fn move_unit(world: &mut World, unit_id: UnitId, row: usize, col: usize) -> Result<()> {
    let unit = world.unit(unit_id).ok_or(TacticsError::UnitNotFound(unit_id))?;
    let squad_id = unit.squad;
    let footprint = Footprint::new(row, col, unit.footprint.width, unit.footprint.height);

    check_placement(world, squad_id, &footprint, Some(unit_id))?;

    if let Some(unit) = world.unit_mut(unit_id) {
        unit.footprint = footprint;
    }
    refresh_squad(world, squad_id);
    Ok(())
}

/// Make a member the squad leader
///
/// A leader with less leadership can leave the squad over capacity. That is
/// allowed; it is logged and reported by `is_over_capacity`.
pub fn set_leader(world: &mut World, squad_id: SquadId, unit_id: UnitId) -> Result<()> {
    let squad = world
        .squad(squad_id)
        .ok_or(TacticsError::SquadNotFound(squad_id))?;
    let unit = world.unit(unit_id).ok_or(TacticsError::UnitNotFound(unit_id))?;
    if unit.squad != squad_id || !squad.members.contains(&unit_id) {
        return Err(TacticsError::NotInSquad {
            unit: unit_id,
            squad: squad_id,
        });
    }

    if let Some(squad) = world.squad_mut(squad_id) {
        squad.leader = Some(unit_id);
    }
    refresh_squad(world, squad_id);
    warn_if_over_capacity(world, squad_id);
    Ok(())
}

/// Change a unit's leadership stat; recomputes capacity when it leads
pub fn set_leadership(world: &mut World, unit_id: UnitId, leadership: i32) -> Result<()> {
    let unit = world
        .unit_mut(unit_id)
        .ok_or(TacticsError::UnitNotFound(unit_id))?;
    unit.attributes.leadership = leadership;
    let squad_id = unit.squad;

    refresh_squad(world, squad_id);
    warn_if_over_capacity(world, squad_id);
    Ok(())
}

/// External heal/damage hook; health is clamped to [0, max]
pub fn set_unit_health(world: &mut World, unit_id: UnitId, health: i32) -> Result<()> {
    let unit = world
        .unit_mut(unit_id)
        .ok_or(TacticsError::UnitNotFound(unit_id))?;
    let max_health = unit.attributes.max_health.max(0);
    unit.attributes.current_health = health.max(0).min(max_health);
    let squad_id = unit.squad;

    refresh_squad(world, squad_id);
    Ok(())
}

/// Stun or release a unit
pub fn set_unit_can_act(world: &mut World, unit_id: UnitId, can_act: bool) -> Result<()> {
    let unit = world
        .unit_mut(unit_id)
        .ok_or(TacticsError::UnitNotFound(unit_id))?;
    unit.attributes.can_act = can_act;
    Ok(())
}

pub fn move_squad(world: &mut World, squad_id: SquadId, position: WorldPos) -> Result<()> {
    let squad = world
        .squad_mut(squad_id)
        .ok_or(TacticsError::SquadNotFound(squad_id))?;
    squad.position = position;
    refresh_squad(world, squad_id);
    Ok(())
}

fn warn_if_over_capacity(world: &World, squad_id: SquadId) {
    if let Some(squad) = world.squad(squad_id) {
        if squad.remaining_capacity() < 0.0 {
            tracing::warn!(
                "{} is over capacity: {:.1} used of {}",
                squad.name,
                squad.used_capacity(),
                squad.total_capacity()
            );
        }
    }
}
