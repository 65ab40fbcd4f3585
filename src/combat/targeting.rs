//! Target selection - who an attacker strikes in the enemy squad
//!
//! Pure reads over the world. The only side effect is drawing from the
//! roll source when a multi-target row attack has to subsample.

use ahash::AHashSet;

use crate::combat::dice::RollSource;
use crate::core::types::{GridCell, SquadId, UnitId};
use crate::ecs::World;
use crate::squad::constants::GRID_SIZE;
use crate::squad::grid::{living_units_at, units_in_row};
use crate::squad::unit::Targeting;

/// Whether a unit may act against a squad `squad_distance` tiles away
///
/// Requires positive health, the can-act flag and an attack range that
/// reaches. A negative distance (missing squad) never qualifies.
pub fn can_unit_attack(world: &World, unit_id: UnitId, squad_distance: i32) -> bool {
    if squad_distance < 0 {
        return false;
    }
    let Some(unit) = world.unit(unit_id) else {
        return false;
    };
    if !unit.is_alive() || !unit.attributes.can_act {
        return false;
    }
    match unit.attack_range {
        Some(range) => i64::from(range) >= i64::from(squad_distance),
        None => false,
    }
}

/// Ordered defenders the attacker would strike right now
///
/// Empty when the attacker is gone or has no targeting data.
pub fn select_targets<R: RollSource + ?Sized>(
    world: &World,
    attacker_id: UnitId,
    defender_squad: SquadId,
    rolls: &mut R,
) -> Vec<UnitId> {
    let Some(attacker) = world.unit(attacker_id) else {
        return Vec::new();
    };
    let Some(targeting) = &attacker.targeting else {
        return Vec::new();
    };

    let targets = match targeting {
        Targeting::Row {
            rows,
            multi_target,
            max_targets,
        } => select_row_targets(world, defender_squad, rows, *multi_target, *max_targets, rolls),
        Targeting::Cell { cells } => select_cell_targets(world, defender_squad, cells),
        Targeting::Column => {
            select_column_target(world, defender_squad, attacker.footprint.anchor_col)
        }
        Targeting::Magic { cells } => select_magic_targets(world, defender_squad, cells),
        Targeting::Ranged => {
            select_ranged_targets(world, defender_squad, attacker.footprint.anchor_row)
        }
    };

    tracing::debug!(
        "{} ({}) selects {} target(s) in {} via {}",
        attacker.name,
        attacker_id,
        targets.len(),
        defender_squad,
        targeting.mode_name()
    );
    targets
}

/// Rows in scan order: the listed rows front to back, then every row behind
/// the deepest one
fn row_scan_order(rows: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = rows.iter().copied().filter(|r| *r < GRID_SIZE).collect();
    if order.is_empty() {
        return (0..GRID_SIZE).collect();
    }
    order.sort_unstable();
    order.dedup();

    let deepest = order[order.len() - 1];
    order.extend(deepest + 1..GRID_SIZE);
    order
}

fn select_row_targets<R: RollSource + ?Sized>(
    world: &World,
    squad_id: SquadId,
    rows: &[usize],
    multi_target: bool,
    max_targets: usize,
    rolls: &mut R,
) -> Vec<UnitId> {
    let Some(candidates) = row_scan_order(rows)
        .into_iter()
        .map(|row| units_in_row(world, squad_id, row))
        .find(|units| !units.is_empty())
    else {
        return Vec::new();
    };

    if !multi_target {
        // min_by_key keeps the first of equal minimums
        return candidates
            .iter()
            .copied()
            .min_by_key(|id| world.unit(*id).map(|u| u.current_health()).unwrap_or(i32::MAX))
            .into_iter()
            .collect();
    }

    if max_targets == 0 || candidates.len() <= max_targets {
        return candidates;
    }

    let mut picked = rolls.sample_indices(candidates.len(), max_targets);
    picked.sort_unstable();
    picked.into_iter().map(|i| candidates[i]).collect()
}

/// First occupied cell on the way from `start` toward the back row
fn pierce_chain(world: &World, squad_id: SquadId, start: GridCell) -> Vec<UnitId> {
    (start.row..GRID_SIZE)
        .map(|row| living_units_at(world, squad_id, row, start.col))
        .find(|units| !units.is_empty())
        .unwrap_or_default()
}

fn select_cell_targets(world: &World, squad_id: SquadId, cells: &[GridCell]) -> Vec<UnitId> {
    let mut seen = AHashSet::new();
    let mut targets = Vec::new();
    for cell in cells.iter().filter(|c| c.row < GRID_SIZE && c.col < GRID_SIZE) {
        for unit_id in pierce_chain(world, squad_id, *cell) {
            if seen.insert(unit_id) {
                targets.push(unit_id);
            }
        }
    }
    targets
}

fn select_magic_targets(world: &World, squad_id: SquadId, cells: &[GridCell]) -> Vec<UnitId> {
    let mut seen = AHashSet::new();
    let mut targets = Vec::new();
    for cell in cells {
        for unit_id in living_units_at(world, squad_id, cell.row, cell.col) {
            if seen.insert(unit_id) {
                targets.push(unit_id);
            }
        }
    }
    targets
}

/// Spear thrust: own column first, wrapping right, front to back within each
fn select_column_target(world: &World, squad_id: SquadId, attacker_col: usize) -> Vec<UnitId> {
    for offset in 0..GRID_SIZE {
        let col = (attacker_col + offset) % GRID_SIZE;
        for row in 0..GRID_SIZE {
            if let Some(unit_id) = living_units_at(world, squad_id, row, col).into_iter().next() {
                return vec![unit_id];
            }
        }
    }
    Vec::new()
}

/// Everything in the attacker's row, else the least armored unit
fn select_ranged_targets(world: &World, squad_id: SquadId, attacker_row: usize) -> Vec<UnitId> {
    let same_row = units_in_row(world, squad_id, attacker_row);
    if !same_row.is_empty() {
        return same_row;
    }

    // Lowest resistance, then deepest row, then leftmost column
    world
        .squad_units(squad_id)
        .filter(|unit| unit.is_alive())
        .min_by_key(|unit| {
            (
                unit.attributes.physical_resistance(),
                std::cmp::Reverse(unit.footprint.anchor_row),
                unit.footprint.anchor_col,
            )
        })
        .map(|unit| vec![unit.id])
        .unwrap_or_default()
}
