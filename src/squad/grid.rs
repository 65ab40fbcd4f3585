//! Grid occupancy model for the 3x3 squad grid
//!
//! Cells are never stored. Occupancy is derived on demand from unit
//! footprints, so moves, deaths and removals can never leave a stale cell
//! behind.

use ahash::AHashSet;

use crate::core::error::{Result, TacticsError};
use crate::core::types::{GridCell, SquadId, UnitId};
use crate::ecs::World;
use crate::squad::constants::GRID_SIZE;
use crate::squad::unit::Footprint;

/// Every unit (dead or alive) whose footprint covers the cell
pub fn units_at(world: &World, squad_id: SquadId, row: usize, col: usize) -> Vec<UnitId> {
    world
        .squad_units(squad_id)
        .filter(|unit| unit.footprint.occupies(row, col))
        .map(|unit| unit.id)
        .collect()
}

/// Living units covering the cell
pub fn living_units_at(world: &World, squad_id: SquadId, row: usize, col: usize) -> Vec<UnitId> {
    world
        .squad_units(squad_id)
        .filter(|unit| unit.is_alive() && unit.footprint.occupies(row, col))
        .map(|unit| unit.id)
        .collect()
}

fn collect_living(world: &World, squad_id: SquadId, cells: impl Iterator<Item = GridCell>) -> Vec<UnitId> {
    let mut seen = AHashSet::new();
    let mut units = Vec::new();
    for cell in cells {
        for unit_id in living_units_at(world, squad_id, cell.row, cell.col) {
            if seen.insert(unit_id) {
                units.push(unit_id);
            }
        }
    }
    units
}

/// Living units in a row, left to right; a multi-cell unit appears once
pub fn units_in_row(world: &World, squad_id: SquadId, row: usize) -> Vec<UnitId> {
    if row >= GRID_SIZE {
        return Vec::new();
    }
    collect_living(world, squad_id, (0..GRID_SIZE).map(|col| GridCell::new(row, col)))
}

/// Living units in a column, front to back; a multi-cell unit appears once
pub fn units_in_column(world: &World, squad_id: SquadId, col: usize) -> Vec<UnitId> {
    if col >= GRID_SIZE {
        return Vec::new();
    }
    collect_living(world, squad_id, (0..GRID_SIZE).map(|row| GridCell::new(row, col)))
}

/// Snapshot of which unit covers each cell (row-major)
pub fn occupancy(world: &World, squad_id: SquadId) -> [[Option<UnitId>; GRID_SIZE]; GRID_SIZE] {
    let mut grid = [[None; GRID_SIZE]; GRID_SIZE];
    for unit in world.squad_units(squad_id) {
        for cell in unit.footprint.cells() {
            grid[cell.row][cell.col] = Some(unit.id);
        }
    }
    grid
}

/// Validate a footprint against grid bounds and the squad's other units
///
/// `ignore` lets a unit being moved overlap its own current cells. Every
/// seated unit blocks, including dead ones still waiting for removal.
pub fn check_placement(
    world: &World,
    squad_id: SquadId,
    footprint: &Footprint,
    ignore: Option<UnitId>,
) -> Result<()> {
    if footprint.anchor_row >= GRID_SIZE || footprint.anchor_col >= GRID_SIZE {
        return Err(TacticsError::OutOfBounds {
            row: footprint.anchor_row,
            col: footprint.anchor_col,
        });
    }

    if !footprint.fits_grid() {
        return Err(TacticsError::ExtendsOutsideGrid {
            row: footprint.anchor_row,
            col: footprint.anchor_col,
            width: footprint.width,
            height: footprint.height,
        });
    }

    for cell in footprint.cells() {
        let occupant = units_at(world, squad_id, cell.row, cell.col)
            .into_iter()
            .find(|id| Some(*id) != ignore);
        if let Some(occupant) = occupant {
            return Err(TacticsError::CellOccupied {
                row: cell.row,
                col: cell.col,
                occupant,
            });
        }
    }

    Ok(())
}
