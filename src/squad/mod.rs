//! Squads: units on a 3x3 grid, capacity budget, roster and queries

pub mod capacity;
pub mod constants;
pub mod grid;
pub mod queries;
pub mod roster;
pub mod state;
pub mod template;
pub mod unit;

pub use capacity::{can_add_unit, is_over_capacity, remaining_capacity};
pub use grid::{occupancy, units_at, units_in_column, units_in_row};
pub use queries::{
    is_squad_destroyed, squad_distance, squad_health_percent, squad_movement_speed,
    squad_primary_role, would_squad_survive,
};
pub use state::Squad;
pub use template::{TemplateRegistry, UnitTemplate};
pub use unit::{Attributes, CoverProfile, Footprint, Targeting, Unit, UnitRole};
