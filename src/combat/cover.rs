//! Cover aggregation
//!
//! A unit shields squadmates standing behind it in a shared column, up to
//! its cover range in rows. Each provider counts once no matter how many
//! columns it shares with the defender.

use crate::combat::constants::MAX_COVER_REDUCTION;
use crate::combat::events::{CoverBreakdown, CoverProvider};
use crate::core::types::UnitId;
use crate::ecs::World;

/// Same-squad units positioned to shield `defender_id`, in member order
///
/// Position only; a dead provider is still returned here and simply
/// contributes nothing when its cover requires it to be active.
pub fn cover_providers(world: &World, defender_id: UnitId) -> Vec<UnitId> {
    let Some(defender) = world.unit(defender_id) else {
        return Vec::new();
    };
    let target = defender.footprint;

    world
        .squad_units(defender.squad)
        .filter(|unit| unit.id != defender_id)
        .filter(|unit| {
            let Some(cover) = unit.cover else {
                return false;
            };
            let row = unit.footprint.anchor_row;
            row < target.anchor_row
                && target.anchor_row - row <= cover.range
                && unit.footprint.shares_column_with(&target)
        })
        .map(|unit| unit.id)
        .collect()
}

/// Total reduction with every contributing provider listed
pub fn calculate_cover_breakdown(world: &World, defender_id: UnitId) -> CoverBreakdown {
    let mut breakdown = CoverBreakdown::default();
    let mut total = 0.0;

    for provider_id in cover_providers(world, defender_id) {
        let Some(provider) = world.unit(provider_id) else {
            continue;
        };
        let Some(cover) = provider.cover else {
            continue;
        };

        let value = cover.bonus(provider.is_alive());
        if value <= 0.0 {
            continue;
        }

        total += value;
        breakdown.providers.push(CoverProvider {
            unit_id: provider_id,
            unit_name: provider.name.clone(),
            cover_value: value,
            grid_row: provider.footprint.anchor_row,
            grid_col: provider.footprint.anchor_col,
        });
    }

    breakdown.total_reduction = total.min(MAX_COVER_REDUCTION);
    breakdown
}

/// Fraction of damage removed by cover, 0.0 to 1.0
pub fn calculate_cover(world: &World, defender_id: UnitId) -> f64 {
    calculate_cover_breakdown(world, defender_id).total_reduction
}
