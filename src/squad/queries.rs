//! Read-only squad queries used by combat, movement and the UI
//!
//! Missing squads never panic: they read as destroyed, distance -1,
//! speed 0 and so on.

use ahash::AHashMap;

use crate::core::types::{SquadId, UnitId};
use crate::ecs::World;
use crate::squad::unit::UnitRole;

/// Cached destroyed flag; a missing squad counts as destroyed
pub fn is_squad_destroyed(world: &World, squad_id: SquadId) -> bool {
    world
        .squad(squad_id)
        .map(|squad| squad.is_destroyed())
        .unwrap_or(true)
}

/// Destroyed means no member has positive health
///
/// Morale plays no part here. A squad with no members at all is destroyed.
pub fn compute_squad_destroyed(world: &World, squad_id: SquadId) -> bool {
    !world.squad_units(squad_id).any(|unit| unit.is_alive())
}

/// Recompute the cached destroyed flag; returns the new value
pub fn refresh_destroyed(world: &mut World, squad_id: SquadId) -> bool {
    let destroyed = compute_squad_destroyed(world, squad_id);
    if let Some(squad) = world.squad_mut(squad_id) {
        if destroyed && !squad.destroyed && !squad.members.is_empty() {
            tracing::info!("{} ({}) has been destroyed", squad.name, squad_id);
        }
        squad.destroyed = destroyed;
    }
    destroyed
}

/// Chebyshev distance between squad positions, -1 when either is missing
pub fn squad_distance(world: &World, a: SquadId, b: SquadId) -> i32 {
    match (world.squad(a), world.squad(b)) {
        (Some(first), Some(second)) => first.position.chebyshev_distance(&second.position),
        _ => -1,
    }
}

/// The squad moves at the speed of its slowest living member
///
/// Units without a speed are ignored; 0 when nobody qualifies.
pub fn squad_movement_speed(world: &World, squad_id: SquadId) -> u32 {
    world
        .squad_units(squad_id)
        .filter(|unit| unit.is_alive())
        .filter_map(|unit| unit.movement_speed)
        .min()
        .unwrap_or(0)
}

/// Average current/max health of living members, 0.0 to 1.0
pub fn squad_health_percent(world: &World, squad_id: SquadId) -> f64 {
    let ratios: Vec<f64> = world
        .squad_units(squad_id)
        .filter(|unit| unit.is_alive() && unit.attributes.max_health > 0)
        .map(|unit| unit.attributes.current_health as f64 / unit.attributes.max_health as f64)
        .collect();

    if ratios.is_empty() {
        return 0.0;
    }
    ratios.iter().sum::<f64>() / ratios.len() as f64
}

/// Most common role among members
///
/// Ties go to Tank, then DPS, then Support. An empty squad reads as DPS.
pub fn squad_primary_role(world: &World, squad_id: SquadId) -> UnitRole {
    let mut counts = [0usize; 3];
    for unit in world.squad_units(squad_id) {
        let slot = match unit.role {
            UnitRole::Tank => 0,
            UnitRole::Dps => 1,
            UnitRole::Support => 2,
        };
        counts[slot] += 1;
    }

    let roles = [UnitRole::Tank, UnitRole::Dps, UnitRole::Support];
    let mut best = UnitRole::Dps;
    let mut best_count = 0;
    for (role, count) in roles.into_iter().zip(counts) {
        if count > best_count {
            best = role;
            best_count = count;
        }
    }
    best
}

/// Whether any member keeps positive health after the predicted damage
pub fn would_squad_survive(
    world: &World,
    squad_id: SquadId,
    predicted_damage: &AHashMap<UnitId, i32>,
) -> bool {
    world.squad_units(squad_id).any(|unit| {
        let incoming = predicted_damage.get(&unit.id).copied().unwrap_or(0);
        unit.current_health() - incoming > 0
    })
}

/// (living, total) member counts
pub fn squad_unit_counts(world: &World, squad_id: SquadId) -> (usize, usize) {
    world
        .squad_units(squad_id)
        .fold((0, 0), |(alive, total), unit| {
            (alive + usize::from(unit.is_alive()), total + 1)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::WorldPos;
    use crate::squad::roster;
    use crate::squad::template::TemplateRegistry;

    fn squad_with(names: &[(&str, usize, usize)]) -> (World, SquadId, Vec<UnitId>) {
        let registry = TemplateRegistry::with_defaults();
        let mut world = World::new();
        let squad = roster::create_squad(&mut world, "Query", WorldPos::new(0, 0));
        let ids = names
            .iter()
            .map(|(name, row, col)| {
                roster::place_unit(&mut world, squad, registry.get(name).unwrap(), *row, *col).unwrap()
            })
            .collect();
        (world, squad, ids)
    }

    #[test]
    fn test_distance_is_chebyshev() {
        let mut world = World::new();
        let a = roster::create_squad(&mut world, "A", WorldPos::new(0, 0));
        let b = roster::create_squad(&mut world, "B", WorldPos::new(3, -1));
        assert_eq!(squad_distance(&world, a, b), 3);
        assert_eq!(squad_distance(&world, b, a), 3);
    }

    #[test]
    fn test_distance_missing_squad() {
        let mut world = World::new();
        let a = roster::create_squad(&mut world, "A", WorldPos::default());
        let b = roster::create_squad(&mut world, "B", WorldPos::default());
        world.despawn_squad(b);
        assert_eq!(squad_distance(&world, a, b), -1);
        assert!(is_squad_destroyed(&world, b));
    }

    #[test]
    fn test_destroyed_tracks_health_only() {
        let (mut world, squad, ids) = squad_with(&[("swordsman", 0, 0), ("archer", 2, 0)]);
        assert!(!is_squad_destroyed(&world, squad));

        roster::set_unit_health(&mut world, ids[0], 0).unwrap();
        assert!(!is_squad_destroyed(&world, squad));

        if let Some(s) = world.squad_mut(squad) {
            s.morale = 0;
        }
        assert!(!compute_squad_destroyed(&world, squad));

        roster::set_unit_health(&mut world, ids[1], 0).unwrap();
        assert!(is_squad_destroyed(&world, squad));
    }

    #[test]
    fn test_movement_speed_is_slowest_living() {
        let (mut world, squad, ids) = squad_with(&[("swordsman", 0, 0), ("knight", 0, 1)]);
        assert_eq!(squad_movement_speed(&world, squad), 2);

        roster::set_unit_health(&mut world, ids[1], 0).unwrap();
        assert_eq!(squad_movement_speed(&world, squad), 3);

        roster::set_unit_health(&mut world, ids[0], 0).unwrap();
        assert_eq!(squad_movement_speed(&world, squad), 0);
    }

    #[test]
    fn test_health_percent_averages_living() {
        let (mut world, squad, ids) = squad_with(&[("swordsman", 0, 0), ("swordsman", 0, 1)]);
        let max = world.unit(ids[0]).unwrap().attributes.max_health;
        roster::set_unit_health(&mut world, ids[0], max / 2).unwrap();
        let percent = squad_health_percent(&world, squad);
        assert!((percent - 0.75).abs() < 0.05);

        roster::set_unit_health(&mut world, ids[1], 0).unwrap();
        let percent = squad_health_percent(&world, squad);
        assert!((percent - (max / 2) as f64 / max as f64).abs() < 1e-9);
    }

    #[test]
    fn test_primary_role() {
        let (world, squad, _) = squad_with(&[("swordsman", 0, 0), ("archer", 2, 0), ("knight", 0, 1)]);
        assert_eq!(squad_primary_role(&world, squad), UnitRole::Dps);

        let mut empty = World::new();
        let lone = roster::create_squad(&mut empty, "Empty", WorldPos::default());
        assert_eq!(squad_primary_role(&empty, lone), UnitRole::Dps);
    }

    #[test]
    fn test_would_squad_survive() {
        let (world, squad, ids) = squad_with(&[("swordsman", 0, 0), ("archer", 2, 0)]);
        let mut predicted = AHashMap::new();
        predicted.insert(ids[0], 1000);
        assert!(would_squad_survive(&world, squad, &predicted));

        predicted.insert(ids[1], 1000);
        assert!(!would_squad_survive(&world, squad, &predicted));
    }

    #[test]
    fn test_unit_counts() {
        let (mut world, squad, ids) = squad_with(&[("swordsman", 0, 0), ("archer", 2, 0)]);
        roster::set_unit_health(&mut world, ids[1], 0).unwrap();
        assert_eq!(squad_unit_counts(&world, squad), (1, 2));
    }
}
