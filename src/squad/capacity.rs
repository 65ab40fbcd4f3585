//! Capacity model: how many unit "slots" a squad's leader can command
//!
//! Total capacity comes from the leader's leadership, used capacity from
//! the summed cost of every seated unit. Both are cached on the squad and
//! recomputed by `refresh_capacity`.

use crate::core::types::SquadId;
use crate::ecs::World;
use crate::squad::constants::DEFAULT_SQUAD_CAPACITY;

/// Capacity granted by the current leader, or the default without one
pub fn compute_total_capacity(world: &World, squad_id: SquadId) -> u32 {
    world
        .squad(squad_id)
        .and_then(|squad| squad.leader)
        .and_then(|leader_id| world.unit(leader_id))
        .map(|leader| leader.attributes.unit_capacity())
        .unwrap_or(DEFAULT_SQUAD_CAPACITY)
}

/// Summed capacity cost of every seated unit, dead or alive
pub fn compute_used_capacity(world: &World, squad_id: SquadId) -> f64 {
    world
        .squad_units(squad_id)
        .map(|unit| unit.attributes.capacity_cost())
        .sum()
}

/// Recompute the cached capacity pair; returns false if the squad is gone
pub fn refresh_capacity(world: &mut World, squad_id: SquadId) -> bool {
    let total = compute_total_capacity(world, squad_id);
    let used = compute_used_capacity(world, squad_id);
    match world.squad_mut(squad_id) {
        Some(squad) => {
            squad.total_capacity = total;
            squad.used_capacity = used;
            true
        }
        None => false,
    }
}

/// Cached remaining capacity; 0 for a missing squad
pub fn remaining_capacity(world: &World, squad_id: SquadId) -> f64 {
    world
        .squad(squad_id)
        .map(|squad| squad.remaining_capacity())
        .unwrap_or(0.0)
}

/// Whether a unit of this cost fits without exceeding the budget
pub fn can_add_unit(world: &World, squad_id: SquadId, unit_cost: f64) -> bool {
    match world.squad(squad_id) {
        Some(squad) => squad.used_capacity + unit_cost <= squad.total_capacity as f64,
        None => false,
    }
}

/// True when a leader change or death left the squad over budget
pub fn is_over_capacity(world: &World, squad_id: SquadId) -> bool {
    remaining_capacity(world, squad_id) < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::WorldPos;
    use crate::squad::roster;
    use crate::squad::template::TemplateRegistry;

    #[test]
    fn test_default_capacity_without_leader() {
        let mut world = World::new();
        let squad = roster::create_squad(&mut world, "Leaderless", WorldPos::default());
        assert_eq!(compute_total_capacity(&world, squad), DEFAULT_SQUAD_CAPACITY);
        assert_eq!(compute_used_capacity(&world, squad), 0.0);
    }

    #[test]
    fn test_used_capacity_matches_sum_of_costs() {
        let registry = TemplateRegistry::with_defaults();
        let mut world = World::new();
        let squad = roster::create_squad(&mut world, "Sum", WorldPos::default());
        let sword = registry.get("swordsman").unwrap();
        let archer = registry.get("archer").unwrap();

        roster::place_unit(&mut world, squad, sword, 0, 0).unwrap();
        roster::place_unit(&mut world, squad, archer, 2, 0).unwrap();

        let expected = sword.attributes.capacity_cost() + archer.attributes.capacity_cost();
        let cached = world.squad(squad).unwrap().used_capacity();
        assert!((cached - expected).abs() < 1e-9);
        assert!((compute_used_capacity(&world, squad) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_can_add_unit_at_exact_budget() {
        let mut world = World::new();
        let squad = roster::create_squad(&mut world, "Edge", WorldPos::default());
        assert!(can_add_unit(&world, squad, 6.0));
        assert!(!can_add_unit(&world, squad, 6.01));
    }

    #[test]
    fn test_missing_squad_has_no_capacity() {
        let mut world = World::new();
        let squad = roster::create_squad(&mut world, "Gone", WorldPos::default());
        world.despawn_squad(squad);
        assert!(!can_add_unit(&world, squad, 0.1));
        assert_eq!(remaining_capacity(&world, squad), 0.0);
        assert!(!refresh_capacity(&mut world, squad));
    }
}
