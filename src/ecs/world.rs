//! ECS World - owns every unit and squad of a battle

use crate::core::types::{SquadId, UnitId, WorldPos};
use crate::ecs::arena::Arena;
use crate::squad::state::Squad;
use crate::squad::unit::Unit;

/// Storage for one battle's units and squads
///
/// Cloning a world gives a fully isolated copy, which is how independent
/// simulated battles avoid sharing state.
#[derive(Debug, Clone, Default)]
pub struct World {
    units: Arena<Unit>,
    squads: Arena<Squad>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_squad(&mut self, name: impl Into<String>, position: WorldPos) -> SquadId {
        let name = name.into();
        SquadId(
            self.squads
                .insert_with(|index| Squad::new(SquadId(index), name, position)),
        )
    }

    /// Remove a squad together with all of its members
    pub fn despawn_squad(&mut self, squad_id: SquadId) -> Option<Squad> {
        let squad = self.squads.remove(squad_id.0)?;
        for unit_id in &squad.members {
            self.units.remove(unit_id.0);
        }
        Some(squad)
    }

    pub fn spawn_unit(&mut self, make: impl FnOnce(UnitId) -> Unit) -> UnitId {
        UnitId(self.units.insert_with(|index| make(UnitId(index))))
    }

    pub fn despawn_unit(&mut self, unit_id: UnitId) -> Option<Unit> {
        self.units.remove(unit_id.0)
    }

    pub fn unit(&self, unit_id: UnitId) -> Option<&Unit> {
        self.units.get(unit_id.0)
    }

    pub fn unit_mut(&mut self, unit_id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(unit_id.0)
    }

    pub fn squad(&self, squad_id: SquadId) -> Option<&Squad> {
        self.squads.get(squad_id.0)
    }

    pub fn squad_mut(&mut self, squad_id: SquadId) -> Option<&mut Squad> {
        self.squads.get_mut(squad_id.0)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn squad_count(&self) -> usize {
        self.squads.len()
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().map(|(_, unit)| unit)
    }

    pub fn squads(&self) -> impl Iterator<Item = &Squad> + '_ {
        self.squads.iter().map(|(_, squad)| squad)
    }

    /// Units currently leading a squad
    pub fn leaders(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.squads()
            .filter_map(|squad| squad.leader)
            .filter_map(move |leader_id| self.unit(leader_id))
    }

    /// Member ids of a squad in placement order; empty if the squad is gone
    pub fn squad_unit_ids(&self, squad_id: SquadId) -> Vec<UnitId> {
        match self.squad(squad_id) {
            Some(squad) => squad
                .members
                .iter()
                .copied()
                .filter(|id| self.units.contains(id.0))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Members of a squad in placement order
    pub fn squad_units(&self, squad_id: SquadId) -> impl Iterator<Item = &Unit> + '_ {
        self.squad(squad_id)
            .into_iter()
            .flat_map(|squad| squad.members.iter())
            .filter_map(move |id| self.unit(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::squad::template::TemplateRegistry;

    #[test]
    fn test_spawn_and_despawn_squad() {
        let mut world = World::new();
        let squad_id = world.spawn_squad("Vanguard", WorldPos::new(1, 2));
        assert_eq!(world.squad(squad_id).map(|s| s.name.as_str()), Some("Vanguard"));
        assert_eq!(world.squad(squad_id).map(|s| s.id), Some(squad_id));

        assert!(world.despawn_squad(squad_id).is_some());
        assert!(world.squad(squad_id).is_none());
        assert!(world.squad_unit_ids(squad_id).is_empty());
    }

    #[test]
    fn test_stale_unit_id_resolves_to_none() {
        let registry = TemplateRegistry::with_defaults();
        let template = registry.get("swordsman").unwrap();

        let mut world = World::new();
        let squad_id = world.spawn_squad("A", WorldPos::default());
        let old = world.spawn_unit(|id| Unit::from_template(id, squad_id, template, 0, 0));
        world.despawn_unit(old);
        let new = world.spawn_unit(|id| Unit::from_template(id, squad_id, template, 0, 1));

        assert!(world.unit(old).is_none());
        assert_eq!(world.unit(new).map(|u| u.id), Some(new));
    }

    #[test]
    fn test_cloned_world_is_isolated() {
        let mut world = World::new();
        let squad_id = world.spawn_squad("A", WorldPos::default());
        let mut copy = world.clone();
        if let Some(squad) = copy.squad_mut(squad_id) {
            squad.morale = 10;
        }
        assert_eq!(world.squad(squad_id).map(|s| s.morale), Some(100));
    }
}
