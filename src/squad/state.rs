//! Squad state component
//!
//! Capacity and the destroyed flag are caches. They are only written by
//! `refresh_squad`, which every roster mutation and every squad attack
//! calls before returning.

use serde::{Deserialize, Serialize};

use crate::core::types::{SquadId, UnitId, WorldPos};
use crate::squad::constants::{DEFAULT_SQUAD_CAPACITY, STARTING_MORALE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Squad {
    pub id: SquadId,
    pub name: String,
    /// 0-100, informational only; destruction is decided by unit health
    pub morale: i32,
    pub turn_count: u32,
    pub position: WorldPos,
    pub leader: Option<UnitId>,
    /// Members in placement order (also the attack order)
    pub members: Vec<UnitId>,
    pub(crate) total_capacity: u32,
    pub(crate) used_capacity: f64,
    pub(crate) destroyed: bool,
}

impl Squad {
    pub fn new(id: SquadId, name: String, position: WorldPos) -> Self {
        Self {
            id,
            name,
            morale: STARTING_MORALE,
            turn_count: 0,
            position,
            leader: None,
            members: Vec::new(),
            total_capacity: DEFAULT_SQUAD_CAPACITY,
            used_capacity: 0.0,
            // No living members yet
            destroyed: true,
        }
    }

    pub fn total_capacity(&self) -> u32 {
        self.total_capacity
    }

    pub fn used_capacity(&self) -> f64 {
        self.used_capacity
    }

    pub fn remaining_capacity(&self) -> f64 {
        self.total_capacity as f64 - self.used_capacity
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn unit_count(&self) -> usize {
        self.members.len()
    }
}
