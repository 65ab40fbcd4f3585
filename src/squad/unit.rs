//! Unit data model: attributes, grid footprint, role, targeting and cover
//!
//! Units are pure data. Systems in `squad` and `combat` read these
//! components; only the roster and the combat orchestrator mutate them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{GridCell, SquadId, UnitId};
use crate::squad::constants::*;
use crate::squad::template::UnitTemplate;

fn default_can_act() -> bool {
    true
}

/// Core stats plus current health
///
/// Every combat number is derived from the six base stats; nothing here is
/// a percentage modifier stacked on top of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: i32,
    pub dexterity: i32,
    pub magic: i32,
    pub leadership: i32,
    pub armor: i32,
    pub weapon: i32,
    #[serde(default)]
    pub current_health: i32,
    #[serde(default)]
    pub max_health: i32,
    /// Cleared by stuns and similar effects
    #[serde(default = "default_can_act")]
    pub can_act: bool,
}

impl Attributes {
    /// Stats at full health
    pub fn new(
        strength: i32,
        dexterity: i32,
        magic: i32,
        leadership: i32,
        armor: i32,
        weapon: i32,
    ) -> Self {
        let mut attrs = Self {
            strength,
            dexterity,
            magic,
            leadership,
            armor,
            weapon,
            current_health: 0,
            max_health: 0,
            can_act: true,
        };
        attrs.restore_full_health();
        attrs
    }

    /// Recompute max health from strength and heal to it
    pub fn restore_full_health(&mut self) {
        self.max_health = self.derived_max_health();
        self.current_health = self.max_health;
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    pub fn derived_max_health(&self) -> i32 {
        BASE_HEALTH + self.strength * HEALTH_PER_STRENGTH
    }

    pub fn physical_damage(&self) -> i32 {
        self.strength / DAMAGE_STRENGTH_DIVISOR + self.weapon * DAMAGE_PER_WEAPON
    }

    pub fn physical_resistance(&self) -> i32 {
        self.strength / RESIST_STRENGTH_DIVISOR + self.armor * RESIST_PER_ARMOR
    }

    pub fn magic_damage(&self) -> i32 {
        self.magic * MAGIC_DAMAGE_PER_MAGIC
    }

    pub fn magic_defense(&self) -> i32 {
        self.magic / MAGIC_DEFENSE_DIVISOR + BASE_MAGIC_RESIST
    }

    pub fn hit_rate(&self) -> i32 {
        (BASE_HIT_RATE + self.dexterity * HIT_RATE_PER_DEXTERITY).min(MAX_HIT_RATE)
    }

    pub fn crit_chance(&self) -> i32 {
        (self.dexterity / CRIT_DEXTERITY_DIVISOR).min(MAX_CRIT_CHANCE)
    }

    pub fn dodge_chance(&self) -> i32 {
        (self.dexterity / DODGE_DEXTERITY_DIVISOR).min(MAX_DODGE_CHANCE)
    }

    /// Capacity this unit consumes when seated in a squad (fractional)
    pub fn capacity_cost(&self) -> f64 {
        (self.strength + self.weapon + self.armor) as f64 / CAPACITY_COST_DIVISOR
    }

    /// Squad capacity this unit grants while leading
    pub fn unit_capacity(&self) -> u32 {
        let bonus = (self.leadership / LEADERSHIP_PER_CAPACITY).max(0) as u32;
        (DEFAULT_SQUAD_CAPACITY + bonus).min(MAX_SQUAD_CAPACITY)
    }
}

/// Cells a unit covers, anchored at its top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub anchor_row: usize,
    pub anchor_col: usize,
    pub width: usize,
    pub height: usize,
}

impl Footprint {
    pub fn new(anchor_row: usize, anchor_col: usize, width: usize, height: usize) -> Self {
        Self {
            anchor_row,
            anchor_col,
            width,
            height,
        }
    }

    pub fn single(anchor_row: usize, anchor_col: usize) -> Self {
        Self::new(anchor_row, anchor_col, 1, 1)
    }

    pub fn anchor(&self) -> GridCell {
        GridCell::new(self.anchor_row, self.anchor_col)
    }

    fn row_end(&self) -> usize {
        (self.anchor_row + self.height).min(GRID_SIZE)
    }

    fn col_end(&self) -> usize {
        (self.anchor_col + self.width).min(GRID_SIZE)
    }

    /// Rows covered, clamped to the grid
    pub fn rows(&self) -> impl Iterator<Item = usize> {
        self.anchor_row..self.row_end()
    }

    /// Columns covered, clamped to the grid
    pub fn cols(&self) -> impl Iterator<Item = usize> {
        self.anchor_col..self.col_end()
    }

    /// Every covered cell, row-major
    pub fn cells(&self) -> Vec<GridCell> {
        let cols = self.anchor_col..self.col_end();
        self.rows()
            .flat_map(|row| cols.clone().map(move |col| GridCell::new(row, col)))
            .collect()
    }

    pub fn occupies(&self, row: usize, col: usize) -> bool {
        (self.anchor_row..self.row_end()).contains(&row)
            && (self.anchor_col..self.col_end()).contains(&col)
    }

    pub fn shares_column_with(&self, other: &Footprint) -> bool {
        self.cols().any(|col| other.cols().any(|c| c == col))
    }

    /// True when the anchor sits on the grid and the full extent fits inside it
    pub fn fits_grid(&self) -> bool {
        self.anchor_row < GRID_SIZE
            && self.anchor_col < GRID_SIZE
            && self.anchor_row + self.height <= GRID_SIZE
            && self.anchor_col + self.width <= GRID_SIZE
    }
}

/// Combat role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitRole {
    /// Takes hits first, high defense
    #[default]
    Tank,
    /// High damage output
    Dps,
    /// Buffs, heals, utility
    Support,
}

impl fmt::Display for UnitRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitRole::Tank => "Tank",
            UnitRole::Dps => "DPS",
            UnitRole::Support => "Support",
        };
        f.write_str(name)
    }
}

/// How a unit picks defenders in the enemy squad
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Targeting {
    /// Strike the front-most occupied row among `rows`
    Row {
        rows: Vec<usize>,
        #[serde(default)]
        multi_target: bool,
        /// 0 = every unit in the row
        #[serde(default)]
        max_targets: usize,
    },
    /// Strike specific cells, piercing toward the back row when empty
    Cell { cells: Vec<GridCell> },
    /// Spear thrust down the attacker's column, wrapping to the next column
    Column,
    /// Spell pattern on exact cells; uses magic damage, no pierce
    Magic { cells: Vec<GridCell> },
    /// Everything in the attacker's own row, else the softest target
    Ranged,
}

impl Targeting {
    /// Single-target front-row strike
    pub fn front_row() -> Self {
        Targeting::Row {
            rows: vec![0],
            multi_target: false,
            max_targets: 0,
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            Targeting::Row { .. } => "Row",
            Targeting::Cell { .. } => "Cell",
            Targeting::Column => "Column",
            Targeting::Magic { .. } => "Magic",
            Targeting::Ranged => "Ranged",
        }
    }

    pub fn is_magic(&self) -> bool {
        matches!(self, Targeting::Magic { .. })
    }
}

fn default_requires_active() -> bool {
    true
}

/// Damage reduction a unit grants to allies behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverProfile {
    /// Fraction of damage removed, 0.0 to 1.0
    pub value: f64,
    /// How many rows behind receive cover
    pub range: usize,
    /// Dead providers grant nothing when set
    #[serde(default = "default_requires_active")]
    pub requires_active: bool,
}

impl CoverProfile {
    pub fn new(value: f64, range: usize) -> Self {
        Self {
            value,
            range,
            requires_active: true,
        }
    }

    /// Cover value given the provider's state
    pub fn bonus(&self, is_active: bool) -> f64 {
        if self.requires_active && !is_active {
            return 0.0;
        }
        self.value
    }
}

/// A unit seated in a squad
#[derive(Debug, Clone, Serialize)]
pub struct Unit {
    pub id: UnitId,
    pub squad: SquadId,
    pub name: String,
    pub attributes: Attributes,
    pub footprint: Footprint,
    pub role: UnitRole,
    pub targeting: Option<Targeting>,
    pub cover: Option<CoverProfile>,
    /// World tiles; a unit without range never acts
    pub attack_range: Option<u32>,
    /// Tiles per turn on the world map
    pub movement_speed: Option<u32>,
}

impl Unit {
    /// Build a full-health unit from a template anchored at (row, col)
    pub fn from_template(
        id: UnitId,
        squad: SquadId,
        template: &UnitTemplate,
        row: usize,
        col: usize,
    ) -> Self {
        let mut attributes = template.attributes;
        attributes.restore_full_health();
        attributes.can_act = true;

        Self {
            id,
            squad,
            name: template.name.clone(),
            attributes,
            footprint: Footprint::new(row, col, template.width, template.height),
            role: template.role,
            targeting: template.targeting.clone(),
            cover: template.cover,
            attack_range: template.attack_range,
            movement_speed: template.movement_speed,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.attributes.is_alive()
    }

    pub fn current_health(&self) -> i32 {
        self.attributes.current_health
    }
}
