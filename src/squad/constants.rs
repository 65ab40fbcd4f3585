//! Squad and unit constants - grid size, capacity rules, attribute derivations

// Grid
pub const GRID_SIZE: usize = 3;
pub const MAX_FOOTPRINT_SIDE: usize = 3;

// Capacity
pub const DEFAULT_SQUAD_CAPACITY: u32 = 6;
pub const MAX_SQUAD_CAPACITY: u32 = 9;
pub const LEADERSHIP_PER_CAPACITY: i32 = 3;
pub const CAPACITY_COST_DIVISOR: f64 = 5.0;

// Squad defaults
pub const STARTING_MORALE: i32 = 100;

// Health
pub const BASE_HEALTH: i32 = 20;
pub const HEALTH_PER_STRENGTH: i32 = 2;

// Physical damage and resistance
pub const DAMAGE_STRENGTH_DIVISOR: i32 = 2;
pub const DAMAGE_PER_WEAPON: i32 = 2;
pub const RESIST_STRENGTH_DIVISOR: i32 = 4;
pub const RESIST_PER_ARMOR: i32 = 2;

// Magic
pub const MAGIC_DAMAGE_PER_MAGIC: i32 = 3;
pub const MAGIC_DEFENSE_DIVISOR: i32 = 2;
pub const BASE_MAGIC_RESIST: i32 = 5;

// Percentile thresholds
pub const BASE_HIT_RATE: i32 = 80;
pub const HIT_RATE_PER_DEXTERITY: i32 = 2;
pub const MAX_HIT_RATE: i32 = 100;
pub const CRIT_DEXTERITY_DIVISOR: i32 = 2;
pub const MAX_CRIT_CHANCE: i32 = 50;
pub const DODGE_DEXTERITY_DIVISOR: i32 = 3;
pub const MAX_DODGE_CHANCE: i32 = 40;
