use thiserror::Error;

use crate::core::types::{SquadId, UnitId};

#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("Squad not found: {0}")]
    SquadNotFound(SquadId),

    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Unknown unit template: {0}")]
    UnknownTemplate(String),

    #[error("Invalid grid position ({row}, {col})")]
    OutOfBounds { row: usize, col: usize },

    #[error("Unit would extend outside grid at ({row}, {col}) with size {width}x{height}")]
    ExtendsOutsideGrid {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("Cell ({row}, {col}) already occupied by {occupant}")]
    CellOccupied {
        row: usize,
        col: usize,
        occupant: UnitId,
    },

    #[error("Insufficient squad capacity: need {needed:.2}, have {remaining:.2} remaining")]
    InsufficientCapacity { needed: f64, remaining: f64 },

    #[error("Invalid footprint {width}x{height} (each side must be 1-3)")]
    InvalidFootprint { width: usize, height: usize },

    #[error("Invalid template {name}: {reason}")]
    InvalidTemplate { name: String, reason: String },

    #[error("Unit {unit} is not a member of {squad}")]
    NotInSquad { unit: UnitId, squad: SquadId },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TacticsError>;
