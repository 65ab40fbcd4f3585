//! Squad Tactics - formation combat on a 3x3 grid

pub mod combat;
pub mod core;
pub mod ecs;
pub mod squad;
