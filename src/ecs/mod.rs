//! Entity storage: a generational arena and the world that owns units and squads

pub mod arena;
pub mod world;

pub use arena::Arena;
pub use world::World;
