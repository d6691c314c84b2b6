//! Simulation Components
//!
//! State for agents, their value memory, and the shared world.

pub mod agent;
pub mod memory;
pub mod world;

pub use agent::*;
pub use memory::*;
pub use world::*;
