//! Action Definitions
//!
//! The fixed action set agents choose from, and movement directions.

pub mod catalog;
pub mod movement;

pub use catalog::Action;
pub use movement::Direction;
