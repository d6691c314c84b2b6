//! Simulation Systems
//!
//! The per-agent operations, and the ECS systems that compose them into a tick.

pub mod belief;
pub mod environment;
pub mod learning;
pub mod lifecycle;
pub mod policy;
pub mod turn;

pub use environment::{resolve_action, BirthRequest, Resolution};
pub use learning::{apply_update, bandit_update};
pub use policy::{decide_action, Decision};
pub use turn::*;
