//! Population Setup
//!
//! Builds the founding population a run starts from.

pub mod founders;

pub use founders::*;
