//! Shared types for the swipe-typing engine workspace.

pub mod types;

pub use types::*;
