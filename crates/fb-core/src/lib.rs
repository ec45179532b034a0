//! Shared domain model for fishbowl: workspace snapshot records, the
//! floor-plan configuration, derived scene types, and the deterministic
//! visual identity generator.

pub mod identity;
pub mod layout;
pub mod scene;
pub mod types;
