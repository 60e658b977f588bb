//! Uniqueness constraint indexes for the in-process graph store

pub mod manager;
pub mod unique_index;

pub use manager::{ConstraintKey, ConstraintManager, Violation};
pub use unique_index::UniqueIndex;
