//! Domain model for the allocator.
//!
//! # Responsibility
//! - Define the group taxonomy, the student record, and the raw input
//!   contracts handed over by the tabular adapter.
//!
//! # Invariants
//! - Students are identified by their positive integer matriculation
//!   number.
//! - The taxonomy is fixed at 4 macro-groups x 3 rooms x 2 turns.

pub mod student;
pub mod taxonomy;
