//! Core domain logic for the lab-group allocator.
//! This crate is the single source of truth for assignment invariants.

pub mod diag;
pub mod logging;
pub mod model;
pub mod roster;
pub mod service;

pub use diag::{Diagnostic, Severity};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::student::{RawStudentRow, Student, StudentId, StudentRowError};
pub use model::taxonomy::{GroupOverrides, MacroGroup, RawOverrideRow, RoomGroup, TurnGroup};
pub use roster::{Roster, RosterError, RosterResult};
pub use service::assignment::{assign_groups, Occupancy};
pub use service::report::{full_report, room_group_report, AssignmentRecord};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
