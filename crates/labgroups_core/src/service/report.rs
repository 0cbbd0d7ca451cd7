//! Per-room-group report extraction.
//!
//! # Responsibility
//! - Project assigned students into the record shape the output adapter
//!   renders, one list per room-group.
//!
//! # Invariants
//! - Records are sorted by (assigned group, surname); the sort is stable so
//!   equal keys keep roster order.
//! - Students without an assigned group are not reported.

use serde::Serialize;

use crate::model::student::StudentId;
use crate::model::taxonomy::{RoomGroup, TurnGroup};
use crate::roster::Roster;

/// One assigned student as rendered in a room-group report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRecord {
    pub name: String,
    pub surname: String,
    pub identifier: StudentId,
    pub email: String,
    pub group: TurnGroup,
}

/// Students assigned under either of a room-group's two turns, sorted by
/// (assigned group, surname).
pub fn room_group_report(roster: &Roster, room_group: RoomGroup) -> Vec<AssignmentRecord> {
    let mut records: Vec<AssignmentRecord> = roster
        .students()
        .filter_map(|student| {
            let group = student.assigned_group?;
            if group.room_group() != room_group {
                return None;
            }
            Some(AssignmentRecord {
                name: student.name.clone(),
                surname: student.surname.clone(),
                identifier: student.identifier,
                email: student.email.clone(),
                group,
            })
        })
        .collect();
    records.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| a.surname.cmp(&b.surname)));
    records
}

/// Reports for all twelve room-groups in taxonomy order.
pub fn full_report(roster: &Roster) -> Vec<(RoomGroup, Vec<AssignmentRecord>)> {
    RoomGroup::all()
        .map(|room_group| (room_group, room_group_report(roster, room_group)))
        .collect()
}
