//! Balanced turn-group assignment.
//!
//! # Responsibility
//! - Give every unassigned student a turn-group under their declared
//!   cohort, keeping declared partners together.
//! - Track and report per-group occupancy.
//!
//! # Invariants
//! - The pass is a single walk over the roster in insertion order; selection
//!   is fully deterministic with ties broken by enumeration order.
//! - An already-assigned student is never reassigned, so repeating the pass
//!   is a no-op for them.
//! - A companion commit bypasses min-selection: both partners land in the
//!   referencing student's group, even across cohorts (flagged beforehand by
//!   the consistency pass, deliberately not re-checked here).

use log::{debug, info};

use crate::model::taxonomy::{MacroGroup, TurnGroup};
use crate::roster::Roster;

/// Per-turn-group occupancy counters for one assignment pass.
///
/// Counts only what the pass itself committed; students assigned before the
/// pass are skipped and not recounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    counts: [u32; TurnGroup::COUNT],
}

impl Occupancy {
    fn new() -> Self {
        Self {
            counts: [0; TurnGroup::COUNT],
        }
    }

    pub fn count(&self, group: TurnGroup) -> u32 {
        self.counts[group.index()]
    }

    fn record(&mut self, group: TurnGroup) {
        self.counts[group.index()] += 1;
    }

    /// The least-loaded turn-group under a cohort; ties go to the first
    /// group in enumeration order.
    pub fn least_loaded(&self, macro_group: MacroGroup) -> TurnGroup {
        let groups = macro_group.turn_groups();
        let mut best = groups[0];
        let mut best_count = self.count(best);
        for &group in &groups[1..] {
            let count = self.count(group);
            if count < best_count {
                best = group;
                best_count = count;
            }
        }
        best
    }

    /// Total committed under one cohort.
    pub fn macro_group_total(&self, macro_group: MacroGroup) -> u32 {
        macro_group
            .turn_groups()
            .iter()
            .map(|&group| self.count(group))
            .sum()
    }

    /// Counters in canonical enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (TurnGroup, u32)> + '_ {
        TurnGroup::all().map(|group| (group, self.count(group)))
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// Assigns a turn-group to every unassigned student.
///
/// For each student in roster order: pick the least-loaded turn-group under
/// the declared cohort, then commit the choice to the student and to their
/// resolvable, still-unassigned companion in one step (both sides are
/// computed before either is written). A companion absent from the roster
/// is skipped silently; the consistency pass has already flagged it.
///
/// Returns the occupancy committed by this pass and logs the per-group and
/// per-cohort totals.
pub fn assign_groups(roster: &mut Roster) -> Occupancy {
    let mut occupancy = Occupancy::new();

    for identifier in roster.identifiers_in_order() {
        let Some(student) = roster.get(identifier) else {
            continue;
        };
        if student.assigned_group.is_some() {
            continue;
        }

        let group = occupancy.least_loaded(student.macro_group);

        // Resolve the companion before committing either side.
        let companion_identifier = student
            .companion_full_name()
            .and_then(|full_name| roster.resolve_full_name(&full_name))
            .filter(|&companion_identifier| companion_identifier != identifier)
            .filter(|&companion_identifier| {
                roster
                    .get(companion_identifier)
                    .is_some_and(|companion| companion.assigned_group.is_none())
            });

        if let Some(student) = roster.get_mut(identifier) {
            student.assigned_group = Some(group);
            occupancy.record(group);
        }
        if let Some(companion_identifier) = companion_identifier {
            if let Some(companion) = roster.get_mut(companion_identifier) {
                debug!(
                    "event=companion_joined module=assignment group={group} \
                     student={identifier} companion={companion_identifier}"
                );
                companion.assigned_group = Some(group);
                occupancy.record(group);
            }
        }
    }

    for (group, count) in occupancy.iter() {
        info!("event=turn_group_occupancy module=assignment group={group} students={count}");
    }
    for macro_group in MacroGroup::ALL {
        info!(
            "event=macro_group_total module=assignment group={macro_group} students={}",
            occupancy.macro_group_total(macro_group)
        );
    }

    occupancy
}
