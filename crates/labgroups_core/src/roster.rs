//! The student roster.
//!
//! # Responsibility
//! - Own every `Student` record for the run, keyed by identifier, in stable
//!   insertion order.
//! - Build from raw adapter rows and run the companion-consistency pass.
//!
//! # Invariants
//! - Iteration order is construction order; the assignment pass depends on
//!   it for determinism.
//! - The primary key is the integer identifier; a duplicate identifier
//!   overwrites the earlier entry in place (documented behavior).
//! - The full-name index points at the most recent insertion carrying that
//!   name; companion lookups resolve through it.

use log::{info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::diag::Diagnostic;
use crate::model::student::{RawStudentRow, Student, StudentId, StudentRowError};
use crate::model::taxonomy::GroupOverrides;

pub type RosterResult<T> = Result<T, RosterError>;

/// Fatal roster construction error, naming the offending input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    InvalidIdentifier { row_index: usize, value: String },
    UnknownMacroGroup { row_index: usize, value: String },
}

impl RosterError {
    fn from_row_error(row_index: usize, source: StudentRowError) -> Self {
        match source {
            StudentRowError::InvalidIdentifier(value) => {
                Self::InvalidIdentifier { row_index, value }
            }
            StudentRowError::UnknownMacroGroup(value) => {
                Self::UnknownMacroGroup { row_index, value }
            }
        }
    }
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier { row_index, value } => write!(
                f,
                "row {row_index}: identifier `{value}` is not a positive integer"
            ),
            Self::UnknownMacroGroup { row_index, value } => {
                write!(f, "row {row_index}: unknown macro-group label `{value}`")
            }
        }
    }
}

impl Error for RosterError {}

/// Ordered collection of students for one run.
#[derive(Debug, Default)]
pub struct Roster {
    students: Vec<Student>,
    by_identifier: HashMap<StudentId, usize>,
    by_full_name: HashMap<String, StudentId>,
}

impl Roster {
    /// Builds the roster from raw adapter rows.
    ///
    /// Soft findings (cohort mismatches, display-name disagreements) are
    /// logged where detected and returned alongside the roster; a malformed
    /// identifier or cohort label aborts the build.
    ///
    /// # Errors
    /// - `RosterError` naming the zero-based row index of the malformed row.
    pub fn from_rows(
        rows: impl IntoIterator<Item = RawStudentRow>,
        overrides: &GroupOverrides,
    ) -> RosterResult<(Roster, Vec<Diagnostic>)> {
        let mut roster = Roster::default();
        let mut diagnostics = Vec::new();

        for (row_index, row) in rows.into_iter().enumerate() {
            let display_name = row.display_name.clone();
            let (student, row_diagnostics) = Student::from_row(row, overrides)
                .map_err(|source| RosterError::from_row_error(row_index, source))?;
            diagnostics.extend(row_diagnostics);

            if let Some(reported) = display_name {
                let reported = reported.trim();
                if !reported.is_empty() && reported != student.full_name() {
                    let diagnostic = Diagnostic::NameMismatch {
                        reported: reported.to_string(),
                        computed: student.full_name(),
                    };
                    diagnostic.emit();
                    diagnostics.push(diagnostic);
                }
            }

            roster.insert(student);
        }

        info!(
            "event=roster_built module=roster students={} findings={}",
            roster.len(),
            diagnostics.len()
        );
        Ok((roster, diagnostics))
    }

    fn insert(&mut self, student: Student) {
        let identifier = student.identifier;
        let full_name = student.full_name();

        match self.by_identifier.get(&identifier).copied() {
            Some(position) => {
                warn!(
                    "event=duplicate_identifier module=roster identifier={identifier} \
                     replaced={:?} kept={:?}",
                    self.students[position].full_name(),
                    full_name
                );
                let previous = std::mem::replace(&mut self.students[position], student);
                let previous_name = previous.full_name();
                if self.by_full_name.get(&previous_name) == Some(&identifier) {
                    self.by_full_name.remove(&previous_name);
                }
            }
            None => {
                self.by_identifier.insert(identifier, self.students.len());
                self.students.push(student);
            }
        }
        self.by_full_name.insert(full_name, identifier);
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Students in insertion order.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    pub fn get(&self, identifier: StudentId) -> Option<&Student> {
        self.by_identifier
            .get(&identifier)
            .map(|&position| &self.students[position])
    }

    pub(crate) fn get_mut(&mut self, identifier: StudentId) -> Option<&mut Student> {
        self.by_identifier
            .get(&identifier)
            .copied()
            .map(move |position| &mut self.students[position])
    }

    /// Resolves a full name through the secondary index.
    pub fn resolve_full_name(&self, full_name: &str) -> Option<StudentId> {
        self.by_full_name.get(full_name).copied()
    }

    pub fn get_by_full_name(&self, full_name: &str) -> Option<&Student> {
        self.resolve_full_name(full_name)
            .and_then(|identifier| self.get(identifier))
    }

    /// Identifiers in insertion order; the assignment pass walks these.
    pub(crate) fn identifiers_in_order(&self) -> Vec<StudentId> {
        self.students
            .iter()
            .map(|student| student.identifier)
            .collect()
    }

    /// Read-only companion-consistency pass.
    ///
    /// For every student with a declared companion, checks in order:
    /// existence in the roster, back-reference symmetry, cohort equality.
    /// Each pair stops at its first failed check. Nothing is mutated and
    /// nothing is fatal; all findings are logged and returned.
    pub fn check_companions(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for student in &self.students {
            let Some(companion_full_name) = student.companion_full_name() else {
                continue;
            };

            let Some(companion) = self.get_by_full_name(&companion_full_name) else {
                let diagnostic = Diagnostic::CompanionNotFound {
                    student: student.full_name(),
                    companion: companion_full_name,
                };
                diagnostic.emit();
                diagnostics.push(diagnostic);
                continue;
            };

            let back_reference = companion.companion_full_name();
            if back_reference.as_deref() != Some(student.full_name().as_str()) {
                let diagnostic = Diagnostic::CompanionAsymmetry {
                    student: student.full_name(),
                    companion: companion_full_name,
                    back_reference,
                };
                diagnostic.emit();
                diagnostics.push(diagnostic);
                continue;
            }

            if student.macro_group != companion.macro_group {
                let diagnostic = Diagnostic::CompanionGroupMismatch {
                    student: student.full_name(),
                    student_group: student.macro_group,
                    companion: companion.full_name(),
                    companion_group: companion.macro_group,
                };
                diagnostic.emit();
                diagnostics.push(diagnostic);
            }
        }

        diagnostics
    }
}
