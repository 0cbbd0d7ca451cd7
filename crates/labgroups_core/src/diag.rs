//! Typed diagnostics for the soft validation passes.
//!
//! # Responsibility
//! - Represent every non-fatal finding as a value the caller can inspect,
//!   count, or escalate.
//! - Emit each finding to the log stream at its detection point.
//!
//! # Invariants
//! - Diagnostics never block processing; fatal conditions use error types
//!   instead.
//! - `NameMismatch` is the only warning-level finding; the rest are errors.

use log::{error, warn};
use std::fmt::{Display, Formatter};

use crate::model::taxonomy::MacroGroup;

/// Log level a diagnostic is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One finding from roster construction or the companion-consistency pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Declared cohort disagrees with the override table or modular default.
    OverrideMismatch {
        full_name: String,
        declared: MacroGroup,
        expected: MacroGroup,
    },
    /// External display name disagrees with the computed full name.
    NameMismatch { reported: String, computed: String },
    /// Declared companion is absent from the roster.
    CompanionNotFound { student: String, companion: String },
    /// Companion's own companion reference does not point back.
    CompanionAsymmetry {
        student: String,
        companion: String,
        back_reference: Option<String>,
    },
    /// Mutual companions declare different cohorts.
    CompanionGroupMismatch {
        student: String,
        student_group: MacroGroup,
        companion: String,
        companion_group: MacroGroup,
    },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Self::NameMismatch { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Stable event token used in the structured log line.
    pub fn event(&self) -> &'static str {
        match self {
            Self::OverrideMismatch { .. } => "override_mismatch",
            Self::NameMismatch { .. } => "name_mismatch",
            Self::CompanionNotFound { .. } => "companion_not_found",
            Self::CompanionAsymmetry { .. } => "companion_asymmetry",
            Self::CompanionGroupMismatch { .. } => "companion_group_mismatch",
        }
    }

    /// Logs this finding at its severity.
    pub fn emit(&self) {
        match self.severity() {
            Severity::Warning => {
                warn!("event={} module=roster detail=\"{}\"", self.event(), self)
            }
            Severity::Error => {
                error!("event={} module=roster detail=\"{}\"", self.event(), self)
            }
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OverrideMismatch {
                full_name,
                declared,
                expected,
            } => write!(
                f,
                "declared group for {full_name} is {declared} instead of the expected {expected}"
            ),
            Self::NameMismatch { reported, computed } => {
                write!(f, "possible name mismatch: {reported} vs. {computed}")
            }
            Self::CompanionNotFound { student, companion } => {
                write!(f, "cannot find {companion} to match with {student}")
            }
            Self::CompanionAsymmetry {
                student,
                companion,
                back_reference,
            } => write!(
                f,
                "companion mismatch: {student} -> {companion} -> {}",
                back_reference.as_deref().unwrap_or("nobody")
            ),
            Self::CompanionGroupMismatch {
                student,
                student_group,
                companion,
                companion_group,
            } => write!(
                f,
                "group mismatch: {student} ({student_group}) <-> {companion} ({companion_group})"
            ),
        }
    }
}
