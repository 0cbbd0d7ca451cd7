//! Student domain model.
//!
//! # Responsibility
//! - Define the validated enrollee record and its raw input contract.
//! - Normalize free-text fields and coerce identifiers at the boundary.
//!
//! # Invariants
//! - `identifier` is a positive integer once construction succeeds.
//! - A declared cohort that disagrees with the expected one is reported but
//!   kept; construction never fails on a cohort mismatch alone.
//! - A partial companion (only one of the two fields set) counts as no
//!   companion.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::diag::Diagnostic;
use crate::model::taxonomy::{GroupOverrides, MacroGroup, TurnGroup};

/// Matriculation number; the stable identity of one enrollee.
pub type StudentId = u32;

/// Fatal per-row construction error.
///
/// Identifier and cohort are mandatory; everything else is soft-validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentRowError {
    /// Identifier text is not a positive integer (a trailing `.0` from a
    /// spreadsheet float export is accepted).
    InvalidIdentifier(String),
    /// Cohort label is not one of the four known macro-groups.
    UnknownMacroGroup(String),
}

impl Display for StudentRowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier(value) => {
                write!(f, "identifier `{value}` is not a positive integer")
            }
            Self::UnknownMacroGroup(value) => {
                write!(f, "unknown macro-group label `{value}`")
            }
        }
    }
}

impl Error for StudentRowError {}

/// Raw roster row as supplied by the tabular adapter.
///
/// Column-name localization is the adapter's concern; this struct is the
/// canonical column set. The identifier is accepted as JSON string or
/// number since spreadsheet exports flip between the two.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawStudentRow {
    pub name: String,
    pub surname: String,
    #[serde(deserialize_with = "identifier_text")]
    pub identifier: String,
    pub email: String,
    pub group: String,
    #[serde(default)]
    pub companion_name: Option<String>,
    #[serde(default)]
    pub companion_surname: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// External display name carried by form exports; compared against the
    /// computed full name during roster construction.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One validated enrollee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub name: String,
    pub surname: String,
    pub identifier: StudentId,
    pub email: String,
    pub macro_group: MacroGroup,
    pub companion_name: Option<String>,
    pub companion_surname: Option<String>,
    pub notes: Option<String>,
    /// Set exactly once by the assignment pass.
    pub assigned_group: Option<TurnGroup>,
}

impl Student {
    /// Constructs a student from a raw row, soft-validating the declared
    /// cohort against the override table.
    ///
    /// A cohort mismatch yields an `OverrideMismatch` diagnostic (logged at
    /// the detection point) and construction proceeds with the declared
    /// value unchanged.
    ///
    /// # Errors
    /// - `StudentRowError` when the identifier or the cohort label cannot
    ///   be parsed.
    pub fn from_row(
        row: RawStudentRow,
        overrides: &GroupOverrides,
    ) -> Result<(Student, Vec<Diagnostic>), StudentRowError> {
        let identifier = parse_identifier(&row.identifier)?;
        let macro_group = MacroGroup::parse(&row.group)
            .ok_or_else(|| StudentRowError::UnknownMacroGroup(row.group.clone()))?;

        let student = Student {
            name: normalize_name(&row.name),
            surname: normalize_name(&row.surname),
            identifier,
            email: row.email.trim().to_string(),
            macro_group,
            companion_name: normalize_optional_name(row.companion_name),
            companion_surname: normalize_optional_name(row.companion_surname),
            notes: normalize_optional_text(row.notes),
            assigned_group: None,
        };

        let mut diagnostics = Vec::new();
        let expected = overrides.expected_group(identifier);
        if student.macro_group != expected {
            let diagnostic = Diagnostic::OverrideMismatch {
                full_name: student.full_name(),
                declared: student.macro_group,
                expected,
            };
            diagnostic.emit();
            diagnostics.push(diagnostic);
        }

        Ok((student, diagnostics))
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    /// Full name of the declared companion, when both fields are present.
    pub fn companion_full_name(&self) -> Option<String> {
        match (&self.companion_name, &self.companion_surname) {
            (Some(name), Some(surname)) => Some(format!("{name} {surname}")),
            _ => None,
        }
    }

    pub fn has_companion(&self) -> bool {
        self.companion_full_name().is_some()
    }
}

/// Coerces identifier text to a positive integer, accepting a
/// floating-point textual representation such as `123456.0`.
pub(crate) fn parse_identifier(text: &str) -> Result<StudentId, StudentRowError> {
    let invalid = || StudentRowError::InvalidIdentifier(text.to_string());
    let value: f64 = text.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > StudentId::MAX as f64 {
        return Err(invalid());
    }
    Ok(value as StudentId)
}

/// Trims and title-cases a free-text name field.
///
/// A letter following any non-alphabetic character starts a new word, so
/// hyphenated and apostrophized names keep their inner capitals.
pub(crate) fn normalize_name(value: &str) -> String {
    let mut normalized = String::with_capacity(value.len());
    let mut word_start = true;
    for ch in value.trim().chars() {
        if ch.is_alphabetic() {
            if word_start {
                normalized.extend(ch.to_uppercase());
            } else {
                normalized.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            normalized.push(ch);
            word_start = true;
        }
    }
    normalized
}

fn normalize_optional_name(value: Option<String>) -> Option<String> {
    value
        .filter(|text| !text.trim().is_empty())
        .map(|text| normalize_name(&text))
}

fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Accepts a JSON string or number and keeps its textual form for the
/// coercion step.
pub(crate) fn identifier_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdentifierVisitor;

    impl serde::de::Visitor<'_> for IdentifierVisitor {
        type Value = String;

        fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("an identifier as string or number")
        }

        fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<String, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdentifierVisitor)
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, parse_identifier, RawStudentRow, Student, StudentRowError};
    use crate::model::taxonomy::{GroupOverrides, MacroGroup};

    fn raw_row(name: &str, surname: &str, identifier: &str, group: &str) -> RawStudentRow {
        RawStudentRow {
            name: name.to_string(),
            surname: surname.to_string(),
            identifier: identifier.to_string(),
            email: "student@example.edu".to_string(),
            group: group.to_string(),
            companion_name: None,
            companion_surname: None,
            notes: None,
            display_name: None,
        }
    }

    #[test]
    fn normalize_name_title_cases_across_separators() {
        assert_eq!(normalize_name("  mario rossi "), "Mario Rossi");
        assert_eq!(normalize_name("anna-maria"), "Anna-Maria");
        assert_eq!(normalize_name("DELLA ROVERE"), "Della Rovere");
        assert_eq!(normalize_name("d'amico"), "D'Amico");
    }

    #[test]
    fn parse_identifier_accepts_float_text() {
        assert_eq!(parse_identifier("123456").unwrap(), 123_456);
        assert_eq!(parse_identifier("123456.0").unwrap(), 123_456);
        assert_eq!(parse_identifier(" 17 ").unwrap(), 17);
    }

    #[test]
    fn parse_identifier_rejects_non_positive_and_fractional() {
        for value in ["0", "-5", "12.5", "abc", "", "inf"] {
            let err = parse_identifier(value).unwrap_err();
            assert_eq!(err, StudentRowError::InvalidIdentifier(value.to_string()));
        }
    }

    #[test]
    fn from_row_normalizes_and_keeps_declared_cohort() {
        let overrides = GroupOverrides::new();
        let (student, diagnostics) =
            Student::from_row(raw_row(" alice ", "ROSSI", "8.0", "A1"), &overrides).unwrap();

        assert_eq!(student.full_name(), "Alice Rossi");
        assert_eq!(student.identifier, 8);
        assert_eq!(student.macro_group, MacroGroup::A1);
        assert_eq!(student.assigned_group, None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn from_row_flags_cohort_mismatch_without_failing() {
        let overrides = GroupOverrides::new();
        // 9 % 4 = 1 -> expected B1, declared B2.
        let (student, diagnostics) =
            Student::from_row(raw_row("Bob", "Bianchi", "9", "B2"), &overrides).unwrap();

        assert_eq!(student.macro_group, MacroGroup::B2);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0]
            .to_string()
            .contains("is B2 instead of the expected B1"));
    }

    #[test]
    fn from_row_fails_on_malformed_mandatory_fields() {
        let overrides = GroupOverrides::new();

        let err = Student::from_row(raw_row("A", "B", "not-a-number", "A1"), &overrides)
            .unwrap_err();
        assert!(matches!(err, StudentRowError::InvalidIdentifier(_)));

        let err = Student::from_row(raw_row("A", "B", "4", "C3"), &overrides).unwrap_err();
        assert_eq!(err, StudentRowError::UnknownMacroGroup("C3".to_string()));
    }

    #[test]
    fn partial_companion_counts_as_no_companion() {
        let overrides = GroupOverrides::new();
        let mut row = raw_row("Alice", "Rossi", "8", "A1");
        row.companion_surname = Some("Bianchi".to_string());

        let (student, _) = Student::from_row(row, &overrides).unwrap();
        assert!(!student.has_companion());
        assert_eq!(student.companion_full_name(), None);
    }

    #[test]
    fn raw_row_decodes_numeric_identifier_and_blank_optionals() {
        let row: RawStudentRow = serde_json::from_value(serde_json::json!({
            "Name": "carlo",
            "Surname": "verdi",
            "Identifier": 123456.0,
            "Email": "carlo.verdi@example.edu",
            "Group": "A2",
            "Notes": "   ",
        }))
        .unwrap();
        assert_eq!(row.identifier, "123456");
        assert_eq!(row.companion_name, None);

        let overrides = GroupOverrides::new();
        let (student, _) = Student::from_row(row, &overrides).unwrap();
        assert_eq!(student.identifier, 123_456);
        assert_eq!(student.notes, None);
    }
}
