//! Localized input decoding.
//!
//! # Responsibility
//! - Load roster and override exports from JSON files.
//! - Map the localized (Italian) form-export headers onto the canonical
//!   column set before handing rows to the core.
//!
//! # Invariants
//! - Header mapping only applies to rows that carry localized keys; a
//!   canonical export passes through untouched.
//! - Unknown columns are preserved and ignored downstream.

use anyhow::{bail, Context, Result};
use labgroups_core::{GroupOverrides, RawOverrideRow, RawStudentRow};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Localized header -> canonical column mapping for the enrollment-form
/// export. The form's own auto-filled `Name` column is the external display
/// name, not the student's first name.
const LOCALIZED_HEADERS: &[(&str, &str)] = &[
    ("Nome", "Name"),
    ("Cognome", "Surname"),
    ("Numero di matricola", "Identifier"),
    ("Matricola", "Identifier"),
    ("Macro-gruppo", "Group"),
    ("Gruppo", "Group"),
    ("Nome compagno", "CompanionName"),
    (
        "Nome del/della compagno/a di gruppo (opzionale)",
        "CompanionName",
    ),
    ("Cognome compagno", "CompanionSurname"),
    (
        "Cognome del/della compagno/a di gruppo (opzionale)",
        "CompanionSurname",
    ),
    ("Note", "Notes"),
    ("Eventuali note o richieste specifiche (opzionale)", "Notes"),
];

/// Marker column that identifies a localized export; only such exports
/// carry an auto-filled `Name` display column next to `Nome`.
const LOCALIZED_MARKER: &str = "Nome";

/// Loads the roster rows from a JSON array of row objects.
pub fn load_roster_rows(path: &Path) -> Result<Vec<RawStudentRow>> {
    let rows = load_rows(path)?;
    rows.into_iter()
        .enumerate()
        .map(|(row_index, row)| {
            serde_json::from_value(Value::Object(canonicalize_row(row)))
                .with_context(|| format!("row {row_index} is not a valid roster row"))
        })
        .collect()
}

/// Loads the override table from a JSON array of row objects.
pub fn load_overrides(path: &Path) -> Result<GroupOverrides> {
    let rows = load_rows(path)?;
    let rows: Vec<RawOverrideRow> = rows
        .into_iter()
        .enumerate()
        .map(|(row_index, row)| {
            serde_json::from_value(Value::Object(canonicalize_row(row)))
                .with_context(|| format!("row {row_index} is not a valid override row"))
        })
        .collect::<Result<_>>()?;
    GroupOverrides::from_rows(rows).map_err(Into::into)
}

fn load_rows(path: &Path) -> Result<Vec<Map<String, Value>>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read `{}`", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("`{}` is not valid JSON", path.display()))?;
    let Value::Array(items) = value else {
        bail!("`{}` must contain a JSON array of row objects", path.display());
    };

    let mut rows = Vec::with_capacity(items.len());
    for (row_index, item) in items.into_iter().enumerate() {
        let Value::Object(row) = item else {
            bail!("`{}`: row {row_index} is not an object", path.display());
        };
        rows.push(row);
    }
    Ok(rows)
}

/// Renames localized headers onto the canonical column set.
///
/// The unambiguous renames always apply; `Name` -> `DisplayName` only
/// applies to a localized export, where `Name` is the form's auto-filled
/// display column and the student's first name sits under `Nome`.
fn canonicalize_row(row: Map<String, Value>) -> Map<String, Value> {
    let localized_export = row.contains_key(LOCALIZED_MARKER);
    row.into_iter()
        .map(|(key, value)| {
            let canonical = if localized_export && key == "Name" {
                "DisplayName".to_string()
            } else {
                LOCALIZED_HEADERS
                    .iter()
                    .find(|(localized, _)| *localized == key)
                    .map(|(_, canonical)| canonical.to_string())
                    .unwrap_or(key)
            };
            (canonical, value)
        })
        .collect()
}
