//! Report rendering.
//!
//! # Responsibility
//! - Render one table per room-group to the terminal.
//! - Optionally write one JSON report file per room-group.

use anyhow::{Context, Result};
use colored::Colorize;
use labgroups_core::{full_report, AssignmentRecord, Roster};
use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};

/// Table row shape for one assigned student.
#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Surname")]
    surname: String,
    #[tabled(rename = "Identifier")]
    identifier: u32,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Group")]
    group: String,
}

impl From<&AssignmentRecord> for ReportRow {
    fn from(record: &AssignmentRecord) -> Self {
        Self {
            name: record.name.clone(),
            surname: record.surname.clone(),
            identifier: record.identifier,
            email: record.email.clone(),
            group: record.group.to_string(),
        }
    }
}

/// Prints one table per room-group.
pub fn print_reports(roster: &Roster) {
    for (room_group, records) in full_report(roster) {
        println!();
        println!("{}", format!("Room group {room_group}").bold());
        if records.is_empty() {
            println!("{}", "No students assigned.".dimmed());
            continue;
        }
        let rows: Vec<ReportRow> = records.iter().map(ReportRow::from).collect();
        println!("{}", Table::new(rows));
    }
}

/// Writes one `<room-group>.json` report file per room-group.
pub fn write_reports(roster: &Roster, directory: &Path) -> Result<()> {
    fs::create_dir_all(directory)
        .with_context(|| format!("cannot create `{}`", directory.display()))?;
    for (room_group, records) in full_report(roster) {
        let path = directory.join(format!("{room_group}.json"));
        let payload = serde_json::to_string_pretty(&records)
            .with_context(|| format!("cannot encode report for {room_group}"))?;
        fs::write(&path, payload)
            .with_context(|| format!("cannot write `{}`", path.display()))?;
    }
    Ok(())
}

/// Prints the closing status line.
pub fn print_summary(assigned: u32, findings: usize) {
    println!();
    println!(
        "{} assigned {assigned} student(s)",
        "Done:".green().bold()
    );
    if findings > 0 {
        println!(
            "{} {findings} validation finding(s) reported on the log stream",
            "Note:".yellow().bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::write_reports;
    use labgroups_core::{assign_groups, GroupOverrides, RawStudentRow, Roster};

    fn row(name: &str, surname: &str, identifier: &str, group: &str) -> RawStudentRow {
        RawStudentRow {
            name: name.to_string(),
            surname: surname.to_string(),
            identifier: identifier.to_string(),
            email: format!("{name}.{surname}@example.edu"),
            group: group.to_string(),
            companion_name: None,
            companion_surname: None,
            notes: None,
            display_name: None,
        }
    }

    #[test]
    fn write_reports_emits_one_file_per_room_group() {
        let overrides = GroupOverrides::new();
        let (mut roster, _) = Roster::from_rows(
            vec![row("alice", "rossi", "4", "A1"), row("bob", "bianchi", "5", "B1")],
            &overrides,
        )
        .unwrap();
        assign_groups(&mut roster);

        let directory = tempfile::tempdir().unwrap();
        write_reports(&roster, directory.path()).unwrap();

        let written: Vec<String> = std::fs::read_dir(directory.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(written.len(), 12);
        assert!(written.contains(&"A1-1.json".to_string()));

        let payload = std::fs::read_to_string(directory.path().join("A1-1.json")).unwrap();
        let records: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(records[0]["surname"], "Rossi");
        assert_eq!(records[0]["group"], "A1-1-1");

        let empty = std::fs::read_to_string(directory.path().join("B2-3.json")).unwrap();
        assert_eq!(empty.trim(), "[]");
    }
}
