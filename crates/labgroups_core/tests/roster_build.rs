use labgroups_core::{
    Diagnostic, GroupOverrides, MacroGroup, RawStudentRow, Roster, RosterError, Severity,
};

fn row(name: &str, surname: &str, identifier: &str, group: &str) -> RawStudentRow {
    RawStudentRow {
        name: name.to_string(),
        surname: surname.to_string(),
        identifier: identifier.to_string(),
        email: format!("{}.{}@example.edu", name.to_lowercase(), surname.to_lowercase()),
        group: group.to_string(),
        companion_name: None,
        companion_surname: None,
        notes: None,
        display_name: None,
    }
}

#[test]
fn builds_in_insertion_order_with_both_indexes() {
    let overrides = GroupOverrides::new();
    let rows = vec![
        row("alice", "rossi", "4", "A1"),
        row("bob", "bianchi", "5", "B1"),
    ];

    let (roster, diagnostics) = Roster::from_rows(rows, &overrides).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(roster.len(), 2);

    let names: Vec<String> = roster.students().map(|student| student.full_name()).collect();
    assert_eq!(names, vec!["Alice Rossi", "Bob Bianchi"]);

    assert_eq!(roster.get(4).unwrap().full_name(), "Alice Rossi");
    assert_eq!(roster.resolve_full_name("Bob Bianchi"), Some(5));
    assert_eq!(roster.get_by_full_name("Bob Bianchi").unwrap().identifier, 5);
    assert_eq!(roster.get_by_full_name("Carla Verdi"), None);
}

#[test]
fn display_name_disagreement_is_a_warning_diagnostic() {
    let overrides = GroupOverrides::new();
    let mut reported = row("alice", "rossi", "4", "A1");
    reported.display_name = Some("Rossi Alice".to_string());

    let (_, diagnostics) = Roster::from_rows(vec![reported], &overrides).unwrap();
    assert_eq!(
        diagnostics,
        vec![Diagnostic::NameMismatch {
            reported: "Rossi Alice".to_string(),
            computed: "Alice Rossi".to_string(),
        }]
    );
    assert_eq!(diagnostics[0].severity(), Severity::Warning);
}

#[test]
fn matching_display_name_produces_no_diagnostic() {
    let overrides = GroupOverrides::new();
    let mut reported = row("alice", "rossi", "4", "A1");
    reported.display_name = Some(" Alice Rossi ".to_string());

    let (_, diagnostics) = Roster::from_rows(vec![reported], &overrides).unwrap();
    assert!(diagnostics.is_empty());
}

#[test]
fn duplicate_identifier_overwrites_in_place() {
    let overrides = GroupOverrides::new();
    let rows = vec![
        row("alice", "rossi", "8", "A1"),
        row("bob", "bianchi", "5", "B1"),
        row("carla", "verdi", "8", "A1"),
    ];

    let (roster, _) = Roster::from_rows(rows, &overrides).unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster.get(8).unwrap().full_name(), "Carla Verdi");
    assert_eq!(roster.get_by_full_name("Alice Rossi"), None);

    // The replacement keeps the original position.
    let names: Vec<String> = roster.students().map(|student| student.full_name()).collect();
    assert_eq!(names, vec!["Carla Verdi", "Bob Bianchi"]);
}

#[test]
fn malformed_identifier_aborts_with_row_index() {
    let overrides = GroupOverrides::new();
    let rows = vec![
        row("alice", "rossi", "4", "A1"),
        row("bob", "bianchi", "12.5", "B1"),
    ];

    let err = Roster::from_rows(rows, &overrides).unwrap_err();
    assert_eq!(
        err,
        RosterError::InvalidIdentifier {
            row_index: 1,
            value: "12.5".to_string(),
        }
    );
}

#[test]
fn unknown_group_label_aborts_with_row_index() {
    let overrides = GroupOverrides::new();
    let err = Roster::from_rows(vec![row("alice", "rossi", "4", "Z9")], &overrides).unwrap_err();
    assert_eq!(
        err,
        RosterError::UnknownMacroGroup {
            row_index: 0,
            value: "Z9".to_string(),
        }
    );
}

#[test]
fn cohort_mismatch_surfaces_as_diagnostic_not_error() {
    let overrides = GroupOverrides::new();
    // 5 % 4 = 1 -> expected B1, declared A1.
    let (roster, diagnostics) =
        Roster::from_rows(vec![row("alice", "rossi", "5", "A1")], &overrides).unwrap();

    assert_eq!(roster.get(5).unwrap().macro_group, MacroGroup::A1);
    assert_eq!(
        diagnostics,
        vec![Diagnostic::OverrideMismatch {
            full_name: "Alice Rossi".to_string(),
            declared: MacroGroup::A1,
            expected: MacroGroup::B1,
        }]
    );
}

#[test]
fn override_entry_silences_the_mismatch() {
    let mut overrides = GroupOverrides::new();
    overrides.insert(5, MacroGroup::A1);

    let (_, diagnostics) =
        Roster::from_rows(vec![row("alice", "rossi", "5", "A1")], &overrides).unwrap();
    assert!(diagnostics.is_empty());
}
