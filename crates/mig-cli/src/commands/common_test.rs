use super::*;

#[test]
fn test_column_widths_cover_header_and_cells() {
    let widths = calculate_column_widths(
        &["STATE", "SCRIPT"],
        &[vec!["pending".into(), "scripts/a.sql".into()]],
    );
    assert_eq!(widths, vec![7, 13]);
}

#[test]
fn test_format_table_aligns_columns() {
    let table = format_table(
        &["STATE", "SCRIPT"],
        &[
            vec!["applied".into(), "scripts/a.sql".into()],
            vec!["pending".into(), "scripts/bb.sql".into()],
        ],
    );
    let expected = "\
STATE    SCRIPT
-------  --------------
applied  scripts/a.sql
pending  scripts/bb.sql";
    assert_eq!(table, expected);
}

#[test]
fn test_format_table_without_rows() {
    let table = format_table(&["MIGRATED_AT", "SCRIPT"], &[]);
    assert_eq!(table, "MIGRATED_AT  SCRIPT\n-----------  ------");
}

#[test]
fn test_exit_code_displays_nothing() {
    assert_eq!(ExitCode(3).to_string(), "");
}
