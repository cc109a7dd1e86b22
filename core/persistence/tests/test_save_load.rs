//! FILENAME: tests/test_save_load.rs
//! Integration tests for writing and reading snapshot files.

use engine::{CellContents, CellValue, Spreadsheet};
use parser::FormulaRules;
use persistence::{load, save, saved_version, PersistenceError};
use std::fs;
use tempfile::TempDir;

fn sample_sheet() -> Spreadsheet {
    let mut sheet = Spreadsheet::with_rules(FormulaRules::default(), "version");
    sheet.set_contents_of_cell("A1", "5.0").unwrap();
    sheet.set_contents_of_cell("A2", "6.0").unwrap();
    sheet.set_contents_of_cell("B3", "=A1+2").unwrap();
    sheet.set_contents_of_cell("b4", "=B3+2").unwrap();
    sheet.set_contents_of_cell("b5", "text").unwrap();
    sheet
}

#[test]
fn test_save_writes_expected_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("complex.json");

    let mut sheet = sample_sheet();
    save(&mut sheet, &path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        concat!(
            r#"{"cells":{"A1":{"stringForm":"5"},"A2":{"stringForm":"6"},"#,
            r#""B3":{"stringForm":"=A1+2"},"b4":{"stringForm":"=B3+2"},"#,
            r#""b5":{"stringForm":"text"}},"Version":"version"}"#
        )
    );
}

#[test]
fn test_save_then_load_restores_contents_and_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sheet.json");

    let mut sheet = sample_sheet();
    save(&mut sheet, &path).unwrap();
    let restored = load(&path, FormulaRules::default(), "version").unwrap();

    for name in sheet.nonempty_cell_names() {
        assert_eq!(
            restored.get_cell_contents(name).unwrap(),
            sheet.get_cell_contents(name).unwrap()
        );
        assert_eq!(
            restored.get_cell_value(name).unwrap(),
            sheet.get_cell_value(name).unwrap()
        );
    }
    assert_eq!(restored.get_cell_contents("A1").unwrap(), &CellContents::Number(5.0));
    assert_eq!(restored.get_cell_value("b4").unwrap(), &CellValue::Number(9.0));
    assert_eq!(restored.version(), "version");
}

#[test]
fn test_saved_files_are_stable() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    let mut sheet = sample_sheet();
    save(&mut sheet, &first).unwrap();
    let mut restored = load(&first, FormulaRules::default(), "version").unwrap();
    save(&mut restored, &second).unwrap();

    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn test_changed_flag_lifecycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flag.json");

    let mut sheet = Spreadsheet::new();
    assert!(!sheet.is_changed());
    sheet.set_contents_of_cell("A1", "5").unwrap();
    assert!(sheet.is_changed());
    save(&mut sheet, &path).unwrap();
    assert!(!sheet.is_changed());

    let mut loaded = load(&path, FormulaRules::default(), "default").unwrap();
    assert!(!loaded.is_changed());
    loaded.set_contents_of_cell("A1", "5").unwrap();
    assert!(loaded.is_changed());
}

#[test]
fn test_failed_save_keeps_changed_flag() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing-dir").join("sheet.json");

    let mut sheet = Spreadsheet::new();
    sheet.set_contents_of_cell("A1", "5").unwrap();

    assert!(matches!(save(&mut sheet, &path), Err(PersistenceError::Io(_))));
    assert!(sheet.is_changed());
}

#[test]
fn test_saved_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("versioned.json");

    let mut sheet = sample_sheet();
    save(&mut sheet, &path).unwrap();
    assert_eq!(saved_version(&path).unwrap(), "version");
}

#[test]
fn test_load_failures() {
    let dir = TempDir::new().unwrap();
    let write = |file: &str, contents: &str| {
        let path = dir.path().join(file);
        fs::write(&path, contents).unwrap();
        path
    };

    let missing = dir.path().join("does-not-exist.json");
    assert!(matches!(
        load(&missing, FormulaRules::default(), "default"),
        Err(PersistenceError::Io(_))
    ));
    assert!(matches!(saved_version(&missing), Err(PersistenceError::Io(_))));

    let garbage = write("wrong.json", "{ ! }");
    assert!(matches!(
        load(&garbage, FormulaRules::default(), "default"),
        Err(PersistenceError::Json(_))
    ));

    let good = write(
        "good.json",
        r#"{"cells":{"A1":{"stringForm":"5"}},"Version":"default"}"#,
    );
    assert!(matches!(
        load(&good, FormulaRules::default(), "wrong"),
        Err(PersistenceError::VersionMismatch { .. })
    ));

    let circular = write(
        "wrong3.json",
        r#"{"cells":{"A1":{"stringForm":"5"},"B3":{"stringForm":"=B3"}},"Version":"default"}"#,
    );
    let err = load(&circular, FormulaRules::default(), "default").unwrap_err();
    assert!(err.to_string().starts_with("Cannot restore cell B3"));
}

#[test]
fn test_validity_rules_apply_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");

    let mut sheet = sample_sheet();
    save(&mut sheet, &path).unwrap();

    // Upper-case-only names reject the lower-case "b4" entry
    let strict = FormulaRules::new(
        |name| name.to_string(),
        |name| name.chars().all(|c| !c.is_ascii_lowercase()),
    );
    assert!(matches!(
        load(&path, strict, "version"),
        Err(PersistenceError::Replay { .. })
    ));
}
