use std::fs;

use dashboard_core::{parse_domain_payload, ExportFormat};
use dashboard_engine::{
    ensure_output_dir, export_filename, read_domain_file, save_export, AtomicFileWriter,
    PersistError,
};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("exports").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("reports-1.csv", b"a,b\n").unwrap();
    assert_eq!(fs::read(&first).unwrap(), b"a,b\n");

    let second = writer.write("reports-1.csv", b"c,d\n").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"c,d\n");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn output_path_that_is_a_file_is_refused() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("reports-1.csv", b"data");
    assert!(matches!(result, Err(PersistError::OutputDir(_))));
    assert!(!file_path.with_file_name("reports-1.csv").exists());
}

#[test]
fn export_lands_under_a_timestamped_name() {
    let temp = TempDir::new().unwrap();
    assert_eq!(
        export_filename(ExportFormat::Json, 1_700_000_000_000),
        "reports-1700000000000.json"
    );

    let path = save_export(temp.path(), ExportFormat::Csv, 42, b"domain,deals\n").unwrap();
    assert_eq!(path, temp.path().join("reports-42.csv"));
    assert_eq!(fs::read_to_string(path).unwrap(), "domain,deals\n");
}

#[test]
fn domain_file_is_read_and_parsed() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("domains.json");
    fs::write(&path, r#"{"status": "ok", "data": ["a.com", "b.com"]}"#).unwrap();

    let body = read_domain_file(&path).unwrap();
    let list = parse_domain_payload(&body).unwrap();
    assert_eq!(list.domains, vec!["a.com".to_string(), "b.com".to_string()]);
}

#[test]
fn missing_domain_file_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let result = read_domain_file(&temp.path().join("absent.json"));
    assert!(matches!(result, Err(PersistError::Io(_))));
}
