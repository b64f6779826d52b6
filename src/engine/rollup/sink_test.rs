use std::fs;

use indoc::indoc;
use serde_json::{Value, json};
use tempfile::tempdir;

use crate::engine::rollup::sink::{read_json_lines, write_json_lines_atomically};

#[test]
fn reads_lines_skipping_blanks_and_nulling_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pings.jsonl");
    fs::write(
        &path,
        indoc! {r#"
            {"client_id": "a"}

            {not json
            {"client_id": "b"}
        "#},
    )
    .unwrap();

    let records = read_json_lines(&path).unwrap();
    assert_eq!(
        records,
        vec![json!({"client_id": "a"}), Value::Null, json!({"client_id": "b"})]
    );
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempdir().unwrap();
    assert!(read_json_lines(&dir.path().join("absent.jsonl")).is_err());
}

#[test]
fn writes_one_object_per_line_and_replaces_target() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.jsonl");
    fs::write(&path, "stale\n").unwrap();

    let rows = vec![json!({"client_id": "a", "n": 1}), json!({"client_id": "b", "n": 2})];
    write_json_lines_atomically(&path, &rows).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> = written
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines, rows);

    let leftovers = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn failed_write_publishes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing_dir").join("out.jsonl");
    assert!(write_json_lines_atomically(&path, &[json!({})]).is_err());
    assert!(!path.exists());
}
