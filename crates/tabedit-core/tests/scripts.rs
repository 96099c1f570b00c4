//! Whole-script runs against table files on disk

use std::fs;
use std::path::{Path, PathBuf};
use tabedit_core::{
    execute, parse_table, run_script, write_table_to_path, Call, Config, Error, ErrorKind, Table,
};
use tempfile::TempDir;

fn write_input(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("table.txt");
    fs::write(&path, content).unwrap();
    path
}

/// Parse the script, then load, run and write back, the way the CLI does
fn apply(script: &str, path: &Path) -> tabedit_core::Result<()> {
    let config = Config::default();
    let call = Call::parse(script)?;
    let table = parse_table(path, &config)?;
    let table = execute(&call, table)?;
    write_table_to_path(&table, &config, path)
}

fn load(path: &Path) -> Table {
    parse_table(path, &Config::default()).unwrap()
}

#[test]
fn test_irow_then_drow_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "r1 a\nr2 b\nr3 c\n");

    apply("[2,_];irow", &path).unwrap();
    let table = load(&path);
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.rows()[1].cells, vec!["", ""]);
    assert_eq!(table.get(2, 0), Some("r2"));

    apply("[2,_];drow", &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "r1 a\nr2 b\nr3 c\n");
}

#[test]
fn test_sum_and_avg_over_box() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "1 2\n3 4\n");

    apply("[1,1,2,2];sum [3,1];avg [3,2]", &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "1 2\n3 4\n10 2.5\n");
}

#[test]
fn test_min_over_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "5 x\n2 y\n8 z\n");

    apply("[_,1];[min];set smallest", &path).unwrap();
    assert_eq!(load(&path).get(1, 0), Some("smallest"));
}

#[test]
fn test_failed_resolution_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let original = "a x\nb y\n";
    let path = write_input(&dir, original);

    let err = apply("[1,2];set changed;[_,1];[min];set x", &path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_parse_error_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let original = "a b\n";
    let path = write_input(&dir, original);

    let err = apply("set x;frobnicate", &path).unwrap_err();
    assert!(matches!(err, Error::UnknownCommand(_)));
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_register_define_increment_use() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "4 -\n");

    apply("def _0;inc _0;[1,2];use _0", &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "4 5\n");
}

#[test]
fn test_clear_then_count_is_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "a b c\nd e f\n");

    apply("[1,1,2,2];clear;count [2,3]", &path).unwrap();
    let table = load(&path);
    assert_eq!(table.get(1, 2), Some("0"));
    assert_eq!(table.get(0, 2), Some("c"));
}

#[test]
fn test_set_over_table_then_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "a b\nc d\n");

    apply("[_,_];set \"x\";[1,1];count [2,2]", &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "x x\nx 1\n");
}

#[test]
fn test_data_only_scripts_keep_dimensions() {
    let input = Table::from_rows(vec![
        vec!["1".to_string(), "a".to_string(), "".to_string()],
        vec!["2".to_string(), "b".to_string(), "z".to_string()],
    ]);
    for script in [
        "set y",
        "[_,2];clear",
        "[1,_];swap [2,1]",
        "[_,1];len [1,3]",
        "[_,_];[find b];set q",
    ] {
        let output = run_script(script, input.clone()).unwrap();
        assert_eq!(
            (output.row_count(), output.column_count()),
            (2, 3),
            "script {:?}",
            script
        );
    }
}

#[test]
fn test_quoted_cells_survive_a_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "\"two words\" plain\n");

    apply("[1,2];set \"new \\\"quoted\\\" text\"", &path).unwrap();
    let table = load(&path);
    assert_eq!(table.get(0, 0), Some("two words"));
    assert_eq!(table.get(0, 1), Some("new \"quoted\" text"));
}

#[test]
fn test_growth_then_trailing_columns_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "a\n");

    apply("[3,4];set z;clear", &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "a\n\n\n");
    assert_eq!(load(&path).row_count(), 3);
}

#[test]
fn test_blank_lines_keep_their_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "a 1\n\nb 2\n");

    apply("[3,2];set 3", &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "a 1\n \nb 3\n");
}

#[test]
fn test_escaped_delimiter_outside_quotes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "a\\ b c\n");

    apply("len [1,3]", &path).unwrap();
    let table = load(&path);
    assert_eq!(table.get(0, 0), Some("a b"));
    assert_eq!(table.get(0, 2), Some("3"));
}
