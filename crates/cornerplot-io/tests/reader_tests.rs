//! Reader integration tests against files on disk

use std::io::Write;

use cornerplot_io::{open_file, read_table, IoError};

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_read_csv_with_header() {
    let file = write_temp(".csv", "d0,d1,d2\n0.1,0.2,0.3\n1.0,2.0,3.0\n");
    let table = read_table(file.path()).unwrap();

    assert_eq!(table.columns, vec!["d0", "d1", "d2"]);
    assert_eq!(table.num_rows(), 2);
    assert_eq!(table.rows[1], vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_read_csv_skips_comments_and_trims() {
    let file = write_temp(".csv", "# generated by sampler\nx, y\n 1.0 , 2.0\n# mid\n3.0,4.0\n");
    let table = read_table(file.path()).unwrap();

    assert_eq!(table.columns, vec!["x", "y"]);
    assert_eq!(table.rows, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
}

#[test]
fn test_read_tsv() {
    let file = write_temp(".tsv", "alpha\tbeta\n1\t2\n3\t4\n");
    let reader = open_file(file.path()).unwrap();
    assert_eq!(reader.format_name(), "TSV");

    let table = reader.read_table().unwrap();
    assert_eq!(table.column("beta").unwrap(), vec![2.0, 4.0]);
}

#[test]
fn test_non_numeric_cell_reports_line() {
    let file = write_temp(".csv", "a,b\n1,2\n3,oops\n");
    let err = read_table(file.path()).unwrap_err();
    match err {
        IoError::Parse { line, message } => {
            assert_eq!(line, 3);
            assert!(message.contains("oops"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_ragged_rows_are_invalid_format() {
    let short = write_temp(".csv", "a,b\n1,2\n3\n");
    match read_table(short.path()).unwrap_err() {
        IoError::InvalidFormat(message) => assert!(message.contains("fields"), "{message}"),
        other => panic!("unexpected error: {other}"),
    }

    let long = write_temp(".tsv", "a\tb\n1\t2\t3\n");
    assert!(matches!(
        read_table(long.path()),
        Err(IoError::InvalidFormat(_))
    ));
}
