use coexp_rs::error::CoexpError;
use coexp_rs::expression::{load_annotation, load_candidates, load_expression_table};

#[test]
fn test_load_expression_table() {
    let table = load_expression_table("tests/data/expression.tsv").unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.samples(), ["s1", "s2", "s3", "s4", "s5"]);

    // genes keep file order
    let ids: Vec<&str> = table.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, ["A", "B", "B'", "C"]);

    assert_eq!(table.get("B'").unwrap()[4], Some(11.0));
    assert_eq!(table.get("C").unwrap()[0], Some(50.0));
    assert_eq!(table.sample_position("s9"), None);
    assert!(table.get("Z").is_none());

    // file does not exist
    let result = load_expression_table("tests/data/nonexistent.tsv");
    assert!(matches!(result, Err(CoexpError::Io(_))));
}

#[test]
fn test_unparseable_value_is_fatal() {
    let result = load_expression_table("tests/data/bad_value.tsv");
    match result {
        Err(CoexpError::InvalidValue { line, column, value }) => {
            assert_eq!(line, 3);
            assert_eq!(column, 3);
            assert_eq!(value, "five");
        }
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}

#[test]
fn test_row_longer_than_header_is_fatal() {
    let result = load_expression_table("tests/data/long_row.tsv");
    assert!(matches!(result, Err(CoexpError::InvalidFileFormat(_))));
}

#[test]
fn test_short_row_leaves_trailing_samples_empty() {
    let table = load_expression_table("tests/data/short_row.tsv").unwrap();
    assert_eq!(table.get("B").unwrap(), [Some(4.0), None, None]);
    assert_eq!(table.get("A").unwrap(), [Some(1.0), Some(2.0), Some(3.0)]);
}

#[test]
fn test_trailing_empty_fields_are_missing_values() {
    // every line, header included, ends with a tab
    let table = load_expression_table("tests/data/trailing_tabs.tsv").unwrap();
    assert_eq!(table.samples(), ["s1", "s2", "s3"]);
    assert_eq!(table.get("A").unwrap(), [Some(1.0), Some(2.0), Some(3.0)]);
    assert_eq!(table.get("B").unwrap(), [Some(4.0), None, None]);
}

#[test]
fn test_inner_empty_field_is_fatal() {
    let result = load_expression_table("tests/data/inner_empty.tsv");
    match result {
        Err(CoexpError::InvalidValue { line, column, value }) => {
            assert_eq!(line, 2);
            assert_eq!(column, 3);
            assert_eq!(value, "");
        }
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}

#[test]
fn test_load_annotation() {
    let annotation = load_annotation("tests/data/annotation.tsv").unwrap();
    assert_eq!(annotation.len(), 2);
    assert_eq!(annotation["B'"], "prime partner of A");
    assert_eq!(annotation["C"], "decreasing gene");

    // second row has no description column
    let result = load_annotation("tests/data/short_annotation.tsv");
    assert!(matches!(result, Err(CoexpError::InvalidFileFormat(_))));

    // `C<TAB>` has an empty description, which is no second column
    let result = load_annotation("tests/data/empty_annotation.tsv");
    assert!(matches!(result, Err(CoexpError::InvalidFileFormat(_))));
}

#[test]
fn test_load_candidates_keeps_order_and_duplicates() {
    let candidates = load_candidates("tests/data/candidates.txt").unwrap();
    assert_eq!(candidates, ["A", "C", "A"]);
}
