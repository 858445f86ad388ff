//! End-to-end behaviour of the public Sheet API.

use tabula_core::{FormulaError, Position, Sheet, SheetError, Size, Value};

fn pos(name: &str) -> Position {
    name.parse().unwrap()
}

fn number(sheet: &Sheet, name: &str) -> f64 {
    let value = sheet.value(pos(name)).unwrap();
    value
        .as_number()
        .unwrap_or_else(|| panic!("{} is not a number: {:?}", name, value))
}

#[test]
fn test_formula_reads_literal() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "5").unwrap();
    sheet.set_cell(pos("A2"), "=A1+3").unwrap();
    assert_eq!(number(&sheet, "A2"), 8.0);
}

#[test]
fn test_cycle_is_rejected_and_cell_stays_unset() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=A2").unwrap();
    let err = sheet.set_cell(pos("A2"), "=A1").unwrap_err();
    match &err {
        SheetError::CircularDependency { pos: at, path } => {
            assert_eq!(*at, pos("A2"));
            assert_eq!(path, &vec![pos("A2"), pos("A1"), pos("A2")]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.to_string(), "A2: circular dependency: A2 -> A1 -> A2");
    assert_eq!(sheet.text(pos("A2")).unwrap(), "");
    assert!(sheet.cell(pos("A2")).unwrap().is_none());
}

#[test]
fn test_changing_input_updates_dependent() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "5").unwrap();
    sheet.set_cell(pos("A2"), "=A1").unwrap();
    assert_eq!(number(&sheet, "A2"), 5.0);
    sheet.set_cell(pos("A1"), "10").unwrap();
    assert_eq!(number(&sheet, "A2"), 10.0);
}

#[test]
fn test_formula_errors_propagate() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=1/0").unwrap();
    assert_eq!(
        sheet.value(pos("A1")).unwrap(),
        Value::Error(FormulaError::Arithmetic)
    );
    sheet.set_cell(pos("A2"), "=A1+1").unwrap();
    assert!(sheet.value(pos("A2")).unwrap().is_error());
    assert_eq!(
        sheet.value(pos("A2")).unwrap(),
        Value::Error(FormulaError::Arithmetic)
    );
}

#[test]
fn test_escaped_text() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("B2"), "'123").unwrap();
    assert_eq!(sheet.text(pos("B2")).unwrap(), "'123");
    assert_eq!(sheet.value(pos("B2")).unwrap(), Value::Text("123".into()));
}

#[test]
fn test_clearing_last_cell_empties_printable_area() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "x").unwrap();
    sheet.clear_cell(pos("A1")).unwrap();
    assert_eq!(sheet.printable_size(), Size::new(0, 0));
}

#[test]
fn test_printable_size_shrinks_to_remaining_cells() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("B2"), "a").unwrap();
    sheet.set_cell(pos("D1"), "b").unwrap();
    sheet.set_cell(pos("A5"), "c").unwrap();
    assert_eq!(sheet.len(), 3);
    assert_eq!(sheet.printable_size(), Size::new(5, 4));

    sheet.clear_cell(pos("A5")).unwrap();
    assert_eq!(sheet.printable_size(), Size::new(2, 4));
    sheet.clear_cell(pos("D1")).unwrap();
    assert_eq!(sheet.printable_size(), Size::new(2, 2));
    // Clearing an absent cell is a no-op.
    sheet.clear_cell(pos("Z9")).unwrap();
    assert_eq!(sheet.printable_size(), Size::new(2, 2));
}

#[test]
fn test_parse_error_keeps_previous_content() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=2*3").unwrap();
    assert_eq!(number(&sheet, "A1"), 6.0);

    let err = sheet.set_cell(pos("A1"), "=2*").unwrap_err();
    assert!(matches!(err, SheetError::Parse { pos: at, .. } if at == pos("A1")));
    assert_eq!(err.position(), Some(pos("A1")));
    assert_eq!(sheet.text(pos("A1")).unwrap(), "=2*3");
    assert_eq!(number(&sheet, "A1"), 6.0);
}

#[test]
fn test_bare_equals_is_text() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=").unwrap();
    assert_eq!(sheet.text(pos("A1")).unwrap(), "=");
    assert_eq!(sheet.value(pos("A1")).unwrap(), Value::Text("=".into()));
}

#[test]
fn test_text_is_canonical_and_references_are_sorted() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("C3"), "= (B1) + A2 * ( A1 ) + B1").unwrap();
    assert_eq!(sheet.text(pos("C3")).unwrap(), "=B1+A2*A1+B1");
    assert_eq!(
        sheet.referenced_cells(pos("C3")).unwrap(),
        vec![pos("A1"), pos("B1"), pos("A2")]
    );
    // Referenced empty cells do not become part of the printable area.
    assert_eq!(sheet.printable_size(), Size::new(3, 3));
}

#[test]
fn test_reads_are_idempotent() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "1.5").unwrap();
    sheet.set_cell(pos("B1"), "=A1*A1").unwrap();
    let first = sheet.value(pos("B1")).unwrap();
    let second = sheet.value(pos("B1")).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Value::Number(2.25));
}

#[test]
fn test_diamond_dependencies_refresh_once_changed() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "1").unwrap();
    sheet.set_cell(pos("B1"), "=A1+1").unwrap();
    sheet.set_cell(pos("C1"), "=A1*2").unwrap();
    sheet.set_cell(pos("D1"), "=B1+C1").unwrap();
    assert_eq!(number(&sheet, "D1"), 4.0);

    sheet.set_cell(pos("A1"), "3").unwrap();
    assert_eq!(number(&sheet, "D1"), 10.0);

    sheet.set_cell(pos("C1"), "=B1").unwrap();
    assert_eq!(number(&sheet, "D1"), 8.0);
}

#[test]
fn test_replacing_a_formula_with_text_refreshes_readers() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=2+2").unwrap();
    sheet.set_cell(pos("B1"), "=A1").unwrap();
    assert_eq!(number(&sheet, "B1"), 4.0);

    sheet.set_cell(pos("A1"), "hello").unwrap();
    assert_eq!(
        sheet.value(pos("B1")).unwrap(),
        Value::Error(FormulaError::Arithmetic)
    );
    sheet.set_cell(pos("A1"), "'7").unwrap();
    assert_eq!(number(&sheet, "B1"), 7.0);
}

#[test]
fn test_cell_cleared_and_recreated_is_read_again() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "1").unwrap();
    sheet.set_cell(pos("B1"), "=A1+1").unwrap();
    assert_eq!(number(&sheet, "B1"), 2.0);

    sheet.clear_cell(pos("A1")).unwrap();
    assert_eq!(number(&sheet, "B1"), 1.0);
    sheet.set_cell(pos("A1"), "=5").unwrap();
    assert_eq!(number(&sheet, "B1"), 6.0);
}

#[test]
fn test_out_of_grid_reference_is_ref_error() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=A20000+1").unwrap();
    assert_eq!(sheet.text(pos("A1")).unwrap(), "=#REF!+1");
    assert_eq!(
        sheet.value(pos("A1")).unwrap(),
        Value::Error(FormulaError::Ref)
    );
    assert!(sheet.referenced_cells(pos("A1")).unwrap().is_empty());
}

#[test]
fn test_invalid_positions_are_rejected_everywhere() {
    let mut sheet = Sheet::new();
    let bad = Position::new(0, Position::MAX_COLS);
    assert!(matches!(sheet.set_cell(bad, "1"), Err(SheetError::InvalidPosition(_))));
    assert!(matches!(sheet.cell(bad), Err(SheetError::InvalidPosition(_))));
    assert!(matches!(sheet.value(bad), Err(SheetError::InvalidPosition(_))));
    assert!(matches!(sheet.text(bad), Err(SheetError::InvalidPosition(_))));
    assert!(matches!(sheet.clear_cell(bad), Err(SheetError::InvalidPosition(_))));
}

#[test]
fn test_long_chain_evaluates_and_refreshes() {
    let mut sheet = Sheet::new();
    sheet.set_cell(Position::new(0, 0), "1").unwrap();
    for row in 1..200 {
        sheet
            .set_cell(Position::new(row, 0), &format!("=A{}+1", row))
            .unwrap();
    }
    assert_eq!(
        sheet.value(Position::new(199, 0)).unwrap(),
        Value::Number(200.0)
    );
    sheet.set_cell(Position::new(0, 0), "101").unwrap();
    assert_eq!(
        sheet.value(Position::new(199, 0)).unwrap(),
        Value::Number(300.0)
    );
}

#[test]
fn test_chain_as_tall_as_the_grid_evaluates() {
    let mut sheet = Sheet::new();
    let last = Position::new(Position::MAX_ROWS - 1, 0);
    // Top-down so each new formula reads a position that is still empty.
    for row in (1..Position::MAX_ROWS).rev() {
        sheet
            .set_cell(Position::new(row, 0), &format!("=A{}+1", row))
            .unwrap();
    }
    sheet.set_cell(Position::new(0, 0), "1").unwrap();

    assert_eq!(
        sheet.value(last).unwrap(),
        Value::Number(Position::MAX_ROWS as f64)
    );
    assert_eq!(
        sheet.value(Position::new(99, 0)).unwrap(),
        Value::Number(100.0)
    );

    sheet.set_cell(Position::new(0, 0), "2").unwrap();
    assert!(!sheet.cell(last).unwrap().unwrap().has_cache());
    assert_eq!(
        sheet.value(last).unwrap(),
        Value::Number(Position::MAX_ROWS as f64 + 1.0)
    );
}

#[test]
fn test_reentered_text_keeps_grouping_and_value() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=0.1+(0.2+0.3)").unwrap();
    let text = sheet.text(pos("A1")).unwrap();
    assert_eq!(text, "=0.1+(0.2+0.3)");

    sheet.set_cell(pos("B1"), &text).unwrap();
    assert_eq!(sheet.value(pos("B1")).unwrap(), sheet.value(pos("A1")).unwrap());
    assert_eq!(sheet.text(pos("B1")).unwrap(), text);
}
