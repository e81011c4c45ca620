use super::*;

fn str_v(s: &str) -> Value {
    Value::Str(s.into())
}

/// Every column must have exactly `row_count` values
fn assert_rectangular(table: &Table) {
    for name in table.names() {
        let column = table.column(name).expect("named column exists");
        assert_eq!(column.len(), table.row_count(), "column '{name}' ragged");
    }
}

fn people() -> Table {
    let mut table = Table::with_names(["Age", "Salary", "Name"]);
    for (age, salary, name) in [
        (25, 50_000, "John"),
        (30, 60_000, "Alice"),
        (35, 70_000, "Bob"),
        (40, 80_000, "Charlie"),
        (45, 90_000, "David"),
    ] {
        table
            .add_row(vec![Value::Int32(age), Value::Int32(salary), str_v(name)])
            .unwrap();
    }
    table
}

#[test]
fn test_add_row_fixes_types() {
    let mut table = Table::with_names(["ID", "Name", "Score"]);
    table
        .add_row(vec![Value::Int32(1), str_v("Alice"), Value::Float64(92.5)])
        .unwrap();

    assert_eq!(table.column_tag(0), Some(TypeTag::Int32));
    assert_eq!(table.column_tag(1), Some(TypeTag::Str));
    assert_eq!(table.column_tag(2), Some(TypeTag::Float64));

    // Second row with a clashing tag is rejected without corrupting shape
    let err = table
        .add_row(vec![str_v("2"), str_v("Bob"), Value::Float64(88.0)])
        .unwrap_err();
    assert!(matches!(err, FrameError::TypeMismatch { .. }));
    assert_eq!(table.row_count(), 1);
    assert_rectangular(&table);
}

#[test]
fn test_add_row_shape_error() {
    let mut table = Table::with_names(["A", "B"]);
    let err = table.add_row(vec![Value::Int32(1)]).unwrap_err();
    assert!(matches!(
        err,
        FrameError::Shape {
            expected: 2,
            found: 1
        }
    ));
}

#[test]
fn test_add_and_drop_column() {
    let mut table = people();
    table.add_column("Status", str_v("Off")).unwrap();
    table.add_column("Grade", Value::Char('F')).unwrap();
    assert_eq!(table.column_count(), 5);
    assert_eq!(table.cell_str(2, "Status").unwrap(), "Off");
    assert_rectangular(&table);

    table.drop_column("Status").unwrap();
    assert_eq!(table.column_count(), 4);
    assert!(matches!(
        table.drop_column("Status"),
        Err(FrameError::NotFound(_))
    ));
}

#[test]
fn test_drop_row() {
    let mut table = people();
    table.drop_row(1).unwrap();

    assert_eq!(table.row_count(), 4);
    assert_eq!(table.cell_str(1, "Name").unwrap(), "Bob");
    assert_rectangular(&table);

    assert!(matches!(
        table.drop_row(10),
        Err(FrameError::OutOfRange { .. })
    ));
}

#[test]
fn test_filter_keeps_matching_rows() {
    let mut table = people();
    table
        .filter_by_column("Age", &Value::Int32(35), CompareOp::Ge)
        .unwrap();

    assert_eq!(table.row_count(), 3);
    for row in 0..table.row_count() {
        let Value::Int32(age) = table.cell(row, "Age").unwrap() else {
            panic!("age should be int32");
        };
        assert!(age >= 35);
    }
    assert_rectangular(&table);
}

#[test]
fn test_filter_monotonic_and_exact_on_equal() {
    let mut table = people();
    let before = table.row_count();
    table
        .filter_by_column("Name", &str_v("Bob"), CompareOp::Eq)
        .unwrap();

    assert!(table.row_count() <= before);
    for row in 0..table.row_count() {
        assert_eq!(table.cell_str(row, "Name").unwrap(), "Bob");
    }
}

#[test]
fn test_filter_probe_type_mismatch() {
    let mut table = people();
    let err = table
        .filter_by_column("Age", &str_v("35"), CompareOp::Eq)
        .unwrap_err();
    assert!(matches!(err, FrameError::TypeMismatch { .. }));

    let err = table
        .filter_by_column("Missing", &Value::Int32(1), CompareOp::Eq)
        .unwrap_err();
    assert!(matches!(err, FrameError::NotFound(_)));
}

#[test]
fn test_filter_integer_widening() {
    let mut table = people();
    table
        .filter_by_column("Age", &Value::Int64(40), CompareOp::Lt)
        .unwrap();
    assert_eq!(table.row_count(), 3);
}

#[test]
fn test_sort_ascending_and_descending() {
    let mut table = Table::with_names(["ID", "Age"]);
    for (id, age) in [(1, 22), (2, 20), (3, 21), (4, 20)] {
        table
            .add_row(vec![Value::Int32(id), Value::Int32(age)])
            .unwrap();
    }

    table.sort_by_column("Age", true).unwrap();
    let ages: Vec<String> = (0..4).map(|r| table.cell_str(r, "Age").unwrap()).collect();
    assert_eq!(ages, ["20", "20", "21", "22"]);
    // Stability: the two 20s keep insertion order
    assert_eq!(table.cell_str(0, "ID").unwrap(), "2");
    assert_eq!(table.cell_str(1, "ID").unwrap(), "4");

    table.sort_by_column("Age", false).unwrap();
    assert_eq!(table.cell_str(0, "Age").unwrap(), "22");
    assert_eq!(table.cell_str(3, "Age").unwrap(), "20");
}

#[test]
fn test_left_join_with_missing_keys() {
    let mut left = Table::with_names(["Name", "Job"]);
    for (name, job) in [("Alice", "Eng"), ("Bob", "Doc"), ("Grace", "YT")] {
        left.add_row(vec![str_v(name), str_v(job)]).unwrap();
    }

    let mut right = Table::with_names(["Job", "Salary"]);
    for (job, salary) in [("Eng", 100), ("Doc", 150), ("Teacher", 80)] {
        right.add_row(vec![str_v(job), Value::Int32(salary)]).unwrap();
    }

    let joined = left.left_join(&right, "Job", false).unwrap();

    // Left cardinality preserved, right non-key columns appended
    assert_eq!(joined.row_count(), left.row_count());
    assert_eq!(joined.names(), &["Name", "Job", "Salary"]);
    assert_eq!(joined.cell(0, "Salary").unwrap(), Value::Int32(100));
    assert_eq!(joined.cell(1, "Salary").unwrap(), Value::Int32(150));
    // Miss appends the zero value
    assert_eq!(joined.cell(2, "Salary").unwrap(), Value::Int32(0));
    assert_rectangular(&joined);
}

#[test]
fn test_left_join_last_duplicate_wins_and_drop_key() {
    let mut left = Table::with_names(["Job"]);
    left.add_row(vec![str_v("Eng")]).unwrap();

    let mut right = Table::with_names(["Job", "Salary"]);
    right.add_row(vec![str_v("Eng"), Value::Int32(100)]).unwrap();
    right.add_row(vec![str_v("Eng"), Value::Int32(999)]).unwrap();

    let joined = left.left_join(&right, "Job", true).unwrap();
    assert_eq!(joined.names(), &["Salary"]);
    assert_eq!(joined.cell(0, "Salary").unwrap(), Value::Int32(999));
}

#[test]
fn test_left_join_key_errors() {
    let left = people();
    let right = Table::with_names(["X"]);
    assert!(matches!(
        left.left_join(&right, "Nope", false),
        Err(FrameError::NotFound(_))
    ));
}

#[test]
fn test_merge_ordered_interleaves() {
    let mut a = Table::with_names(["timestamp", "origin"]);
    let mut b = Table::with_names(["timestamp", "origin"]);
    for ts in [1, 3, 5] {
        a.add_row(vec![Value::Int32(ts), str_v("left")]).unwrap();
    }
    for ts in [2, 4, 6] {
        b.add_row(vec![Value::Int32(ts), str_v("right")]).unwrap();
    }

    let merged = Table::merge_ordered(&a, &b, "timestamp").unwrap();

    assert_eq!(merged.row_count(), a.row_count() + b.row_count());
    let keys: Vec<String> = (0..6)
        .map(|r| merged.cell_str(r, "timestamp").unwrap())
        .collect();
    assert_eq!(keys, ["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn test_merge_ordered_left_precedence_on_ties() {
    let mut a = Table::with_names(["timestamp", "origin"]);
    let mut b = Table::with_names(["timestamp", "origin"]);
    a.add_row(vec![Value::Int32(1), str_v("left")]).unwrap();
    b.add_row(vec![Value::Int32(1), str_v("right")]).unwrap();

    let merged = Table::merge_ordered(&a, &b, "timestamp").unwrap();
    assert_eq!(merged.cell_str(0, "origin").unwrap(), "left");
    assert_eq!(merged.cell_str(1, "origin").unwrap(), "right");
}

#[test]
fn test_merge_ordered_requires_integer_keys() {
    let mut a = Table::with_names(["timestamp"]);
    let mut b = Table::with_names(["timestamp"]);
    a.add_row(vec![str_v("yesterday")]).unwrap();
    b.add_row(vec![str_v("2")]).unwrap();

    assert!(matches!(
        Table::merge_ordered(&a, &b, "timestamp"),
        Err(FrameError::TypeMismatch { .. })
    ));
}

#[test]
fn test_merge_ordered_schema_mismatch() {
    let a = Table::with_names(["timestamp", "x"]);
    let b = Table::with_names(["timestamp", "y"]);
    assert!(matches!(
        Table::merge_ordered(&a, &b, "timestamp"),
        Err(FrameError::SchemaMismatch(_))
    ));
}

#[test]
fn test_merge_and_sum_by_key() {
    let mut a = Table::with_names(["Value", "Count"]);
    let mut b = Table::with_names(["Value", "Count"]);
    for (k, c) in [("P1", 2), ("P2", 1)] {
        a.add_row(vec![str_v(k), Value::Int32(c)]).unwrap();
    }
    for (k, c) in [("P1", 1), ("P3", 2)] {
        b.add_row(vec![str_v(k), Value::Int32(c)]).unwrap();
    }

    let merged = Table::merge_and_sum(&a, &b, "Value", "Count").unwrap();

    assert_eq!(merged.names(), &["Value", "Count"]);
    assert_eq!(merged.row_count(), 3);
    let rows: Vec<(String, String)> = (0..3)
        .map(|r| {
            (
                merged.cell_str(r, "Value").unwrap(),
                merged.cell_str(r, "Count").unwrap(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        [
            ("P1".into(), "3".into()),
            ("P2".into(), "1".into()),
            ("P3".into(), "2".into())
        ]
    );
    assert_eq!(merged.timestamp_ms(), a.timestamp_ms());
}

#[test]
fn test_merge_and_sum_is_commutative_on_keys() {
    let mut a = Table::with_names(["Value", "Count"]);
    let mut b = Table::with_names(["Value", "Count"]);
    for (k, c) in [("A", 100), ("B", 150), ("C", 200)] {
        a.add_row(vec![str_v(k), Value::Int32(c)]).unwrap();
    }
    for (k, c) in [("A", 300), ("B", 250), ("D", 450)] {
        b.add_row(vec![str_v(k), Value::Int32(c)]).unwrap();
    }

    let ab = Table::merge_and_sum(&a, &b, "Value", "Count").unwrap();
    let ba = Table::merge_and_sum(&b, &a, "Value", "Count").unwrap();

    // Both orders produce the same key→sum mapping (output is key-sorted)
    for row in 0..ab.row_count() {
        assert_eq!(
            ab.cell_str(row, "Value").unwrap(),
            ba.cell_str(row, "Value").unwrap()
        );
        assert_eq!(
            ab.cell_str(row, "Count").unwrap(),
            ba.cell_str(row, "Count").unwrap()
        );
    }
}

#[test]
fn test_merge_and_sum_grand_total() {
    let mut a = Table::with_names(["Count"]);
    let mut b = Table::with_names(["Count"]);
    a.add_row(vec![Value::Int32(2)]).unwrap();
    b.add_row(vec![Value::Int32(5)]).unwrap();
    let a_ts = a.timestamp_ms();

    let merged = Table::merge_and_sum(&a, &b, "", "Count").unwrap();

    assert_eq!(merged.names(), &["Count"]);
    assert_eq!(merged.row_count(), 1);
    assert_eq!(merged.cell(0, "Count").unwrap(), Value::Int32(7));
    assert_eq!(merged.timestamp_ms(), a_ts);
}

#[test]
fn test_merge_and_sum_rejects_non_integer_sum() {
    let mut a = Table::with_names(["Value", "Count"]);
    let mut b = Table::with_names(["Value", "Count"]);
    a.add_row(vec![str_v("A"), Value::Float32(1.0)]).unwrap();
    b.add_row(vec![str_v("A"), Value::Float32(2.0)]).unwrap();

    assert!(matches!(
        Table::merge_and_sum(&a, &b, "Value", "Count"),
        Err(FrameError::Unsupported(_))
    ));
}

#[test]
fn test_concat_appends_rows() {
    let mut a = people();
    let b = people();
    a.concat(&b).unwrap();

    assert_eq!(a.row_count(), 10);
    assert_eq!(a.cell_str(5, "Name").unwrap(), "John");
    assert_rectangular(&a);
}

#[test]
fn test_concat_is_associative_on_rows() {
    let base = people();

    let mut left = base.clone();
    left.concat(&base).unwrap();
    let mut left_assoc = left.clone();
    left_assoc.concat(&base).unwrap();

    let mut right_inner = base.clone();
    right_inner.concat(&base).unwrap();
    let mut right_assoc = base.clone();
    right_assoc.concat(&right_inner).unwrap();

    assert_eq!(left_assoc.row_count(), right_assoc.row_count());
    for row in 0..left_assoc.row_count() {
        for name in left_assoc.names() {
            assert_eq!(
                left_assoc.cell_str(row, name).unwrap(),
                right_assoc.cell_str(row, name).unwrap()
            );
        }
    }
}

#[test]
fn test_concat_schema_mismatch() {
    let mut a = people();
    let mut b = Table::with_names(["Age", "Salary", "Name"]);
    b.add_row(vec![Value::Int64(1), Value::Int32(2), str_v("x")])
        .unwrap();

    assert!(matches!(
        a.concat(&b),
        Err(FrameError::SchemaMismatch(_))
    ));
}

#[test]
fn test_clone_is_deep() {
    let table = people();
    let mut copy = table.clone();
    copy.add_row(vec![Value::Int32(99), Value::Int32(1), str_v("Zed")])
        .unwrap();

    assert_eq!(table.row_count(), 5);
    assert_eq!(copy.row_count(), 6);
}

#[test]
fn test_schema_only_keeps_types_and_timestamp() {
    let mut table = people();
    table.set_timestamp_ms(1234);
    let empty = table.schema_only();

    assert_eq!(empty.row_count(), 0);
    assert_eq!(empty.names(), table.names());
    assert_eq!(empty.column_tag(0), Some(TypeTag::Int32));
    assert_eq!(empty.timestamp_ms(), 1234);
}

#[test]
fn test_value_counts() {
    let mut table = Table::with_names(["ID", "Age"]);
    for (id, age) in [(1, 20), (2, 22), (3, 20), (4, 21), (5, 20)] {
        table
            .add_row(vec![Value::Int32(id), Value::Int32(age)])
            .unwrap();
    }

    let counts = table.value_counts("Age").unwrap();
    assert_eq!(counts.names(), &["Value", "Count"]);
    let rows: Vec<(String, String)> = (0..counts.row_count())
        .map(|r| {
            (
                counts.cell_str(r, "Value").unwrap(),
                counts.cell_str(r, "Count").unwrap(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        [
            ("20".into(), "3".into()),
            ("21".into(), "1".into()),
            ("22".into(), "1".into())
        ]
    );
    assert_eq!(counts.timestamp_ms(), table.timestamp_ms());
}

#[test]
fn test_value_counts_empty_table_keeps_schema() {
    let table = Table::with_names(["extra_2"]);
    // Lazily typed column never materialized
    assert!(table.value_counts("extra_2").is_err());

    let mut typed = Table::with_names(["extra_2"]);
    typed.add_row(vec![str_v("P1")]).unwrap();
    typed.drop_row(0).unwrap();
    let counts = typed.value_counts("extra_2").unwrap();
    assert_eq!(counts.row_count(), 0);
    assert_eq!(counts.names(), &["Value", "Count"]);
}

#[test]
fn test_sum_and_mean_delegate() {
    let mut table = Table::with_names(["ID", "Timestamp"]);
    for (id, ts) in [("A", 10i64), ("B", 20), ("C", 30)] {
        table.add_row(vec![str_v(id), Value::Int64(ts)]).unwrap();
    }

    assert_eq!(table.sum("Timestamp").unwrap(), Value::Int64(60));
    assert_eq!(table.mean("Timestamp").unwrap(), 20.0);
    assert!(matches!(table.sum("ID"), Err(FrameError::Unsupported(_))));
}

#[test]
fn test_timestamp_setter() {
    let mut table = Table::new();
    table.set_timestamp_ms(42);
    assert_eq!(table.timestamp_ms(), 42);
}
