//! Rectangular tables
//!
//! A `Table` is an ordered collection of named [`Column`]s of equal length
//! plus the millisecond timestamp of the batch it was ingested from. Tables
//! are values: `Clone` deep-copies every column, and the pipeline relies on
//! that for fan-out isolation.
//!
//! Columns are created lazily. A table built from names alone fixes each
//! column's element type from the first row it observes, so a file whose
//! first data row says `int32` stays `int32` for the rest of its life.

use std::collections::{BTreeMap, HashMap};

use crate::column::Column;
use crate::error::{FrameError, Result};
use crate::value::{CompareOp, TypeTag, Value, compare};

/// Ordered, named, homogeneously typed columns of equal length
///
/// Invariants:
/// - every name in the column order maps to a column with `len == row_count`
/// - no two column names are equal
/// - the timestamp is set at construction and only changes through
///   [`Table::set_timestamp_ms`]
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: HashMap<String, Column>,
    rows: usize,
    timestamp_ms: i64,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Create an empty table with no columns
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            columns: HashMap::new(),
            rows: 0,
            timestamp_ms: now_ms(),
        }
    }

    /// Create a table with named, lazily typed columns
    ///
    /// Column types are fixed by the first call to [`Table::add_row`].
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            columns: HashMap::new(),
            rows: 0,
            timestamp_ms: now_ms(),
        }
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column names in order
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Look up a column by name
    #[inline]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Element type of the column at `index`, if it has been fixed yet
    pub fn column_tag(&self, index: usize) -> Option<TypeTag> {
        self.names
            .get(index)
            .and_then(|name| self.columns.get(name))
            .map(Column::tag)
    }

    /// Ingest timestamp in milliseconds since the epoch
    #[inline]
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// Override the ingest timestamp (used to carry a report's own clock)
    #[inline]
    pub fn set_timestamp_ms(&mut self, timestamp_ms: i64) {
        self.timestamp_ms = timestamp_ms;
    }

    /// Append one row of typed values
    ///
    /// The row width must equal the number of columns (`Shape`). The first
    /// row fixes each column's element type; later rows must match it
    /// (`TypeMismatch`). Nulls materialize as the column type's zero value.
    pub fn add_row(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.names.len() {
            return Err(FrameError::Shape {
                expected: self.names.len(),
                found: values.len(),
            });
        }

        if self.columns.is_empty() && self.rows == 0 {
            // First row fixes the column types
            for (name, value) in self.names.iter().zip(&values) {
                let tag = value.tag().ok_or_else(|| {
                    FrameError::Unsupported(format!(
                        "cannot fix the type of column '{name}' from a null value"
                    ))
                })?;
                self.columns.insert(name.clone(), Column::new(name, tag));
            }
        }

        // Validate the whole row before mutating any column so a failed
        // append cannot leave ragged columns behind.
        for (name, value) in self.names.iter().zip(&values) {
            let column = self
                .columns
                .get(name)
                .ok_or_else(|| FrameError::NotFound(name.clone()))?;
            if !value.is_null() && value.tag() != Some(column.tag()) {
                return Err(FrameError::type_mismatch(
                    name,
                    column.tag(),
                    value.tag_name(),
                ));
            }
        }

        for (name, value) in self.names.iter().zip(values) {
            let column = self
                .columns
                .get_mut(name)
                .expect("column validated to exist");
            column.push(value)?;
        }
        self.rows += 1;
        Ok(())
    }

    /// Add a new column filled with `default` for every existing row
    pub fn add_column(&mut self, name: impl Into<String>, default: Value) -> Result<()> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(FrameError::SchemaMismatch(format!(
                "column already exists: {name}"
            )));
        }
        let tag = default.tag().ok_or_else(|| {
            FrameError::Unsupported(format!(
                "cannot fix the type of column '{name}' from a null value"
            ))
        })?;

        let mut column = Column::new(&name, tag);
        for _ in 0..self.rows {
            column.push(default.clone())?;
        }
        self.names.push(name.clone());
        self.columns.insert(name, column);
        Ok(())
    }

    /// Remove a column by name
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        if self.columns.remove(name).is_none() && !self.names.iter().any(|n| n == name) {
            return Err(FrameError::NotFound(name.into()));
        }
        self.names.retain(|n| n != name);
        Ok(())
    }

    /// Remove the row at `index` from every column
    pub fn drop_row(&mut self, index: usize) -> Result<()> {
        if index >= self.rows {
            return Err(FrameError::OutOfRange {
                index,
                len: self.rows,
            });
        }
        for column in self.columns.values_mut() {
            column.remove(index)?;
        }
        self.rows -= 1;
        Ok(())
    }

    /// The value of a single cell
    pub fn cell(&self, row: usize, name: &str) -> Result<Value> {
        self.columns
            .get(name)
            .ok_or_else(|| FrameError::NotFound(name.into()))?
            .get(row)
    }

    /// Canonical string form of a single cell
    pub fn cell_str(&self, row: usize, name: &str) -> Result<String> {
        self.columns
            .get(name)
            .ok_or_else(|| FrameError::NotFound(name.into()))?
            .get_str(row)
    }

    /// Keep only the rows where `cell <op> probe` holds
    ///
    /// Scans from the highest index downward so indices stay valid while
    /// rows are removed. The probe must be comparable with the column's
    /// element type (same family, widened within it).
    pub fn filter_by_column(&mut self, name: &str, probe: &Value, op: CompareOp) -> Result<()> {
        let column_tag = self
            .columns
            .get(name)
            .ok_or_else(|| FrameError::NotFound(name.into()))?
            .tag();
        match probe.tag() {
            Some(tag) if column_tag.comparable_with(tag) => {}
            _ => {
                return Err(FrameError::type_mismatch(
                    name,
                    column_tag,
                    probe.tag_name(),
                ));
            }
        }

        for index in (0..self.rows).rev() {
            let cell = self
                .columns
                .get(name)
                .ok_or_else(|| FrameError::NotFound(name.into()))?
                .get(index)?;
            if !op.matches(compare(&cell, probe)?) {
                self.drop_row(index)?;
            }
        }
        Ok(())
    }

    /// Stable sort of the whole table by one column
    ///
    /// Equal keys keep their relative order. Implemented as an index
    /// permutation followed by a rebuild of every column.
    pub fn sort_by_column(&mut self, name: &str, ascending: bool) -> Result<()> {
        let key = self
            .columns
            .get(name)
            .ok_or_else(|| FrameError::NotFound(name.into()))?;

        let mut order: Vec<usize> = (0..self.rows).collect();
        if ascending {
            order.sort_by(|&a, &b| key.cmp_rows(a, b));
        } else {
            order.sort_by(|&a, &b| key.cmp_rows(b, a));
        }

        for column in self.columns.values_mut() {
            column.permute(&order);
        }
        Ok(())
    }

    /// Left equijoin on a single key column
    ///
    /// The right table is indexed once by the key's string representation;
    /// later duplicates overwrite earlier ones, so the last right row wins.
    /// Left rows without a match get the zero value of each right column.
    /// The right table's non-key columns follow the left's columns in right
    /// order; `drop_key` removes the key column from the result.
    pub fn left_join(&self, right: &Table, key: &str, drop_key: bool) -> Result<Table> {
        let left_key = self
            .column(key)
            .ok_or_else(|| FrameError::NotFound(key.into()))?;
        let right_key = right
            .column(key)
            .ok_or_else(|| FrameError::NotFound(key.into()))?;
        if left_key.tag() != right_key.tag() {
            return Err(FrameError::type_mismatch(
                key,
                left_key.tag(),
                right_key.tag().to_string(),
            ));
        }

        let mut index: HashMap<String, usize> = HashMap::with_capacity(right.rows);
        for row in 0..right.rows {
            index.insert(right_key.get_str(row)?, row);
        }

        let mut result = self.clone();
        for name in &right.names {
            if name == key {
                continue;
            }
            let right_column = right
                .column(name)
                .ok_or_else(|| FrameError::NotFound(name.clone()))?;
            let mut column = Column::new(name.clone(), right_column.tag());
            for row in 0..self.rows {
                match index.get(&left_key.get_str(row)?) {
                    Some(&right_row) => column.push_from(right_column, right_row)?,
                    None => column.push_null(),
                }
            }
            result.push_column(column)?;
        }

        if drop_key {
            result.drop_column(key)?;
        }
        Ok(result)
    }

    /// Two-pointer merge of two schema-equal tables sorted by `key`
    ///
    /// Keys are coerced from their string form to `i64`; a key that is not
    /// integer-convertible raises `TypeMismatch`. On equal keys the left
    /// row comes first.
    pub fn merge_ordered(a: &Table, b: &Table, key: &str) -> Result<Table> {
        a.schema_check(b)?;
        if !a.names.iter().any(|n| n == key) {
            return Err(FrameError::NotFound(key.into()));
        }

        let keys_a = integer_keys(a, key)?;
        let keys_b = integer_keys(b, key)?;

        let mut result = a.schema_only();
        let (mut i, mut j) = (0, 0);
        while i < a.rows && j < b.rows {
            if keys_a[i] <= keys_b[j] {
                result.append_row_from(a, i)?;
                i += 1;
            } else {
                result.append_row_from(b, j)?;
                j += 1;
            }
        }
        while i < a.rows {
            result.append_row_from(a, i)?;
            i += 1;
        }
        while j < b.rows {
            result.append_row_from(b, j)?;
            j += 1;
        }
        Ok(result)
    }

    /// Group two tables by a shared key and sum an integer column
    ///
    /// With an empty `key_col` the result is a single-row grand total of
    /// `sum_col` across both tables. Otherwise the result has exactly the
    /// key and sum columns, one row per distinct key (ascending by the
    /// key's string form), each holding the integer sum of all occurrences.
    /// The result inherits `a`'s timestamp.
    pub fn merge_and_sum(a: &Table, b: &Table, key_col: &str, sum_col: &str) -> Result<Table> {
        let sum_tag = integer_sum_tag(a, sum_col)?;
        integer_sum_tag(b, sum_col)?;

        if key_col.is_empty() {
            let total = int_value(&a.sum(sum_col)?) + int_value(&b.sum(sum_col)?);
            let mut result = Table::with_names([sum_col]);
            result.add_row(vec![make_int(sum_tag, total)])?;
            result.set_timestamp_ms(a.timestamp_ms);
            return Ok(result);
        }

        let a_key = a
            .column(key_col)
            .ok_or_else(|| FrameError::NotFound(key_col.into()))?;
        let b_key = b
            .column(key_col)
            .ok_or_else(|| FrameError::NotFound(key_col.into()))?;
        if a_key.tag() != b_key.tag() {
            return Err(FrameError::type_mismatch(
                key_col,
                a_key.tag(),
                b_key.tag().to_string(),
            ));
        }

        let mut groups: BTreeMap<String, (Value, i64)> = BTreeMap::new();
        for table in [a, b] {
            for row in 0..table.rows {
                let key_str = table.cell_str(row, key_col)?;
                let amount = int_value(&table.cell(row, sum_col)?);
                let entry = groups
                    .entry(key_str)
                    .or_insert((table.cell(row, key_col)?, 0));
                entry.1 += amount;
            }
        }

        let mut result = Table::new();
        result.push_column(Column::new(key_col, a_key.tag()))?;
        result.push_column(Column::new(sum_col, sum_tag))?;
        for (_, (key_value, total)) in groups {
            result.add_row(vec![key_value, make_int(sum_tag, total)])?;
        }
        result.set_timestamp_ms(a.timestamp_ms);
        Ok(result)
    }

    /// Append every row of `other` to this table
    pub fn concat(&mut self, other: &Table) -> Result<()> {
        self.schema_check(other)?;
        for row in 0..other.rows {
            for name in &self.names {
                if let (Some(column), Some(source)) =
                    (self.columns.get_mut(name), other.columns.get(name))
                {
                    column.push_from(source, row)?;
                }
            }
            self.rows += 1;
        }
        Ok(())
    }

    /// Copy of the schema with zero rows
    ///
    /// Keeps names, element types and the timestamp; drops the data.
    pub fn schema_only(&self) -> Table {
        let mut columns = HashMap::with_capacity(self.columns.len());
        for (name, column) in &self.columns {
            columns.insert(name.clone(), Column::new(name.clone(), column.tag()));
        }
        Table {
            names: self.names.clone(),
            columns,
            rows: 0,
            timestamp_ms: self.timestamp_ms,
        }
    }

    /// Occurrences of each distinct value of a column
    ///
    /// Groups by the cell's string representation. The result is a
    /// `{Value: string, Count: int32}` table, deterministically ordered
    /// ascending by value, inheriting this table's timestamp.
    pub fn value_counts(&self, name: &str) -> Result<Table> {
        let column = self
            .column(name)
            .ok_or_else(|| FrameError::NotFound(name.into()))?;

        let mut counts: BTreeMap<String, i32> = BTreeMap::new();
        for row in 0..column.len() {
            *counts.entry(column.get_str(row)?).or_insert(0) += 1;
        }

        let mut result = Table::new();
        result.push_column(Column::new("Value", TypeTag::Str))?;
        result.push_column(Column::new("Count", TypeTag::Int32))?;
        for (value, count) in counts {
            result.add_row(vec![Value::Str(value), Value::Int32(count)])?;
        }
        result.set_timestamp_ms(self.timestamp_ms);
        Ok(result)
    }

    /// Sum of the named column, delegating to [`Column::sum`]
    pub fn sum(&self, name: &str) -> Result<Value> {
        self.column(name)
            .ok_or_else(|| FrameError::NotFound(name.into()))?
            .sum()
    }

    /// Mean of the named column, delegating to [`Column::mean`]
    pub fn mean(&self, name: &str) -> Result<f64> {
        self.column(name)
            .ok_or_else(|| FrameError::NotFound(name.into()))?
            .mean()
    }

    /// Names and element types must match for concat/merge
    fn schema_check(&self, other: &Table) -> Result<()> {
        if self.names != other.names {
            return Err(FrameError::SchemaMismatch(format!(
                "column names differ: [{}] vs [{}]",
                self.names.join(", "),
                other.names.join(", ")
            )));
        }
        for name in &self.names {
            match (self.columns.get(name), other.columns.get(name)) {
                (Some(a), Some(b)) if a.tag() != b.tag() => {
                    return Err(FrameError::SchemaMismatch(format!(
                        "column '{}' has type {} on one side and {} on the other",
                        name,
                        a.tag(),
                        b.tag()
                    )));
                }
                (Some(_), None) | (None, Some(_)) => {
                    return Err(FrameError::SchemaMismatch(format!(
                        "column '{name}' is typed on only one side"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Install a fully built column; its length must equal the row count
    fn push_column(&mut self, column: Column) -> Result<()> {
        if self.columns.contains_key(column.name()) {
            return Err(FrameError::SchemaMismatch(format!(
                "column already exists: {}",
                column.name()
            )));
        }
        if column.len() != self.rows {
            return Err(FrameError::SchemaMismatch(format!(
                "column '{}' has {} values for {} rows",
                column.name(),
                column.len(),
                self.rows
            )));
        }
        self.names.push(column.name().to_string());
        self.columns.insert(column.name().to_string(), column);
        Ok(())
    }

    /// Append one row copied from a schema-equal table
    fn append_row_from(&mut self, source: &Table, row: usize) -> Result<()> {
        for name in &self.names {
            let from = source
                .columns
                .get(name)
                .ok_or_else(|| FrameError::NotFound(name.clone()))?;
            self.columns
                .get_mut(name)
                .ok_or_else(|| FrameError::NotFound(name.clone()))?
                .push_from(from, row)?;
        }
        self.rows += 1;
        Ok(())
    }
}

/// Millisecond wall clock used for ingest timestamps
fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Coerce a table's key column to integers for ordered merging
fn integer_keys(table: &Table, key: &str) -> Result<Vec<i64>> {
    let column = table
        .column(key)
        .ok_or_else(|| FrameError::NotFound(key.into()))?;
    let mut keys = Vec::with_capacity(column.len());
    for row in 0..column.len() {
        let text = column.get_str(row)?;
        let value = text
            .parse::<i64>()
            .map_err(|_| FrameError::type_mismatch(key, TypeTag::Int64, text))?;
        keys.push(value);
    }
    Ok(keys)
}

/// The sum column's tag, which must be an integer type
fn integer_sum_tag(table: &Table, sum_col: &str) -> Result<TypeTag> {
    let tag = table
        .column(sum_col)
        .ok_or_else(|| FrameError::NotFound(sum_col.into()))?
        .tag();
    match tag {
        TypeTag::Int32 | TypeTag::Int64 => Ok(tag),
        other => Err(FrameError::Unsupported(format!(
            "merge-and-sum needs an integer sum column, '{sum_col}' is {other}"
        ))),
    }
}

/// Widen an integer cell to i64; non-integers count as zero
///
/// Only reached after the sum column's tag has been checked.
fn int_value(value: &Value) -> i64 {
    match value {
        Value::Int32(x) => i64::from(*x),
        Value::Int64(x) => *x,
        _ => 0,
    }
}

/// Build an integer value of the requested width
fn make_int(tag: TypeTag, value: i64) -> Value {
    match tag {
        TypeTag::Int32 => Value::Int32(value as i32),
        _ => Value::Int64(value),
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
