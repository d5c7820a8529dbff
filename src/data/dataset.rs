//! In-memory tabular dataset
//!
//! [`Dataset`] is the structured table handed to the design analyzers by an
//! external loader. It supports the handful of generic operations the
//! analysis needs: column presence tests, column selection, filtering,
//! sorting and grouping by one or more columns.

use std::collections::{BTreeMap, HashSet};

use super::error::DataError;
use super::value::{Level, Value};

/// An ordered collection of rows sharing one header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Borrowed view of one row of a [`Dataset`]
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> Row<'a> {
    /// Position of the row in its dataset
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value in the named column, `None` if the column does not exist
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.dataset
            .column_index(column)
            .map(|idx| &self.dataset.rows[self.index][idx])
    }

    pub fn values(&self) -> &'a [Value] {
        &self.dataset.rows[self.index]
    }
}

impl Dataset {
    /// Create a dataset, checking that it is rectangular with unique headers
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, DataError> {
        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(DataError::NotTabular {
                    reason: format!("duplicate column '{}'", name),
                });
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DataError::NotTabular {
                    reason: format!(
                        "row {} has {} cells, expected {}",
                        i,
                        row.len(),
                        columns.len()
                    ),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    /// Create a builder for a dataset with the given header
    ///
    /// # Example
    ///
    /// ```rust
    /// use bioeq::data::Dataset;
    ///
    /// let data = Dataset::builder(&["SubjectID", "Time", "Conc"])
    ///     .row([1.into(), 0.0.into(), 0.0.into()])
    ///     .row([1.into(), 1.0.into(), 10.0.into()])
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(data.n_rows(), 2);
    /// ```
    pub fn builder(columns: &[&str]) -> DatasetBuilder {
        DatasetBuilder {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a dataset from a JSON array of row objects
    ///
    /// Columns are collected in first-seen order; keys absent from a row are
    /// treated as missing. Any other JSON shape is not a structured table.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, DataError> {
        let records = json.as_array().ok_or_else(|| DataError::NotTabular {
            reason: "expected an array of row objects".to_string(),
        })?;

        let mut columns: Vec<String> = Vec::new();
        for (i, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or_else(|| DataError::NotTabular {
                reason: format!("row {} is not an object", i),
            })?;
            for key in object.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let mut row = Vec::with_capacity(columns.len());
            for column in &columns {
                let cell = match record.get(column) {
                    None | Some(serde_json::Value::Null) => Value::Missing,
                    Some(serde_json::Value::Number(n)) => {
                        Value::Number(n.as_f64().ok_or_else(|| DataError::InvalidValue {
                            column: column.clone(),
                            row: i,
                            value: n.to_string(),
                        })?)
                    }
                    Some(serde_json::Value::String(s)) => Value::Text(s.clone()),
                    Some(other) => {
                        return Err(DataError::NotTabular {
                            reason: format!(
                                "cell '{}' in row {} is not a scalar: {}",
                                column, i, other
                            ),
                        })
                    }
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Distinct non-missing levels of a column, sorted
    pub fn levels(&self, name: &str) -> Option<Vec<Level>> {
        let mut levels: Vec<Level> = self
            .column(name)?
            .into_iter()
            .filter_map(Value::to_level)
            .collect();
        levels.sort();
        levels.dedup();
        Some(levels)
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.rows.len()).then_some(Row {
            dataset: self,
            index,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.rows.len()).map(move |index| Row {
            dataset: self,
            index,
        })
    }

    /// Keep the rows matching a predicate
    pub fn filter<F>(&self, predicate: F) -> Dataset
    where
        F: Fn(&Row<'_>) -> bool,
    {
        let rows = self
            .rows()
            .filter(|row| predicate(row))
            .map(|row| row.values().to_vec())
            .collect();
        Dataset {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Group row indices by the levels of one or more columns
    ///
    /// Groups are returned in key order. A missing key cell is an error.
    pub fn group_by(&self, columns: &[&str]) -> Result<BTreeMap<Vec<Level>, Vec<usize>>, DataError> {
        let indices = self.key_indices(columns)?;
        let mut groups: BTreeMap<Vec<Level>, Vec<usize>> = BTreeMap::new();
        for (row_idx, row) in self.rows.iter().enumerate() {
            let mut key = Vec::with_capacity(indices.len());
            for (&col_idx, name) in indices.iter().zip(columns) {
                let level = row[col_idx]
                    .to_level()
                    .ok_or_else(|| DataError::MissingValue {
                        column: name.to_string(),
                        row: row_idx,
                    })?;
                key.push(level);
            }
            groups.entry(key).or_default().push(row_idx);
        }
        Ok(groups)
    }

    fn key_indices(&self, columns: &[&str]) -> Result<Vec<usize>, DataError> {
        let mut missing = Vec::new();
        let mut indices = Vec::with_capacity(columns.len());
        for name in columns {
            match self.column_index(name) {
                Some(idx) => indices.push(idx),
                None => missing.push(name.to_string()),
            }
        }
        if missing.is_empty() {
            Ok(indices)
        } else {
            Err(DataError::MissingColumns { columns: missing })
        }
    }
}

/// Builder for [`Dataset`]
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DatasetBuilder {
    /// Append a row of values in header order
    pub fn row<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.rows.push(values.into_iter().collect());
        self
    }

    /// Append a row given as `(column, value)` pairs; unlisted columns are missing
    pub fn record<'a, I>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut row = vec![Value::Missing; self.columns.len()];
        for (name, value) in cells {
            match self.columns.iter().position(|c| c == name) {
                Some(idx) => row[idx] = value,
                None => {
                    self.columns.push(name.to_string());
                    for existing in &mut self.rows {
                        existing.push(Value::Missing);
                    }
                    row.push(value);
                }
            }
        }
        self.rows.push(row);
        self
    }

    pub fn build(self) -> Result<Dataset, DataError> {
        Dataset::new(self.columns, self.rows)
    }
}
