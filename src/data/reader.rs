//! CSV loading into a [`Dataset`]
//!
//! Loading sits outside the analysis core: it only produces the table the
//! analyzers consume.

use std::io::Read;
use std::path::Path;

use super::dataset::Dataset;
use super::error::DataError;
use super::value::Value;

/// Read a CSV file with a header row into a [`Dataset`]
///
/// Lines starting with `#` are treated as comments. Numeric cells become
/// [`Value::Number`], empty or `NA` cells [`Value::Missing`], everything else
/// [`Value::Text`].
///
/// # Example
///
/// ```rust,no_run
/// use bioeq::data::read_csv;
///
/// let data = read_csv("simdata/crossover_2x2_simdata.csv").unwrap();
/// println!("{} rows", data.n_rows());
/// ```
pub fn read_csv(path: impl AsRef<Path>) -> Result<Dataset, DataError> {
    let reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .from_path(path.as_ref())
        .map_err(|e| DataError::Csv(e.to_string()))?;
    from_csv(reader)
}

impl Dataset {
    /// Read CSV text with a header row from any reader
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Dataset, DataError> {
        let reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .has_headers(true)
            .from_reader(reader);
        from_csv(reader)
    }

    /// Serialize the dataset as CSV text
    pub fn to_csv(&self) -> Result<String, DataError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.columns())
            .map_err(|e| DataError::Csv(e.to_string()))?;
        for row in self.rows() {
            let cells: Vec<String> = row
                .values()
                .iter()
                .map(|v| match v {
                    Value::Missing => String::new(),
                    other => other.to_string(),
                })
                .collect();
            writer
                .write_record(&cells)
                .map_err(|e| DataError::Csv(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| DataError::Csv(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| DataError::Csv(e.to_string()))
    }
}

fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Dataset, DataError> {
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DataError::Csv(e.to_string()))?;
        rows.push(record.iter().map(Value::parse).collect());
    }

    Dataset::new(columns, rows)
}
