use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::model::{Sample, SampleType};

use super::ProcessingError;

/// Name column of the result table
pub const NAME_COLUMN: &str = "name";
/// Sample type column of the result table
pub const TYPE_COLUMN: &str = "type";

/// One calibrated measurement
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Sample name
    pub name: String,
    /// Sample type (never `Standard`)
    pub sample_type: SampleType,
    /// Values aligned with [`ResultTable::value_columns`]
    pub values: Vec<f64>,
}

/// Calibrated results: one row per non-standard sample.
///
/// Columns are `name`, `type`, then `{ratio}` and `{ratio}_err` for every
/// ratio, in the order the ratios were first seen. A row without a given
/// ratio holds `NaN` there.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    value_columns: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Assemble the table from calibrated samples
    pub fn from_samples(samples: &[Sample]) -> Result<Self, ProcessingError> {
        let mut value_columns: Vec<String> = Vec::new();
        for sample in samples {
            let reduced = sample
                .reduced_data
                .as_ref()
                .ok_or_else(|| ProcessingError::MissingReducedData(sample.name.clone()))?;
            for column in reduced.column_names() {
                if !value_columns.contains(&column) {
                    value_columns.push(column);
                }
            }
        }

        let rows = samples
            .iter()
            .map(|sample| {
                // presence checked above
                let reduced = sample.reduced_data.as_ref();
                ResultRow {
                    name: sample.name.clone(),
                    sample_type: sample.sample_type,
                    values: value_columns
                        .iter()
                        .map(|c| reduced.and_then(|r| r.value(c)).unwrap_or(f64::NAN))
                        .collect(),
                }
            })
            .collect();

        Ok(Self { value_columns, rows })
    }

    /// All column names, starting with `name` and `type`
    pub fn columns(&self) -> Vec<String> {
        [NAME_COLUMN.to_string(), TYPE_COLUMN.to_string()]
            .into_iter()
            .chain(self.value_columns.iter().cloned())
            .collect()
    }

    /// Ratio and error column names
    pub fn value_columns(&self) -> &[String] {
        &self.value_columns
    }

    /// Rows in run order
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no non-standard sample was processed
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a sample name
    pub fn row(&self, name: &str) -> Option<&ResultRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    /// Single value by sample name and column
    pub fn value(&self, name: &str, column: &str) -> Option<f64> {
        let idx = self.value_columns.iter().position(|c| c == column)?;
        self.row(name).map(|r| r.values[idx])
    }

    /// All values of one column, in row order
    pub fn column(&self, column: &str) -> Option<Vec<f64>> {
        let idx = self.value_columns.iter().position(|c| c == column)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// Arrow schema of [`to_record_batch`](Self::to_record_batch)
    pub fn schema(&self) -> Schema {
        let mut fields = vec![
            Field::new(NAME_COLUMN, DataType::Utf8, false),
            Field::new(TYPE_COLUMN, DataType::Utf8, false),
        ];
        fields.extend(
            self.value_columns
                .iter()
                .map(|c| Field::new(c.as_str(), DataType::Float64, false)),
        );
        Schema::new(fields)
    }

    /// Convert to an Arrow record batch for persistence or plotting
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(self.value_columns.len() + 2);
        arrays.push(Arc::new(StringArray::from_iter_values(
            self.rows.iter().map(|r| r.name.as_str()),
        )));
        arrays.push(Arc::new(StringArray::from_iter_values(
            self.rows.iter().map(|r| r.sample_type.as_str()),
        )));
        for idx in 0..self.value_columns.len() {
            arrays.push(Arc::new(Float64Array::from_iter_values(
                self.rows.iter().map(|r| r.values[idx]),
            )));
        }
        RecordBatch::try_new(Arc::new(self.schema()), arrays)
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .rows
            .iter()
            .map(|r| r.name.len())
            .chain(std::iter::once(NAME_COLUMN.len()))
            .max()
            .unwrap_or(0);

        write!(f, "{:<name_width$}  {:<8}", NAME_COLUMN, TYPE_COLUMN)?;
        for column in &self.value_columns {
            write!(f, "  {:>16}", column)?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:<name_width$}  {:<8}", row.name, row.sample_type.as_str())?;
            for value in &row.values {
                write!(f, "  {:>16.6}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IsotopeRatio, IsotopeSystem, ReducedData, TimeSeries};

    fn calibrated(name: &str, ratios: &[(&str, f64, f64)]) -> Sample {
        let system = Arc::new(
            IsotopeSystem::new("Pb-Pb", vec![IsotopeRatio::new("206Pb", "204Pb")], None).unwrap(),
        );
        let mut sample = Sample::new(name, SampleType::Sample, system, TimeSeries::default());
        let mut data = ReducedData::new();
        for (ratio, mean, err) in ratios {
            data.insert(*ratio, *mean, *err);
        }
        sample.reduced_data = Some(data);
        sample
    }

    #[test]
    fn test_columns_follow_ratio_order() {
        let table = ResultTable::from_samples(&[calibrated(
            "S-1",
            &[("206Pb_204Pb", 18.0, 0.01), ("207Pb_204Pb", 15.6, 0.02)],
        )])
        .unwrap();

        assert_eq!(
            table.columns(),
            vec!["name", "type", "206Pb_204Pb", "206Pb_204Pb_err", "207Pb_204Pb", "207Pb_204Pb_err"]
        );
        assert_eq!(table.value("S-1", "207Pb_204Pb_err"), Some(0.02));
        assert_eq!(table.column("206Pb_204Pb"), Some(vec![18.0]));
        assert_eq!(table.value("S-2", "206Pb_204Pb"), None);
    }

    #[test]
    fn test_union_of_columns_fills_nan() {
        let table = ResultTable::from_samples(&[
            calibrated("S-1", &[("206Pb_204Pb", 18.0, 0.01)]),
            calibrated("S-2", &[("208Pb_206Pb", 2.1, 0.01)]),
        ])
        .unwrap();

        assert_eq!(table.value_columns().len(), 4);
        assert!(table.value("S-1", "208Pb_206Pb").unwrap().is_nan());
        assert_eq!(table.value("S-2", "208Pb_206Pb"), Some(2.1));
    }

    #[test]
    fn test_missing_reduced_data() {
        let mut sample = calibrated("S-1", &[]);
        sample.reduced_data = None;
        assert!(matches!(
            ResultTable::from_samples(&[sample]),
            Err(ProcessingError::MissingReducedData(_))
        ));
    }

    #[test]
    fn test_record_batch() {
        let table = ResultTable::from_samples(&[
            calibrated("S-1", &[("206Pb_204Pb", 18.0, 0.01)]),
            calibrated("S-2", &[("206Pb_204Pb", 18.5, 0.02)]),
        ])
        .unwrap();

        let batch = table.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 4);
        assert_eq!(batch.schema().field(2).name(), "206Pb_204Pb");

        let values = batch
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(values.value(1), 18.5);

        let types = batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(types.value(0), "sample");
    }

    #[test]
    fn test_display_has_header_and_rows() {
        let table =
            ResultTable::from_samples(&[calibrated("S-1", &[("206Pb_204Pb", 18.0, 0.01)])]).unwrap();
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("name"));
        assert!(lines[0].contains("206Pb_204Pb_err"));
        assert!(lines[1].contains("18.000000"));
    }
}
