use serde::{Deserialize, Serialize};

use super::ModelError;

/// Cycle-indexed intensity table.
///
/// Rows are analytical cycles labelled by their cycle number, columns are
/// isotope labels. Values are stored column-major so a stage can borrow a
/// whole isotope trace as a slice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    cycles: Vec<u32>,
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl TimeSeries {
    /// Create a table with the given cycle labels and no columns.
    ///
    /// Fails if the labels are not strictly increasing.
    pub fn new(cycles: Vec<u32>) -> Result<Self, ModelError> {
        if let Some(pos) = cycles.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ModelError::UnorderedCycles(pos + 1));
        }
        Ok(Self {
            cycles,
            columns: Vec::new(),
            values: Vec::new(),
        })
    }

    /// Create a table with cycles numbered `1..=n`, where `n` is the length of the columns.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut columns = columns.into_iter().peekable();
        let rows = columns.peek().map(|(_, v)| v.len()).unwrap_or(0);
        let mut table = Self::new((1..=rows as u32).collect())?;
        for (name, values) in columns {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Builder-style [`push_column`](Self::push_column)
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self, ModelError> {
        self.push_column(name, values)?;
        Ok(self)
    }

    /// Append a new column
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<(), ModelError> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(ModelError::DuplicateColumn(name));
        }
        if values.len() != self.cycles.len() {
            return Err(ModelError::LengthMismatch {
                column: name,
                expected: self.cycles.len(),
                actual: values.len(),
            });
        }
        self.columns.push(name);
        self.values.push(values);
        Ok(())
    }

    /// Number of cycles (rows)
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// True when no cycles remain
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Cycle labels of the remaining rows
    pub fn cycles(&self) -> &[u32] {
        &self.cycles
    }

    /// Column labels in insertion order
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Whether a column with this label exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    fn position(&self, name: &str) -> Result<usize, ModelError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ModelError::ColumnNotFound(name.to_string()))
    }

    /// Borrow a column's values
    pub fn column(&self, name: &str) -> Result<&[f64], ModelError> {
        let idx = self.position(name)?;
        Ok(&self.values[idx])
    }

    /// Mutably borrow a column's values
    pub fn column_mut(&mut self, name: &str) -> Result<&mut [f64], ModelError> {
        let idx = self.position(name)?;
        Ok(&mut self.values[idx])
    }

    /// Iterate over `(label, values)` pairs
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }

    /// Rows whose cycle label lies in `first..=last` (label based, inclusive).
    pub fn slice_cycles(&self, first: u32, last: u32) -> Self {
        let keep: Vec<bool> = self
            .cycles
            .iter()
            .map(|&c| c >= first && c <= last)
            .collect();
        self.retain_rows(&keep)
    }

    /// Rows for which `keep` is true. `keep` must have one entry per row.
    pub fn retain_rows(&self, keep: &[bool]) -> Self {
        debug_assert_eq!(keep.len(), self.len());
        let pick = |values: &[f64]| -> Vec<f64> {
            values
                .iter()
                .zip(keep)
                .filter_map(|(v, &k)| k.then_some(*v))
                .collect()
        };
        Self {
            cycles: pick_labels(&self.cycles, keep),
            columns: self.columns.clone(),
            values: self.values.iter().map(|v| pick(v.as_slice())).collect(),
        }
    }

    /// Same columns, zero rows
    pub fn without_rows(&self) -> Self {
        Self {
            cycles: Vec::new(),
            columns: self.columns.clone(),
            values: vec![Vec::new(); self.columns.len()],
        }
    }

    /// Arithmetic mean of every column, in column order. Empty columns yield `NaN`.
    pub fn column_means(&self) -> Vec<(String, f64)> {
        self.iter_columns()
            .map(|(name, values)| (name.to_string(), crate::processing::stats::mean(values)))
            .collect()
    }

    /// Subtract `offsets[label]` from every value in each matching column.
    ///
    /// Columns without an offset are left untouched.
    pub fn subtract_column_offsets(&mut self, offsets: &[(String, f64)]) {
        for (name, offset) in offsets {
            if let Ok(idx) = self.position(name) {
                self.values[idx].iter_mut().for_each(|v| *v -= offset);
            }
        }
    }
}

fn pick_labels(cycles: &[u32], keep: &[bool]) -> Vec<u32> {
    cycles
        .iter()
        .zip(keep)
        .filter_map(|(c, &k)| k.then_some(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TimeSeries {
        TimeSeries::from_columns([
            ("206Pb", vec![1.0, 2.0, 3.0, 4.0]),
            ("204Pb", vec![0.5, 0.5, 0.5, 0.5]),
        ])
        .unwrap()
    }

    #[test]
    fn test_cycles_start_at_one() {
        let ts = table();
        assert_eq!(ts.cycles(), &[1, 2, 3, 4]);
        assert_eq!(ts.len(), 4);
    }

    #[test]
    fn test_slice_is_label_based_and_inclusive() {
        let ts = table().slice_cycles(2, 3);
        assert_eq!(ts.cycles(), &[2, 3]);
        assert_eq!(ts.column("206Pb").unwrap(), &[2.0, 3.0]);

        let again = ts.slice_cycles(3, 10);
        assert_eq!(again.cycles(), &[3]);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = table().with_column("208Pb", vec![1.0]).unwrap_err();
        assert!(matches!(err, ModelError::LengthMismatch { expected: 4, actual: 1, .. }));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = table().with_column("206Pb", vec![0.0; 4]).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateColumn(_)));
    }

    #[test]
    fn test_unordered_cycles_rejected() {
        assert!(matches!(
            TimeSeries::new(vec![1, 3, 2]),
            Err(ModelError::UnorderedCycles(2))
        ));
    }

    #[test]
    fn test_missing_column() {
        assert!(matches!(
            table().column("208Pb"),
            Err(ModelError::ColumnNotFound(c)) if c == "208Pb"
        ));
    }

    #[test]
    fn test_subtract_offsets() {
        let mut ts = table();
        ts.subtract_column_offsets(&[("206Pb".to_string(), 1.0)]);
        assert_eq!(ts.column("206Pb").unwrap(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(ts.column("204Pb").unwrap(), &[0.5; 4]);
    }

    #[test]
    fn test_without_rows_keeps_columns() {
        let empty = table().without_rows();
        assert!(empty.is_empty());
        assert_eq!(empty.column_names().len(), 2);
        assert!(empty.column("206Pb").unwrap().is_empty());
    }
}
