use crate::error::{CoexpError, Result};
use log::warn;
use std::collections::HashMap;

/// Minimum Spearman correlation (exclusive) for a gene to count as co-expressed
pub const MIN_CORRELATION: f64 = 0.3;

/// Maximum raw p-value (exclusive) for a gene to count as co-expressed
pub const MAX_P_VALUE: f64 = 0.05;

/// Minimum summed expression (exclusive) of a gene across all samples.
/// Filters out genes that are barely expressed anywhere.
pub const MIN_TOTAL_EXPRESSION: f64 = 30.0;

/// Free-text descriptions indexed by gene ID
pub type AnnotationTable = HashMap<String, String>;

/// Ordered candidate gene IDs, duplicates allowed
pub type CandidateList = Vec<String>;

/// Gene-by-sample expression matrix.
///
/// Every row is stored against one shared, ordered sample list taken from the
/// file header. A `None` cell means the gene has no value for that sample.
/// Rows keep insertion order, which is the order [`ExpressionTable::iter`]
/// enumerates them in.
#[derive(Debug, Clone, Default)]
pub struct ExpressionTable {
    samples: Vec<String>,
    sample_index: HashMap<String, usize>,
    ids: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Option<f64>>>,
}

impl ExpressionTable {
    /// Creates an empty table over the given sample names.
    ///
    /// # Errors
    /// * `CoexpError::InvalidFileFormat` if a sample name occurs twice
    pub fn new(samples: Vec<String>) -> Result<Self> {
        let mut sample_index = HashMap::with_capacity(samples.len());
        for (idx, name) in samples.iter().enumerate() {
            if sample_index.insert(name.clone(), idx).is_some() {
                return Err(CoexpError::InvalidFileFormat(format!(
                    "duplicate sample name '{}'",
                    name
                )));
            }
        }

        Ok(Self {
            samples,
            sample_index,
            ..Default::default()
        })
    }

    /// Adds a gene row. A gene ID that is already present is replaced in place.
    ///
    /// # Errors
    /// * `CoexpError::DataError` if the row length differs from the sample count
    pub fn insert(&mut self, id: impl Into<String>, values: Vec<Option<f64>>) -> Result<()> {
        let id = id.into();
        if values.len() != self.samples.len() {
            return Err(CoexpError::DataError(format!(
                "gene '{}' has {} values but the table has {} samples",
                id,
                values.len(),
                self.samples.len()
            )));
        }

        match self.index.get(&id) {
            Some(&pos) => {
                warn!("Gene '{}' occurs more than once, keeping the last row", id);
                self.rows[pos] = values;
            }
            None => {
                self.index.insert(id.clone(), self.ids.len());
                self.ids.push(id);
                self.rows.push(values);
            }
        }
        Ok(())
    }

    /// Shared sample names in header order
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn sample_position(&self, sample: &str) -> Option<usize> {
        self.sample_index.get(sample).copied()
    }

    /// Number of genes in the table
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Expression profile of one gene, aligned with [`ExpressionTable::samples`]
    pub fn get(&self, id: &str) -> Option<&[Option<f64>]> {
        self.index.get(id).map(|&pos| self.rows[pos].as_slice())
    }

    /// Iterates genes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.ids
            .iter()
            .map(String::as_str)
            .zip(self.rows.iter().map(Vec::as_slice))
    }
}

/// One gene found to be co-expressed with a candidate
#[derive(Debug, Clone, PartialEq)]
pub struct CoexpressionHit {
    pub id: String,
    pub correlation: f64,
    /// Raw (unadjusted) two-sided p-value
    pub p_value: f64,
}

/// Thresholds applied by the co-expression screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenParams {
    pub min_correlation: f64,
    pub max_p_value: f64,
    pub min_total_expression: f64,
}

impl Default for ScreenParams {
    fn default() -> Self {
        Self {
            min_correlation: MIN_CORRELATION,
            max_p_value: MAX_P_VALUE,
            min_total_expression: MIN_TOTAL_EXPRESSION,
        }
    }
}

impl ScreenParams {
    /// Checks that every threshold is usable.
    ///
    /// # Errors
    /// * `CoexpError::InvalidParameter` naming the first offending threshold
    pub fn validate(&self) -> Result<()> {
        if !(-1.0..1.0).contains(&self.min_correlation) {
            return Err(CoexpError::invalid_parameter(
                "min_correlation",
                self.min_correlation,
                "must lie in [-1, 1)",
            ));
        }
        if !(self.max_p_value > 0.0 && self.max_p_value <= 1.0) {
            return Err(CoexpError::invalid_parameter(
                "max_p_value",
                self.max_p_value,
                "must lie in (0, 1]",
            ));
        }
        if self.min_total_expression.is_nan() {
            return Err(CoexpError::invalid_parameter(
                "min_total_expression",
                self.min_total_expression,
                "must be a number",
            ));
        }
        Ok(())
    }
}
