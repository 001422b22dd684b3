use crate::error::{CoexpError, Result};
use crate::types::{AnnotationTable, CandidateList, ExpressionTable};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Drops trailing whitespace, including trailing empty tab fields
fn trim_line_end(line: &str) -> &str {
    line.trim_end()
}

/// Reads a tab-separated expression matrix into an [`ExpressionTable`].
///
/// The first line is the header `ID<TAB>sample1<TAB>sample2...`; the first
/// header field is ignored. Every following non-blank line is
/// `geneID<TAB>value1<TAB>value2...`.
///
/// # Arguments
/// * `filename` - Path to the matrix file
///
/// # Returns
/// * `Result<ExpressionTable>` - Genes in file order over the header's samples.
///   A row with fewer values than samples, or ending in empty fields, leaves
///   the trailing samples empty. An empty field followed by a value is an error.
///
/// # Errors
/// * `CoexpError::Io` - If the file cannot be opened or read
/// * `CoexpError::InvalidFileFormat` - If the header is missing, names a sample twice,
///   or a row has more values than there are samples
/// * `CoexpError::InvalidValue` - If a value is not a number
pub fn load_expression_table(filename: impl AsRef<Path>) -> Result<ExpressionTable> {
    let file = File::open(filename.as_ref())?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(CoexpError::InvalidFileFormat("Missing header line".into())),
    };
    let samples: Vec<String> = trim_line_end(&header)
        .split('\t')
        .skip(1)
        .map(str::to_string)
        .collect();
    if samples.is_empty() {
        return Err(CoexpError::InvalidFileFormat(
            "Header line names no samples".into(),
        ));
    }

    let mut table = ExpressionTable::new(samples)?;
    let n_samples = table.samples().len();

    for (idx, line) in lines.enumerate() {
        let line = line?;
        let line = trim_line_end(&line);
        if line.is_empty() {
            continue;
        }
        // header is line 1
        let line_no = idx + 2;

        let mut fields = line.split('\t');
        let id = fields.next().unwrap_or_default();

        let mut values: Vec<Option<f64>> = Vec::with_capacity(n_samples);
        for (column, field) in fields.enumerate() {
            if column >= n_samples {
                return Err(CoexpError::invalid_line(
                    line_no,
                    format!("more than {} values for gene '{}'", n_samples, id),
                ));
            }
            let value = field
                .trim()
                .parse::<f64>()
                .map_err(|_| CoexpError::invalid_value(line_no, column + 2, field))?;
            values.push(Some(value));
        }
        values.resize(n_samples, None);

        table.insert(id, values)?;
    }

    debug!(
        "Loaded {} genes over {} samples",
        table.len(),
        table.samples().len()
    );
    Ok(table)
}

/// Reads a two-column `geneID<TAB>description` file.
/// A line whose description is empty counts as a single column.
///
/// # Errors
/// * `CoexpError::Io` - If the file cannot be opened or read
/// * `CoexpError::InvalidFileFormat` - If a non-blank line has no description column
pub fn load_annotation(filename: impl AsRef<Path>) -> Result<AnnotationTable> {
    let file = File::open(filename.as_ref())?;
    let reader = BufReader::new(file);
    let mut annotation = AnnotationTable::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = trim_line_end(&line);
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split('\t');
        let id = parts.next().unwrap_or_default();
        let description = parts
            .next()
            .ok_or_else(|| CoexpError::invalid_line(idx + 1, "expected two tab-separated columns"))?;
        annotation.insert(id.to_string(), description.to_string());
    }

    debug!("Loaded {} annotations", annotation.len());
    Ok(annotation)
}

/// Reads candidate gene IDs, one per line, keeping file order and duplicates
pub fn load_candidates(filename: impl AsRef<Path>) -> Result<CandidateList> {
    let file = File::open(filename.as_ref())?;
    let reader = BufReader::new(file);

    let mut candidates = CandidateList::new();
    for line in reader.lines() {
        let line = line?;
        let id = line.trim();
        if !id.is_empty() {
            candidates.push(id.to_string());
        }
    }
    Ok(candidates)
}
