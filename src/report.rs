use crate::error::Result;
use crate::types::{AnnotationTable, CoexpressionHit};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const REPORT_HEADER: &str =
    "CandidateGene\tGeneID\tSpearmanCorrelation\tadjusted_p-value\tFunctionalAnnotation";

/// Placeholder written when a hit has no annotation
pub const MISSING_ANNOTATION: &str = "N/A";

/// Scales a raw p-value by the number of genes tested.
///
/// The result is not capped at 1.
pub fn adjusted_p_value(p_value: f64, n_genes: usize) -> f64 {
    p_value * n_genes as f64
}

/// Report location for one candidate: `<output_dir>/<candidate>.txt`
pub fn report_path(output_dir: &Path, candidate: &str) -> PathBuf {
    output_dir.join(format!("{}.txt", candidate))
}

/// Writes the co-expression report of one candidate.
///
/// # Arguments
/// * `writer` - Destination
/// * `candidate` - Candidate gene ID, repeated in the first column of every row
/// * `hits` - Hits in the order they should appear, carrying raw p-values
/// * `annotation` - Descriptions looked up by hit ID
/// * `n_genes` - Number of genes in the expression table, used to adjust p-values
///
/// # Errors
/// * `CoexpError::Io` for write failures
pub fn write_report<W: Write>(
    writer: &mut W,
    candidate: &str,
    hits: &[CoexpressionHit],
    annotation: &AnnotationTable,
    n_genes: usize,
) -> Result<()> {
    writeln!(writer, "{}", REPORT_HEADER)?;
    for hit in hits {
        let description = annotation
            .get(&hit.id)
            .map(String::as_str)
            .unwrap_or(MISSING_ANNOTATION);
        writeln!(
            writer,
            "{}\t{}\t{:?}\t{:?}\t{}",
            candidate,
            hit.id,
            hit.correlation,
            adjusted_p_value(hit.p_value, n_genes),
            description
        )?;
    }
    Ok(())
}

/// Creates `<output_dir>/<candidate>.txt` and writes the report into it.
///
/// # Returns
/// * `Result<PathBuf>` - The path written
pub fn write_report_file(
    output_dir: &Path,
    candidate: &str,
    hits: &[CoexpressionHit],
    annotation: &AnnotationTable,
    n_genes: usize,
) -> Result<PathBuf> {
    let path = report_path(output_dir, candidate);
    let mut writer = BufWriter::new(File::create(&path)?);
    write_report(&mut writer, candidate, hits, annotation, n_genes)?;
    writer.flush()?;
    Ok(path)
}
