use crate::error::{CoexpError, Result};
use crate::types::ExpressionTable;
use log::debug;
use ndarray::{Array2, ArrayViewMut1};
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Genes to plot, as `(gene ID, display name)` in plotting order
pub type GeneSelection = Vec<(String, String)>;

/// A named set of samples averaged into one heatmap column
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGroup {
    pub name: String,
    pub members: Vec<String>,
}

/// Sample groups in display order
pub type SampleGroups = Vec<SampleGroup>;

/// Genes × sample groups matrix behind a heatmap
#[derive(Debug, Clone)]
pub struct HeatmapMatrix {
    pub gene_ids: Vec<String>,
    pub gene_names: Vec<String>,
    pub groups: Vec<String>,
    /// Members of each group that exist in the expression table
    pub group_sizes: Vec<usize>,
    pub values: Array2<f64>,
    pub zscored: bool,
}

impl HeatmapMatrix {
    /// Column labels of the form `<group>_(n=<members>)`
    pub fn group_labels(&self) -> Vec<String> {
        self.groups
            .iter()
            .zip(&self.group_sizes)
            .map(|(name, n)| format!("{}_(n={})", name, n))
            .collect()
    }

    /// Converts the matrix into a DataFrame with a `gene` column followed by
    /// one column per group.
    ///
    /// # Errors
    /// * `CoexpError::Polars` if two groups share a name
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.groups.len() + 1);
        columns.push(Column::new("gene".into(), self.gene_ids.clone()));
        for (idx, group) in self.groups.iter().enumerate() {
            columns.push(Column::new(
                group.as_str().into(),
                self.values.column(idx).to_vec(),
            ));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Reads the genes to plot, one `geneID[<TAB>name]` per line.
/// Genes without a name column are labelled with their ID.
pub fn load_gene_selection(filename: impl AsRef<Path>) -> Result<GeneSelection> {
    let file = File::open(filename.as_ref())?;
    let reader = BufReader::new(file);

    let mut genes = GeneSelection::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.trim_end().split('\t');
        let id = parts.next().unwrap_or_default().trim().to_string();
        let name = match parts.next().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => id.clone(),
        };
        genes.push((id, name));
    }
    Ok(genes)
}

/// Reads sample groups, one `group<TAB>sample1,sample2,...` per line.
///
/// # Errors
/// * `CoexpError::Io` - If the file cannot be opened or read
/// * `CoexpError::InvalidFileFormat` - If a line has no member column
pub fn load_sample_groups(filename: impl AsRef<Path>) -> Result<SampleGroups> {
    let file = File::open(filename.as_ref())?;
    let reader = BufReader::new(file);

    let mut groups = SampleGroups::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.trim_end().split('\t');
        let name = parts.next().unwrap_or_default().to_string();
        let members = parts
            .next()
            .ok_or_else(|| CoexpError::invalid_line(idx + 1, "expected group and member columns"))?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        groups.push(SampleGroup { name, members });
    }
    Ok(groups)
}

/// Averages each gene over the members of each group.
///
/// A cell is the mean of the gene's values in the group's samples, or `0.0`
/// when none of them has a value (also for genes absent from the table).
pub fn build_matrix(
    table: &ExpressionTable,
    genes: &GeneSelection,
    groups: &SampleGroups,
) -> HeatmapMatrix {
    let columns: Vec<Vec<usize>> = groups
        .iter()
        .map(|group| {
            group
                .members
                .iter()
                .filter_map(|sample| table.sample_position(sample))
                .collect()
        })
        .collect();

    let mut values = Array2::<f64>::zeros((genes.len(), groups.len()));
    for (row, (id, _)) in genes.iter().enumerate() {
        let Some(profile) = table.get(id) else {
            debug!("Gene '{}' is not in the expression table", id);
            continue;
        };
        for (col, positions) in columns.iter().enumerate() {
            let present: Vec<f64> = positions.iter().filter_map(|&pos| profile[pos]).collect();
            if !present.is_empty() {
                values[[row, col]] = present.iter().sum::<f64>() / present.len() as f64;
            }
        }
    }

    HeatmapMatrix {
        gene_ids: genes.iter().map(|(id, _)| id.clone()).collect(),
        gene_names: genes.iter().map(|(_, name)| name.clone()).collect(),
        groups: groups.iter().map(|g| g.name.clone()).collect(),
        group_sizes: columns.iter().map(Vec::len).collect(),
        values,
        zscored: false,
    }
}

/// Replaces one row by its z-scores using the population standard deviation.
///
/// Rows whose sum is not positive are left untouched; rows without
/// variance become zeros.
pub fn zscore_row(mut row: ArrayViewMut1<f64>) {
    let total = row.sum();
    if total.is_nan() || total <= 0.0 {
        return;
    }
    let n = row.len() as f64;
    let mean = total / n;
    let std = (row.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    if std == 0.0 {
        row.fill(0.0);
    } else {
        row.mapv_inplace(|v| (v - mean) / std);
    }
}

/// Z-scores every gene row of the matrix
pub fn zscore_rows(matrix: &mut HeatmapMatrix) {
    for row in matrix.values.rows_mut() {
        zscore_row(row);
    }
    matrix.zscored = true;
}

/// Location of the numeric table written next to a heatmap image:
/// `heatmap.png` becomes `heatmap_plotted_values.txt`.
pub fn values_path(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "heatmap".to_string());
    image_path.with_file_name(format!("{}_plotted_values.txt", stem))
}

/// Writes the matrix as a tab-separated table with a header row.
///
/// # Errors
/// * `CoexpError::Io` - If the file cannot be created
/// * `CoexpError::Polars` - If the DataFrame cannot be built or serialized
pub fn write_values(matrix: &HeatmapMatrix, filename: impl AsRef<Path>) -> Result<()> {
    let mut df = matrix.to_dataframe()?;
    let mut file = File::create(filename.as_ref())?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b'\t')
        .finish(&mut df)?;
    Ok(())
}
