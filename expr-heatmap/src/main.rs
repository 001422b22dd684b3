use clap::Parser;
use coexp_rs::error::CoexpError;
use coexp_rs::expression::load_expression_table;
use coexp_rs::heatmap::{
    build_matrix, load_gene_selection, load_sample_groups, values_path, write_values, zscore_rows,
};
use log::info;
use std::fs;
use std::path::PathBuf;

mod render;

#[derive(thiserror::Error, Debug)]
pub enum HeatmapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Coexp(#[from] CoexpError),

    #[error("Rendering error: {0}")]
    Render(String),
}

#[derive(Parser)]
#[command(
    name = "expr-heatmap",
    about = "Plots mean expression of selected genes across sample groups as a heatmap",
    long_about = "A tool for summarising an expression table over a gene list and a sample grouping. \
                  Each heatmap cell is the mean expression of one gene over the samples of one group. \
                  The plotted values are also written as a tab-separated table next to the image.",
    version,
    after_help = "Example usage:\n    \
                  expr-heatmap --exp expression.tsv --genes genes.txt --samples groups.txt --out heatmap.png\n    \
                  expr-heatmap --exp expression.tsv --genes genes.txt --samples groups.txt --out heatmap.svg --zscore",
    color = clap::ColorChoice::Always
)]
#[derive(Debug)]
struct Args {
    /// Path to tab-separated expression table
    #[arg(long = "exp", value_name = "EXPRESSION_FILE")]
    expression: PathBuf,

    /// Path to gene list, one `geneID[<TAB>name]` per line
    #[arg(long, value_name = "GENES_FILE")]
    genes: PathBuf,

    /// Path to sample groups, one `group<TAB>sample1,sample2,...` per line
    /// Line order is the column order of the heatmap
    #[arg(long, value_name = "SAMPLE_FILE")]
    samples: PathBuf,

    /// Output image (.png or .svg; other extensions are written as .svg)
    #[arg(long = "out", value_name = "OUTPUT_FILE")]
    output: PathBuf,

    /// Replace each gene's values by their z-scores
    #[arg(long)]
    zscore: bool,
}

fn main() -> Result<(), HeatmapError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent)?;
    }

    let table = load_expression_table(&args.expression)?;
    let genes = load_gene_selection(&args.genes)?;
    let groups = load_sample_groups(&args.samples)?;

    let mut matrix = build_matrix(&table, &genes, &groups);
    if args.zscore {
        zscore_rows(&mut matrix);
    }
    info!("number of genes for heatmap construction: {}", genes.len());
    info!("number of sample groups for heatmap construction: {}", groups.len());

    let table_path = values_path(&args.output);
    write_values(&matrix, &table_path)?;
    info!("Plotted values written to {}", table_path.display());

    render::draw_heatmap(&matrix, &args.output).map_err(|e| HeatmapError::Render(e.to_string()))?;

    Ok(())
}
