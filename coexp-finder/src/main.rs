use clap::Parser;
use coexp_rs::coexpression::{rank_hits, screen};
use coexp_rs::error::CoexpError;
use coexp_rs::expression::{load_annotation, load_candidates, load_expression_table};
use coexp_rs::report::write_report_file;
use coexp_rs::types::{
    CoexpressionHit, ExpressionTable, ScreenParams, MAX_P_VALUE, MIN_CORRELATION,
    MIN_TOTAL_EXPRESSION,
};
use log::info;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Coexp(#[from] CoexpError),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Parser)]
#[command(
    name = "coexp-finder",
    about = "Finds genes whose expression is rank-correlated with each candidate gene",
    long_about = "A tool for screening a gene-by-sample expression table for genes co-expressed \
                  with a list of candidates. Every gene is compared against each candidate with \
                  Spearman's rank correlation; genes passing the correlation, significance and \
                  expression filters are written to one table per candidate, strongest first, \
                  with Bonferroni-adjusted p-values.",
    version,
    after_help = "Example usage:\n    \
                  coexp-finder --in candidates.txt --exp expression.tsv --ann annotation.tsv --out results/\n    \
                  coexp-finder --in candidates.txt --exp expression.tsv --ann annotation.tsv --out results/ --threads 8",
    color = clap::ColorChoice::Always
)]
#[derive(Debug)]
struct Args {
    /// Path to candidate gene list, one gene ID per line
    #[arg(long = "in", value_name = "CANDIDATE_FILE")]
    input: PathBuf,

    /// Path to tab-separated expression table
    /// Header `ID<TAB>sample1<TAB>...`, then one gene per line
    #[arg(long = "exp", value_name = "EXPRESSION_FILE")]
    expression: PathBuf,

    /// Path to tab-separated `geneID<TAB>description` annotation file
    #[arg(long = "ann", value_name = "ANNOTATION_FILE")]
    annotation: PathBuf,

    /// Output directory, one `<candidate>.txt` per candidate
    /// Will be created if it doesn't exist
    #[arg(long = "out", value_name = "OUTPUT_DIR")]
    output: PathBuf,

    /// Spearman correlation a gene must exceed
    #[arg(long, default_value_t = MIN_CORRELATION)]
    min_correlation: f64,

    /// Raw p-value a gene must stay below
    #[arg(long, default_value_t = MAX_P_VALUE)]
    max_p_value: f64,

    /// Summed expression across all samples a gene must exceed
    #[arg(long, default_value_t = MIN_TOTAL_EXPRESSION)]
    min_total_expression: f64,

    /// Number of worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,
}

impl Args {
    fn screen_params(&self) -> ScreenParams {
        ScreenParams {
            min_correlation: self.min_correlation,
            max_p_value: self.max_p_value,
            min_total_expression: self.min_total_expression,
        }
    }
}

/// Screens every candidate in parallel and returns the sorted hits in
/// candidate order.
fn analyse_candidates(
    candidates: &[String],
    table: &ExpressionTable,
    params: &ScreenParams,
) -> Vec<Vec<CoexpressionHit>> {
    candidates
        .par_iter()
        .map(|candidate| {
            let mut hits = screen(candidate, table, params);
            rank_hits(&mut hits);
            hits
        })
        .collect()
}

fn main() -> Result<(), FinderError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let start_time = std::time::Instant::now();

    let args = Args::parse();
    let params = args.screen_params();
    params.validate()?;

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    fs::create_dir_all(&args.output)?;

    let annotation = load_annotation(&args.annotation)?;
    let table = load_expression_table(&args.expression)?;
    let candidates = load_candidates(&args.input)?;
    info!(
        "{} candidates against {} genes over {} samples",
        candidates.len(),
        table.len(),
        table.samples().len()
    );

    let results = analyse_candidates(&candidates, &table, &params);

    // written sequentially so repeated candidates never share a file handle
    for (candidate, hits) in candidates.iter().zip(&results) {
        let path = write_report_file(&args.output, candidate, hits, &annotation, table.len())?;
        info!("{}: {} co-expressed genes -> {}", candidate, hits.len(), path.display());
    }

    let elapsed = start_time.elapsed();
    info!(
        "Total execution time: {:.4} minutes",
        elapsed.as_secs_f64() / 60.0
    );

    Ok(())
}
