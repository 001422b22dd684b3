use crate::stats::spearman;
use crate::types::{CoexpressionHit, ExpressionTable, ScreenParams};
use log::{debug, warn};

/// Sum of all values a gene has, whether or not the candidate has a value
/// for the same sample. A NaN cell makes the total NaN.
pub fn total_expression(profile: &[Option<f64>]) -> f64 {
    profile.iter().flatten().sum()
}

/// Pairs up samples where both profiles hold a non-NaN value.
///
/// # Returns
/// * `(Vec<f64>, Vec<f64>)` - Candidate values and gene values, aligned by sample
pub fn paired_values(candidate: &[Option<f64>], gene: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    candidate
        .iter()
        .zip(gene)
        .filter_map(|pair| match pair {
            (Some(x), Some(y)) if !x.is_nan() && !y.is_nan() => Some((*x, *y)),
            _ => None,
        })
        .unzip()
}

/// Decides whether a correlation counts as co-expression.
///
/// All comparisons are strict: a correlation equal to `min_correlation`, a
/// p-value equal to `max_p_value` or a total equal to `min_total_expression`
/// is rejected. `p_value` must be the raw, unadjusted value.
pub fn passes_filters(
    correlation: f64,
    p_value: f64,
    total_expression: f64,
    params: &ScreenParams,
) -> bool {
    !correlation.is_nan()
        && total_expression > params.min_total_expression
        && correlation > params.min_correlation
        && p_value < params.max_p_value
}

/// Finds genes whose expression profile is rank-correlated with a candidate.
///
/// Every gene other than the candidate is compared against it with Spearman's
/// rho over the samples both have a value for. Genes with degenerate input
/// (fewer than two shared samples, constant profile) are skipped, as are
/// genes failing [`passes_filters`].
///
/// # Arguments
/// * `candidate` - Gene ID to compare against the rest of the table
/// * `table` - Expression matrix
/// * `params` - Thresholds
///
/// # Returns
/// * `Vec<CoexpressionHit>` - Hits in table order with raw p-values; empty if
///   the candidate is not in the table
pub fn screen(
    candidate: &str,
    table: &ExpressionTable,
    params: &ScreenParams,
) -> Vec<CoexpressionHit> {
    let Some(reference) = table.get(candidate) else {
        warn!("Candidate '{}' is not in the expression table", candidate);
        return Vec::new();
    };

    let hits: Vec<CoexpressionHit> = table
        .iter()
        .filter(|(id, _)| *id != candidate)
        .filter_map(|(id, profile)| {
            let total = total_expression(profile);
            let (xs, ys) = paired_values(reference, profile);
            let result = spearman(&xs, &ys)?;

            passes_filters(result.r, result.p, total, params).then(|| CoexpressionHit {
                id: id.to_string(),
                correlation: result.r,
                p_value: result.p,
            })
        })
        .collect();

    debug!("{}: {} co-expressed genes", candidate, hits.len());
    hits
}

/// Sorts hits by correlation, strongest first. Ties keep their table order.
pub fn rank_hits(hits: &mut [CoexpressionHit]) {
    hits.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
}
