use statrs::distribution::{ContinuousCDF, StudentsT};

/// Spearman rank correlation of a paired sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spearman {
    /// Correlation coefficient in [-1, 1]
    pub r: f64,
    /// Two-sided p-value; NaN when fewer than three pairs leave no degrees of freedom
    pub p: f64,
    /// Number of pairs
    pub n: usize,
}

/// Ranks values from 1 upwards, giving tied values the mean of their positions.
///
/// NaN values sort last; callers are expected to filter them first.
pub fn rank(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && values[order[j]] == values[order[i]] {
            j += 1;
        }

        // positions i..j are 0-based, ranks are 1-based
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &k in &order[i..j] {
            ranks[k] = avg_rank;
        }
        i = j;
    }
    ranks
}

/// Pearson correlation, `None` for mismatched, too short or constant input
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Two-sided p-value of a correlation coefficient over `n` pairs, using the
/// t statistic with `n - 2` degrees of freedom.
pub fn correlation_p_value(r: f64, n: usize) -> f64 {
    if n < 3 || r.is_nan() {
        return f64::NAN;
    }
    if r.abs() >= 1.0 {
        return 0.0;
    }

    let dof = (n - 2) as f64;
    let t = r * (dof / ((1.0 + r) * (1.0 - r))).sqrt();
    match StudentsT::new(0.0, 1.0, dof) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}

/// Spearman's rank correlation and its two-sided p-value.
///
/// # Returns
/// * `None` - If the inputs differ in length, hold fewer than two pairs,
///   or either side is constant
pub fn spearman(x: &[f64], y: &[f64]) -> Option<Spearman> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let r = pearson(&rank(x), &rank(y))?;
    Some(Spearman {
        r,
        p: correlation_p_value(r, x.len()),
        n: x.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_with_ties() {
        assert_eq!(rank(&[10.0, 20.0, 30.0]), vec![1.0, 2.0, 3.0]);
        assert_eq!(rank(&[3.0, 1.0, 3.0, 2.0]), vec![3.5, 1.0, 3.5, 2.0]);
        assert_eq!(rank(&[5.0, 5.0, 5.0]), vec![2.0, 2.0, 2.0]);
        assert!(rank(&[]).is_empty());
    }

    #[test]
    fn test_spearman_reference_values() {
        let result = spearman(&[1.0, 2.0, 3.0, 4.0, 5.0], &[5.0, 6.0, 7.0, 8.0, 7.0]).unwrap();
        assert!((result.r - 0.8207826816681233).abs() < 1e-10);
        assert!((result.p - 0.08858700531354381).abs() < 1e-6);
        assert_eq!(result.n, 5);
    }

    #[test]
    fn test_spearman_perfect_monotone() {
        let up = spearman(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 11.0]).unwrap();
        assert_eq!(up.r, 1.0);
        assert_eq!(up.p, 0.0);

        let down = spearman(&[1.0, 2.0, 3.0, 4.0], &[9.0, 3.0, 2.0, 1.0]).unwrap();
        assert_eq!(down.r, -1.0);
        assert_eq!(down.p, 0.0);
    }

    #[test]
    fn test_spearman_degenerate_input() {
        // constant on either side
        assert!(spearman(&[1.0, 1.0, 1.0], &[2.0, 2.0, 2.0]).is_none());
        assert!(spearman(&[1.0, 2.0, 3.0], &[7.0, 7.0, 7.0]).is_none());
        // too short or mismatched
        assert!(spearman(&[1.0], &[2.0]).is_none());
        assert!(spearman(&[], &[]).is_none());
        assert!(spearman(&[1.0, 2.0], &[1.0]).is_none());
    }

    #[test]
    fn test_two_pairs_have_no_p_value() {
        let result = spearman(&[1.0, 2.0], &[3.0, 4.0]).unwrap();
        assert_eq!(result.r, 1.0);
        assert!(result.p.is_nan());
    }

    #[test]
    fn test_p_value_is_symmetric_in_sign() {
        let pos = correlation_p_value(0.5, 12);
        let neg = correlation_p_value(-0.5, 12);
        assert!((pos - neg).abs() < 1e-15);
        assert!(pos > 0.0 && pos < 1.0);
        assert!((correlation_p_value(0.0, 12) - 1.0).abs() < 1e-12);
    }
}
