use crate::models::GradeCell;

/// Descriptive statistics over one numeric projection of a row or column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl ScoreStats {
    pub fn empty() -> Self {
        ScoreStats {
            mean: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            count: 0,
        }
    }
}

/// Splits a sequence of cells into the included numeric observations and the
/// count of excluded entries (absences, withdrawals, labels, bad fractions).
pub fn project_cells<'a, I>(cells: I) -> (Vec<f64>, usize)
where
    I: IntoIterator<Item = &'a GradeCell>,
{
    let mut values = Vec::new();
    let mut missing = 0usize;

    for cell in cells {
        match cell.numeric_value() {
            Some(value) => values.push(value),
            None => missing += 1,
        }
    }

    (values, missing)
}

pub fn describe(values: &[f64]) -> ScoreStats {
    if values.is_empty() {
        return ScoreStats::empty();
    }

    let count = values.len();
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut min = values[0];
    let mut max = values[0];

    for &v in values {
        sum += v;
        sum_sq += v * v;
        min = min.min(v);
        max = max.max(v);
    }

    let mean = sum / count as f64;
    let std_dev = if count <= 1 {
        0.0
    } else {
        // Population variance, clamped so floating error never goes negative
        // under the root.
        let variance = (sum_sq / count as f64 - mean * mean).max(0.0);
        variance.sqrt()
    };

    ScoreStats {
        mean,
        std_dev,
        min,
        max,
        count,
    }
}

/// Percentile rank of `score` among `peers`: the share of peers strictly
/// below it, scaled to [0, 100]. Tied observations share the same rank. With
/// one peer or none there is nobody to rank against, so the result is 100.
pub fn percentile_rank(score: f64, peers: &[f64]) -> f64 {
    let n = peers.len();
    if n <= 1 {
        return 100.0;
    }

    let below = peers.iter().filter(|&&p| p < score).count();
    let rank = 100.0 * below as f64 / n as f64;
    rank.clamp(0.0, 100.0)
}
