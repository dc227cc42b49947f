use crate::models::DistributionBucket;
use crate::risk::PASSING_THRESHOLD;

/// Upper bound of the top standard bucket; absorbs extra-credit scores past
/// 100 without losing the student.
const STANDARD_CEILING: f64 = 1000.0;

/// Below this maximum the class is still early in the grading period and the
/// fixed 0-100 ranges would lump everyone into one bar.
const EARLY_GRADING_LIMIT: f64 = 60.0;

/// Partitions accumulated scores into contiguous, upper-bound-exclusive
/// histogram buckets. With the observed maximum under the early-grading limit
/// the range [0, max] is split into four equal-width buckets; otherwise the
/// fixed 0-100 ranges apply.
pub fn bucket_scores(scores: &[f64]) -> Vec<DistributionBucket> {
    let max_observed = if scores.is_empty() {
        10.0
    } else {
        scores.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    };

    let ranges: Vec<(f64, f64, String)> = if max_observed < EARLY_GRADING_LIMIT {
        early_ranges(max_observed)
    } else {
        standard_ranges()
    };

    let student_count = scores.len();

    ranges
        .into_iter()
        .map(|(min, max, range_label)| {
            let count = scores.iter().filter(|&&s| s >= min && s < max).count();
            let percent_of_class = if student_count == 0 {
                0.0
            } else {
                100.0 * count as f64 / student_count as f64
            };

            DistributionBucket {
                range_label,
                min,
                max,
                count,
                is_failing: max <= PASSING_THRESHOLD,
                percent_of_class,
            }
        })
        .collect()
}

fn standard_ranges() -> Vec<(f64, f64, String)> {
    vec![
        (0.0, 60.0, "0-60".to_string()),
        (60.0, 70.0, "60-70".to_string()),
        (70.0, 80.0, "70-80".to_string()),
        (80.0, 90.0, "80-90".to_string()),
        (90.0, STANDARD_CEILING, "90-100".to_string()),
    ]
}

fn early_ranges(max_observed: f64) -> Vec<(f64, f64, String)> {
    let step = (max_observed / 4.0).ceil();
    let mut ranges = Vec::with_capacity(4);

    for i in 0..4u32 {
        let min = step * i as f64;
        if i < 3 {
            let max = step * (i + 1) as f64;
            ranges.push((min, max, format!("{}-{}", min as i64, max as i64)));
        } else {
            // The top scorer sits exactly on max_observed; extending the
            // bound by one keeps the half-open convention while the label
            // still reads as the observed maximum.
            let max = max_observed + 1.0;
            ranges.push((
                min,
                max,
                format!("{}-{}", min as i64, max_observed.floor() as i64),
            ));
        }
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_boundaries_are_upper_bound_exclusive() {
        let scores = vec![59.999, 60.0, 69.999, 70.0];
        let buckets = bucket_scores(&scores);

        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[0].range_label, "0-60");
        assert_eq!(buckets[0].count, 1); // 59.999
        assert_eq!(buckets[1].count, 2); // 60, 69.999
        assert_eq!(buckets[2].count, 1); // 70
        assert_eq!(buckets[3].count, 0);
        assert_eq!(buckets[4].count, 0);
    }

    #[test]
    fn only_the_sub_sixty_bucket_is_failing() {
        let buckets = bucket_scores(&[65.0, 85.0]);
        let failing: Vec<bool> = buckets.iter().map(|b| b.is_failing).collect();
        assert_eq!(failing, vec![true, false, false, false, false]);
    }

    #[test]
    fn early_grading_splits_the_observed_range() {
        let scores = vec![10.0, 20.0, 30.0, 40.0];
        let buckets = bucket_scores(&scores);

        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0].min, 0.0);
        assert_eq!(buckets[0].max, 10.0);
        assert_eq!(buckets[3].min, 30.0);
        assert_eq!(buckets[3].max, 41.0);
        assert_eq!(buckets[3].range_label, "30-40");

        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![0, 1, 1, 2]);
    }

    #[test]
    fn no_student_is_lost_or_double_counted() {
        let rosters: Vec<Vec<f64>> = vec![
            vec![],
            vec![0.0],
            vec![59.999, 60.0, 69.999, 70.0, 95.5, 102.0],
            vec![10.0, 20.0, 30.0, 40.0],
            vec![55.0, 55.0, 55.0],
        ];
        for scores in rosters {
            let buckets = bucket_scores(&scores);
            let total: usize = buckets.iter().map(|b| b.count).sum();
            assert_eq!(total, scores.len(), "roster {scores:?}");
        }
    }

    #[test]
    fn extra_credit_lands_in_the_top_bucket() {
        let buckets = bucket_scores(&[104.0, 88.0]);
        assert_eq!(buckets[4].count, 1);
        assert_eq!(buckets[3].count, 1);
    }

    #[test]
    fn empty_roster_defaults_to_a_small_scale() {
        let buckets = bucket_scores(&[]);
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0].max, 3.0);
        assert!(buckets.iter().all(|b| b.count == 0));
        assert!(buckets.iter().all(|b| b.percent_of_class == 0.0));
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let buckets = bucket_scores(&[30.0, 65.0, 75.0, 95.0]);
        let total: f64 = buckets.iter().map(|b| b.percent_of_class).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }
}
