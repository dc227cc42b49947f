use crate::models::StatusCategory;

/// Hard pass/fail cutoff on the 0-100 scale.
pub const PASSING_THRESHOLD: f64 = 60.0;

/// Classifies one student's accumulated score against the class distribution.
///
/// Ascending cutoffs, checked in order:
///   Failed    score below the passing threshold
///   Critical  passing, but more than one standard deviation below the mean
///   Warning   below the class average
///   OnTrack   at or above average, within one standard deviation
///   Approved  at least one standard deviation above average
///
/// Bands collapse to empty when a cutoff falls below an earlier one (a class
/// averaging near the passing threshold simply has no Critical band). Higher
/// scores never classify worse.
pub fn classify(accumulated_score: f64, class_average: f64, class_std_dev: f64) -> StatusCategory {
    if accumulated_score < PASSING_THRESHOLD {
        return StatusCategory::Failed;
    }
    if accumulated_score < class_average - class_std_dev {
        return StatusCategory::Critical;
    }
    if accumulated_score < class_average {
        return StatusCategory::Warning;
    }
    if accumulated_score < class_average + class_std_dev {
        return StatusCategory::OnTrack;
    }
    StatusCategory::Approved
}

/// Severity order for monotonicity checks and risk-first sorting: lower is
/// worse.
pub fn severity_rank(status: StatusCategory) -> u8 {
    match status {
        StatusCategory::Failed => 0,
        StatusCategory::Critical => 1,
        StatusCategory::Warning => 2,
        StatusCategory::OnTrack => 3,
        StatusCategory::Approved => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_scores_classify_failed_regardless_of_class_shape() {
        assert_eq!(classify(59.999, 62.6, 23.7), StatusCategory::Failed);
        assert_eq!(classify(0.0, 90.0, 2.0), StatusCategory::Failed);
        assert_eq!(classify(45.0, 40.0, 5.0), StatusCategory::Failed);
    }

    #[test]
    fn bands_follow_the_class_distribution() {
        // average 75, std dev 10: cutoffs at 60, 65, 75, 85
        assert_eq!(classify(62.0, 75.0, 10.0), StatusCategory::Critical);
        assert_eq!(classify(70.0, 75.0, 10.0), StatusCategory::Warning);
        assert_eq!(classify(80.0, 75.0, 10.0), StatusCategory::OnTrack);
        assert_eq!(classify(90.0, 75.0, 10.0), StatusCategory::Approved);
    }

    #[test]
    fn low_average_collapses_the_critical_band() {
        // average 58 puts avg - std below the passing threshold, so every
        // passing score lands in Warning or better.
        assert_eq!(classify(60.0, 58.0, 6.0), StatusCategory::OnTrack);
        assert_eq!(classify(65.0, 58.0, 6.0), StatusCategory::Approved);
    }

    #[test]
    fn classification_is_monotonic_in_score() {
        let cases = [(62.6, 23.7), (75.0, 10.0), (58.0, 6.0), (90.0, 0.0)];
        for (avg, std) in cases {
            let mut last = severity_rank(classify(0.0, avg, std));
            for step in 1..=200 {
                let score = step as f64 * 0.5;
                let rank = severity_rank(classify(score, avg, std));
                assert!(
                    rank >= last,
                    "score {score} ranked worse than a lower score (avg {avg}, std {std})"
                );
                last = rank;
            }
        }
    }

    #[test]
    fn reference_roster_counts() {
        let scores = [95.0, 82.0, 61.0, 45.0, 30.0];
        let avg = 62.6;
        let std = 23.669_9;

        let statuses: Vec<StatusCategory> =
            scores.iter().map(|&s| classify(s, avg, std)).collect();

        let failed = statuses
            .iter()
            .filter(|&&s| s == StatusCategory::Failed)
            .count();
        let approved_or_on_track = statuses
            .iter()
            .filter(|&&s| s == StatusCategory::Approved || s == StatusCategory::OnTrack)
            .count();

        assert_eq!(failed, 2);
        assert!(approved_or_on_track >= 2);
    }
}
