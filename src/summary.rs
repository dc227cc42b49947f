use crate::buckets;
use crate::density;
use crate::models::{
    ClassSummary, DensityCurve, DistributionBucket, EvaluationSummary, GradeCell, GradeTable,
    GradebookSummary, StatusCategory, StudentSummary,
};
use crate::risk;
use crate::stats;

/// One immutable analysis pass over a loaded roster. Everything the
/// presentation side needs is computed here, once, from the same peer set, so
/// percentiles, statuses, and class counts can never drift apart.
pub struct Analysis {
    table: GradeTable,
    description_headers: Vec<String>,
    summary: GradebookSummary,
    distribution: Vec<DistributionBucket>,
    accumulated_scores: Vec<f64>,
}

impl Analysis {
    pub fn new(table: GradeTable, description_headers: Vec<String>) -> Self {
        let accumulated_scores: Vec<f64> = table
            .grades
            .iter()
            .map(|row| row.iter().map(|cell| cell.score_contribution()).sum())
            .collect();

        let class_stats = stats::describe(&accumulated_scores);

        let students = build_student_summaries(&table, &accumulated_scores, &class_stats);
        let evaluations = build_evaluation_summaries(&table);
        let class = build_class_summary(&table, &class_stats, &students, &evaluations);

        let distribution = buckets::bucket_scores(&accumulated_scores);

        Analysis {
            table,
            description_headers,
            summary: GradebookSummary {
                class,
                students,
                evaluations,
            },
            distribution,
            accumulated_scores,
        }
    }

    pub fn summary(&self) -> &GradebookSummary {
        &self.summary
    }

    /// Raw roster passthrough for detail views that need a specific
    /// student x evaluation cell.
    pub fn table(&self) -> &GradeTable {
        &self.table
    }

    pub fn description_headers(&self) -> &[String] {
        &self.description_headers
    }

    pub fn distribution(&self) -> &[DistributionBucket] {
        &self.distribution
    }

    /// Density of accumulated scores across the class.
    pub fn class_density(&self) -> DensityCurve {
        density::estimate(&self.accumulated_scores)
    }

    /// Density of one evaluation column, over its included scores only.
    pub fn evaluation_density(&self, eval_idx: usize) -> Option<DensityCurve> {
        if eval_idx >= self.table.evaluation_count() {
            return None;
        }
        let (values, _) = stats::project_cells(
            self.table
                .grades
                .iter()
                .filter_map(|row| row.get(eval_idx)),
        );
        Some(density::estimate(&values))
    }
}

fn build_student_summaries(
    table: &GradeTable,
    accumulated_scores: &[f64],
    class_stats: &stats::ScoreStats,
) -> Vec<StudentSummary> {
    table
        .students
        .iter()
        .enumerate()
        .map(|(i, identity)| {
            let accumulated_score = accumulated_scores[i];
            let (own_scores, _) = stats::project_cells(&table.grades[i]);

            StudentSummary {
                id: identity.id.clone(),
                name: identity.name.clone(),
                accumulated_score,
                percentile: stats::percentile_rank(accumulated_score, accumulated_scores),
                std_dev: stats::describe(&own_scores).std_dev,
                status: risk::classify(accumulated_score, class_stats.mean, class_stats.std_dev),
            }
        })
        .collect()
}

fn build_evaluation_summaries(table: &GradeTable) -> Vec<EvaluationSummary> {
    table
        .evaluations
        .iter()
        .enumerate()
        .map(|(eval_idx, name)| {
            let column: Vec<&GradeCell> = table
                .grades
                .iter()
                .filter_map(|row| row.get(eval_idx))
                .collect();

            let (values, missing_count) = stats::project_cells(column.iter().copied());
            let column_stats = stats::describe(&values);

            let max_possible_score = column
                .iter()
                .filter_map(|cell| match cell {
                    GradeCell::Fraction { possible, .. } if *possible > 0.0 => Some(*possible),
                    _ => None,
                })
                .fold(None, |acc: Option<f64>, p| {
                    Some(acc.map_or(p, |a| a.max(p)))
                });

            EvaluationSummary {
                id: eval_idx.to_string(),
                name: name.clone(),
                average: column_stats.mean,
                std_dev: column_stats.std_dev,
                highest_score: column_stats.max,
                lowest_score: column_stats.min,
                max_possible_score,
                evaluated_count: column_stats.count,
                missing_count,
            }
        })
        .collect()
}

fn build_class_summary(
    table: &GradeTable,
    class_stats: &stats::ScoreStats,
    students: &[StudentSummary],
    evaluations: &[EvaluationSummary],
) -> ClassSummary {
    let mut approved_count = 0;
    let mut on_track_count = 0;
    let mut warning_count = 0;
    let mut critical_count = 0;
    let mut failed_count = 0;

    for student in students {
        match student.status {
            StatusCategory::Approved => approved_count += 1,
            StatusCategory::OnTrack => on_track_count += 1,
            StatusCategory::Warning => warning_count += 1,
            StatusCategory::Critical => critical_count += 1,
            StatusCategory::Failed => failed_count += 1,
        }
    }

    // Points the course has assigned so far: declared maximum where the
    // roster carries one, otherwise the best score actually observed.
    let acumulated_points = evaluations
        .iter()
        .map(|e| e.max_possible_score.unwrap_or(e.highest_score))
        .sum();

    ClassSummary {
        student_count: table.student_count(),
        overall_average: class_stats.mean,
        overall_std_dev: class_stats.std_dev,
        evaluation_count: table.evaluation_count(),
        acumulated_points,
        approved_count,
        on_track_count,
        warning_count,
        critical_count,
        failed_count,
    }
}
