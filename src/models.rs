use serde::{Deserialize, Serialize};

/// One raw score entry as it appeared in the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value")]
pub enum GradeCell {
    Numeric(f64),
    Fraction { obtained: f64, possible: f64 },
    Absent,
    Withdrawn,
    Label(String),
}

impl GradeCell {
    /// Numeric projection used by all aggregation. Non-numeric markers and
    /// fractions with a non-positive denominator are excluded (None), which
    /// keeps them out of averages while participation counts still see them.
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            GradeCell::Numeric(value) => Some(*value),
            GradeCell::Fraction { obtained, possible } if *possible > 0.0 => Some(*obtained),
            _ => None,
        }
    }

    /// Contribution to a student's accumulated score: projected value, or 0
    /// for anything the projection excludes.
    pub fn score_contribution(&self) -> f64 {
        self.numeric_value().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentIdentity {
    pub id: String,
    pub name: String,
}

/// The parsed roster: students by row, evaluations by column. Built once per
/// loaded file and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeTable {
    pub students: Vec<StudentIdentity>,
    pub evaluations: Vec<String>,
    pub grades: Vec<Vec<GradeCell>>,
}

impl GradeTable {
    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    pub fn evaluation_count(&self) -> usize {
        self.evaluations.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCategory {
    Approved,
    OnTrack,
    Warning,
    Critical,
    Failed,
}

impl StatusCategory {
    pub fn label(&self) -> &'static str {
        match self {
            StatusCategory::Approved => "Approved",
            StatusCategory::OnTrack => "On Track",
            StatusCategory::Warning => "Warning",
            StatusCategory::Critical => "Critical",
            StatusCategory::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub accumulated_score: f64,
    pub percentile: f64,
    pub std_dev: f64,
    pub status: StatusCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub id: String,
    pub name: String,
    pub average: f64,
    pub std_dev: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub max_possible_score: Option<f64>,
    pub evaluated_count: usize,
    pub missing_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSummary {
    pub student_count: usize,
    pub overall_average: f64,
    pub overall_std_dev: f64,
    pub evaluation_count: usize,
    pub acumulated_points: f64,
    pub approved_count: usize,
    pub on_track_count: usize,
    pub warning_count: usize,
    pub critical_count: usize,
    pub failed_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradebookSummary {
    pub class: ClassSummary,
    pub students: Vec<StudentSummary>,
    pub evaluations: Vec<EvaluationSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub range_label: String,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub is_failing: bool,
    pub percent_of_class: f64,
}

/// Piecewise-linear density approximation produced by the kernel density
/// estimator. Empty when there were no samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensityCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl DensityCurve {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_projection_follows_cell_tag() {
        assert_eq!(GradeCell::Numeric(87.5).numeric_value(), Some(87.5));
        assert_eq!(
            GradeCell::Fraction {
                obtained: 14.0,
                possible: 20.0
            }
            .numeric_value(),
            Some(14.0)
        );
        assert_eq!(GradeCell::Absent.numeric_value(), None);
        assert_eq!(GradeCell::Withdrawn.numeric_value(), None);
        assert_eq!(GradeCell::Label("EXEMPT".to_string()).numeric_value(), None);
    }

    #[test]
    fn invalid_fraction_is_excluded() {
        let cell = GradeCell::Fraction {
            obtained: 5.0,
            possible: 0.0,
        };
        assert_eq!(cell.numeric_value(), None);
        assert_eq!(cell.score_contribution(), 0.0);
    }

    #[test]
    fn markers_contribute_zero_but_stay_distinguishable() {
        assert_eq!(GradeCell::Absent.score_contribution(), 0.0);
        assert_eq!(GradeCell::Numeric(0.0).score_contribution(), 0.0);
        assert!(GradeCell::Numeric(0.0).numeric_value().is_some());
        assert!(GradeCell::Absent.numeric_value().is_none());
    }
}
