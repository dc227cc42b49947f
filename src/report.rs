use std::fmt::Write;

use chrono::Utc;

use crate::models::{StatusCategory, StudentSummary};
use crate::risk;
use crate::summary::Analysis;

pub fn at_risk_students(students: &[StudentSummary]) -> Vec<&StudentSummary> {
    let mut at_risk: Vec<&StudentSummary> = students
        .iter()
        .filter(|s| {
            matches!(
                s.status,
                StatusCategory::Failed | StatusCategory::Critical | StatusCategory::Warning
            )
        })
        .collect();

    at_risk.sort_by(|a, b| {
        risk::severity_rank(a.status)
            .cmp(&risk::severity_rank(b.status))
            .then(
                a.accumulated_score
                    .partial_cmp(&b.accumulated_score)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });
    at_risk
}

pub fn build_report(analysis: &Analysis) -> String {
    let summary = analysis.summary();
    let class = &summary.class;

    let mut output = String::new();

    let _ = writeln!(output, "# Gradebook Report");
    let _ = writeln!(output, "Generated {}", Utc::now().date_naive());

    for header in analysis.description_headers() {
        let _ = writeln!(output, "> {header}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Class Overview");
    let _ = writeln!(output, "- Students: {}", class.student_count);
    let _ = writeln!(output, "- Evaluations: {}", class.evaluation_count);
    let _ = writeln!(output, "- Overall average: {:.2}", class.overall_average);
    let _ = writeln!(output, "- Standard deviation: {:.2}", class.overall_std_dev);
    let _ = writeln!(output, "- Points assigned so far: {:.1}", class.acumulated_points);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Status Mix");
    let mix = [
        ("Approved", class.approved_count),
        ("On Track", class.on_track_count),
        ("Warning", class.warning_count),
        ("Critical", class.critical_count),
        ("Failed", class.failed_count),
    ];
    for (label, count) in mix {
        let _ = writeln!(output, "- {label}: {count}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students At Risk");

    let at_risk = at_risk_students(&summary.students);
    if at_risk.is_empty() {
        let _ = writeln!(output, "No students below the class average.");
    } else {
        for student in at_risk.iter().take(10) {
            let _ = writeln!(
                output,
                "- {} ({}) score {:.2}, percentile {:.1}, {}",
                student.name,
                student.id,
                student.accumulated_score,
                student.percentile,
                student.status.label()
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Evaluations");

    if summary.evaluations.is_empty() {
        let _ = writeln!(output, "No evaluations recorded.");
    } else {
        for eval in summary.evaluations.iter() {
            let _ = writeln!(
                output,
                "- {}: average {:.2} (std {:.2}), range {:.1}-{:.1}, {} submitted, {} missing",
                eval.name,
                eval.average,
                eval.std_dev,
                eval.lowest_score,
                eval.highest_score,
                eval.evaluated_count,
                eval.missing_count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Score Distribution");

    for bucket in analysis.distribution() {
        let marker = if bucket.is_failing { " (failing)" } else { "" };
        let _ = writeln!(
            output,
            "- {}: {} students ({:.1}%){}",
            bucket.range_label, bucket.count, bucket.percent_of_class, marker
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GradeCell, GradeTable, StudentIdentity};

    fn sample_analysis() -> Analysis {
        let scores = [95.0, 82.0, 61.0, 45.0, 30.0];
        let table = GradeTable {
            students: scores
                .iter()
                .enumerate()
                .map(|(i, _)| StudentIdentity {
                    id: format!("2021-{i:04}"),
                    name: format!("Student {i}"),
                })
                .collect(),
            evaluations: vec!["Final".to_string()],
            grades: scores
                .iter()
                .map(|&s| vec![GradeCell::Numeric(s)])
                .collect(),
        };
        Analysis::new(table, vec!["ASIGNATURA: Calculo I".to_string()])
    }

    #[test]
    fn report_carries_every_section() {
        let report = build_report(&sample_analysis());

        assert!(report.contains("# Gradebook Report"));
        assert!(report.contains("## Class Overview"));
        assert!(report.contains("## Status Mix"));
        assert!(report.contains("## Students At Risk"));
        assert!(report.contains("## Evaluations"));
        assert!(report.contains("## Score Distribution"));
        assert!(report.contains("> ASIGNATURA: Calculo I"));
        assert!(report.contains("- Overall average: 62.60"));
    }

    #[test]
    fn at_risk_listing_leads_with_the_worst_scores() {
        let analysis = sample_analysis();
        let at_risk = at_risk_students(&analysis.summary().students);

        assert!(at_risk.len() >= 2);
        assert_eq!(at_risk[0].accumulated_score, 30.0);
        assert_eq!(at_risk[1].accumulated_score, 45.0);
    }

    #[test]
    fn empty_roster_report_renders() {
        let table = GradeTable {
            students: Vec::new(),
            evaluations: Vec::new(),
            grades: Vec::new(),
        };
        let report = build_report(&Analysis::new(table, Vec::new()));

        assert!(report.contains("No students below the class average."));
        assert!(report.contains("No evaluations recorded."));
    }
}
