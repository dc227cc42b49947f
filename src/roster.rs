use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::models::{GradeCell, GradeTable, StudentIdentity};

/// Header cell that marks the student-id column. Spreadsheet exports carry
/// banner lines above the real header row, so the row holding this marker is
/// the one that names the columns.
const ID_MARKER: &str = "CARNET";

const ABSENT_MARKERS: [&str; 4] = ["NP", "AUS", "AUSENTE", "ABS"];
const WITHDRAWN_MARKERS: [&str; 4] = ["RET", "RETIRADO", "W", "WD"];

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster file is empty")]
    EmptyInput,
    #[error("no header row with a CARNET column was found")]
    MissingHeader,
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// A parsed roster file: the immutable grade table plus the free-text banner
/// lines that preceded the header row, passed through verbatim.
#[derive(Debug, Clone)]
pub struct Roster {
    pub table: GradeTable,
    pub description_headers: Vec<String>,
}

pub fn load_roster(path: &Path) -> Result<Roster, RosterError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    let roster = build_roster(rows)?;
    debug!(
        "loaded roster: {} students, {} evaluations, {} description headers",
        roster.table.student_count(),
        roster.table.evaluation_count(),
        roster.description_headers.len()
    );
    Ok(roster)
}

pub fn build_roster(rows: Vec<Vec<String>>) -> Result<Roster, RosterError> {
    if rows.is_empty() {
        return Err(RosterError::EmptyInput);
    }

    let (header_idx, id_col) = rows
        .iter()
        .enumerate()
        .find_map(|(i, row)| {
            row.iter()
                .position(|cell| cell.trim().eq_ignore_ascii_case(ID_MARKER))
                .map(|col| (i, col))
        })
        .ok_or(RosterError::MissingHeader)?;

    let description_headers: Vec<String> = rows[..header_idx]
        .iter()
        .filter_map(|row| {
            let line = row
                .iter()
                .map(|cell| cell.trim())
                .filter(|cell| !cell.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if line.is_empty() {
                None
            } else {
                Some(line)
            }
        })
        .collect();

    let name_col = id_col + 1;
    let header = &rows[header_idx];

    // Every non-empty header past the name column is an evaluation.
    let eval_cols: Vec<usize> = (name_col + 1..header.len())
        .filter(|&col| !header[col].trim().is_empty())
        .collect();
    let evaluations: Vec<String> = eval_cols
        .iter()
        .map(|&col| header[col].trim().to_string())
        .collect();

    let mut students = Vec::new();
    let mut grades = Vec::new();

    for row in rows[header_idx + 1..].iter() {
        let id = row.get(id_col).map(|c| c.trim()).unwrap_or("");
        if id.is_empty() {
            // The data block ends at the first blank id; anything after is
            // footer noise in the export.
            break;
        }

        let name = row.get(name_col).map(|c| c.trim()).unwrap_or("").to_string();
        students.push(StudentIdentity {
            id: id.to_string(),
            name,
        });

        // Short rows pad with Absent so the grid stays rectangular.
        let cells: Vec<GradeCell> = eval_cols
            .iter()
            .map(|&col| row.get(col).map(|c| parse_cell(c)).unwrap_or(GradeCell::Absent))
            .collect();
        grades.push(cells);
    }

    Ok(Roster {
        table: GradeTable {
            students,
            evaluations,
            grades,
        },
        description_headers,
    })
}

pub fn parse_cell(raw: &str) -> GradeCell {
    let text = raw.trim();
    if text.is_empty() {
        return GradeCell::Absent;
    }

    if let Ok(value) = text.parse::<f64>() {
        return GradeCell::Numeric(value);
    }

    if let Some((obtained, possible)) = text.split_once('/') {
        if let (Ok(obtained), Ok(possible)) =
            (obtained.trim().parse::<f64>(), possible.trim().parse::<f64>())
        {
            return GradeCell::Fraction { obtained, possible };
        }
    }

    let upper = text.to_uppercase();
    if ABSENT_MARKERS.contains(&upper.as_str()) {
        return GradeCell::Absent;
    }
    if WITHDRAWN_MARKERS.contains(&upper.as_str()) {
        return GradeCell::Withdrawn;
    }

    GradeCell::Label(text.to_string())
}
