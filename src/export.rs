use crate::aggregate::course_gpa;
use crate::models::GradeReport;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

/// Export one row per course group to a timestamped CSV file in `dir`.
pub fn export_to_csv(report: &GradeReport, user_id: i64, dir: &Path) -> Result<PathBuf> {
    if report.course_count == 0 {
        anyhow::bail!("No grades to export");
    }

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let filepath = dir.join(format!("grades_{}_{}.csv", user_id, timestamp));

    let mut wtr = csv::Writer::from_path(&filepath).context("Failed to create CSV file")?;

    wtr.write_record([
        "semester",
        "course_id",
        "course_name",
        "section_id",
        "credits",
        "assessments",
        "course_gpa",
    ])
    .context("Failed to write CSV headers")?;

    for (semester, courses) in &report.semesters {
        for (course_key, group) in courses {
            let record = vec![
                semester.clone(),
                course_key.clone(),
                group.course_name.clone(),
                group.section_id.clone().unwrap_or_default(),
                group.credits.to_string(),
                group.grades.len().to_string(),
                course_gpa(group).to_string(),
            ];
            wtr.write_record(&record).context("Failed to write CSV record")?;
        }
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    info!(path = %filepath.display(), courses = report.course_count, "exported grades");

    Ok(filepath)
}
