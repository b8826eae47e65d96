use std::fmt::Write;

use chrono::NaiveDate;

use crate::aggregate::{course_gpa, semester_gpa, semesters_for_display};
use crate::models::{GradeReport, ScheduleItem};
use crate::schedule::{expand_schedule, weekly_timetable};

pub fn build_report(user_id: i64, report: &GradeReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Grade Report");
    let _ = writeln!(output, "Student {}", user_id);
    let _ = writeln!(output);
    let _ = writeln!(output, "- Overall GPA: {}", report.overall_gpa);
    let _ = writeln!(output, "- Courses: {}", report.course_count);
    let _ = writeln!(output, "- Total credits: {}", report.total_credits);
    let _ = writeln!(output, "- Assessments: {}", report.total_assessments);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Semesters");

    if report.semesters.is_empty() {
        let _ = writeln!(output, "No grades available.");
    }

    for (semester, courses) in semesters_for_display(&report.semesters) {
        let _ = writeln!(output);
        let _ = writeln!(output, "### {} (GPA {})", semester, semester_gpa(courses));
        let _ = writeln!(output);
        let _ = writeln!(output, "| Course | Name | Credits | Assessments | GPA |");
        let _ = writeln!(output, "|---|---|---|---|---|");
        for (course_key, group) in courses {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                course_key,
                group.course_name,
                group.credits,
                group.grades.len(),
                course_gpa(group)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Assessment Breakdown");

    if report.breakdown.is_empty() {
        let _ = writeln!(output, "No component scores recorded.");
    } else {
        for entry in &report.breakdown {
            let _ = writeln!(
                output,
                "- {}: {:.2} across {} scores",
                entry.label, entry.average_score, entry.sample_count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Semester Trend");

    if report.trend.is_empty() {
        let _ = writeln!(output, "No semesters recorded.");
    } else {
        for point in &report.trend {
            let _ = writeln!(
                output,
                "- {}: {:.2} ({} graded)",
                point.semester, point.average_gpa, point.sample_count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Course Ranking");

    if report.ranking.is_empty() {
        let _ = writeln!(output, "No graded courses.");
    } else {
        for (rank, entry) in report.ranking.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {} ({:.2})",
                rank + 1,
                entry.name,
                entry.gpa
            );
        }
    }

    output
}

pub fn build_schedule_report(
    user_id: i64,
    items: &[ScheduleItem],
    today: NaiveDate,
    weeks: u32,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Class Schedule");
    let _ = writeln!(output, "Student {}", user_id);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Timetable");

    if items.is_empty() {
        let _ = writeln!(output, "No enrolled sections.");
    } else {
        for item in weekly_timetable(items) {
            let _ = writeln!(
                output,
                "- {}: {} ({}) {} in {} {}",
                item.day.as_deref().unwrap_or("Unscheduled"),
                item.course_name.as_deref().unwrap_or("Unknown course"),
                item.course_id.as_deref().unwrap_or("-"),
                item.time.as_deref().unwrap_or("time TBA"),
                item.building.as_deref().unwrap_or("-"),
                item.room.as_deref().unwrap_or("-"),
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Upcoming Class Days");

    let days = expand_schedule(items, today, weeks);
    if days.is_empty() {
        let _ = writeln!(output, "No classes in this window.");
    }
    for day in days {
        let _ = writeln!(output, "### {}", day.date.format("%a %Y-%m-%d"));
        for item in day.classes {
            let _ = writeln!(
                output,
                "- {} {}",
                item.time.as_deref().unwrap_or("time TBA"),
                item.course_name.as_deref().unwrap_or("Unknown course"),
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GradeRecord;

    fn record(semester: &str, course_id: &str, name: &str, gpa: Option<f64>) -> GradeRecord {
        GradeRecord {
            semester: Some(semester.to_string()),
            course_id: Some(course_id.to_string()),
            course_name: Some(name.to_string()),
            credits: Some(3.0),
            gpa,
            quiz_grade: Some(8.0),
            ..GradeRecord::new(7)
        }
    }

    #[test]
    fn test_report_lists_semesters_newest_first() {
        let records = vec![
            record("2023-1", "CO1005", "Introduction to Computing", Some(8.0)),
            record("2024-1", "CO2003", "Data Structures and Algorithms", Some(9.0)),
        ];
        let report = build_report(7, &GradeReport::from_records(&records));

        let newer = report.find("### 2024-1 (GPA 9.00)").unwrap();
        let older = report.find("### 2023-1 (GPA 8.00)").unwrap();
        assert!(newer < older);
        assert!(report.contains("- Overall GPA: 8.50"));
        assert!(report.contains("- Quiz: 8.00 across 2 scores"));
        assert!(report.contains("1. Data Structures and ... (9.00)"));
    }

    #[test]
    fn test_report_shows_not_available() {
        let records = vec![record("2024-2", "CO3001", "Software Engineering", None)];
        let report = build_report(7, &GradeReport::from_records(&records));

        assert!(report.contains("- Overall GPA: N/A"));
        assert!(report.contains("### 2024-2 (GPA N/A)"));
        assert!(report.contains("| CO3001 | Software Engineering | 3 | 1 | N/A |"));
        assert!(report.contains("- 2024-2: 0.00 (0 graded)"));
        assert!(report.contains("No graded courses."));
    }

    fn meeting(course: &str, day: Option<&str>) -> ScheduleItem {
        ScheduleItem {
            section_id: Some("L01".to_string()),
            course_id: Some(course.to_string()),
            course_name: Some(format!("Course {}", course)),
            day: day.map(str::to_string),
            time: Some("07:00-09:00".to_string()),
            room: Some("301".to_string()),
            building: Some("H6".to_string()),
            semester: Some("2024-1".to_string()),
        }
    }

    #[test]
    fn test_schedule_report() {
        let items = vec![
            meeting("CO3001", None),
            meeting("CO2003", Some("Wednesday")),
            meeting("SP1031", Some("Sunday")),
        ];
        let monday = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let report = build_schedule_report(7, &items, monday, 2);

        let wednesday = report.find("- Wednesday: Course CO2003 (CO2003)").unwrap();
        let sunday = report.find("- Sunday: Course SP1031").unwrap();
        let unscheduled = report.find("- Unscheduled: Course CO3001").unwrap();
        assert!(wednesday < sunday && sunday < unscheduled);

        assert!(report.contains("### Wed 2024-09-04"));
        assert!(report.contains("### Wed 2024-09-11"));
        assert!(!report.contains("### Sun"));
    }

    #[test]
    fn test_empty_schedule_report() {
        let today = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let report = build_schedule_report(7, &[], today, 6);
        assert!(report.contains("No enrolled sections."));
        assert!(report.contains("No classes in this window."));
    }

    #[test]
    fn test_empty_report() {
        let report = build_report(7, &GradeReport::from_records(&[]));
        assert!(report.contains("No grades available."));
        assert!(report.contains("No component scores recorded."));
    }
}
