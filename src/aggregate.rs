//! Grade aggregation over a student's flat list of assessment records.
//!
//! Two empty-input conventions coexist here and both are relied on by the
//! views: GPA averages report [`Gpa::NotAvailable`] when no record carries a
//! GPA, while the assessment-type breakdown and the semester trend report `0`.

use crate::models::{
    AssessmentKind, BreakdownEntry, CourseGroup, CourseGroups, CourseRanking, Gpa, GradeRecord,
    GradeReport, SemesterGroups, SemesterTrendPoint,
};
use indexmap::IndexMap;

pub const UNKNOWN_SEMESTER: &str = "Unknown";
pub const UNKNOWN_COURSE_KEY: &str = "unknown";

const COURSE_NAME_DISPLAY_LEN: usize = 20;

/// Mean GPA across every record that has one.
pub fn compute_overall_gpa(records: &[GradeRecord]) -> Gpa {
    mean_gpa(records)
}

/// Bucket records by semester, then by course within the semester.
///
/// A course group takes its name, credits and section from the first record
/// seen for it; later records only append to `grades`.
pub fn group_by_semester_then_course(records: &[GradeRecord]) -> SemesterGroups {
    let mut semesters = SemesterGroups::new();

    for record in records {
        let semester = record
            .semester
            .clone()
            .unwrap_or_else(|| UNKNOWN_SEMESTER.to_string());
        let course_key = record
            .course_id
            .clone()
            .unwrap_or_else(|| UNKNOWN_COURSE_KEY.to_string());

        let group = semesters
            .entry(semester)
            .or_default()
            .entry(course_key)
            .or_insert_with(|| new_course_group(record));
        group.grades.push(record.clone());
    }

    semesters
}

fn new_course_group(first: &GradeRecord) -> CourseGroup {
    let course_name = first.course_name.clone().unwrap_or_else(|| {
        format!("Course {}", first.course_id.as_deref().unwrap_or("Unknown"))
    });

    CourseGroup {
        course_name,
        course_id: first.course_id.clone(),
        credits: first.credits.unwrap_or(0.0),
        section_id: first.section_id.clone(),
        semester: first.semester.clone(),
        grades: Vec::new(),
    }
}

pub fn course_gpa(group: &CourseGroup) -> Gpa {
    mean_gpa(&group.grades)
}

/// Mean GPA over every record of every course in one semester.
pub fn semester_gpa(courses: &CourseGroups) -> Gpa {
    mean_gpa(courses.values().flat_map(|group| &group.grades))
}

/// Semesters newest first, as the overview lists them.
pub fn semesters_for_display(semesters: &SemesterGroups) -> Vec<(&str, &CourseGroups)> {
    let mut ordered: Vec<(&str, &CourseGroups)> = semesters
        .iter()
        .map(|(label, courses)| (label.as_str(), courses))
        .collect();
    ordered.sort_by(|a, b| b.0.cmp(a.0));
    ordered
}

/// Average score per assessment type.
///
/// Types without samples average to zero and are dropped along with any
/// other non-positive average.
pub fn build_grade_breakdown(records: &[GradeRecord]) -> Vec<BreakdownEntry> {
    AssessmentKind::ALL
        .iter()
        .map(|&kind| {
            let (sum, sample_count) = records
                .iter()
                .filter_map(|record| record.score(kind))
                .fold((0.0, 0usize), |(sum, count), score| (sum + score, count + 1));

            BreakdownEntry {
                kind,
                label: kind.label(),
                average_score: sum / sample_count.max(1) as f64,
                sample_count,
            }
        })
        .filter(|entry| entry.average_score > 0.0)
        .collect()
}

/// Mean GPA per semester, oldest first.
///
/// Records without a semester are left out. A semester whose records carry
/// no GPA is still listed, with an average of zero.
pub fn build_semester_trend(records: &[GradeRecord]) -> Vec<SemesterTrendPoint> {
    let mut by_semester: IndexMap<&str, (f64, usize)> = IndexMap::new();

    for record in records {
        let Some(semester) = record.semester.as_deref() else {
            continue;
        };
        let entry = by_semester.entry(semester).or_insert((0.0, 0));
        if let Some(gpa) = record.gpa {
            entry.0 += gpa;
            entry.1 += 1;
        }
    }

    let mut trend: Vec<SemesterTrendPoint> = by_semester
        .into_iter()
        .map(|(semester, (sum, count))| SemesterTrendPoint {
            semester: semester.to_string(),
            average_gpa: if count > 0 {
                round2(sum / count as f64)
            } else {
                0.0
            },
            sample_count: count,
        })
        .collect();

    trend.sort_by(|a, b| a.semester.cmp(&b.semester));
    trend
}

/// Course groups ranked by GPA, best first. Groups without a positive GPA
/// are omitted.
pub fn build_course_gpa_ranking(records: &[GradeRecord]) -> Vec<CourseRanking> {
    let semesters = group_by_semester_then_course(records);

    let mut ranking: Vec<CourseRanking> = semesters
        .values()
        .flat_map(|courses| courses.values())
        .map(|group| CourseRanking {
            name: truncate_course_name(&group.course_name),
            full_name: group.course_name.clone(),
            gpa: round2(course_gpa(group).or_zero()),
        })
        .filter(|entry| entry.gpa > 0.0)
        .collect();

    ranking.sort_by(|a, b| b.gpa.total_cmp(&a.gpa));
    ranking
}

/// Shorten a course name to 20 characters plus an ellipsis.
pub fn truncate_course_name(name: &str) -> String {
    if name.chars().count() > COURSE_NAME_DISPLAY_LEN {
        let head: String = name.chars().take(COURSE_NAME_DISPLAY_LEN).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// Records of one course across all semesters.
pub fn course_records(records: &[GradeRecord], course_id: &str) -> Vec<GradeRecord> {
    records
        .iter()
        .filter(|record| record.course_id.as_deref() == Some(course_id))
        .cloned()
        .collect()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean_gpa<'a>(records: impl IntoIterator<Item = &'a GradeRecord>) -> Gpa {
    let (sum, count) = records
        .into_iter()
        .filter_map(|record| record.gpa)
        .fold((0.0, 0usize), |(sum, count), gpa| (sum + gpa, count + 1));

    if count == 0 {
        Gpa::NotAvailable
    } else {
        Gpa::Value(sum / count as f64)
    }
}

impl GradeReport {
    pub fn from_records(records: &[GradeRecord]) -> Self {
        let semesters = group_by_semester_then_course(records);
        let course_count = semesters.values().map(|courses| courses.len()).sum();
        let total_credits = semesters
            .values()
            .flat_map(|courses| courses.values())
            .map(|group| group.credits)
            .sum();

        Self {
            overall_gpa: compute_overall_gpa(records),
            total_assessments: records.len(),
            course_count,
            total_credits,
            semesters,
            breakdown: build_grade_breakdown(records),
            trend: build_semester_trend(records),
            ranking: build_course_gpa_ranking(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(semester: &str, course_id: &str, gpa: Option<f64>) -> GradeRecord {
        GradeRecord {
            semester: Some(semester.to_string()),
            course_id: Some(course_id.to_string()),
            gpa,
            ..GradeRecord::new(1)
        }
    }

    fn named(name: &str, course_id: &str, gpa: f64) -> GradeRecord {
        GradeRecord {
            course_name: Some(name.to_string()),
            ..record("2024-1", course_id, Some(gpa))
        }
    }

    fn scenario() -> Vec<GradeRecord> {
        vec![
            record("S1", "1", Some(8.0)),
            record("S1", "1", Some(6.0)),
            record("S2", "2", Some(10.0)),
        ]
    }

    #[test]
    fn test_overall_gpa_empty_is_not_available() {
        assert_eq!(compute_overall_gpa(&[]), Gpa::NotAvailable);
    }

    #[test]
    fn test_overall_gpa_all_null_is_not_available() {
        let records = vec![record("S1", "1", None), record("S2", "2", None)];
        assert_eq!(compute_overall_gpa(&records), Gpa::NotAvailable);
    }

    #[test]
    fn test_overall_gpa_skips_null_instead_of_counting_zero() {
        let records = vec![record("S1", "1", Some(9.0)), record("S1", "1", None)];
        assert_eq!(compute_overall_gpa(&records), Gpa::Value(9.0));
    }

    #[test]
    fn test_overall_gpa_is_order_independent() {
        let mut records = scenario();
        let forward = compute_overall_gpa(&records);
        records.reverse();
        assert_eq!(compute_overall_gpa(&records), forward);
        records.swap(0, 1);
        assert_eq!(compute_overall_gpa(&records), forward);
    }

    #[test]
    fn test_scenario() {
        let records = scenario();
        let overall = compute_overall_gpa(&records);
        assert_eq!(overall, Gpa::Value(8.0));
        assert_eq!(overall.to_string(), "8.00");

        let groups = group_by_semester_then_course(&records);
        assert_eq!(semester_gpa(&groups["S1"]).to_string(), "7.00");
        assert_eq!(semester_gpa(&groups["S2"]).to_string(), "10.00");

        let ranking = build_course_gpa_ranking(&records);
        let names: Vec<(&str, f64)> = ranking.iter().map(|r| (r.full_name.as_str(), r.gpa)).collect();
        assert_eq!(names, vec![("Course 2", 10.0), ("Course 1", 7.0)]);
    }

    #[test]
    fn test_grouping_keeps_every_record() {
        let records = vec![
            record("2024-1", "1", Some(8.0)),
            record("2024-2", "2", None),
            record("2024-1", "3", Some(5.0)),
            GradeRecord::new(1),
            record("2024-1", "1", Some(7.0)),
        ];
        let groups = group_by_semester_then_course(&records);
        let total: usize = groups
            .values()
            .flat_map(|courses| courses.values())
            .map(|group| group.grades.len())
            .sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn test_grouping_order_and_fallback_keys() {
        let records = vec![
            record("2024-2", "9", Some(8.0)),
            record("2024-1", "3", Some(5.0)),
            record("2024-2", "4", Some(6.0)),
            GradeRecord::new(1),
        ];
        let groups = group_by_semester_then_course(&records);

        let semesters: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(semesters, vec!["2024-2", "2024-1", UNKNOWN_SEMESTER]);

        let courses: Vec<&str> = groups["2024-2"].keys().map(String::as_str).collect();
        assert_eq!(courses, vec!["9", "4"]);

        let unknown = &groups[UNKNOWN_SEMESTER][UNKNOWN_COURSE_KEY];
        assert_eq!(unknown.course_name, "Course Unknown");
        assert_eq!(unknown.credits, 0.0);
        assert_eq!(unknown.semester, None);
    }

    #[test]
    fn test_course_metadata_comes_from_first_record() {
        let first = GradeRecord {
            course_name: Some("Calculus I".to_string()),
            credits: Some(4.0),
            section_id: Some("L01".to_string()),
            ..record("2024-1", "MT1003", Some(7.0))
        };
        let second = GradeRecord {
            course_name: Some("Calculus 1 (renamed)".to_string()),
            credits: Some(3.0),
            section_id: Some("L02".to_string()),
            ..record("2024-1", "MT1003", Some(9.0))
        };
        let groups = group_by_semester_then_course(&[first.clone(), second.clone()]);
        let group = &groups["2024-1"]["MT1003"];

        assert_eq!(group.course_name, "Calculus I");
        assert_eq!(group.credits, 4.0);
        assert_eq!(group.section_id.as_deref(), Some("L01"));
        assert_eq!(group.grades, vec![first, second]);
    }

    #[test]
    fn test_course_gpa_single_record() {
        let groups = group_by_semester_then_course(&[record("S1", "1", Some(8.5))]);
        assert_eq!(course_gpa(&groups["S1"]["1"]), Gpa::Value(8.5));
    }

    #[test]
    fn test_course_gpa_without_gpa_is_not_available() {
        let groups = group_by_semester_then_course(&[record("S1", "1", None)]);
        assert_eq!(course_gpa(&groups["S1"]["1"]), Gpa::NotAvailable);
        assert_eq!(semester_gpa(&groups["S1"]), Gpa::NotAvailable);
    }

    #[test]
    fn test_semesters_for_display_descending() {
        let records = vec![
            record("2023-2", "1", Some(8.0)),
            record("2024-1", "1", Some(8.0)),
            record("2023-1", "1", Some(8.0)),
        ];
        let groups = group_by_semester_then_course(&records);
        let labels: Vec<&str> = semesters_for_display(&groups).iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["2024-1", "2023-2", "2023-1"]);
    }

    #[test]
    fn test_breakdown_omits_type_without_samples() {
        let records = vec![
            GradeRecord {
                assignment_grade: Some(8.0),
                midterm_grade: Some(6.0),
                ..GradeRecord::new(1)
            },
            GradeRecord {
                assignment_grade: Some(9.0),
                final_grade: Some(7.0),
                ..GradeRecord::new(1)
            },
        ];
        let breakdown = build_grade_breakdown(&records);

        assert!(breakdown.iter().all(|entry| entry.kind != AssessmentKind::Quiz));
        let labels: Vec<&str> = breakdown.iter().map(|entry| entry.label).collect();
        assert_eq!(labels, vec!["Assignment", "Midterm", "Final"]);
        assert_eq!(breakdown[0].average_score, 8.5);
        assert_eq!(breakdown[0].sample_count, 2);
        assert_eq!(breakdown[1].sample_count, 1);
    }

    #[test]
    fn test_breakdown_empty_input() {
        assert!(build_grade_breakdown(&[]).is_empty());
    }

    #[test]
    fn test_breakdown_drops_all_zero_scores() {
        let records = vec![GradeRecord {
            quiz_grade: Some(0.0),
            final_grade: Some(5.0),
            ..GradeRecord::new(1)
        }];
        let breakdown = build_grade_breakdown(&records);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].kind, AssessmentKind::Final);
    }

    #[test]
    fn test_trend_sorted_ascending() {
        let records = vec![record("2024-2", "1", Some(9.0)), record("2023-1", "2", Some(7.0))];
        let trend = build_semester_trend(&records);
        let semesters: Vec<&str> = trend.iter().map(|p| p.semester.as_str()).collect();
        assert_eq!(semesters, vec!["2023-1", "2024-2"]);
    }

    #[test]
    fn test_trend_keeps_semester_without_gpa_as_zero() {
        let records = vec![
            record("2024-1", "1", None),
            record("2024-2", "1", Some(6.0)),
            record("2024-2", "2", Some(7.0)),
            record("2024-2", "3", None),
        ];
        let trend = build_semester_trend(&records);

        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].semester, "2024-1");
        assert_eq!(trend[0].average_gpa, 0.0);
        assert_eq!(trend[0].sample_count, 0);
        assert_eq!(trend[1].average_gpa, 6.5);
        assert_eq!(trend[1].sample_count, 2);
    }

    #[test]
    fn test_trend_skips_records_without_semester() {
        let records = vec![GradeRecord {
            gpa: Some(8.0),
            ..GradeRecord::new(1)
        }];
        assert!(build_semester_trend(&records).is_empty());
    }

    #[test]
    fn test_trend_rounds_to_two_decimals() {
        let records = vec![
            record("S", "1", Some(7.0)),
            record("S", "1", Some(8.0)),
            record("S", "1", Some(8.0)),
        ];
        assert_eq!(build_semester_trend(&records)[0].average_gpa, 7.67);
    }

    #[test]
    fn test_ranking_descending() {
        let ranking = build_course_gpa_ranking(&[named("A", "1", 7.0), named("B", "2", 9.0)]);
        let names: Vec<&str> = ranking.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(ranking[0].gpa, 9.0);
        assert_eq!(ranking[1].gpa, 7.0);
    }

    #[test]
    fn test_ranking_drops_courses_without_positive_gpa() {
        let records = vec![
            named("A", "1", 0.0),
            record("2024-1", "2", None),
            named("C", "3", 6.0),
        ];
        let ranking = build_course_gpa_ranking(&records);
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].full_name, "C");
    }

    #[test]
    fn test_ranking_truncates_long_names() {
        let ranking =
            build_course_gpa_ranking(&[named("Introduction to Computer Science", "1", 8.0)]);
        assert_eq!(ranking[0].name, "Introduction to Comp...");
        assert_eq!(ranking[0].full_name, "Introduction to Computer Science");
    }

    #[test]
    fn test_truncate_course_name() {
        assert_eq!(
            truncate_course_name("Introduction to Computer Science"),
            "Introduction to Comp..."
        );
        assert_eq!(truncate_course_name("Exactly twenty chars"), "Exactly twenty chars");
        assert_eq!(truncate_course_name("Giải tích 1"), "Giải tích 1");
    }

    #[test]
    fn test_course_records() {
        let records = scenario();
        let course = course_records(&records, "1");
        assert_eq!(course.len(), 2);
        assert!(course_records(&records, "99").is_empty());
    }

    #[test]
    fn test_report_from_records() {
        let mut records = scenario();
        records[0].credits = Some(3.0);
        records[1].credits = Some(4.0);
        records[2].credits = Some(2.0);

        let report = GradeReport::from_records(&records);
        assert_eq!(report.overall_gpa, Gpa::Value(8.0));
        assert_eq!(report.total_assessments, 3);
        assert_eq!(report.course_count, 2);
        assert_eq!(report.total_credits, 5.0);
        assert_eq!(report.trend.len(), 2);
        assert_eq!(report.ranking.len(), 2);
    }

    #[test]
    fn test_report_from_no_records() {
        let report = GradeReport::from_records(&[]);
        assert_eq!(report.overall_gpa, Gpa::NotAvailable);
        assert_eq!(report.course_count, 0);
        assert!(report.semesters.is_empty());
        assert!(report.breakdown.is_empty());
        assert!(report.trend.is_empty());
        assert!(report.ranking.is_empty());
    }
}
