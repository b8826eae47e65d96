use crate::aggregate::semesters_for_display;
use crate::models::{CourseGroup, Gpa, GradeRecord, GradeReport};

#[derive(Debug, Clone)]
pub enum AppState {
    Loading {
        message: String,
    },
    Overview {
        report: GradeReport,
        selected_index: usize,
        status: Option<String>,
    },
    CourseDetail {
        report: GradeReport,
        selected_index: usize,
        detail: CourseDetail,
    },
    Error {
        message: String,
    },
}

/// One course's assessments across every semester it was taken.
#[derive(Debug, Clone)]
pub struct CourseDetail {
    pub course_key: String,
    pub course_name: String,
    pub gpa: Gpa,
    pub grades: Vec<GradeRecord>,
}

/// A course row in the overview list.
#[derive(Debug, Clone, Copy)]
pub struct CourseEntry<'a> {
    pub semester: &'a str,
    pub course_key: &'a str,
    pub group: &'a CourseGroup,
}

/// Courses in the order the overview lists them: semesters newest first,
/// courses first-seen within each semester.
pub fn course_entries(report: &GradeReport) -> Vec<CourseEntry<'_>> {
    semesters_for_display(&report.semesters)
        .into_iter()
        .flat_map(|(semester, courses)| {
            courses.iter().map(move |(course_key, group)| CourseEntry {
                semester,
                course_key: course_key.as_str(),
                group,
            })
        })
        .collect()
}
