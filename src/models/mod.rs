use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Backend Wire Models
// ============================================================================

/// A scalar as the grades endpoint sends it. Depending on the backend build the
/// same field arrives as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGradeRecord {
    #[serde(rename = "University_ID", default)]
    pub university_id: Option<WireValue>,
    #[serde(rename = "Assessment_ID", default)]
    pub assessment_id: Option<WireValue>,
    #[serde(rename = "Section_ID", default)]
    pub section_id: Option<WireValue>,
    #[serde(rename = "Course_ID", default)]
    pub course_id: Option<WireValue>,
    #[serde(rename = "Course_Name", default)]
    pub course_name: Option<String>,
    #[serde(rename = "Semester", default)]
    pub semester: Option<String>,
    #[serde(rename = "Credits", default)]
    pub credits: Option<WireValue>,
    #[serde(rename = "GPA", default)]
    pub gpa: Option<WireValue>,
    #[serde(rename = "Quiz_Grade", default)]
    pub quiz_grade: Option<WireValue>,
    #[serde(rename = "Assignment_Grade", default)]
    pub assignment_grade: Option<WireValue>,
    #[serde(rename = "Midterm_Grade", default)]
    pub midterm_grade: Option<WireValue>,
    #[serde(rename = "Final_Grade", default)]
    pub final_grade: Option<WireValue>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "Registration_Date", default)]
    pub registration_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScheduleItem {
    #[serde(rename = "Section_ID", default)]
    pub section_id: Option<WireValue>,
    #[serde(rename = "Course_ID", default)]
    pub course_id: Option<WireValue>,
    #[serde(rename = "Course_Name", default)]
    pub course_name: Option<String>,
    #[serde(rename = "Day", default)]
    pub day: Option<String>,
    #[serde(rename = "Time", default)]
    pub time: Option<String>,
    #[serde(rename = "Room", default)]
    pub room: Option<String>,
    #[serde(rename = "Building", default)]
    pub building: Option<String>,
    #[serde(rename = "Semester", default)]
    pub semester: Option<String>,
}

// ============================================================================
// Typed Grade Records
// ============================================================================

/// One assessment of one student in one course section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRecord {
    pub university_id: i64,
    pub assessment_id: Option<i64>,
    pub section_id: Option<String>,
    pub course_id: Option<String>,
    pub course_name: Option<String>,
    pub semester: Option<String>,
    pub credits: Option<f64>,
    pub gpa: Option<f64>,
    pub quiz_grade: Option<f64>,
    pub assignment_grade: Option<f64>,
    pub midterm_grade: Option<f64>,
    pub final_grade: Option<f64>,
    pub status: Option<String>,
    pub registration_date: Option<String>,
}

impl GradeRecord {
    /// Empty record for `university_id`; handy as a base for struct update syntax.
    #[cfg(test)]
    pub fn new(university_id: i64) -> Self {
        Self {
            university_id,
            assessment_id: None,
            section_id: None,
            course_id: None,
            course_name: None,
            semester: None,
            credits: None,
            gpa: None,
            quiz_grade: None,
            assignment_grade: None,
            midterm_grade: None,
            final_grade: None,
            status: None,
            registration_date: None,
        }
    }

    pub fn score(&self, kind: AssessmentKind) -> Option<f64> {
        match kind {
            AssessmentKind::Quiz => self.quiz_grade,
            AssessmentKind::Assignment => self.assignment_grade,
            AssessmentKind::Midterm => self.midterm_grade,
            AssessmentKind::Final => self.final_grade,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssessmentKind {
    Quiz,
    Assignment,
    Midterm,
    Final,
}

impl AssessmentKind {
    pub const ALL: [AssessmentKind; 4] = [
        AssessmentKind::Quiz,
        AssessmentKind::Assignment,
        AssessmentKind::Midterm,
        AssessmentKind::Final,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AssessmentKind::Quiz => "Quiz",
            AssessmentKind::Assignment => "Assignment",
            AssessmentKind::Midterm => "Midterm",
            AssessmentKind::Final => "Final",
        }
    }
}

// ============================================================================
// Schedule Models
// ============================================================================

/// One weekly class meeting of a section the student is enrolled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleItem {
    pub section_id: Option<String>,
    pub course_id: Option<String>,
    pub course_name: Option<String>,
    /// English weekday name, e.g. `"Monday"`.
    pub day: Option<String>,
    pub time: Option<String>,
    pub room: Option<String>,
    pub building: Option<String>,
    pub semester: Option<String>,
}

// ============================================================================
// Aggregation Output Models
// ============================================================================

/// A GPA average that may have no samples behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gpa {
    Value(f64),
    NotAvailable,
}

impl Gpa {
    pub fn value(self) -> Option<f64> {
        match self {
            Gpa::Value(v) => Some(v),
            Gpa::NotAvailable => None,
        }
    }

    /// Views that cannot show "N/A" (charts, rankings) read it as zero.
    pub fn or_zero(self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

impl fmt::Display for Gpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gpa::Value(v) => write!(f, "{:.2}", v),
            Gpa::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for Gpa {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Gpa::Value(v) => serializer.serialize_f64(*v),
            Gpa::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

/// All assessment records of one course within one semester.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseGroup {
    pub course_name: String,
    pub course_id: Option<String>,
    pub credits: f64,
    pub section_id: Option<String>,
    pub semester: Option<String>,
    pub grades: Vec<GradeRecord>,
}

/// Course groups of one semester keyed by course key, in first-seen order.
pub type CourseGroups = IndexMap<String, CourseGroup>;

/// Semester label to its course groups, in discovery order.
pub type SemesterGroups = IndexMap<String, CourseGroups>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub kind: AssessmentKind,
    pub label: &'static str,
    pub average_score: f64,
    pub sample_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterTrendPoint {
    pub semester: String,
    pub average_gpa: f64,
    pub sample_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRanking {
    /// Name shortened for chart axes.
    pub name: String,
    pub full_name: String,
    pub gpa: f64,
}

/// Everything the grade overview displays, computed from one fetch.
#[derive(Debug, Clone, Serialize)]
pub struct GradeReport {
    pub overall_gpa: Gpa,
    pub total_assessments: usize,
    pub course_count: usize,
    pub total_credits: f64,
    pub semesters: SemesterGroups,
    pub breakdown: Vec<BreakdownEntry>,
    pub trend: Vec<SemesterTrendPoint>,
    pub ranking: Vec<CourseRanking>,
}
