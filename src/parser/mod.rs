use crate::models::{GradeRecord, RawGradeRecord, RawScheduleItem, ScheduleItem, WireValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("payload is not a JSON array of the expected records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record {index}: field {field} is not a number: {value:?}")]
    NotANumber {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("record {index}: field {field} must be an integer, got {value}")]
    NotAnInteger {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("record {index}: Credits must be non-negative, got {value}")]
    NegativeCredits { index: usize, value: f64 },
}

/// Parse the grades endpoint body into typed records.
///
/// Records without a `University_ID` belong to `user_id`, the student whose
/// grades were requested.
pub fn parse_grade_records(json: &str, user_id: i64) -> Result<Vec<GradeRecord>, ParseError> {
    let raw: Vec<RawGradeRecord> = serde_json::from_str(json)?;
    convert_all(raw, user_id)
}

/// Same as [`parse_grade_records`] for an already decoded JSON document.
pub fn parse_grade_value(
    value: serde_json::Value,
    user_id: i64,
) -> Result<Vec<GradeRecord>, ParseError> {
    let raw: Vec<RawGradeRecord> = serde_json::from_value(value)?;
    convert_all(raw, user_id)
}

/// Parse the schedule endpoint body. Every field is optional; the backend
/// leaves out day, time and room for sections without a timetable.
pub fn parse_schedule_items(json: &str) -> Result<Vec<ScheduleItem>, ParseError> {
    let raw: Vec<RawScheduleItem> = serde_json::from_str(json)?;
    Ok(raw.into_iter().map(convert_schedule_item).collect())
}

pub fn parse_schedule_value(value: serde_json::Value) -> Result<Vec<ScheduleItem>, ParseError> {
    let raw: Vec<RawScheduleItem> = serde_json::from_value(value)?;
    Ok(raw.into_iter().map(convert_schedule_item).collect())
}

fn convert_schedule_item(raw: RawScheduleItem) -> ScheduleItem {
    ScheduleItem {
        section_id: to_identifier(raw.section_id),
        course_id: to_identifier(raw.course_id),
        course_name: non_empty(raw.course_name),
        day: non_empty(raw.day).map(|day| day.trim().to_string()),
        time: non_empty(raw.time),
        room: non_empty(raw.room),
        building: non_empty(raw.building),
        semester: non_empty(raw.semester),
    }
}

fn convert_all(raw: Vec<RawGradeRecord>, user_id: i64) -> Result<Vec<GradeRecord>, ParseError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| convert_record(index, record, user_id))
        .collect()
}

fn convert_record(
    index: usize,
    raw: RawGradeRecord,
    user_id: i64,
) -> Result<GradeRecord, ParseError> {
    let number = |field: &'static str, value: Option<WireValue>| to_number(index, field, value);
    let integer = |field: &'static str, value: Option<WireValue>| to_integer(index, field, value);

    let credits = number("Credits", raw.credits)?;
    if let Some(value) = credits {
        if value < 0.0 {
            return Err(ParseError::NegativeCredits { index, value });
        }
    }

    Ok(GradeRecord {
        university_id: integer("University_ID", raw.university_id)?.unwrap_or(user_id),
        assessment_id: integer("Assessment_ID", raw.assessment_id)?,
        section_id: to_identifier(raw.section_id),
        course_id: to_identifier(raw.course_id),
        course_name: non_empty(raw.course_name),
        semester: non_empty(raw.semester),
        credits,
        gpa: number("GPA", raw.gpa)?,
        quiz_grade: number("Quiz_Grade", raw.quiz_grade)?,
        assignment_grade: number("Assignment_Grade", raw.assignment_grade)?,
        midterm_grade: number("Midterm_Grade", raw.midterm_grade)?,
        final_grade: number("Final_Grade", raw.final_grade)?,
        status: non_empty(raw.status),
        registration_date: non_empty(raw.registration_date),
    })
}

fn to_number(
    index: usize,
    field: &'static str,
    value: Option<WireValue>,
) -> Result<Option<f64>, ParseError> {
    match value {
        None => Ok(None),
        Some(WireValue::Int(v)) => Ok(Some(v as f64)),
        Some(WireValue::Float(v)) => Ok(Some(v)),
        Some(WireValue::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(ParseError::NotANumber {
                    index,
                    field,
                    value: text,
                }),
            }
        }
    }
}

fn to_integer(
    index: usize,
    field: &'static str,
    value: Option<WireValue>,
) -> Result<Option<i64>, ParseError> {
    match to_number(index, field, value)? {
        None => Ok(None),
        Some(v) if v.fract() == 0.0 => Ok(Some(v as i64)),
        Some(v) => Err(ParseError::NotAnInteger {
            index,
            field,
            value: v,
        }),
    }
}

/// Identifiers are compared as text; numeric ids become their decimal form.
fn to_identifier(value: Option<WireValue>) -> Option<String> {
    match value? {
        WireValue::Int(v) => Some(v.to_string()),
        WireValue::Float(v) => Some(v.to_string()),
        WireValue::Text(text) => non_empty(Some(text)),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
