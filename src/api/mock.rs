use crate::aggregate;
use crate::models::{GradeRecord, ScheduleItem};
use crate::parser;
use anyhow::{Context, Result};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// In-process stand-in for the grades endpoint, with artificial latency.
#[derive(Debug, Clone)]
pub struct MockBackend {
    list_delay: Duration,
    course_delay: Duration,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            list_delay: Duration::from_millis(500),
            course_delay: Duration::from_millis(300),
        }
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_grades(&self, user_id: i64) -> Result<Vec<GradeRecord>> {
        tokio::time::sleep(self.list_delay).await;
        debug!(user_id, "serving mock grades");
        parser::parse_grade_value(mock_grades(user_id), user_id)
            .context("Mock grade dataset is malformed")
    }

    pub async fn get_course_grades(&self, user_id: i64, course_id: &str) -> Result<Vec<GradeRecord>> {
        tokio::time::sleep(self.course_delay).await;
        let records = self.get_grades(user_id).await?;
        Ok(aggregate::course_records(&records, course_id))
    }

    pub async fn get_schedule(&self, user_id: i64) -> Result<Vec<ScheduleItem>> {
        tokio::time::sleep(self.list_delay).await;
        debug!(user_id, "serving mock schedule");
        parser::parse_schedule_value(mock_schedule()).context("Mock schedule dataset is malformed")
    }
}

fn mock_schedule() -> serde_json::Value {
    json!([
        {
            "Section_ID": "L03", "Course_ID": "CO2003",
            "Course_Name": "Data Structures and Algorithms",
            "Day": "Monday", "Time": "07:00-09:00", "Room": "301", "Building": "H6",
            "Semester": "2024-1"
        },
        {
            "Section_ID": "L03", "Course_ID": "CO2003",
            "Course_Name": "Data Structures and Algorithms",
            "Day": "Wednesday", "Time": "13:00-15:00", "Room": "LAB-2", "Building": "H6",
            "Semester": "2024-1"
        },
        {
            "Section_ID": "L01", "Course_ID": "CO3001", "Course_Name": "Software Engineering",
            "Day": "Thursday", "Time": "09:00-11:00", "Room": "204", "Building": "B4",
            "Semester": "2024-2"
        },
        {
            "Section_ID": "L02", "Course_ID": "SP1031", "Course_Name": "Physical Education",
            "Day": "Sunday", "Time": "06:30-08:30", "Room": "Field", "Building": "Stadium",
            "Semester": "2024-2"
        }
    ])
}

fn mock_grades(user_id: i64) -> serde_json::Value {
    json!([
        {
            "University_ID": user_id, "Assessment_ID": 1, "Section_ID": "L01",
            "Course_ID": "CO1005", "Course_Name": "Introduction to Computing",
            "Semester": "2023-1", "Credits": 3,
            "Quiz_Grade": 8.0, "Assignment_Grade": 8.5, "Midterm_Grade": 7.0, "Final_Grade": 8.0,
            "GPA": 7.9, "Status": "Approved", "Registration_Date": "2023-08-28"
        },
        {
            "University_ID": user_id, "Assessment_ID": 2, "Section_ID": "L02",
            "Course_ID": "MT1003", "Course_Name": "Calculus 1",
            "Semester": "2023-1", "Credits": 4,
            "Quiz_Grade": 6.5, "Assignment_Grade": null, "Midterm_Grade": 6.0, "Final_Grade": 7.5,
            "GPA": 6.9, "Status": "Approved", "Registration_Date": "2023-08-28"
        },
        {
            "University_ID": user_id, "Assessment_ID": 3, "Section_ID": "L01",
            "Course_ID": "CO1027", "Course_Name": "Programming Fundamentals",
            "Semester": "2023-2", "Credits": 3,
            "Quiz_Grade": 9.0, "Assignment_Grade": 9.5, "Midterm_Grade": 8.5, "Final_Grade": 9.0,
            "GPA": 9.0, "Status": "Approved", "Registration_Date": "2024-01-15"
        },
        {
            "University_ID": user_id, "Assessment_ID": 4, "Section_ID": "L03",
            "Course_ID": "CO2003", "Course_Name": "Data Structures and Algorithms",
            "Semester": "2024-1", "Credits": 4,
            "Quiz_Grade": 7.5, "Assignment_Grade": 8.0, "Midterm_Grade": 6.5, "Final_Grade": 7.0,
            "GPA": 7.2, "Status": "Approved", "Registration_Date": "2024-08-26"
        },
        {
            "University_ID": user_id, "Assessment_ID": 5, "Section_ID": "L03",
            "Course_ID": "CO2003", "Course_Name": "Data Structures and Algorithms",
            "Semester": "2024-1", "Credits": 4,
            "Quiz_Grade": 8.5, "Assignment_Grade": 9.0, "Midterm_Grade": null, "Final_Grade": null,
            "GPA": 8.6, "Status": "Approved", "Registration_Date": "2024-08-26"
        },
        {
            "University_ID": user_id, "Assessment_ID": 6, "Section_ID": "L01",
            "Course_ID": "CO3001", "Course_Name": "Software Engineering",
            "Semester": "2024-2", "Credits": 3,
            "Quiz_Grade": 8.0, "Assignment_Grade": null, "Midterm_Grade": null, "Final_Grade": null,
            "GPA": null, "Status": "Pending", "Registration_Date": "2025-01-13"
        }
    ])
}
