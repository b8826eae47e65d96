mod lms;
mod mock;

pub use lms::LmsClient;
pub use mock::MockBackend;

use crate::models::{GradeRecord, ScheduleItem};
use anyhow::Result;

/// Where grade records come from: the real backend or the in-process mock.
#[derive(Clone)]
pub enum GradeSource {
    Remote(LmsClient),
    Mock(MockBackend),
}

impl GradeSource {
    pub async fn get_grades(&self, user_id: i64) -> Result<Vec<GradeRecord>> {
        match self {
            GradeSource::Remote(client) => client.get_grades(user_id).await,
            GradeSource::Mock(backend) => backend.get_grades(user_id).await,
        }
    }

    pub async fn get_course_grades(&self, user_id: i64, course_id: &str) -> Result<Vec<GradeRecord>> {
        match self {
            GradeSource::Remote(client) => client.get_course_grades(user_id, course_id).await,
            GradeSource::Mock(backend) => backend.get_course_grades(user_id, course_id).await,
        }
    }

    pub async fn get_schedule(&self, user_id: i64) -> Result<Vec<ScheduleItem>> {
        match self {
            GradeSource::Remote(client) => client.get_schedule(user_id).await,
            GradeSource::Mock(backend) => backend.get_schedule(user_id).await,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            GradeSource::Remote(client) => client.base_url().to_string(),
            GradeSource::Mock(_) => "mock data".to_string(),
        }
    }
}
