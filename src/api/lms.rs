use crate::aggregate;
use crate::models::{GradeRecord, ScheduleItem};
use crate::parser;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use tracing::{debug, info};

/// Client for the LMS backend REST API.
#[derive(Clone)]
pub struct LmsClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl LmsClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("LMS_API_TOKEN contains characters not allowed in a header")?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("lms-grade-report"));
        Ok(headers)
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .headers(self.build_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        let response_text = response.text().await.context("Failed to get response text")?;

        if !status.is_success() {
            anyhow::bail!(
                "API request failed with status {} for URL {}\nResponse body: {}",
                status,
                url,
                response_text.chars().take(500).collect::<String>()
            );
        }

        Ok(response_text)
    }

    /// All grade records of a student, across every section they took.
    pub async fn get_grades(&self, user_id: i64) -> Result<Vec<GradeRecord>> {
        let path = format!("/grades/user/{}", user_id);
        let body = self.get_text(&path).await?;

        let records = parser::parse_grade_records(&body, user_id).with_context(|| {
            format!(
                "Failed to parse grades for user {}. Response body (first 500 chars): {}",
                user_id,
                body.chars().take(500).collect::<String>()
            )
        })?;

        info!(user_id, count = records.len(), "fetched grade records");
        Ok(records)
    }

    pub async fn get_course_grades(&self, user_id: i64, course_id: &str) -> Result<Vec<GradeRecord>> {
        let records = self.get_grades(user_id).await?;
        Ok(aggregate::course_records(&records, course_id))
    }

    /// Weekly class meetings of every section the student is enrolled in.
    pub async fn get_schedule(&self, user_id: i64) -> Result<Vec<ScheduleItem>> {
        let path = format!("/schedule/user/{}", user_id);
        let body = self.get_text(&path).await?;

        let items = parser::parse_schedule_items(&body).with_context(|| {
            format!(
                "Failed to parse schedule for user {}. Response body (first 500 chars): {}",
                user_id,
                body.chars().take(500).collect::<String>()
            )
        })?;

        info!(user_id, count = items.len(), "fetched schedule");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = LmsClient::new("http://localhost:5000/api/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }

    #[test]
    fn test_headers_include_bearer_token() {
        let client = LmsClient::new("http://localhost", Some("abc".to_string())).unwrap();
        let headers = client.build_headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[test]
    fn test_headers_without_token() {
        let client = LmsClient::new("http://localhost", None).unwrap();
        let headers = client.build_headers().unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_rejects_token_with_newline() {
        let client = LmsClient::new("http://localhost", Some("abc\ndef".to_string())).unwrap();
        assert!(client.build_headers().is_err());
    }
}
