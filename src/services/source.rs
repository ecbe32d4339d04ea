// src/services/source.rs

//! Task source client.
//!
//! Fetches the first page of the remote task listing for one category and
//! classifies the response. An authorization rejection (401, or the 302
//! login redirect) is reported as `FetchOutcome::AuthInvalid`; every other
//! failure is a transport error and surfaces as `Err`, to be treated as
//! "no data this cycle" by the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, redirect};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{CredentialBundle, SourceConfig, TaskRecord};

/// Result of one category fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// First page of the listing
    Page { tasks: Vec<TaskRecord>, total: u64 },
    /// The source rejected the credential bundle
    AuthInvalid,
}

/// Source of task listings, one fetch per category.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Fetch the first page for a category under the given credentials.
    async fn fetch(&self, category: u32, creds: &CredentialBundle) -> Result<FetchOutcome>;
}

/// Wire shape of the listing response body.
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    result: String,
    #[serde(default)]
    rows: Vec<TaskRecord>,
    #[serde(default)]
    records: u64,
}

/// HTTP implementation against the partner task endpoint.
pub struct HttpTaskSource {
    config: SourceConfig,
    client: Client,
}

impl HttpTaskSource {
    /// Build a client for the configured endpoint.
    ///
    /// Redirects are disabled so the login redirect is observable as a 302.
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl TaskSource for HttpTaskSource {
    async fn fetch(&self, category: u32, creds: &CredentialBundle) -> Result<FetchOutcome> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("pageIndex", "1".to_string()),
                ("pageSize", self.config.page_size.to_string()),
                ("findMyTask", "0".to_string()),
                ("channelType", "1".to_string()),
                ("isPrecisePush", "1".to_string()),
                ("taskType", category.to_string()),
            ])
            .header("uuid", &creds.uuid)
            .header("token", &creds.token)
            .header("noncestr", &creds.noncestr)
            .header("sign", &creds.sign)
            .header("appCode", "nissan")
            .header("clientid", "nissanapp")
            .header("Origin", "https://www.dongfeng-nissan.com.cn")
            .header("Accept", "application/json, text/plain, */*")
            .header("Accept-Language", "zh-CN,zh-Hans;q=0.9")
            .header("Connection", "keep-alive")
            .send()
            .await?;

        let status = response.status();
        if is_auth_failure(status) {
            return Ok(FetchOutcome::AuthInvalid);
        }
        if !status.is_success() {
            return Err(AppError::source(
                category,
                format!("unexpected status {status}"),
            ));
        }

        let body = response.text().await?;
        let (tasks, total) = parse_list_body(&body)?;
        Ok(FetchOutcome::Page { tasks, total })
    }
}

/// Whether a response status means the credential bundle was rejected.
fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FOUND
}

/// Parse a listing body into (tasks, total count).
///
/// A body with `result != "1"` is a valid-but-empty listing, not an error.
fn parse_list_body(body: &str) -> Result<(Vec<TaskRecord>, u64)> {
    let response: ListResponse = serde_json::from_str(body)?;
    if response.result != "1" {
        return Ok((Vec::new(), 0));
    }
    Ok((response.rows, response.records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_statuses() {
        assert!(is_auth_failure(StatusCode::UNAUTHORIZED));
        assert!(is_auth_failure(StatusCode::FOUND));
        assert!(!is_auth_failure(StatusCode::OK));
        assert!(!is_auth_failure(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_auth_failure(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn parse_successful_body() {
        let body = r#"{
            "result": "1",
            "records": 2,
            "rows": [
                {"taskId": "A", "taskName": "First", "taskSurplusNum": 5, "taskSurplusDay": 10},
                {"taskId": "B", "taskName": "Second", "taskSurplusNum": 1, "taskSurplusDay": 2}
            ]
        }"#;

        let (tasks, total) = parse_list_body(body).unwrap();
        assert_eq!(total, 2);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "A");
    }

    #[test]
    fn parse_unsuccessful_result_is_empty_page() {
        let body = r#"{"result": "0", "message": "busy"}"#;
        let (tasks, total) = parse_list_body(body).unwrap();
        assert!(tasks.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn parse_malformed_body_is_transport_error() {
        assert!(parse_list_body("<html>gateway</html>").is_err());
        assert!(parse_list_body("").is_err());
    }

    #[test]
    fn build_client_from_default_config() {
        let source = HttpTaskSource::new(SourceConfig::default());
        assert!(source.is_ok());
    }
}
