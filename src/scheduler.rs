// Scheduler module: a small blocking client for the post-scheduling
// service. Field names on the wire are the service's camelCase, mapped
// through serde renames so response handling stays type-checked.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;

/// The one platform every post targets.
pub const PLATFORMS: [&str; 1] = ["facebook"];

/// The single status value the service reports for an accepted,
/// scheduled post. Every other status is treated as a hard failure for
/// that item; the service exposes no retryability signal to act on.
const SUCCESS_STATUS: &str = "scheduled";

#[derive(Serialize, Debug)]
struct SchedulePostRequest<'a> {
    post: &'a str,
    platforms: [&'a str; 1],
    #[serde(rename = "mediaUrls")]
    media_urls: [String; 1],
    #[serde(rename = "autoSchedule")]
    auto_schedule: AutoSchedule<'a>,
}

#[derive(Serialize, Debug)]
struct AutoSchedule<'a> {
    schedule: bool,
    title: &'a str,
}

/// Response shape of the scheduling endpoint. `id` and `scheduleDate`
/// only accompany a successful status; `message` only a rejection.
#[derive(Deserialize, Debug)]
struct ScheduleResponse {
    status: String,
    id: Option<String>,
    #[serde(rename = "scheduleDate")]
    schedule_date: Option<String>,
    message: Option<String>,
}

/// A confirmed acceptance from the scheduling service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: String,
    pub schedule_date: String,
}

/// Blocking client for the post-scheduling endpoint.
pub struct SchedulerClient {
    client: Client,
    base_url: String,
    api_key: String,
    media_base_url: String,
    cadence: String,
}

impl SchedulerClient {
    pub fn new(config: &SchedulerConfig) -> Result<SchedulerClient> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(SchedulerClient {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            media_base_url: config.media_base_url.trim_end_matches('/').to_string(),
            cadence: config.cadence.clone(),
        })
    }

    /// Public URL the scheduling service will fetch the image from.
    pub fn media_url(&self, image_file: &str) -> String {
        format!("{}/{}", self.media_base_url, image_file)
    }

    /// Submit one post with its image to the service's auto-schedule
    /// queue. Returns the submission only when the service confirms the
    /// post as scheduled; anything else is an error for this item.
    pub fn schedule(&self, post_text: &str, image_file: &str) -> Result<Submission> {
        let body = SchedulePostRequest {
            post: post_text,
            platforms: PLATFORMS,
            media_urls: [self.media_url(image_file)],
            auto_schedule: AutoSchedule {
                schedule: true,
                title: &self.cadence,
            },
        };

        let url = format!("{}/post", self.base_url);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .context("Failed to send schedule request")?;

        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Schedule request failed: {} - {}", status, txt);
        }

        let response: ScheduleResponse =
            res.json().context("Parsing schedule response json")?;
        if response.status != SUCCESS_STATUS {
            let detail = response
                .message
                .unwrap_or_else(|| format!("status {}", response.status));
            anyhow::bail!("Schedule rejected: {}", detail);
        }
        let id = response.id.context("Schedule response missing id")?;
        let schedule_date = response
            .schedule_date
            .context("Schedule response missing scheduleDate")?;
        Ok(Submission { id, schedule_date })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_wire_format() {
        let body = SchedulePostRequest {
            post: "Hello world",
            platforms: PLATFORMS,
            media_urls: ["https://cdn.example.com/posts/x.png".to_string()],
            auto_schedule: AutoSchedule {
                schedule: true,
                title: "every_other_day",
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "post": "Hello world",
                "platforms": ["facebook"],
                "mediaUrls": ["https://cdn.example.com/posts/x.png"],
                "autoSchedule": {"schedule": true, "title": "every_other_day"}
            })
        );
    }

    #[test]
    fn scheduled_response_deserializes() {
        let json = r#"{
            "status": "scheduled",
            "id": "abc123",
            "scheduleDate": "2024-06-03T09:00:00Z"
        }"#;
        let response: ScheduleResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, SUCCESS_STATUS);
        assert_eq!(response.id.as_deref(), Some("abc123"));
        assert_eq!(response.schedule_date.as_deref(), Some("2024-06-03T09:00:00Z"));
    }

    #[test]
    fn rejection_response_carries_message() {
        let json = r#"{"status": "error", "message": "rate limited"}"#;
        let response: ScheduleResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "error");
        assert_eq!(response.message.as_deref(), Some("rate limited"));
        assert!(response.id.is_none());
    }
}
