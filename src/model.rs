//! Data models for the link shortener
//!
//! Defines the persisted `Link` record plus the request/response shapes used
//! at the JSON API boundary. API payloads use camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A short link record as stored in the database.
///
/// The `code` maps to exactly one record and never changes after creation;
/// only `total_clicks` and `last_clicked_at` are mutated afterwards, and only
/// by the resolution path.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Opaque unique identifier assigned at creation.
    pub id: String,

    /// Short alphanumeric code (6-8 characters), unique across all links.
    pub code: String,

    /// The original long URL this code redirects to.
    pub target_url: String,

    /// Number of times this short link has been resolved.
    #[serde(default)]
    pub total_clicks: u64,

    /// Time of the most recent resolution, `null` until the first one.
    #[serde(default)]
    pub last_clicked_at: Option<DateTime<Utc>>,

    /// Timestamp when this record was created.
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Builds a fresh record with a random id, zero clicks and no last-click
    /// time.
    pub fn new(code: &str, target_url: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code: code.to_string(),
            target_url: target_url.to_string(),
            total_clicks: 0,
            last_clicked_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Request payload for creating a new short link.
///
/// ```json
/// {
///   "longUrl": "https://example.com/very/long/url",
///   "code": "mycode1"  // Optional
/// }
/// ```
///
/// `long_url` is optional at the serde level so a missing field surfaces as a
/// 400 validation error instead of a deserialization rejection.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// The URL to shorten. Must be absolute with an http or https scheme.
    pub long_url: Option<String>,

    /// Optional custom code. When absent or blank, a random code is
    /// generated.
    pub code: Option<String>,
}

/// A link as returned by the API, annotated with its derived short URL.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    #[serde(flatten)]
    pub link: Link,

    /// Full short URL composed from the configured base URL and the code.
    pub short_url: String,
}

impl LinkResponse {
    pub fn new(link: Link, base_url: &str) -> Self {
        let short_url = format!("{}/{}", base_url.trim_end_matches('/'), link.code);
        Self { link, short_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_link_starts_unclicked() {
        let link = Link::new("abc123", "https://example.com");
        assert_eq!(link.code, "abc123");
        assert_eq!(link.target_url, "https://example.com");
        assert_eq!(link.total_clicks, 0);
        assert!(link.last_clicked_at.is_none());
        assert!(!link.id.is_empty());
    }

    #[test]
    fn test_new_links_get_distinct_ids() {
        let a = Link::new("abc123", "https://example.com");
        let b = Link::new("def456", "https://example.com");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_link_serializes_camel_case() {
        let link = Link::new("abc123", "https://example.com");
        let value = serde_json::to_value(&link).unwrap();
        assert!(value.get("targetUrl").is_some());
        assert!(value.get("totalClicks").is_some());
        assert!(value.get("lastClickedAt").is_some());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_link_response_composes_short_url() {
        let link = Link::new("abc123", "https://example.com");
        let response = LinkResponse::new(link, "http://localhost:8080/");
        assert_eq!(response.short_url, "http://localhost:8080/abc123");
    }
}
