//! Locates a debuggable tab through the DevTools HTTP endpoint.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::{ResumeError, Result};

/// Discovery path listing the targets of a browser instance.
pub const TARGET_LIST_PATH: &str = "/json/list";

/// Key holding the websocket address of a target.
pub const DEBUGGER_URL_KEY: &str = "webSocketDebuggerUrl";

/// A debuggable target as reported by `/json/list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDescriptor {
    /// Websocket address used to open the message channel.
    pub debugger_url: String,
    pub id: Option<String>,
    pub target_type: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl ChannelDescriptor {
    fn from_entry(entry: &Map<String, Value>) -> Result<Self> {
        let text = |key: &str| entry.get(key).and_then(Value::as_str).map(str::to_string);
        let debugger_url = text(DEBUGGER_URL_KEY).ok_or_else(|| {
            ResumeError::discovery("Remote browser does not allow web socket connection to tab")
        })?;
        Ok(Self {
            debugger_url,
            id: text("id"),
            target_type: text("type"),
            title: text("title"),
            url: text("url"),
        })
    }
}

/// Builds `<endpoint>/json/list`, tolerating a trailing slash on the endpoint.
pub fn target_list_url(endpoint: &str) -> Result<Url> {
    let base = endpoint.trim().trim_end_matches('/');
    Url::parse(&format!("{base}{TARGET_LIST_PATH}")).map_err(|e| {
        ResumeError::discovery(format!("Invalid remote browser address ({endpoint}): {e}"))
    })
}

/// Parses a `/json/list` body and returns its first target.
pub fn parse_target_list(body: &str) -> Result<ChannelDescriptor> {
    let targets: Vec<Map<String, Value>> = serde_json::from_str(body).map_err(|e| {
        ResumeError::discovery(format!(
            "Unmarshal response from remote browser failed: {e}"
        ))
    })?;
    let first = targets
        .first()
        .ok_or_else(|| ResumeError::discovery("Remote browser has no tabs to connect to"))?;
    ChannelDescriptor::from_entry(first)
}

/// HTTP client for the discovery endpoint.
#[derive(Debug, Clone)]
pub struct TargetLocator {
    http: Client,
}

impl TargetLocator {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            ResumeError::discovery(format!("Build HTTP client for remote browser failed: {e}"))
        })?;
        Ok(Self { http })
    }

    /// Fetches the target list once and returns the first target. No retry.
    pub async fn locate(&self, endpoint: &str) -> Result<ChannelDescriptor> {
        let url = target_list_url(endpoint)?;
        debug!(%url, "querying remote browser for tabs");

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            ResumeError::discovery(format!("Connect to remote browser ({url}) failed: {e}"))
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResumeError::discovery(format!(
                "Remote browser answered {url} with status {}",
                status.as_u16()
            )));
        }
        let body = response.text().await.map_err(|e| {
            ResumeError::discovery(format!("Read list of tabs from remote browser failed: {e}"))
        })?;

        let descriptor = parse_target_list(&body)?;
        debug!(
            target_type = descriptor.target_type.as_deref().unwrap_or("unknown"),
            target_url = descriptor.url.as_deref().unwrap_or(""),
            debugger_url = %descriptor.debugger_url,
            "selected first listed tab"
        );
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_list_url_appends_discovery_path() {
        let url = target_list_url("http://127.0.0.1:9222").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9222/json/list");

        let url = target_list_url("http://127.0.0.1:9222/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9222/json/list");
    }

    #[test]
    fn target_list_url_rejects_garbage() {
        let err = target_list_url("not a url").unwrap_err();
        assert!(matches!(err, ResumeError::Discovery(_)));
    }

    #[test]
    fn parse_target_list_returns_first_entry() {
        let body = r#"[
            {"id": "A", "type": "page", "title": "first", "url": "about:blank",
             "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/page/A"},
            {"id": "B", "type": "page",
             "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/page/B"}
        ]"#;
        let descriptor = parse_target_list(body).unwrap();
        assert_eq!(descriptor.debugger_url, "ws://127.0.0.1:9222/devtools/page/A");
        assert_eq!(descriptor.id.as_deref(), Some("A"));
        assert_eq!(descriptor.target_type.as_deref(), Some("page"));
        assert_eq!(descriptor.title.as_deref(), Some("first"));
    }

    #[test]
    fn parse_target_list_does_not_filter_by_type() {
        let body = r#"[
            {"type": "service_worker", "webSocketDebuggerUrl": "ws://h/devtools/sw"},
            {"type": "page", "webSocketDebuggerUrl": "ws://h/devtools/page"}
        ]"#;
        let descriptor = parse_target_list(body).unwrap();
        assert_eq!(descriptor.debugger_url, "ws://h/devtools/sw");
    }

    #[test]
    fn parse_target_list_ignores_non_string_fields() {
        let body = r#"[{"webSocketDebuggerUrl": "ws://h/devtools/page/1", "attached": true}]"#;
        assert!(parse_target_list(body).is_ok());
    }

    #[test]
    fn parse_target_list_rejects_empty_list() {
        let err = parse_target_list("[]").unwrap_err();
        assert!(matches!(err, ResumeError::Discovery(ref m) if m.contains("no tabs")));
    }

    #[test]
    fn parse_target_list_rejects_entry_without_debugger_url() {
        let err = parse_target_list(r#"[{"id": "A", "type": "page"}]"#).unwrap_err();
        assert!(matches!(err, ResumeError::Discovery(ref m) if m.contains("web socket")));
    }

    #[test]
    fn parse_target_list_rejects_malformed_body() {
        let err = parse_target_list("<html>nope</html>").unwrap_err();
        assert!(matches!(err, ResumeError::Discovery(ref m) if m.contains("Unmarshal")));

        let err = parse_target_list(r#"{"webSocketDebuggerUrl": "ws://h"}"#).unwrap_err();
        assert!(matches!(err, ResumeError::Discovery(_)));
    }

    #[tokio::test]
    async fn locate_reports_unreachable_endpoint() {
        let locator = TargetLocator::new(Some(Duration::from_secs(2))).unwrap();
        let err = locator.locate("http://127.0.0.1:1").await.unwrap_err();
        assert!(matches!(err, ResumeError::Discovery(ref m) if m.contains("Connect to remote browser")));
    }
}
