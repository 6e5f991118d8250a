use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Step of a DevTools command that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcStage {
    Serialize,
    Write,
    Read,
    Parse,
    Decode,
    Remote,
    Timeout,
}

impl RpcStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcStage::Serialize => "serialize",
            RpcStage::Write => "write",
            RpcStage::Read => "read",
            RpcStage::Parse => "parse",
            RpcStage::Decode => "decode",
            RpcStage::Remote => "remote",
            RpcStage::Timeout => "timeout",
        }
    }
}

impl fmt::Display for RpcStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("RPC error ({stage}): {message}")]
    Rpc { stage: RpcStage, message: String },

    #[error("Resume error: {0}")]
    Resume(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResumeError {
    pub fn discovery(message: impl Into<String>) -> Self {
        ResumeError::Discovery(message.into())
    }

    pub fn channel(message: impl Into<String>) -> Self {
        ResumeError::Channel(message.into())
    }

    pub fn rpc(stage: RpcStage, message: impl Into<String>) -> Self {
        ResumeError::Rpc {
            stage,
            message: message.into(),
        }
    }

    /// Wraps an IO failure with the action and path, keeping the original kind.
    pub fn io(action: &str, path: &Path, err: std::io::Error) -> Self {
        ResumeError::Io(std::io::Error::new(
            err.kind(),
            format!("{} ({}) failed: {}", action, path.display(), err),
        ))
    }

    /// Stage of an RPC failure, if this is one.
    pub fn rpc_stage(&self) -> Option<RpcStage> {
        match self {
            ResumeError::Rpc { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            ResumeError::Io(e) => ErrorPayload::new(
                ErrorCategory::Output,
                e.to_string(),
                "Check file paths/permissions; the output directory must be writable.",
            ),
            ResumeError::Discovery(msg) => ErrorPayload::new(
                ErrorCategory::Network,
                msg.to_string(),
                "Start Chrome/Chromium with --remote-debugging-port=9222 (or pass --browser) and make sure at least one tab is open.",
            ),
            ResumeError::Channel(msg) => ErrorPayload::new(
                ErrorCategory::Network,
                msg.to_string(),
                "The browser tab refused or dropped the DevTools websocket; check that no other client is attached and retry.",
            ),
            ResumeError::Rpc { stage, message } => {
                let remediation = match stage {
                    RpcStage::Timeout | RpcStage::Read => {
                        "Rendering took too long or the tab went away; raise browser.response_timeout or browser.settle_delay in the config."
                    }
                    RpcStage::Remote => {
                        "The browser rejected the command; check the print parameters (page ranges, paper size, margins)."
                    }
                    RpcStage::Decode => {
                        "The browser returned no usable PDF data; re-run with --verbose to inspect the protocol exchange."
                    }
                    _ => "Re-run with --verbose to inspect the protocol exchange; file an issue if persistent.",
                };
                ErrorPayload::new(
                    ErrorCategory::Protocol,
                    format!("{} failed: {}", stage, message),
                    remediation,
                )
            }
            ResumeError::Resume(msg) => ErrorPayload::new(
                ErrorCategory::Input,
                msg.to_string(),
                "Check that the resume file exists and is valid YAML (see example.yaml).",
            ),
            ResumeError::Template(msg) => ErrorPayload::new(
                ErrorCategory::Input,
                msg.to_string(),
                "Check --templates: a template <prefix>.<ext> must exist for html, md, txt and xml.",
            ),
            ResumeError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Output,
                e.to_string(),
                "Check the resume contents; run with --verbose for details.",
            ),
            ResumeError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("working directory") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Run from an existing directory or pass an absolute --input path.",
                    )
                } else if lower.contains("scale")
                    || lower.contains("paper")
                    || lower.contains("margin")
                {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use a positive scale and paper size (inches) and non-negative margins.",
                    )
                } else if lower.contains("toml") || lower.contains("config") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Fix the config file (TOML) or remove --config to use built-in defaults.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths (e.g., --resume, --templates, --output).",
                    )
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ResumeError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Input,
    Network,
    Protocol,
    Output,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
