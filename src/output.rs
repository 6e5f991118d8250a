use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ErrorPayload;

/// Schema version for output payloads.
pub const RESUMEGEN_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum RunOutput {
    Generate(GenerateOutput),
    Pdf(PdfOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Html,
    Md,
    Txt,
    Xml,
    Json,
    Pdf,
}

impl ArtifactFormat {
    /// File extension of the artifact, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Html => "html",
            ArtifactFormat::Md => "md",
            ArtifactFormat::Txt => "txt",
            ArtifactFormat::Xml => "xml",
            ArtifactFormat::Json => "json",
            ArtifactFormat::Pdf => "pdf",
        }
    }
}

/// One file written by a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub format: ArtifactFormat,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutput {
    pub version: String,
    pub resume: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
    /// True when `--skip-pdf` left the PDF out.
    #[serde(default)]
    pub pdf_skipped: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfOutput {
    pub version: String,
    pub input: PathBuf,
    pub page_url: String,
    pub browser: String,
    pub artifact: Artifact,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}
