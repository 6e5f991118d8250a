//! Resume Generator Library
//!
//! Renders a YAML resume through text templates (HTML, Markdown, plain text,
//! XML), dumps it as JSON, and prints the HTML rendering to PDF through a
//! browser exposing the DevTools protocol.
//!
//! # Module Overview
//!
//! - [`resume`] - Resume data model and YAML loader
//! - [`render`] - Template rendering and JSON dump
//! - [`pdf`] - DevTools discovery, websocket channel, RPC and PDF export
//! - [`config`] - Configuration file support
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use resumegen_lib::{load_resume, save_as_json, TemplateRenderer};
//! use std::path::Path;
//!
//! # fn example() -> resumegen_lib::Result<()> {
//! let resume = load_resume(Path::new("example.yaml"))?;
//! let renderer = TemplateRenderer::new();
//! renderer.save_as(
//!     &resume,
//!     Path::new("templates/tmpl.html"),
//!     Path::new("output/example.html"),
//! )?;
//! save_as_json(&resume, Path::new("output/example.json"))?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod pdf;
pub mod render;
pub mod resume;

pub use config::Config;
pub use error::{ErrorCategory, ErrorPayload, ResumeError, Result, RpcStage};
pub use output::{
    Artifact, ArtifactFormat, ErrorOutput, GenerateOutput, PdfOutput, RunOutput,
    RESUMEGEN_OUTPUT_VERSION,
};
// PDF module re-exports
pub use pdf::{
    export_pdf, print_page, resolve_file_url, ChannelOptions, MessageChannel, PdfExportOptions,
    PdfExportReport, PdfExporter, PrintParameters, RpcClient, RpcOptions, TargetLocator,
    WaitStrategy, WebSocketChannel,
};
pub use render::{
    ensure_output_dir, save_as_json, to_json_pretty, with_extension, TemplateRenderer,
    TEMPLATE_FORMATS,
};
pub use resume::{load_resume, Contact, Entry, Link, Resume, Section};
