//! Navigate-then-print orchestration.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use serde_json::json;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use super::channel::{ChannelOptions, MessageChannel, WebSocketChannel};
use super::discovery::TargetLocator;
use super::params::PrintParameters;
use super::rpc::{RpcClient, RpcOptions, WaitStrategy};
use crate::{ResumeError, Result, RpcStage};

pub const NAVIGATE_METHOD: &str = "Page.navigate";
pub const PRINT_TO_PDF_METHOD: &str = "Page.printToPDF";

/// Knobs for one PDF export.
#[derive(Debug, Clone, Default)]
pub struct PdfExportOptions {
    pub rpc: RpcOptions,
    pub channel: ChannelOptions,
    /// Bound on the discovery request; `None` uses the HTTP client's default.
    pub discovery_timeout: Option<Duration>,
}

/// Outcome of a successful export.
#[derive(Debug, Clone)]
pub struct PdfExportReport {
    /// Address the browser was told to open.
    pub page_url: Url,
    /// Websocket address of the tab that rendered the page.
    pub debugger_url: String,
    pub output_path: PathBuf,
    pub bytes_written: usize,
    pub elapsed: Duration,
}

/// Prints local HTML files to PDF through a remote browser.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    options: PdfExportOptions,
    locator: TargetLocator,
}

impl PdfExporter {
    pub fn new(options: PdfExportOptions) -> Result<Self> {
        let locator = TargetLocator::new(options.discovery_timeout)?;
        Ok(Self { options, locator })
    }

    pub fn options(&self) -> &PdfExportOptions {
        &self.options
    }

    /// Renders `input_html` in the browser behind `endpoint` and writes the
    /// PDF to `output_pdf`.
    ///
    /// The browser reads the HTML itself, so the input is handed over as a
    /// `file://` URL resolved against the current working directory. Any
    /// failure aborts the export; the output file is only written once the
    /// whole document has been received.
    pub async fn export(
        &self,
        endpoint: &str,
        input_html: &Path,
        output_pdf: &Path,
        params: &PrintParameters,
    ) -> Result<PdfExportReport> {
        let start = Instant::now();
        params.validate().map_err(ResumeError::Config)?;

        let working_dir = std::env::current_dir().map_err(|e| {
            ResumeError::Config(format!("Get path of working directory failed: {e}"))
        })?;
        let page_url = resolve_file_url(&working_dir, input_html)?;

        let descriptor = self.locator.locate(endpoint).await?;
        let channel =
            WebSocketChannel::connect(&descriptor.debugger_url, &self.options.channel).await?;
        let debugger_url = descriptor.debugger_url;

        let pdf = print_page(channel, &page_url, params, &self.options.rpc).await?;

        write_replacing(output_pdf, &pdf).await?;
        info!(
            path = %output_pdf.display(),
            bytes = pdf.len(),
            "wrote pdf"
        );

        Ok(PdfExportReport {
            page_url,
            debugger_url,
            output_path: output_pdf.to_path_buf(),
            bytes_written: pdf.len(),
            elapsed: start.elapsed(),
        })
    }
}

/// One-shot export with a throwaway [`PdfExporter`].
pub async fn export_pdf(
    endpoint: &str,
    input_html: &Path,
    output_pdf: &Path,
    params: &PrintParameters,
    options: PdfExportOptions,
) -> Result<PdfExportReport> {
    PdfExporter::new(options)?
        .export(endpoint, input_html, output_pdf, params)
        .await
}

/// Navigates the tab behind `channel` to `page_url` and prints it.
///
/// The channel is closed before returning, whether or not the commands
/// succeeded. A print result without data is an error.
pub async fn print_page<C: MessageChannel>(
    channel: C,
    page_url: &Url,
    params: &PrintParameters,
    options: &RpcOptions,
) -> Result<Vec<u8>> {
    let mut client = RpcClient::new(channel, options.clone());
    let outcome = navigate_and_print(&mut client, page_url, params).await;
    let closed = client.close().await;

    let pdf = outcome?;
    if let Err(e) = closed {
        warn!(error = %e, "closing devtools channel failed after a successful print");
    }
    Ok(pdf)
}

async fn navigate_and_print<C: MessageChannel>(
    client: &mut RpcClient<C>,
    page_url: &Url,
    params: &PrintParameters,
) -> Result<Vec<u8>> {
    let print_params = params.to_value().map_err(|e| {
        ResumeError::rpc(
            RpcStage::Serialize,
            format!("Marshal of parameters to print pdf failed: {e}"),
        )
    })?;

    debug!(url = %page_url, "navigating tab");
    client
        .call(NAVIGATE_METHOD, json!({ "url": page_url.as_str() }))
        .await?;

    // The navigate response only means the load started. Fixed-delay reads
    // already paused for this before taking the response.
    let options = client.options();
    if options.wait == WaitStrategy::Correlated && !options.settle_delay.is_zero() {
        debug!(delay = ?options.settle_delay, "waiting for page to settle");
        sleep(options.settle_delay).await;
    }

    let pdf = client.call_for_data(PRINT_TO_PDF_METHOD, print_params).await?;
    if pdf.is_empty() {
        return Err(ResumeError::rpc(
            RpcStage::Decode,
            format!("{PRINT_TO_PDF_METHOD} result carried no data"),
        ));
    }
    Ok(pdf)
}

/// Writes `bytes` next to `path` under a `.partial` name, then renames it
/// into place. On failure neither file is left behind.
async fn write_replacing(path: &Path, bytes: &[u8]) -> Result<()> {
    let staging = staging_path(path);
    let written = match tokio::fs::write(&staging, bytes).await {
        Ok(()) => tokio::fs::rename(&staging, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
            debug!(path = %staging.display(), error = %cleanup, "no staging file to remove");
        }
        return Err(ResumeError::io("Write pdf", path, e));
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".partial");
    path.with_file_name(name)
}

/// Joins `input` onto `working_dir` and returns it as a `file://` URL.
///
/// Absolute inputs are used as given. `.` and `..` components are resolved
/// lexically, without touching the filesystem.
pub fn resolve_file_url(working_dir: &Path, input: &Path) -> Result<Url> {
    let joined = if input.is_absolute() {
        input.to_path_buf()
    } else {
        working_dir.join(input)
    };
    let normalized = normalize_lexically(&joined);
    Url::from_file_path(&normalized).map_err(|_| {
        ResumeError::Config(format!(
            "Cannot build a file URL for {} (working directory {})",
            normalized.display(),
            working_dir.display()
        ))
    })
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
