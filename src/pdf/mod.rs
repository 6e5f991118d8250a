//! Remote PDF export through the browser DevTools protocol.
//!
//! A running Chrome/Chromium started with `--remote-debugging-port` is asked
//! to open a local HTML file and print it to PDF.
//!
//! # Module Structure
//!
//! - [`discovery`] - Finds a tab through `GET /json/list`
//! - [`channel`] - Websocket message channel to that tab
//! - [`rpc`] - Command framing, response correlation, base64 payloads
//! - [`params`] - `Page.printToPDF` parameters
//! - [`export`] - Navigate-then-print orchestration
//!
//! # Example
//!
//! ```no_run
//! use resumegen_lib::{export_pdf, PdfExportOptions, PrintParameters};
//! use std::path::Path;
//!
//! # async fn example() -> resumegen_lib::Result<()> {
//! let report = export_pdf(
//!     "http://127.0.0.1:9222",
//!     Path::new("output/example.html"),
//!     Path::new("output/example.pdf"),
//!     &PrintParameters::default(),
//!     PdfExportOptions::default(),
//! )
//! .await?;
//! println!("wrote {} bytes", report.bytes_written);
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod discovery;
pub mod export;
pub mod params;
pub mod rpc;

#[cfg(test)]
pub(crate) mod scripted;

pub use channel::{ChannelOptions, MessageChannel, WebSocketChannel, DEFAULT_MAX_MESSAGE_SIZE};
pub use discovery::{parse_target_list, ChannelDescriptor, TargetLocator};
pub use export::{
    export_pdf, print_page, resolve_file_url, PdfExportOptions, PdfExportReport, PdfExporter,
    NAVIGATE_METHOD, PRINT_TO_PDF_METHOD,
};
pub use params::PrintParameters;
pub use rpc::{decode_data, Frame, RemoteError, RpcClient, RpcOptions, WaitStrategy};
