use std::path::PathBuf;
use std::process::ExitCode;

use tracing::debug;

use resumegen_lib::{
    Artifact, ArtifactFormat, PdfExporter, PdfOutput, ResumeError, RunOutput,
    RESUMEGEN_OUTPUT_VERSION,
};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{
    flag_present, format_effective_config, load_config, resolve_print_parameters, PrintOverrides,
};

/// Run the pdf command.
#[allow(clippy::too_many_arguments)]
pub async fn run_pdf(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    input: PathBuf,
    output: PathBuf,
    browser: String,
    overrides: PrintOverrides,
    format: OutputFormat,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format),
    };
    let browser = if flag_present(raw_args, "--browser") {
        browser
    } else {
        config.browser.endpoint.clone()
    };
    debug!(
        "{}",
        format_effective_config(&config, &browser, config_path.as_deref())
    );

    let params = resolve_print_parameters(&config, &overrides);
    let exporter = match PdfExporter::new(config.export_options()) {
        Ok(exporter) => exporter,
        Err(err) => return render_error(err, format),
    };
    let report = match exporter.export(&browser, &input, &output, &params).await {
        Ok(report) => report,
        Err(err) => return render_error(err, format),
    };

    let body = RunOutput::Pdf(PdfOutput {
        version: RESUMEGEN_OUTPUT_VERSION.to_string(),
        input,
        page_url: report.page_url.to_string(),
        browser,
        artifact: Artifact {
            format: ArtifactFormat::Pdf,
            path: report.output_path,
            bytes: report.bytes_written,
        },
        elapsed_ms: report.elapsed.as_millis() as u64,
    });
    if let Err(err) = write_output(&body, format) {
        return render_error(ResumeError::Config(err.to_string()), format);
    }
    ExitCode::SUCCESS
}
