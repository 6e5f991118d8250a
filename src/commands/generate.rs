use std::path::PathBuf;
use std::process::ExitCode;

use tracing::debug;

use resumegen_lib::{GenerateOutput, ResumeError, RunOutput, RESUMEGEN_OUTPUT_VERSION};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::pipeline::{run_generate_job, GenerateJob};
use crate::settings::{
    format_effective_config, load_config, resolve_generate_settings, GenerateFlagSources,
};

/// Run the generate command.
#[allow(clippy::too_many_arguments)]
pub async fn run_generate(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    resume: PathBuf,
    browser: String,
    templates: String,
    output: String,
    skip_pdf: bool,
    format: OutputFormat,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format),
    };
    let flags = GenerateFlagSources::from_args(raw_args);
    let settings = resolve_generate_settings(resume, browser, templates, output, &config, &flags);
    debug!(
        "{}",
        format_effective_config(&config, &settings.browser, config_path.as_deref())
    );

    let job = GenerateJob {
        resume: settings.resume,
        templates: settings.templates,
        output: settings.output,
        browser: settings.browser,
        skip_pdf,
        params: config.print.to_params(),
        export: config.export_options(),
    };

    let artifacts = match run_generate_job(&job).await {
        Ok(artifacts) => artifacts,
        Err(err) => return render_error(err, format),
    };

    let body = RunOutput::Generate(GenerateOutput {
        version: RESUMEGEN_OUTPUT_VERSION.to_string(),
        resume: job.resume,
        artifacts,
        pdf_skipped: skip_pdf,
    });
    if let Err(err) = write_output(&body, format) {
        return render_error(ResumeError::Config(err.to_string()), format);
    }
    ExitCode::SUCCESS
}
