use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::process::ExitCode;

use resumegen_lib::{ErrorOutput, ResumeError, RunOutput, RESUMEGEN_OUTPUT_VERSION};

use crate::cli::OutputFormat;

/// Write output in the requested format to stdout.
pub fn write_output(body: &RunOutput, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body)?,
        OutputFormat::Pretty => write_pretty_output(body)?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: ResumeError, format: OutputFormat) -> ExitCode {
    let error_payload = err.to_payload();
    let payload = RunOutput::Error(ErrorOutput {
        version: RESUMEGEN_OUTPUT_VERSION.to_string(),
        message: Some(err.to_string()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            println!("{content}");
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

fn write_json_output(body: &RunOutput) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    println!("{content}");
    Ok(())
}

fn write_pretty_output(body: &RunOutput) -> io::Result<()> {
    if io::stdout().is_terminal() {
        println!("{}", format_pretty(body, true));
        return Ok(());
    }

    // Non-tty: keep JSON shape for pipelines.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    println!("{content}");
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &RunOutput, colorize: bool) -> String {
    match body {
        RunOutput::Generate(out) => {
            let mut buf = String::new();
            let header = color("[GENERATE]", "32", colorize);
            writeln!(buf, "{} {}", header, out.resume.display()).ok();
            if !out.artifacts.is_empty() {
                writeln!(buf, "Artifacts:").ok();
                for artifact in &out.artifacts {
                    writeln!(
                        buf,
                        "- {:5} {} ({})",
                        artifact.format.extension(),
                        artifact.path.display(),
                        format_bytes(artifact.bytes)
                    )
                    .ok();
                }
            }
            if out.pdf_skipped {
                writeln!(buf, "{}", color("PDF skipped (--skip-pdf)", "33", colorize)).ok();
            }
            buf
        }
        RunOutput::Pdf(out) => {
            let mut buf = String::new();
            let header = color("[PDF]", "36", colorize);
            writeln!(
                buf,
                "{} {} -> {} ({})",
                header,
                out.input.display(),
                out.artifact.path.display(),
                format_bytes(out.artifact.bytes)
            )
            .ok();
            writeln!(buf, "Browser: {}", out.browser).ok();
            writeln!(buf, "Page: {}", out.page_url).ok();
            writeln!(buf, "Elapsed: {}ms", out.elapsed_ms).ok();
            buf
        }
        RunOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

fn format_bytes(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}
