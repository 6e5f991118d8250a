use std::path::{Path, PathBuf};

use tracing::{debug, info};

use resumegen_lib::{
    ensure_output_dir, load_resume, save_as_json, with_extension, Artifact, ArtifactFormat,
    PdfExportOptions, PdfExporter, PrintParameters, ResumeError, TemplateRenderer,
    TEMPLATE_FORMATS,
};

/// Everything one `generate` run needs, after config and flags are merged.
#[derive(Debug, Clone)]
pub struct GenerateJob {
    pub resume: PathBuf,
    pub templates: String,
    pub output: String,
    pub browser: String,
    pub skip_pdf: bool,
    pub params: PrintParameters,
    pub export: PdfExportOptions,
}

/// Renders every template, dumps JSON, then prints the HTML rendering to PDF.
///
/// Stops at the first failure; artifacts written before it stay on disk.
pub async fn run_generate_job(job: &GenerateJob) -> Result<Vec<Artifact>, ResumeError> {
    let resume = load_resume(&job.resume)?;
    debug!(
        path = %job.resume.display(),
        sections = resume.sections.len(),
        "loaded resume"
    );

    ensure_output_dir(&job.output)?;

    let renderer = TemplateRenderer::new();
    let mut artifacts = Vec::with_capacity(TEMPLATE_FORMATS.len() + 2);
    for format in TEMPLATE_FORMATS {
        let template = with_extension(&job.templates, format.extension());
        let target = with_extension(&job.output, format.extension());
        let bytes = renderer.save_as(&resume, &template, &target)?;
        artifacts.push(artifact(format, target, bytes));
    }

    let json_path = with_extension(&job.output, ArtifactFormat::Json.extension());
    let bytes = save_as_json(&resume, &json_path)?;
    artifacts.push(artifact(ArtifactFormat::Json, json_path, bytes));

    if job.skip_pdf {
        info!("pdf export skipped");
        return Ok(artifacts);
    }

    let html_path = with_extension(&job.output, ArtifactFormat::Html.extension());
    let pdf_path = with_extension(&job.output, ArtifactFormat::Pdf.extension());
    let report = export(job, &html_path, &pdf_path).await?;
    artifacts.push(artifact(
        ArtifactFormat::Pdf,
        report.output_path,
        report.bytes_written,
    ));

    Ok(artifacts)
}

async fn export(
    job: &GenerateJob,
    html_path: &Path,
    pdf_path: &Path,
) -> Result<resumegen_lib::PdfExportReport, ResumeError> {
    let exporter = PdfExporter::new(job.export.clone())?;
    exporter
        .export(&job.browser, html_path, pdf_path, &job.params)
        .await
}

fn artifact(format: ArtifactFormat, path: PathBuf, bytes: usize) -> Artifact {
    Artifact {
        format,
        path,
        bytes,
    }
}
