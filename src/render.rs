//! Template and JSON rendering of a [`Resume`].

use std::path::{Path, PathBuf};

use minijinja::Environment;
use tracing::info;

use crate::output::ArtifactFormat;
use crate::resume::Resume;
use crate::{ResumeError, Result};

/// Formats rendered from templates, in generation order. A template
/// `<prefix>.<ext>` must exist for each.
pub const TEMPLATE_FORMATS: [ArtifactFormat; 4] = [
    ArtifactFormat::Html,
    ArtifactFormat::Md,
    ArtifactFormat::Txt,
    ArtifactFormat::Xml,
];

/// Appends `.<ext>` to a path prefix such as `output/example`.
pub fn with_extension(prefix: &str, ext: &str) -> PathBuf {
    PathBuf::from(format!("{prefix}.{ext}"))
}

/// Renders resumes through minijinja templates read from disk.
///
/// HTML and XML templates are auto-escaped, chosen by file extension.
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        Self { env }
    }

    /// Renders the template at `template_path` with the resume as context.
    pub fn render_file(&self, template_path: &Path, resume: &Resume) -> Result<String> {
        let source = std::fs::read_to_string(template_path).map_err(|e| {
            ResumeError::Template(format!(
                "Parse template file ({}) failed: {}",
                template_path.display(),
                e
            ))
        })?;
        let name = template_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| template_path.display().to_string());
        self.env
            .render_named_str(&name, &source, resume)
            .map_err(|e| {
                ResumeError::Template(format!(
                    "Execute template ({}) failed: {:#}",
                    template_path.display(),
                    e
                ))
            })
    }

    /// Renders `template_path` and writes the result to `output_path`.
    pub fn save_as(&self, resume: &Resume, template_path: &Path, output_path: &Path) -> Result<usize> {
        let rendered = self.render_file(template_path, resume)?;
        std::fs::write(output_path, &rendered)
            .map_err(|e| ResumeError::io("Write output file", output_path, e))?;
        info!(path = %output_path.display(), bytes = rendered.len(), "rendered template");
        Ok(rendered.len())
    }
}

/// Serializes the resume as two-space indented JSON.
pub fn to_json_pretty(resume: &Resume) -> Result<String> {
    serde_json::to_string_pretty(resume).map_err(ResumeError::Serialization)
}

/// Writes the resume as indented JSON to `output_path`.
pub fn save_as_json(resume: &Resume, output_path: &Path) -> Result<usize> {
    let json = to_json_pretty(resume)?;
    std::fs::write(output_path, &json)
        .map_err(|e| ResumeError::io("Write output file", output_path, e))?;
    info!(path = %output_path.display(), bytes = json.len(), "wrote json");
    Ok(json.len())
}

/// Creates the parent directory of an output prefix if it is missing.
pub fn ensure_output_dir(prefix: &str) -> Result<()> {
    let probe = with_extension(prefix, "out");
    if let Some(parent) = probe.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ResumeError::io("Create output directory", parent, e))?;
        }
    }
    Ok(())
}
