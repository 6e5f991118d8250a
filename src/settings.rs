use std::path::{Path, PathBuf};

use resumegen_lib::{Config, PrintParameters, ResumeError, WaitStrategy};

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct GenerateFlagSources {
    pub resume: bool,
    pub browser: bool,
    pub templates: bool,
    pub output: bool,
}

impl GenerateFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            resume: flag_present(args, "--resume"),
            browser: flag_present(args, "--browser"),
            templates: flag_present(args, "--templates"),
            output: flag_present(args, "--output") || short_flag_present(args, "-o"),
        }
    }
}

/// Options of `generate` (and the globals) that take the next token as value.
const GENERATE_VALUE_FLAGS: [&str; 7] = [
    "--resume",
    "--browser",
    "--templates",
    "--output",
    "-o",
    "--format",
    "--config",
];

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Checks for a short flag, as `-o value` or `-ovalue`, in flag position only:
/// tokens consumed as values of other options and anything after `--` are skipped.
fn short_flag_present(args: &[String], flag: &str) -> bool {
    let mut tokens = args.iter().skip(1);
    while let Some(arg) = tokens.next() {
        if arg == "--" {
            return false;
        }
        if arg.starts_with(flag) {
            return true;
        }
        if GENERATE_VALUE_FLAGS.contains(&arg.as_str()) {
            tokens.next();
        }
    }
    false
}

/// Resolved settings after merging CLI args and config file.
#[derive(Debug, Clone)]
pub struct ResolvedGenerateSettings {
    pub resume: PathBuf,
    pub browser: String,
    pub templates: String,
    pub output: String,
}

/// Merge CLI arguments with config file, preferring CLI when flags are present.
pub fn resolve_generate_settings(
    cli_resume: PathBuf,
    cli_browser: String,
    cli_templates: String,
    cli_output: String,
    config: &Config,
    flags: &GenerateFlagSources,
) -> ResolvedGenerateSettings {
    ResolvedGenerateSettings {
        resume: if flags.resume {
            cli_resume
        } else {
            config.paths.resume.clone()
        },
        browser: if flags.browser {
            cli_browser
        } else {
            config.browser.endpoint.clone()
        },
        templates: if flags.templates {
            cli_templates
        } else {
            config.paths.templates.clone()
        },
        output: if flags.output {
            cli_output
        } else {
            config.paths.output.clone()
        },
    }
}

/// CLI print overrides for the `pdf` command; `None` keeps the config value.
#[derive(Debug, Clone, Default)]
pub struct PrintOverrides {
    pub landscape: bool,
    pub scale: Option<f64>,
    pub paper_width: Option<f64>,
    pub paper_height: Option<f64>,
    pub margin: Option<f64>,
    pub page_ranges: Option<String>,
}

/// Applies CLI print overrides on top of the configured parameters.
pub fn resolve_print_parameters(config: &Config, overrides: &PrintOverrides) -> PrintParameters {
    let mut params = config.print.to_params();
    if overrides.landscape {
        params.landscape = true;
    }
    if let Some(margin) = overrides.margin {
        params = params.with_uniform_margin(margin);
    }
    if let Some(scale) = overrides.scale {
        params.scale = scale;
    }
    if let Some(width) = overrides.paper_width {
        params.paper_width = width;
    }
    if let Some(height) = overrides.paper_height {
        params.paper_height = height;
    }
    if let Some(ranges) = &overrides.page_ranges {
        params.page_ranges = ranges.clone();
    }
    params
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/resumegen/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, ResumeError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        ResumeError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        ResumeError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, browser: &str, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let settle = humantime::format_duration(config.browser.settle_delay);
    let wait = match config.browser.wait {
        WaitStrategy::Correlated => format!("correlated (settle {settle})"),
        WaitStrategy::FixedDelay => format!("fixed-delay ({settle})"),
    };
    let response_timeout = config
        .browser
        .response_timeout
        .map(|d| humantime::format_duration(d).to_string())
        .unwrap_or_else(|| "none".to_string());
    let params = config.print.to_params();
    format!(
        "Effective config [{source}]: browser={}, wait={}, response-timeout={}, max-message={}B, paper={}x{}in, scale={:.2}, landscape={}",
        browser,
        wait,
        response_timeout,
        config.browser.max_message_size,
        params.paper_width,
        params.paper_height,
        params.scale,
        params.landscape
    )
}
