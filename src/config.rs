use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::pdf::{
    ChannelOptions, PdfExportOptions, PrintParameters, RpcOptions, WaitStrategy,
    DEFAULT_MAX_MESSAGE_SIZE,
};
use crate::pdf::rpc::DEFAULT_SETTLE_DELAY;

pub const DEFAULT_BROWSER_ENDPOINT: &str = "http://127.0.0.1:9222";
pub const DEFAULT_RESUME_PATH: &str = "example.yaml";
pub const DEFAULT_TEMPLATES_PREFIX: &str = "templates/tmpl";
pub const DEFAULT_OUTPUT_PREFIX: &str = "output/example";

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub browser: BrowserConfig,
    pub print: PrintConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    /// DevTools HTTP endpoint, e.g. `http://127.0.0.1:9222`.
    pub endpoint: String,
    pub wait: WaitStrategy,
    #[serde(with = "humantime_serde")]
    pub settle_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub response_timeout: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub discovery_timeout: Option<Duration>,
    pub max_message_size: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_BROWSER_ENDPOINT.to_string(),
            wait: WaitStrategy::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            response_timeout: None,
            connect_timeout: None,
            discovery_timeout: None,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

/// Overrides applied on top of [`PrintParameters::default`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrintConfig {
    pub landscape: Option<bool>,
    pub display_header_footer: Option<bool>,
    pub print_background: Option<bool>,
    pub scale: Option<f64>,
    pub paper_width: Option<f64>,
    pub paper_height: Option<f64>,
    /// Uniform margin; the per-side values below take precedence.
    pub margin: Option<f64>,
    pub margin_top: Option<f64>,
    pub margin_bottom: Option<f64>,
    pub margin_left: Option<f64>,
    pub margin_right: Option<f64>,
    pub page_ranges: Option<String>,
    pub ignore_invalid_page_ranges: Option<bool>,
}

impl PrintConfig {
    pub fn to_params(&self) -> PrintParameters {
        let mut params = PrintParameters::default();
        if let Some(margin) = self.margin {
            params = params.with_uniform_margin(margin);
        }
        if let Some(v) = self.landscape {
            params.landscape = v;
        }
        if let Some(v) = self.display_header_footer {
            params.display_header_footer = v;
        }
        if let Some(v) = self.print_background {
            params.print_background = v;
        }
        if let Some(v) = self.scale {
            params.scale = v;
        }
        if let Some(v) = self.paper_width {
            params.paper_width = v;
        }
        if let Some(v) = self.paper_height {
            params.paper_height = v;
        }
        if let Some(v) = self.margin_top {
            params.margin_top = v;
        }
        if let Some(v) = self.margin_bottom {
            params.margin_bottom = v;
        }
        if let Some(v) = self.margin_left {
            params.margin_left = v;
        }
        if let Some(v) = self.margin_right {
            params.margin_right = v;
        }
        if let Some(v) = &self.page_ranges {
            params.page_ranges = v.clone();
        }
        if let Some(v) = self.ignore_invalid_page_ranges {
            params.ignore_invalid_page_ranges = v;
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub resume: PathBuf,
    /// Template prefix; `.html`, `.md`, `.txt` and `.xml` are appended.
    pub templates: String,
    /// Output prefix; one file per format is written next to it.
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            resume: PathBuf::from(DEFAULT_RESUME_PATH),
            templates: DEFAULT_TEMPLATES_PREFIX.to_string(),
            output: DEFAULT_OUTPUT_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Loads `path`, or the central config file when no path is given.
    ///
    /// An explicit path must exist. A missing central file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigFileError> {
        match path {
            Some(p) => Self::from_file(p),
            None => match Self::central_config_path() {
                Some(central) if central.is_file() => Self::from_file(&central),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigFileError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `$XDG_CONFIG_HOME/resumegen/config.toml`, falling back to
    /// `~/.config/resumegen/config.toml`.
    pub fn central_config_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME")
                    .filter(|v| !v.is_empty())
                    .map(|home| PathBuf::from(home).join(".config"))
            })?;
        Some(base.join("resumegen").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.browser.endpoint.trim().is_empty() {
            return Err("browser.endpoint must not be empty".to_string());
        }
        if self.browser.max_message_size == 0 {
            return Err("browser.max_message_size must be greater than zero".to_string());
        }
        if self.browser.response_timeout == Some(Duration::ZERO) {
            return Err("browser.response_timeout must be greater than zero".to_string());
        }
        self.print.to_params().validate()
    }

    pub fn rpc_options(&self) -> RpcOptions {
        RpcOptions {
            wait: self.browser.wait,
            settle_delay: self.browser.settle_delay,
            response_timeout: self.browser.response_timeout,
        }
    }

    pub fn export_options(&self) -> PdfExportOptions {
        PdfExportOptions {
            rpc: self.rpc_options(),
            channel: ChannelOptions {
                max_message_size: self.browser.max_message_size,
                connect_timeout: self.browser.connect_timeout,
            },
            discovery_timeout: self.browser.discovery_timeout,
        }
    }
}
