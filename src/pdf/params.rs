//! Parameters of the `Page.printToPDF` command.

use serde::{Deserialize, Serialize};

use crate::{ResumeError, Result};

/// Rendering options sent with `Page.printToPDF`.
///
/// Lengths are in inches. Boolean flags are omitted from the wire form when
/// false (the browser default); numeric fields are always sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintParameters {
    /// Paper orientation.
    #[serde(skip_serializing_if = "is_false")]
    pub landscape: bool,
    /// Display header and footer.
    #[serde(skip_serializing_if = "is_false")]
    pub display_header_footer: bool,
    /// Print background graphics.
    #[serde(skip_serializing_if = "is_false")]
    pub print_background: bool,
    /// Scale of the webpage rendering.
    pub scale: f64,
    pub paper_width: f64,
    pub paper_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    /// Pages to print, e.g. `1-5, 8, 11-13`. Empty prints all pages.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub page_ranges: String,
    /// Silently ignore invalid but parseable page ranges such as `3-2`.
    #[serde(skip_serializing_if = "is_false")]
    pub ignore_invalid_page_ranges: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Default for PrintParameters {
    fn default() -> Self {
        Self {
            landscape: false,
            display_header_footer: false,
            print_background: true,
            scale: 1.0,
            paper_width: 8.5,
            paper_height: 11.0,
            margin_top: 0.0,
            margin_bottom: 0.0,
            margin_left: 0.0,
            margin_right: 0.0,
            page_ranges: String::new(),
            ignore_invalid_page_ranges: false,
        }
    }
}

impl PrintParameters {
    /// Sets all four margins to the same value.
    pub fn with_uniform_margin(mut self, inches: f64) -> Self {
        self.margin_top = inches;
        self.margin_bottom = inches;
        self.margin_left = inches;
        self.margin_right = inches;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.scale > 0.0) {
            return Err(format!("print.scale must be positive, got {}", self.scale));
        }
        if !(self.paper_width > 0.0) || !(self.paper_height > 0.0) {
            return Err(format!(
                "print paper size must be positive, got {}x{}",
                self.paper_width, self.paper_height
            ));
        }
        let margins = [
            ("top", self.margin_top),
            ("bottom", self.margin_bottom),
            ("left", self.margin_left),
            ("right", self.margin_right),
        ];
        for (side, value) in margins {
            if !(value >= 0.0) {
                return Err(format!("print margin {side} must not be negative, got {value}"));
            }
        }
        Ok(())
    }

    /// Wire form for the `params` field of the print command.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(ResumeError::Serialization)
    }
}
