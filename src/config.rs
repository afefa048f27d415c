//! Preview configuration.
//!
//! Handles loading, validating, and merging preview options. Every option has
//! a stock default; callers override only what they need, either from a
//! `preview.toml` file or from an inline partial table.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! max_file_size = 52428800                  # bytes (50 MiB)
//! supported_types = ["pdf", "docx", "xlsx", "csv", "txt", "image"]
//! theme = "light"                           # "light" or "dark"
//! allow_multiple_files = false
//! show_file_info = true
//! auto_preview = true
//! ```
//!
//! ## Partial Configuration
//!
//! Overlays are sparse and merged key-by-key on top of the current values:
//!
//! ```toml
//! theme = "dark"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::FileType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Colour theme tag applied to full-page output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Options recognised by the previewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Largest accepted file in bytes.
    pub max_file_size: u64,
    /// Types the caller is willing to preview.
    pub supported_types: Vec<FileType>,
    pub theme: Theme,
    pub allow_multiple_files: bool,
    pub show_file_info: bool,
    /// Render as soon as a file passes validation.
    pub auto_preview: bool,
}

pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            supported_types: vec![
                FileType::Pdf,
                FileType::Docx,
                FileType::Xlsx,
                FileType::Csv,
                FileType::Txt,
                FileType::Image,
            ],
            theme: Theme::Light,
            allow_multiple_files: false,
            show_file_info: true,
            auto_preview: true,
        }
    }
}

impl PreviewConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_size == 0 {
            return Err(ConfigError::Validation(
                "max_file_size must be greater than 0".into(),
            ));
        }
        if self.supported_types.is_empty() {
            return Err(ConfigError::Validation(
                "supported_types must not be empty".into(),
            ));
        }
        if self.supported_types.contains(&FileType::Unknown) {
            return Err(ConfigError::Validation(
                "supported_types cannot contain 'unknown'".into(),
            ));
        }
        Ok(())
    }

    /// Maximum size in megabytes, one decimal place.
    pub fn max_file_size_mb(&self) -> String {
        format!("{:.1}", self.max_file_size as f64 / 1024.0 / 1024.0)
    }

    /// `"PDF, DOCX, XLSX"` style listing for help text.
    pub fn supported_types_text(&self) -> String {
        self.supported_types
            .iter()
            .map(|t| t.as_str().to_uppercase())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Value for an `<input type="file" accept=...>` attribute.
    pub fn accept_attribute(&self) -> String {
        self.supported_types
            .iter()
            .flat_map(|t| t.extensions().iter().copied())
            .collect::<Vec<_>>()
            .join(",")
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Serialize a config to a `toml::Value::Table` so overlays can be merged onto it.
pub fn to_value(config: &PreviewConfig) -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(config)?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto `base`, then deserialize and validate.
pub fn resolve_config(
    base: &PreviewConfig,
    overlay: Option<toml::Value>,
) -> Result<PreviewConfig, ConfigError> {
    let Some(overlay) = overlay else {
        return Ok(base.clone());
    };
    let merged = merge_toml(to_value(base)?, overlay);
    let config: PreviewConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Parse a partial TOML document into an overlay value.
pub fn parse_overlay(source: &str) -> Result<toml::Value, ConfigError> {
    Ok(toml::from_str(source)?)
}

/// Load config from a TOML file, merged over stock defaults.
///
/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<PreviewConfig, ConfigError> {
    if !path.exists() {
        return Ok(PreviewConfig::default());
    }
    let content = fs::read_to_string(path)?;
    resolve_config(&PreviewConfig::default(), Some(parse_overlay(&content)?))
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# file-preview configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Largest accepted file, in bytes (50 MiB).
max_file_size = 52428800

# Types to preview. Available: pdf, doc, docx, xls, xlsx, csv, txt, json,
# html, xml, image.
supported_types = ["pdf", "docx", "xlsx", "csv", "txt", "image"]

# Page theme for full-page output: "light" or "dark".
theme = "light"

# Accept more than one file per request.
allow_multiple_files = false

# Show the file details panel next to the preview.
show_file_info = true

# Render immediately after a file passes validation.
auto_preview = true
"##
}

/// Palette for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub text_muted: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
}

impl ColorScheme {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: "#ffffff",
                surface: "#f6f7f9",
                text: "#111111",
                text_muted: "#666666",
                border: "#e0e0e0",
                accent: "#2563eb",
            },
            Theme::Dark => Self {
                background: "#0a0a0a",
                surface: "#17181b",
                text: "#eeeeee",
                text_muted: "#999999",
                border: "#333333",
                accent: "#60a5fa",
            },
        }
    }
}

/// Generate CSS custom properties for a theme.
pub fn theme_css(theme: Theme) -> String {
    let c = ColorScheme::for_theme(theme);
    format!(
        r#":root {{
    --color-bg: {bg};
    --color-surface: {surface};
    --color-text: {text};
    --color-text-muted: {muted};
    --color-border: {border};
    --color-accent: {accent};
}}"#,
        bg = c.background,
        surface = c.surface,
        text = c.text,
        muted = c.text_muted,
        border = c.border,
        accent = c.accent,
    )
}
