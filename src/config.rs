//! Site configuration module.
//!
//! Handles loading, validating, and merging the site's `config.toml`. Stock
//! defaults are overridden by whatever the user file specifies; everything
//! else keeps its default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Portfolio"
//! default_tab = "home"      # Tab shown when the URL has no #hash
//!
//! [[tabs]]
//! id = "home"               # Element id of the tab panel and #hash
//! label = "Home"            # Tab button text
//! source = "home.html"      # Fragment loaded into the panel (.html or .md)
//! enhance = false           # Build carousels and lightbox after loading
//!
//! [carousel]
//! swipe_threshold = 50.0    # Horizontal px a touch must exceed to swipe
//!
//! [back_to_top]
//! offset = 300.0            # Scroll depth (px) at which the button shows
//!
//! [theme]
//! storage_key = "theme"     # Storage key for the saved light/dark choice
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#212529"
//! text_muted = "#6c757d"
//! border = "#dee2e6"
//! accent = "#0d6efd"
//!
//! [colors.dark]
//! background = "#121212"
//! text = "#e9ecef"
//! text_muted = "#adb5bd"
//! border = "#343a40"
//! accent = "#6ea8fe"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want. Note that
//! `tabs` is an array: a user `[[tabs]]` list replaces the stock list whole.
//!
//! Unknown keys are rejected to catch typos early.

use crate::carousel::{CarouselSettings, DEFAULT_SWIPE_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Page title.
    pub title: String,
    /// Tab shown when the location has no hash and history has no state.
    pub default_tab: String,
    /// Tabs in navigation order.
    pub tabs: Vec<TabConfig>,
    pub carousel: CarouselConfig,
    pub back_to_top: BackToTopConfig,
    pub theme: ThemeConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            default_tab: "home".to_string(),
            tabs: vec![
                TabConfig::new("home", "Home", Some("home.html"), false),
                TabConfig::new("about", "About", Some("about.html"), false),
                TabConfig::new("code", "Code", Some("ideas.html"), true),
                TabConfig::new("objects", "Objects", Some("objects.html"), true),
            ],
            carousel: CarouselConfig::default(),
            back_to_top: BackToTopConfig::default(),
            theme: ThemeConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_tab.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_tab must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for tab in &self.tabs {
            if tab.id.trim().is_empty() || tab.id.contains(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "tab id '{}' must be a non-empty word",
                    tab.id
                )));
            }
            if !seen.insert(tab.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate tab id '{}'",
                    tab.id
                )));
            }
        }
        let threshold = self.carousel.swipe_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::Validation(
                "carousel.swipe_threshold must be a non-negative number".into(),
            ));
        }
        if !self.back_to_top.offset.is_finite() {
            return Err(ConfigError::Validation(
                "back_to_top.offset must be a number".into(),
            ));
        }
        if self.theme.storage_key.is_empty() {
            return Err(ConfigError::Validation(
                "theme.storage_key must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn tab(&self, id: &str) -> Option<&TabConfig> {
        self.tabs.iter().find(|t| t.id == id)
    }
}

/// One tab: a button in the nav menu and a panel its content loads into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TabConfig {
    pub id: String,
    pub label: String,
    /// Fragment path relative to the site directory. Tabs without a source
    /// keep whatever the shell renders into their panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Build carousels and bind the lightbox once the content is in.
    #[serde(default)]
    pub enhance: bool,
}

impl TabConfig {
    pub fn new(id: &str, label: &str, source: Option<&str>, enhance: bool) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            source: source.map(str::to_string),
            enhance,
        }
    }
}

/// Carousel behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    pub swipe_threshold: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

impl From<&CarouselConfig> for CarouselSettings {
    fn from(config: &CarouselConfig) -> Self {
        Self {
            swipe_threshold: config.swipe_threshold,
        }
    }
}

/// Back-to-top button behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackToTopConfig {
    pub offset: f64,
}

impl Default for BackToTopConfig {
    fn default() -> Self {
        Self { offset: 300.0 }
    }
}

/// Theme toggle persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub storage_key: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text: captions, placeholders, the loading message.
    pub text_muted: String,
    pub border: String,
    /// Active tab, active dot, focus rings.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#212529".to_string(),
            text_muted: "#6c757d".to_string(),
            border: "#dee2e6".to_string(),
            accent: "#0d6efd".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            text: "#e9ecef".to_string(),
            text_muted: "#adb5bd".to_string(),
            border: "#343a40".to_string(),
            accent: "#6ea8fe".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (arrays included) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given site directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(site_dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(site_dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# tabfolio Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Page title.
title = "Portfolio"

# Tab shown when the URL has no #hash.
default_tab = "home"

# ---------------------------------------------------------------------------
# Tabs, in navigation order. A [[tabs]] list replaces the default list whole.
# ---------------------------------------------------------------------------
# id:      element id of the panel, also used as the URL #hash
# label:   tab button text
# source:  fragment loaded into the panel; .html pages contribute their
#          .container (or <main>) minus the first <h1>; .md is rendered first
# enhance: build image carousels and the lightbox after the fragment loads

[[tabs]]
id = "home"
label = "Home"
source = "home.html"

[[tabs]]
id = "about"
label = "About"
source = "about.html"

[[tabs]]
id = "code"
label = "Code"
source = "ideas.html"
enhance = true

[[tabs]]
id = "objects"
label = "Objects"
source = "objects.html"
enhance = true

# ---------------------------------------------------------------------------
# Carousel
# ---------------------------------------------------------------------------
[carousel]
# Horizontal distance (device px) a touch must exceed to count as a swipe.
swipe_threshold = 50.0

# ---------------------------------------------------------------------------
# Back-to-top button
# ---------------------------------------------------------------------------
[back_to_top]
# Scroll depth (px) past which the button becomes visible.
offset = 300.0

# ---------------------------------------------------------------------------
# Theme toggle
# ---------------------------------------------------------------------------
[theme]
# Storage key holding the saved "light" / "dark" choice.
storage_key = "theme"

# ---------------------------------------------------------------------------
# Colors - Light mode
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#212529"
text_muted = "#6c757d"    # Captions, placeholders
border = "#dee2e6"
accent = "#0d6efd"        # Active tab, active dot

# ---------------------------------------------------------------------------
# Colors - Dark mode (data-theme="dark")
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
text = "#e9ecef"
text_muted = "#adb5bd"
border = "#343a40"
accent = "#6ea8fe"
"##
}

/// Generate CSS custom properties from color config.
///
/// Dark colors are keyed on the `data-theme="dark"` attribute the theme
/// toggle sets, not on the media query, so the user's choice wins.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-accent: {light_accent};
}}

[data-theme="dark"] {{
    --color-bg: {dark_bg};
    --color-text: {dark_text};
    --color-text-muted: {dark_text_muted};
    --color-border: {dark_border};
    --color-accent: {dark_accent};
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_accent = colors.light.accent,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_accent = colors.dark.accent,
    )
}
