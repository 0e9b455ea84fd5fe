//! Configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. User values are
//! layered on top of stock defaults, so a config file only needs the keys it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! extensions = ["txt", "md", "markdown", "textile", "htm", "html", "rss", "xml"]
//! languages = ["en"]               # Language markers in file names (page.en.md)
//! request_languages = ["de", "en"] # Locales recognized as first URL segment
//! index_name = "index"             # Marks a directory's index file
//!
//! [[paths]]
//! alias = "@page"
//! path = "pages"                   # Relative to the config file
//!
//! [cache]
//! enabled = true
//! dir = ".sitemenu-cache"          # Relative to the config file
//!
//! [menu]
//! class = "menu"
//!
//! [menu.templates]
//! begin_iteration = '<div class="{class}"><ul>'
//! end_iteration = "</ul></div>"
//! begin_children = "<ul>"
//! end_children = "</ul></li>"
//! begin_current = "<li>"
//! end_current = "</li>"
//! ```
//!
//! Tables merge key by key; arrays replace the default entirely, so a
//! `[[paths]]` list in the user file is the full list of content roots.
//! Unknown keys are rejected to catch typos early.

use crate::builder::{CollectionBuilder, ContentPath};
use crate::cache::FileCache;
use crate::filter::FileFilter;
use crate::render::{HtmlTree, Templates};
use crate::walk::DirectoryWalker;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMenuConfig {
    /// File extensions that take part in a scan.
    pub extensions: Vec<String>,
    /// Language codes recognized as file-name markers.
    pub languages: Vec<String>,
    /// Locales recognized as the first segment of a request path.
    pub request_languages: Vec<String>,
    /// Substring that marks a directory's index file.
    pub index_name: String,
    /// Content roots, scanned in order.
    pub paths: Vec<PathConfig>,
    pub cache: CacheConfig,
    pub menu: MenuConfig,
}

impl Default for SiteMenuConfig {
    fn default() -> Self {
        Self {
            extensions: ["txt", "md", "markdown", "textile", "htm", "html", "rss", "xml"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            languages: vec!["en".to_string()],
            request_languages: vec!["de".to_string(), "en".to_string()],
            index_name: "index".to_string(),
            paths: vec![PathConfig {
                alias: "@page".to_string(),
                path: PathBuf::from("pages"),
            }],
            cache: CacheConfig::default(),
            menu: MenuConfig::default(),
        }
    }
}

/// One content root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathConfig {
    /// Prefix of item paths from this root, e.g. `@page`.
    pub alias: String,
    pub path: PathBuf,
}

/// Collection cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Directory holding the cache files.
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from(".sitemenu-cache"),
        }
    }
}

/// Menu rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    /// Value of the `{class}` placeholder.
    pub class: String,
    pub templates: Templates,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            class: "menu".to_string(),
            templates: Templates::default(),
        }
    }
}

impl SiteMenuConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.contains(['.', '/']))
        {
            return Err(ConfigError::Validation(format!(
                "extensions: '{ext}' must be a bare extension like \"md\""
            )));
        }
        validate_language_codes("languages", &self.languages)?;
        validate_language_codes("request_languages", &self.request_languages)?;
        if self.index_name.is_empty() {
            return Err(ConfigError::Validation(
                "index_name must not be empty".into(),
            ));
        }

        let mut aliases = HashSet::new();
        for path in &self.paths {
            if path.alias.is_empty() {
                return Err(ConfigError::Validation(
                    "paths: alias must not be empty".into(),
                ));
            }
            if !aliases.insert(path.alias.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "paths: duplicate alias '{}'",
                    path.alias
                )));
            }
        }
        Ok(())
    }

    /// Make relative content and cache paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in &mut self.paths {
            if path.path.is_relative() {
                path.path = base.join(&path.path);
            }
        }
        if self.cache.dir.is_relative() {
            self.cache.dir = base.join(&self.cache.dir);
        }
    }

    pub fn content_paths(&self) -> Vec<ContentPath> {
        self.paths
            .iter()
            .map(|p| ContentPath::new(p.alias.as_str(), p.path.as_path()))
            .collect()
    }

    pub fn walker(&self) -> DirectoryWalker {
        DirectoryWalker::new(FileFilter::new(&self.extensions), self.index_name.as_str())
    }

    /// The file cache, when enabled.
    pub fn file_cache(&self) -> Option<FileCache> {
        self.cache
            .enabled
            .then(|| FileCache::new(self.cache.dir.as_path()))
    }

    /// A builder over the configured content roots, with the file cache
    /// attached when enabled.
    pub fn collection_builder(&self) -> CollectionBuilder {
        let builder = CollectionBuilder::new(self.content_paths(), self.walker(), &self.languages);
        match self.file_cache() {
            Some(cache) => builder.with_cache(cache),
            None => builder,
        }
    }

    /// A menu renderer with the configured class and templates.
    pub fn html_tree<'f, T>(&self, formatter: impl Fn(&T) -> String + 'f) -> HtmlTree<'f, T> {
        HtmlTree::with_formatter(formatter)
            .with_class(self.menu.class.as_str())
            .with_templates(self.menu.templates.clone())
    }
}

fn validate_language_codes(key: &str, codes: &[String]) -> Result<(), ConfigError> {
    match codes
        .iter()
        .find(|c| c.len() != 2 || !c.bytes().all(|b| b.is_ascii_lowercase()))
    {
        Some(code) => Err(ConfigError::Validation(format!(
            "{key}: '{code}' must be two lowercase letters"
        ))),
        None => Ok(()),
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteMenuConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteMenuConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteMenuConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from the given directory.
pub fn load_config(root: &Path) -> Result<SiteMenuConfig, ConfigError> {
    load_config_file(&root.join(CONFIG_FILE_NAME))
}

/// Load a config file, falling back to stock defaults when it is missing.
///
/// Relative paths in the result are resolved against the file's directory.
pub fn load_config_file(config_path: &Path) -> Result<SiteMenuConfig, ConfigError> {
    let overlay = load_raw_config(config_path)?;
    let mut config = resolve_config(stock_defaults_value()?, overlay)?;
    let base = config_path.parent().unwrap_or(Path::new(""));
    config.resolve_paths(base);
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sitemenu Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# File extensions that take part in a scan. Dotfiles are always skipped.
extensions = ["txt", "md", "markdown", "textile", "htm", "html", "rss", "xml"]

# Language markers recognized in file names: "contact.en.md" is the English
# variant of "contact.md". Two lowercase letters each.
languages = ["en"]

# Locales recognized as the first segment of a request path ("/en/about").
request_languages = ["de", "en"]

# A directory is described by the first file whose name contains this text.
index_name = "index"

# ---------------------------------------------------------------------------
# Content roots
# ---------------------------------------------------------------------------
# Scanned in order. Relative paths are resolved against this file's
# directory. Listing [[paths]] here replaces the default list.
[[paths]]
alias = "@page"
path = "pages"

# ---------------------------------------------------------------------------
# Collection cache
# ---------------------------------------------------------------------------
[cache]
# Store the built collection and reuse it instead of rescanning.
# Run `sitemenu clear-cache` after editing content.
enabled = true

# Cache directory, relative to this file.
dir = ".sitemenu-cache"

# ---------------------------------------------------------------------------
# Menu markup
# ---------------------------------------------------------------------------
[menu]
# Substituted for {class} in templates.
class = "menu"

# Boundary templates. {class} and {level} (1-based depth) are substituted.
[menu.templates]
begin_iteration = '<div class="{class}"><ul>'
end_iteration = "</ul></div>"
begin_children = "<ul>"
end_children = "</ul></li>"
begin_current = "<li>"
end_current = "</li>"
"##
}
