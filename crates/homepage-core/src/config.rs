//! Site configuration management.

use std::{collections::HashSet, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Prefix for environment overrides, e.g. `HOMEPAGE__BUILD__OUTPUT_DIR`.
pub const ENV_PREFIX: &str = "HOMEPAGE";

/// Main configuration structure, usually read from `site.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide metadata rendered into every page.
    #[serde(default)]
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Locations of the data includes consumed by hooks.
    #[serde(default)]
    pub data: DataConfig,

    /// Navigation menu, in display order.
    #[serde(default = "default_menu")]
    pub menu: Vec<MenuEntry>,

    /// Pages outside the menu that still need an explicit title.
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site owner, used for the author meta tag and the copyright line.
    #[serde(default = "default_author")]
    pub author: String,

    /// Base title, prepended to every page title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Text of the page header; defaults to the base title.
    #[serde(default)]
    pub header: Option<String>,

    /// Description meta tag; defaults to "<author>'s home page".
    #[serde(default)]
    pub description: Option<String>,

    /// Keywords meta tag entries.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// First year of the copyright notice.
    #[serde(default = "default_copyright_start")]
    pub copyright_start: i32,

    /// Fixed "last update" timestamp. When unset the newest source
    /// modification time is used.
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,

    /// `strftime` format of the "last update" line.
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Root of the source tree.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Root of the generated output tree.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Page template include, relative to the source root.
    #[serde(default = "default_template")]
    pub template: String,

    /// Stylesheets linked from every page, relative to the source root.
    #[serde(default = "default_stylesheets")]
    pub stylesheets: Vec<String>,

    /// Syntax highlighting theme name for fenced code blocks.
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,

    /// Number of spaces per indentation level.
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    /// Indentation level of the menu inside the template.
    #[serde(default = "default_menu_indent")]
    pub menu_indent: usize,

    /// Indentation level of the page content inside the template.
    #[serde(default = "default_content_indent")]
    pub content_indent: usize,
}

/// Data includes, relative to the source root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Conference presentations (TOML).
    #[serde(default = "default_talks_data")]
    pub talks: String,

    /// Cached ORCID record (JSON).
    #[serde(default = "default_orcid_data")]
    pub orcid: String,
}

/// Generated content appended to a menu page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hook {
    /// List of conference presentations.
    Talks,
    /// List of publications from the cached ORCID record.
    Publications,
}

/// A single entry of the navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    /// Label shown in the menu, also used as the page title.
    pub title: String,

    /// Link target, either a page (`*.html`) or a plain path such as a folder.
    pub target: String,

    /// Optional generated content appended to the page.
    #[serde(default)]
    pub hook: Option<Hook>,
}

impl MenuEntry {
    /// Create a menu entry without a hook.
    pub fn new(title: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            target: target.into(),
            hook: None,
        }
    }

    /// Attach a hook to this entry.
    #[must_use]
    pub fn with_hook(mut self, hook: Hook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Whether the target is absolute (a URL, a `mailto:` or a site-root
    /// path) rather than relative to the site root.
    pub fn is_absolute(&self) -> bool {
        self.target.contains("://")
            || self.target.starts_with('/')
            || self.target.starts_with("mailto:")
    }

    /// Whether the target is a page generated by the deployer.
    pub fn points_to_file(&self) -> bool {
        !self.is_absolute() && self.target.ends_with(".html")
    }
}

/// A titled page that is not part of the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    /// Page title.
    pub title: String,

    /// Output path of the page, e.g. `about.html`.
    pub target: String,
}

// Default value functions
fn default_author() -> String {
    "Anonymous".to_string()
}

fn default_title() -> String {
    "Home page".to_string()
}

fn default_copyright_start() -> i32 {
    2012
}

fn default_datetime_format() -> String {
    "%A, %B %d %Y at %H:%M".to_string()
}

fn default_source_dir() -> String {
    "webpage".to_string()
}

fn default_output_dir() -> String {
    "html".to_string()
}

fn default_template() -> String {
    "_template.html".to_string()
}

fn default_stylesheets() -> Vec<String> {
    vec!["css/default.css".to_string()]
}

fn default_syntax_theme() -> String {
    "base16-ocean.light".to_string()
}

fn default_indent_width() -> usize {
    2
}

fn default_menu_indent() -> usize {
    4
}

fn default_content_indent() -> usize {
    4
}

fn default_talks_data() -> String {
    "_data/talks.toml".to_string()
}

fn default_orcid_data() -> String {
    "_data/orcid.json".to_string()
}

fn default_menu() -> Vec<MenuEntry> {
    vec![MenuEntry::new("Home", "index.html")]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            build: BuildConfig::default(),
            data: DataConfig::default(),
            menu: default_menu(),
            pages: Vec::new(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            author: default_author(),
            title: default_title(),
            header: None,
            description: None,
            keywords: Vec::new(),
            copyright_start: default_copyright_start(),
            last_update: None,
            datetime_format: default_datetime_format(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            template: default_template(),
            stylesheets: default_stylesheets(),
            syntax_theme: default_syntax_theme(),
            indent_width: default_indent_width(),
            menu_indent: default_menu_indent(),
            content_indent: default_content_indent(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            talks: default_talks_data(),
            orcid: default_orcid_data(),
        }
    }
}

impl SiteConfig {
    /// Header text, falling back to the base title.
    pub fn header(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.title)
    }

    /// Description meta tag content.
    pub fn description(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("{}'s home page", self.author))
    }
}

impl BuildConfig {
    /// The string making up one indentation level.
    pub fn indent_string(&self) -> String {
        " ".repeat(self.indent_width)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file layered with `HOMEPAGE__*` environment
    /// overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        Self::load_layered(path, config::Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    fn load_layered(path: &Path, env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(env)
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration file if it exists, else use the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_with_env(path);
        }
        tracing::info!(path = %path.display(), "no configuration file, using defaults");
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.trim().is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.author.trim().is_empty() {
            return Err(CoreError::config("site.author cannot be empty"));
        }

        if self.build.indent_width == 0 {
            return Err(CoreError::config("build.indent_width must be positive"));
        }

        let mut titles = HashSet::new();
        for entry in &self.menu {
            if entry.target.trim().is_empty() {
                return Err(CoreError::config(format!(
                    "menu entry '{}' has an empty target",
                    entry.title
                )));
            }
            if !titles.insert(entry.title.as_str()) {
                return Err(CoreError::config(format!(
                    "duplicate menu title '{}'",
                    entry.title
                )));
            }
        }

        if self.build.source_dir == self.build.output_dir {
            return Err(CoreError::config(
                "build.source_dir and build.output_dir must differ",
            ));
        }

        Ok(())
    }

    /// Title explicitly assigned to an output page, if any.
    pub fn title_for(&self, target: &str) -> Option<&str> {
        self.menu
            .iter()
            .find(|entry| entry.target == target)
            .map(|entry| entry.title.as_str())
            .or_else(|| {
                self.pages
                    .iter()
                    .find(|page| page.target == target)
                    .map(|page| page.title.as_str())
            })
    }

    /// Hook attached to an output page, if any.
    pub fn hook_for(&self, target: &str) -> Option<Hook> {
        self.menu
            .iter()
            .find(|entry| entry.target == target)
            .and_then(|entry| entry.hook)
    }

    /// Whether any menu entry uses the given hook.
    pub fn uses_hook(&self, hook: Hook) -> bool {
        self.menu.iter().any(|entry| entry.hook == Some(hook))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[site]
author = "Jane Doe"
title = "Jane Doe @ Physics"
keywords = ["physics", "astrophysics"]
copyright_start = 2010
last_update = "2024-05-01T10:30:00Z"

[build]
source_dir = "src"
output_dir = "public"
stylesheets = ["css/default.css", "css/print.css"]
indent_width = 4

[data]
talks = "_data/my-talks.toml"

[[menu]]
title = "Home"
target = "index.html"

[[menu]]
title = "Presentations"
target = "talks.html"
hook = "talks"

[[menu]]
title = "Private area"
target = "private"

[[pages]]
title = "About this website"
target = "about.html"
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("site.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site.author, "Jane Doe");
        assert_eq!(config.site.header(), "Jane Doe @ Physics");
        assert_eq!(config.site.description(), "Jane Doe's home page");
        assert_eq!(config.site.keywords, vec!["physics", "astrophysics"]);
        assert_eq!(config.site.copyright_start, 2010);
        assert!(config.site.last_update.is_some());
        assert_eq!(config.build.source_dir, "src");
        assert_eq!(config.build.output_dir, "public");
        assert_eq!(config.build.stylesheets.len(), 2);
        assert_eq!(config.build.indent_string(), "    ");
        assert_eq!(config.data.talks, "_data/my-talks.toml");
        assert_eq!(config.data.orcid, "_data/orcid.json");
        assert_eq!(config.menu.len(), 3);
        assert_eq!(config.menu[1].hook, Some(Hook::Talks));
        assert!(!config.menu[2].points_to_file());
        assert!(!config.menu[2].is_absolute());
        assert_eq!(config.pages[0].title, "About this website");
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("site.toml");
        std::fs::write(&config_path, "[site]\nauthor = \"Jane Doe\"\n").expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site.title, "Home page");
        assert_eq!(config.site.datetime_format, "%A, %B %d %Y at %H:%M");
        assert_eq!(config.build.source_dir, "webpage");
        assert_eq!(config.build.output_dir, "html");
        assert_eq!(config.build.template, "_template.html");
        assert_eq!(config.build.stylesheets, vec!["css/default.css"]);
        assert_eq!(config.build.indent_width, 2);
        assert_eq!(config.menu, vec![MenuEntry::new("Home", "index.html")]);
        assert!(config.pages.is_empty());
    }

    #[test]
    fn test_load_with_env_reads_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("site.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let config = Config::load_with_env(&config_path).expect("load config");
        assert_eq!(config.site.author, "Jane Doe");
        assert_eq!(config.menu.len(), 3);
        assert_eq!(config.menu[1].hook, Some(Hook::Talks));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("site.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let vars: config::Map<String, String> = [
            ("HOMEPAGE__BUILD__OUTPUT_DIR", "dist"),
            ("HOMEPAGE__SITE__AUTHOR", "J. Doe"),
            ("OTHER__BUILD__SOURCE_DIR", "elsewhere"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
        let env = config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(Some(vars));

        let config = Config::load_layered(&config_path, env).expect("load config");
        assert_eq!(config.build.output_dir, "dist");
        assert_eq!(config.site.author, "J. Doe");
        assert_eq!(config.build.source_dir, "src");
        assert_eq!(config.menu.len(), 3);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            Config::load_or_default(Path::new("/nonexistent/site.toml")).expect("defaults");
        assert_eq!(config.site.author, "Anonymous");
        assert_eq!(config.menu.len(), 1);
    }

    #[test]
    fn test_title_and_hook_lookup() {
        let config: Config = toml::from_str(&create_test_config()).expect("parse");

        assert_eq!(config.title_for("index.html"), Some("Home"));
        assert_eq!(config.title_for("about.html"), Some("About this website"));
        assert_eq!(config.title_for("misc.html"), None);
        assert_eq!(config.hook_for("talks.html"), Some(Hook::Talks));
        assert_eq!(config.hook_for("index.html"), None);
        assert!(config.uses_hook(Hook::Talks));
        assert!(!config.uses_hook(Hook::Publications));
    }

    #[test]
    fn test_config_validation_empty_author() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("site.toml");
        std::fs::write(&config_path, "[site]\nauthor = \"\"\n").expect("write");

        let result = Config::load(&config_path);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("author cannot be empty")
        );
    }

    #[test]
    fn test_config_validation_duplicate_menu_title() {
        let config: Config = toml::from_str(
            r#"
[[menu]]
title = "Home"
target = "index.html"

[[menu]]
title = "Home"
target = "home.html"
"#,
        )
        .expect("parse");

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate menu title"));
    }

    #[test]
    fn test_config_validation_same_source_and_output() {
        let mut config = Config::default();
        config.build.output_dir = config.build.source_dir.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/site.toml"));
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
