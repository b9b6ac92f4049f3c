//! Full HTML pages from rendered page bodies.
//!
//! Fills the page template with the site-wide metadata, the navigation menu
//! and the page content.

use std::{collections::HashMap, fmt::Write};

use chrono::{DateTime, Datelike, Utc};
use homepage_core::{Config, Hook, Page, markup::indent};
use thiserror::Error;
use tracing::debug;

use crate::{
    menu::Menu,
    template::{Template, TemplateContext, TemplateError},
};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// A page asks for a hook whose content was not generated.
    #[error("no content available for the '{0:?}' hook")]
    MissingHook(Hook),

    /// The configured date format cannot be rendered.
    #[error("invalid datetime format '{0}'")]
    DateFormat(String),

    /// The copyright notice would run backwards.
    #[error("copyright start year {start} is after the last update year {end}")]
    Copyright { start: i32, end: i32 },
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Values shared by every page of a deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteContext {
    /// Formatted "last update" timestamp.
    pub last_update: String,

    /// Last year of the copyright notice.
    pub copyright_end: i32,
}

impl SiteContext {
    /// Derive the shared values from the last update time.
    pub fn new(config: &Config, last_update: DateTime<Utc>) -> Result<Self> {
        let format = &config.site.datetime_format;
        let mut formatted = String::new();
        write!(formatted, "{}", last_update.format(format))
            .map_err(|_| HtmlError::DateFormat(format.clone()))?;

        let copyright_end = last_update.year();
        if config.site.copyright_start > copyright_end {
            return Err(HtmlError::Copyright {
                start: config.site.copyright_start,
                end: copyright_end,
            });
        }

        Ok(Self {
            last_update: formatted,
            copyright_end,
        })
    }
}

/// HTML page generator.
#[derive(Debug)]
pub struct HtmlGenerator<'a> {
    config: &'a Config,
    template: Template,
    menu: Menu<'a>,
    site: SiteContext,
    hooks: HashMap<Hook, String>,
    unit: String,
}

impl<'a> HtmlGenerator<'a> {
    /// Create a new generator.
    #[must_use]
    pub fn new(config: &'a Config, template: Template, site: SiteContext) -> Self {
        let unit = config.build.indent_string();
        Self {
            config,
            template,
            menu: Menu::new(&config.menu, unit.clone()),
            site,
            hooks: HashMap::new(),
            unit,
        }
    }

    /// Provide the generated HTML for a hook.
    #[must_use]
    pub fn with_hook(mut self, hook: Hook, html: impl Into<String>) -> Self {
        self.hooks.insert(hook, html.into());
        self
    }

    /// Generate the complete HTML document for a page.
    pub fn generate_page(&self, page: &Page) -> Result<String> {
        debug!(target = %page.target, title = %page.title, "generating HTML for page");
        let ctx = self.build_context(page)?;
        Ok(self.template.render(&ctx)?)
    }

    /// Build the template context for a page.
    pub fn build_context(&self, page: &Page) -> Result<TemplateContext> {
        let site = &self.config.site;
        let build = &self.config.build;

        let mut keywords = site.keywords.clone();
        keywords.extend(page.keywords.iter().cloned());

        let ctx = TemplateContext::new()
            .with_var("title", &page.title)
            .with_var("base_title", &site.title)
            .with_var("header", site.header())
            .with_var("author", &site.author)
            .with_var(
                "description",
                page.description.clone().unwrap_or_else(|| site.description()),
            )
            .with_var("keywords", keywords.join(", "))
            .with_var("stylesheets", self.stylesheets_html(&page.root))
            .with_var(
                "menu",
                indent(&self.menu.html(&page.target, &page.root), build.menu_indent, &self.unit),
            )
            .with_var(
                "content",
                indent(&self.content_html(page)?, build.content_indent, &self.unit),
            )
            .with_var("root", &page.root)
            .with_var("copyright_start", site.copyright_start.to_string())
            .with_var("copyright_end", self.site.copyright_end.to_string())
            .with_var("last_update", &self.site.last_update);

        Ok(ctx)
    }

    /// Page body followed by the hook output, if any.
    fn content_html(&self, page: &Page) -> Result<String> {
        let Some(hook) = page.hook else {
            return Ok(page.content.clone());
        };
        let generated = self.hooks.get(&hook).ok_or(HtmlError::MissingHook(hook))?;
        if page.content.is_empty() {
            Ok(generated.clone())
        } else {
            Ok(format!("{}\n{generated}", page.content))
        }
    }

    /// One `<link>` element per stylesheet, at `<head>` child depth.
    fn stylesheets_html(&self, root: &str) -> String {
        let links: Vec<String> = self
            .config
            .build
            .stylesheets
            .iter()
            .map(|sheet| {
                format!(
                    "<link rel=\"stylesheet\" href=\"{root}{sheet}\" type=\"text/css\" media=\"all\">"
                )
            })
            .collect();
        indent(&links.join("\n"), 2, &self.unit)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::TimeZone;
    use homepage_core::MenuEntry;

    use super::*;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.site.author = "Jane Doe".to_string();
        config.site.title = "Jane Doe @ Physics".to_string();
        config.site.keywords = vec!["Physics".to_string(), "IXPE".to_string()];
        config.menu = vec![
            MenuEntry::new("Home", "index.html"),
            MenuEntry::new("Presentations", "talks.html").with_hook(Hook::Talks),
        ];
        config
    }

    fn last_update() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap()
    }

    fn page(target: &str, root: &str, content: &str, hook: Option<Hook>) -> Page {
        Page {
            target: target.to_string(),
            title: "Home".to_string(),
            description: None,
            keywords: Vec::new(),
            content: content.to_string(),
            hook,
            root: root.to_string(),
            source_path: PathBuf::from("index.md"),
        }
    }

    #[test]
    fn test_site_context() {
        let site = SiteContext::new(&test_config(), last_update()).unwrap();
        assert_eq!(site.last_update, "Wednesday, May 01 2024 at 10:30");
        assert_eq!(site.copyright_end, 2024);
    }

    #[test]
    fn test_site_context_copyright_backwards() {
        let mut config = test_config();
        config.site.copyright_start = 2030;

        let err = SiteContext::new(&config, last_update()).unwrap_err();
        assert!(matches!(err, HtmlError::Copyright { start: 2030, end: 2024 }));
    }

    #[test]
    fn test_generate_page() {
        let config = test_config();
        let site = SiteContext::new(&config, last_update()).unwrap();
        let generator = HtmlGenerator::new(&config, Template::builtin(), site);

        let html = generator
            .generate_page(&page("index.html", "", "<p>\nWelcome\n</p>", None))
            .unwrap();

        assert!(html.contains("<title>Jane Doe @ Physics :: Home</title>"));
        assert!(html.contains("<meta name=\"keywords\" content=\"Physics, IXPE\">"));
        assert!(html.contains("<meta name=\"description\" content=\"Jane Doe's home page\">"));
        assert!(html.contains(
            "    <link rel=\"stylesheet\" href=\"css/default.css\" type=\"text/css\" media=\"all\">\n"
        ));
        assert!(html.contains("        <ul>\n          <li class=\"current\">Home</li>\n"));
        assert!(html.contains("        <h2>Home</h2>\n        <p>\n        Welcome\n        </p>\n"));
        assert!(html.contains("Copyright &copy; 2012&ndash;2024 Jane Doe."));
        assert!(html.contains("Last update on Wednesday, May 01 2024 at 10:30."));
    }

    #[test]
    fn test_nested_page_links_to_root() {
        let config = test_config();
        let site = SiteContext::new(&config, last_update()).unwrap();
        let generator = HtmlGenerator::new(&config, Template::builtin(), site);

        let html = generator
            .generate_page(&page("teaching/index.html", "../", "<p>x</p>", None))
            .unwrap();

        assert!(html.contains("href=\"../css/default.css\""));
        assert!(html.contains("<a href=\"../index.html\">Home</a>"));
    }

    #[test]
    fn test_hook_is_appended() {
        let config = test_config();
        let site = SiteContext::new(&config, last_update()).unwrap();
        let generator = HtmlGenerator::new(&config, Template::new("t", "{{ content }}"), site)
            .with_hook(Hook::Talks, "<h3>2018</h3>");

        let html = generator
            .generate_page(&page("talks.html", "", "<p>Talks</p>", Some(Hook::Talks)))
            .unwrap();
        assert_eq!(html, "        <p>Talks</p>\n        <h3>2018</h3>");

        let html = generator
            .generate_page(&page("talks.html", "", "", Some(Hook::Talks)))
            .unwrap();
        assert_eq!(html, "        <h3>2018</h3>");
    }

    #[test]
    fn test_missing_hook() {
        let config = test_config();
        let site = SiteContext::new(&config, last_update()).unwrap();
        let generator = HtmlGenerator::new(&config, Template::builtin(), site);

        let result = generator.generate_page(&page("talks.html", "", "", Some(Hook::Talks)));
        assert!(matches!(result, Err(HtmlError::MissingHook(Hook::Talks))));
    }

    #[test]
    fn test_page_metadata_overrides() {
        let config = test_config();
        let site = SiteContext::new(&config, last_update()).unwrap();
        let generator = HtmlGenerator::new(&config, Template::builtin(), site);

        let mut page = page("index.html", "", "", None);
        page.description = Some("Teaching material".to_string());
        page.keywords = vec!["Didattica".to_string()];

        let ctx = generator.build_context(&page).unwrap();
        assert_eq!(ctx.get("description"), Some("Teaching material"));
        assert_eq!(ctx.get("keywords"), Some("Physics, IXPE, Didattica"));
        assert_eq!(ctx.get("root"), Some(""));
    }
}
