//! Build orchestration.
//!
//! Coordinates a deploy: validation, scanning, rendering, cleaning the
//! output tree, writing pages and copying assets. Everything that can fail
//! on the inputs runs before the output tree is touched.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::{DateTime, Utc};
use homepage_core::{Config, CoreError, Hook, Page, SourcePath, content::to_slash};
use homepage_parser::{ParserError, ParserRegistry};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    assets::{AssetError, AssetProcessor},
    data::DataError,
    html::{HtmlError, HtmlGenerator, SiteContext},
    menu::Menu,
    publications::PublicationList,
    scanner::{ScanError, SourceTree},
    talks::ConferenceList,
    template::{PAGE_VARIABLES, Template, TemplateError},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The source directory does not exist.
    #[error("source directory not found: {0}")]
    MissingSource(PathBuf),

    /// The source path exists but is not a directory.
    #[error("source path is not a directory: {0}")]
    SourceNotDirectory(PathBuf),

    /// The output directory is the source directory, one of its ancestors
    /// or lies inside it.
    #[error("output directory {output} overlaps the source directory {source_dir}")]
    OutputOverlapsSource { output: PathBuf, source_dir: PathBuf },

    /// A configured page has no source file.
    #[error("{referrer} points to '{target}', but no source page renders to it")]
    MissingPage { referrer: String, target: String },

    /// A referenced file is missing from the source tree.
    #[error("{what} not found: {path}")]
    MissingFile { what: &'static str, path: PathBuf },

    /// Two source files render to the same output path.
    #[error("both {first} and {second} render to {output}")]
    DuplicateOutput {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    /// Reading a source file failed.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to the output tree failed.
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Parsing a page failed.
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParserError,
    },

    /// Parser setup error.
    #[error("parser error: {0}")]
    Parser(#[from] ParserError),

    /// Scanning error.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Asset error.
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    /// Data include error.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] CoreError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of pages generated.
    pub pages: usize,

    /// Number of assets copied.
    pub assets: usize,

    /// Number of includes consumed.
    pub includes: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Outcome of a dry run.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Number of pages that would be generated.
    pub pages: usize,

    /// Number of assets that would be copied.
    pub assets: usize,

    /// Number of includes found.
    pub includes: usize,

    /// Non-fatal findings.
    pub warnings: Vec<String>,
}

impl CheckReport {
    /// Whether the check found nothing to report.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Everything known about a deploy before anything is written.
struct Prepared {
    source: PathBuf,
    output: PathBuf,
    tree: SourceTree,
    template: Template,
    builtin_template: bool,
    hooks: Vec<(Hook, String)>,
    last_update: DateTime<Utc>,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    source_dir: PathBuf,
    output_dir: PathBuf,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(
        config: Config,
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Create a builder using the configured directories, relative to `base`.
    #[must_use]
    pub fn from_config(config: Config, base: &Path) -> Self {
        let source_dir = base.join(&config.build.source_dir);
        let output_dir = base.join(&config.build.output_dir);
        Self::new(config, source_dir, output_dir)
    }

    /// The source directory.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// The output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();

        info!(
            source = %self.source_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        let prepared = self.prepare()?;
        let rendered = self.render_pages(&prepared)?;

        self.clean_output(&prepared.output)?;

        for (relative, html) in &rendered {
            let path = prepared.output.join(relative);
            write_file(&path, html)?;
            debug!(path = %path.display(), "wrote page");
        }
        info!(count = rendered.len(), "pages written");

        let report =
            AssetProcessor::new(&prepared.source, &prepared.output).process(&prepared.tree.assets)?;

        let stats = BuildStats {
            pages: rendered.len(),
            assets: report.files,
            includes: prepared.tree.includes.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            pages = stats.pages,
            assets = stats.assets,
            includes = stats.includes,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Validate and render everything without writing.
    pub fn check(&self) -> Result<CheckReport> {
        info!(source = %self.source_dir.display(), "checking site");

        let prepared = self.prepare()?;
        let rendered = self.render_pages(&prepared)?;

        let mut warnings = Vec::new();
        if prepared.builtin_template {
            warnings.push(format!(
                "template include '{}' not found, the built-in template is used",
                self.config.build.template
            ));
        }
        for page in &prepared.tree.pages {
            let Some(target) = page.target() else {
                continue;
            };
            if self.config.title_for(&target).is_none() {
                warnings.push(format!(
                    "page '{target}' is neither in the menu nor in [[pages]]"
                ));
            }
        }

        for warning in &warnings {
            warn!("{warning}");
        }

        Ok(CheckReport {
            pages: rendered.len(),
            assets: prepared.tree.assets.len(),
            includes: prepared.tree.includes.len(),
            warnings,
        })
    }

    /// Remove the output directory. Returns whether there was anything to
    /// remove.
    pub fn clean(&self) -> Result<bool> {
        let output = resolve(&self.output_dir).map_err(|source| BuildError::Read {
            path: self.output_dir.clone(),
            source,
        })?;
        if let Ok(source) = fs::canonicalize(&self.source_dir) {
            check_overlap(&source, &output)?;
        }
        if !output.exists() {
            debug!(dir = %output.display(), "nothing to clean");
            return Ok(false);
        }
        info!(dir = %output.display(), "removing output directory");
        fs::remove_dir_all(&output).map_err(|source| BuildError::Write {
            path: output.clone(),
            source,
        })?;
        Ok(true)
    }

    /// Validate paths and references, scan the tree, load the template and
    /// the hook data.
    fn prepare(&self) -> Result<Prepared> {
        let (source, output) = self.resolve_dirs()?;
        let tree = SourceTree::scan(&source)?;

        if let Some(clash) = tree.output_clash() {
            return Err(BuildError::DuplicateOutput {
                output: clash.output,
                first: clash.first,
                second: clash.second,
            });
        }

        self.validate_references(&source, &tree)?;
        let (template, builtin_template) = self.load_template(&source, &tree)?;
        let hooks = self.generate_hooks(&source)?;

        let last_update = self
            .config
            .site
            .last_update
            .or(tree.newest_mtime)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        Ok(Prepared {
            source,
            output,
            tree,
            template,
            builtin_template,
            hooks,
            last_update,
        })
    }

    fn resolve_dirs(&self) -> Result<(PathBuf, PathBuf)> {
        let source = fs::canonicalize(&self.source_dir).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                BuildError::MissingSource(self.source_dir.clone())
            } else {
                BuildError::Read {
                    path: self.source_dir.clone(),
                    source,
                }
            }
        })?;
        if !source.is_dir() {
            return Err(BuildError::SourceNotDirectory(self.source_dir.clone()));
        }

        let output = resolve(&self.output_dir).map_err(|source| BuildError::Read {
            path: self.output_dir.clone(),
            source,
        })?;
        check_overlap(&source, &output)?;

        debug!(source = %source.display(), output = %output.display(), "resolved directories");
        Ok((source, output))
    }

    /// Every configured page and stylesheet must exist in the source tree.
    fn validate_references(&self, source: &Path, tree: &SourceTree) -> Result<()> {
        let menu = Menu::new(&self.config.menu, self.config.build.indent_string());
        for entry in menu.page_entries() {
            if tree.page_for(&entry.target).is_none() {
                return Err(BuildError::MissingPage {
                    referrer: format!("menu entry '{}'", entry.title),
                    target: entry.target.clone(),
                });
            }
        }

        for page in &self.config.pages {
            if tree.page_for(&page.target).is_none() {
                return Err(BuildError::MissingPage {
                    referrer: format!("page '{}'", page.title),
                    target: page.target.clone(),
                });
            }
        }

        for sheet in &self.config.build.stylesheets {
            if !tree.has_asset(sheet) {
                return Err(BuildError::MissingFile {
                    what: "stylesheet",
                    path: source.join(sheet),
                });
            }
        }

        Ok(())
    }

    /// The template include if present, else the built-in template.
    fn load_template(&self, source: &Path, tree: &SourceTree) -> Result<(Template, bool)> {
        let name = &self.config.build.template;
        let (template, builtin) = if tree.has_include(name) {
            let path = source.join(name);
            let content = fs::read_to_string(&path).map_err(|source| BuildError::Read {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "using template include");
            (Template::new(name.as_str(), content), false)
        } else {
            info!(name = %name, "template include not found, using the built-in template");
            (Template::builtin(), true)
        };

        for placeholder in template.placeholders()? {
            if !placeholder.optional && !PAGE_VARIABLES.contains(&placeholder.name.as_str()) {
                return Err(TemplateError::MissingVariable {
                    template: template.name().to_string(),
                    name: placeholder.name,
                }
                .into());
            }
        }

        Ok((template, builtin))
    }

    /// Render the hooks used by the menu.
    fn generate_hooks(&self, source: &Path) -> Result<Vec<(Hook, String)>> {
        let unit = self.config.build.indent_string();
        let mut hooks = Vec::new();

        if self.config.uses_hook(Hook::Talks) {
            let path = data_file(source, &self.config.data.talks, "talks data")?;
            let talks = ConferenceList::load(&path)?;
            hooks.push((Hook::Talks, talks.render::<homepage_core::Html>(&unit)));
        }

        if self.config.uses_hook(Hook::Publications) {
            let path = data_file(source, &self.config.data.orcid, "ORCID record")?;
            let publications = PublicationList::load(&path)?;
            hooks.push((Hook::Publications, publications.html(&unit)));
        }

        Ok(hooks)
    }

    /// Parse and template every page, in memory.
    fn render_pages(&self, prepared: &Prepared) -> Result<Vec<(PathBuf, String)>> {
        let parser = ParserRegistry::with_theme(&self.config.build.syntax_theme)?;
        let site = SiteContext::new(&self.config, prepared.last_update)?;
        let generator = prepared.hooks.iter().fold(
            HtmlGenerator::new(&self.config, prepared.template.clone(), site),
            |generator, (hook, html)| generator.with_hook(*hook, html.as_str()),
        );

        info!(count = prepared.tree.pages.len(), "rendering pages");

        prepared
            .tree
            .pages
            .iter()
            .map(|source| -> Result<(PathBuf, String)> {
                let page = self.load_page(&prepared.source, source, &parser)?;
                let html = generator.generate_page(&page)?;
                let output = source
                    .output_path()
                    .unwrap_or_else(|| source.relative.with_extension("html"));
                Ok((output, html))
            })
            .collect()
    }

    fn load_page(
        &self,
        root: &Path,
        source: &SourcePath,
        parser: &ParserRegistry,
    ) -> Result<Page> {
        let path = root.join(&source.relative);
        let content = fs::read_to_string(&path).map_err(|e| BuildError::Read {
            path: path.clone(),
            source: e,
        })?;
        let parsed = parser
            .parse(&content, &source.relative)
            .map_err(|e| BuildError::Parse {
                path: path.clone(),
                source: e,
            })?;
        debug!(page = %to_slash(&source.relative), "parsed page");
        Ok(Page::from_parsed(parsed, source, &self.config))
    }

    /// Clean the output directory.
    fn clean_output(&self, output: &Path) -> Result<()> {
        if output.exists() {
            debug!(dir = %output.display(), "cleaning output directory");
            fs::remove_dir_all(output).map_err(|source| BuildError::Write {
                path: output.to_path_buf(),
                source,
            })?;
        }
        fs::create_dir_all(output).map_err(|source| BuildError::Write {
            path: output.to_path_buf(),
            source,
        })
    }
}

/// The output tree is wiped on every deploy, so it must share nothing with
/// the source tree.
fn check_overlap(source: &Path, output: &Path) -> Result<()> {
    if source.starts_with(output) || output.starts_with(source) {
        return Err(BuildError::OutputOverlapsSource {
            output: output.to_path_buf(),
            source_dir: source.to_path_buf(),
        });
    }
    Ok(())
}

fn data_file(source: &Path, relative: &str, what: &'static str) -> Result<PathBuf> {
    let path = source.join(relative);
    if !path.is_file() {
        return Err(BuildError::MissingFile { what, path });
    }
    Ok(path)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Absolute form of a path that may not exist yet, with every existing
/// ancestor canonicalized.
fn resolve(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(absolute),
        }
    }
    let mut resolved = existing.canonicalize()?;
    resolved.extend(missing.iter().rev());
    Ok(resolved)
}
