//! Conference presentations, rendered for the `talks` hook and the `talks`
//! command.
//!
//! The data include is a TOML file:
//!
//! ```toml
//! [[conference]]
//! name = "European Week of Astronomy and Space Science"
//! venue = "Liverpool (United Kingdom)"
//! url = "https://eas.unige.ch/EWASS2018/"
//! begin = "2018-04-03"
//! end = "2018-04-06"
//!
//! [[conference.contribution]]
//! title = "The Imaging X-ray Polarimetry Explorer (IXPE) Mission"
//! invited = true
//! ```

use std::path::Path;

use chrono::Datelike;
use homepage_core::{
    Timespan,
    markup::{Html, Latex, Markup, indent},
};
use serde::Deserialize;
use tracing::info;

use crate::data::{self, DataError, Result};

/// Block-level formatting needed by the talk list on top of [`Markup`].
pub trait ListMarkup: Markup {
    /// Forced line break.
    const LINE_BREAK: &'static str;

    /// Section heading.
    fn heading(text: &str) -> String;

    /// Bulleted list of pre-rendered items.
    fn itemize(items: &[String], unit: &str) -> String;
}

impl ListMarkup for Html {
    const LINE_BREAK: &'static str = "<br>";

    fn heading(text: &str) -> String {
        Html::tag(text, "h3", &[])
    }

    fn itemize(items: &[String], unit: &str) -> String {
        let items: Vec<String> = items
            .iter()
            .map(|item| format!("<li>\n{}\n</li>", indent(item, 1, unit)))
            .collect();
        format!(
            "<ul class=\"talks\">\n{}\n</ul>",
            indent(&items.join("\n"), 1, unit)
        )
    }
}

impl ListMarkup for Latex {
    const LINE_BREAK: &'static str = "\\\\";

    fn heading(text: &str) -> String {
        format!("\\subsection*{{{text}}}")
    }

    fn itemize(items: &[String], _unit: &str) -> String {
        let items: Vec<String> = items.iter().map(|item| format!("\\item {item}")).collect();
        format!("\\begin{{itemize}}\n{}\n\\end{{itemize}}", items.join("\n"))
    }
}

/// Output format of the talk list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TalksFormat {
    #[default]
    Html,
    Latex,
}

/// A contribution given at a conference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Contribution {
    pub title: String,

    #[serde(default)]
    pub invited: bool,

    #[serde(default)]
    pub poster: bool,

    #[serde(default)]
    pub notes: Option<String>,
}

impl Contribution {
    /// Parenthesized annotations, e.g. `(invited talk)`.
    fn annotations(&self) -> Option<String> {
        let mut notes = Vec::new();
        if self.invited {
            notes.push("invited talk");
        }
        if self.poster {
            notes.push("poster");
        }
        if let Some(extra) = self.notes.as_deref() {
            notes.push(extra);
        }
        (!notes.is_empty()).then(|| format!("({})", notes.join(", ")))
    }

    fn render<M: Markup>(&self) -> String {
        let title = M::emph(self.title.trim());
        match self.annotations() {
            Some(notes) => format!("{title} {notes}"),
            None => title,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConference {
    name: String,
    venue: String,
    #[serde(default)]
    url: Option<String>,
    begin: String,
    #[serde(default)]
    end: Option<String>,
    #[serde(default, rename = "contribution")]
    contributions: Vec<Contribution>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConferenceList {
    #[serde(default, rename = "conference")]
    conferences: Vec<RawConference>,
}

/// A conference and what was presented there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conference {
    pub name: String,
    pub venue: String,
    pub url: Option<String>,
    pub span: Timespan,
    pub contributions: Vec<Contribution>,
}

impl Conference {
    /// Year the conference started in.
    pub fn year(&self) -> i32 {
        self.span.begin().year()
    }

    fn render<M: ListMarkup>(&self) -> String {
        let mut lines: Vec<String> = self
            .contributions
            .iter()
            .map(|contribution| format!("{}{}", contribution.render::<M>(), M::LINE_BREAK))
            .collect();
        lines.push(format!(
            "{}, {}, {}",
            M::hyperlink(&self.name, self.url.as_deref()),
            self.venue,
            self.span.render::<M>()
        ));
        lines.join("\n")
    }
}

/// All the conference presentations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConferenceList {
    conferences: Vec<Conference>,
}

impl ConferenceList {
    /// Load the list from a TOML data include.
    pub fn load(path: &Path) -> Result<Self> {
        let raw: RawConferenceList = data::load_toml(path)?;
        let list = Self::from_raw(raw, path)?;
        info!(path = %path.display(), conferences = list.len(), "loaded talks");
        Ok(list)
    }

    /// Parse the list from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let path = Path::new("<inline>");
        let raw: RawConferenceList =
            toml::from_str(content).map_err(|source| DataError::Toml {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_raw(raw, path)
    }

    fn from_raw(raw: RawConferenceList, path: &Path) -> Result<Self> {
        let conferences = raw
            .conferences
            .into_iter()
            .map(|c| {
                let span = Timespan::parse(&c.begin, c.end.as_deref()).map_err(|e| {
                    DataError::Invalid {
                        path: path.to_path_buf(),
                        message: format!("conference '{}': {e}", c.name),
                    }
                })?;
                Ok(Conference {
                    name: c.name,
                    venue: c.venue,
                    url: c.url,
                    span,
                    contributions: c.contributions,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { conferences })
    }

    /// Number of conferences.
    pub fn len(&self) -> usize {
        self.conferences.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.conferences.is_empty()
    }

    /// Conferences grouped by year, newest first.
    ///
    /// Within a year conferences are sorted by begin date, newest first;
    /// conferences starting on the same day keep their file order.
    pub fn by_year(&self) -> Vec<(i32, Vec<&Conference>)> {
        let mut sorted: Vec<&Conference> = self.conferences.iter().collect();
        sorted.sort_by(|a, b| b.span.begin().cmp(&a.span.begin()));

        let mut groups: Vec<(i32, Vec<&Conference>)> = Vec::new();
        for conference in sorted {
            match groups.last_mut() {
                Some((year, items)) if *year == conference.year() => items.push(conference),
                _ => groups.push((conference.year(), vec![conference])),
            }
        }
        groups
    }

    /// Render the full list in the given markup.
    pub fn render<M: ListMarkup>(&self, unit: &str) -> String {
        self.by_year()
            .into_iter()
            .map(|(year, conferences)| {
                let items: Vec<String> = conferences.iter().map(|c| c.render::<M>()).collect();
                format!("{}\n{}", M::heading(&year.to_string()), M::itemize(&items, unit))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render in the requested format.
    pub fn render_as(&self, format: TalksFormat, unit: &str) -> String {
        match format {
            TalksFormat::Html => self.render::<Html>(unit),
            TalksFormat::Latex => self.render::<Latex>(unit),
        }
    }
}
