//! Publication list from a cached ORCID record, for the `publications` hook.
//!
//! Only the small part of the ORCID public API schema needed here is
//! modelled; every other field of the record is ignored.

use std::{cmp::Reverse, path::Path};

use homepage_core::markup::{Html, Markup, escape_attribute, escape_html, indent};
use serde::Deserialize;
use tracing::{info, warn};

use crate::data::{self, Result};

/// Resolver for DOI links.
pub const DOI_RESOLVER: &str = "https://doi.org/";

#[derive(Debug, Deserialize)]
struct OrcidRecord {
    #[serde(rename = "activities-summary")]
    activities_summary: ActivitiesSummary,
}

#[derive(Debug, Deserialize)]
struct ActivitiesSummary {
    works: Works,
}

#[derive(Debug, Deserialize)]
struct Works {
    #[serde(default)]
    group: Vec<WorkGroup>,
}

#[derive(Debug, Deserialize)]
struct WorkGroup {
    #[serde(default, rename = "work-summary")]
    work_summary: Vec<WorkSummary>,
}

#[derive(Debug, Deserialize)]
struct WorkSummary {
    #[serde(default)]
    title: Option<WorkTitle>,
    #[serde(default, rename = "journal-title")]
    journal_title: Option<StringValue>,
    #[serde(default, rename = "publication-date")]
    publication_date: Option<PublicationDate>,
    #[serde(default, rename = "external-ids")]
    external_ids: Option<ExternalIds>,
}

#[derive(Debug, Deserialize)]
struct WorkTitle {
    #[serde(default)]
    title: Option<StringValue>,
}

#[derive(Debug, Deserialize)]
struct StringValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct PublicationDate {
    #[serde(default)]
    year: Option<StringValue>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    #[serde(default, rename = "external-id")]
    external_id: Vec<ExternalId>,
}

#[derive(Debug, Deserialize)]
struct ExternalId {
    #[serde(rename = "external-id-type")]
    id_type: String,
    #[serde(rename = "external-id-value")]
    value: String,
}

/// A single work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub title: String,
    pub journal: Option<String>,
    pub year: Option<i32>,
    pub doi: Option<String>,
}

impl Publication {
    fn from_summary(summary: WorkSummary) -> Option<Self> {
        let title = summary
            .title
            .and_then(|t| t.title)
            .map(|v| v.value.trim().to_string())
            .filter(|t| !t.is_empty())?;

        let year = summary
            .publication_date
            .and_then(|d| d.year)
            .and_then(|y| match y.value.trim().parse() {
                Ok(year) => Some(year),
                Err(_) => {
                    warn!(title = %title, year = %y.value, "ignoring malformed publication year");
                    None
                }
            });

        let doi = summary.external_ids.and_then(|ids| {
            ids.external_id
                .into_iter()
                .find(|id| id.id_type.eq_ignore_ascii_case("doi"))
                .map(|id| id.value.trim().to_string())
        });

        Some(Self {
            title,
            journal: summary
                .journal_title
                .map(|j| j.value.trim().to_string())
                .filter(|j| !j.is_empty()),
            year,
            doi,
        })
    }

    /// Render as the content of a list item.
    fn html(&self) -> String {
        let mut parts = vec![Html::emph(&escape_html(&self.title))];
        if let Some(journal) = &self.journal {
            parts.push(escape_html(journal));
        }
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        if let Some(doi) = &self.doi {
            let href = format!("{DOI_RESOLVER}{doi}");
            parts.push(format!(
                "<a href=\"{}\">doi:{}</a>",
                escape_attribute(&href),
                escape_html(doi)
            ));
        }
        parts.join(", ")
    }
}

/// The works of an ORCID record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationList {
    publications: Vec<Publication>,
}

impl PublicationList {
    /// Load the list from a cached ORCID record.
    pub fn load(path: &Path) -> Result<Self> {
        let record: OrcidRecord = data::load_json(path)?;
        let list = Self::from_record(record);
        info!(path = %path.display(), works = list.len(), "loaded publications");
        Ok(list)
    }

    /// Parse the list from ORCID JSON text.
    pub fn from_json_str(content: &str) -> std::result::Result<Self, serde_json::Error> {
        Ok(Self::from_record(serde_json::from_str(content)?))
    }

    fn from_record(record: OrcidRecord) -> Self {
        let mut publications: Vec<Publication> = record
            .activities_summary
            .works
            .group
            .into_iter()
            .filter_map(|group| group.work_summary.into_iter().next())
            .filter_map(Publication::from_summary)
            .collect();
        // Stable: works from the same year keep the record order.
        publications.sort_by_key(|p| Reverse(p.year));
        Self { publications }
    }

    /// Publications, newest first.
    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    /// Number of publications.
    pub fn len(&self) -> usize {
        self.publications.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.publications.is_empty()
    }

    /// Render as an ordered HTML list.
    pub fn html(&self, unit: &str) -> String {
        if self.publications.is_empty() {
            return "<ol class=\"publications\">\n</ol>".to_string();
        }
        let items: Vec<String> = self
            .publications
            .iter()
            .map(|p| Html::tag(&p.html(), "li", &[]))
            .collect();
        format!(
            "<ol class=\"publications\">\n{}\n</ol>",
            indent(&items.join("\n"), 1, unit)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
  "orcid-identifier": {"path": "0000-0002-9785-7726"},
  "activities-summary": {
    "works": {
      "last-modified-date": null,
      "group": [
        {
          "work-summary": [
            {
              "put-code": 1,
              "title": {"title": {"value": "Undated note"}, "subtitle": null},
              "journal-title": null,
              "publication-date": null,
              "external-ids": {"external-id": []}
            }
          ]
        },
        {
          "work-summary": [
            {
              "title": {"title": {"value": "The Imaging X-ray Polarimetry Explorer"}},
              "journal-title": {"value": "Journal of Astronomical Telescopes"},
              "publication-date": {"year": {"value": "2022"}, "month": {"value": "07"}},
              "external-ids": {
                "external-id": [
                  {"external-id-type": "bibcode", "external-id-value": "2022JATIS"},
                  {"external-id-type": "doi", "external-id-value": "10.1117/1.JATIS.8.2.026002"}
                ]
              }
            },
            {
              "title": {"title": {"value": "Duplicate from another source"}}
            }
          ]
        },
        {
          "work-summary": [
            {
              "title": {"title": {"value": "Fermi LAT <calibration>"}},
              "publication-date": {"year": {"value": "2009"}}
            }
          ]
        },
        {"work-summary": []}
      ]
    }
  }
}"#;

    #[test]
    fn test_parse_record() {
        let list = PublicationList::from_json_str(RECORD).unwrap();
        let titles: Vec<&str> = list.publications().iter().map(|p| p.title.as_str()).collect();

        assert_eq!(
            titles,
            [
                "The Imaging X-ray Polarimetry Explorer",
                "Fermi LAT <calibration>",
                "Undated note"
            ]
        );

        let ixpe = &list.publications()[0];
        assert_eq!(ixpe.year, Some(2022));
        assert_eq!(ixpe.doi.as_deref(), Some("10.1117/1.JATIS.8.2.026002"));
        assert_eq!(ixpe.journal.as_deref(), Some("Journal of Astronomical Telescopes"));
    }

    #[test]
    fn test_render_html() {
        let list = PublicationList::from_json_str(RECORD).unwrap();
        let html = list.html("  ");

        assert!(html.starts_with("<ol class=\"publications\">\n  <li><em>The Imaging"));
        assert!(html.contains(
            "<a href=\"https://doi.org/10.1117/1.JATIS.8.2.026002\">doi:10.1117/1.JATIS.8.2.026002</a>"
        ));
        assert!(html.contains("<li><em>Fermi LAT &lt;calibration&gt;</em>, 2009</li>"));
        assert!(html.contains("<li><em>Undated note</em></li>"));
        assert!(html.ends_with("\n</ol>"));
    }

    #[test]
    fn test_empty_record() {
        let list =
            PublicationList::from_json_str(r#"{"activities-summary": {"works": {"group": []}}}"#)
                .unwrap();
        assert!(list.is_empty());
        assert_eq!(list.html("  "), "<ol class=\"publications\">\n</ol>");
    }

    #[test]
    fn test_malformed_record() {
        assert!(PublicationList::from_json_str(r#"{"works": []}"#).is_err());
    }
}
