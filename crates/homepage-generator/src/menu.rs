//! Navigation menu.

use homepage_core::{
    MenuEntry,
    markup::{Html, Markup, indent},
};

/// The navigation menu shared by every page.
#[derive(Debug, Clone)]
pub struct Menu<'a> {
    entries: &'a [MenuEntry],
    indent_unit: String,
}

impl<'a> Menu<'a> {
    /// Create a menu over the configured entries.
    pub fn new(entries: &'a [MenuEntry], indent_unit: impl Into<String>) -> Self {
        Self {
            entries,
            indent_unit: indent_unit.into(),
        }
    }

    /// Entries that are rendered into pages by the deployer.
    pub fn page_entries(&self) -> impl Iterator<Item = &'a MenuEntry> {
        self.entries.iter().filter(|entry| entry.points_to_file())
    }

    /// Render the menu as seen from the page with the given output target.
    ///
    /// The current page is highlighted instead of linked, and every relative
    /// link is prefixed with `root` so that nested pages point back to the
    /// site root.
    pub fn html(&self, current_target: &str, root: &str) -> String {
        let items: Vec<String> = self
            .entries
            .iter()
            .map(|entry| {
                if entry.target == current_target {
                    Html::tag(&entry.title, "li", &[("class", "current")])
                } else {
                    let href = if entry.is_absolute() {
                        entry.target.clone()
                    } else {
                        format!("{root}{}", entry.target)
                    };
                    let link = Html::hyperlink(&entry.title, Some(&href));
                    Html::tag(&link, "li", &[])
                }
            })
            .collect();

        if items.is_empty() {
            return "<ul>\n</ul>".to_string();
        }

        format!(
            "<ul>\n{}\n</ul>",
            indent(&items.join("\n"), 1, &self.indent_unit)
        )
    }
}
