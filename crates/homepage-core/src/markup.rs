//! Small formatting helpers shared by HTML pages and LaTeX output.

/// Inline formatting in a given markup language.
pub trait Markup {
    /// Separator between the two ends of a date range.
    const RANGE_SEPARATOR: &'static str;

    /// Italic text.
    fn emph(text: &str) -> String;

    /// Bold text.
    fn bold(text: &str) -> String;

    /// Monospace text.
    fn typeset(text: &str) -> String;

    /// Hyperlink; plain text when there is no URL.
    fn hyperlink(text: &str, url: Option<&str>) -> String;
}

/// HTML markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html;

impl Html {
    /// Wrap text into a tag with optional attributes.
    pub fn tag(text: &str, tag: &str, attributes: &[(&str, &str)]) -> String {
        let attrs: String = attributes
            .iter()
            .map(|(key, value)| format!(" {key}=\"{}\"", escape_attribute(value)))
            .collect();
        format!("<{tag}{attrs}>{text}</{tag}>")
    }
}

impl Markup for Html {
    const RANGE_SEPARATOR: &'static str = "&ndash;";

    fn emph(text: &str) -> String {
        Self::tag(text, "em", &[])
    }

    fn bold(text: &str) -> String {
        Self::tag(text, "b", &[])
    }

    fn typeset(text: &str) -> String {
        Self::tag(text, "tt", &[])
    }

    fn hyperlink(text: &str, url: Option<&str>) -> String {
        match url {
            Some(url) => Self::tag(text, "a", &[("href", url)]),
            None => text.to_string(),
        }
    }
}

/// LaTeX markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latex;

impl Markup for Latex {
    const RANGE_SEPARATOR: &'static str = "--";

    fn emph(text: &str) -> String {
        format!("\\emph{{{text}}}")
    }

    fn bold(text: &str) -> String {
        format!("\\textbf{{{text}}}")
    }

    fn typeset(text: &str) -> String {
        format!("\\texttt{{{text}}}")
    }

    fn hyperlink(text: &str, url: Option<&str>) -> String {
        match url {
            Some(url) => format!("\\href{{{url}}}{{{text}}}"),
            None => text.to_string(),
        }
    }
}

/// Indent every non-empty line of a paragraph by `level` copies of `unit`.
///
/// Lines inside a `<pre>` element are preformatted and left untouched; only
/// the line opening the element is indented.
pub fn indent(text: &str, level: usize, unit: &str) -> String {
    let prefix = unit.repeat(level);
    let mut preformatted = false;
    text.lines()
        .map(|line| {
            let indented = if preformatted {
                line.to_string()
            } else if line.trim().is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            };
            preformatted = inside_pre_after(line, preformatted);
            indented
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether a `<pre>` element is still open at the end of `line`.
fn inside_pre_after(line: &str, open: bool) -> bool {
    let opened = ["<pre>", "<pre "]
        .iter()
        .filter_map(|tag| line.rfind(tag))
        .max();
    match (opened, line.rfind("</pre>")) {
        (Some(start), Some(end)) => start > end,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => open,
    }
}

/// Escape text for use inside HTML content.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text for use inside a double-quoted HTML attribute.
pub fn escape_attribute(s: &str) -> String {
    escape_html(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_tags() {
        let text = "Hello world!";
        assert_eq!(Html::emph(text), "<em>Hello world!</em>");
        assert_eq!(Html::bold(text), "<b>Hello world!</b>");
        assert_eq!(Html::typeset(text), "<tt>Hello world!</tt>");
    }

    #[test]
    fn test_html_hyperlink() {
        assert_eq!(
            Html::hyperlink("IXPE", Some("https://ixpe.msfc.nasa.gov/")),
            "<a href=\"https://ixpe.msfc.nasa.gov/\">IXPE</a>"
        );
        assert_eq!(Html::hyperlink("IXPE", None), "IXPE");
    }

    #[test]
    fn test_html_tag_attributes() {
        let html = Html::tag("x", "span", &[("class", "a"), ("title", "say \"hi\"")]);
        assert_eq!(html, "<span class=\"a\" title=\"say &quot;hi&quot;\">x</span>");
    }

    #[test]
    fn test_latex() {
        assert_eq!(Latex::emph("a"), "\\emph{a}");
        assert_eq!(Latex::bold("a"), "\\textbf{a}");
        assert_eq!(Latex::typeset("a"), "\\texttt{a}");
        assert_eq!(
            Latex::hyperlink("site", Some("https://example.org")),
            "\\href{https://example.org}{site}"
        );
        assert_eq!(Latex::hyperlink("site", None), "site");
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("<p>\nText\n</p>", 2, "  "), "    <p>\n    Text\n    </p>");
        assert_eq!(indent("a\n\nb", 1, "  "), "  a\n\n  b");
        assert_eq!(indent("a", 0, "  "), "a");
        assert_eq!(indent("", 3, "  "), "");
    }

    #[test]
    fn test_indent_keeps_preformatted_lines() {
        let html = "<p>Code:</p>\n<pre><code>line1\n  line2\n\n</code></pre>\n<p>End</p>";
        assert_eq!(
            indent(html, 1, "  "),
            "  <p>Code:</p>\n  <pre><code>line1\n  line2\n\n</code></pre>\n  <p>End</p>"
        );

        let html = "<pre style=\"color: red\">a\nb</pre><pre>c</pre>\nd";
        assert_eq!(
            indent(html, 1, "  "),
            "  <pre style=\"color: red\">a\nb</pre><pre>c</pre>\n  d"
        );
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attribute("\"q\""), "&quot;q&quot;");
    }
}
