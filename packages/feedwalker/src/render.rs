//! Output rendering for walked records.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use console::style;
use quick_xml::escape::escape;
use serde::Serialize;
use textwrap::{fill, Options};

use crate::error::Result;
use crate::types::{Entry, FeedKind, FeedRecords, Sale};

/// Width used when wrapping summaries in text output.
const TEXT_WIDTH: usize = 80;

/// Indentation for wrapped summary lines.
const SUMMARY_INDENT: &str = "    ";

/// Output formats supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing.
    #[default]
    Text,
    Yaml,
    Json,
    /// HTML fragment with one linked paragraph per record.
    Html,
}

/// Serialized document shape shared by YAML and JSON output.
#[derive(Debug, Serialize)]
struct RecordDocument<'a> {
    kind: FeedKind,
    count: usize,
    records: &'a FeedRecords,
}

/// Render records in the requested format.
///
/// `include_summaries` only affects text and HTML output; the structured
/// formats always carry every field.
pub fn render(
    records: &FeedRecords,
    format: OutputFormat,
    include_summaries: bool,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(records, include_summaries)),
        OutputFormat::Yaml => Ok(serde_yaml_ng::to_string(&document(records))?),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&document(records))?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Html => Ok(render_html(records, include_summaries)),
    }
}

/// Write rendered output to `path`, or to stdout when no path is given.
pub fn write_output(rendered: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => fs::write(path, rendered)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn document(records: &FeedRecords) -> RecordDocument<'_> {
    RecordDocument {
        kind: records.kind(),
        count: records.len(),
        records,
    }
}

fn render_text(records: &FeedRecords, include_summaries: bool) -> String {
    let mut out = String::new();
    match records {
        FeedRecords::Entries(entries) => {
            for entry in entries {
                write_text_entry(&mut out, entry, include_summaries);
            }
        }
        FeedRecords::Sales(sales) => {
            for sale in sales {
                write_text_sale(&mut out, sale);
            }
        }
    }
    out
}

fn write_text_entry(out: &mut String, entry: &Entry, include_summaries: bool) {
    let _ = writeln!(out, "{}", style(&entry.title).bold());
    if !entry.link.is_empty() {
        let _ = writeln!(out, "{SUMMARY_INDENT}{}", style(&entry.link).cyan());
    }
    if include_summaries && !entry.summary.is_empty() {
        let options = Options::new(TEXT_WIDTH)
            .initial_indent(SUMMARY_INDENT)
            .subsequent_indent(SUMMARY_INDENT);
        let _ = writeln!(out, "{}", fill(&entry.summary, options));
    }
    out.push('\n');
}

fn write_text_sale(out: &mut String, sale: &Sale) {
    let _ = writeln!(
        out,
        "{}  {}",
        style(&sale.earnings).green().bold(),
        style(&sale.title).bold()
    );
    if !sale.thumbnail_url.is_empty() {
        let _ = writeln!(out, "{SUMMARY_INDENT}{}", style(&sale.thumbnail_url).cyan());
    }
    out.push('\n');
}

fn render_html(records: &FeedRecords, include_summaries: bool) -> String {
    let heading = match records.kind() {
        FeedKind::Atom => "Feed Summary",
        FeedKind::Sales => "Latest Sales",
    };
    let updated = chrono::Local::now().format("%b %-d %Y %-I:%M%p");

    let mut out = String::new();
    let _ = writeln!(out, "<h3>{heading}</h3>");
    let _ = writeln!(out, "<em>Updated {updated}</em>");

    match records {
        FeedRecords::Entries(entries) => {
            for entry in entries {
                let _ = writeln!(
                    out,
                    "<p><a href=\"{}\">{}</a></p>",
                    escape_html(&entry.link),
                    escape_html(&entry.title)
                );
                if include_summaries {
                    let _ = writeln!(out, "{}", escape_html(&entry.summary));
                }
            }
        }
        FeedRecords::Sales(sales) => {
            for sale in sales {
                let _ = writeln!(
                    out,
                    "<p><img src=\"{}\" alt=\"\"/> {} <strong>{}</strong></p>",
                    escape_html(&sale.thumbnail_url),
                    escape_html(&sale.title),
                    escape_html(&sale.earnings)
                );
            }
        }
    }
    out
}

/// Escape the characters that are significant in HTML text and attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    escape(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries() -> FeedRecords {
        FeedRecords::Entries(vec![
            Entry::new("First <post>", "Body & more", "https://example.com/q/1"),
            Entry::new("Second", "", ""),
        ])
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_render_json_shape() {
        let json = render(&entries(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "atom");
        assert_eq!(value["count"], 2);
        assert_eq!(value["records"][0]["title"], "First <post>");
        assert_eq!(value["records"][1]["link"], "");
    }

    #[test]
    fn test_render_yaml_sales() {
        let records = FeedRecords::Sales(vec![Sale::new("$12.50", "Widget", "http://img/1.png")]);
        let yaml = render(&records, OutputFormat::Yaml, false).unwrap();
        assert!(yaml.contains("kind: sales"));
        assert!(yaml.contains("count: 1"));
        assert!(yaml.contains("thumbnail_url: http://img/1.png"));
    }

    #[test]
    fn test_render_html_entries() {
        let html = render(&entries(), OutputFormat::Html, true).unwrap();
        assert!(html.starts_with("<h3>Feed Summary</h3>\n<em>Updated "));
        assert!(html.contains(
            "<p><a href=\"https://example.com/q/1\">First &lt;post&gt;</a></p>\nBody &amp; more\n"
        ));
    }

    #[test]
    fn test_render_html_without_summaries() {
        let html = render(&entries(), OutputFormat::Html, false).unwrap();
        assert!(!html.contains("Body"));
    }

    #[test]
    fn test_render_text_wraps_summaries() {
        let long = "word ".repeat(40);
        let records = FeedRecords::Entries(vec![Entry::new("T", long.trim(), "")]);
        let text = render(&records, OutputFormat::Text, true).unwrap();
        let summary_lines: Vec<&str> = text
            .lines()
            .filter(|line| line.starts_with(SUMMARY_INDENT))
            .collect();
        assert!(summary_lines.len() > 1);
        assert!(summary_lines.iter().all(|line| line.len() <= TEXT_WIDTH));
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_output("{}\n", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }
}
