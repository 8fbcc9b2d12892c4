//! Event cursor over an XML byte stream.

use std::fmt;
use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{FeedError, Result};

/// Kind of the event the cursor is positioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Nothing has been read yet.
    StartDocument,
    /// An opening tag (`<entry>`), including the opening half of `<link/>`.
    StartTag,
    /// A closing tag (`</entry>`), including the closing half of `<link/>`.
    EndTag,
    /// Non-empty character data between tags.
    Text,
    /// The input is exhausted.
    EndDocument,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StartDocument => "start of document",
            Self::StartTag => "start tag",
            Self::EndTag => "end tag",
            Self::Text => "text",
            Self::EndDocument => "end of document",
        };
        f.write_str(name)
    }
}

/// Forward-only cursor over the events of one XML document.
///
/// Accessors describe the event the cursor currently sits on; only
/// [`advance`](Self::advance) moves it.
pub trait EventCursor {
    /// Kind of the current event.
    fn event(&self) -> EventKind;

    /// Tag name of the current start or end tag.
    fn name(&self) -> Option<&str>;

    /// Attribute value of the current start tag.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Character data of the current text event.
    fn text(&self) -> Option<&str>;

    /// Move to the next event and return its kind.
    fn advance(&mut self) -> Result<EventKind>;

    /// Advance to the next start or end tag, stepping over blank text.
    ///
    /// Any other event (non-blank text, end of document) is a structural
    /// error.
    fn next_tag(&mut self) -> Result<EventKind> {
        let mut kind = self.advance()?;
        if kind == EventKind::Text && self.text().is_some_and(|t| t.trim().is_empty()) {
            kind = self.advance()?;
        }
        match kind {
            EventKind::StartTag | EventKind::EndTag => Ok(kind),
            _ => Err(FeedError::structural("start or end tag", self.describe())),
        }
    }

    /// Fail unless the cursor sits on `kind` with tag name `name`.
    fn require(&self, kind: EventKind, name: &str) -> Result<()> {
        if self.event() == kind && self.name() == Some(name) {
            Ok(())
        } else {
            Err(FeedError::structural(
                describe_event(kind, Some(name)),
                self.describe(),
            ))
        }
    }

    /// Human-readable description of the current event, for error messages.
    fn describe(&self) -> String {
        describe_event(self.event(), self.name())
    }
}

fn describe_event(kind: EventKind, name: Option<&str>) -> String {
    match (kind, name) {
        (EventKind::StartTag, Some(name)) => format!("start tag <{name}>"),
        (EventKind::EndTag, Some(name)) => format!("end tag </{name}>"),
        (kind, _) => kind.to_string(),
    }
}

/// [`EventCursor`] backed by a `quick-xml` reader.
///
/// Namespaces are not processed: a prefixed tag such as `atom:entry` is
/// reported under its full literal name. Empty elements are expanded into a
/// start tag followed by an end tag. Declarations, comments and processing
/// instructions are stepped over.
///
/// Adjacent character data (text, entities, CDATA sections, including runs
/// split by comments or processing instructions) is merged into one text
/// event and trimmed at its ends. Runs that are blank after trimming never
/// surface as events.
///
/// The cursor owns its reader; dropping the cursor drops the stream.
pub struct PullCursor<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// Tag or end-of-document event read past the end of a text run.
    pending: Option<Event<'static>>,
    kind: EventKind,
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
}

impl<R: BufRead> PullCursor<R> {
    /// Create a cursor positioned before the first event of `reader`.
    pub fn from_reader(reader: R) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.config_mut().expand_empty_elements = true;

        Self {
            reader,
            buf: Vec::with_capacity(1024),
            pending: None,
            kind: EventKind::StartDocument,
            name: String::new(),
            attributes: Vec::new(),
            text: String::new(),
        }
    }

    fn next_raw(&mut self) -> Result<Event<'static>> {
        if let Some(event) = self.pending.take() {
            return Ok(event);
        }
        self.buf.clear();
        Ok(self.reader.read_event_into(&mut self.buf)?.into_owned())
    }

    /// Make `event` (a tag or end of document) the current event.
    fn load(&mut self, event: Event<'static>) -> Result<EventKind> {
        self.attributes.clear();
        match event {
            Event::Start(start) => {
                self.name.clear();
                self.name.push_str(std::str::from_utf8(start.name().as_ref())?);
                for attr in start.attributes() {
                    let attr = attr?;
                    let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
                    let value = attr.unescape_value()?.into_owned();
                    self.attributes.push((key, value));
                }
                self.kind = EventKind::StartTag;
            }
            Event::End(end) => {
                self.name.clear();
                self.name.push_str(std::str::from_utf8(end.name().as_ref())?);
                self.kind = EventKind::EndTag;
            }
            _ => {
                self.name.clear();
                self.kind = EventKind::EndDocument;
            }
        }
        Ok(self.kind)
    }
}

impl<R: BufRead> EventCursor for PullCursor<R> {
    fn event(&self) -> EventKind {
        self.kind
    }

    fn name(&self) -> Option<&str> {
        match self.kind {
            EventKind::StartTag | EventKind::EndTag => Some(&self.name),
            _ => None,
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        if self.kind != EventKind::StartTag {
            return None;
        }
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn text(&self) -> Option<&str> {
        (self.kind == EventKind::Text).then_some(self.text.as_str())
    }

    fn advance(&mut self) -> Result<EventKind> {
        let mut run = String::new();
        loop {
            match self.next_raw()? {
                Event::Text(text) => run.push_str(&text.unescape()?),
                Event::CData(cdata) => run.push_str(std::str::from_utf8(&cdata.into_inner())?),
                event @ (Event::Start(_) | Event::End(_) | Event::Eof) => {
                    let trimmed = run.trim();
                    if trimmed.is_empty() {
                        return self.load(event);
                    }
                    self.pending = Some(event);
                    self.text.clear();
                    self.text.push_str(trimmed);
                    self.attributes.clear();
                    self.kind = EventKind::Text;
                    return Ok(self.kind);
                }
                // Declarations, comments, processing instructions, doctype.
                _ => {}
            }
        }
    }
}

impl<R> fmt::Debug for PullCursor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullCursor")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("text", &self.text)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(xml: &str) -> PullCursor<&[u8]> {
        PullCursor::from_reader(xml.as_bytes())
    }

    fn events(xml: &str) -> Vec<(EventKind, String)> {
        let mut cursor = cursor(xml);
        let mut out = Vec::new();
        loop {
            let kind = cursor.advance().unwrap();
            let label = match kind {
                EventKind::Text => cursor.text().unwrap().to_string(),
                _ => cursor.name().unwrap_or_default().to_string(),
            };
            out.push((kind, label));
            if kind == EventKind::EndDocument {
                return out;
            }
        }
    }

    #[test]
    fn test_initial_state() {
        let cursor = cursor("<feed/>");
        assert_eq!(cursor.event(), EventKind::StartDocument);
        assert_eq!(cursor.name(), None);
        assert_eq!(cursor.describe(), "start of document");
    }

    #[test]
    fn test_event_sequence_skips_prolog_and_blank_text() {
        let xml = "<?xml version=\"1.0\"?>\n<!-- c -->\n<feed>\n  <title>Hi</title>\n</feed>\n";
        assert_eq!(
            events(xml),
            vec![
                (EventKind::StartTag, "feed".to_string()),
                (EventKind::StartTag, "title".to_string()),
                (EventKind::Text, "Hi".to_string()),
                (EventKind::EndTag, "title".to_string()),
                (EventKind::EndTag, "feed".to_string()),
                (EventKind::EndDocument, String::new()),
            ]
        );
    }

    #[test]
    fn test_empty_element_expands() {
        assert_eq!(
            events("<link/>"),
            vec![
                (EventKind::StartTag, "link".to_string()),
                (EventKind::EndTag, "link".to_string()),
                (EventKind::EndDocument, String::new()),
            ]
        );
    }

    #[test]
    fn test_attributes_only_on_start_tag() {
        let mut cursor = cursor(r#"<link rel="alternate" href="http://x?a=1&amp;b=2"/>"#);
        cursor.advance().unwrap();
        assert_eq!(cursor.attribute("rel"), Some("alternate"));
        assert_eq!(cursor.attribute("href"), Some("http://x?a=1&b=2"));
        assert_eq!(cursor.attribute("missing"), None);

        cursor.advance().unwrap();
        assert_eq!(cursor.event(), EventKind::EndTag);
        assert_eq!(cursor.attribute("rel"), None);
    }

    #[test]
    fn test_text_is_unescaped_and_trimmed() {
        let mut cursor = cursor("<t>  a &lt; b  </t>");
        cursor.advance().unwrap();
        assert_eq!(cursor.advance().unwrap(), EventKind::Text);
        assert_eq!(cursor.text(), Some("a < b"));
        assert_eq!(cursor.name(), None);
    }

    #[test]
    fn test_cdata_is_text() {
        let mut cursor = cursor("<t><![CDATA[<b>raw</b>]]></t>");
        cursor.advance().unwrap();
        assert_eq!(cursor.advance().unwrap(), EventKind::Text);
        assert_eq!(cursor.text(), Some("<b>raw</b>"));
    }

    #[test]
    fn test_text_split_by_comment_is_one_event() {
        assert_eq!(
            events("<t>Hello <!-- c --> world</t>"),
            vec![
                (EventKind::StartTag, "t".to_string()),
                (EventKind::Text, "Hello  world".to_string()),
                (EventKind::EndTag, "t".to_string()),
                (EventKind::EndDocument, String::new()),
            ]
        );
    }

    #[test]
    fn test_text_and_cdata_merge() {
        let mut cursor = cursor("<t>Intro <![CDATA[<b>x</b>]]><?pi data?> &amp; more</t>");
        cursor.advance().unwrap();
        assert_eq!(cursor.advance().unwrap(), EventKind::Text);
        assert_eq!(cursor.text(), Some("Intro <b>x</b> & more"));
        assert_eq!(cursor.advance().unwrap(), EventKind::EndTag);
        assert_eq!(cursor.name(), Some("t"));
    }

    #[test]
    fn test_text_run_ends_at_start_tag() {
        let mut cursor = cursor(r#"<t>a<!--c-->b<link rel="x"/></t>"#);
        cursor.advance().unwrap();
        assert_eq!(cursor.advance().unwrap(), EventKind::Text);
        assert_eq!(cursor.text(), Some("ab"));
        assert_eq!(cursor.attribute("rel"), None);

        assert_eq!(cursor.advance().unwrap(), EventKind::StartTag);
        assert_eq!(cursor.name(), Some("link"));
        assert_eq!(cursor.attribute("rel"), Some("x"));
    }

    #[test]
    fn test_prefixed_names_are_literal() {
        let mut cursor = cursor(r#"<atom:feed xmlns:atom="http://www.w3.org/2005/Atom"/>"#);
        cursor.advance().unwrap();
        assert_eq!(cursor.name(), Some("atom:feed"));
    }

    #[test]
    fn test_next_tag_skips_prolog() {
        let mut cursor = cursor("<?xml version=\"1.0\"?>\n<feed></feed>");
        assert_eq!(cursor.next_tag().unwrap(), EventKind::StartTag);
        assert_eq!(cursor.name(), Some("feed"));
    }

    #[test]
    fn test_next_tag_rejects_text() {
        let mut cursor = cursor("<t>words</t>");
        cursor.advance().unwrap();
        let err = cursor.next_tag().unwrap_err();
        assert!(err.to_string().contains("start or end tag"));
    }

    #[test]
    fn test_next_tag_rejects_empty_document() {
        let mut cursor = cursor("");
        assert!(cursor.next_tag().is_err());
        assert_eq!(cursor.event(), EventKind::EndDocument);
    }

    #[test]
    fn test_require() {
        let mut cursor = cursor("<items/>");
        cursor.advance().unwrap();
        assert!(cursor.require(EventKind::StartTag, "items").is_ok());

        let err = cursor.require(EventKind::StartTag, "feed").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected start tag <feed>, found start tag <items>"
        );

        let err = cursor.require(EventKind::EndTag, "items").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected end tag </items>, found start tag <items>"
        );
    }

    #[test]
    fn test_mismatched_end_tag_is_tokenizer_error() {
        let mut cursor = cursor("<a></b>");
        cursor.advance().unwrap();
        let err = cursor.advance().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Tokenizer);
    }
}
