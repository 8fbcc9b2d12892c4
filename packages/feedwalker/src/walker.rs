//! Recursive-descent walker over a feed's event stream.
//!
//! The same scan drives both levels of the document. At the root it looks
//! for record tags; inside a record it looks for field tags. Anything
//! unrecognized is skipped with its whole subtree, so the cursor only ever
//! moves forward and always ends on the end tag of the element it entered.

use std::fmt;
use std::io::{BufReader, Read};
use std::marker::PhantomData;

use crate::error::{FeedError, Result};
use crate::formats::{AtomFeed, FeedFormat, RecordBuilder, RecordOf, SalesFeed};
use crate::registry::FieldRegistry;
use crate::types::{Entry, Sale};
use crate::xml::{EventCursor, EventKind, PullCursor};

/// Walker extracting the records of layout `F` from XML documents.
///
/// A walker holds only its immutable field registry, so it can be reused for
/// any number of sequential walks.
pub struct FeedWalker<F: FeedFormat> {
    registry: FieldRegistry<F::Builder>,
    _format: PhantomData<F>,
}

impl<F: FeedFormat> FeedWalker<F> {
    /// Create a walker with the layout's registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(F::registry())
    }

    /// Create a walker with a custom field registry.
    #[must_use]
    pub fn with_registry(registry: FieldRegistry<F::Builder>) -> Self {
        Self {
            registry,
            _format: PhantomData,
        }
    }

    /// Get a reference to the field registry.
    #[must_use]
    pub fn registry(&self) -> &FieldRegistry<F::Builder> {
        &self.registry
    }

    /// Parse a whole document into its records.
    ///
    /// The stream is moved into the call and dropped before it returns, on
    /// success and on error alike. Pass `&mut reader` to keep the reader
    /// itself. Any failure discards the records collected so far.
    ///
    /// # Errors
    /// Structural errors when the first tag is not the root container or a
    /// tag is out of place, tokenizer errors for malformed markup, and
    /// transport errors when reading the stream fails.
    pub fn parse<R: Read>(&self, stream: R) -> Result<Vec<RecordOf<F>>> {
        let mut cursor = PullCursor::from_reader(BufReader::new(stream));
        cursor.next_tag()?;
        let records = self.read_feed(&mut cursor)?;
        tracing::debug!(
            root = F::ROOT_TAG,
            count = records.len(),
            "Feed walk complete"
        );
        Ok(records)
    }

    /// Read the root container and every record directly under it.
    ///
    /// The cursor must sit on the root start tag. On success it sits on the
    /// root end tag.
    pub fn read_feed(&self, cursor: &mut dyn EventCursor) -> Result<Vec<RecordOf<F>>> {
        let mut records = Vec::new();
        walk_children(cursor, F::ROOT_TAG, |cursor| {
            if cursor.name() == Some(F::RECORD_TAG) {
                records.push(self.read_record(cursor)?);
                tracing::debug!(tag = F::RECORD_TAG, index = records.len() - 1, "Read record");
                Ok(())
            } else {
                skip_subtree(cursor)
            }
        })?;
        Ok(records)
    }

    /// Read one record element, dispatching its children through the registry.
    pub fn read_record(&self, cursor: &mut dyn EventCursor) -> Result<RecordOf<F>> {
        let mut builder = F::Builder::default();
        walk_children(cursor, F::RECORD_TAG, |cursor| {
            let handler = cursor.name().and_then(|name| self.registry.get_handler(name));
            match handler {
                Some(handler) => handler(cursor, &mut builder),
                None => skip_subtree(cursor),
            }
        })?;
        Ok(builder.build())
    }
}

impl<F: FeedFormat> Default for FeedWalker<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FeedFormat> fmt::Debug for FeedWalker<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedWalker")
            .field("root", &F::ROOT_TAG)
            .field("record", &F::RECORD_TAG)
            .field("registry", &self.registry)
            .finish()
    }
}

/// Scan the direct children of `<tag>`, calling `on_child` for each start tag.
///
/// The cursor must sit on `<tag>`. `on_child` receives the cursor on a child's
/// start tag and must leave it on that child's end tag. Text between children
/// is stepped over. Returns with the cursor on `</tag>`.
pub fn walk_children(
    cursor: &mut dyn EventCursor,
    tag: &str,
    mut on_child: impl FnMut(&mut dyn EventCursor) -> Result<()>,
) -> Result<()> {
    cursor.require(EventKind::StartTag, tag)?;
    loop {
        match cursor.advance()? {
            EventKind::EndTag => break,
            EventKind::StartTag => on_child(&mut *cursor)?,
            EventKind::EndDocument => return Err(FeedError::unexpected_end(tag)),
            EventKind::StartDocument | EventKind::Text => {}
        }
    }
    cursor.require(EventKind::EndTag, tag)
}

/// Skip the element the cursor sits on, including all of its descendants.
///
/// Leaves the cursor on the end tag matching the start tag it was called on,
/// however deeply the subtree nests.
///
/// # Errors
/// [`FeedError::Internal`] when the cursor is not on a start tag, and a
/// structural error when the document ends inside the subtree.
pub fn skip_subtree(cursor: &mut dyn EventCursor) -> Result<()> {
    if cursor.event() != EventKind::StartTag {
        return Err(FeedError::Internal(format!(
            "skip_subtree called on {}",
            cursor.describe()
        )));
    }
    let tag = cursor.name().unwrap_or_default().to_string();
    tracing::trace!(tag = %tag, "Skipping element");

    let mut depth: usize = 1;
    while depth != 0 {
        match cursor.advance()? {
            EventKind::EndTag => depth -= 1,
            EventKind::StartTag => depth += 1,
            EventKind::EndDocument => return Err(FeedError::unexpected_end(&tag)),
            EventKind::StartDocument | EventKind::Text => {}
        }
    }
    Ok(())
}

/// Parse an Atom-style `<feed>` document into entries.
pub fn parse_entries<R: Read>(stream: R) -> Result<Vec<Entry>> {
    FeedWalker::<AtomFeed>::new().parse(stream)
}

/// Parse a `<latest>` sales document into sales.
pub fn parse_sales<R: Read>(stream: R) -> Result<Vec<Sale>> {
    FeedWalker::<SalesFeed>::new().parse(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn open(xml: &str) -> PullCursor<&[u8]> {
        let mut cursor = PullCursor::from_reader(xml.as_bytes());
        cursor.next_tag().unwrap();
        cursor
    }

    #[test]
    fn test_skip_subtree_flat() {
        let mut cursor = open("<a><b/></a>");
        cursor.advance().unwrap();
        skip_subtree(&mut cursor).unwrap();
        assert_eq!(cursor.event(), EventKind::EndTag);
        assert_eq!(cursor.name(), Some("b"));
    }

    #[test]
    fn test_skip_subtree_nested_same_name() {
        let mut cursor = open("<root><x><x><x>t</x></x><y/></x><after/></root>");
        cursor.advance().unwrap();
        skip_subtree(&mut cursor).unwrap();
        assert_eq!(cursor.event(), EventKind::EndTag);
        assert_eq!(cursor.name(), Some("x"));

        assert_eq!(cursor.advance().unwrap(), EventKind::StartTag);
        assert_eq!(cursor.name(), Some("after"));
    }

    #[test]
    fn test_skip_subtree_off_start_tag_is_internal() {
        let mut cursor = open("<a>text</a>");
        cursor.advance().unwrap();
        let err = skip_subtree(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!err.is_bad_input());
    }

    #[test]
    fn test_walk_children_visits_direct_children_only() {
        let mut cursor = open("<list>x<a><deep/></a> y <b/></list>");
        let mut seen = Vec::new();
        walk_children(&mut cursor, "list", |cursor| {
            seen.push(cursor.name().unwrap_or_default().to_string());
            skip_subtree(cursor)
        })
        .unwrap();
        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(cursor.name(), Some("list"));
        assert_eq!(cursor.event(), EventKind::EndTag);
    }

    #[test]
    fn test_walk_children_wrong_open_tag() {
        let mut cursor = open("<items/>");
        let err = walk_children(&mut cursor, "feed", |_| Ok(())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_read_record_defaults_and_unknown_fields() {
        let walker = FeedWalker::<AtomFeed>::new();
        let mut cursor = open("<entry><author><name>n</name></author><title>T</title></entry>");
        let entry = walker.read_record(&mut cursor).unwrap();
        assert_eq!(entry, Entry::new("T", "", ""));
        assert_eq!(cursor.name(), Some("entry"));
    }

    #[test]
    fn test_read_feed_skips_unknown_siblings() {
        let walker = FeedWalker::<SalesFeed>::new();
        let mut cursor = open(
            "<latest><meta><sale><earnings>9</earnings></sale></meta>\
             <sale><earnings>1</earnings></sale><extra/></latest>",
        );
        let sales = walker.read_feed(&mut cursor).unwrap();
        assert_eq!(sales, vec![Sale::new("1", "", "")]);
    }

    #[test]
    fn test_parse_entries() {
        let xml = r#"<feed><entry><title>A</title><summary>S</summary><link rel="alternate" href="http://x"/></entry></feed>"#;
        let entries = parse_entries(xml.as_bytes()).unwrap();
        assert_eq!(entries, vec![Entry::new("A", "S", "http://x")]);
    }

    #[test]
    fn test_parse_sales() {
        let xml = "<latest><sale><earnings>5</earnings><thumbnailUrl>u</thumbnailUrl></sale></latest>";
        let sales = parse_sales(xml.as_bytes()).unwrap();
        assert_eq!(sales, vec![Sale::new("5", "", "u")]);
    }

    #[test]
    fn test_parse_root_mismatch() {
        let err = parse_entries("<items><entry/></items>".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(
            err.to_string(),
            "Expected start tag <feed>, found start tag <items>"
        );
    }

    #[test]
    fn test_parse_truncated_document() {
        let err = parse_entries("<feed><entry><title>A</title>".as_bytes()).unwrap_err();
        assert!(err.is_bad_input());
    }

    #[test]
    fn test_walker_debug_lists_tags() {
        let walker = FeedWalker::<AtomFeed>::default();
        let debug = format!("{walker:?}");
        assert!(debug.contains("\"feed\""));
        assert!(debug.contains("\"summary\""));
    }
}
