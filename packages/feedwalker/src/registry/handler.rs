//! Field handler type and the leaf readers handlers are built from.

use crate::error::Result;
use crate::walker::skip_subtree;
use crate::xml::{EventCursor, EventKind};

/// Handler for one known field tag.
///
/// Called with the cursor on the field's start tag. It must leave the cursor
/// on the matching end tag, storing whatever it extracted in the builder.
pub type FieldHandler<B> = fn(&mut dyn EventCursor, &mut B) -> Result<()>;

/// Relation type whose `href` is taken as a link value.
pub const ALTERNATE_REL: &str = "alternate";

/// Read the text content of the element the cursor just entered.
///
/// If the next event is text it is returned and the cursor moves on to the
/// following tag. Otherwise the result is empty and the cursor stays on
/// whatever came next.
pub fn read_text(cursor: &mut dyn EventCursor) -> Result<String> {
    let mut result = String::new();
    if cursor.advance()? == EventKind::Text {
        result = cursor.text().unwrap_or_default().to_string();
        cursor.next_tag()?;
    }
    Ok(result)
}

/// Read a leaf element `<tag>text</tag>` and return its text.
///
/// An element without text (`<tag/>`, `<tag></tag>`) yields an empty string.
pub fn read_text_element(cursor: &mut dyn EventCursor, tag: &str) -> Result<String> {
    cursor.require(EventKind::StartTag, tag)?;
    let text = read_text(cursor)?;
    cursor.require(EventKind::EndTag, tag)?;
    Ok(text)
}

/// Read `attr` off a `<tag rel="...">` element when its `rel` equals `rel`.
///
/// The value comes from the start tag itself; the element's content is never
/// read as a value. The element is consumed through its end tag either way.
/// Returns `None` when `rel` is missing or different, and `Some("")` when
/// the relation matches but `attr` is absent.
pub fn read_relation_attribute(
    cursor: &mut dyn EventCursor,
    tag: &str,
    rel: &str,
    attr: &str,
) -> Result<Option<String>> {
    cursor.require(EventKind::StartTag, tag)?;
    let value = (cursor.attribute("rel") == Some(rel))
        .then(|| cursor.attribute(attr).unwrap_or_default().to_string());
    skip_subtree(cursor)?;
    cursor.require(EventKind::EndTag, tag)?;
    Ok(value)
}

/// Read the `href` of a `<link rel="alternate">` element.
///
/// Links with any other relation yield `None`.
pub fn read_link(cursor: &mut dyn EventCursor) -> Result<Option<String>> {
    read_relation_attribute(cursor, "link", ALTERNATE_REL, "href")
}
