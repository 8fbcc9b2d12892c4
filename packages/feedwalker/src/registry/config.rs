//! Registry configuration for the shipped record layouts.

use super::core::FieldRegistry;
use super::handler::{read_link, read_text_element};
use crate::error::Result;
use crate::types::{EntryBuilder, SaleBuilder};
use crate::xml::EventCursor;

/// Create the field registry for `<entry>` records.
///
/// Known fields: `title`, `summary` (text) and `link` (`href` of the
/// `rel="alternate"` link). Links with other relations leave the field as is.
#[must_use]
pub fn create_entry_registry() -> FieldRegistry<EntryBuilder> {
    let mut registry = FieldRegistry::<EntryBuilder>::new();

    registry.register("title", read_entry_title);
    registry.register("summary", read_entry_summary);
    registry.register("link", read_entry_link);

    registry
}

/// Create the field registry for `<sale>` records.
///
/// Known fields: `earnings`, `title` and `thumbnailUrl`, all text. Each tag
/// fills its own slot.
#[must_use]
pub fn create_sale_registry() -> FieldRegistry<SaleBuilder> {
    let mut registry = FieldRegistry::<SaleBuilder>::new();

    registry.register("earnings", read_sale_earnings);
    registry.register("title", read_sale_title);
    registry.register("thumbnailUrl", read_sale_thumbnail_url);

    registry
}

fn read_entry_title(cursor: &mut dyn EventCursor, entry: &mut EntryBuilder) -> Result<()> {
    entry.title = Some(read_text_element(cursor, "title")?);
    Ok(())
}

fn read_entry_summary(cursor: &mut dyn EventCursor, entry: &mut EntryBuilder) -> Result<()> {
    entry.summary = Some(read_text_element(cursor, "summary")?);
    Ok(())
}

fn read_entry_link(cursor: &mut dyn EventCursor, entry: &mut EntryBuilder) -> Result<()> {
    if let Some(link) = read_link(cursor)? {
        entry.link = Some(link);
    }
    Ok(())
}

fn read_sale_earnings(cursor: &mut dyn EventCursor, sale: &mut SaleBuilder) -> Result<()> {
    sale.earnings = Some(read_text_element(cursor, "earnings")?);
    Ok(())
}

fn read_sale_title(cursor: &mut dyn EventCursor, sale: &mut SaleBuilder) -> Result<()> {
    sale.title = Some(read_text_element(cursor, "title")?);
    Ok(())
}

fn read_sale_thumbnail_url(cursor: &mut dyn EventCursor, sale: &mut SaleBuilder) -> Result<()> {
    sale.thumbnail_url = Some(read_text_element(cursor, "thumbnailUrl")?);
    Ok(())
}
