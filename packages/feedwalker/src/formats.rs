//! Record layouts the walker can extract.
//!
//! A layout names its root container tag, its record tag and the field
//! registry used inside each record. [`AtomFeed`] and [`SalesFeed`] ship with
//! the crate; other layouts implement [`FeedFormat`] the same way.

use crate::registry::{create_entry_registry, create_sale_registry, FieldRegistry};
use crate::types::{Entry, EntryBuilder, FeedKind, Sale, SaleBuilder};

/// Mutable field collector for one record, frozen on the record's end tag.
pub trait RecordBuilder: Default {
    /// The immutable record this builder produces.
    type Record;

    /// Convert the collected fields into a record.
    fn build(self) -> Self::Record;
}

/// Description of one feed layout.
pub trait FeedFormat {
    /// Builder used while a record element is open.
    type Builder: RecordBuilder;

    /// Tag name of the root container.
    const ROOT_TAG: &'static str;

    /// Tag name of each record directly under the root.
    const RECORD_TAG: &'static str;

    /// Known field tags inside a record.
    fn registry() -> FieldRegistry<Self::Builder>;
}

/// Record type produced for layout `F`.
pub type RecordOf<F> = <<F as FeedFormat>::Builder as RecordBuilder>::Record;

impl RecordBuilder for EntryBuilder {
    type Record = Entry;

    fn build(self) -> Entry {
        EntryBuilder::build(self)
    }
}

impl RecordBuilder for SaleBuilder {
    type Record = Sale;

    fn build(self) -> Sale {
        SaleBuilder::build(self)
    }
}

/// `<feed>` of `<entry>` records with `title`, `summary` and `link`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomFeed;

impl FeedFormat for AtomFeed {
    type Builder = EntryBuilder;
    const ROOT_TAG: &'static str = "feed";
    const RECORD_TAG: &'static str = "entry";

    fn registry() -> FieldRegistry<EntryBuilder> {
        create_entry_registry()
    }
}

/// `<latest>` of `<sale>` records with `earnings`, `title` and `thumbnailUrl`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesFeed;

impl FeedFormat for SalesFeed {
    type Builder = SaleBuilder;
    const ROOT_TAG: &'static str = "latest";
    const RECORD_TAG: &'static str = "sale";

    fn registry() -> FieldRegistry<SaleBuilder> {
        create_sale_registry()
    }
}

/// Root and record tag names for a [`FeedKind`].
#[must_use]
pub fn tags_for(kind: FeedKind) -> (&'static str, &'static str) {
    match kind {
        FeedKind::Atom => (AtomFeed::ROOT_TAG, AtomFeed::RECORD_TAG),
        FeedKind::Sales => (SalesFeed::ROOT_TAG, SalesFeed::RECORD_TAG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_for() {
        assert_eq!(tags_for(FeedKind::Atom), ("feed", "entry"));
        assert_eq!(tags_for(FeedKind::Sales), ("latest", "sale"));
    }

    #[test]
    fn test_record_builder_trait_builds_default_record() {
        let entry = <EntryBuilder as RecordBuilder>::build(EntryBuilder::default());
        assert_eq!(entry, Entry::default());
    }
}
