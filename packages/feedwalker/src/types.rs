//! Record types produced by the walker.
//!
//! Records are plain values with string fields. A field whose tag is absent
//! from the document is the empty string.

use serde::{Deserialize, Serialize};

/// Supported feed layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    /// `<feed>` of `<entry>` elements (Atom style).
    #[default]
    Atom,

    /// `<latest>` of `<sale>` elements.
    Sales,
}

impl FeedKind {
    /// Get the string value used in output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atom => "atom",
            Self::Sales => "sales",
        }
    }
}

/// A single entry (post) of an Atom-style feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Entry title.
    pub title: String,

    /// Entry summary, possibly containing markup as text.
    pub summary: String,

    /// `href` of the `rel="alternate"` link.
    pub link: String,
}

impl Entry {
    /// Create a new entry.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            link: link.into(),
        }
    }
}

/// A single sale from a sales feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    /// Earnings, kept verbatim as the feed states them.
    pub earnings: String,

    /// Title of the item sold.
    pub title: String,

    /// Thumbnail image URL (`<thumbnailUrl>`).
    pub thumbnail_url: String,
}

impl Sale {
    /// Create a new sale.
    #[must_use]
    pub fn new(
        earnings: impl Into<String>,
        title: impl Into<String>,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        Self {
            earnings: earnings.into(),
            title: title.into(),
            thumbnail_url: thumbnail_url.into(),
        }
    }
}

/// Fields of an [`Entry`] collected while its element is open.
#[derive(Debug, Default)]
pub struct EntryBuilder {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
}

impl EntryBuilder {
    /// Freeze the collected fields, defaulting missing ones to `""`.
    #[must_use]
    pub fn build(self) -> Entry {
        Entry {
            title: self.title.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            link: self.link.unwrap_or_default(),
        }
    }
}

/// Fields of a [`Sale`] collected while its element is open.
#[derive(Debug, Default)]
pub struct SaleBuilder {
    pub earnings: Option<String>,
    pub title: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl SaleBuilder {
    /// Freeze the collected fields, defaulting missing ones to `""`.
    #[must_use]
    pub fn build(self) -> Sale {
        Sale {
            earnings: self.earnings.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            thumbnail_url: self.thumbnail_url.unwrap_or_default(),
        }
    }
}

/// Records of one walk, tagged with the layout they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FeedRecords {
    Entries(Vec<Entry>),
    Sales(Vec<Sale>),
}

impl FeedRecords {
    /// Layout the records were read with.
    #[must_use]
    pub fn kind(&self) -> FeedKind {
        match self {
            Self::Entries(_) => FeedKind::Atom,
            Self::Sales(_) => FeedKind::Sales,
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Entries(entries) => entries.len(),
            Self::Sales(sales) => sales.len(),
        }
    }

    /// Whether the walk produced no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
