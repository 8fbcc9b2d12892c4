//! Feedwalker - Streaming extraction of records from XML feeds.
//!
//! This crate walks an XML document as a forward-only stream of events,
//! dispatches on tag names through a field registry, and skips every
//! element it does not recognize together with its whole subtree. Two
//! layouts ship with it: Atom-style `<feed>`/`<entry>` documents and
//! `<latest>`/`<sale>` sales documents.
//!
//! # Example
//!
//! ```
//! use feedwalker::{parse_entries, Entry};
//!
//! let xml = r#"<feed>
//!   <id>ignored</id>
//!   <entry>
//!     <title>Hello</title>
//!     <link rel="alternate" href="https://example.com/1"/>
//!   </entry>
//! </feed>"#;
//!
//! let entries = parse_entries(xml.as_bytes()).unwrap();
//! assert_eq!(entries, vec![Entry::new("Hello", "", "https://example.com/1")]);
//! ```
//!
//! # Architecture
//!
//! - [`xml`]: Pull cursor over the tokenizer
//! - [`walker`]: Recursive-descent walk and subtree skipping
//! - [`registry`]: Tag-to-handler dispatch for record fields
//! - [`formats`]: Record layouts (root tag, record tag, registry)
//! - [`types`]: Record types
//! - [`error`]: Error types and Result alias
//! - [`config`]: Configuration constants and validation
//! - [`http`]: HTTP client for fetching remote feeds
//! - [`source`]: Remote or local feed sources
//! - [`render`]: Text, YAML, JSON and HTML output
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod formats;
pub mod http;
pub mod registry;
pub mod render;
pub mod source;
pub mod types;
pub mod walker;
pub mod xml;

// Re-export main functions
pub use walker::{parse_entries, parse_sales, FeedWalker};

// Re-export commonly used items
pub use error::{ErrorKind, FeedError, Result};
pub use formats::{AtomFeed, FeedFormat, SalesFeed};
pub use source::FeedSource;
pub use types::{Entry, FeedKind, FeedRecords, Sale};
