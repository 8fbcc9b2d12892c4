//! Pull-style XML event cursor.
//!
//! The walker only ever talks to the [`EventCursor`] trait. [`PullCursor`]
//! is the production implementation on top of `quick-xml`.

mod cursor;

pub use cursor::{EventCursor, EventKind, PullCursor};
