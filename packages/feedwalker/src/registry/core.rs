//! Field registry for mapping tag names to handlers.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::handler::FieldHandler;

/// Registry mapping field tag names to handlers for one record builder.
///
/// Tags without a handler are not an error: the walker skips them.
pub struct FieldRegistry<B> {
    handlers: HashMap<&'static str, FieldHandler<B>>,
}

impl<B> FieldRegistry<B> {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a specific tag name.
    ///
    /// A later registration for the same tag replaces the earlier one.
    pub fn register(&mut self, tag_name: &'static str, handler: FieldHandler<B>) {
        self.handlers.insert(tag_name, handler);
    }

    /// Get the handler for a tag, if one is registered.
    #[must_use]
    pub fn get_handler(&self, tag_name: &str) -> Option<FieldHandler<B>> {
        self.handlers.get(tag_name).copied()
    }

    /// Check if a handler is registered for a tag.
    #[must_use]
    pub fn has_handler(&self, tag_name: &str) -> bool {
        self.handlers.contains_key(tag_name)
    }

    /// Return set of all registered tag names.
    #[must_use]
    pub fn registered_tags(&self) -> HashSet<&'static str> {
        self.handlers.keys().copied().collect()
    }
}

impl<B> Default for FieldRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> fmt::Debug for FieldRegistry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.handlers.keys().collect();
        tags.sort();
        f.debug_struct("FieldRegistry").field("tags", &tags).finish()
    }
}
