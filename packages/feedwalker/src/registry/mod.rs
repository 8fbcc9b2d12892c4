//! Field registry system for record extraction.
//!
//! Each record layout maps the tag names it knows to field handlers. The
//! walker looks every child tag up in the registry and skips the subtree of
//! anything that is not registered.

mod config;
mod core;
mod handler;

pub use config::{create_entry_registry, create_sale_registry};
pub use core::FieldRegistry;
pub use handler::{
    read_link, read_relation_attribute, read_text, read_text_element, FieldHandler,
    ALTERNATE_REL,
};
