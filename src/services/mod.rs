//! Services module - the cataloging pipeline.
//!
//! Pure business logic with no UI or threading concerns:
//!
//! - [`catalog_builder`]: groups the eligible attributes of host items by
//!   category and writes the catalog text (`"1. Text"` headers, indented
//!   identifiers)
//! - [`catalog_parser`]: reads catalog text back into a [`ParsedCatalog`]
//!   and writes the `"<group> - <attribute>"` index
//! - [`CatalogQuery`]: returns the attributes listed under one group title
//! - [`CatalogStore`]: the two files on disk
//!
//! The catalog goes through a write-then-reread round trip on purpose: the
//! query relies on entries of one group being contiguous, which holds for
//! whatever the parser reads back from a builder-written file.
//!
//! [`ParsedCatalog`]: crate::models::ParsedCatalog

pub mod catalog_builder;
pub mod catalog_parser;
pub mod catalog_query;
pub mod catalog_store;

pub use catalog_builder::{group_attributes, render_catalog, write_catalog};
pub use catalog_parser::{parse_catalog, parse_catalog_str, write_index};
pub use catalog_query::CatalogQuery;
pub use catalog_store::{CatalogError, CatalogStore};
