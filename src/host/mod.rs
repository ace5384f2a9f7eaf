//! Host document boundary.
//!
//! The host application owns its document and only allows it to be queried
//! from the host-processing thread. This module describes the read-only view
//! the catalog builder needs: items, their attributes, and each attribute's
//! definition (category and stable identifier).

pub mod memory;

pub use memory::InMemoryDocument;

use crate::models::{AttributeId, Category};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by host document queries
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Host query failed: {0}")]
    QueryFailed(String),

    #[error("Failed to read document {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse document {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// Addressable element id inside the host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

/// Whether an item is a placed instance or a type-defining element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Instance,
    Type,
}

/// What an attribute is: its category and stable identifier.
///
/// Category is optional because hosts do hand out definitions without one;
/// those attributes are skipped when cataloging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    #[serde(default)]
    pub category: Option<Category>,
    pub identifier: AttributeId,
}

/// A named property attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,

    /// Shared (externally defined) attributes are left out of the catalog
    #[serde(default)]
    pub shared: bool,

    #[serde(default)]
    pub definition: Option<AttributeDefinition>,
}

impl Attribute {
    /// Category and identifier for cataloging, if this attribute is eligible.
    pub fn catalog_key(&self) -> Option<(&Category, &AttributeId)> {
        if self.shared {
            return None;
        }
        let definition = self.definition.as_ref()?;
        let category = definition.category.as_ref()?;
        Some((category, &definition.identifier))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,

    #[serde(default)]
    pub kind: ItemKind,

    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Read-only queries against the host document.
///
/// The host partitions items into instances and type definitions and offers
/// no single query returning both, so the two are separate methods.
#[cfg_attr(test, mockall::automock)]
pub trait HostDocument {
    fn collect_instances(&self) -> Result<Vec<Item>, HostError>;

    fn collect_type_definitions(&self) -> Result<Vec<Item>, HostError>;
}

/// Every item in the document: instances first, then type definitions, with
/// items returned by both queries kept once (first occurrence wins).
pub fn find_all_items<D: HostDocument + ?Sized>(document: &D) -> Result<Vec<Item>, HostError> {
    let instances = document.collect_instances()?;
    let types = document.collect_type_definitions()?;

    let mut seen = IndexSet::with_capacity(instances.len() + types.len());
    let items: Vec<Item> = instances
        .into_iter()
        .chain(types)
        .filter(|item| seen.insert(item.id))
        .collect();

    tracing::debug!("Collected {} host items", items.len());
    Ok(items)
}
