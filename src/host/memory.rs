use super::{HostDocument, HostError, Item, ItemKind};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fs;

/// A host document held in memory, loadable from a YAML snapshot.
///
/// ```yaml
/// items:
///   - id: 1
///     kind: instance
///     attributes:
///       - name: Comments
///         definition: { category: Text, identifier: ALL_MODEL_INSTANCE_COMMENTS }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryDocument {
    #[serde(default)]
    pub items: Vec<Item>,
}

impl InMemoryDocument {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(yaml)
    }

    pub fn load(path: &Utf8Path) -> Result<Self, HostError> {
        let contents = fs::read_to_string(path).map_err(|source| HostError::Read {
            path: path.to_string(),
            source,
        })?;

        let document = Self::from_yaml(&contents).map_err(|source| HostError::Parse {
            path: path.to_string(),
            source,
        })?;

        tracing::info!("Loaded document {} ({} items)", path, document.items.len());
        Ok(document)
    }

    fn items_of_kind(&self, kind: ItemKind) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| item.kind == kind)
            .cloned()
            .collect()
    }
}

impl HostDocument for InMemoryDocument {
    fn collect_instances(&self) -> Result<Vec<Item>, HostError> {
        Ok(self.items_of_kind(ItemKind::Instance))
    }

    fn collect_type_definitions(&self) -> Result<Vec<Item>, HostError> {
        Ok(self.items_of_kind(ItemKind::Type))
    }
}
