use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification bucket an attribute belongs to (shown as a group title).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of an attribute definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(pub String);

impl AttributeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AttributeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Attribute identifiers grouped by category.
///
/// Both levels keep discovery order: categories in the order they were first
/// seen, identifiers in the order they were first seen within the category.
/// Re-inserting an identifier already present is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeGroups {
    groups: IndexMap<Category, IndexSet<AttributeId>>,
}

impl AttributeGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id` under `category`. Returns false if it was already there.
    pub fn insert(&mut self, category: Category, id: AttributeId) -> bool {
        self.groups.entry(category).or_default().insert(id)
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total distinct (category, attribute) combinations
    pub fn pair_count(&self) -> usize {
        self.groups.values().map(IndexSet::len).sum()
    }

    pub fn get(&self, category: &Category) -> Option<&IndexSet<AttributeId>> {
        self.groups.get(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &IndexSet<AttributeId>)> {
        self.groups.iter()
    }
}

/// One attribute line of a parsed catalog, tagged with the 1-based index of
/// the header it followed (`"0"` if it came before any header).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub group: String,
    pub attribute: AttributeId,
}

/// In-memory reconstruction of a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCatalog {
    /// Full header lines (`"3. Text"`), in file order
    pub titles: Vec<String>,

    /// Attribute lines in file order
    pub entries: Vec<CatalogEntry>,
}

impl ParsedCatalog {
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty() && self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.titles.clear();
        self.entries.clear();
    }
}

/// The attributes belonging to one selected group, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult(pub Vec<AttributeId>);

impl SelectionResult {
    pub fn attributes(&self) -> &[AttributeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn into_vec(self) -> Vec<AttributeId> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_keep_first_seen_order() {
        let mut groups = AttributeGroups::new();
        groups.insert(Category::new("Text"), AttributeId::new("p2"));
        groups.insert(Category::new("Geometry"), AttributeId::new("g1"));
        groups.insert(Category::new("Text"), AttributeId::new("p1"));

        let categories: Vec<_> = groups.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(categories, vec!["Text", "Geometry"]);

        let text: Vec<_> = groups
            .get(&Category::new("Text"))
            .unwrap()
            .iter()
            .map(AttributeId::as_str)
            .collect();
        assert_eq!(text, vec!["p2", "p1"]);
    }

    #[test]
    fn test_duplicate_insert_suppressed() {
        let mut groups = AttributeGroups::new();
        assert!(groups.insert(Category::new("Text"), AttributeId::new("p1")));
        assert!(!groups.insert(Category::new("Text"), AttributeId::new("p1")));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.pair_count(), 1);
    }

    #[test]
    fn test_same_id_in_two_categories_counts_twice() {
        let mut groups = AttributeGroups::new();
        groups.insert(Category::new("Text"), AttributeId::new("p1"));
        groups.insert(Category::new("Data"), AttributeId::new("p1"));
        assert_eq!(groups.pair_count(), 2);
    }
}
