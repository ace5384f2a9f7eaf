use crate::models::{ParsedCatalog, SelectionResult};
use regex::Regex;

/// Resolves a selected group title to the attributes listed under it.
pub struct CatalogQuery {
    /// Everything before the first `.` of a title (`"12. Text"` → `"12"`)
    numeral_pattern: Regex,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self {
            numeral_pattern: Regex::new(r"^([^.]*)\.").expect("Invalid numeral regex"),
        }
    }

    /// Group numeral of a `"<N>. <category>"` title
    pub fn group_numeral<'t>(&self, title: &'t str) -> Option<&'t str> {
        self.numeral_pattern
            .captures(title)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Attributes of the group named by `title`.
    ///
    /// Collects the first contiguous run of entries whose group equals the
    /// title's numeral. Entries of one group are adjacent because the catalog
    /// is written group by group; anything after the run is ignored. Returns
    /// an empty result when the title has no numeral or nothing matches.
    pub fn select(&self, parsed: &ParsedCatalog, title: &str) -> SelectionResult {
        let Some(numeral) = self.group_numeral(title) else {
            tracing::warn!("Selected title has no group number: {:?}", title);
            return SelectionResult::default();
        };

        let attributes = parsed
            .entries
            .iter()
            .skip_while(|entry| entry.group != numeral)
            .take_while(|entry| entry.group == numeral)
            .map(|entry| entry.attribute.clone())
            .collect();

        SelectionResult(attributes)
    }
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttributeId, CatalogEntry};
    use crate::services::catalog_parser::parse_catalog_str;

    fn names(result: &SelectionResult) -> Vec<&str> {
        result.attributes().iter().map(AttributeId::as_str).collect()
    }

    #[test]
    fn test_group_numeral() {
        let query = CatalogQuery::new();
        assert_eq!(query.group_numeral("12. Text"), Some("12"));
        assert_eq!(query.group_numeral("1. Identity. Data"), Some("1"));
        assert_eq!(query.group_numeral("no dot"), None);
    }

    #[test]
    fn test_select_each_group() {
        let parsed =
            parse_catalog_str("1. Text\n        p1\n        p3\n2. Geometry\n        p2\n");
        let query = CatalogQuery::new();

        assert_eq!(names(&query.select(&parsed, "1. Text")), vec!["p1", "p3"]);
        assert_eq!(names(&query.select(&parsed, "2. Geometry")), vec!["p2"]);
    }

    #[test]
    fn test_select_missing_group_is_empty() {
        let parsed = parse_catalog_str("1. Text\n        p1\n");
        let query = CatalogQuery::new();

        assert!(query.select(&parsed, "5. Other").is_empty());
        assert!(query.select(&parsed, "garbage").is_empty());
    }

    #[test]
    fn test_select_stops_at_first_run() {
        let parsed = ParsedCatalog {
            titles: Vec::new(),
            entries: vec![
                CatalogEntry { group: "1".into(), attribute: AttributeId::new("a") },
                CatalogEntry { group: "2".into(), attribute: AttributeId::new("b") },
                CatalogEntry { group: "1".into(), attribute: AttributeId::new("c") },
            ],
        };
        let query = CatalogQuery::new();
        assert_eq!(names(&query.select(&parsed, "1. X")), vec!["a"]);
    }

    #[test]
    fn test_select_does_not_match_prefix_numbers() {
        let text = (1..=11)
            .map(|n| format!("{}. G{}\n        a{}\n", n, n, n))
            .collect::<String>();
        let parsed = parse_catalog_str(&text);
        let query = CatalogQuery::new();

        assert_eq!(names(&query.select(&parsed, "1. G1")), vec!["a1"]);
        assert_eq!(names(&query.select(&parsed, "11. G11")), vec!["a11"]);
    }
}
