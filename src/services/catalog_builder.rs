use crate::host::Item;
use crate::models::AttributeGroups;
use std::io::{self, Write};

/// Indentation written before every attribute line of the catalog
pub const ATTRIBUTE_INDENT: &str = "        ";

/// Group the catalog-eligible attributes of `items` by category.
///
/// Shared attributes, attributes without a definition and definitions without
/// a category are skipped one by one; they never abort the scan. Categories
/// and identifiers keep first-seen order, duplicates are kept once.
pub fn group_attributes<'a, I>(items: I) -> AttributeGroups
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut groups = AttributeGroups::new();
    let mut item_count = 0usize;
    let mut skipped = 0usize;

    for item in items {
        item_count += 1;
        for attribute in &item.attributes {
            match attribute.catalog_key() {
                Some((category, id)) => {
                    groups.insert(category.clone(), id.clone());
                }
                None => skipped += 1,
            }
        }
    }

    tracing::debug!(
        "Grouped {} attributes into {} categories from {} items ({} skipped)",
        groups.pair_count(),
        groups.len(),
        item_count,
        skipped
    );

    groups
}

/// Write `groups` in catalog form.
///
/// ```text
/// 1. Text
///         ALL_MODEL_INSTANCE_COMMENTS
/// 2. Geometry
///         HOST_AREA_COMPUTED
/// ```
pub fn write_catalog<W: Write>(groups: &AttributeGroups, mut writer: W) -> io::Result<()> {
    for (number, (category, ids)) in groups.iter().enumerate() {
        writeln!(writer, "{}. {}", number + 1, category)?;
        for id in ids {
            writeln!(writer, "{}{}", ATTRIBUTE_INDENT, id)?;
        }
    }
    writer.flush()
}

/// Catalog text for `groups`
pub fn render_catalog(groups: &AttributeGroups) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_catalog(groups, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}
