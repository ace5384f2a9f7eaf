use crate::models::{AttributeId, CatalogEntry, ParsedCatalog};
use std::io::{self, BufRead, Write};

/// A catalog line containing this is a group header
pub const HEADER_MARKER: &str = ". ";

/// Parse catalog text line by line.
///
/// Header lines (containing `". "`) become titles and bump the group counter;
/// every other line is trimmed and recorded under the current counter value.
/// The counter equals the number of headers seen so far, which matches the
/// 1-based numbering the builder writes. Lines that do not fit either shape
/// are not rejected: they are classified by the same test and carried along.
pub fn parse_catalog<R: BufRead>(reader: R) -> io::Result<ParsedCatalog> {
    let mut parsed = ParsedCatalog::default();
    let mut count = 0usize;

    for line in reader.lines() {
        let line = line?;
        if line.contains(HEADER_MARKER) {
            parsed.titles.push(line);
            count += 1;
        } else {
            parsed.entries.push(CatalogEntry {
                group: count.to_string(),
                attribute: AttributeId::new(line.trim()),
            });
        }
    }

    tracing::debug!(
        "Parsed catalog: {} titles, {} entries",
        parsed.titles.len(),
        parsed.entries.len()
    );

    Ok(parsed)
}

pub fn parse_catalog_str(text: &str) -> ParsedCatalog {
    // Reading from a byte slice cannot fail
    parse_catalog(text.as_bytes()).unwrap_or_default()
}

/// Write the secondary index: one `"<group> - <attribute>"` line per entry.
pub fn write_index<W: Write>(parsed: &ParsedCatalog, mut writer: W) -> io::Result<()> {
    for entry in &parsed.entries {
        writeln!(writer, "{} - {}", entry.group, entry.attribute)?;
    }
    writer.flush()
}
