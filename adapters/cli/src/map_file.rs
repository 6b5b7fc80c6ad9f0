//! Reader for the `x,y=typeId` text map format.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use valley_core::{PlacementEntry, PlacementTable};

/// Reads and parses a map file from disk.
pub(crate) fn load(path: &Path) -> Result<PlacementTable> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read map file {}", path.display()))?;
    Ok(parse(&contents))
}

/// Parses map text into a placement table.
///
/// Blank lines and `#` comments are skipped. Malformed lines are logged and
/// skipped without aborting the load.
pub(crate) fn parse(contents: &str) -> PlacementTable {
    let mut entries = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_line(trimmed) {
            Some(entry) => entries.push(entry),
            None => {
                tracing::warn!(line = index + 1, content = trimmed, "skipping malformed map line");
            }
        }
    }
    PlacementTable::from_entries(entries)
}

fn parse_line(line: &str) -> Option<PlacementEntry> {
    let (coordinates, type_id) = line.split_once('=')?;
    let (x, y) = coordinates.split_once(',')?;
    let x = x.trim().parse::<i32>().ok()?;
    let y = y.trim().parse::<i32>().ok()?;
    let type_id = type_id.trim().parse::<u32>().ok()?;
    Some(PlacementEntry::new(x, y, type_id))
}
