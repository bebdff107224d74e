//! Digital-id derivation for organizations
//!
//! Organizations get a human-facing digital id derived from their name at
//! creation time: uppercased, whitespace stripped, truncated to 10
//! characters, behind a `WD-B-` (brand) or `WD-C-` (community) prefix.
//! Two similarly-named organizations can collide; the id is a display
//! handle, not a key.

/// Maximum characters of the name carried in the digital id
const MAX_NAME_CHARS: usize = 10;

fn compact_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .take(MAX_NAME_CHARS)
        .collect()
}

/// Digital id for a brand: `WD-B-<NAME>`
pub fn brand_digital_id(name: &str) -> String {
    format!("WD-B-{}", compact_name(name))
}

/// Digital id for a community: `WD-C-<NAME>`
pub fn community_digital_id(name: &str) -> String {
    format!("WD-C-{}", compact_name(name))
}
