/// Number of leading characters shown when an id is abbreviated for display.
pub const SHORT_ID_LEN: usize = 8;

/// Generate a fresh record identifier.
///
/// UUID v4 in hyphenated lowercase form. The leading characters are random,
/// so a short prefix is usually enough to address a record by hand.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Abbreviate an id for tabular output.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
