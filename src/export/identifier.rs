//! Display-name sanitization for the export target.
//!
//! The simulator's input language only accepts bare identifiers, while users
//! name elements freely ("Pump #2 (backup)"). Sanitization maps a display
//! name onto `[A-Za-z0-9_]` deterministically. Two distinct display names can
//! sanitize to the same identifier; that collision is a known limitation and
//! is not resolved here.

/// Letter prepended when a sanitized name does not start with a letter.
const PREFIX: char = 'E';

/// Maps a free-form display name to a bare identifier.
///
/// Every maximal run of characters outside `[A-Za-z0-9_]` becomes a single
/// underscore, underscore runs are collapsed, leading and trailing
/// underscores are trimmed, and a fixed letter is prepended when the result
/// does not start with a letter. A name with no usable characters at all
/// sanitizes to the prefix letter alone.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_underscore = false;
    for ch in name.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '_' {
            ch
        } else {
            '_'
        };
        if mapped == '_' {
            if !last_was_underscore {
                out.push('_');
            }
            last_was_underscore = true;
        } else {
            out.push(mapped);
            last_was_underscore = false;
        }
    }
    let trimmed = out.trim_matches('_');
    match trimmed.chars().next() {
        None => PREFIX.to_string(),
        Some(first) if first.is_ascii_alphabetic() => trimmed.to_string(),
        Some(_) => format!("{}{}", PREFIX, trimmed),
    }
}
