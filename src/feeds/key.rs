//! Feed key derivation.

/// Derive a feed key from a channel display name.
///
/// Keeps ASCII letters and digits only, lower-cased. The result may be
/// empty when the name has no ASCII alphanumerics; callers must reject it.
pub fn derive_feed_key(display_name: &str) -> String {
    display_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
