//! Hex color normalization.
//!
//! Colors travel through the system as hex strings. Normalization is
//! best-effort and total: it trims, guarantees a leading `#`, and
//! uppercases, but never rejects. A string the transform tables do not
//! know simply passes through unchanged downstream.

/// Normalizes a raw color string to the canonical `#RRGGBB`-style form.
///
/// Returns `None` when the input is empty after trimming; otherwise the
/// trimmed input with a single leading `#` and all letters uppercased.
/// No validation is performed beyond that.
///
/// # Examples
///
/// ```
/// use colorsense::models::color::normalize;
///
/// assert_eq!(normalize("#ff0000"), Some("#FF0000".to_string()));
/// assert_eq!(normalize("  00ff00 "), Some("#00FF00".to_string()));
/// assert_eq!(normalize(""), None);
/// ```
#[must_use]
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let body = trimmed.strip_prefix('#').unwrap_or(trimmed);
    Some(format!("#{}", body.to_uppercase()))
}
