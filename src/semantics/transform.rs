//! Fixed color transformation tables.
//!
//! One small exact-match table per deficiency type. The values are domain
//! data baked in as immutable configuration; an original color absent from
//! its table passes through unchanged.

use crate::models::color;
use crate::models::DeficiencyType;

const PROTANOPIA: &[(&str, &str)] = &[
    ("#FF0000", "#F35E62"), // Red → Salmon
    ("#FFA500", "#F35E62"), // Orange → Salmon
    ("#FFFF00", "#FFFF00"), // Yellow → Yellow
    ("#00FF00", "#FFFF00"), // Green → Yellow
    ("#0000FF", "#0000FF"), // Blue → Blue
    ("#800080", "#800080"), // Purple → Purple
];

const DEUTERANOPIA: &[(&str, &str)] = &[
    ("#FF0000", "#FF0000"), // Red → Red
    ("#FFA500", "#FF6600"), // Orange → Dark Orange
    ("#FFFF00", "#FFAA00"), // Yellow → Orange-Yellow
    ("#00FF00", "#FFFF00"), // Green → Yellow
    ("#0000FF", "#0000FF"), // Blue → Blue
    ("#800080", "#800080"), // Purple → Purple
];

const TRITANOPIA: &[(&str, &str)] = &[
    ("#FF0000", "#E81B1B"), // Red → Deep Red
    ("#FFA500", "#F06C6C"), // Orange → Light Red
    ("#FFFF00", "#F7A7A7"), // Yellow → Pink
    ("#00FF00", "#0E6B6B"), // Green → Dark Cyan
    ("#0000FF", "#00CFCF"), // Blue → Cyan
    ("#800080", "#7A4A42"), // Purple → Brown
];

/// Returns the transform entries for a deficiency type.
///
/// `Normal` carries no entries: every color maps to itself.
#[must_use]
pub const fn entries(deficiency_type: DeficiencyType) -> &'static [(&'static str, &'static str)] {
    match deficiency_type {
        DeficiencyType::Normal => &[],
        DeficiencyType::Protanopia => PROTANOPIA,
        DeficiencyType::Deuteranopia => DEUTERANOPIA,
        DeficiencyType::Tritanopia => TRITANOPIA,
    }
}

/// Resolves a color against the transform table for a deficiency type.
///
/// Pure and total: the input is normalized (trim, leading `#`, uppercase)
/// and exact-matched; a miss returns the normalized input unchanged. An
/// unknown color is not an error, it is a no-op.
///
/// # Examples
///
/// ```
/// use colorsense::models::DeficiencyType;
/// use colorsense::semantics::transform;
///
/// assert_eq!(
///     transform::lookup(DeficiencyType::Protanopia, "#ff0000"),
///     "#F35E62"
/// );
/// assert_eq!(
///     transform::lookup(DeficiencyType::Protanopia, "#123456"),
///     "#123456"
/// );
/// ```
#[must_use]
pub fn lookup(deficiency_type: DeficiencyType, raw_color: &str) -> String {
    let Some(normalized) = color::normalize(raw_color) else {
        return String::new();
    };
    entries(deficiency_type)
        .iter()
        .find(|(original, _)| *original == normalized)
        .map_or(normalized, |(_, adapted)| (*adapted).to_string())
}
