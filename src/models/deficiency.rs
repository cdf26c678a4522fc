//! Color-vision deficiency types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The color-vision deficiency a profile is adapted for.
///
/// Serialized as the lowercase type name. Deserialization is total:
/// unrecognized values fall back to [`DeficiencyType::Deuteranopia`], the
/// documented default for lenient call sites. Call sites that must reject
/// unknown values use [`DeficiencyType::from_str_strict`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeficiencyType {
    /// Typical color vision; colors are kept unchanged.
    #[default]
    Normal,
    /// Absence of red color perception (red-blindness).
    Protanopia,
    /// Absence of green color perception (green-blindness).
    Deuteranopia,
    /// Absence of blue color perception (blue-blindness).
    Tritanopia,
}

impl DeficiencyType {
    /// The three deficiency variants that carry a transform table.
    pub const DEFICIENCIES: [Self; 3] = [Self::Protanopia, Self::Deuteranopia, Self::Tritanopia];

    /// Returns the lowercase wire name of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Protanopia => "protanopia",
            Self::Deuteranopia => "deuteranopia",
            Self::Tritanopia => "tritanopia",
        }
    }

    /// Parses a type name leniently: unknown values map to the default
    /// fallback (deuteranopia). Case-insensitive.
    #[must_use]
    pub fn from_str_lossy(value: &str) -> Self {
        Self::from_str_strict(value).unwrap_or(Self::Deuteranopia)
    }

    /// Parses a type name strictly, returning `None` for anything that is
    /// not one of the four known names. Case-insensitive.
    #[must_use]
    pub fn from_str_strict(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "protanopia" => Some(Self::Protanopia),
            "deuteranopia" => Some(Self::Deuteranopia),
            "tritanopia" => Some(Self::Tritanopia),
            _ => None,
        }
    }
}

impl From<String> for DeficiencyType {
    fn from(value: String) -> Self {
        Self::from_str_lossy(&value)
    }
}

impl From<DeficiencyType> for String {
    fn from(value: DeficiencyType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DeficiencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
