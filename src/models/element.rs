//! Visual elements: adaptation input and JSON-LD output shapes.

use serde::Serialize;
use serde_json::{json, Value};

use super::deficiency::DeficiencyType;

/// A visual element submitted for color adaptation.
///
/// Transient: lives for the duration of a single request. The color has
/// already been normalized at the input boundary; `None` means the element
/// carried no usable color field at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualElement {
    /// Client-supplied element identifier.
    pub id: Option<String>,
    /// Display label, also the substrate for semantic-meaning inference.
    pub label: Option<String>,
    /// Free-form element description.
    pub description: Option<String>,
    /// Normalized original color (`#RRGGBB`-style, best effort).
    pub color: Option<String>,
    /// Element kind tag; rendered as "VisualElement" when absent.
    pub element_type: Option<String>,
    /// Element-provided accessibility text alternative.
    pub text_alternative: Option<String>,
}

/// The JSON-LD `@context` attached to every adapted element.
#[must_use]
pub fn element_context() -> Value {
    json!({
        "@vocab": "http://schema.org/",
        "cs": "http://colorsense.schema.org/",
    })
}

/// One adapted element in a response, shaped as a JSON-LD node.
///
/// Constructed fresh per request and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct AdaptedElement {
    /// JSON-LD context for the node.
    #[serde(rename = "@context")]
    pub context: Value,
    /// Element kind tag.
    #[serde(rename = "@type")]
    pub element_type: String,
    /// Element identifier; generated (`cs:element-<uuid>`) when the input
    /// carried none.
    #[serde(rename = "@id")]
    pub id: String,
    /// Display label.
    pub name: String,
    /// Free-form description (empty string when absent).
    pub description: String,
    /// The original, normalized color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// The structured adaptation record.
    #[serde(rename = "cs:adaptation")]
    pub adaptation: ColorAdaptation,
    /// Accessibility annotations.
    pub accessibility: Accessibility,
}

/// The structured record of one color adaptation.
#[derive(Debug, Clone, Serialize)]
pub struct ColorAdaptation {
    /// JSON-LD node type, always `cs:ColorAdaptation`.
    #[serde(rename = "@type")]
    pub adaptation_type: String,
    /// Deficiency type the adaptation was computed for.
    #[serde(rename = "cs:daltonismType")]
    pub daltonism_type: DeficiencyType,
    /// Original color, when the element carried one.
    #[serde(rename = "cs:originalColor", skip_serializing_if = "Option::is_none")]
    pub original_color: Option<String>,
    /// Adapted color, when the element carried one.
    #[serde(rename = "cs:adaptedColor", skip_serializing_if = "Option::is_none")]
    pub adapted_color: Option<String>,
    /// Human-readable description of how the element appears.
    #[serde(rename = "cs:semanticDescription")]
    pub semantic_description: String,
}

/// Accessibility annotations for an adapted element.
#[derive(Debug, Clone, Serialize)]
pub struct Accessibility {
    /// Text alternative for the element; omitted when neither the element
    /// nor the profile preferences provide one.
    #[serde(rename = "textAlternative", skip_serializing_if = "Option::is_none")]
    pub text_alternative: Option<String>,
    /// Coarse semantic-meaning tag inferred from the label.
    #[serde(rename = "semanticMeaning")]
    pub semantic_meaning: String,
}
