//! The color adaptation engine.
//!
//! Pure element-by-element computation: resolve each color against the
//! transform table, synthesize a semantic description, infer a coarse
//! semantic meaning from the label, and attach an accessibility block.
//! Output order matches input order 1:1; no element is dropped or merged.

use uuid::Uuid;

use super::transform;
use crate::models::element::element_context;
use crate::models::{
    Accessibility, AdaptedElement, ColorAdaptation, DeficiencyType, Preferences, VisualElement,
};

/// Keyword → meaning pairs tried in order against the element label;
/// first case-insensitive substring match wins.
const SEMANTIC_MEANINGS: &[(&str, &str)] = &[
    ("success", "Positive/Success state"),
    ("error", "Error/Warning state"),
    ("warning", "Warning/Caution state"),
    ("info", "Information state"),
    ("neutral", "Neutral state"),
];

/// Meaning reported when no keyword matches the label.
const DEFAULT_MEANING: &str = "Visual information element";

/// Label used in generated output when the element has none.
const DEFAULT_LABEL: &str = "Visual Element";

/// Adapts a batch of visual elements for a deficiency type.
///
/// Pure apart from `@id` generation for id-less elements: identical inputs
/// yield identical adapted colors, descriptions, and meanings.
#[must_use]
pub fn adapt(
    elements: &[VisualElement],
    deficiency_type: DeficiencyType,
    preferences: &Preferences,
) -> Vec<AdaptedElement> {
    elements
        .iter()
        .map(|element| adapt_element(element, deficiency_type, preferences))
        .collect()
}

fn adapt_element(
    element: &VisualElement,
    deficiency_type: DeficiencyType,
    preferences: &Preferences,
) -> AdaptedElement {
    let adapted_color = element
        .color
        .as_deref()
        .map(|color| transform::lookup(deficiency_type, color));

    let label = element.label.as_deref().unwrap_or(DEFAULT_LABEL);

    let text_alternative = element.text_alternative.clone().or_else(|| {
        preferences
            .enable_text_alternatives
            .then(|| format!("Color element: {label}"))
    });

    AdaptedElement {
        context: element_context(),
        element_type: element
            .element_type
            .clone()
            .unwrap_or_else(|| "VisualElement".to_string()),
        id: element
            .id
            .clone()
            .unwrap_or_else(|| format!("cs:element-{}", Uuid::new_v4())),
        name: label.to_string(),
        description: element.description.clone().unwrap_or_default(),
        color: element.color.clone(),
        adaptation: ColorAdaptation {
            adaptation_type: "cs:ColorAdaptation".to_string(),
            daltonism_type: deficiency_type,
            original_color: element.color.clone(),
            adapted_color: adapted_color.clone(),
            semantic_description: semantic_description(deficiency_type, adapted_color.as_deref()),
        },
        accessibility: Accessibility {
            text_alternative,
            semantic_meaning: infer_semantic_meaning(element.label.as_deref()).to_string(),
        },
    }
}

/// Renders the per-type description template for an adapted color.
#[must_use]
pub fn semantic_description(deficiency_type: DeficiencyType, adapted_color: Option<&str>) -> String {
    let color = adapted_color.unwrap_or("unspecified");
    match deficiency_type {
        DeficiencyType::Normal => {
            format!("With typical color vision, this element keeps its original {color} tone")
        }
        DeficiencyType::Protanopia => format!(
            "For protanopia (red-blindness), this element appears in a salmon/brown tone ({color})"
        ),
        DeficiencyType::Deuteranopia => {
            format!("For deuteranopia (green-blindness), this element appears in a {color} tone")
        }
        DeficiencyType::Tritanopia => {
            format!("For tritanopia (blue-blindness), this element appears in a {color} tone")
        }
    }
}

/// Infers a coarse semantic-meaning tag from the element label.
#[must_use]
pub fn infer_semantic_meaning(label: Option<&str>) -> &'static str {
    let Some(label) = label else {
        return DEFAULT_MEANING;
    };
    let label = label.to_lowercase();
    SEMANTIC_MEANINGS
        .iter()
        .find(|(keyword, _)| label.contains(keyword))
        .map_or(DEFAULT_MEANING, |(_, meaning)| *meaning)
}
