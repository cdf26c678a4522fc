//! User profiles, preferences, and adaptation history.
//!
//! Field names follow the persisted wire schema (camelCase). Profiles are
//! documents: one per `userId`, carrying the current deficiency type, a
//! preference set, and an append-only history of adaptation events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::deficiency::DeficiencyType;

/// Smallest accepted font size preference.
pub const FONT_SIZE_MIN: u8 = 12;
/// Largest accepted font size preference.
pub const FONT_SIZE_MAX: u8 = 32;

/// Contrast level preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastLevel {
    /// Reduced contrast.
    Low,
    /// Standard contrast.
    #[default]
    Medium,
    /// Increased contrast.
    High,
}

/// Color scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Light scheme.
    Light,
    /// Dark scheme.
    Dark,
    /// Follow the client's environment.
    #[default]
    Auto,
}

/// User feedback on a recorded adaptation.
///
/// Deserialization is lenient: unrecognized tags coerce to neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Feedback {
    /// The adaptation helped.
    Helpful,
    /// The adaptation did not help.
    NotHelpful,
    /// No judgement either way.
    #[default]
    Neutral,
}

impl Feedback {
    /// Returns the wire name of this tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Helpful => "helpful",
            Self::NotHelpful => "not_helpful",
            Self::Neutral => "neutral",
        }
    }
}

impl From<String> for Feedback {
    fn from(value: String) -> Self {
        match value.as_str() {
            "helpful" => Self::Helpful,
            "not_helpful" => Self::NotHelpful,
            _ => Self::Neutral,
        }
    }
}

impl From<Feedback> for String {
    fn from(value: Feedback) -> Self {
        value.as_str().to_string()
    }
}

/// A user's accessibility preference set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Contrast level: low, medium, or high.
    #[serde(default)]
    pub contrast_level: ContrastLevel,
    /// Font size in points, 12–32.
    #[serde(default = "default_font_size")]
    pub font_size: u8,
    /// Color scheme: light, dark, or auto.
    #[serde(default)]
    pub color_scheme: ColorScheme,
    /// Whether generated text alternatives should be attached to elements.
    #[serde(default = "default_enable_text_alternatives")]
    pub enable_text_alternatives: bool,
}

const fn default_font_size() -> u8 {
    16
}

const fn default_enable_text_alternatives() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            contrast_level: ContrastLevel::default(),
            font_size: default_font_size(),
            color_scheme: ColorScheme::default(),
            enable_text_alternatives: default_enable_text_alternatives(),
        }
    }
}

impl Preferences {
    /// Applies a partial update, overwriting only the keys it carries.
    pub fn merge(&mut self, update: &PreferenceUpdate) {
        if let Some(contrast_level) = update.contrast_level {
            self.contrast_level = contrast_level;
        }
        if let Some(font_size) = update.font_size {
            self.font_size = font_size;
        }
        if let Some(color_scheme) = update.color_scheme {
            self.color_scheme = color_scheme;
        }
        if let Some(enable) = update.enable_text_alternatives {
            self.enable_text_alternatives = enable;
        }
    }
}

/// A partial preference update. Absent keys leave the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceUpdate {
    /// New contrast level, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast_level: Option<ContrastLevel>,
    /// New font size, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u8>,
    /// New color scheme, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<ColorScheme>,
    /// New text-alternatives toggle, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_text_alternatives: Option<bool>,
}

impl PreferenceUpdate {
    /// Returns true when the update carries no keys at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.contrast_level.is_none()
            && self.font_size.is_none()
            && self.color_scheme.is_none()
            && self.enable_text_alternatives.is_none()
    }
}

/// One entry in a profile's append-only adaptation history.
///
/// Batch requests summarize all elements into a single event with
/// comma-joined identifiers and colors. Events are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationEvent {
    /// When the adaptation was recorded.
    pub timestamp: DateTime<Utc>,
    /// Comma-joined element identifiers of the batch.
    #[serde(default)]
    pub element_id: String,
    /// Element kind of the batch (first element's kind, else "mixed").
    #[serde(default)]
    pub element_type: String,
    /// Comma-joined original colors.
    #[serde(default)]
    pub original_color: String,
    /// Comma-joined adapted colors.
    #[serde(default)]
    pub adapted_color: String,
    /// Deficiency type the adaptation was computed for.
    pub daltonism_type_used: DeficiencyType,
    /// User feedback on the adaptation.
    #[serde(default)]
    pub user_feedback: Feedback,
}

/// A persisted user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique user identifier.
    pub user_id: String,
    /// Contact address, if the user supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Current deficiency type.
    #[serde(default)]
    pub daltonism_type: DeficiencyType,
    /// Accessibility preferences.
    #[serde(default)]
    pub preferences: Preferences,
    /// Append-only adaptation history.
    #[serde(default)]
    pub adaptation_history: Vec<AdaptationEvent>,
    /// Free-form semantic metadata bag.
    #[serde(default = "empty_object")]
    pub semantic_metadata: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl UserProfile {
    /// Creates a fresh profile with default preferences and empty history.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            email: None,
            daltonism_type: DeficiencyType::default(),
            preferences: Preferences::default(),
            adaptation_history: Vec::new(),
            semantic_metadata: empty_object(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Bumps the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Appends a history event and bumps the update timestamp.
    pub fn record_event(&mut self, event: AdaptationEvent) {
        self.adaptation_history.push(event);
        self.touch();
    }

    /// Lightweight snapshot returned to clients for local state sync.
    #[must_use]
    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            user_id: self.user_id.clone(),
            daltonism_type: self.daltonism_type,
            preferences: self.preferences.clone(),
        }
    }
}

/// Lightweight profile view embedded in adaptation responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    /// Profile identifier.
    pub user_id: String,
    /// Current deficiency type.
    pub daltonism_type: DeficiencyType,
    /// Current preferences.
    pub preferences: Preferences,
}

/// Aggregate statistics over a profile's adaptation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    /// Number of recorded adaptation events.
    pub total_adaptations: usize,
    /// Number of events the user marked helpful.
    pub helpful_adaptations: usize,
    /// Most frequently adapted element kind; ties resolve to the
    /// lexicographically smallest kind. `None` for an empty history.
    pub most_adapted_element_type: Option<String>,
    /// Current deficiency type.
    pub daltonism_type: DeficiencyType,
    /// Current preferences.
    pub preferences: Preferences,
}
