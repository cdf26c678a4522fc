//! Data models for visual elements, deficiency types, and user profiles.
//!
//! This module contains the core data structures used throughout the
//! application. Models are designed to be independent of transport and
//! business logic.

pub mod color;
pub mod deficiency;
pub mod element;
pub mod profile;

// Re-export all model types
pub use deficiency::DeficiencyType;
pub use element::{Accessibility, AdaptedElement, ColorAdaptation, VisualElement};
pub use profile::{
    AdaptationEvent, ColorScheme, ContrastLevel, Feedback, PreferenceUpdate, Preferences,
    ProfileSnapshot, ProfileStats, UserProfile,
};
