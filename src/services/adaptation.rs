//! Adaptation orchestration.
//!
//! Resolves or creates the requesting user's profile, merges request
//! overrides into it, delegates computation to the adaptation engine,
//! appends exactly one history event for the batch, persists the profile
//! once, and assembles the response envelope.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::{validate_preferences, ServiceError};
use crate::models::{
    AdaptationEvent, AdaptedElement, DeficiencyType, Feedback, PreferenceUpdate, ProfileSnapshot,
    UserProfile, VisualElement,
};
use crate::semantics::{engine, OntologyCatalog};
use crate::store::ProfileStore;

/// Engine identifier reported in response metadata.
pub const ENGINE_VERSION: &str = "color-sense-semantic-v2";

/// Ontology version reported in response metadata.
pub const ONTOLOGY_VERSION: &str = "2.0";

/// Profile id used when the request names no user.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Profile fields accompanying an adaptation request.
#[derive(Debug, Clone)]
pub struct ProfileRef {
    /// Requesting user, if identified.
    pub user_id: Option<String>,
    /// Deficiency type to adapt for. Required at the boundary.
    pub daltonism_type: DeficiencyType,
    /// Preference overrides to merge into the stored profile.
    pub preferences: Option<PreferenceUpdate>,
}

/// A validated adaptation request.
#[derive(Debug, Clone)]
pub struct AdaptRequest {
    /// Profile reference from the request body.
    pub profile: ProfileRef,
    /// Elements to adapt, colors already normalized.
    pub elements: Vec<VisualElement>,
}

/// Response envelope for one adaptation request.
#[derive(Debug, Clone, Serialize)]
pub struct AdaptationResult {
    /// JSON-LD context.
    #[serde(rename = "@context")]
    pub context: String,
    /// JSON-LD node type, always "AdaptationResult".
    #[serde(rename = "@type")]
    pub result_type: String,
    /// Adapted elements, in input order.
    #[serde(rename = "adaptedElements")]
    pub adapted_elements: Vec<AdaptedElement>,
    /// Request metadata.
    pub meta: AdaptationMeta,
    /// Ontology enrichment for client convenience.
    #[serde(rename = "semanticMetadata")]
    pub semantic_metadata: SemanticMetadata,
}

/// Metadata block of an adaptation response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationMeta {
    /// Engine identifier.
    pub engine: String,
    /// Profile the adaptation was recorded against.
    pub profile_used: String,
    /// Deficiency type applied.
    pub daltonism_type: DeficiencyType,
    /// Profile snapshot for client-side state sync.
    pub profile: ProfileSnapshot,
    /// When the adaptation was computed.
    pub timestamp: DateTime<Utc>,
    /// Ontology version.
    pub ontology_version: String,
}

/// Ontology enrichment attached to adaptation responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticMetadata {
    /// The full ontology graph.
    pub ontology: Value,
    /// Number of adapted elements.
    pub total_elements: usize,
}

/// Orchestrates adaptation requests against the store and the engine.
#[derive(Clone)]
pub struct AdaptationService {
    store: Arc<ProfileStore>,
    catalog: Arc<OntologyCatalog>,
}

impl AdaptationService {
    /// Creates the service over a profile store and ontology catalog.
    #[must_use]
    pub const fn new(store: Arc<ProfileStore>, catalog: Arc<OntologyCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Handles one adaptation request end to end.
    ///
    /// Persistence is all-or-nothing: the profile upsert and the history
    /// append land in a single store write, so a store failure records
    /// nothing.
    pub fn adapt(&self, request: AdaptRequest) -> Result<AdaptationResult, ServiceError> {
        let AdaptRequest { profile: profile_ref, elements } = request;

        if let Some(update) = &profile_ref.preferences {
            validate_preferences(update)?;
        }

        let user_id = profile_ref
            .user_id
            .clone()
            .unwrap_or_else(|| ANONYMOUS_USER.to_string());
        let daltonism_type = profile_ref.daltonism_type;

        let mut profile = match self.store.get(&user_id) {
            Some(mut existing) => {
                let mut changed = false;
                if existing.daltonism_type != daltonism_type {
                    existing.daltonism_type = daltonism_type;
                    changed = true;
                }
                if let Some(update) = &profile_ref.preferences {
                    if !update.is_empty() {
                        existing.preferences.merge(update);
                        changed = true;
                    }
                }
                if changed {
                    existing.touch();
                }
                existing
            }
            None => {
                let mut created = UserProfile::new(&user_id);
                created.daltonism_type = daltonism_type;
                if let Some(update) = &profile_ref.preferences {
                    created.preferences.merge(update);
                }
                created
            }
        };

        let adapted = engine::adapt(&elements, daltonism_type, &profile.preferences);

        profile.record_event(batch_event(&elements, &adapted, daltonism_type));
        self.store.put(profile.clone())?;

        info!(
            user = %profile.user_id,
            daltonism_type = %daltonism_type,
            elements = adapted.len(),
            "adaptation recorded"
        );

        Ok(AdaptationResult {
            context: "http://schema.org".to_string(),
            result_type: "AdaptationResult".to_string(),
            meta: AdaptationMeta {
                engine: ENGINE_VERSION.to_string(),
                profile_used: profile.user_id.clone(),
                daltonism_type,
                profile: profile.snapshot(),
                timestamp: Utc::now(),
                ontology_version: ONTOLOGY_VERSION.to_string(),
            },
            semantic_metadata: SemanticMetadata {
                ontology: self.catalog.graph().clone(),
                total_elements: adapted.len(),
            },
            adapted_elements: adapted,
        })
    }
}

/// Summarizes a batch into a single history event: identifiers and colors
/// comma-joined, element kind taken from the first element.
fn batch_event(
    elements: &[VisualElement],
    adapted: &[AdaptedElement],
    daltonism_type: DeficiencyType,
) -> AdaptationEvent {
    let join = |parts: Vec<&str>| parts.join(",");

    AdaptationEvent {
        timestamp: Utc::now(),
        element_id: join(
            elements
                .iter()
                .map(|element| element.id.as_deref().unwrap_or_default())
                .collect(),
        ),
        element_type: elements
            .first()
            .and_then(|element| element.element_type.clone())
            .unwrap_or_else(|| "mixed".to_string()),
        original_color: join(
            elements
                .iter()
                .map(|element| element.color.as_deref().unwrap_or_default())
                .collect(),
        ),
        adapted_color: join(
            adapted
                .iter()
                .map(|element| element.adaptation.adapted_color.as_deref().unwrap_or_default())
                .collect(),
        ),
        daltonism_type_used: daltonism_type,
        user_feedback: Feedback::default(),
    }
}
