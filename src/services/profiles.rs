//! Profile CRUD, feedback recording, and statistics.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{validate_preferences, ServiceError};
use crate::models::{
    AdaptationEvent, DeficiencyType, Feedback, PreferenceUpdate, ProfileStats, UserProfile,
};
use crate::store::ProfileStore;

/// Body of a profile creation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    /// Requested user identifier; generated when absent.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Contact address.
    #[serde(default)]
    pub email: Option<String>,
    /// Initial deficiency type; defaults to normal.
    #[serde(default)]
    pub daltonism_type: Option<DeficiencyType>,
    /// Initial preference overrides, merged into defaults.
    #[serde(default)]
    pub preferences: Option<PreferenceUpdate>,
}

/// Body of a partial profile update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New contact address.
    #[serde(default)]
    pub email: Option<String>,
    /// New deficiency type.
    #[serde(default)]
    pub daltonism_type: Option<DeficiencyType>,
    /// Preference overrides, merged per-key.
    #[serde(default)]
    pub preferences: Option<PreferenceUpdate>,
    /// Replacement semantic metadata bag.
    #[serde(default)]
    pub semantic_metadata: Option<Value>,
}

/// Body of an adaptation feedback submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Element the feedback refers to.
    #[serde(default)]
    pub element_id: Option<String>,
    /// Element kind.
    #[serde(default)]
    pub element_type: Option<String>,
    /// Original color as the client saw it.
    #[serde(default)]
    pub original_color: Option<String>,
    /// Adapted color as the client saw it.
    #[serde(default)]
    pub adapted_color: Option<String>,
    /// Feedback tag; defaults to neutral.
    #[serde(default)]
    pub user_feedback: Option<Feedback>,
}

/// Response to a feedback submission.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    /// Confirmation message.
    pub message: String,
    /// The updated profile.
    pub profile: UserProfile,
}

/// Profile operations over the store.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<ProfileStore>,
}

impl ProfileService {
    /// Creates the service over a profile store.
    #[must_use]
    pub const fn new(store: Arc<ProfileStore>) -> Self {
        Self { store }
    }

    /// Fetches a profile by user identifier.
    pub fn get(&self, user_id: &str) -> Result<UserProfile, ServiceError> {
        self.store
            .get(user_id)
            .ok_or_else(|| ServiceError::not_found("Profile not found"))
    }

    /// Creates a new profile.
    ///
    /// The identifier defaults to a fresh UUID, the deficiency type to
    /// normal. Creating an identifier that already exists is a conflict.
    pub fn create(&self, request: CreateProfileRequest) -> Result<UserProfile, ServiceError> {
        if let Some(update) = &request.preferences {
            validate_preferences(update)?;
        }

        let user_id = request
            .user_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if self.store.contains(&user_id) {
            return Err(ServiceError::conflict("Profile already exists"));
        }

        let mut profile = UserProfile::new(&user_id);
        profile.email = request.email;
        profile.daltonism_type = request.daltonism_type.unwrap_or_default();
        if let Some(update) = &request.preferences {
            profile.preferences.merge(update);
        }

        self.store.put(profile.clone())?;
        info!(user = %user_id, "profile created");
        Ok(profile)
    }

    /// Applies a partial update to an existing profile.
    pub fn update(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, ServiceError> {
        if let Some(update) = &request.preferences {
            validate_preferences(update)?;
        }

        let mut profile = self.get(user_id)?;

        if let Some(email) = request.email {
            profile.email = Some(email);
        }
        if let Some(daltonism_type) = request.daltonism_type {
            profile.daltonism_type = daltonism_type;
        }
        if let Some(update) = &request.preferences {
            profile.preferences.merge(update);
        }
        if let Some(metadata) = request.semantic_metadata {
            profile.semantic_metadata = metadata;
        }
        profile.touch();

        self.store.put(profile.clone())?;
        Ok(profile)
    }

    /// Records user feedback as one more history event.
    pub fn record_feedback(
        &self,
        user_id: &str,
        request: FeedbackRequest,
    ) -> Result<FeedbackResponse, ServiceError> {
        let mut profile = self.get(user_id)?;

        profile.record_event(AdaptationEvent {
            timestamp: Utc::now(),
            element_id: request.element_id.unwrap_or_default(),
            element_type: request.element_type.unwrap_or_default(),
            original_color: request.original_color.unwrap_or_default(),
            adapted_color: request.adapted_color.unwrap_or_default(),
            daltonism_type_used: profile.daltonism_type,
            user_feedback: request.user_feedback.unwrap_or_default(),
        });

        self.store.put(profile.clone())?;
        Ok(FeedbackResponse {
            message: "Feedback recorded".to_string(),
            profile,
        })
    }

    /// Computes aggregate statistics over a profile's history.
    pub fn stats(&self, user_id: &str) -> Result<ProfileStats, ServiceError> {
        let profile = self.get(user_id)?;
        let history = &profile.adaptation_history;

        let helpful = history
            .iter()
            .filter(|event| event.user_feedback == Feedback::Helpful)
            .count();

        Ok(ProfileStats {
            total_adaptations: history.len(),
            helpful_adaptations: helpful,
            most_adapted_element_type: most_common_element_type(history),
            daltonism_type: profile.daltonism_type,
            preferences: profile.preferences,
        })
    }
}

/// Most frequent element kind in the history.
///
/// Kinds are counted in a `BTreeMap`, so a tie resolves to the
/// lexicographically smallest kind. Empty history yields `None`.
fn most_common_element_type(history: &[AdaptationEvent]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in history {
        *counts.entry(event.element_type.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(kind_a, count_a), (kind_b, count_b)| {
            // On equal counts prefer the smaller kind, so the reverse
            // comparison makes max_by keep it.
            count_a.cmp(count_b).then_with(|| kind_b.cmp(kind_a))
        })
        .map(|(kind, _)| kind.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContrastLevel;

    fn service() -> ProfileService {
        ProfileService::new(Arc::new(ProfileStore::in_memory()))
    }

    fn feedback_event(element_type: &str, feedback: Feedback) -> AdaptationEvent {
        AdaptationEvent {
            timestamp: Utc::now(),
            element_id: "e".to_string(),
            element_type: element_type.to_string(),
            original_color: "#FF0000".to_string(),
            adapted_color: "#F35E62".to_string(),
            daltonism_type_used: DeficiencyType::Protanopia,
            user_feedback: feedback,
        }
    }

    #[test]
    fn test_create_then_get_roundtrip() {
        let service = service();
        let created = service
            .create(CreateProfileRequest {
                user_id: Some("u1".to_string()),
                daltonism_type: Some(DeficiencyType::Protanopia),
                preferences: Some(PreferenceUpdate {
                    font_size: Some(18),
                    ..PreferenceUpdate::default()
                }),
                ..CreateProfileRequest::default()
            })
            .unwrap();

        let fetched = service.get("u1").unwrap();
        assert_eq!(fetched.daltonism_type, created.daltonism_type);
        assert_eq!(fetched.preferences, created.preferences);
        assert_eq!(fetched.preferences.font_size, 18);
    }

    #[test]
    fn test_create_generates_user_id_when_absent() {
        let service = service();
        let created = service.create(CreateProfileRequest::default()).unwrap();
        assert!(!created.user_id.is_empty());
        assert_eq!(created.daltonism_type, DeficiencyType::Normal);
    }

    #[test]
    fn test_create_conflict_on_existing_id() {
        let service = service();
        let request = CreateProfileRequest {
            user_id: Some("u1".to_string()),
            ..CreateProfileRequest::default()
        };
        service.create(request.clone()).unwrap();
        let error = service.create(request).unwrap_err();
        assert!(matches!(error, ServiceError::Conflict(_)));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let error = service().get("ghost").unwrap_err();
        assert!(matches!(error, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_update_merges_preferences() {
        let service = service();
        service
            .create(CreateProfileRequest {
                user_id: Some("u1".to_string()),
                preferences: Some(PreferenceUpdate {
                    contrast_level: Some(ContrastLevel::High),
                    ..PreferenceUpdate::default()
                }),
                ..CreateProfileRequest::default()
            })
            .unwrap();

        let updated = service
            .update(
                "u1",
                UpdateProfileRequest {
                    preferences: Some(PreferenceUpdate {
                        font_size: Some(20),
                        ..PreferenceUpdate::default()
                    }),
                    ..UpdateProfileRequest::default()
                },
            )
            .unwrap();

        assert_eq!(updated.preferences.font_size, 20);
        assert_eq!(updated.preferences.contrast_level, ContrastLevel::High);
    }

    #[test]
    fn test_update_rejects_out_of_range_font_size() {
        let service = service();
        service
            .create(CreateProfileRequest {
                user_id: Some("u1".to_string()),
                ..CreateProfileRequest::default()
            })
            .unwrap();

        for font_size in [11, 33] {
            let error = service
                .update(
                    "u1",
                    UpdateProfileRequest {
                        preferences: Some(PreferenceUpdate {
                            font_size: Some(font_size),
                            ..PreferenceUpdate::default()
                        }),
                        ..UpdateProfileRequest::default()
                    },
                )
                .unwrap_err();
            assert!(matches!(error, ServiceError::InvalidInput(_)));
        }
        // Bounds themselves are accepted.
        for font_size in [12, 32] {
            service
                .update(
                    "u1",
                    UpdateProfileRequest {
                        preferences: Some(PreferenceUpdate {
                            font_size: Some(font_size),
                            ..PreferenceUpdate::default()
                        }),
                        ..UpdateProfileRequest::default()
                    },
                )
                .unwrap();
        }
    }

    #[test]
    fn test_feedback_appends_history() {
        let service = service();
        service
            .create(CreateProfileRequest {
                user_id: Some("u1".to_string()),
                daltonism_type: Some(DeficiencyType::Tritanopia),
                ..CreateProfileRequest::default()
            })
            .unwrap();

        let response = service
            .record_feedback(
                "u1",
                FeedbackRequest {
                    element_id: Some("a".to_string()),
                    element_type: Some("button".to_string()),
                    original_color: Some("#FF0000".to_string()),
                    adapted_color: Some("#E81B1B".to_string()),
                    user_feedback: Some(Feedback::Helpful),
                },
            )
            .unwrap();

        assert_eq!(response.message, "Feedback recorded");
        assert_eq!(response.profile.adaptation_history.len(), 1);
        let event = &response.profile.adaptation_history[0];
        assert_eq!(event.user_feedback, Feedback::Helpful);
        // The event carries the profile's current type.
        assert_eq!(event.daltonism_type_used, DeficiencyType::Tritanopia);
    }

    #[test]
    fn test_stats_counts_and_tie_break() {
        let service = service();
        let mut profile = UserProfile::new("u1");
        profile.adaptation_history = vec![
            feedback_event("chart", Feedback::Helpful),
            feedback_event("button", Feedback::Neutral),
            feedback_event("chart", Feedback::NotHelpful),
        ];
        service.store.put(profile).unwrap();

        let stats = service.stats("u1").unwrap();
        assert_eq!(stats.total_adaptations, 3);
        assert_eq!(stats.helpful_adaptations, 1);
        assert_eq!(stats.most_adapted_element_type.as_deref(), Some("chart"));
    }

    #[test]
    fn test_stats_tie_resolves_lexicographically() {
        let service = service();
        let mut profile = UserProfile::new("u1");
        profile.adaptation_history = vec![
            feedback_event("zebra", Feedback::Neutral),
            feedback_event("alpha", Feedback::Neutral),
        ];
        service.store.put(profile).unwrap();

        let stats = service.stats("u1").unwrap();
        assert_eq!(stats.most_adapted_element_type.as_deref(), Some("alpha"));
    }

    #[test]
    fn test_stats_empty_history() {
        let service = service();
        service
            .create(CreateProfileRequest {
                user_id: Some("u1".to_string()),
                ..CreateProfileRequest::default()
            })
            .unwrap();

        let stats = service.stats("u1").unwrap();
        assert_eq!(stats.total_adaptations, 0);
        assert_eq!(stats.most_adapted_element_type, None);
    }
}
