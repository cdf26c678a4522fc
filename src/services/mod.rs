//! Service layer for business logic.
//!
//! Services coordinate the store, the semantic layer, and the error
//! taxonomy; transport concerns stay in the web module.

pub mod adaptation;
pub mod error;
pub mod profiles;

pub use adaptation::{AdaptRequest, AdaptationResult, AdaptationService, ProfileRef};
pub use error::ServiceError;
pub use profiles::ProfileService;

use crate::models::profile::{FONT_SIZE_MAX, FONT_SIZE_MIN};
use crate::models::PreferenceUpdate;

/// Validates a preference update before it is merged anywhere.
pub fn validate_preferences(update: &PreferenceUpdate) -> Result<(), ServiceError> {
    if let Some(font_size) = update.font_size {
        if !(FONT_SIZE_MIN..=FONT_SIZE_MAX).contains(&font_size) {
            return Err(ServiceError::invalid_input(format!(
                "fontSize must be between {FONT_SIZE_MIN} and {FONT_SIZE_MAX}, got {font_size}"
            )));
        }
    }
    Ok(())
}
