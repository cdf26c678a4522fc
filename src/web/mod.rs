//! Web API module for ColorSense.
//!
//! This module provides the REST API of the color adaptation backend,
//! enabling clients to adapt visual elements, introspect the ontology and
//! transform tables, and manage user profiles.
//!
//! # Endpoints
//!
//! - `GET /` - Service index
//! - `GET /health` - Health check
//! - `POST /api/adapt` - Adapt visual elements for a deficiency type
//! - `GET /api/ontology/daltonism` - Full ontology graph
//! - `POST /api/sparql` - Toy SPARQL query over the ontology
//! - `GET /api/color-transformations/{type}` - Transform table for a type
//! - `GET /api/profiles/{userId}` - Fetch a profile
//! - `POST /api/profiles` - Create a profile
//! - `PUT /api/profiles/{userId}` - Partially update a profile
//! - `POST /api/profiles/{userId}/adaptation-feedback` - Record feedback
//! - `GET /api/profiles/{userId}/stats` - Profile statistics

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::{
    color, DeficiencyType, PreferenceUpdate, ProfileStats, UserProfile, VisualElement,
};
use crate::semantics::OntologyCatalog;
use crate::services::adaptation::AdaptationResult;
use crate::services::profiles::{
    CreateProfileRequest, FeedbackRequest, FeedbackResponse, UpdateProfileRequest,
};
use crate::services::{
    AdaptRequest, AdaptationService, ProfileRef, ProfileService, ServiceError,
};
use crate::store::ProfileStore;

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Adaptation orchestration service.
    adaptation: AdaptationService,
    /// Profile CRUD service.
    profiles: ProfileService,
    /// Ontology catalog (immutable after load).
    catalog: Arc<OntologyCatalog>,
}

impl AppState {
    /// Creates a new application state over a profile store.
    pub fn new(store: Arc<ProfileStore>) -> anyhow::Result<Self> {
        let catalog = Arc::new(OntologyCatalog::load()?);
        Ok(Self {
            adaptation: AdaptationService::new(Arc::clone(&store), Arc::clone(&catalog)),
            profiles: ProfileService::new(store),
            catalog,
        })
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// SPARQL query request.
#[derive(Debug, Deserialize)]
pub struct SparqlRequest {
    /// The query string.
    #[serde(default)]
    pub query: Option<String>,
}

/// SPARQL query response.
#[derive(Debug, Serialize)]
pub struct SparqlResponse {
    /// Result format context.
    #[serde(rename = "@context")]
    pub context: String,
    /// Query results.
    pub results: SparqlResults,
}

/// Bindings block of a SPARQL response.
#[derive(Debug, Serialize)]
pub struct SparqlResults {
    /// Matching graph nodes.
    pub bindings: Vec<Value>,
}

/// Transform table response for one deficiency type.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationsResponse {
    /// The deficiency type the table applies to.
    pub daltonism_type: DeficiencyType,
    /// Original hex → adapted hex.
    pub transformations: Map<String, Value>,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

/// Maps a service error to its HTTP representation.
fn error_response(error: ServiceError) -> (StatusCode, Json<ApiError>) {
    let status = match &error {
        ServiceError::InvalidInput(_) | ServiceError::Conflict(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiError::new(error.to_string())))
}

// ============================================================================
// Adapt Request Parsing
// ============================================================================

/// Raw element shape accepted by the adapt endpoint.
///
/// The color may arrive under any of four field names; they are collapsed
/// here, at the boundary, into one normalized color in priority order.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementDto {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    original_color: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    hex: Option<String>,
    #[serde(default)]
    color_hex: Option<String>,
    #[serde(default, rename = "@type")]
    at_type: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    text_alternative: Option<String>,
}

impl ElementDto {
    /// Collapses the dynamic shape into the typed engine input.
    fn into_element(self) -> VisualElement {
        let raw_color = self
            .original_color
            .or(self.color)
            .or(self.hex)
            .or(self.color_hex);

        VisualElement {
            id: self.id.or(self.legacy_id),
            label: self.label,
            description: self.description,
            color: raw_color.as_deref().and_then(color::normalize),
            element_type: self.at_type.or(self.kind),
            text_alternative: self.text_alternative,
        }
    }
}

/// Validates and normalizes the dynamic adapt payload.
///
/// The profile reference must carry a deficiency type and `elements` must
/// be a JSON array; anything else is invalid input before any state is
/// touched.
fn parse_adapt_request(body: &Value) -> Result<AdaptRequest, ServiceError> {
    let profile = body
        .get("userProfile")
        .filter(|value| value.is_object())
        .ok_or_else(|| ServiceError::invalid_input("Invalid user profile"))?;

    let daltonism_type = profile
        .get("daltonismType")
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .map(DeficiencyType::from_str_lossy)
        .ok_or_else(|| ServiceError::invalid_input("Invalid user profile"))?;

    let user_id = profile
        .get("userId")
        .and_then(Value::as_str)
        .map(ToString::to_string);

    let preferences = match profile.get("preferences") {
        Some(value) if value.is_object() => Some(
            serde_json::from_value::<PreferenceUpdate>(value.clone())
                .map_err(|error| ServiceError::invalid_input(format!("Invalid preferences: {error}")))?,
        ),
        _ => None,
    };

    let elements = body
        .get("elements")
        .and_then(Value::as_array)
        .ok_or_else(|| ServiceError::invalid_input("Elements must be an array"))?;

    let elements = elements
        .iter()
        .map(|element| {
            serde_json::from_value::<ElementDto>(element.clone())
                .map(ElementDto::into_element)
                .map_err(|error| ServiceError::invalid_input(format!("Invalid element: {error}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AdaptRequest {
        profile: ProfileRef {
            user_id,
            daltonism_type,
            preferences,
        },
        elements,
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET / - Service index.
async fn service_index() -> Json<Value> {
    Json(json!({
        "name": "ColorSense Backend",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Semantic color adaptation for color-vision accessibility",
        "endpoints": {
            "POST /api/adapt": "Adapt visual content for color blindness",
            "GET /api/ontology/daltonism": "Get daltonism ontology",
            "POST /api/sparql": "Execute SPARQL queries",
            "GET /api/color-transformations/{type}": "Get a transform table",
            "GET /api/profiles/{userId}": "Get user profile",
            "POST /api/profiles": "Create user profile",
            "PUT /api/profiles/{userId}": "Update user profile",
            "POST /api/profiles/{userId}/adaptation-feedback": "Record feedback",
            "GET /api/profiles/{userId}/stats": "Get profile statistics",
        },
    }))
}

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/adapt - Adapt a batch of visual elements.
async fn adapt_content(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<AdaptationResult>, (StatusCode, Json<ApiError>)> {
    let request = parse_adapt_request(&body).map_err(error_response)?;
    let result = state.adaptation.adapt(request).map_err(error_response)?;
    Ok(Json(result))
}

/// GET /api/ontology/daltonism - Full ontology graph.
async fn get_ontology(State(state): State<AppState>) -> Json<Value> {
    Json(state.catalog.graph().clone())
}

/// POST /api/sparql - Toy SPARQL query endpoint.
async fn sparql_query(
    State(state): State<AppState>,
    Json(request): Json<SparqlRequest>,
) -> Result<Json<SparqlResponse>, (StatusCode, Json<ApiError>)> {
    let query = request
        .query
        .filter(|query| !query.is_empty())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new("Query parameter required")),
            )
        })?;

    Ok(Json(SparqlResponse {
        context: "http://www.w3.org/ns/sparql-results-json".to_string(),
        results: SparqlResults {
            bindings: state.catalog.query(&query),
        },
    }))
}

/// GET /api/color-transformations/{type} - Transform table for a type.
///
/// Only the three deficiency types carry a table; anything else, including
/// "normal", is rejected.
async fn get_color_transformations(
    State(state): State<AppState>,
    Path(daltonism_type): Path<String>,
) -> Result<Json<TransformationsResponse>, (StatusCode, Json<ApiError>)> {
    let parsed = DeficiencyType::from_str_strict(&daltonism_type)
        .filter(|parsed| DeficiencyType::DEFICIENCIES.contains(parsed))
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new("Invalid daltonism type")),
            )
        })?;

    Ok(Json(TransformationsResponse {
        daltonism_type: parsed,
        transformations: state.catalog.transformations(parsed),
    }))
}

/// GET /api/profiles/{userId} - Fetch a profile.
async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, (StatusCode, Json<ApiError>)> {
    let profile = state.profiles.get(&user_id).map_err(error_response)?;
    Ok(Json(profile))
}

/// POST /api/profiles - Create a profile.
async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<UserProfile>), (StatusCode, Json<ApiError>)> {
    let profile = state.profiles.create(request).map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// PUT /api/profiles/{userId} - Partially update a profile.
async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, (StatusCode, Json<ApiError>)> {
    let profile = state
        .profiles
        .update(&user_id, request)
        .map_err(error_response)?;
    Ok(Json(profile))
}

/// POST /api/profiles/{userId}/adaptation-feedback - Record feedback.
async fn record_feedback(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, (StatusCode, Json<ApiError>)> {
    let response = state
        .profiles
        .record_feedback(&user_id, request)
        .map_err(error_response)?;
    Ok(Json(response))
}

/// GET /api/profiles/{userId}/stats - Profile statistics.
async fn get_profile_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileStats>, (StatusCode, Json<ApiError>)> {
    let stats = state.profiles.stats(&user_id).map_err(error_response)?;
    Ok(Json(stats))
}

/// Fallback for unknown routes.
async fn endpoint_not_found() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new("Endpoint not found")),
    )
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS: the backend serves browser clients from arbitrary
    // demo origins. Restrict origins before exposing this beyond a demo.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Service info
        .route("/", get(service_index))
        .route("/health", get(health_check))
        // Adaptation endpoints
        .route("/api/adapt", post(adapt_content))
        .route("/api/ontology/daltonism", get(get_ontology))
        .route("/api/sparql", post(sparql_query))
        .route(
            "/api/color-transformations/{type}",
            get(get_color_transformations),
        )
        // Profile endpoints
        .route("/api/profiles", post(create_profile))
        .route(
            "/api/profiles/{userId}",
            get(get_profile).put(update_profile),
        )
        .route(
            "/api/profiles/{userId}/adaptation-feedback",
            post(record_feedback),
        )
        .route("/api/profiles/{userId}/stats", get(get_profile_stats))
        .fallback(endpoint_not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Errors
///
/// Returns an error if the state cannot be built or the server fails to
/// start.
pub async fn run_server(store: Arc<ProfileStore>, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(store)?;
    let app = create_router(state);

    info!("Starting ColorSense server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
