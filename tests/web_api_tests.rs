//! Integration tests for the ColorSense Web API.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use colorsense::store::ProfileStore;
use colorsense::web::{create_router, AppState};

/// Creates a router over a fresh in-memory store.
fn create_test_app() -> axum::Router {
    let store = Arc::new(ProfileStore::in_memory());
    let state = AppState::new(store).expect("Failed to create app state");
    create_router(state)
}

/// Helper to make a GET request and get the response body as JSON.
async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a request with a JSON body.
async fn send_json(app: &axum::Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send_json(app, "POST", uri, body).await
}

async fn put_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send_json(app, "PUT", uri, body).await
}

// ============================================================================
// Service Info Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_service_index_lists_endpoints() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "ColorSense Backend");
    assert!(json["endpoints"]["POST /api/adapt"].is_string());
}

#[tokio::test]
async fn test_unknown_endpoint_is_json_404() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/api/no-such-thing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Endpoint not found");
}

// ============================================================================
// Adapt Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_adapt_protanopia_red_becomes_salmon() {
    let app = create_test_app();

    let (status, json) = post_json(
        &app,
        "/api/adapt",
        json!({
            "userProfile": {"userId": "u1", "daltonismType": "protanopia"},
            "elements": [{"id": "a", "originalColor": "#ff0000"}],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["@type"], "AdaptationResult");
    assert_eq!(json["@context"], "http://schema.org");

    let element = &json["adaptedElements"][0];
    assert_eq!(element["@id"], "a");
    assert_eq!(element["color"], "#FF0000");
    assert_eq!(element["cs:adaptation"]["cs:adaptedColor"], "#F35E62");
    assert_eq!(element["cs:adaptation"]["cs:daltonismType"], "protanopia");
    assert!(element["cs:adaptation"]["cs:semanticDescription"]
        .as_str()
        .unwrap()
        .contains("#F35E62"));

    assert_eq!(json["meta"]["engine"], "color-sense-semantic-v2");
    assert_eq!(json["meta"]["profileUsed"], "u1");
    assert_eq!(json["meta"]["daltonismType"], "protanopia");
    assert_eq!(json["meta"]["ontologyVersion"], "2.0");
    assert_eq!(json["meta"]["profile"]["userId"], "u1");
    assert!(json["meta"]["timestamp"].is_string());

    assert_eq!(json["semanticMetadata"]["totalElements"], 1);
    assert!(json["semanticMetadata"]["ontology"]["@graph"].is_array());
}

#[tokio::test]
async fn test_adapt_unknown_color_passes_through() {
    let app = create_test_app();

    let (status, json) = post_json(
        &app,
        "/api/adapt",
        json!({
            "elements": [{"id": "b", "originalColor": "#123456"}],
            "userProfile": {"userId": "u1", "daltonismType": "tritanopia"},
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["adaptedElements"][0]["cs:adaptation"]["cs:adaptedColor"],
        "#123456"
    );
}

#[tokio::test]
async fn test_adapt_accepts_alternate_color_fields() {
    let app = create_test_app();

    let (status, json) = post_json(
        &app,
        "/api/adapt",
        json!({
            "userProfile": {"userId": "u1", "daltonismType": "deuteranopia"},
            "elements": [
                {"id": "a", "color": "#ffa500"},
                {"id": "b", "hex": "00ff00"},
                {"id": "c", "colorHex": "#0000FF"},
            ],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let elements = json["adaptedElements"].as_array().unwrap();
    assert_eq!(elements.len(), 3);
    assert_eq!(elements[0]["cs:adaptation"]["cs:adaptedColor"], "#FF6600");
    assert_eq!(elements[1]["cs:adaptation"]["cs:adaptedColor"], "#FFFF00");
    assert_eq!(elements[2]["cs:adaptation"]["cs:adaptedColor"], "#0000FF");
}

#[tokio::test]
async fn test_adapt_missing_daltonism_type_is_rejected() {
    let app = create_test_app();

    let (status, json) = post_json(
        &app,
        "/api/adapt",
        json!({
            "userProfile": {"userId": "u1"},
            "elements": [],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid user profile");
}

#[tokio::test]
async fn test_adapt_elements_must_be_an_array() {
    let app = create_test_app();

    let (status, json) = post_json(
        &app,
        "/api/adapt",
        json!({
            "userProfile": {"userId": "u1", "daltonismType": "protanopia"},
            "elements": {"id": "a"},
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Elements must be an array");
}

#[tokio::test]
async fn test_adapt_creates_profile_and_appends_history() {
    let app = create_test_app();

    let body = json!({
        "userProfile": {"userId": "history-user", "daltonismType": "protanopia"},
        "elements": [{"id": "a", "label": "Error banner", "originalColor": "#FF0000"}],
    });

    post_json(&app, "/api/adapt", body.clone()).await;
    post_json(&app, "/api/adapt", body).await;

    let (status, profile) = get_json(&app, "/api/profiles/history-user").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["daltonismType"], "protanopia");
    let history = profile["adaptationHistory"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["elementId"], "a");
    assert_eq!(history[0]["originalColor"], "#FF0000");
    assert_eq!(history[0]["adaptedColor"], "#F35E62");
    assert_eq!(history[0]["daltonismTypeUsed"], "protanopia");
    assert_eq!(history[0]["userFeedback"], "neutral");
}

#[tokio::test]
async fn test_adapt_merges_preferences_into_existing_profile() {
    let app = create_test_app();

    post_json(
        &app,
        "/api/profiles",
        json!({
            "userId": "merge-user",
            "daltonismType": "protanopia",
            "preferences": {"contrastLevel": "high"},
        }),
    )
    .await;

    let (status, _) = post_json(
        &app,
        "/api/adapt",
        json!({
            "userProfile": {
                "userId": "merge-user",
                "daltonismType": "tritanopia",
                "preferences": {"fontSize": 20},
            },
            "elements": [],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, profile) = get_json(&app, "/api/profiles/merge-user").await;
    assert_eq!(profile["daltonismType"], "tritanopia");
    assert_eq!(profile["preferences"]["fontSize"], 20);
    assert_eq!(profile["preferences"]["contrastLevel"], "high");
}

#[tokio::test]
async fn test_adapt_semantic_meaning_and_accessibility() {
    let app = create_test_app();

    let (_, json) = post_json(
        &app,
        "/api/adapt",
        json!({
            "userProfile": {"userId": "u1", "daltonismType": "deuteranopia"},
            "elements": [{"id": "a", "label": "Success indicator", "originalColor": "#00FF00"}],
        }),
    )
    .await;

    let element = &json["adaptedElements"][0];
    assert_eq!(
        element["accessibility"]["semanticMeaning"],
        "Positive/Success state"
    );
    assert_eq!(
        element["accessibility"]["textAlternative"],
        "Color element: Success indicator"
    );
    assert_eq!(element["name"], "Success indicator");
}

// ============================================================================
// Ontology and SPARQL Tests
// ============================================================================

#[tokio::test]
async fn test_get_ontology_graph() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/api/ontology/daltonism").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["@context"]["cs"].is_string());
    let graph = json["@graph"].as_array().unwrap();
    assert_eq!(graph.len(), 9);
    assert_eq!(graph[0]["@id"], "cs:Daltonism");
}

#[tokio::test]
async fn test_sparql_daltonism_query_returns_bindings() {
    let app = create_test_app();

    let (status, json) = post_json(
        &app,
        "/api/sparql",
        json!({"query": "SELECT ?d WHERE { ?d rdf:type cs:Daltonism }"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["@context"], "http://www.w3.org/ns/sparql-results-json");
    let bindings = json["results"]["bindings"].as_array().unwrap();
    assert_eq!(bindings.len(), 3);
    assert_eq!(bindings[0]["@id"], "cs:Protanopia");
}

#[tokio::test]
async fn test_sparql_unsupported_query_is_empty() {
    let app = create_test_app();

    let (status, json) = post_json(
        &app,
        "/api/sparql",
        json!({"query": "SELECT * WHERE { ?s ?p ?o }"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["results"]["bindings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_sparql_missing_query_is_rejected() {
    let app = create_test_app();

    let (status, json) = post_json(&app, "/api/sparql", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Query parameter required");
}

// ============================================================================
// Color Transformations Tests
// ============================================================================

#[tokio::test]
async fn test_get_color_transformations() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/api/color-transformations/protanopia").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["daltonismType"], "protanopia");
    let transformations = json["transformations"].as_object().unwrap();
    assert_eq!(transformations.len(), 6);
    assert_eq!(transformations["#FF0000"], "#F35E62");
    assert_eq!(transformations["#00FF00"], "#FFFF00");
}

#[tokio::test]
async fn test_get_color_transformations_unknown_type() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/api/color-transformations/xyz").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid daltonism type");
}

#[tokio::test]
async fn test_get_color_transformations_rejects_normal() {
    let app = create_test_app();

    let (status, _) = get_json(&app, "/api/color-transformations/normal").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Profile Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_fetch_profile_roundtrip() {
    let app = create_test_app();

    let (status, created) = post_json(
        &app,
        "/api/profiles",
        json!({
            "userId": "u1",
            "email": "user@example.com",
            "daltonismType": "deuteranopia",
            "preferences": {"fontSize": 18},
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["userId"], "u1");

    let (status, fetched) = get_json(&app, "/api/profiles/u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["daltonismType"], "deuteranopia");
    assert_eq!(fetched["email"], "user@example.com");
    assert_eq!(fetched["preferences"]["fontSize"], 18);
    assert_eq!(fetched["preferences"]["colorScheme"], "auto");
}

#[tokio::test]
async fn test_create_profile_defaults() {
    let app = create_test_app();

    let (status, created) = post_json(&app, "/api/profiles", json!({})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!created["userId"].as_str().unwrap().is_empty());
    assert_eq!(created["daltonismType"], "normal");
    assert_eq!(created["preferences"]["contrastLevel"], "medium");
}

#[tokio::test]
async fn test_create_profile_conflict() {
    let app = create_test_app();

    post_json(&app, "/api/profiles", json!({"userId": "u1"})).await;
    let (status, json) = post_json(&app, "/api/profiles", json!({"userId": "u1"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Profile already exists");
}

#[tokio::test]
async fn test_get_missing_profile_is_404() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/api/profiles/ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Profile not found");
}

#[tokio::test]
async fn test_update_profile_merges_preferences() {
    let app = create_test_app();

    post_json(
        &app,
        "/api/profiles",
        json!({"userId": "u1", "preferences": {"contrastLevel": "high"}}),
    )
    .await;

    let (status, updated) = put_json(
        &app,
        "/api/profiles/u1",
        json!({"preferences": {"fontSize": 20}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["preferences"]["fontSize"], 20);
    // Other preference keys are untouched.
    assert_eq!(updated["preferences"]["contrastLevel"], "high");
}

#[tokio::test]
async fn test_update_profile_font_size_out_of_range() {
    let app = create_test_app();

    post_json(&app, "/api/profiles", json!({"userId": "u1"})).await;

    let (status, _) = put_json(
        &app,
        "/api/profiles/u1",
        json!({"preferences": {"fontSize": 64}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_missing_profile_is_404() {
    let app = create_test_app();

    let (status, _) = put_json(&app, "/api/profiles/ghost", json!({"email": "x@y.z"})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_record_feedback() {
    let app = create_test_app();

    post_json(
        &app,
        "/api/profiles",
        json!({"userId": "u1", "daltonismType": "tritanopia"}),
    )
    .await;

    let (status, json) = post_json(
        &app,
        "/api/profiles/u1/adaptation-feedback",
        json!({
            "elementId": "a",
            "elementType": "button",
            "originalColor": "#FF0000",
            "adaptedColor": "#E81B1B",
            "userFeedback": "helpful",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Feedback recorded");
    let history = json["profile"]["adaptationHistory"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["userFeedback"], "helpful");
    assert_eq!(history[0]["daltonismTypeUsed"], "tritanopia");
}

#[tokio::test]
async fn test_record_feedback_missing_profile_is_404() {
    let app = create_test_app();

    let (status, _) = post_json(
        &app,
        "/api/profiles/ghost/adaptation-feedback",
        json!({"elementId": "a"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_stats() {
    let app = create_test_app();

    post_json(
        &app,
        "/api/profiles",
        json!({"userId": "u1", "daltonismType": "protanopia"}),
    )
    .await;

    // Two feedback events plus one adapt request.
    post_json(
        &app,
        "/api/profiles/u1/adaptation-feedback",
        json!({"elementType": "chart", "userFeedback": "helpful"}),
    )
    .await;
    post_json(
        &app,
        "/api/profiles/u1/adaptation-feedback",
        json!({"elementType": "chart"}),
    )
    .await;
    post_json(
        &app,
        "/api/adapt",
        json!({
            "userProfile": {"userId": "u1", "daltonismType": "protanopia"},
            "elements": [{"id": "a", "originalColor": "#FF0000"}],
        }),
    )
    .await;

    let (status, stats) = get_json(&app, "/api/profiles/u1/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalAdaptations"], 3);
    assert_eq!(stats["helpfulAdaptations"], 1);
    assert_eq!(stats["mostAdaptedElementType"], "chart");
    assert_eq!(stats["daltonismType"], "protanopia");
    assert!(stats["preferences"].is_object());
}

#[tokio::test]
async fn test_profile_stats_missing_profile_is_404() {
    let app = create_test_app();

    let (status, _) = get_json(&app, "/api/profiles/ghost/stats").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
