use orbit::backend::{Backend, BackendError, GeoPoint, HorizonBackend, PresenceUpdate};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Horizon backend pointed at a mock server, project "p1".
fn horizon_at(server: &MockServer) -> HorizonBackend {
    HorizonBackend::new("test-key".to_string(), "p1".to_string(), server.uri())
}

// ============================================================================
// Horizon Read Path Tests
// ============================================================================

#[tokio::test]
async fn test_horizon_profile_translates_document_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/p1/profile"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": "acct-42",
            "handle": "mara",
            "displayName": "Mara Lindqvist"
        })))
        .mount(&mock_server)
        .await;

    let backend = horizon_at(&mock_server);
    let profile = backend.load_profile().await.unwrap();

    assert_eq!(profile.id, "acct-42");
    assert_eq!(profile.handle, "mara");
    assert_eq!(profile.display_name, "Mara Lindqvist");
}

#[tokio::test]
async fn test_horizon_circles_unwraps_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/p1/circles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "circles": [
                { "id": "c-1", "name": "Sunday Hikers", "memberCount": 4, "unreadEvents": 2 },
                { "id": "c-2", "name": "Block Crew", "memberCount": 7 }
            ]
        })))
        .mount(&mock_server)
        .await;

    let backend = horizon_at(&mock_server);
    let circles = backend.list_circles().await.unwrap();

    assert_eq!(circles.len(), 2);
    assert_eq!(circles[0].unread, 2);
    // unreadEvents is optional and defaults to zero
    assert_eq!(circles[1].unread, 0);
    assert_eq!(circles[1].member_count, 7);
}

#[tokio::test]
async fn test_horizon_members_translate_presence() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/p1/circles/c-1/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "members": [
                {
                    "id": "m-1",
                    "handle": "wren",
                    "displayName": "Wren Okafor",
                    "lastPresence": {
                        "location": { "lat": 52.52, "lng": 13.40 },
                        "notedAt": "2026-03-01T12:00:00Z",
                        "note": "at the lake"
                    }
                },
                { "id": "m-2", "handle": "juno", "displayName": "Juno" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let backend = horizon_at(&mock_server);
    let members = backend.circle_members("c-1").await.unwrap();

    assert_eq!(members.len(), 2);
    let presence = members[0].presence.as_ref().unwrap();
    let point = presence.point.unwrap();
    assert_eq!(point.lat, 52.52);
    assert_eq!(point.lon, 13.40);
    assert_eq!(presence.note.as_deref(), Some("at the lake"));
    assert!(members[1].presence.is_none());
}

// ============================================================================
// Horizon Error Path Tests
// ============================================================================

#[tokio::test]
async fn test_horizon_api_error_carries_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/p1/circles"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&mock_server)
        .await;

    let backend = horizon_at(&mock_server);
    let result = backend.list_circles().await;

    assert!(matches!(result, Err(BackendError::Api { status: 401, .. })));
}

#[tokio::test]
async fn test_horizon_malformed_body_is_a_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/p1/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let backend = horizon_at(&mock_server);
    let result = backend.load_profile().await;

    assert!(matches!(result, Err(BackendError::Parse(_))));
}

#[tokio::test]
async fn test_horizon_unreachable_server_is_a_network_error() {
    // Start a server just to grab a port, then shut it down. An exclusive
    // (builder) server is required here: pooled `MockServer::start` servers
    // keep listening after drop, so the port would answer 404 instead of
    // refusing the connection.
    let mock_server = MockServer::builder().start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let backend = HorizonBackend::new("test-key".to_string(), "p1".to_string(), uri);
    let result = backend.load_profile().await;

    assert!(matches!(result, Err(BackendError::Network(_))));
}

// ============================================================================
// Horizon Publish Tests
// ============================================================================

#[tokio::test]
async fn test_horizon_publish_posts_translated_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/p1/presence"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "device": "orbit-terminal",
            "location": { "lat": 38.722, "lng": -9.139 },
            "note": "north exit"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = horizon_at(&mock_server);
    let update = PresenceUpdate {
        device: "orbit-terminal".to_string(),
        point: Some(GeoPoint {
            lat: 38.722,
            lon: -9.139,
        }),
        note: Some("north exit".to_string()),
    };

    backend.publish_presence(&update).await.unwrap();
}

#[tokio::test]
async fn test_horizon_publish_failure_is_an_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/p1/presence"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server fell over"))
        .mount(&mock_server)
        .await;

    let backend = horizon_at(&mock_server);
    let update = PresenceUpdate {
        device: "orbit-terminal".to_string(),
        point: None,
        note: None,
    };
    let result = backend.publish_presence(&update).await;

    assert!(matches!(result, Err(BackendError::Api { status: 500, .. })));
}
