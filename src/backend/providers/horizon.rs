//! Horizon backend implementation over the hosted REST API.
//!
//! This module uses Horizon's own document terminology:
//! - documents carry "uid" / "lng" / "unreadEvents" field names
//! - collections arrive wrapped in an envelope object
//! - all routes are scoped under /projects/{project}

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::backend::{
    Backend, BackendError, Circle, GeoPoint, Member, Presence, PresenceUpdate, Profile,
};

// ============================================================================
// Horizon Document Types
// ============================================================================

/// Account document. Horizon calls the account id "uid".
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ProfileDoc {
    uid: String,
    handle: String,
    display_name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CircleDoc {
    id: String,
    name: String,
    member_count: u32,
    #[serde(default)]
    unread_events: u32,
}

/// Collection envelope for the circles route.
#[derive(Deserialize, Debug)]
struct CirclesEnvelope {
    circles: Vec<CircleDoc>,
}

/// Position document. Horizon uses "lng" where we use "lon".
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
struct LocationDoc {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PresenceDoc {
    #[serde(default)]
    location: Option<LocationDoc>,
    noted_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MemberDoc {
    id: String,
    handle: String,
    display_name: String,
    #[serde(default)]
    last_presence: Option<PresenceDoc>,
}

/// Collection envelope for the members route.
#[derive(Deserialize, Debug)]
struct MembersEnvelope {
    members: Vec<MemberDoc>,
}

/// Outbound presence publish body.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PresencePublishDoc {
    device: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<LocationDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

// ============================================================================
// Translation Layer
// ============================================================================

fn profile_from_doc(doc: ProfileDoc) -> Profile {
    Profile {
        id: doc.uid,
        handle: doc.handle,
        display_name: doc.display_name,
    }
}

fn circle_from_doc(doc: CircleDoc) -> Circle {
    Circle {
        id: doc.id,
        name: doc.name,
        member_count: doc.member_count,
        unread: doc.unread_events,
    }
}

fn presence_from_doc(doc: PresenceDoc) -> Presence {
    Presence {
        point: doc.location.map(|l| GeoPoint {
            lat: l.lat,
            lon: l.lng,
        }),
        noted_at: doc.noted_at,
        note: doc.note,
    }
}

fn member_from_doc(doc: MemberDoc) -> Member {
    Member {
        id: doc.id,
        handle: doc.handle,
        display_name: doc.display_name,
        presence: doc.last_presence.map(presence_from_doc),
    }
}

fn publish_to_doc(update: &PresenceUpdate) -> PresencePublishDoc {
    PresencePublishDoc {
        device: update.device.clone(),
        location: update.point.map(|p| LocationDoc {
            lat: p.lat,
            lng: p.lon,
        }),
        note: update.note.clone(),
    }
}

// ============================================================================
// Backend Implementation
// ============================================================================

/// Hosted Horizon backend (project-scoped REST routes, bearer auth).
pub struct HorizonBackend {
    api_key: String,
    project: String,
    base_url: String,
    client: reqwest::Client,
}

impl HorizonBackend {
    /// Creates a new Horizon backend.
    ///
    /// # Arguments
    /// * `api_key` - Horizon API key
    /// * `project` - Project the account's circles live under
    /// * `base_url` - Regional API root (tests point this at a mock server)
    pub fn new(api_key: String, project: String, base_url: String) -> Self {
        Self {
            api_key,
            project,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn route(&self, path: &str) -> String {
        format!("{}/projects/{}/{}", self.base_url, self.project, path)
    }

    /// GETs a project-scoped route and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.route(path);
        debug!("Horizon GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        debug!("Horizon response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Horizon API error: {} - {}", status, err_body);
            return Err(BackendError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        serde_json::from_str::<T>(&body).map_err(|e| BackendError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Backend for HorizonBackend {
    fn name(&self) -> &str {
        "horizon"
    }

    async fn load_profile(&self) -> Result<Profile, BackendError> {
        let doc: ProfileDoc = self.get_json("profile").await?;
        Ok(profile_from_doc(doc))
    }

    async fn list_circles(&self) -> Result<Vec<Circle>, BackendError> {
        let envelope: CirclesEnvelope = self.get_json("circles").await?;
        info!("Horizon returned {} circles", envelope.circles.len());
        Ok(envelope.circles.into_iter().map(circle_from_doc).collect())
    }

    async fn circle_members(&self, circle_id: &str) -> Result<Vec<Member>, BackendError> {
        let envelope: MembersEnvelope =
            self.get_json(&format!("circles/{circle_id}/members")).await?;
        debug!(
            "Horizon returned {} members for circle {}",
            envelope.members.len(),
            circle_id
        );
        Ok(envelope.members.into_iter().map(member_from_doc).collect())
    }

    async fn publish_presence(&self, update: &PresenceUpdate) -> Result<(), BackendError> {
        let url = self.route("presence");
        let body = publish_to_doc(update);
        info!("Horizon presence publish from device '{}'", update.device);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Horizon presence publish failed: {} - {}", status, err_body);
            return Err(BackendError::Api {
                status,
                message: err_body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_doc_uid_becomes_id() {
        let json = r#"{ "uid": "acct-9", "handle": "mara", "displayName": "Mara" }"#;
        let doc: ProfileDoc = serde_json::from_str(json).unwrap();
        let profile = profile_from_doc(doc);
        assert_eq!(profile.id, "acct-9");
        assert_eq!(profile.display_name, "Mara");
    }

    #[test]
    fn test_circle_doc_unread_events_becomes_unread() {
        let json = r#"{ "id": "c-1", "name": "Sunday Hikers", "memberCount": 4, "unreadEvents": 2 }"#;
        let doc: CircleDoc = serde_json::from_str(json).unwrap();
        let circle = circle_from_doc(doc);
        assert_eq!(circle.unread, 2);
        assert_eq!(circle.member_count, 4);
    }

    #[test]
    fn test_circle_doc_unread_defaults_to_zero() {
        let json = r#"{ "id": "c-1", "name": "Sunday Hikers", "memberCount": 4 }"#;
        let doc: CircleDoc = serde_json::from_str(json).unwrap();
        assert_eq!(circle_from_doc(doc).unread, 0);
    }

    #[test]
    fn test_presence_doc_lng_becomes_lon() {
        let json = r#"{
            "location": { "lat": 52.52, "lng": 13.40 },
            "notedAt": "2024-06-01T10:00:00Z"
        }"#;
        let doc: PresenceDoc = serde_json::from_str(json).unwrap();
        let presence = presence_from_doc(doc);
        let point = presence.point.unwrap();
        assert_eq!(point.lon, 13.40);
        assert_eq!(point.lat, 52.52);
        assert!(presence.note.is_none());
    }

    #[test]
    fn test_member_doc_without_presence() {
        let json = r#"{ "id": "m-3", "handle": "juno", "displayName": "Juno" }"#;
        let doc: MemberDoc = serde_json::from_str(json).unwrap();
        let member = member_from_doc(doc);
        assert!(member.presence.is_none());
    }

    #[test]
    fn test_members_envelope_parses() {
        let json = r#"{ "members": [
            { "id": "m-1", "handle": "a", "displayName": "A" },
            { "id": "m-2", "handle": "b", "displayName": "B" }
        ] }"#;
        let envelope: MembersEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.members.len(), 2);
    }

    #[test]
    fn test_publish_doc_translates_lon_to_lng() {
        let update = PresenceUpdate {
            device: "orbit-terminal".to_string(),
            point: Some(GeoPoint { lat: 1.5, lon: -2.5 }),
            note: Some("north exit".to_string()),
        };
        let json = serde_json::to_string(&publish_to_doc(&update)).unwrap();
        assert!(json.contains(r#""lng":-2.5"#));
        assert!(json.contains(r#""lat":1.5"#));
        assert!(json.contains(r#""note":"north exit""#));
    }

    #[test]
    fn test_publish_doc_omits_missing_location_and_note() {
        let update = PresenceUpdate {
            device: "orbit-terminal".to_string(),
            point: None,
            note: None,
        };
        let json = serde_json::to_string(&publish_to_doc(&update)).unwrap();
        assert!(!json.contains("location"));
        assert!(!json.contains("note"));
    }
}
