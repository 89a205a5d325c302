//! Offline fixture backend for demos and development without a Horizon
//! project. Rosters live in memory; presence publishes mutate them so the
//! map and roster screens stay interactive.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use uuid::Uuid;

use crate::backend::{
    Backend, BackendError, Circle, GeoPoint, Member, Presence, PresenceUpdate, Profile,
};

/// Small artificial latency so the splash and refresh paths behave like a
/// remote service.
const FIXTURE_LATENCY_MS: u64 = 80;

/// Fixture roster names, rotated by the configured seed.
const NAMES: [(&str, &str); 6] = [
    ("wren", "Wren Ashby"),
    ("kofi", "Kofi Mensah"),
    ("ines", "Inés Duarte"),
    ("juno", "Juno Park"),
    ("silas", "Silas Reed"),
    ("noor", "Noor Haddad"),
];

/// Presence ages in seconds, cycled across fixture members so every
/// freshness bucket shows up in the roster.
const PRESENCE_AGES: [i64; 4] = [45, 25 * 60, 3 * 3600, 26 * 3600];

/// Fixture positions orbit this point (Lisbon).
const HOME: GeoPoint = GeoPoint {
    lat: 38.722,
    lon: -9.139,
};

pub struct LocalBackend {
    profile: Profile,
    circles: Vec<Circle>,
    rosters: Mutex<HashMap<String, Vec<Member>>>,
}

impl LocalBackend {
    pub fn new(seed: Option<u64>) -> Self {
        let offset = seed.unwrap_or(0) as usize;

        let profile = Profile {
            id: Uuid::new_v4().to_string(),
            handle: "you".to_string(),
            display_name: "You".to_string(),
        };

        let mut circles = Vec::new();
        let mut rosters = HashMap::new();
        for (slot, (name, size)) in [("Sunday Hikers", 3usize), ("Block Crew", 4), ("Night Owls", 2)]
            .into_iter()
            .enumerate()
        {
            let circle_id = Uuid::new_v4().to_string();
            let mut members = vec![own_member(&profile)];
            for i in 0..size {
                members.push(fixture_member(offset + slot * 2 + i, i));
            }
            circles.push(Circle {
                id: circle_id.clone(),
                name: name.to_string(),
                member_count: members.len() as u32,
                unread: (slot as u32) % 3,
            });
            rosters.insert(circle_id, members);
        }

        info!("Local backend seeded with {} circles", circles.len());
        Self {
            profile,
            circles,
            rosters: Mutex::new(rosters),
        }
    }
}

/// The signed-in account's own roster entry. Starts with no presence; the
/// first publish fills it in.
fn own_member(profile: &Profile) -> Member {
    Member {
        id: profile.id.clone(),
        handle: profile.handle.clone(),
        display_name: profile.display_name.clone(),
        presence: None,
    }
}

fn fixture_member(name_index: usize, position_index: usize) -> Member {
    let (handle, display_name) = NAMES[name_index % NAMES.len()];
    let age = PRESENCE_AGES[name_index % PRESENCE_AGES.len()];
    let spread = 0.011 * (position_index as f64 + 1.0);
    let point = GeoPoint {
        lat: HOME.lat + spread * if name_index % 2 == 0 { 1.0 } else { -1.0 },
        lon: HOME.lon + 0.014 * (position_index as f64) - 0.02,
    };
    Member {
        id: Uuid::new_v4().to_string(),
        handle: handle.to_string(),
        display_name: display_name.to_string(),
        presence: Some(Presence {
            point: Some(point),
            noted_at: Utc::now() - chrono::Duration::seconds(age),
            note: None,
        }),
    }
}

#[async_trait]
impl Backend for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    async fn load_profile(&self) -> Result<Profile, BackendError> {
        tokio::time::sleep(Duration::from_millis(FIXTURE_LATENCY_MS)).await;
        Ok(self.profile.clone())
    }

    async fn list_circles(&self) -> Result<Vec<Circle>, BackendError> {
        tokio::time::sleep(Duration::from_millis(FIXTURE_LATENCY_MS)).await;
        Ok(self.circles.clone())
    }

    async fn circle_members(&self, circle_id: &str) -> Result<Vec<Member>, BackendError> {
        tokio::time::sleep(Duration::from_millis(FIXTURE_LATENCY_MS)).await;
        let rosters = self.rosters.lock().expect("roster store poisoned");
        match rosters.get(circle_id) {
            Some(members) => Ok(members.clone()),
            None => Err(BackendError::Api {
                status: 404,
                message: format!("unknown circle: {circle_id}"),
            }),
        }
    }

    async fn publish_presence(&self, update: &PresenceUpdate) -> Result<(), BackendError> {
        tokio::time::sleep(Duration::from_millis(FIXTURE_LATENCY_MS)).await;
        let presence = Presence {
            point: update.point,
            noted_at: Utc::now(),
            note: update.note.clone(),
        };
        let mut rosters = self.rosters.lock().expect("roster store poisoned");
        for members in rosters.values_mut() {
            if let Some(own) = members.iter_mut().find(|m| m.id == self.profile.id) {
                own.presence = Some(presence.clone());
            }
        }
        debug!("Local presence updated from device '{}'", update.device);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_backend_serves_fixture_circles() {
        let backend = LocalBackend::new(Some(3));
        let circles = backend.list_circles().await.unwrap();
        assert_eq!(circles.len(), 3);
        assert!(circles.iter().any(|c| c.name == "Sunday Hikers"));
        // member_count matches the roster, including the account itself
        for circle in &circles {
            let members = backend.circle_members(&circle.id).await.unwrap();
            assert_eq!(members.len() as u32, circle.member_count);
        }
    }

    #[tokio::test]
    async fn test_unknown_circle_is_api_404() {
        let backend = LocalBackend::new(None);
        let err = backend.circle_members("nope").await.unwrap_err();
        assert!(matches!(err, BackendError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_publish_updates_own_presence_in_every_roster() {
        let backend = LocalBackend::new(None);
        let profile = backend.load_profile().await.unwrap();
        let update = PresenceUpdate {
            device: "test-device".to_string(),
            point: Some(GeoPoint { lat: 1.0, lon: 2.0 }),
            note: Some("rooftop".to_string()),
        };
        backend.publish_presence(&update).await.unwrap();

        for circle in backend.list_circles().await.unwrap() {
            let members = backend.circle_members(&circle.id).await.unwrap();
            let own = members.iter().find(|m| m.id == profile.id).unwrap();
            let presence = own.presence.as_ref().unwrap();
            assert_eq!(presence.note.as_deref(), Some("rooftop"));
            assert_eq!(presence.point.unwrap().lat, 1.0);
        }
    }

    #[tokio::test]
    async fn test_seed_rotates_fixture_names() {
        let a = LocalBackend::new(Some(0));
        let b = LocalBackend::new(Some(1));
        let circle_a = &a.list_circles().await.unwrap()[0];
        let circle_b = &b.list_circles().await.unwrap()[0];
        let first_a = &a.circle_members(&circle_a.id).await.unwrap()[1];
        let first_b = &b.circle_members(&circle_b.id).await.unwrap()[1];
        assert_ne!(first_a.handle, first_b.handle);
    }
}
