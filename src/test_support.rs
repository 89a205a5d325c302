//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::backend::{
    Backend, BackendError, Circle, GeoPoint, Member, Presence, PresenceUpdate, Profile,
};

/// A canned backend for tests that don't need network or fixtures.
pub struct StaticBackend;

#[async_trait]
impl Backend for StaticBackend {
    fn name(&self) -> &str {
        "static"
    }

    async fn load_profile(&self) -> Result<Profile, BackendError> {
        Ok(Profile {
            id: "me".to_string(),
            handle: "tester".to_string(),
            display_name: "Test User".to_string(),
        })
    }

    async fn list_circles(&self) -> Result<Vec<Circle>, BackendError> {
        Ok(vec![Circle {
            id: "c1".to_string(),
            name: "Test Circle".to_string(),
            member_count: 1,
            unread: 0,
        }])
    }

    async fn circle_members(&self, _circle_id: &str) -> Result<Vec<Member>, BackendError> {
        Ok(vec![test_member("tester")])
    }

    async fn publish_presence(&self, _update: &PresenceUpdate) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Creates a test App with a StaticBackend and no splash delay.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(
        Arc::new(StaticBackend),
        "test-device".to_string(),
        Duration::ZERO,
    )
}

/// A member with a fixed presence; identical handles produce identical
/// members, so equality-based change detection can be tested.
pub fn test_member(handle: &str) -> Member {
    Member {
        id: format!("id-{handle}"),
        handle: handle.to_string(),
        display_name: handle.to_uppercase(),
        presence: Some(Presence {
            point: Some(GeoPoint {
                lat: 38.722,
                lon: -9.139,
            }),
            noted_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            note: None,
        }),
    }
}
