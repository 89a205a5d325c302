use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in account as the backend reports it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub handle: String,
    pub display_name: String,
}

/// A named group of members sharing presence with each other.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub id: String,
    pub name: String,
    pub member_count: u32,
    /// Presence updates published since this device last viewed the circle.
    #[serde(default)]
    pub unread: u32,
}

/// A latitude/longitude pair in degrees.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Axis-aligned box around a set of points, used to project positions
/// onto a terminal canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Computes the bounding box of the given points. Returns None when the
    /// iterator is empty.
    pub fn around<I: IntoIterator<Item = GeoPoint>>(points: I) -> Option<GeoBounds> {
        let mut bounds: Option<GeoBounds> = None;
        for p in points {
            bounds = Some(match bounds {
                None => GeoBounds {
                    min_lat: p.lat,
                    max_lat: p.lat,
                    min_lon: p.lon,
                    max_lon: p.lon,
                },
                Some(b) => GeoBounds {
                    min_lat: b.min_lat.min(p.lat),
                    max_lat: b.max_lat.max(p.lat),
                    min_lon: b.min_lon.min(p.lon),
                    max_lon: b.max_lon.max(p.lon),
                },
            });
        }
        bounds
    }

    /// Expands each side by `margin` degrees. Keeps a degenerate
    /// single-point box renderable.
    pub fn padded(self, margin: f64) -> GeoBounds {
        GeoBounds {
            min_lat: self.min_lat - margin,
            max_lat: self.max_lat + margin,
            min_lon: self.min_lon - margin,
            max_lon: self.max_lon + margin,
        }
    }

    /// Projects a point into the unit square: (0,0) = south-west corner,
    /// (1,1) = north-east corner. Points outside the box are clamped.
    pub fn project(&self, point: GeoPoint) -> (f64, f64) {
        let width = (self.max_lon - self.min_lon).max(f64::EPSILON);
        let height = (self.max_lat - self.min_lat).max(f64::EPSILON);
        let x = ((point.lon - self.min_lon) / width).clamp(0.0, 1.0);
        let y = ((point.lat - self.min_lat) / height).clamp(0.0, 1.0);
        (x, y)
    }
}

/// A member's last published position, note, and timestamp.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    #[serde(default)]
    pub point: Option<GeoPoint>,
    pub noted_at: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Presence older than this is rendered dimmed and labeled "stale".
const STALE_AFTER_HOURS: i64 = 24;

impl Presence {
    /// Compact age label for roster rows: "now", "5m", "2h", "3d".
    /// Future timestamps (clock skew between devices) are treated as "now".
    pub fn freshness(&self, now: DateTime<Utc>) -> String {
        let age = now.signed_duration_since(self.noted_at);
        let secs = age.num_seconds().max(0);
        if secs < 60 {
            "now".to_string()
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else if secs < 86_400 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}d", secs / 86_400)
        }
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.noted_at).num_hours() >= STALE_AFTER_HOURS
    }
}

/// One roster entry inside a circle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub handle: String,
    pub display_name: String,
    #[serde(default)]
    pub presence: Option<Presence>,
}

/// Outbound presence publish for this device.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceUpdate {
    pub device: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn presence_aged(secs: i64, now: DateTime<Utc>) -> Presence {
        Presence {
            point: None,
            noted_at: now - chrono::Duration::seconds(secs),
            note: None,
        }
    }

    /// Macro to generate freshness label test cases.
    /// $name:ident is the test function name (describe the boundary it covers)
    /// $age_secs:expr is the presence age in seconds
    /// $expected:expr is the expected label
    macro_rules! test_freshness_labels {
        ( $($name:ident: $age_secs:expr => $expected:expr,)+ ) => {
            $(
                #[test]
                fn $name() {
                    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
                    let presence = presence_aged($age_secs, now);
                    assert_eq!(presence.freshness(now), $expected);
                }
            )+
        };
    }

    test_freshness_labels! {
        test_freshness_zero_seconds: 0 => "now",
        test_freshness_under_a_minute: 59 => "now",
        test_freshness_exactly_one_minute: 60 => "1m",
        test_freshness_under_an_hour: 3599 => "59m",
        test_freshness_exactly_one_hour: 3600 => "1h",
        test_freshness_under_a_day: 86_399 => "23h",
        test_freshness_exactly_one_day: 86_400 => "1d",
        test_freshness_a_week: 604_800 => "7d",
        test_freshness_future_timestamp: -30 => "now",
    }

    #[test]
    fn test_staleness_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert!(!presence_aged(86_399, now).is_stale(now));
        assert!(presence_aged(86_400, now).is_stale(now));
    }

    #[test]
    fn test_bounds_around_empty_is_none() {
        assert_eq!(GeoBounds::around(std::iter::empty()), None);
    }

    #[test]
    fn test_bounds_around_points() {
        let points = vec![
            GeoPoint { lat: 10.0, lon: -3.0 },
            GeoPoint { lat: -5.0, lon: 7.0 },
            GeoPoint { lat: 2.0, lon: 1.0 },
        ];
        let bounds = GeoBounds::around(points).unwrap();
        assert_eq!(bounds.min_lat, -5.0);
        assert_eq!(bounds.max_lat, 10.0);
        assert_eq!(bounds.min_lon, -3.0);
        assert_eq!(bounds.max_lon, 7.0);
    }

    #[test]
    fn test_project_corners_and_clamping() {
        let bounds = GeoBounds {
            min_lat: 0.0,
            max_lat: 10.0,
            min_lon: 0.0,
            max_lon: 20.0,
        };
        assert_eq!(bounds.project(GeoPoint { lat: 0.0, lon: 0.0 }), (0.0, 0.0));
        assert_eq!(bounds.project(GeoPoint { lat: 10.0, lon: 20.0 }), (1.0, 1.0));
        assert_eq!(bounds.project(GeoPoint { lat: 5.0, lon: 10.0 }), (0.5, 0.5));
        // Outside the box clamps to the edge
        assert_eq!(bounds.project(GeoPoint { lat: -4.0, lon: 25.0 }), (1.0, 0.0));
    }

    #[test]
    fn test_project_degenerate_box_after_padding() {
        // A single point produces a zero-size box; padding keeps it projectable
        let bounds = GeoBounds::around([GeoPoint { lat: 3.0, lon: 3.0 }])
            .unwrap()
            .padded(0.5);
        let (x, y) = bounds.project(GeoPoint { lat: 3.0, lon: 3.0 });
        assert!((x - 0.5).abs() < 1e-9);
        assert!((y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_member_wire_shape_is_camel_case() {
        let json = r#"{
            "id": "m-1",
            "handle": "ines",
            "displayName": "Inés",
            "presence": {
                "point": { "lat": 40.4, "lon": -3.7 },
                "notedAt": "2024-06-01T11:58:00Z",
                "note": "cafe"
            }
        }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.display_name, "Inés");
        let presence = member.presence.unwrap();
        assert_eq!(presence.note.as_deref(), Some("cafe"));
        assert_eq!(presence.point.unwrap().lat, 40.4);
    }

    #[test]
    fn test_member_without_presence_parses() {
        let json = r#"{ "id": "m-2", "handle": "kofi", "displayName": "Kofi" }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert!(member.presence.is_none());
    }

    #[test]
    fn test_presence_update_omits_empty_fields() {
        let update = PresenceUpdate {
            device: "orbit-terminal".to_string(),
            point: None,
            note: None,
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains(r#""device":"orbit-terminal""#));
        assert!(!json.contains("point"));
        assert!(!json.contains("note"));
    }
}
