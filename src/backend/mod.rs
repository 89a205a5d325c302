pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{Backend, BackendError};
pub use providers::{HorizonBackend, LocalBackend};
pub use types::{Circle, GeoBounds, GeoPoint, Member, Presence, PresenceUpdate, Profile};
