// safeops-core: Domain layer between safeops-api and consumers (CLI, embedders).

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod stream;
mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::{ConnectionState, SafeOpsClient};
pub use config::ClientConfig;
pub use error::CoreError;
pub use service::{IdentityService, NotificationService, RawService, VenueService};
pub use store::{EntityStore, Keyed, StoreState, Stores};
pub use stream::StoreStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Hazard grading
    Likelihood, Severity,
    // Notifications
    NewNotification, Notification,
    // RAWs
    NewRaw, NewRawHazard, RawHazard, RawHazardUpdate, RawStatus, RawSubmission, RawUpdate,
    RiskLevel,
    // RPN
    RpnTable, rpn,
    // Users
    UserProfile, UserRole,
    // Venues
    HazardStatus, NewVenue, NewVenueHazard, Venue, VenueHazard, VenueHazardUpdate, VenueStatus,
    VenueUpdate,
};

// TLS mode travels with the config surface.
pub use safeops_api::TlsMode;
