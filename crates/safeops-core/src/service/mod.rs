// ── Domain services ──
//
// One stateless service per entity family. Each translates a domain
// operation into gateway calls and shapes the result into the view
// model the stores hold. Services own no data between calls.

pub mod identity;
pub mod notifications;
pub mod raws;
pub mod venues;

pub use identity::IdentityService;
pub use notifications::NotificationService;
pub use raws::RawService;
pub use venues::VenueService;

/// Persisted relation names, shared by services and the realtime
/// reconcilers.
pub mod relation {
    pub const VENUES: &str = "venues";
    pub const VENUE_HAZARDS: &str = "venue_hazards";
    pub const RAW_SUBMISSIONS: &str = "raw_submissions";
    pub const RAW_HAZARDS: &str = "raw_hazards";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const USERS: &str = "users";
}
