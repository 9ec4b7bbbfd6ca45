// ── Unified domain model ──
//
// Every type in this module is the canonical representation of a SafeOps
// entity as the rest of the workspace consumes it: wire rows from the
// data API are flattened into these shapes by the services.

pub mod hazard;
pub mod notification;
pub mod raw;
pub mod rpn;
pub mod user;
pub mod venue;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use safeops_core::model::*` gives you everything.

pub use hazard::{Likelihood, Severity};
pub use notification::{NewNotification, Notification};
pub use raw::{
    NewRaw, NewRawHazard, RawHazard, RawHazardUpdate, RawStatus, RawSubmission, RawUpdate,
    RiskLevel,
};
pub use rpn::{RpnTable, rpn};
pub use user::{UserProfile, UserRole};
pub use venue::{
    HazardStatus, NewVenue, NewVenueHazard, Venue, VenueHazard, VenueHazardUpdate, VenueStatus,
    VenueUpdate,
};
