// ── Client-side state stores ──
//
// One reactive store per entity type, grouped into a `Stores` container
// that `SafeOpsClient` constructs once at startup and hands out by
// reference. Nothing in this crate reaches for a store through a global.

mod entity_store;

pub use entity_store::{EntityStore, Keyed, StoreState};

use uuid::Uuid;

use crate::model::{Notification, RawSubmission, Venue, VenueHazard};

impl Keyed for Venue {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for VenueHazard {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for RawSubmission {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Notification {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// The full set of client-side stores.
///
/// Holds the only authoritative client-side copy of currently displayed
/// entities; services stay stateless and the gateway owns only the
/// connection.
#[derive(Default)]
pub struct Stores {
    pub venues: EntityStore<Venue>,
    pub venue_hazards: EntityStore<VenueHazard>,
    pub raws: EntityStore<RawSubmission>,
    pub notifications: EntityStore<Notification>,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }
}
