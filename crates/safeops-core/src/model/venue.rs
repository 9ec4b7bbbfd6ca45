// ── Venue and venue-hazard domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use super::hazard::{Likelihood, Severity};

/// Derived safety status of a venue. Maintained by the backend as hazard
/// statuses change; clients never write it directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VenueStatus {
    Safe,
    Warning,
    Critical,
    Restricted,
}

/// Lifecycle status of a venue hazard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HazardStatus {
    Open,
    Pending,
    Resolved,
}

/// A physical location tracked for safety status.
///
/// Venues are never hard-deleted; a venue that goes out of service is
/// moved to [`VenueStatus::Restricted`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: VenueStatus,
    pub critical_issues_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A hazard attached to a venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueHazard {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub hazard_category: String,
    pub description: String,
    pub severity: Severity,
    pub likelihood: Likelihood,
    pub rpn: u32,
    pub status: HazardStatus,
}

// ── Write shapes ────────────────────────────────────────────────────

/// Insert payload for a venue. Id, status, issue count, and timestamps
/// are server-assigned.
#[derive(Debug, Clone, Serialize)]
pub struct NewVenue {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Insert payload for a venue hazard. RPN is filled in by the service
/// from the configured weight table.
#[derive(Debug, Clone, Serialize)]
pub struct NewVenueHazard {
    pub venue_id: Uuid,
    pub hazard_category: String,
    pub description: String,
    pub severity: Severity,
    pub likelihood: Likelihood,
    pub status: HazardStatus,
}

/// Partial update for a venue. `None` fields are left unchanged at the
/// backend, and skipped by the store's shallow merge.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VenueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Partial update for a venue hazard.
///
/// Severity/likelihood changes go through the service so the RPN is
/// recomputed alongside them, never on their own.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VenueHazardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hazard_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<Likelihood>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<HazardStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpn: Option<u32>,
}

impl VenueUpdate {
    /// Shallow-merge the named fields onto an existing venue.
    pub fn apply_to(&self, venue: &mut Venue) {
        if let Some(ref name) = self.name {
            venue.name = name.clone();
        }
        if let Some(ref address) = self.address {
            venue.address = address.clone();
        }
        if let Some(ref postal_code) = self.postal_code {
            venue.postal_code = Some(postal_code.clone());
        }
        if let Some(latitude) = self.latitude {
            venue.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            venue.longitude = longitude;
        }
    }
}
