// ── Risk Assessment Worksheet (RAW) domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use super::hazard::{Likelihood, Severity};

/// Approval lifecycle of a RAW.
///
/// `draft → submitted → approved | rejected | changes_requested`.
/// Transitions are enforced by the services as status-pinned conditional
/// updates — an out-of-order request fails instead of overwriting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RawStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
    ChangesRequested,
}

/// Overall risk grading of a RAW.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// A Risk Assessment Worksheet: one author, one venue, an approval
/// lifecycle, and an RPN-ranked hazard collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSubmission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub venue_id: Uuid,
    pub status: RawStatus,
    pub risk_level: RiskLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set exactly once, at the draft→submitted transition.
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approver_id: Option<Uuid>,
    #[serde(default)]
    pub approver_comments: Option<String>,
    /// Flattened from the `venues(name)` embed on list/detail fetches.
    #[serde(default)]
    pub venue_name: Option<String>,
    /// Populated by the detail fetch only; empty on list rows.
    #[serde(default)]
    pub hazards: Vec<RawHazard>,
}

/// A hazard scoped to one RAW.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHazard {
    pub id: Uuid,
    pub raw_id: Uuid,
    pub hazard_description: String,
    pub severity: Severity,
    pub likelihood: Likelihood,
    pub rpn: u32,
    pub control_measures: String,
}

// ── Write shapes ────────────────────────────────────────────────────

/// Insert payload for a RAW.
///
/// Status and risk level default client-side (`draft` / `medium`) when
/// omitted, matching the documented creation contract.
#[derive(Debug, Clone, Serialize)]
pub struct NewRaw {
    pub user_id: Uuid,
    pub venue_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RawStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
}

/// Insert payload for a RAW hazard; RPN is computed by the service.
#[derive(Debug, Clone, Serialize)]
pub struct NewRawHazard {
    pub raw_id: Uuid,
    pub hazard_description: String,
    pub severity: Severity,
    pub likelihood: Likelihood,
    pub control_measures: String,
}

/// Partial update for a RAW.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
}

impl RawUpdate {
    /// Shallow-merge the named fields onto an existing RAW.
    pub fn apply_to(&self, raw: &mut RawSubmission) {
        if let Some(venue_id) = self.venue_id {
            raw.venue_id = venue_id;
        }
        if let Some(risk_level) = self.risk_level {
            raw.risk_level = risk_level;
        }
    }
}

/// Partial update for a RAW hazard.
///
/// Severity/likelihood changes go through the service so the RPN is
/// recomputed alongside them, never on their own.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawHazardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hazard_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<Likelihood>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_measures: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpn: Option<u32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn raw_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&RawStatus::ChangesRequested).unwrap(),
            "\"changes_requested\""
        );
        let parsed: RawStatus = serde_json::from_str("\"submitted\"").unwrap();
        assert_eq!(parsed, RawStatus::Submitted);
    }

    #[test]
    fn new_raw_omits_defaulted_fields() {
        let new = NewRaw {
            user_id: Uuid::nil(),
            venue_id: Uuid::nil(),
            status: None,
            risk_level: None,
        };
        let body = serde_json::to_value(&new).unwrap();
        assert!(body.get("status").is_none());
        assert!(body.get("risk_level").is_none());
    }

    #[test]
    fn list_row_without_hazards_deserializes() {
        let raw: RawSubmission = serde_json::from_value(serde_json::json!({
            "id": "0b9d4c0e-2f4e-47b7-b7e4-5df8f43ec1ad",
            "user_id": "a7d6e6a3-51f0-4df7-9a04-5a8f3c4708c4",
            "venue_id": "7a4e9ab9-9c36-4c6a-a6ac-8a8f205c5a8e",
            "status": "draft",
            "risk_level": "medium",
            "created_at": "2026-02-01T10:00:00Z",
            "updated_at": "2026-02-01T10:00:00Z",
            "submitted_at": null
        }))
        .unwrap();

        assert_eq!(raw.status, RawStatus::Draft);
        assert!(raw.submitted_at.is_none());
        assert!(raw.hazards.is_empty());
        assert!(raw.venue_name.is_none());
    }
}
