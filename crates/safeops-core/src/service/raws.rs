// ── RAW service ──
//
// Query shapes and lifecycle transitions for the `raw_submissions` and
// `raw_hazards` relations. Transitions are status-pinned conditional
// updates: the PATCH filter names the required current status, so a
// request arriving out of order updates zero rows and fails loudly
// instead of overwriting.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use safeops_api::{Direction, Query, RestClient};

use crate::error::CoreError;
use crate::model::{
    NewNotification, NewRaw, NewRawHazard, RawHazard, RawHazardUpdate, RawStatus, RawSubmission,
    RawUpdate, RiskLevel, RpnTable, rpn,
};
use crate::service::notifications::NotificationService;
use crate::service::relation;

// ── Wire rows with embedded relations ────────────────────────────────

#[derive(Deserialize)]
struct VenueNameEmbed {
    name: String,
}

/// List row: RAW columns plus the parent venue's name.
#[derive(Deserialize)]
struct RawListRow {
    #[serde(flatten)]
    raw: RawSubmission,
    #[serde(default)]
    venues: Option<VenueNameEmbed>,
}

impl RawListRow {
    fn flatten(self) -> RawSubmission {
        let mut raw = self.raw;
        raw.venue_name = self.venues.map(|v| v.name);
        raw
    }
}

/// Detail row: list row plus the full hazard collection.
#[derive(Deserialize)]
struct RawDetailRow {
    #[serde(flatten)]
    raw: RawSubmission,
    #[serde(default)]
    venues: Option<VenueNameEmbed>,
    #[serde(default)]
    raw_hazards: Vec<RawHazard>,
}

impl RawDetailRow {
    fn flatten(self) -> RawSubmission {
        let mut raw = self.raw;
        raw.venue_name = self.venues.map(|v| v.name);
        raw.hazards = self.raw_hazards;
        // The hazard collection is ranked worst-first
        raw.hazards.sort_by(|a, b| b.rpn.cmp(&a.rpn));
        raw
    }
}

// ── Transition patch bodies ──────────────────────────────────────────

#[derive(Serialize)]
struct SubmitPatch {
    status: RawStatus,
    submitted_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct ApprovePatch {
    status: RawStatus,
    approver_id: Uuid,
    approved_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct RejectPatch {
    status: RawStatus,
    approver_id: Uuid,
    approver_comments: String,
}

// ── Service ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RawService {
    rest: Arc<RestClient>,
    rpn_table: Arc<RpnTable>,
    notifications: NotificationService,
}

impl RawService {
    pub fn new(rest: Arc<RestClient>, rpn_table: Arc<RpnTable>) -> Self {
        let notifications = NotificationService::new(Arc::clone(&rest));
        Self {
            rest,
            rpn_table,
            notifications,
        }
    }

    /// All RAWs, most recently updated first, with the venue name
    /// flattened on. `owner` narrows to one author.
    pub async fn get_all(&self, owner: Option<Uuid>) -> Result<Vec<RawSubmission>, CoreError> {
        let mut query = Query::new(relation::RAW_SUBMISSIONS)
            .select("*,venues(name)")
            .order("updated_at", Direction::Desc);
        if let Some(user_id) = owner {
            query = query.eq("user_id", user_id);
        }

        let rows: Vec<RawListRow> = self.rest.select(&query).await?;
        Ok(rows.into_iter().map(RawListRow::flatten).collect())
    }

    /// One RAW with venue name and hazards in a single round trip, or
    /// `None` when the fetch fails for any reason. The underlying error
    /// is logged, not propagated.
    pub async fn get_by_id(&self, id: Uuid) -> Option<RawSubmission> {
        let query = Query::new(relation::RAW_SUBMISSIONS)
            .select("*,venues(name),raw_hazards(*)")
            .eq("id", id);

        match self.rest.select_one::<RawDetailRow>(&query).await {
            Ok(row) => Some(row.flatten()),
            Err(e) => {
                warn!(%id, error = %e, "failed to fetch RAW");
                None
            }
        }
    }

    /// Create a RAW. Status defaults to `draft` and risk level to
    /// `medium` when the caller omits them.
    pub async fn create(&self, new: NewRaw) -> Result<RawSubmission, CoreError> {
        #[derive(Serialize)]
        struct Insert {
            user_id: Uuid,
            venue_id: Uuid,
            status: RawStatus,
            risk_level: RiskLevel,
        }

        let body = Insert {
            user_id: new.user_id,
            venue_id: new.venue_id,
            status: new.status.unwrap_or(RawStatus::Draft),
            risk_level: new.risk_level.unwrap_or(RiskLevel::Medium),
        };
        let raw = self.rest.insert_one(relation::RAW_SUBMISSIONS, &body).await?;
        Ok(raw)
    }

    /// Partial update; fields absent from `update` are left unchanged.
    pub async fn update(&self, id: Uuid, update: &RawUpdate) -> Result<RawSubmission, CoreError> {
        let mut rows: Vec<RawSubmission> = self
            .rest
            .update(&Query::new(relation::RAW_SUBMISSIONS).eq("id", id), update)
            .await?;
        rows.pop().ok_or_else(|| CoreError::NotFound {
            entity: "RAW".into(),
            identifier: id.to_string(),
        })
    }

    /// Submit a draft RAW for approval.
    ///
    /// Sets `submitted_at` exactly once — only the draft→submitted
    /// transition writes it. A notification for approvers is written as
    /// a best-effort second step: its failure is logged and does not
    /// fail the submission.
    pub async fn submit(&self, id: Uuid, user_id: Uuid) -> Result<RawSubmission, CoreError> {
        let raw = self
            .transition(
                id,
                RawStatus::Draft,
                "submitted",
                &SubmitPatch {
                    status: RawStatus::Submitted,
                    submitted_at: Utc::now(),
                },
            )
            .await?;

        let notification = NewNotification {
            user_id,
            title: "RAW Submitted".into(),
            message: "Your Risk Assessment Worksheet has been submitted for approval".into(),
            kind: "raw_submitted".into(),
            related_id: Some(id),
        };
        if let Err(e) = self.notifications.create(notification).await {
            warn!(raw_id = %id, error = %e, "submission notification write failed");
        }

        Ok(raw)
    }

    /// Approve a submitted RAW.
    pub async fn approve(&self, id: Uuid, approver_id: Uuid) -> Result<RawSubmission, CoreError> {
        self.transition(
            id,
            RawStatus::Submitted,
            "approved",
            &ApprovePatch {
                status: RawStatus::Approved,
                approver_id,
                approved_at: Utc::now(),
            },
        )
        .await
    }

    /// Reject a submitted RAW with the approver's comments.
    pub async fn reject(
        &self,
        id: Uuid,
        approver_id: Uuid,
        comments: impl Into<String>,
    ) -> Result<RawSubmission, CoreError> {
        self.transition(
            id,
            RawStatus::Submitted,
            "rejected",
            &RejectPatch {
                status: RawStatus::Rejected,
                approver_id,
                approver_comments: comments.into(),
            },
        )
        .await
    }

    /// Status-pinned conditional update. Zero updated rows means the RAW
    /// was not in `expected` status (or does not exist).
    async fn transition<B: Serialize + Sync>(
        &self,
        id: Uuid,
        expected: RawStatus,
        to: &'static str,
        patch: &B,
    ) -> Result<RawSubmission, CoreError> {
        let query = Query::new(relation::RAW_SUBMISSIONS)
            .eq("id", id)
            .eq("status", expected);

        let mut rows: Vec<RawSubmission> = self.rest.update(&query, patch).await?;
        rows.pop().ok_or_else(|| CoreError::InvalidTransition {
            id: id.to_string(),
            expected: expected_name(expected),
            to,
        })
    }

    /// Attach a hazard to a RAW, computing its RPN from the configured
    /// weight table. The RAW must already exist (FK-enforced).
    pub async fn add_hazard(&self, new: NewRawHazard) -> Result<RawHazard, CoreError> {
        #[derive(Serialize)]
        struct Insert<'a> {
            #[serde(flatten)]
            new: &'a NewRawHazard,
            rpn: u32,
        }

        let body = Insert {
            rpn: rpn(new.severity, new.likelihood, &self.rpn_table),
            new: &new,
        };
        let hazard = self.rest.insert_one(relation::RAW_HAZARDS, &body).await?;
        Ok(hazard)
    }

    /// Partial update of a hazard. When severity or likelihood changes,
    /// the RPN is recomputed against the effective grades.
    pub async fn update_hazard(
        &self,
        id: Uuid,
        mut update: RawHazardUpdate,
    ) -> Result<RawHazard, CoreError> {
        if update.severity.is_some() || update.likelihood.is_some() {
            let current: RawHazard = self
                .rest
                .select_one(&Query::new(relation::RAW_HAZARDS).select("*").eq("id", id))
                .await?;
            let severity = update.severity.unwrap_or(current.severity);
            let likelihood = update.likelihood.unwrap_or(current.likelihood);
            update.rpn = Some(rpn(severity, likelihood, &self.rpn_table));
        }

        let mut rows: Vec<RawHazard> = self
            .rest
            .update(&Query::new(relation::RAW_HAZARDS).eq("id", id), &update)
            .await?;
        rows.pop().ok_or_else(|| CoreError::NotFound {
            entity: "RAW hazard".into(),
            identifier: id.to_string(),
        })
    }

    /// Hazards of one RAW, worst (highest RPN) first.
    pub async fn get_hazards(&self, raw_id: Uuid) -> Result<Vec<RawHazard>, CoreError> {
        let hazards = self
            .rest
            .select(
                &Query::new(relation::RAW_HAZARDS)
                    .select("*")
                    .eq("raw_id", raw_id)
                    .order("rpn", Direction::Desc),
            )
            .await?;
        Ok(hazards)
    }

    /// Hard delete. A RAW that still owns hazards is rejected by the
    /// backend's FK constraint, which surfaces as
    /// [`CoreError::Constraint`].
    pub async fn delete(&self, id: Uuid) -> Result<(), CoreError> {
        self.rest
            .delete(&Query::new(relation::RAW_SUBMISSIONS).eq("id", id))
            .await?;
        Ok(())
    }
}

fn expected_name(status: RawStatus) -> &'static str {
    match status {
        RawStatus::Draft => "draft",
        RawStatus::Submitted => "submitted",
        RawStatus::Approved => "approved",
        RawStatus::Rejected => "rejected",
        RawStatus::ChangesRequested => "changes_requested",
    }
}
