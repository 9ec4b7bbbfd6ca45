// ── Venue service ──
//
// Query shapes for the `venues` and `venue_hazards` relations. Venues
// are never hard-deleted, so there is no delete path here.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use safeops_api::{Direction, Query, RestClient};

use crate::error::CoreError;
use crate::model::{
    NewVenue, NewVenueHazard, RpnTable, Venue, VenueHazard, VenueHazardUpdate, VenueUpdate, rpn,
};
use crate::service::relation;

#[derive(Clone)]
pub struct VenueService {
    rest: Arc<RestClient>,
    rpn_table: Arc<RpnTable>,
}

impl VenueService {
    pub fn new(rest: Arc<RestClient>, rpn_table: Arc<RpnTable>) -> Self {
        Self { rest, rpn_table }
    }

    /// All venues, most recently updated first.
    pub async fn get_all(&self) -> Result<Vec<Venue>, CoreError> {
        let venues = self
            .rest
            .select(
                &Query::new(relation::VENUES)
                    .select("*")
                    .order("updated_at", Direction::Desc),
            )
            .await?;
        Ok(venues)
    }

    /// Venues whose name, address, or postal code contains `needle`.
    pub async fn search(&self, needle: &str) -> Result<Vec<Venue>, CoreError> {
        let venues = self
            .rest
            .select(
                &Query::new(relation::VENUES)
                    .select("*")
                    .matching_any(&["name", "address", "postal_code"], needle)
                    .order("updated_at", Direction::Desc),
            )
            .await?;
        Ok(venues)
    }

    /// One venue, or `None` when the fetch fails for any reason.
    ///
    /// The underlying error is logged, not propagated — callers treat an
    /// absent result as "not found".
    pub async fn get_by_id(&self, id: Uuid) -> Option<Venue> {
        match self
            .rest
            .select_one(&Query::new(relation::VENUES).select("*").eq("id", id))
            .await
        {
            Ok(venue) => Some(venue),
            Err(e) => {
                warn!(%id, error = %e, "failed to fetch venue");
                None
            }
        }
    }

    /// Hazards of one venue, worst (highest RPN) first.
    pub async fn get_hazards(&self, venue_id: Uuid) -> Result<Vec<VenueHazard>, CoreError> {
        let hazards = self
            .rest
            .select(
                &Query::new(relation::VENUE_HAZARDS)
                    .select("*")
                    .eq("venue_id", venue_id)
                    .order("rpn", Direction::Desc),
            )
            .await?;
        Ok(hazards)
    }

    /// Create a venue; id, status, issue count, and timestamps come back
    /// server-assigned.
    pub async fn create(&self, new: NewVenue) -> Result<Venue, CoreError> {
        let venue = self.rest.insert_one(relation::VENUES, &new).await?;
        Ok(venue)
    }

    /// Partial update; fields absent from `update` are left unchanged.
    pub async fn update(&self, id: Uuid, update: &VenueUpdate) -> Result<Venue, CoreError> {
        let mut rows: Vec<Venue> = self
            .rest
            .update(&Query::new(relation::VENUES).eq("id", id), update)
            .await?;
        rows.pop().ok_or_else(|| CoreError::NotFound {
            entity: "venue".into(),
            identifier: id.to_string(),
        })
    }

    /// Attach a hazard to a venue, computing its RPN from the configured
    /// weight table. The venue must already exist (FK-enforced).
    pub async fn add_hazard(&self, new: NewVenueHazard) -> Result<VenueHazard, CoreError> {
        #[derive(Serialize)]
        struct Insert<'a> {
            #[serde(flatten)]
            new: &'a NewVenueHazard,
            rpn: u32,
        }

        let body = Insert {
            rpn: rpn(new.severity, new.likelihood, &self.rpn_table),
            new: &new,
        };
        let hazard = self.rest.insert_one(relation::VENUE_HAZARDS, &body).await?;
        Ok(hazard)
    }

    /// Partial update of a hazard. When severity or likelihood changes,
    /// the RPN is recomputed against the effective grades.
    pub async fn update_hazard(
        &self,
        id: Uuid,
        mut update: VenueHazardUpdate,
    ) -> Result<VenueHazard, CoreError> {
        if update.severity.is_some() || update.likelihood.is_some() {
            let current: VenueHazard = self
                .rest
                .select_one(&Query::new(relation::VENUE_HAZARDS).select("*").eq("id", id))
                .await?;
            let severity = update.severity.unwrap_or(current.severity);
            let likelihood = update.likelihood.unwrap_or(current.likelihood);
            update.rpn = Some(rpn(severity, likelihood, &self.rpn_table));
        }

        let mut rows: Vec<VenueHazard> = self
            .rest
            .update(&Query::new(relation::VENUE_HAZARDS).eq("id", id), &update)
            .await?;
        rows.pop().ok_or_else(|| CoreError::NotFound {
            entity: "venue hazard".into(),
            identifier: id.to_string(),
        })
    }
}
