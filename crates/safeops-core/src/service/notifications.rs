// ── Notification service ──

use std::sync::Arc;

use uuid::Uuid;

use safeops_api::{Direction, Query, RestClient};

use crate::error::CoreError;
use crate::model::{NewNotification, Notification};
use crate::service::relation;

#[derive(Clone)]
pub struct NotificationService {
    rest: Arc<RestClient>,
}

impl NotificationService {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    /// One user's notifications, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, CoreError> {
        let notifications = self
            .rest
            .select(
                &Query::new(relation::NOTIFICATIONS)
                    .select("*")
                    .eq("user_id", user_id)
                    .order("created_at", Direction::Desc),
            )
            .await?;
        Ok(notifications)
    }

    pub async fn create(&self, new: NewNotification) -> Result<Notification, CoreError> {
        let notification = self.rest.insert_one(relation::NOTIFICATIONS, &new).await?;
        Ok(notification)
    }
}
