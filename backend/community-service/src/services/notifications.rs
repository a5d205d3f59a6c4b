/// Notification service - stores activity notifications and serves the inbox
use crate::db::notification_repo;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{NewNotification, Notification, ReadAllResponse, UnreadCountResponse};
use crate::pagination::{PaginationRequest, PaginationResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a notification after the triggering write has committed.
    ///
    /// Failures are logged and swallowed; self-notifications are skipped.
    pub async fn send(&self, notification: NewNotification, sender_nickname: &str) {
        if notification.is_self_notification() {
            return;
        }

        let content = notification.notification_type.message(sender_nickname);
        match notification_repo::insert(&self.pool, &notification, &content).await {
            Ok(id) => {
                metrics::record_event("notification_sent");
                tracing::debug!(
                    notification_id = %id,
                    receiver_id = %notification.receiver_id,
                    kind = notification.notification_type.as_str(),
                    "notification stored"
                );
            }
            Err(err) => {
                tracing::warn!(
                    receiver_id = %notification.receiver_id,
                    kind = notification.notification_type.as_str(),
                    "failed to store notification: {}",
                    err
                );
            }
        }
    }

    pub async fn list(
        &self,
        member_id: Uuid,
        page: &PaginationRequest,
    ) -> Result<PaginationResponse<Notification>> {
        let data = notification_repo::list_for_member(&self.pool, member_id, page).await?;
        let total = notification_repo::count_for_member(&self.pool, member_id).await?;
        Ok(PaginationResponse::new(data, page, total))
    }

    pub async fn unread_count(&self, member_id: Uuid) -> Result<UnreadCountResponse> {
        let unread_count = notification_repo::unread_count(&self.pool, member_id).await?;
        Ok(UnreadCountResponse { unread_count })
    }

    pub async fn mark_read(&self, member_id: Uuid, notification_id: Uuid) -> Result<()> {
        if !notification_repo::mark_read(&self.pool, notification_id, member_id).await? {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, member_id: Uuid) -> Result<ReadAllResponse> {
        let updated = notification_repo::mark_all_read(&self.pool, member_id).await?;
        Ok(ReadAllResponse { updated })
    }

    pub async fn delete(&self, member_id: Uuid, notification_id: Uuid) -> Result<()> {
        if !notification_repo::delete(&self.pool, notification_id, member_id).await? {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }
}
