/// Follow service - directed follow relations between members
use super::NotificationService;
use crate::db::follow_repo;
use crate::domain::member::{get_member_is_not_deleted, get_writer};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{FollowMember, NewNotification};
use sqlx::PgPool;
use uuid::Uuid;

pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<()> {
        if follower_id == followee_id {
            return Err(AppError::BadRequest("Cannot follow yourself".to_string()));
        }

        let follower = get_writer(&self.pool, follower_id).await?;
        get_member_is_not_deleted(&self.pool, followee_id).await?;

        follow_repo::insert(&self.pool, follower_id, followee_id)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "Already following this member"))?;

        metrics::record_event("follow");
        tracing::info!(%follower_id, %followee_id, "member followed");

        NotificationService::new(self.pool.clone())
            .send(
                NewNotification::follow(followee_id, follower_id),
                &follower.nickname,
            )
            .await;

        Ok(())
    }

    pub async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<()> {
        if !follow_repo::delete(&self.pool, follower_id, followee_id).await? {
            return Err(AppError::NotFound("Not following this member".to_string()));
        }

        metrics::record_event("unfollow");
        tracing::info!(%follower_id, %followee_id, "member unfollowed");
        Ok(())
    }

    pub async fn followers(&self, member_id: Uuid) -> Result<Vec<FollowMember>> {
        get_member_is_not_deleted(&self.pool, member_id).await?;
        Ok(follow_repo::followers_of(&self.pool, member_id).await?)
    }

    pub async fn followings(&self, member_id: Uuid) -> Result<Vec<FollowMember>> {
        get_member_is_not_deleted(&self.pool, member_id).await?;
        Ok(follow_repo::followings_of(&self.pool, member_id).await?)
    }
}
