/// Comment service - comments and hearts on feeds and posts
use super::NotificationService;
use crate::db::counter::{self, Counter};
use crate::db::{comment_repo, ContentKind};
use crate::domain::content::{get_comment_of_parent, get_parent_author};
use crate::domain::ensure_live;
use crate::domain::member::get_writer;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::middleware::check_comment_ownership;
use crate::models::{Comment, CommentIdResponse, CommentItem, NewNotification};
use crate::pagination::{PaginationRequest, PaginationResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub struct CommentService {
    pool: PgPool,
    kind: ContentKind,
}

impl CommentService {
    pub fn new(pool: PgPool, kind: ContentKind) -> Self {
        Self { pool, kind }
    }

    pub async fn list_comments(
        &self,
        viewer: Option<Uuid>,
        parent_id: Uuid,
        page: &PaginationRequest,
    ) -> Result<PaginationResponse<CommentItem>> {
        get_parent_author(&self.pool, self.kind, parent_id).await?;

        let rows =
            comment_repo::list_for_parent(&self.pool, self.kind, parent_id, viewer, page).await?;
        let total = comment_repo::count_for_parent(&self.pool, self.kind, parent_id).await?;
        let items = rows
            .into_iter()
            .map(|row| CommentItem::from_row(row, viewer))
            .collect();

        Ok(PaginationResponse::new(items, page, total))
    }

    pub async fn create_comment(
        &self,
        member_id: Uuid,
        parent_id: Uuid,
        content: &str,
    ) -> Result<CommentIdResponse> {
        let writer = get_writer(&self.pool, member_id).await?;
        let parent_author = get_parent_author(&self.pool, self.kind, parent_id).await?;

        let mut tx = self.pool.begin().await?;
        let comment_id =
            comment_repo::insert(&mut *tx, self.kind, parent_id, member_id, content).await?;
        counter::increment(&mut *tx, self.kind, Counter::Comment, parent_id).await?;
        tx.commit().await?;

        metrics::record_event("comment_created");
        tracing::debug!(%comment_id, %parent_id, parent = self.kind.label(), "comment created");

        let notification = match self.kind {
            ContentKind::Post => {
                NewNotification::post_comment(parent_author, member_id, parent_id, comment_id)
            }
            ContentKind::Feed => {
                NewNotification::feed_comment(parent_author, member_id, parent_id, comment_id)
            }
        };
        NotificationService::new(self.pool.clone())
            .send(notification, &writer.nickname)
            .await;

        Ok(CommentIdResponse { comment_id })
    }

    pub async fn update_comment(
        &self,
        member_id: Uuid,
        parent_id: Uuid,
        comment_id: Uuid,
        content: &str,
    ) -> Result<CommentIdResponse> {
        get_writer(&self.pool, member_id).await?;
        get_parent_author(&self.pool, self.kind, parent_id).await?;
        self.owned_comment(member_id, parent_id, comment_id).await?;

        comment_repo::update_content(&self.pool, self.kind, comment_id, content).await?;
        Ok(CommentIdResponse { comment_id })
    }

    pub async fn delete_comment(
        &self,
        member_id: Uuid,
        parent_id: Uuid,
        comment_id: Uuid,
    ) -> Result<()> {
        get_writer(&self.pool, member_id).await?;
        get_parent_author(&self.pool, self.kind, parent_id).await?;
        self.owned_comment(member_id, parent_id, comment_id).await?;

        let mut tx = self.pool.begin().await?;
        if comment_repo::soft_delete(&mut *tx, self.kind, comment_id).await? {
            counter::decrement(&mut *tx, self.kind, Counter::Comment, parent_id).await?;
        }
        tx.commit().await?;

        metrics::record_event("comment_deleted");
        Ok(())
    }

    pub async fn add_heart(&self, member_id: Uuid, parent_id: Uuid, comment_id: Uuid) -> Result<()> {
        get_writer(&self.pool, member_id).await?;
        get_parent_author(&self.pool, self.kind, parent_id).await?;
        get_comment_of_parent(&self.pool, self.kind, parent_id, comment_id).await?;

        let mut tx = self.pool.begin().await?;
        comment_repo::insert_heart(&mut *tx, self.kind, comment_id, member_id)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "Comment already hearted"))?;
        comment_repo::increment_hearts(&mut *tx, self.kind, comment_id).await?;
        tx.commit().await?;

        metrics::record_event("comment_hearted");
        Ok(())
    }

    pub async fn remove_heart(
        &self,
        member_id: Uuid,
        parent_id: Uuid,
        comment_id: Uuid,
    ) -> Result<()> {
        get_writer(&self.pool, member_id).await?;
        get_comment_of_parent(&self.pool, self.kind, parent_id, comment_id).await?;

        let mut tx = self.pool.begin().await?;
        if !comment_repo::delete_heart(&mut *tx, self.kind, comment_id, member_id).await? {
            return Err(AppError::NotFound("Heart not found".to_string()));
        }
        comment_repo::decrement_hearts(&mut *tx, self.kind, comment_id).await?;
        tx.commit().await?;

        Ok(())
    }

    /// 404 for a missing or foreign comment, then 403 for a non-owner, then 410 if deleted
    async fn owned_comment(
        &self,
        member_id: Uuid,
        parent_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Comment> {
        let comment = comment_repo::find_by_id(&self.pool, self.kind, comment_id)
            .await?
            .filter(|c| c.parent_id == parent_id)
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        check_comment_ownership(member_id, &comment)?;
        ensure_live(Some(comment), "Comment")
    }
}
