/// Feed service - short image posts with emoji reactions
use super::{group_by_parent, resolve_author_filter, NotificationService};
use crate::db::counter::{self, Counter};
use crate::db::{emoji_repo, feed_repo, view_repo, AuthorFilter, ContentKind};
use crate::domain::content::get_feed_is_not_deleted;
use crate::domain::member::{get_member_is_not_deleted, get_writer};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::middleware::check_feed_ownership;
use crate::models::{
    ContentSortBy, EmojiSummary, FeedIdResponse, FeedItem, FeedRequest, FeedResponse,
    FeedWithWriter, NewNotification,
};
use crate::pagination::{PaginationRequest, PaginationResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub struct FeedService {
    pool: PgPool,
}

impl FeedService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_feed(&self, member_id: Uuid, req: &FeedRequest) -> Result<FeedIdResponse> {
        get_writer(&self.pool, member_id).await?;

        let mut tx = self.pool.begin().await?;
        let feed_id = feed_repo::insert_feed(&mut *tx, member_id, &req.content).await?;
        feed_repo::replace_images(&mut tx, feed_id, &req.image_urls).await?;
        tx.commit().await?;

        metrics::record_event("feed_created");
        tracing::info!(%feed_id, %member_id, images = req.image_urls.len(), "feed created");

        Ok(FeedIdResponse { feed_id })
    }

    pub async fn list_feeds(
        &self,
        viewer: Option<Uuid>,
        sort_by: ContentSortBy,
        page: &PaginationRequest,
    ) -> Result<PaginationResponse<FeedItem>> {
        let filter = resolve_author_filter(&self.pool, viewer, sort_by).await?;
        self.list_filtered(&filter, viewer, page).await
    }

    pub async fn list_filtered(
        &self,
        filter: &AuthorFilter,
        viewer: Option<Uuid>,
        page: &PaginationRequest,
    ) -> Result<PaginationResponse<FeedItem>> {
        let rows = feed_repo::list_feeds(&self.pool, filter, page).await?;
        let total = feed_repo::count_feeds(&self.pool, filter).await?;
        let items = self.assemble(rows, viewer).await?;

        Ok(PaginationResponse::new(items, page, total))
    }

    pub async fn get_feed(&self, viewer: Option<Uuid>, feed_id: Uuid) -> Result<FeedItem> {
        let row = feed_repo::find_with_writer(&self.pool, feed_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Feed not found".to_string()))?;

        if row.deleted_at.is_some() {
            return Err(AppError::Gone("Feed has been deleted".to_string()));
        }
        if row.writer_deleted_at.is_some() {
            return Err(AppError::Gone("Feed writer has withdrawn".to_string()));
        }

        self.assemble(vec![row], viewer)
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("feed assembly returned no item".to_string()))
    }

    pub async fn update_feed(
        &self,
        member_id: Uuid,
        feed_id: Uuid,
        req: &FeedRequest,
    ) -> Result<FeedIdResponse> {
        get_writer(&self.pool, member_id).await?;
        let feed = get_feed_is_not_deleted(&self.pool, feed_id).await?;
        check_feed_ownership(member_id, &feed)?;

        let mut tx = self.pool.begin().await?;
        feed_repo::update_content(&mut *tx, feed_id, &req.content).await?;
        feed_repo::replace_images(&mut tx, feed_id, &req.image_urls).await?;
        tx.commit().await?;

        tracing::debug!(%feed_id, "feed updated");
        Ok(FeedIdResponse { feed_id })
    }

    pub async fn delete_feed(&self, member_id: Uuid, feed_id: Uuid) -> Result<()> {
        get_writer(&self.pool, member_id).await?;
        let feed = get_feed_is_not_deleted(&self.pool, feed_id).await?;
        check_feed_ownership(member_id, &feed)?;

        feed_repo::soft_delete(&self.pool, feed_id).await?;

        metrics::record_event("feed_deleted");
        tracing::info!(%feed_id, %member_id, "feed deleted");
        Ok(())
    }

    /// Count a view once per member; the author's own views are ignored
    pub async fn view_feed(&self, member_id: Uuid, feed_id: Uuid) -> Result<()> {
        get_member_is_not_deleted(&self.pool, member_id).await?;
        let feed = get_feed_is_not_deleted(&self.pool, feed_id).await?;
        if feed.member_id == member_id {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        if view_repo::record_view(&mut *tx, ContentKind::Feed, feed_id, member_id).await? {
            counter::increment(&mut *tx, ContentKind::Feed, Counter::View, feed_id).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    pub async fn add_emoji(&self, member_id: Uuid, feed_id: Uuid, emoji: &str) -> Result<()> {
        let writer = get_writer(&self.pool, member_id).await?;
        let feed = get_feed_is_not_deleted(&self.pool, feed_id).await?;

        let mut tx = self.pool.begin().await?;
        emoji_repo::insert(&mut *tx, ContentKind::Feed, feed_id, member_id, emoji)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "Emoji already added"))?;
        counter::increment(&mut *tx, ContentKind::Feed, Counter::Emoji, feed_id).await?;
        tx.commit().await?;

        metrics::record_event("feed_emoji_added");

        NotificationService::new(self.pool.clone())
            .send(
                NewNotification::feed_emoji(feed.member_id, member_id, feed_id),
                &writer.nickname,
            )
            .await;

        Ok(())
    }

    pub async fn remove_emoji(&self, member_id: Uuid, feed_id: Uuid, emoji: &str) -> Result<()> {
        get_writer(&self.pool, member_id).await?;
        get_feed_is_not_deleted(&self.pool, feed_id).await?;

        let mut tx = self.pool.begin().await?;
        if !emoji_repo::delete(&mut *tx, ContentKind::Feed, feed_id, member_id, emoji).await? {
            return Err(AppError::NotFound("Emoji not found".to_string()));
        }
        counter::decrement(&mut *tx, ContentKind::Feed, Counter::Emoji, feed_id).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Attach images and emoji summaries to a page of feeds
    async fn assemble(
        &self,
        rows: Vec<FeedWithWriter>,
        viewer: Option<Uuid>,
    ) -> Result<Vec<FeedItem>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let images = feed_repo::images_for(&self.pool, &ids).await?;
        let mut images = group_by_parent(images, |r| r.feed_id, |r| r.image_url);

        let emojis = emoji_repo::summaries_for(&self.pool, ContentKind::Feed, &ids, viewer).await?;
        let mut emojis = group_by_parent(emojis, |r| r.parent_id, EmojiSummary::from);

        Ok(rows
            .into_iter()
            .map(|row| FeedItem {
                writer: row.writer(),
                feed: FeedResponse {
                    id: row.id,
                    content: row.content,
                    view_count: row.view_count,
                    comment_count: row.comment_count,
                    emoji_count: row.emoji_count,
                    created_at: row.created_at,
                    image_urls: images.remove(&row.id).unwrap_or_default(),
                    emojis: emojis.remove(&row.id).unwrap_or_default(),
                    is_mine: viewer == Some(row.member_id),
                },
            })
            .collect())
    }
}
