/// Post service - categorized board posts with hash tags and scraps
use super::{group_by_parent, resolve_author_filter, NotificationService};
use crate::db::counter::{self, Counter};
use crate::db::post_repo::PostFilter;
use crate::db::{emoji_repo, hashtag_repo, post_repo, scrap_repo, view_repo, ContentKind};
use crate::domain::content::get_post_is_not_deleted;
use crate::domain::member::{get_member_is_not_deleted, get_writer};
use crate::error::{is_unique_violation, AppError, Result};
use crate::metrics;
use crate::middleware::check_post_ownership;
use crate::models::{
    ContentSortBy, EmojiSummary, HashTagResponse, HashTagSearchItem, NewNotification,
    PostCategory, PostIdResponse, PostItem, PostRequest, PostResponse, PostWithWriter,
    TodayQuestionResponse,
};
use crate::pagination::{PaginationRequest, PaginationResponse};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_post(&self, member_id: Uuid, req: &PostRequest) -> Result<PostIdResponse> {
        get_writer(&self.pool, member_id).await?;

        let mut tx = self.pool.begin().await?;
        let post_id =
            post_repo::insert_post(&mut *tx, member_id, req.category, &req.title, &req.content)
                .await?;
        link_hash_tags(&mut tx, post_id, req).await?;
        tx.commit().await?;

        metrics::record_event("post_created");
        tracing::info!(%post_id, %member_id, category = %req.category, "post created");

        Ok(PostIdResponse { post_id })
    }

    pub async fn list_posts(
        &self,
        viewer: Option<Uuid>,
        sort_by: ContentSortBy,
        category: Option<PostCategory>,
        page: &PaginationRequest,
    ) -> Result<PaginationResponse<PostItem>> {
        let filter = PostFilter {
            author: resolve_author_filter(&self.pool, viewer, sort_by).await?,
            category,
            scrapped_by: None,
        };
        self.list_filtered(&filter, viewer, page).await
    }

    pub async fn list_filtered(
        &self,
        filter: &PostFilter,
        viewer: Option<Uuid>,
        page: &PaginationRequest,
    ) -> Result<PaginationResponse<PostItem>> {
        let rows = post_repo::list_posts(&self.pool, filter, viewer, page).await?;
        let total = post_repo::count_posts(&self.pool, filter).await?;
        let items = self.assemble(rows, viewer).await?;

        Ok(PaginationResponse::new(items, page, total))
    }

    pub async fn get_post(&self, viewer: Option<Uuid>, post_id: Uuid) -> Result<PostItem> {
        let row = post_repo::find_with_writer(&self.pool, post_id, viewer)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        if row.deleted_at.is_some() {
            return Err(AppError::Gone("Post has been deleted".to_string()));
        }
        if row.writer_deleted_at.is_some() {
            return Err(AppError::Gone("Post writer has withdrawn".to_string()));
        }

        self.assemble(vec![row], viewer)
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("post assembly returned no item".to_string()))
    }

    pub async fn update_post(
        &self,
        member_id: Uuid,
        post_id: Uuid,
        req: &PostRequest,
    ) -> Result<PostIdResponse> {
        get_writer(&self.pool, member_id).await?;
        let post = get_post_is_not_deleted(&self.pool, post_id).await?;
        check_post_ownership(member_id, &post)?;

        let mut tx = self.pool.begin().await?;
        post_repo::update_post(&mut *tx, post_id, req.category, &req.title, &req.content).await?;
        link_hash_tags(&mut tx, post_id, req).await?;
        tx.commit().await?;

        tracing::debug!(%post_id, "post updated");
        Ok(PostIdResponse { post_id })
    }

    pub async fn delete_post(&self, member_id: Uuid, post_id: Uuid) -> Result<()> {
        get_writer(&self.pool, member_id).await?;
        let post = get_post_is_not_deleted(&self.pool, post_id).await?;
        check_post_ownership(member_id, &post)?;

        post_repo::soft_delete(&self.pool, post_id).await?;

        metrics::record_event("post_deleted");
        tracing::info!(%post_id, %member_id, "post deleted");
        Ok(())
    }

    pub async fn view_post(&self, member_id: Uuid, post_id: Uuid) -> Result<()> {
        get_member_is_not_deleted(&self.pool, member_id).await?;
        let post = get_post_is_not_deleted(&self.pool, post_id).await?;
        if post.member_id == member_id {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        if view_repo::record_view(&mut *tx, ContentKind::Post, post_id, member_id).await? {
            counter::increment(&mut *tx, ContentKind::Post, Counter::View, post_id).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    pub async fn add_emoji(&self, member_id: Uuid, post_id: Uuid, emoji: &str) -> Result<()> {
        let writer = get_writer(&self.pool, member_id).await?;
        let post = get_post_is_not_deleted(&self.pool, post_id).await?;

        let mut tx = self.pool.begin().await?;
        emoji_repo::insert(&mut *tx, ContentKind::Post, post_id, member_id, emoji)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "Emoji already added"))?;
        counter::increment(&mut *tx, ContentKind::Post, Counter::Emoji, post_id).await?;
        tx.commit().await?;

        metrics::record_event("post_emoji_added");

        NotificationService::new(self.pool.clone())
            .send(
                NewNotification::post_emoji(post.member_id, member_id, post_id),
                &writer.nickname,
            )
            .await;

        Ok(())
    }

    pub async fn remove_emoji(&self, member_id: Uuid, post_id: Uuid, emoji: &str) -> Result<()> {
        get_writer(&self.pool, member_id).await?;
        get_post_is_not_deleted(&self.pool, post_id).await?;

        let mut tx = self.pool.begin().await?;
        if !emoji_repo::delete(&mut *tx, ContentKind::Post, post_id, member_id, emoji).await? {
            return Err(AppError::NotFound("Emoji not found".to_string()));
        }
        counter::decrement(&mut *tx, ContentKind::Post, Counter::Emoji, post_id).await?;
        tx.commit().await?;

        Ok(())
    }

    pub async fn search_hash_tags(&self, prefix: &str, take: i64) -> Result<Vec<HashTagSearchItem>> {
        Ok(hashtag_repo::search_by_prefix(&self.pool, prefix.trim(), take).await?)
    }

    pub async fn today_question(&self) -> Result<TodayQuestionResponse> {
        let question = post_repo::random_today_question(&self.pool).await?;
        Ok(question.unwrap_or(TodayQuestionResponse {
            post_id: None,
            title: String::new(),
        }))
    }

    pub async fn scrap_post(&self, member_id: Uuid, post_id: Uuid) -> Result<()> {
        get_writer(&self.pool, member_id).await?;
        get_post_is_not_deleted(&self.pool, post_id).await?;

        scrap_repo::insert(&self.pool, post_id, member_id)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::BadRequest("Post already scraped".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;

        metrics::record_event("post_scraped");
        Ok(())
    }

    pub async fn unscrap_post(&self, member_id: Uuid, post_id: Uuid) -> Result<()> {
        get_writer(&self.pool, member_id).await?;

        if !scrap_repo::delete(&self.pool, post_id, member_id).await? {
            return Err(AppError::NotFound("Scrap not found".to_string()));
        }
        Ok(())
    }

    /// Attach hash tags and emoji summaries to a page of posts
    async fn assemble(
        &self,
        rows: Vec<PostWithWriter>,
        viewer: Option<Uuid>,
    ) -> Result<Vec<PostItem>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let tags = hashtag_repo::tags_for_posts(&self.pool, &ids).await?;
        let mut tags = group_by_parent(
            tags,
            |r| r.post_id,
            |r| HashTagResponse {
                tag_name: r.tag_name,
                color: r.color,
            },
        );

        let emojis = emoji_repo::summaries_for(&self.pool, ContentKind::Post, &ids, viewer).await?;
        let mut emojis = group_by_parent(emojis, |r| r.parent_id, EmojiSummary::from);

        Ok(rows
            .into_iter()
            .map(|row| PostItem {
                writer: row.writer(),
                post: PostResponse {
                    id: row.id,
                    category: row.category,
                    title: row.title,
                    content: row.content,
                    view_count: row.view_count,
                    comment_count: row.comment_count,
                    emoji_count: row.emoji_count,
                    created_at: row.created_at,
                    is_scraped: row.is_scraped,
                    is_mine: viewer == Some(row.member_id),
                    hash_tags: tags.remove(&row.id).unwrap_or_default(),
                    emojis: emojis.remove(&row.id).unwrap_or_default(),
                },
            })
            .collect())
    }
}

/// Find or create each requested tag and relink them in request order
async fn link_hash_tags(conn: &mut PgConnection, post_id: Uuid, req: &PostRequest) -> Result<()> {
    let mut tag_ids = Vec::with_capacity(req.hash_tags.len());
    for tag in req.unique_hash_tags() {
        let tag_id = hashtag_repo::find_or_create(&mut *conn, &tag.tag_name, &tag.color).await?;
        tag_ids.push(tag_id);
    }

    hashtag_repo::replace_post_links(conn, post_id, &tag_ids).await?;
    Ok(())
}
