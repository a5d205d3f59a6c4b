/// Profile service - member cards with follow counts and per-member content
use super::{FeedService, PostService};
use crate::db::post_repo::PostFilter;
use crate::db::{follow_repo, member_repo, profile_repo, AuthorFilter};
use crate::domain::ensure_live;
use crate::domain::member::get_member_is_not_deleted;
use crate::error::{AppError, Result};
use crate::models::{FeedItem, PostItem, ProfileResponse, ProfileRow, UpdateProfileRequest};
use crate::pagination::{PaginationRequest, PaginationResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load(&self, member_id: Uuid) -> Result<ProfileRow> {
        let row = profile_repo::find_profile(&self.pool, member_id).await?;
        ensure_live(row, "Member")
    }

    pub async fn my_profile(&self, member_id: Uuid) -> Result<ProfileResponse> {
        let row = self.load(member_id).await?;
        Ok(ProfileResponse::from_row(row, None))
    }

    pub async fn update_my_profile(
        &self,
        member_id: Uuid,
        req: &UpdateProfileRequest,
    ) -> Result<ProfileResponse> {
        get_member_is_not_deleted(&self.pool, member_id).await?;

        let updated = member_repo::update_profile(
            &self.pool,
            member_id,
            req.nickname.trim(),
            req.profile_image_url.as_deref(),
            req.introduce.as_deref(),
        )
        .await?;
        if !updated {
            return Err(AppError::Gone("Member has been deleted".to_string()));
        }

        tracing::debug!(%member_id, "profile updated");
        self.my_profile(member_id).await
    }

    pub async fn member_profile(
        &self,
        viewer: Option<Uuid>,
        member_id: Uuid,
    ) -> Result<ProfileResponse> {
        let row = self.load(member_id).await?;
        let is_followed = match viewer {
            Some(viewer_id) => follow_repo::exists(&self.pool, viewer_id, member_id).await?,
            None => false,
        };

        Ok(ProfileResponse::from_row(row, Some(is_followed)))
    }

    pub async fn member_posts(
        &self,
        viewer: Option<Uuid>,
        member_id: Uuid,
        page: &PaginationRequest,
    ) -> Result<PaginationResponse<PostItem>> {
        get_member_is_not_deleted(&self.pool, member_id).await?;

        let filter = PostFilter {
            author: authored_by(member_id),
            ..PostFilter::default()
        };
        PostService::new(self.pool.clone())
            .list_filtered(&filter, viewer, page)
            .await
    }

    pub async fn member_feeds(
        &self,
        viewer: Option<Uuid>,
        member_id: Uuid,
        page: &PaginationRequest,
    ) -> Result<PaginationResponse<FeedItem>> {
        get_member_is_not_deleted(&self.pool, member_id).await?;

        FeedService::new(self.pool.clone())
            .list_filtered(&authored_by(member_id), viewer, page)
            .await
    }

    /// Posts the member scrapped, most recent scrap first by default
    pub async fn my_scraps(
        &self,
        member_id: Uuid,
        page: &PaginationRequest,
    ) -> Result<PaginationResponse<PostItem>> {
        get_member_is_not_deleted(&self.pool, member_id).await?;

        let filter = PostFilter {
            scrapped_by: Some(member_id),
            ..PostFilter::default()
        };
        PostService::new(self.pool.clone())
            .list_filtered(&filter, Some(member_id), page)
            .await
    }
}

fn authored_by(member_id: Uuid) -> AuthorFilter {
    AuthorFilter {
        author_id: Some(member_id),
        ..AuthorFilter::default()
    }
}
