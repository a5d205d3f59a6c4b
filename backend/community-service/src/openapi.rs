/// OpenAPI documentation for Community Service
use crate::handlers;
use crate::models::{
    AuthorizationStatus, CommentIdResponse, CommentItem, CommentRequest, CommentResponse,
    ContentSortBy, EmojiRequest, EmojiSummary, FeedIdResponse, FeedItem, FeedRequest,
    FeedResponse, FollowMember, HashTagRequest, HashTagResponse, HashTagSearchItem,
    MemberResponse, Notification, NotificationType, OAuthUrlResponse, PostCategory,
    PostIdResponse, PostItem, PostRequest, PostResponse, ProfileResponse, ReadAllResponse,
    RefreshTokenRequest, TodayQuestionResponse, UnreadCountResponse, UpdateAuthorizationRequest,
    UpdateProfileRequest, Writer,
};
use crate::pagination::{PageMeta, SortOrder};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Community Service API",
        version = "1.0.0",
        description = "Cohort community backend: GitHub login with admin approval, feeds and categorized posts with emoji reactions, comments with hearts, scraps, follows and activity notifications."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    paths(
        handlers::auth::github_login_url,
        handlers::auth::me,
        handlers::feeds::create_feed,
        handlers::feeds::get_feed,
        handlers::posts::create_post,
        handlers::posts::get_post,
        handlers::posts::search_hash_tags,
        handlers::posts::today_question,
        handlers::profile::member_profile,
        handlers::notifications::unread_count,
    ),
    components(schemas(
        AuthorizationStatus,
        CommentIdResponse,
        CommentItem,
        CommentRequest,
        CommentResponse,
        ContentSortBy,
        EmojiRequest,
        EmojiSummary,
        FeedIdResponse,
        FeedItem,
        FeedRequest,
        FeedResponse,
        FollowMember,
        HashTagRequest,
        HashTagResponse,
        HashTagSearchItem,
        MemberResponse,
        Notification,
        NotificationType,
        OAuthUrlResponse,
        PageMeta,
        PostCategory,
        PostIdResponse,
        PostItem,
        PostRequest,
        PostResponse,
        ProfileResponse,
        ReadAllResponse,
        RefreshTokenRequest,
        SortOrder,
        TodayQuestionResponse,
        UnreadCountResponse,
        UpdateAuthorizationRequest,
        UpdateProfileRequest,
        Writer,
    )),
    tags(
        (name = "auth", description = "GitHub OAuth login and tokens"),
        (name = "feeds", description = "Short image posts with emoji reactions"),
        (name = "posts", description = "Categorized posts, hash tags and scraps"),
        (name = "profile", description = "Member profiles"),
        (name = "notifications", description = "Activity notifications"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("RS256 access token from /api/v1/auth/github/callback"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}
