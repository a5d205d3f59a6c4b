/// Route table for community-service
///
/// Literal segments (`/me`, `/today-question`, `/read-all`) are registered
/// before the `{id}` resources they would otherwise collide with.
use crate::db::ContentKind;
use crate::handlers::{
    admin, auth, comments, feeds, follows, health, notifications, posts, profile,
};
use crate::metrics;
use crate::middleware::{JwtAuthMiddleware, MetricsMiddleware};
use crate::openapi::ApiDoc;
use actix_web::web;
use utoipa::OpenApi;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::Data::new(ApiDoc::openapi()))
        .route("/metrics", web::get().to(metrics::serve_metrics))
        .route(ApiDoc::openapi_json_path(), web::get().to(health::openapi_json))
        .route("/api/v1/health", web::get().to(health::health_summary))
        .route("/api/v1/health/ready", web::get().to(health::readiness_summary))
        .route("/api/v1/health/live", web::get().to(health::liveness_check))
        .service(
            web::scope("/api/v1")
                .wrap(JwtAuthMiddleware)
                .wrap(MetricsMiddleware)
                .service(auth_scope())
                .route("/members/me", web::delete().to(auth::withdraw))
                .service(admin_scope())
                .service(feed_scope())
                .service(post_scope())
                .service(profile_scope())
                .service(follow_scope())
                .service(notification_scope()),
        );
}

fn auth_scope() -> actix_web::Scope {
    web::scope("/auth")
        .route("/github", web::get().to(auth::github_login_url))
        .route("/github/callback", web::get().to(auth::github_callback))
        .route("/refresh", web::post().to(auth::refresh_token))
        .route("/me", web::get().to(auth::me))
}

fn admin_scope() -> actix_web::Scope {
    web::scope("/admin")
        .route("/members", web::get().to(admin::list_members))
        .route(
            "/members/{member_id}/authorization",
            web::patch().to(admin::update_authorization),
        )
}

/// `/{parent_id}/comments` routes bound to one parent kind
fn comment_scope(kind: ContentKind) -> actix_web::Scope {
    web::scope("/{parent_id}/comments")
        .app_data(web::Data::new(kind))
        .service(
            web::resource("")
                .route(web::get().to(comments::list_comments))
                .route(web::post().to(comments::create_comment)),
        )
        .service(
            web::resource("/{comment_id}")
                .route(web::patch().to(comments::update_comment))
                .route(web::delete().to(comments::delete_comment)),
        )
        .service(
            web::resource("/{comment_id}/hearts")
                .route(web::post().to(comments::add_heart))
                .route(web::delete().to(comments::remove_heart)),
        )
}

fn feed_scope() -> actix_web::Scope {
    web::scope("/feeds")
        .service(
            web::resource("")
                .route(web::get().to(feeds::list_feeds))
                .route(web::post().to(feeds::create_feed)),
        )
        .service(
            web::resource("/{feed_id}")
                .route(web::get().to(feeds::get_feed))
                .route(web::patch().to(feeds::update_feed))
                .route(web::delete().to(feeds::delete_feed)),
        )
        .route("/{feed_id}/view", web::post().to(feeds::view_feed))
        .route("/{feed_id}/emojis", web::post().to(feeds::add_feed_emoji))
        .route(
            "/{feed_id}/emojis/{emoji}",
            web::delete().to(feeds::remove_feed_emoji),
        )
        .service(comment_scope(ContentKind::Feed))
}

fn post_scope() -> actix_web::Scope {
    web::scope("/posts")
        .service(
            web::resource("")
                .route(web::get().to(posts::list_posts))
                .route(web::post().to(posts::create_post)),
        )
        .route("/hash-tags/search", web::get().to(posts::search_hash_tags))
        .route("/today-question", web::get().to(posts::today_question))
        .service(
            web::resource("/{post_id}")
                .route(web::get().to(posts::get_post))
                .route(web::patch().to(posts::update_post))
                .route(web::delete().to(posts::delete_post)),
        )
        .route("/{post_id}/view", web::post().to(posts::view_post))
        .route("/{post_id}/emojis", web::post().to(posts::add_post_emoji))
        .route(
            "/{post_id}/emojis/{emoji}",
            web::delete().to(posts::remove_post_emoji),
        )
        .service(
            web::resource("/{post_id}/scrap")
                .route(web::post().to(posts::scrap_post))
                .route(web::delete().to(posts::unscrap_post)),
        )
        .service(comment_scope(ContentKind::Post))
}

fn profile_scope() -> actix_web::Scope {
    web::scope("/profile")
        .service(
            web::resource("/me")
                .route(web::get().to(profile::my_profile))
                .route(web::patch().to(profile::update_my_profile)),
        )
        .route("/me/posts", web::get().to(profile::my_posts))
        .route("/me/feeds", web::get().to(profile::my_feeds))
        .route("/me/scraps", web::get().to(profile::my_scraps))
        .route("/{member_id}", web::get().to(profile::member_profile))
        .route("/{member_id}/posts", web::get().to(profile::member_posts))
        .route("/{member_id}/feeds", web::get().to(profile::member_feeds))
}

fn follow_scope() -> actix_web::Scope {
    web::scope("/follows")
        .service(
            web::resource("/{member_id}")
                .route(web::post().to(follows::follow))
                .route(web::delete().to(follows::unfollow)),
        )
        .route("/{member_id}/followers", web::get().to(follows::followers))
        .route("/{member_id}/followings", web::get().to(follows::followings))
}

fn notification_scope() -> actix_web::Scope {
    web::scope("/notifications")
        .route("", web::get().to(notifications::list_notifications))
        .route("/unread-count", web::get().to(notifications::unread_count))
        .route("/read-all", web::patch().to(notifications::mark_all_read))
        .route("/{notification_id}/read", web::patch().to(notifications::mark_read))
        .route(
            "/{notification_id}",
            web::delete().to(notifications::delete_notification),
        )
}
