use super::ensure_live;
use crate::db::member_repo;
use crate::error::{AppError, Result};
use crate::models::{AuthorizationStatus, Member};
use sqlx::PgPool;
use uuid::Uuid;

/// Load a member that exists and has not withdrawn
pub async fn get_member_is_not_deleted(pool: &PgPool, member_id: Uuid) -> Result<Member> {
    let member = member_repo::find_by_id(pool, member_id).await?;
    ensure_live(member, "Member")
}

/// Load a member allowed to write content
pub async fn get_writer(pool: &PgPool, member_id: Uuid) -> Result<Member> {
    let member = get_member_is_not_deleted(pool, member_id).await?;
    ensure_writer(&member)?;
    Ok(member)
}

/// Load a member holding the admin flag
pub async fn get_admin(pool: &PgPool, member_id: Uuid) -> Result<Member> {
    let member = get_member_is_not_deleted(pool, member_id).await?;
    if !member.is_admin {
        return Err(AppError::Forbidden("Admin privileges required".to_string()));
    }
    Ok(member)
}

pub fn ensure_writer(member: &Member) -> Result<()> {
    match member.status() {
        AuthorizationStatus::Approved => Ok(()),
        status => Err(AppError::Forbidden(format!(
            "Member is not approved to write (status: {status})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn member(status: AuthorizationStatus) -> Member {
        let now = Utc::now();
        Member {
            id: Uuid::new_v4(),
            oauth_provider: "github".into(),
            oauth_id: "1".into(),
            nickname: "ferris".into(),
            email: None,
            generation: None,
            profile_image_url: None,
            introduce: None,
            is_admin: false,
            authorization_status: status.as_str().into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_only_approved_members_write() {
        assert!(ensure_writer(&member(AuthorizationStatus::Approved)).is_ok());
        assert!(matches!(
            ensure_writer(&member(AuthorizationStatus::Pending)),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_writer(&member(AuthorizationStatus::Rejected)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_withdrawn_member_is_gone() {
        let mut withdrawn = member(AuthorizationStatus::Approved);
        withdrawn.deleted_at = Some(Utc::now());
        assert!(matches!(
            ensure_live(Some(withdrawn), "Member"),
            Err(AppError::Gone(_))
        ));
    }
}
