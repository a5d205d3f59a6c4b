use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Admin approval state; only `APPROVED` members may write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationStatus {
    Pending,
    Approved,
    Rejected,
}

impl AuthorizationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthorizationStatus::Pending => "PENDING",
            AuthorizationStatus::Approved => "APPROVED",
            AuthorizationStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorizationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(AuthorizationStatus::Pending),
            "APPROVED" => Ok(AuthorizationStatus::Approved),
            "REJECTED" => Ok(AuthorizationStatus::Rejected),
            other => Err(format!("unknown authorization status: {other}")),
        }
    }
}

/// `members` table row
#[derive(Debug, Clone, FromRow)]
pub struct Member {
    pub id: Uuid,
    pub oauth_provider: String,
    pub oauth_id: String,
    pub nickname: String,
    pub email: Option<String>,
    pub generation: Option<i32>,
    pub profile_image_url: Option<String>,
    pub introduce: Option<String>,
    pub is_admin: bool,
    pub authorization_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Member {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Unknown values are treated as pending so they never grant write access
    pub fn status(&self) -> AuthorizationStatus {
        self.authorization_status
            .parse()
            .unwrap_or(AuthorizationStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
    pub id: Uuid,
    pub nickname: String,
    pub email: Option<String>,
    pub generation: Option<i32>,
    pub profile_image_url: Option<String>,
    pub introduce: Option<String>,
    pub is_admin: bool,
    pub authorization_status: AuthorizationStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            nickname: member.nickname.clone(),
            email: member.email.clone(),
            generation: member.generation,
            profile_image_url: member.profile_image_url.clone(),
            introduce: member.introduce.clone(),
            is_admin: member.is_admin,
            authorization_status: member.status(),
            created_at: member.created_at,
        }
    }
}

/// `GET /admin/members` query
#[derive(Debug, Clone, Deserialize)]
pub struct AdminMemberQuery {
    pub status: Option<AuthorizationStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthorizationRequest {
    pub status: AuthorizationStatus,
    #[validate(range(min = 1, max = 1000, message = "generation must be between 1 and 1000"))]
    pub generation: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(status: &str) -> Member {
        let now = Utc::now();
        Member {
            id: Uuid::new_v4(),
            oauth_provider: "github".into(),
            oauth_id: "42".into(),
            nickname: "octocat".into(),
            email: None,
            generation: Some(3),
            profile_image_url: None,
            introduce: None,
            is_admin: false,
            authorization_status: status.into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            AuthorizationStatus::Pending,
            AuthorizationStatus::Approved,
            AuthorizationStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<AuthorizationStatus>().unwrap(), status);
        }
        assert!("approved".parse::<AuthorizationStatus>().is_err());
    }

    #[test]
    fn test_unknown_status_is_pending() {
        assert_eq!(member("BANNED").status(), AuthorizationStatus::Pending);
        assert_eq!(member("APPROVED").status(), AuthorizationStatus::Approved);
    }

    #[test]
    fn test_member_response_uses_typed_status() {
        let response = MemberResponse::from(&member("REJECTED"));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["authorization_status"], "REJECTED");
        assert_eq!(json["generation"], 3);
    }

    #[test]
    fn test_update_authorization_generation_range() {
        let ok = UpdateAuthorizationRequest {
            status: AuthorizationStatus::Approved,
            generation: Some(5),
        };
        assert!(ok.validate().is_ok());

        let bad = UpdateAuthorizationRequest {
            status: AuthorizationStatus::Approved,
            generation: Some(0),
        };
        assert!(bad.validate().is_err());
    }
}
