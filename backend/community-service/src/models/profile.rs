use super::AuthorizationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Member joined with follow counts
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub member_id: Uuid,
    pub nickname: String,
    pub generation: Option<i32>,
    pub profile_image_url: Option<String>,
    pub introduce: Option<String>,
    pub authorization_status: String,
    pub follower_count: i64,
    pub following_count: i64,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub member_id: Uuid,
    pub nickname: String,
    pub generation: Option<i32>,
    pub profile_image_url: Option<String>,
    pub introduce: Option<String>,
    pub authorization_status: AuthorizationStatus,
    pub follower_count: i64,
    pub following_count: i64,
    /// Set only when viewing another member's profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_followed: Option<bool>,
}

impl ProfileResponse {
    pub fn from_row(row: ProfileRow, is_followed: Option<bool>) -> Self {
        Self {
            member_id: row.member_id,
            nickname: row.nickname,
            generation: row.generation,
            profile_image_url: row.profile_image_url,
            introduce: row.introduce,
            authorization_status: row
                .authorization_status
                .parse()
                .unwrap_or(AuthorizationStatus::Pending),
            follower_count: row.follower_count,
            following_count: row.following_count,
            is_followed,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = 20, message = "nickname must be 1-20 characters"),
        custom(function = "validate_not_blank")
    )]
    pub nickname: String,
    #[validate(length(max = 500, message = "profile_image_url is too long"))]
    pub profile_image_url: Option<String>,
    #[validate(length(max = 200, message = "introduce must be at most 200 characters"))]
    pub introduce: Option<String>,
}

/// Nicknames are stored trimmed, so whitespace alone is empty
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("nickname must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Entry in follower / following lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FollowMember {
    pub member_id: Uuid,
    pub nickname: String,
    pub generation: Option<i32>,
    pub profile_image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_followed_omitted_for_own_profile() {
        let row = ProfileRow {
            member_id: Uuid::new_v4(),
            nickname: "octocat".into(),
            generation: Some(1),
            profile_image_url: None,
            introduce: Some("hi".into()),
            authorization_status: "APPROVED".into(),
            follower_count: 3,
            following_count: 4,
            deleted_at: None,
        };

        let own = serde_json::to_value(ProfileResponse::from_row(row.clone(), None)).unwrap();
        assert!(own.get("is_followed").is_none());
        assert_eq!(own["follower_count"], 3);

        let other = serde_json::to_value(ProfileResponse::from_row(row, Some(true))).unwrap();
        assert_eq!(other["is_followed"], true);
    }

    #[test]
    fn test_update_profile_limits() {
        let ok = UpdateProfileRequest {
            nickname: "ferris".into(),
            profile_image_url: None,
            introduce: Some("crab".into()),
        };
        assert!(ok.validate().is_ok());

        let long_intro = UpdateProfileRequest {
            introduce: Some("x".repeat(201)),
            ..ok.clone()
        };
        assert!(long_intro.validate().is_err());

        let long_name = UpdateProfileRequest {
            nickname: "x".repeat(21),
            ..ok.clone()
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_blank_nickname_is_rejected() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"nickname":"   "}"#).unwrap();
        assert!(req.validate().is_err());

        let padded: UpdateProfileRequest =
            serde_json::from_str(r#"{"nickname":"  ferris  "}"#).unwrap();
        assert!(padded.validate().is_ok());
    }
}
