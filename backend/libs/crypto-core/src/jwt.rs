/// Shared JWT module for community services
///
/// Tokens are signed with RS256 only. Keys are installed once at startup and
/// are immutable afterwards.
///
/// ## Usage
///
/// ```rust,ignore
/// use crypto_core::jwt;
///
/// jwt::initialize_jwt_keys(&private_key_pem, &public_key_pem)?;
/// let pair = jwt::generate_token_pair(member_id, "nickname")?;
/// let claims = jwt::validate_access_token(&pair.access_token)?.claims;
/// ```
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

pub const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 1;
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

// ============================================================================
// Data Structures
// ============================================================================

/// Kind of token carried in the `token_type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims issued for a community member
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (member ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub token_type: TokenType,
    /// Nickname at issue time, informational only
    pub nickname: String,
}

impl Claims {
    pub fn member_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|e| anyhow!("Invalid member ID format in token: {e}"))
    }
}

/// Token pair response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ============================================================================
// Key Storage
// ============================================================================

static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Initialize JWT keys from PEM-formatted strings
///
/// Can only be called once; subsequent calls return an error.
pub fn initialize_jwt_keys(private_key_pem: &str, public_key_pem: &str) -> Result<()> {
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA private key: {e}"))?;
    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;

    JWT_ENCODING_KEY
        .set(encoding_key)
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;
    JWT_DECODING_KEY
        .set(decoding_key)
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    Ok(())
}

/// Initialize only the public key, for processes that never issue tokens
pub fn initialize_jwt_validation_only(public_key_pem: &str) -> Result<()> {
    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;

    JWT_DECODING_KEY
        .set(decoding_key)
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    Ok(())
}

/// Whether a decoding key has been installed
pub fn is_initialized() -> bool {
    JWT_DECODING_KEY.get().is_some()
}

fn get_encoding_key() -> Result<&'static EncodingKey> {
    JWT_ENCODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_jwt_keys() during startup.")
    })
}

fn get_decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT keys not initialized. Call initialize_jwt_keys() or initialize_jwt_validation_only() during startup."))
}

// ============================================================================
// Token Generation
// ============================================================================

fn generate_token(
    member_id: Uuid,
    nickname: &str,
    token_type: TokenType,
    lifetime: Duration,
) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: member_id.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
        token_type,
        nickname: nickname.to_string(),
    };

    encode(&Header::new(JWT_ALGORITHM), &claims, get_encoding_key()?)
        .map_err(|e| anyhow!("Failed to generate {:?} token: {e}", token_type))
}

/// Generate a short-lived (1 hour) access token
pub fn generate_access_token(member_id: Uuid, nickname: &str) -> Result<String> {
    generate_token(
        member_id,
        nickname,
        TokenType::Access,
        Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS),
    )
}

/// Generate a long-lived (30 days) refresh token
pub fn generate_refresh_token(member_id: Uuid, nickname: &str) -> Result<String> {
    generate_token(
        member_id,
        nickname,
        TokenType::Refresh,
        Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
    )
}

/// Generate both access and refresh tokens
pub fn generate_token_pair(member_id: Uuid, nickname: &str) -> Result<TokenResponse> {
    Ok(TokenResponse {
        access_token: generate_access_token(member_id, nickname)?,
        refresh_token: generate_refresh_token(member_id, nickname)?,
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_EXPIRY_HOURS * 3600,
    })
}

// ============================================================================
// Token Validation
// ============================================================================

/// Validate signature and expiry of a token of any type
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    decode::<Claims>(token, get_decoding_key()?, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

fn validate_typed(token: &str, expected: TokenType) -> Result<TokenData<Claims>> {
    let data = validate_token(token)?;
    if data.claims.token_type != expected {
        return Err(anyhow!(
            "Expected {:?} token, got {:?}",
            expected,
            data.claims.token_type
        ));
    }
    Ok(data)
}

/// Validate a token and require `token_type == access`
pub fn validate_access_token(token: &str) -> Result<TokenData<Claims>> {
    validate_typed(token, TokenType::Access)
}

/// Validate a token and require `token_type == refresh`
pub fn validate_refresh_token(token: &str) -> Result<TokenData<Claims>> {
    validate_typed(token, TokenType::Refresh)
}
