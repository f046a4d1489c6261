use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

/// JWT claims for an anonymous owner identity. `sub` is the opaque owner id
/// minted at sign-in; there are no accounts behind it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub anonymous: bool,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// Signs a token for `owner_id`, valid for the configured duration.
/// Returns the token and its expiry as a unix timestamp.
pub fn generate_token(owner_id: &str) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    let expires_at = (Utc::now()
        + Duration::minutes(util::config::jwt_duration_minutes() as i64))
    .timestamp();
    let claims = Claims {
        sub: owner_id.to_string(),
        exp: expires_at as usize,
        anonymous: true,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(util::config::jwt_secret().as_bytes()),
    )?;
    Ok((token, expires_at))
}
