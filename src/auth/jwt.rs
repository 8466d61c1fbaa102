//! JWT decoding

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Claims carried by the identity provider's token. `sub` and `email`
/// are trusted as verified; nothing here is re-checked against the
/// provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: usize,
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "token verification failed");
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_for(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims() -> Claims {
        Claims {
            sub: "user_123".to_string(),
            email: "a@example.com".to_string(),
            name: Some("A".to_string()),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        }
    }

    #[test]
    fn round_trips_valid_token() {
        let token = token_for(&claims(), "secret");
        let decoded = verify_token(&token, "secret").unwrap();
        assert_eq!(decoded.email, "a@example.com");
        assert_eq!(decoded.sub, "user_123");
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = token_for(&claims(), "secret");
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let mut c = claims();
        c.exp = (chrono::Utc::now().timestamp() - 3600) as usize;
        let token = token_for(&c, "secret");
        assert!(verify_token(&token, "secret").is_err());
    }
}
