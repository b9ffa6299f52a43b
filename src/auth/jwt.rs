// src/auth/jwt.rs
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Token lifetime. The login response advertises the same value, so the
/// claim and `expires_in_seconds` cannot diverge.
pub const TOKEN_TTL_SECONDS: usize = 8 * 60 * 60;

/// Claims carried by every OXA access token. `role` is what the admin
/// middleware gates on.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
    pub username: String,
}

pub fn sign_token(user_id: i64, role: &str, username: &str, secret: &str) -> Result<String, AppError> {
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::seconds(TOKEN_TTL_SECONDS as i64);
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        iat: issued_at.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
        username: username.to_string(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::internal(format!("No se pudo firmar el token: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::validation(format!("Token inválido o expirado: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "secreto-de-prueba";

    #[test]
    fn sign_and_verify_round_trip() {
        let token = sign_token(7, "ADMIN", "admin", SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, "ADMIN");
        assert_eq!(claims.username, "admin");
    }

    #[test]
    fn expiry_claim_matches_advertised_ttl() {
        let token = sign_token(1, "USER", "u", SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = sign_token(1, "ADMIN", "admin", "otro-secreto").unwrap();
        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn rejects_garbage_token() {
        assert!(verify_token("no-es-un-jwt", SECRET).is_err());
    }
}
