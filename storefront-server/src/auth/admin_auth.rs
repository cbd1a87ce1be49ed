//! Admin JWT authentication for the back-office API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use crate::state::AppState;

/// JWT claims for admin authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin ID
    pub sub: i64,
    /// Admin email
    pub email: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated admin extracted from JWT
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub admin_id: i64,
    pub email: String,
}

pub const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT for an admin. Returns the token and its expiry in epoch millis.
pub fn create_token(
    admin_id: i64,
    email: &str,
    secret: &str,
) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let expires = now + chrono::Duration::hours(JWT_EXPIRY_HOURS);
    let claims = AdminClaims {
        sub: admin_id,
        email: email.to_string(),
        exp: expires.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, expires.timestamp_millis()))
}

/// Verify a bearer token
pub fn decode_token(token: &str, secret: &str) -> Result<AdminIdentity, AppError> {
    let token_data = jsonwebtoken::decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;

    Ok(AdminIdentity {
        admin_id: token_data.claims.sub,
        email: token_data.claims.email,
    })
}

/// Middleware that extracts and verifies the admin JWT from the Authorization header
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format").into_response())?;

    let identity = decode_token(token, &state.jwt_secret).map_err(IntoResponse::into_response)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_token_round_trip() {
        let (token, expires_at) = create_token(42, "admin@matbaa.test", "secret").unwrap();
        assert!(expires_at > shared::util::now_millis());

        let identity = decode_token(&token, "secret").unwrap();
        assert_eq!(identity.admin_id, 42);
        assert_eq!(identity.email, "admin@matbaa.test");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = create_token(1, "a@b.co", "secret").unwrap();
        assert_eq!(decode_token(&token, "other").unwrap_err().code, ErrorCode::TokenInvalid);
        assert_eq!(decode_token("garbage", "secret").unwrap_err().code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_expired_token() {
        let claims = AdminClaims {
            sub: 1,
            email: "a@b.co".into(),
            exp: 1_000,
            iat: 0,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert_eq!(decode_token(&token, "secret").unwrap_err().code, ErrorCode::TokenExpired);
    }
}
