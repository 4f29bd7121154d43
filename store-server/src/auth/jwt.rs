//! JWT Token Service
//!
//! Handles JWT token generation, validation, and parsing.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::Role;
use crate::utils::AppError;

/// JWT Configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT secret key (should be at least 32 bytes)
    pub secret: String,
    /// Token expiration time in minutes
    pub expiration_minutes: i64,
}

/// JWT Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username
    pub username: String,
    /// Role name
    pub role: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// JWT Errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT Token Service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    /// Issue a signed token for a user. Expiry is issuance time plus the
    /// configured lifetime; there is no refresh mechanism.
    pub fn issue(&self, user_id: i64, username: &str, role: Role) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.as_str().to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token. Fails when the signature mismatches, the
    /// payload is malformed, or the expiry has elapsed.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                    _ => JwtError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Extract token from Authorization header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// Current user context extracted from a verified JWT
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id: i64 = claims
            .sub
            .parse()
            .map_err(|_| format!("bad subject id: {}", claims.sub))?;
        let role: Role = claims.role.parse().map_err(|e| format!("{e}"))?;

        Ok(Self {
            id,
            username: claims.username,
            role,
        })
    }
}

impl CurrentUser {
    /// Exact-match role check: no hierarchy, admin does not satisfy a
    /// customer requirement or vice versa.
    pub fn authorize(&self, required: Role) -> Result<(), AppError> {
        if self.role == required {
            Ok(())
        } else {
            tracing::warn!(
                target: "security",
                user_id = self.id,
                user_role = %self.role,
                required_role = %required,
                "Role authorization failed"
            );
            Err(AppError::forbidden(format!(
                "{} role required",
                required.as_str()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service(expiration_minutes: i64) -> JwtService {
        JwtService::new(JwtConfig {
            secret: "unit-test-secret-key-at-least-32-chars".to_string(),
            expiration_minutes,
        })
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let service = test_service(60);
        let token = service.issue(42, "alice", Role::Customer).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "customer");
        assert!(claims.exp > claims.iat);

        let user = CurrentUser::try_from(claims).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.role, Role::Customer);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Issue a token that expired an hour ago (negative lifetime).
        let service = test_service(-60);
        let token = service.issue(1, "bob", Role::Admin).unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = test_service(60);
        let token = service.issue(1, "bob", Role::Admin).unwrap();

        let other = test_service(60);
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(matches!(
            other.verify(&tampered),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn authorize_requires_exact_role() {
        let admin = CurrentUser {
            id: 1,
            username: "root".to_string(),
            role: Role::Admin,
        };
        assert!(admin.authorize(Role::Admin).is_ok());
        // Admin does NOT implicitly satisfy a customer requirement.
        assert!(admin.authorize(Role::Customer).is_err());

        let customer = CurrentUser {
            id: 2,
            username: "carol".to_string(),
            role: Role::Customer,
        };
        assert!(customer.authorize(Role::Customer).is_ok());
        assert!(customer.authorize(Role::Admin).is_err());
    }
}
