//! Authentication for the API.
//!
//! A single bearer JWT per login, HS256-signed. The middleware validates the
//! token on every protected route and stores an [`AuthUser`] in the request
//! extensions; handlers pick it up through the extractor. There are no roles,
//! refresh tokens, or API keys in this single-tenant deployment.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::user;
use crate::errors::envelope_error;

/// Claim structure for issued JWT tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// Authenticated identity extracted from a validated token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub token_id: String,
}

/// Authentication configuration.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub token_expiration: Duration,
}

/// A freshly issued access token.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Account is inactive")]
    InactiveAccount,
    #[error("Missing authentication token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token creation failed: {0}")]
    TokenCreation(String),
    #[error("Internal auth error: {0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::TokenCreation(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        };
        let message = match &self {
            AuthError::TokenCreation(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        envelope_error(status, message)
    }
}

/// Issues and validates tokens, and checks credentials against the users
/// table.
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Generates an access token for a user.
    pub fn issue_token(&self, user: &user::Model) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_in = self.config.token_expiration.as_secs() as i64;
        let exp = now + ChronoDuration::seconds(expires_in);

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        Ok(IssuedToken { token, expires_in })
    }

    /// Validates a JWT token and extracts the claims. A token past its `exp`
    /// claim is rejected with [`AuthError::TokenExpired`].
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.jwt_issuer]);
        validation.set_audience(&[&self.config.jwt_audience]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(data.claims)
    }

    /// Checks a username/password pair and returns the user with a fresh
    /// token on success.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(user::Model, IssuedToken), AuthError> {
        let account = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.is_active {
            return Err(AuthError::InactiveAccount);
        }

        if !verify_password(password, &account.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&account)?;
        Ok((account, token))
    }

    /// Seeds an admin account when the users table is empty so a fresh
    /// deployment can log in.
    pub async fn ensure_default_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let existing = user::Entity::find()
            .count(&*self.db)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if existing > 0 {
            return Ok(());
        }

        let account = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            password_hash: Set(hash_password(password)?),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };
        user::Entity::insert(account)
            .exec(&*self.db)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        info!("Seeded default admin account '{}'", username);
        Ok(())
    }
}

/// Hashes a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(e.to_string()))
}

/// Verifies a password against a stored Argon2 hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Middleware validating the bearer token on protected routes.
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Some(token) => token,
        None => {
            warn!("Request without bearer token rejected");
            return AuthError::MissingToken.into_response();
        }
    };

    let claims = match auth_service.validate_token(token) {
        Ok(claims) => claims,
        Err(err) => return err.into_response(),
    };

    let user_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return AuthError::InvalidToken.into_response(),
    };

    request.extensions_mut().insert(AuthUser {
        user_id,
        username: claims.username,
        token_id: claims.jti,
    });

    next.run(request).await
}

fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-test-secret-0123456789-abcdefghijklmnopqrstuvwxyz-ABCDEFGHIJ".into(),
            jwt_issuer: "garmentflow-api".into(),
            jwt_audience: "garmentflow-app".into(),
            token_expiration: Duration::from_secs(3600),
        }
    }

    fn test_service() -> AuthService {
        AuthService::new(test_config(), Arc::new(DatabaseConnection::Disconnected))
    }

    fn test_user() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            username: "admin".into(),
            password_hash: String::new(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3cret!").unwrap();
        assert!(verify_password("s3cret!", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret!", "not-a-hash"));
    }

    #[test]
    fn issued_token_validates() {
        let service = test_service();
        let user = test_user();
        let issued = service.issue_token(&user).unwrap();

        let claims = service.validate_token(&issued.token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "admin");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = test_service();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: "admin".into(),
            jti: Uuid::new_v4().to_string(),
            iat: (now - ChronoDuration::hours(3)).timestamp(),
            exp: (now - ChronoDuration::hours(2)).timestamp(),
            iss: "garmentflow-api".into(),
            aud: "garmentflow-app".into(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(test_config().jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let service = test_service();
        let user = test_user();
        let issued = service.issue_token(&user).unwrap();

        let other = AuthService::new(
            AuthConfig {
                jwt_secret: "another-secret-entirely-0123456789-abcdefghijklmnopqrstuvwxyz-XY"
                    .into(),
                ..test_config()
            },
            Arc::new(DatabaseConnection::Disconnected),
        );
        assert!(matches!(
            other.validate_token(&issued.token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn bearer_token_extraction() {
        let mut headers = axum::http::HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, "Basic dXNlcg==".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
