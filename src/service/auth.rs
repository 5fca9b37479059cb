//! User signup/login and HS256 bearer tokens.
//!
//! Logout is client-side token disposal; there is no server-side session
//! state to invalidate.

use crate::config::AuthConfig;
use crate::db::users;
use crate::error::{AppError, Result};
use crate::models::UserResponse;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Bearer token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

pub struct AuthService {
    pool: PgPool,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl AuthService {
    pub fn new(pool: PgPool, config: &AuthConfig) -> Self {
        Self {
            pool,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiry_hours: config.jwt_expiry_hours,
        }
    }

    pub async fn signup(&self, req: SignupRequest) -> Result<UserResponse> {
        let email = req.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation("invalid email address".into()));
        }
        if req.password.len() < 8 {
            return Err(AppError::Validation(
                "password must be at least 8 characters".into(),
            ));
        }

        if users::find_by_email(&self.pool, &email).await?.is_some() {
            return Err(AppError::Conflict("user already exists".into()));
        }

        let hash = hash_password(&req.password)?;
        let user = users::insert(&self.pool, &email, &hash, req.name.as_deref()).await?;

        Ok(user.into())
    }

    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse> {
        let email = req.email.trim().to_lowercase();

        // Same error for unknown email and bad password.
        let user = users::find_by_email(&self.pool, &email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid credentials".into()))?;

        verify_password(&req.password, &user.password_hash)
            .map_err(|_| AppError::Unauthorized("invalid credentials".into()))?;

        let (token, expires_in) = self.issue_token(user.id, &user.email)?;

        Ok(LoginResponse {
            user: user.into(),
            access_token: token,
            token_type: "Bearer",
            expires_in,
        })
    }

    pub async fn profile(&self, user_id: i64) -> Result<UserResponse> {
        let user = users::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("user not found".into()))?;

        Ok(user.into())
    }

    /// Sign a token for the given user. Exposed for request tests.
    pub fn issue_token(&self, user_id: i64, email: &str) -> Result<(String, i64)> {
        let now = Utc::now();
        let expires_in = Duration::hours(self.expiry_hours).num_seconds();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            exp: now.timestamp() + expires_in,
            iat: now.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("token encoding failed: {e}")))?;

        Ok((token, expires_in))
    }

    /// Decode and verify a bearer token.
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("invalid or expired token".into()))
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> std::result::Result<(), ()> {
    let parsed = PasswordHash::new(hash).map_err(|_| ())?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ())
}
