use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::api::error::ApiError;
use crate::api::tokens::TokenPair;
use crate::db::{
    DbPool, MessageResponse, RefreshResponse, SigninRequest, SigninResponse, SignupRequest,
    UpdateProfileRequest, User, UserResponse, ROLE_ADMIN, ROLE_USER,
};
use crate::AppState;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

fn token_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Set both token cookies from a freshly minted pair.
fn set_token_cookies(jar: CookieJar, pair: &TokenPair) -> CookieJar {
    jar.add(token_cookie(ACCESS_COOKIE, pair.access.clone()))
        .add(token_cookie(REFRESH_COOKIE, pair.refresh.clone()))
}

fn clear_token_cookies(jar: CookieJar) -> CookieJar {
    let access = Cookie::build(ACCESS_COOKIE).path("/").build();
    let refresh = Cookie::build(REFRESH_COOKIE).path("/").build();
    jar.remove(access).remove(refresh)
}

/// Identity decoded from a verified access token.
///
/// Verification is purely cryptographic plus the expiry check; no database
/// lookup happens on this path, so a token stays valid until it expires even
/// after logout.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ACCESS_COOKIE)
            .ok_or_else(|| ApiError::unauthenticated("No access token, authorization denied"))?;

        let claims = state
            .tokens
            .verify_access(token.value())
            .map_err(|_| ApiError::invalid_token("Access token is not valid"))?;

        Ok(Self {
            id: claims.sub,
            role: claims.role,
        })
    }
}

/// Role gate on top of [`AuthUser`]: admits only admins. Authentication always
/// runs first since the role comes out of the verified claims.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::forbidden("Access denied. Admin only."));
        }
        Ok(Self(user))
    }
}

/// Register a new account. Role is always `user`; admins are created at
/// startup from config.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Server error")
    })?;

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, role) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(&req.username)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(ROLE_USER)
    .execute(&state.db)
    .await?;

    tracing::info!("New user registered: {}", req.email);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".to_string(),
        }),
    ))
}

/// Sign in and receive a fresh token pair. The stored refresh token is
/// replaced, so any previous session's refresh token dies here.
pub async fn signin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SigninRequest>,
) -> Result<(CookieJar, Json<SigninResponse>), ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    // Unknown email and wrong password are indistinguishable to the caller
    let user = user.ok_or_else(|| ApiError::invalid_credentials("Invalid credentials"))?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::invalid_credentials("Invalid credentials"));
    }

    let pair = state.tokens.mint_pair(&user.id, &user.role).map_err(|e| {
        tracing::error!("Failed to mint token pair: {}", e);
        ApiError::internal("Server error")
    })?;

    sqlx::query("UPDATE users SET refresh_token = ? WHERE id = ?")
        .bind(&pair.refresh)
        .bind(&user.id)
        .execute(&state.db)
        .await?;

    let message = if user.role == ROLE_ADMIN {
        "Admin signed in successfully"
    } else {
        "User signed in successfully"
    };

    let jar = set_token_cookies(jar, &pair);
    Ok((
        jar,
        Json(SigninResponse {
            message: message.to_string(),
            access_token: pair.access,
            role: user.role,
        }),
    ))
}

/// Exchange a valid refresh token for a new pair, rotating the stored token.
///
/// The presented token must exactly equal the one stored on the user row;
/// a rotated-out or logged-out token fails here even when its signature is
/// still good. Concurrent refreshes race on the single-row update: the last
/// writer wins and the loser's new refresh token dies on its next use.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<RefreshResponse>), ApiError> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::unauthenticated("No refresh token"))?;

    let claims = state
        .tokens
        .verify_refresh(&token)
        .map_err(|_| ApiError::invalid_token("Refresh token is not valid"))?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&claims.sub)
        .fetch_optional(&state.db)
        .await?;
    let user = user.ok_or_else(|| ApiError::not_found("User not found"))?;

    let stored = user.refresh_token.as_deref().unwrap_or("");
    let matches =
        stored.len() == token.len() && bool::from(stored.as_bytes().ct_eq(token.as_bytes()));
    if !matches {
        return Err(ApiError::invalid_token("Refresh token is not valid"));
    }

    let pair = state.tokens.mint_pair(&user.id, &user.role).map_err(|e| {
        tracing::error!("Failed to mint token pair: {}", e);
        ApiError::internal("Server error")
    })?;

    sqlx::query("UPDATE users SET refresh_token = ? WHERE id = ?")
        .bind(&pair.refresh)
        .bind(&user.id)
        .execute(&state.db)
        .await?;

    // Body carries the access token for clients that cannot read the cookie
    let jar = set_token_cookies(jar, &pair);
    Ok((
        jar,
        Json(RefreshResponse {
            access_token: pair.access,
        }),
    ))
}

/// Clear both cookies and revoke the stored refresh token. Already-issued
/// access tokens stay valid until they expire on their own.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    if let Some(cookie) = jar.get(ACCESS_COOKIE) {
        if let Ok(claims) = state.tokens.verify_access(cookie.value()) {
            sqlx::query("UPDATE users SET refresh_token = NULL WHERE id = ?")
                .bind(&claims.sub)
                .execute(&state.db)
                .await?;
        }
    }

    Ok((
        clear_token_cookies(jar),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

/// Current user's record, minus credential material.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let record: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&user.id)
        .fetch_optional(&state.db)
        .await?;

    let record = record.ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(UserResponse::from(record)))
}

/// Partial profile update: absent fields keep their stored values.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let record: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&user.id)
        .fetch_optional(&state.db)
        .await?;
    let mut record = record.ok_or_else(|| ApiError::not_found("User not found"))?;

    if let Some(username) = req.username {
        record.username = username;
    }
    if let Some(phone) = req.phone {
        record.phone = Some(phone);
    }
    if let Some(address) = req.address {
        record.address = Some(address);
    }
    if let Some(country) = req.country {
        record.country = Some(country);
    }

    sqlx::query(
        "UPDATE users SET username = ?, phone = ?, address = ?, country = ? WHERE id = ?",
    )
    .bind(&record.username)
    .bind(&record.phone)
    .bind(&record.address)
    .bind(&record.country)
    .bind(&record.id)
    .execute(&state.db)
    .await?;

    Ok(Json(UserResponse::from(record)))
}

/// Confirm the access token still verifies and return the caller's record.
pub async fn check_token(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let record: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&user.id)
        .fetch_optional(&state.db)
        .await?;

    let record = record.ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(
        serde_json::json!({ "user": UserResponse::from(record) }),
    ))
}

/// Create the configured admin account at startup when it does not exist.
pub async fn ensure_admin_user(pool: &DbPool, email: &str, password: &str) -> anyhow::Result<()> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(password)
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {}", e))?;

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, role) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind("admin")
    .bind(email)
    .bind(&password_hash)
    .bind(ROLE_ADMIN)
    .execute(pool)
    .await?;

    tracing::info!("Created admin user: {}", email);
    Ok(())
}
