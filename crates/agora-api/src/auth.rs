use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{error, info};
use uuid::Uuid;

use agora_core::{BoardFeed, Boards, Cleanup, CoreError, Profiles};
use agora_db::Database;
use agora_db::models::UserRow;
use agora_types::api::{
    ChangePasswordRequest, JoinRequest, JoinResponse, LoginRequest, LoginResponse,
    WithdrawRequest,
};

use crate::error::ApiError;
use crate::middleware::Claims;

pub type AppState = Arc<AppStateInner>;

/// Shared handler state: the store plus the services built over it,
/// wired together once at startup.
pub struct AppStateInner {
    pub db: Arc<Database>,
    pub boards: Boards,
    pub feed: BoardFeed,
    pub profiles: Profiles,
    pub cleanup: Cleanup,
    pub jwt_secret: String,
}

pub async fn join(
    State(state): State<AppState>,
    Json(req): Json<JoinRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Shape checks; uniqueness is checked against the store below.
    if !req.email.contains('@') {
        return Err(ApiError::BadRequest("email looks invalid".into()));
    }
    if req.nickname.len() < 2 || req.nickname.len() > 32 {
        return Err(ApiError::BadRequest(
            "nickname must be 2 to 32 characters".into(),
        ));
    }
    if req.name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }
    if req.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "password must be at least 8 characters".into(),
        ));
    }

    if state.db.get_user_by_email(&req.email)?.is_some() {
        return Err(ApiError::Conflict("email already in use".into()));
    }
    if state.db.get_user_by_nickname(&req.nickname)?.is_some() {
        return Err(ApiError::Conflict("nickname already in use".into()));
    }

    let user_id = Uuid::new_v4();
    let user = UserRow {
        user_id: user_id.to_string(),
        email: req.email,
        nickname: req.nickname,
        name: req.name,
        password: hash_password(&req.password)?,
        description: req
            .description
            .unwrap_or_else(|| "설명이 아직 없습니다. 설명을 추가해주세요.".to_string()),
        profile_img: "defaultImg.jpg".to_string(),
        position: "user".to_string(),
        created_at: chrono::Utc::now(),
    };
    state.db.insert_user(&user)?;

    info!(nickname = %user.nickname, "user joined");

    Ok((
        StatusCode::CREATED,
        Json(JoinResponse {
            user_id,
            email: user.email,
            nickname: user.nickname,
            name: user.name,
            description: user.description,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_email(&req.email)?
        .ok_or(ApiError::Unauthorized("invalid email or password"))?;

    if !password_matches(&user.password, &req.password)? {
        return Err(ApiError::Unauthorized("invalid email or password"));
    }

    let user_id: Uuid = user
        .user_id
        .parse()
        .map_err(|e| ApiError::Internal(anyhow!("malformed user id: {}", e)))?;

    let token = create_token(&state.jwt_secret, user_id, &user.nickname)?;

    Ok(Json(LoginResponse {
        user_id,
        nickname: user.nickname,
        name: user.name,
        token,
    }))
}

/// Returns the authenticated user's own record, for session restore.
pub async fn status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.profiles.user_by_id(claims.sub)?;
    Ok(Json(user))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.new_password.len() < 8 {
        return Err(ApiError::BadRequest(
            "password must be at least 8 characters".into(),
        ));
    }
    if req.new_password == req.password {
        return Err(ApiError::Conflict(
            "new password must differ from the current one".into(),
        ));
    }

    let user = state
        .db
        .get_user_by_id(&claims.sub.to_string())?
        .ok_or(ApiError::Unauthorized("account no longer exists"))?;

    if !password_matches(&user.password, &req.password)? {
        return Err(CoreError::Forbidden("current password does not match").into());
    }

    let hash = hash_password(&req.new_password)?;
    state.db.update_user_password(&user.user_id, &hash)?;

    Ok(Json(serde_json::json!({ "message": "password updated" })))
}

/// Deletes the account after a fresh password check. The purge runs
/// every cleanup step and reports what each one removed.
pub async fn withdraw(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<WithdrawRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_id(&claims.sub.to_string())?
        .ok_or(ApiError::Unauthorized("account no longer exists"))?;

    if !password_matches(&user.password, &req.password)? {
        return Err(CoreError::Forbidden("password does not match").into());
    }

    let cleanup = state.cleanup.clone();
    let nickname = user.nickname;
    let report = tokio::task::spawn_blocking(move || cleanup.purge_user(claims.sub, &nickname))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow!("purge task failed: {}", e))
        })??;

    Ok(Json(report))
}

pub fn create_token(secret: &str, user_id: Uuid, nickname: &str) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user_id,
        nickname: nickname.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(anyhow!("token encoding failed: {}", e)))?;

    Ok(token)
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow!("password hashing failed: {}", e)))?
        .to_string();
    Ok(hash)
}

/// Distinguishes "wrong password" (Ok(false)) from an unreadable stored
/// hash, which is a server-side fault.
fn password_matches(stored_hash: &str, candidate: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ApiError::Internal(anyhow!("stored hash unreadable: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");

        assert!(password_matches(&hash, "correct horse").unwrap());
        assert!(!password_matches(&hash, "wrong horse").unwrap());
    }

    #[test]
    fn garbage_stored_hashes_are_a_server_fault_not_a_mismatch() {
        assert!(password_matches("not a phc string", "anything").is_err());
    }

    #[test]
    fn tokens_round_trip_their_claims() {
        let user_id = Uuid::new_v4();
        let token = create_token("test-secret", user_id, "amy").unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret("test-secret".as_bytes()),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, user_id);
        assert_eq!(decoded.claims.nickname, "amy");
    }

    #[test]
    fn tokens_do_not_verify_under_another_secret() {
        let token = create_token("secret-a", Uuid::new_v4(), "amy").unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret("secret-b".as_bytes()),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
