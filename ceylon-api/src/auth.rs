use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::auth::{CustomerClaims, ROLE_GUEST},
    state::{AppState, AuthConfig},
};

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user_id: String,
    expires_in: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/guest", post(login_guest))
}

/// Signs a token for `sub` with the given role, valid for the configured
/// expiration.
pub fn issue_token(auth: &AuthConfig, sub: &str, role: &str) -> Result<String, AppError> {
    let claims = CustomerClaims {
        sub: sub.to_string(),
        email: None,
        role: role.to_string(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

async fn login_guest(State(state): State<AppState>) -> Result<Json<AuthResponse>, AppError> {
    let user_id = format!("guest-{}", Uuid::new_v4());
    let token = issue_token(&state.auth, &user_id, ROLE_GUEST)?;
    tracing::debug!(user_id = %user_id, "Issued guest token");

    Ok(Json(AuthResponse { token, user_id, expires_in: state.auth.expiration }))
}
