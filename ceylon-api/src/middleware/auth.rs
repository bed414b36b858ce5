use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_GUEST: &str = "GUEST";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CustomerClaims {
    pub sub: String,
    pub email: Option<String>,
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminClaims {
    pub sub: String,
    pub email: Option<String>,
    pub role: String,
    pub exp: usize,
}

fn decode_claims<T: DeserializeOwned + Clone>(token: &str, secret: &str) -> Option<T> {
    decode::<T>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .ok()
        .map(|data| data.claims)
}

/// Guards the `/v1/admin` routes: a valid token with the `ADMIN` role.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims: AdminClaims = decode_claims(token, &state.auth.secret).ok_or(StatusCode::UNAUTHORIZED)?;

    if claims.role != ROLE_ADMIN {
        return Err(StatusCode::FORBIDDEN);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Customer claims when a bearer token is sent. Anonymous requests pass
/// through with `None`; a token that is present but invalid is rejected.
#[derive(Debug, Clone)]
pub struct MaybeCustomer(pub Option<CustomerClaims>);

impl MaybeCustomer {
    pub fn user_id(&self) -> Option<String> {
        self.0.as_ref().map(|claims| claims.sub.clone())
    }
}

impl FromRequestParts<AppState> for MaybeCustomer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(MaybeCustomer(None));
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::AuthenticationError("Malformed authorization header".to_string()))?;

        let claims: CustomerClaims = decode_claims(bearer.token(), &state.auth.secret)
            .ok_or_else(|| AppError::AuthenticationError("Invalid or expired token".to_string()))?;

        Ok(MaybeCustomer(Some(claims)))
    }
}
