use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use iyaya_core::error::AppError;

use crate::{services::AccessTokenClaims, AppState};

/// Middleware to require authentication.
///
/// Layered onto the whole notification route group, so every route in the
/// group (and any route added to it later) rejects unauthenticated callers
/// before its handler runs.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = token.ok_or_else(|| {
        AppError::Unauthorized(anyhow::anyhow!("Missing or invalid Authorization header"))
    })?;

    let claims = state
        .jwt
        .validate_access_token(token)
        .map_err(|_| AppError::Unauthorized(anyhow::anyhow!("Invalid or expired token")))?;

    // Store claims in request extensions so handlers can access them
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extractor to easily get claims in handlers
pub struct AuthUser(pub AccessTokenClaims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<AccessTokenClaims>()
            .ok_or_else(|| {
                AppError::AuthError(anyhow::anyhow!("Auth claims missing from request extensions"))
            })?;

        Ok(AuthUser(claims.clone()))
    }
}
