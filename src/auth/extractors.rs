use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tracing::warn;

use super::{jwt::Claims, repo_types::Role};
use crate::state::AppState;

/// Authorization requirement attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Authenticated,
    Admin,
}

impl Policy {
    /// Claims have already passed signature and expiry checks.
    pub fn permits(self, claims: &Claims) -> bool {
        match self {
            Policy::Authenticated => true,
            Policy::Admin => claims.role == Role::Admin,
        }
    }
}

/// Extracts and validates the bearer JWT.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "missing Authorization header".into()))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or((StatusCode::UNAUTHORIZED, "invalid auth scheme".into()))?;

        let claims = state.keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            (StatusCode::UNAUTHORIZED, "invalid or expired token".to_string())
        })?;

        if !Policy::Authenticated.permits(&claims) {
            return Err((StatusCode::FORBIDDEN, "forbidden".into()));
        }
        Ok(AuthUser(claims))
    }
}

/// Like [`AuthUser`], but the token must carry the `Admin` role.
#[derive(Debug)]
pub struct AdminUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !Policy::Admin.permits(&claims) {
            warn!(user_id = %claims.sub, "admin policy denied");
            return Err((StatusCode::FORBIDDEN, "admin role required".into()));
        }
        Ok(AdminUser(claims))
    }
}
