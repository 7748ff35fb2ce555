//! API handlers for the reservation portal REST endpoints

pub mod auth;
pub mod availability;
pub mod equipment;
pub mod health;
pub mod openapi;
pub mod reservations;
pub mod rooms;
pub mod stats;
pub mod users;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejectionReason,
    TypedHeader,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    if matches!(e.reason(), TypedHeaderRejectionReason::Missing) {
                        AppError::Authentication("Missing authorization header".to_string())
                    } else {
                        AppError::Authentication("Invalid authorization header format".to_string())
                    }
                })?;

        let claims = UserClaims::from_token(bearer.token(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}
