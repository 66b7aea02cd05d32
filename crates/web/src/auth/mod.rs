//! Request authentication.
//!
//! Tokens are bearer JWTs carrying the account id and staff flag. The
//! extractors below are the only gate: handlers state their requirement by
//! taking [`CurrentUser`] (any authenticated account) or [`StaffUser`]
//! (staff-only writes) as an argument.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use model::user::User;
use utility::id::Id;

use crate::common::ApiError;

pub mod password;
mod token;

pub use token::{AuthKeys, Claims};

/// The authenticated caller of the current request.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: Id<User>,
    pub is_staff: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AuthKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                ApiError::unauthorized(
                    "Authentication credentials were not provided.",
                )
            })?;

        let keys = AuthKeys::from_ref(state);
        let claims = keys
            .verify(bearer.token())
            .map_err(|_| ApiError::unauthorized("Invalid or expired token."))?;

        Ok(CurrentUser {
            id: Id::new(claims.sub),
            is_staff: claims.staff,
        })
    }
}

/// An authenticated caller that also holds the staff role. Rejection is a
/// 403, distinct from the 401 of a missing credential.
#[derive(Debug, Clone, Copy)]
pub struct StaffUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for StaffUser
where
    S: Send + Sync,
    AuthKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_staff {
            return Err(ApiError::forbidden());
        }
        Ok(StaffUser(user))
    }
}
