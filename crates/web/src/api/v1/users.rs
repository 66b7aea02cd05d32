use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use database::queries::user;
use model::{
    user::{self as user_model, User},
    WithId,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{password, CurrentUser},
    common::{ApiError, ApiJson, ApiResult},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/token", post(token))
        .route("/me", get(me))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CredentialsPayload {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    access: String,
}

async fn register(
    State(WebState { db, .. }): State<WebState>,
    ApiJson(payload): ApiJson<CredentialsPayload>,
) -> ApiResult<(StatusCode, Json<WithId<User>>)> {
    user_model::validate_credentials(&payload.email, &payload.password)?;

    let digest = password::hash_password(&payload.password);
    let created = user::insert(db.pool(), &payload.email, &digest, false).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn token(
    State(WebState { db, auth, .. }): State<WebState>,
    ApiJson(payload): ApiJson<CredentialsPayload>,
) -> ApiResult<Json<TokenResponse>> {
    let account = user::by_email(db.pool(), &payload.email).await?;
    let account = account
        .filter(|account| {
            password::verify_password(&payload.password, &account.content.password_digest)
        })
        .ok_or_else(|| {
            ApiError::unauthorized(
                "No active account found with the given credentials.",
            )
        })?;

    let access = auth
        .issue(account.id, account.content.is_staff)
        .map_err(|why| {
            tracing::error!("could not sign token: {why}");
            ApiError::internal()
        })?;
    Ok(Json(TokenResponse { access }))
}

async fn me(
    State(WebState { db, .. }): State<WebState>,
    user: CurrentUser,
) -> ApiResult<Json<WithId<User>>> {
    let account = user::get(db.pool(), user.id).await?;
    Ok(Json(account))
}
