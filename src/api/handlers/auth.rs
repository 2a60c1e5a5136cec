// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{Extension, Json, extract::State, http::header, response::IntoResponse};

use crate::api::{
    error::{ErrorResponse, Result},
    models::auth::{SessionResponse, TokenRequest},
    state::AppState,
};
use crate::auth::TokenResponse;
use crate::token::ClaimSet;

/// Client-credentials token endpoint
///
/// Exchanges a client id/secret pair for a signed access token.
#[utoipa::path(
    post,
    path = "/api/v1/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid client credentials", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!(client_id = %req.client_id, "Token request");

    let response = state.authenticator.authenticate(
        &req.client_id,
        &req.client_secret,
        req.scope.as_deref(),
    )?;

    // Token responses must not be cached
    let headers = [
        (header::CACHE_CONTROL, "no-store"),
        (header::PRAGMA, "no-cache"),
    ];

    Ok((headers, Json(response)))
}

/// Check the presented bearer token
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Token is valid", body = SessionResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn session_check(Extension(claims): Extension<ClaimSet>) -> Json<SessionResponse> {
    let expires_at =
        chrono::DateTime::from_timestamp(claims.expires_at, 0).map(|dt| dt.to_rfc3339());

    Json(SessionResponse {
        subject: claims.subject,
        client_id: claims.client_id,
        token_id: claims.token_id,
        scope: claims.scope,
        expires_at,
    })
}
