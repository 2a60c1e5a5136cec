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

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::header;

use crate::api::{
    error::{Result, UnauthorizedSnafu},
    state::AppState,
};

/// Paths served without a bearer token.
const PUBLIC_PATHS: &[&str] = &["/healthz", "/readyz", "/api/v1/token"];
const PUBLIC_PREFIXES: &[&str] = &["/swagger-ui", "/api-docs"];

/// Bearer token middleware
///
/// Validates the `Authorization: Bearer` token and injects the resulting
/// `ClaimSet` into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let path = request.uri().path();
    if is_public(path) {
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_bearer_token)
        .ok_or_else(|| {
            UnauthorizedSnafu {
                message: "missing bearer token",
            }
            .build()
        })?;

    let claims = state.tokens().validate(token)?;

    tracing::debug!(subject = %claims.subject, token_id = %claims.token_id, "bearer token accepted");
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Extract the token from an `Authorization` header value.
fn parse_bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
