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

use axum::http::{Method, header};
use axum::{Router, http::StatusCode, middleware, response::IntoResponse, routing::get};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{handlers, routes, state::AppState};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::issue_token,
        handlers::auth::session_check,
        health_check,
        ready_check,
    ),
    components(schemas(
        crate::api::models::auth::TokenRequest,
        crate::api::models::auth::SessionResponse,
        crate::api::error::ErrorResponse,
        crate::auth::TokenResponse,
    )),
    tags((name = "auth", description = "Client-credentials authentication"))
)]
pub struct ApiDoc;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // health checks (no auth)
        .route("/healthz", get(health_check))
        .route("/readyz", get(ready_check))
        .nest("/api/v1", api_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::api::middleware::auth::auth_middleware,
        ))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // layers apply from the inside out
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
}

/// Start the HTTP server
pub async fn run(port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("tokengate listening on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  - POST /api/v1/token");
    tracing::info!("  - GET  /api/v1/session");
    tracing::info!("  - GET  /swagger-ui");

    axum::serve(listener, app).await?;

    Ok(())
}

fn api_routes() -> Router<AppState> {
    Router::new().merge(routes::auth_routes())
}

#[utoipa::path(get, path = "/healthz", responses((status = 200, description = "Health check OK")))]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[utoipa::path(get, path = "/readyz", responses((status = 200, description = "Ready")))]
async fn ready_check() -> impl IntoResponse {
    // no external dependencies to wait for
    (StatusCode::OK, "Ready")
}
