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
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::Snafu;
use utoipa::ToSchema;

use crate::error::Error as CoreError;

/// HTTP-layer error type
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Unauthorized: {}", message))]
    Unauthorized { message: String },

    #[snafu(transparent)]
    Core { source: CoreError },
}

/// Error body returned by every endpoint
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

const UNAUTHORIZED_MESSAGE: &str = "Authentication required";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Rejection details stay in the logs; every unauthenticated caller
        // gets the same body.
        let (status, error_type, message) = match &self {
            Error::Unauthorized { message } => {
                tracing::warn!("request rejected: {}", message);
                (StatusCode::UNAUTHORIZED, "Unauthorized", UNAUTHORIZED_MESSAGE)
            }
            Error::Core { source } if source.is_rejection() => {
                tracing::warn!(kind = source.kind(), "request rejected: {}", source);
                (StatusCode::UNAUTHORIZED, "Unauthorized", UNAUTHORIZED_MESSAGE)
            }
            Error::Core { source } => {
                tracing::error!("token service failure: {}", source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    "Internal server error",
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: message.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type for the HTTP layer
pub type Result<T> = std::result::Result<T, Error>;
