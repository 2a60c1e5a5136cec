// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use snafu::Snafu;

/// Failures of the authentication core.
///
/// The variant is for diagnostics only. Callers outside the trust boundary
/// must see every rejection as the same "not authenticated" outcome.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("invalid client credentials"))]
    InvalidCredentials,

    #[snafu(display("malformed token: {}", reason))]
    Malformed { reason: String },

    #[snafu(display("token signature mismatch"))]
    BadSignature,

    #[snafu(display("token issuer or audience mismatch"))]
    WrongIssuerOrAudience,

    #[snafu(display(
        "token outside its validity window (now {}, iat {}, exp {})",
        now,
        issued_at,
        expires_at
    ))]
    ExpiredOrNotYetValid {
        now: i64,
        issued_at: i64,
        expires_at: i64,
    },

    #[snafu(display("token subject must not be empty"))]
    EmptySubject,

    #[snafu(display("token signing failed: {}", source))]
    Encode { source: jsonwebtoken::errors::Error },
}

impl Error {
    /// Whether the failure was caused by what the caller presented, as opposed
    /// to a fault on our side.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Error::Encode { .. })
    }

    /// Short stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidCredentials => "invalid_credentials",
            Error::Malformed { .. } => "malformed",
            Error::BadSignature => "bad_signature",
            Error::WrongIssuerOrAudience => "wrong_issuer_or_audience",
            Error::ExpiredOrNotYetValid { .. } => "expired_or_not_yet_valid",
            Error::EmptySubject => "empty_subject",
            Error::Encode { .. } => "encode",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
