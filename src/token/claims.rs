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

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::config::SigningConfig;

/// Discriminator carried in the `token_type` claim.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum TokenType {
    #[serde(rename = "access_token")]
    #[strum(serialize = "access_token")]
    AccessToken,
}

/// Claims carried by an access token.
///
/// Produced either by issuance or by a successful validation, never edited in
/// between: the two paths round-trip every field.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ClaimSet {
    /// Authenticated client id
    #[serde(rename = "sub")]
    pub subject: String,

    /// Unique per issuance
    #[serde(rename = "jti")]
    pub token_id: String,

    /// Seconds since epoch
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Seconds since epoch, `issued_at + lifetime`
    #[serde(rename = "exp")]
    pub expires_at: i64,

    #[serde(rename = "iss")]
    pub issuer: String,

    #[serde(rename = "aud")]
    pub audience: String,

    pub client_id: String,

    pub token_type: TokenType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl ClaimSet {
    /// Build the claims for a fresh token issued to `subject` at `now`.
    pub(crate) fn new(
        subject: &str,
        scope: Option<&str>,
        config: &SigningConfig,
        now: i64,
    ) -> Self {
        Self {
            subject: subject.to_owned(),
            token_id: uuid::Uuid::new_v4().to_string(),
            issued_at: now,
            expires_at: now + config.lifetime_secs(),
            issuer: config.issuer().to_owned(),
            audience: config.audience().to_owned(),
            client_id: subject.to_owned(),
            token_type: TokenType::AccessToken,
            scope: normalize_scope(scope).map(str::to_owned),
        }
    }

    /// `iat <= now < exp`, no skew allowance.
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.issued_at <= now && now < self.expires_at
    }
}

/// An empty scope is the same as no scope.
pub(crate) fn normalize_scope(scope: Option<&str>) -> Option<&str> {
    scope.filter(|s| !s.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn config() -> SigningConfig {
        SigningConfig::new("k".repeat(32), "issuer-a", "audience-a", 30)
            .expect("valid signing config")
    }

    #[test]
    fn test_new_claim_set() {
        let claims = ClaimSet::new("reporting-app", Some("read"), &config(), 1_700_000_000);

        assert_eq!(claims.subject, "reporting-app");
        assert_eq!(claims.client_id, claims.subject);
        assert_eq!(claims.issued_at, 1_700_000_000);
        assert_eq!(claims.expires_at, 1_700_000_000 + 30 * 60);
        assert_eq!(claims.issuer, "issuer-a");
        assert_eq!(claims.audience, "audience-a");
        assert_eq!(claims.token_type, TokenType::AccessToken);
        assert_eq!(claims.scope.as_deref(), Some("read"));
        assert!(uuid::Uuid::parse_str(&claims.token_id).is_ok());
    }

    #[test]
    fn test_empty_scope_is_dropped() {
        let claims = ClaimSet::new("app", Some(""), &config(), 0);
        assert_eq!(claims.scope, None);
    }

    #[test]
    fn test_wire_names() {
        let claims = ClaimSet::new("app", None, &config(), 100);
        let value = serde_json::to_value(&claims).expect("claims serialize");
        let object = value.as_object().expect("claims are a JSON object");

        for key in ["sub", "jti", "iat", "exp", "iss", "aud", "client_id", "token_type"] {
            assert!(object.contains_key(key), "missing claim {key}");
        }
        assert!(!object.contains_key("scope"));
        assert_eq!(object["token_type"], "access_token");
        assert_eq!(object["iat"], 100);
        assert_eq!(TokenType::AccessToken.to_string(), "access_token");
    }

    #[test]
    fn test_validity_window_is_half_open() {
        let claims = ClaimSet::new("app", None, &config(), 1_000);

        assert!(!claims.is_valid_at(999));
        assert!(claims.is_valid_at(1_000));
        assert!(claims.is_valid_at(claims.expires_at - 1));
        assert!(!claims.is_valid_at(claims.expires_at));
    }
}
