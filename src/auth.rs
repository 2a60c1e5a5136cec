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
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::config::ClientIdentity;
use crate::error::{InvalidCredentialsSnafu, Result};
use crate::token::TokenService;

/// `token_type` of every successful token response.
pub const BEARER: &str = "Bearer";

/// Lookup of registered clients by id.
pub trait ClientStore: Send + Sync {
    fn find_by_id(&self, client_id: &str) -> Option<ClientIdentity>;
}

/// Store holding exactly one registered client.
#[derive(Debug, Clone)]
pub struct StaticClientStore {
    identity: ClientIdentity,
}

impl StaticClientStore {
    pub fn new(identity: ClientIdentity) -> Self {
        Self { identity }
    }
}

impl ClientStore for StaticClientStore {
    fn find_by_id(&self, client_id: &str) -> Option<ClientIdentity> {
        (self.identity.client_id() == client_id).then(|| self.identity.clone())
    }
}

/// Successful client-credentials response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Exchanges client credentials for an access token.
pub struct Authenticator {
    store: Arc<dyn ClientStore>,
    tokens: Arc<TokenService>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn ClientStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Check the presented pair and issue a token on a match.
    ///
    /// An unknown id and a wrong secret fail the same way.
    pub fn authenticate(
        &self,
        client_id: &str,
        client_secret: &str,
        scope: Option<&str>,
    ) -> Result<TokenResponse> {
        let matched = self
            .store
            .find_by_id(client_id)
            .is_some_and(|identity| secrets_match(client_secret, identity.client_secret()));

        if !matched {
            warn!(client_id, "client authentication failed");
            return InvalidCredentialsSnafu.fail();
        }

        let scope = scope.filter(|s| !s.is_empty());
        let access_token = self.tokens.issue(client_id, scope)?;
        info!(client_id, scope = scope.unwrap_or(""), "client authenticated");

        Ok(TokenResponse {
            access_token,
            token_type: BEARER.to_string(),
            expires_in: self.tokens.config().lifetime_secs(),
            scope: scope.map(str::to_owned),
        })
    }
}

/// Constant-time secret comparison over fixed-size digests, so neither the
/// position of the first mismatch nor the secret length shows in the timing.
fn secrets_match(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    presented.as_slice().ct_eq(expected.as_slice()).into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tests::{
        FixedClock, TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_LIFETIME_MINUTES, TEST_NOW,
        test_authenticator, test_identity, test_service,
    };
    use std::collections::HashMap;

    #[test]
    fn test_authenticate_success() {
        let clock = FixedClock::new(TEST_NOW);
        let authenticator = test_authenticator(&clock);

        let response = authenticator
            .authenticate(TEST_CLIENT_ID, TEST_CLIENT_SECRET, None)
            .expect("valid credentials");

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, i64::from(TEST_LIFETIME_MINUTES) * 60);
        assert_eq!(response.scope, None);

        let claims = authenticator
            .tokens()
            .validate(&response.access_token)
            .expect("issued token validates");
        assert_eq!(claims.subject, TEST_CLIENT_ID);
        assert_eq!(claims.client_id, TEST_CLIENT_ID);
        assert_eq!(claims.scope, None);
    }

    #[test]
    fn test_authenticate_echoes_scope() {
        let clock = FixedClock::new(TEST_NOW);
        let authenticator = test_authenticator(&clock);

        let response = authenticator
            .authenticate(TEST_CLIENT_ID, TEST_CLIENT_SECRET, Some("read write"))
            .expect("valid credentials");
        assert_eq!(response.scope.as_deref(), Some("read write"));

        let claims = authenticator
            .tokens()
            .validate(&response.access_token)
            .expect("issued token validates");
        assert_eq!(claims.scope.as_deref(), Some("read write"));
    }

    #[test]
    fn test_authenticate_empty_scope_is_absent() {
        let clock = FixedClock::new(TEST_NOW);
        let response = test_authenticator(&clock)
            .authenticate(TEST_CLIENT_ID, TEST_CLIENT_SECRET, Some(""))
            .expect("valid credentials");
        assert_eq!(response.scope, None);
    }

    #[test]
    fn test_authenticate_rejects_every_wrong_pair() {
        let clock = FixedClock::new(TEST_NOW);
        let authenticator = test_authenticator(&clock);

        let cases = [
            (TEST_CLIENT_ID, "wrong-secret"),
            ("wrong-client", TEST_CLIENT_SECRET),
            ("wrong-client", "wrong-secret"),
            (TEST_CLIENT_ID, ""),
            ("", TEST_CLIENT_SECRET),
            (TEST_CLIENT_ID, "reporting-service-secret "),
            ("REPORTING-SERVICE", TEST_CLIENT_SECRET),
        ];

        for (client_id, client_secret) in cases {
            let result = authenticator.authenticate(client_id, client_secret, Some("read"));
            assert!(
                matches!(result, Err(Error::InvalidCredentials)),
                "({client_id:?}, {client_secret:?}) should be rejected"
            );
        }
    }

    #[test]
    fn test_static_store_lookup() {
        let store = StaticClientStore::new(test_identity());
        assert_eq!(store.find_by_id(TEST_CLIENT_ID), Some(test_identity()));
        assert_eq!(store.find_by_id("someone-else"), None);
    }

    struct MapStore(HashMap<String, ClientIdentity>);

    impl ClientStore for MapStore {
        fn find_by_id(&self, client_id: &str) -> Option<ClientIdentity> {
            self.0.get(client_id).cloned()
        }
    }

    #[test]
    fn test_authenticate_with_multi_client_store() {
        let clock = FixedClock::new(TEST_NOW);
        let clients = ["billing", "inventory"]
            .into_iter()
            .map(|id| {
                let identity =
                    ClientIdentity::new(id, format!("{id}-secret")).expect("valid identity");
                (id.to_string(), identity)
            })
            .collect();
        let authenticator =
            Authenticator::new(Arc::new(MapStore(clients)), Arc::new(test_service(&clock)));

        let response = authenticator
            .authenticate("inventory", "inventory-secret", None)
            .expect("registered client");
        let claims = authenticator
            .tokens()
            .validate(&response.access_token)
            .expect("validates");
        assert_eq!(claims.subject, "inventory");

        assert!(matches!(
            authenticator.authenticate("inventory", "billing-secret", None),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn test_secrets_match() {
        assert!(secrets_match("abc", "abc"));
        assert!(!secrets_match("abc", "abd"));
        assert!(!secrets_match("abc", "abcd"));
        assert!(!secrets_match("", "abc"));
    }

    #[test]
    fn test_token_response_wire_shape() {
        let response = TokenResponse {
            access_token: "a.b.c".to_string(),
            token_type: BEARER.to_string(),
            expires_in: 3600,
            scope: None,
        };
        let value = serde_json::to_value(&response).expect("serialize");
        assert_eq!(value["token_type"], "Bearer");
        assert_eq!(value["expires_in"], 3600);
        assert!(value.get("scope").is_none());
    }
}
