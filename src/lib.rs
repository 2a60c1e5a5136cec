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

use crate::api::state::AppState;
use crate::auth::{Authenticator, StaticClientStore};
use crate::config::{ClientIdentity, SigningConfig};
use crate::token::{ClaimSet, TokenService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod token;


pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();
}

/// Wire the token core and serve it over HTTP.
pub async fn run(
    port: u16,
    signing: SigningConfig,
    client: ClientIdentity,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        issuer = signing.issuer(),
        audience = signing.audience(),
        lifetime_minutes = signing.lifetime_minutes(),
        client_id = client.client_id(),
        "starting tokengate"
    );

    let tokens = Arc::new(TokenService::new(Arc::new(signing)));
    let authenticator = Authenticator::new(Arc::new(StaticClientStore::new(client)), tokens);

    api::server::run(port, AppState::new(authenticator)).await
}

/// Validate `token` offline and render its claims as YAML.
pub fn inspect(signing: SigningConfig, token: &str) -> Result<String, Box<dyn std::error::Error>> {
    let claims: ClaimSet = TokenService::new(Arc::new(signing)).validate(token)?;
    Ok(serde_yaml_ng::to_string(&claims)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod inspect_tests {
    use super::*;
    use crate::tests::{TEST_AUDIENCE, TEST_ISSUER, TEST_LIFETIME_MINUTES, TEST_SECRET};

    fn signing() -> SigningConfig {
        SigningConfig::new(TEST_SECRET, TEST_ISSUER, TEST_AUDIENCE, TEST_LIFETIME_MINUTES)
            .expect("valid config")
    }

    #[test]
    fn test_inspect_renders_claims() {
        let token = TokenService::new(Arc::new(signing()))
            .issue("reporting-service", Some("read"))
            .expect("issue");

        let yaml = inspect(signing(), &token).expect("fresh token inspects");
        assert!(yaml.contains("sub: reporting-service"));
        assert!(yaml.contains("scope: read"));
        assert!(yaml.contains("token_type: access_token"));
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        assert!(inspect(signing(), "not-a-token").is_err());
    }
}
