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

use clap::Args;
use snafu::{Snafu, ensure};
use std::fmt;
use tracing::warn;

/// Secrets shorter than this are accepted but logged as weak.
pub const MIN_RECOMMENDED_SECRET_LEN: usize = 32;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("signing secret must not be empty"))]
    EmptySecret,

    #[snafu(display("{} must not be empty", field))]
    EmptyClaim { field: String },

    #[snafu(display("token lifetime must be a positive number of minutes (got {})", minutes))]
    InvalidLifetime { minutes: u32 },

    #[snafu(display("client {} must not be empty", field))]
    EmptyClientCredential { field: String },
}

/// Key material and claim constants used to sign and verify tokens.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct SigningConfig {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
    lifetime_minutes: u32,
}

impl SigningConfig {
    pub fn new(
        secret: impl Into<Vec<u8>>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        lifetime_minutes: u32,
    ) -> Result<Self, Error> {
        let secret = secret.into();
        let issuer = issuer.into();
        let audience = audience.into();

        ensure!(!secret.is_empty(), EmptySecretSnafu);
        ensure!(!issuer.is_empty(), EmptyClaimSnafu { field: "issuer" });
        ensure!(!audience.is_empty(), EmptyClaimSnafu { field: "audience" });
        ensure!(
            lifetime_minutes > 0,
            InvalidLifetimeSnafu {
                minutes: lifetime_minutes
            }
        );

        if secret.len() < MIN_RECOMMENDED_SECRET_LEN {
            warn!(
                "signing secret is {} bytes, at least {} bytes are recommended for HS256",
                secret.len(),
                MIN_RECOMMENDED_SECRET_LEN
            );
        }

        Ok(Self {
            secret,
            issuer,
            audience,
            lifetime_minutes,
        })
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn lifetime_minutes(&self) -> u32 {
        self.lifetime_minutes
    }

    /// Token lifetime in seconds, as carried by `expires_in`.
    pub fn lifetime_secs(&self) -> i64 {
        i64::from(self.lifetime_minutes) * 60
    }
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime_minutes", &self.lifetime_minutes)
            .finish()
    }
}

/// A registered client application.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    client_id: String,
    client_secret: String,
}

impl ClientIdentity {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, Error> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        ensure!(
            !client_id.is_empty(),
            EmptyClientCredentialSnafu { field: "id" }
        );
        ensure!(
            !client_secret.is_empty(),
            EmptyClientCredentialSnafu { field: "secret" }
        );

        Ok(Self {
            client_id,
            client_secret,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Signing options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct SigningArgs {
    /// HMAC-SHA256 signing secret
    #[arg(long, env = "TOKENGATE_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Value of the `iss` claim
    #[arg(long, env = "TOKENGATE_ISSUER", default_value = "tokengate")]
    pub issuer: String,

    /// Value of the `aud` claim
    #[arg(long, env = "TOKENGATE_AUDIENCE", default_value = "tokengate-api")]
    pub audience: String,

    /// Access token lifetime in minutes
    #[arg(long, env = "TOKENGATE_EXPIRATION_MINUTES", default_value_t = 60)]
    pub expiration_minutes: u32,
}

impl SigningArgs {
    pub fn build(self) -> Result<SigningConfig, Error> {
        SigningConfig::new(
            self.jwt_secret,
            self.issuer,
            self.audience,
            self.expiration_minutes,
        )
    }
}

/// The single registered client.
#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Registered client identifier
    #[arg(long, env = "TOKENGATE_CLIENT_ID")]
    pub client_id: String,

    /// Registered client secret
    #[arg(long, env = "TOKENGATE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,
}

impl ClientArgs {
    pub fn build(self) -> Result<ClientIdentity, Error> {
        ClientIdentity::new(self.client_id, self.client_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_config_lifetime() {
        let config = SigningConfig::new("s".repeat(32), "iss", "aud", 15);
        assert!(config.is_ok());
        if let Ok(config) = config {
            assert_eq!(config.lifetime_minutes(), 15);
            assert_eq!(config.lifetime_secs(), 900);
        }
    }

    #[test]
    fn test_signing_config_rejects_invalid_values() {
        assert!(matches!(
            SigningConfig::new(Vec::<u8>::new(), "iss", "aud", 15),
            Err(Error::EmptySecret)
        ));
        assert!(matches!(
            SigningConfig::new("secret", "", "aud", 15),
            Err(Error::EmptyClaim { field }) if field == "issuer"
        ));
        assert!(matches!(
            SigningConfig::new("secret", "iss", "", 15),
            Err(Error::EmptyClaim { field }) if field == "audience"
        ));
        assert!(matches!(
            SigningConfig::new("secret", "iss", "aud", 0),
            Err(Error::InvalidLifetime { minutes: 0 })
        ));
    }

    #[test]
    fn test_short_secret_is_accepted() {
        assert!(SigningConfig::new("short", "iss", "aud", 1).is_ok());
    }

    #[test]
    fn test_client_identity_rejects_empty_fields() {
        assert!(matches!(
            ClientIdentity::new("", "secret"),
            Err(Error::EmptyClientCredential { field }) if field == "id"
        ));
        assert!(matches!(
            ClientIdentity::new("app", ""),
            Err(Error::EmptyClientCredential { field }) if field == "secret"
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let signing = format!(
            "{:?}",
            SigningConfig::new("super-secret-key", "iss", "aud", 5).ok()
        );
        assert!(!signing.contains("super-secret-key"));
        assert!(signing.contains("<redacted>"));

        let client = format!("{:?}", ClientIdentity::new("app", "hunter2").ok());
        assert!(client.contains("app"));
        assert!(!client.contains("hunter2"));
    }
}
