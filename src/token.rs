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

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use jsonwebtoken::{Algorithm, EncodingKey, Header, crypto};
use serde::de::DeserializeOwned;
use snafu::{ResultExt, ensure};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::info;

use crate::config::SigningConfig;
use crate::error::{
    BadSignatureSnafu, EmptySubjectSnafu, EncodeSnafu, ExpiredOrNotYetValidSnafu, MalformedSnafu,
    Result, WrongIssuerOrAudienceSnafu,
};

mod claims;
mod clock;

pub use claims::{ClaimSet, TokenType};
pub use clock::{Clock, SystemClock};

const ALGORITHM: Algorithm = Algorithm::HS256;

// Unpadded base64url. Trailing bits are tolerated so a tampered signature
// segment is reported by the signature comparison, not by the decoder.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// Issues and validates HS256 access tokens.
///
/// Holds nothing but the immutable signing configuration and a clock, so a
/// single instance can be shared across all request handlers.
pub struct TokenService {
    config: Arc<SigningConfig>,
    clock: Arc<dyn Clock>,
    encoding_key: EncodingKey,
}

impl TokenService {
    pub fn new(config: Arc<SigningConfig>) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Arc<SigningConfig>, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret());
        Self {
            config,
            clock,
            encoding_key,
        }
    }

    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// Mint a token for `subject`.
    ///
    /// An empty `scope` is treated as absent.
    pub fn issue(&self, subject: &str, scope: Option<&str>) -> Result<String> {
        ensure!(!subject.is_empty(), EmptySubjectSnafu);

        let claims = ClaimSet::new(subject, scope, &self.config, self.clock.now());
        let token = jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .context(EncodeSnafu)?;

        info!(
            subject = %claims.subject,
            token_id = %claims.token_id,
            expires_at = claims.expires_at,
            "access token issued"
        );

        Ok(token)
    }

    /// Verify `token` and return its claims.
    ///
    /// Checks run in a fixed order and stop at the first failure: structure,
    /// signature, issuer/audience, then the `[iat, exp)` window.
    pub fn validate(&self, token: &str) -> Result<ClaimSet> {
        let segments = Segments::parse(token)?;

        self.verify_signature(segments.signing_input, segments.signature)?;

        let header: Header = decode_json("header", &segments.header)?;
        ensure!(header.alg == ALGORITHM, BadSignatureSnafu);

        let claims: ClaimSet = decode_json("payload", &segments.payload)?;

        ensure!(
            claims.issuer == self.config.issuer() && claims.audience == self.config.audience(),
            WrongIssuerOrAudienceSnafu
        );

        let now = self.clock.now();
        ensure!(
            claims.is_valid_at(now),
            ExpiredOrNotYetValidSnafu {
                now,
                issued_at: claims.issued_at,
                expires_at: claims.expires_at,
            }
        );

        Ok(claims)
    }

    fn verify_signature(&self, signing_input: &str, signature: &str) -> Result<()> {
        let expected = crypto::sign(signing_input.as_bytes(), &self.encoding_key, ALGORITHM)
            .context(EncodeSnafu)?;

        ensure!(
            bool::from(expected.as_bytes().ct_eq(signature.as_bytes())),
            BadSignatureSnafu
        );
        Ok(())
    }
}

/// A token split into its three segments, header and payload already decoded.
struct Segments<'a> {
    signing_input: &'a str,
    signature: &'a str,
    header: Vec<u8>,
    payload: Vec<u8>,
}

impl<'a> Segments<'a> {
    fn parse(token: &'a str) -> Result<Self> {
        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return MalformedSnafu {
                reason: "expected three dot-separated segments",
            }
            .fail();
        };

        let header = decode_segment("header", header)?;
        let payload = decode_segment("payload", payload)?;
        decode_segment("signature", signature)?;

        // header.payload, without the trailing '.' and signature
        let signing_input = &token[..token.len() - signature.len() - 1];

        Ok(Self {
            signing_input,
            signature,
            header,
            payload,
        })
    }
}

fn decode_segment(name: &str, segment: &str) -> Result<Vec<u8>> {
    ensure!(
        !segment.is_empty(),
        MalformedSnafu {
            reason: format!("empty {name} segment"),
        }
    );

    SEGMENT_ENGINE.decode(segment).map_err(|e| {
        MalformedSnafu {
            reason: format!("{name} segment is not base64url: {e}"),
        }
        .build()
    })
}

fn decode_json<T: DeserializeOwned>(name: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        MalformedSnafu {
            reason: format!("invalid {name} JSON: {e}"),
        }
        .build()
    })
}
