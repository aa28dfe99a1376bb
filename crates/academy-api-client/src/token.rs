//! Bearer tokens from the identity provider.
//!
//! The provider itself (sign-in, sessions, token signing) is external. The
//! client only needs "give me a token or nothing, asynchronously", plus the
//! role claim the provider embeds in the token's metadata.

use academy_core::{IdentityState, Role};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

/// Source of short-lived bearer tokens for the signed-in principal.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` when nobody is signed in.
    async fn token(&self) -> Option<String>;
}

/// Fixed token, e.g. from `ACADEMY_API_TOKEN`.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Option<String> {
        Some(self.0.clone()).filter(|t| !t.is_empty())
    }
}

/// Claims read from an identity-provider JWT. The signature is not checked;
/// the backend does that. Only used to find a fallback role claim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityClaims {
    pub role: Option<Role>,
}

impl IdentityClaims {
    /// Decode the payload segment of a JWT. Returns `None` for anything that
    /// is not a three-part token with a JSON object payload.
    pub fn from_jwt(token: &str) -> Option<Self> {
        let mut parts = token.split('.');
        let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }

        let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: Value = serde_json::from_slice(&decoded).ok()?;
        let claims = claims.as_object()?;

        let role = ["public_metadata", "publicMetadata", "metadata"]
            .iter()
            .filter_map(|key| claims.get(*key))
            .filter_map(|metadata| metadata.get("role"))
            .chain(claims.get("role"))
            .filter_map(Value::as_str)
            .find_map(|raw| raw.parse::<Role>().ok());

        Some(Self { role })
    }

    /// Identity state for the role gate, given the token currently in hand.
    /// Opaque (non-JWT) tokens still count as signed in, just without a claim.
    pub fn identity_state(token: Option<&str>) -> IdentityState {
        match token.filter(|t| !t.trim().is_empty()) {
            None => IdentityState::SignedOut,
            Some(token) => IdentityState::SignedIn {
                role_claim: Self::from_jwt(token).and_then(|claims| claims.role),
            },
        }
    }
}
