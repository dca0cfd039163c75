//! HMAC-SHA256 signing and verification of cursor tokens.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::claims::CursorClaims;
use crate::error::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted token size in bytes, checked before any decoding.
/// This prevents DoS via oversized cursor payloads.
const MAX_TOKEN_SIZE: usize = 4 * 1024;

/// Placeholder secret for [`CursorSigner::insecure_dev`].
const DEV_SECRET: &[u8] = b"list-query-insecure-dev-secret";

/// Produces and verifies opaque pagination tokens.
///
/// The signing secret is supplied once at process start and is read-only
/// afterwards; one signer may be shared across concurrent requests. In
/// production the secret comes from the deployment's secret source, and a
/// missing secret is a fatal startup condition.
#[derive(Clone)]
pub struct CursorSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for CursorSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorSigner")
            .field("secret", &"[redacted]")
            .finish()
    }
}

impl CursorSigner {
    /// Create a signer from a server-held secret.
    ///
    /// # Panics
    ///
    /// Panics if the secret is empty. An empty secret is a startup
    /// configuration error, never a runtime condition.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        let secret = secret.into();
        assert!(!secret.is_empty(), "cursor signing secret must not be empty");
        Self { secret }
    }

    /// Create a signer with a well-known placeholder secret.
    ///
    /// For development and tests only: every process using this
    /// constructor can forge each other's tokens. Production deployments
    /// must use [`CursorSigner::new`] with a real secret.
    #[must_use]
    pub fn insecure_dev() -> Self {
        Self::new(DEV_SECRET)
    }

    /// Seal key values into an opaque token:
    /// `base64url(payload) + "." + base64url(hmac)`, unpadded.
    ///
    /// # Panics
    ///
    /// Panics if a boundary value is a non-finite float, which has no JSON
    /// representation and cannot come out of a stored row.
    #[must_use]
    pub fn sign(&self, claims: &CursorClaims) -> String {
        #[allow(clippy::expect_used)]
        let payload =
            serde_json::to_vec(claims).expect("cursor claims serialize to JSON");
        let mac = self.mac(&payload);
        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(mac)
        )
    }

    /// Verify a token and recover the key values sealed inside it.
    ///
    /// Verification is all-or-nothing: the token is split on its last
    /// `.`, both halves are base64url-decoded, the MAC is recomputed over
    /// the payload and compared in constant time, and only then is the
    /// payload parsed. Nothing from an unverified token is ever trusted.
    ///
    /// # Errors
    ///
    /// [`TokenError`] on any structural malformation, size violation, or
    /// signature mismatch. All of them are client-input faults; the
    /// correct remedy is a fresh first page, never a retry.
    pub fn verify(&self, token: &str) -> Result<CursorClaims, TokenError> {
        if token.len() > MAX_TOKEN_SIZE {
            return Err(TokenError::TooLarge { max: MAX_TOKEN_SIZE });
        }
        let (payload_b64, sig_b64) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
        if payload_b64.is_empty() || sig_b64.is_empty() {
            return Err(TokenError::Malformed);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let sig = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.keyed_mac();
        mac.update(&payload);
        mac.verify_slice(&sig)
            .map_err(|_| TokenError::SignatureMismatch)?;

        serde_json::from_slice(&payload).map_err(|_| TokenError::InvalidPayload)
    }

    fn mac(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.keyed_mac();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    fn keyed_mac(&self) -> HmacSha256 {
        #[allow(clippy::expect_used)]
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length")
    }
}
