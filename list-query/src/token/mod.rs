//! Opaque, tamper-evident cursor tokens.
//!
//! A token is `base64url(payload) + "." + base64url(signature)` where the
//! payload is the JSON-serialized [`CursorClaims`] and the signature is an
//! HMAC-SHA256 over the payload bytes, keyed with a server-held secret.
//!
//! # Security Note
//!
//! Tokens are tamper-evident, **not encrypted**. The payload is visible to
//! anyone who base64-decodes it, so it must never carry secrets - only the
//! key values needed to locate a page boundary. The MAC is what prevents
//! clients from constructing arbitrary scan positions or probing the shape
//! of the sort key, without requiring any server-side cursor state.

mod claims;
mod signer;

pub use claims::{CursorBound, CursorClaims};
pub use signer::CursorSigner;
