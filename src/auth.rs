//! Webhook signature verification.
//!
//! The provider signs each delivery body with its RSA private key and sends
//! the signature in the `verification-signature` header, base64-encoded.
//! We check it against the configured public key (SHA-256 digest, PKCS#1 v1.5).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;
use sha2::Sha256;

/// Verifies webhook delivery signatures against the provider's public key.
///
/// Fails closed: a verifier built without a key rejects every delivery, and
/// malformed input of any kind resolves to a plain `false` rather than an
/// error escaping to the caller.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: Option<VerifyingKey<Sha256>>,
}

impl SignatureVerifier {
    /// Builds a verifier from a PEM-encoded SPKI public key. Also accepts a
    /// bare base64 body (the provider distributes the key without PEM guards).
    pub fn from_pem(pem: &str) -> anyhow::Result<Self> {
        let pem = normalize_pem(pem);
        let key = RsaPublicKey::from_public_key_pem(&pem)?;
        Ok(Self {
            key: Some(VerifyingKey::new(key)),
        })
    }

    /// A verifier with no key configured. Rejects everything.
    pub fn disabled() -> Self {
        Self { key: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    /// Returns true only when `signature_b64` is a valid signature over
    /// `body` by the holder of the configured key's private half.
    pub fn verify(&self, body: &str, signature_b64: &str) -> bool {
        let Some(key) = &self.key else {
            return false;
        };
        let Ok(raw) = BASE64.decode(signature_b64.trim()) else {
            return false;
        };
        let Ok(signature) = Signature::try_from(raw.as_slice()) else {
            return false;
        };
        use rsa::signature::Verifier;
        key.verify(body.as_bytes(), &signature).is_ok()
    }
}

/// Wraps a bare base64 key body in PEM guards, re-flowing to 64-column lines
/// as the PEM parser requires. Input that already carries guards is passed
/// through untouched.
fn normalize_pem(raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains("-----BEGIN") {
        return raw.to_string();
    }
    let body: String = raw.split_whitespace().collect();
    let mut pem = String::from("-----BEGIN PUBLIC KEY-----\n");
    for chunk in body.as_bytes().chunks(64) {
        pem.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        pem.push('\n');
    }
    pem.push_str("-----END PUBLIC KEY-----\n");
    pem
}
