//! Webhook signature verification.
//!
//! Messenger signs every delivery with HMAC-SHA256 over the raw request
//! body, keyed with the app secret, and sends the hex digest in the
//! `X-Hub-Signature-256` header as `sha256=<hex>`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Verifies webhook deliveries against the app secret.
///
/// Without a secret every delivery is accepted. That mode exists for local
/// testing only and is logged loudly.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Option<String>,
}

impl SignatureVerifier {
    /// Creates a verifier. An empty secret counts as no secret.
    #[must_use]
    pub fn new(secret: Option<String>) -> Self {
        let secret = secret.filter(|s| !s.is_empty());
        if secret.is_none() {
            tracing::warn!(
                "APP_SECRET not set, webhook signature verification is DISABLED; never run like this in production"
            );
        }
        Self { secret }
    }

    /// Returns true if deliveries are actually checked.
    #[must_use]
    pub fn is_enforced(&self) -> bool {
        self.secret.is_some()
    }

    /// Checks `header` (the `X-Hub-Signature-256` value) against `body`.
    #[must_use]
    pub fn verify(&self, body: &[u8], header: &str) -> bool {
        let Some(secret) = self.secret.as_deref() else {
            tracing::warn!("APP_SECRET not set, skipping signature verification");
            return true;
        };

        let hex_signature = header.strip_prefix(SIGNATURE_PREFIX).unwrap_or(header);
        let Ok(provided) = hex::decode(hex_signature) else {
            return false;
        };
        if provided.len() != 32 {
            return false;
        }

        let Some(expected) = digest(secret, body) else {
            return false;
        };
        expected.as_slice().ct_eq(provided.as_slice()).into()
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("enforced", &self.is_enforced())
            .finish()
    }
}

/// Produces the `sha256=<hex>` header value for `body`, or `None` if the
/// secret cannot key an HMAC.
#[must_use]
pub fn sign(secret: &str, body: &[u8]) -> Option<String> {
    digest(secret, body).map(|digest| format!("{SIGNATURE_PREFIX}{}", hex::encode(digest)))
}

fn digest(secret: &str, body: &[u8]) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "857b677a97ebcfbcf290e960c2dd5e48";
    const BODY: &[u8] = br#"{"object":"page","entry":[]}"#;

    fn signed(secret: &str, body: &[u8]) -> String {
        sign(secret, body).expect("sign")
    }

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(Some(SECRET.to_string()))
    }

    #[test]
    fn accepts_own_signature() {
        assert!(verifier().verify(BODY, &signed(SECRET, BODY)));
    }

    #[test]
    fn accepts_bare_hex_digest() {
        let header = signed(SECRET, BODY);
        let bare = header.trim_start_matches("sha256=");
        assert!(verifier().verify(BODY, bare));
    }

    #[test]
    fn known_vector() {
        // HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog")
        let header = signed("key", b"The quick brown fox jumps over the lazy dog");
        assert_eq!(
            header,
            "sha256=f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn any_body_bit_flip_fails() {
        let header = signed(SECRET, BODY);
        let verifier = verifier();
        for byte in 0..BODY.len() {
            for bit in 0..8 {
                let mut tampered = BODY.to_vec();
                tampered[byte] ^= 1 << bit;
                assert!(
                    !verifier.verify(&tampered, &header),
                    "flip of bit {bit} in byte {byte} was accepted"
                );
            }
        }
    }

    #[test]
    fn any_signature_bit_flip_fails() {
        let header = signed(SECRET, BODY);
        let digest = hex::decode(header.trim_start_matches("sha256=")).expect("hex");
        let verifier = verifier();
        for byte in 0..digest.len() {
            for bit in 0..8 {
                let mut tampered = digest.clone();
                tampered[byte] ^= 1 << bit;
                let header = format!("sha256={}", hex::encode(&tampered));
                assert!(!verifier.verify(BODY, &header));
            }
        }
    }

    #[test]
    fn wrong_secret_fails() {
        assert!(!verifier().verify(BODY, &signed("other-secret", BODY)));
    }

    #[test]
    fn malformed_headers_fail() {
        let verifier = verifier();
        assert!(!verifier.verify(BODY, ""));
        assert!(!verifier.verify(BODY, "sha256="));
        assert!(!verifier.verify(BODY, "sha256=not-hex"));
        assert!(!verifier.verify(BODY, "sha256=abcd"));
    }

    #[test]
    fn missing_secret_skips_verification() {
        let verifier = SignatureVerifier::new(None);
        assert!(!verifier.is_enforced());
        assert!(verifier.verify(BODY, ""));

        let empty = SignatureVerifier::new(Some(String::new()));
        assert!(!empty.is_enforced());
        assert!(empty.verify(BODY, "sha256=garbage"));
    }

    #[test]
    fn empty_secret_still_signs() {
        // HMAC pads short keys, so even an empty key produces a digest.
        let header = sign("", BODY).expect("sign");
        assert!(header.starts_with("sha256="));
        assert_eq!(header.len(), "sha256=".len() + 64);
    }

    #[test]
    fn debug_hides_secret() {
        let debug = format!("{:?}", verifier());
        assert!(!debug.contains(SECRET));
    }
}
