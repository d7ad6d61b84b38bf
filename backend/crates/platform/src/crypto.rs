//! Cryptographic Utilities
//!
//! Hashing, random tokens, and HMAC signatures used by the security layer.

use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Default length of [`generate_secure_token`] output
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a random token of `len` characters drawn from `[A-Za-z0-9]`
///
/// Characters come from the OS CSPRNG with uniform sampling.
pub fn generate_secure_token(len: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute SHA-256 and return it as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    // HMAC accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Compute HMAC-SHA256 as lowercase hex (webhook signature format)
pub fn hmac_sha256_hex(key: &[u8], data: &[u8]) -> String {
    hex::encode(hmac_sha256(key, data))
}

/// Verify a hex HMAC-SHA256 signature in constant time
///
/// Accepts an optional `sha256=` prefix as sent by most webhook producers.
pub fn verify_hmac_sha256_hex(key: &[u8], data: &[u8], signature: &str) -> bool {
    let signature = signature.trim();
    let signature = signature.strip_prefix("sha256=").unwrap_or(signature);

    let Ok(provided) = hex::decode(signature) else {
        return false;
    };

    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(data);
    mac.verify_slice(&provided).is_ok()
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        assert!(bytes.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_secure_token_charset_and_length() {
        let token = generate_secure_token(DEFAULT_TOKEN_LENGTH);
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));

        assert_eq!(generate_secure_token(0), "");
        assert_eq!(generate_secure_token(100).len(), 100);
    }

    #[test]
    fn test_secure_tokens_differ() {
        assert_ne!(generate_secure_token(32), generate_secure_token(32));
    }

    #[test]
    fn test_hmac_rfc4231_case_2() {
        let mac = hmac_sha256_hex(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            mac,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify_hmac_signature() {
        let key = b"whsec_test";
        let body = br#"{"event":"conversion.created"}"#;
        let sig = hmac_sha256_hex(key, body);

        assert!(verify_hmac_sha256_hex(key, body, &sig));
        assert!(verify_hmac_sha256_hex(key, body, &format!("sha256={sig}")));
        assert!(!verify_hmac_sha256_hex(b"other", body, &sig));
        assert!(!verify_hmac_sha256_hex(key, b"tampered", &sig));
        assert!(!verify_hmac_sha256_hex(key, body, "not-hex"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abcd", b"abcd"));
        assert!(!constant_time_eq(b"abcd", b"abce"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
