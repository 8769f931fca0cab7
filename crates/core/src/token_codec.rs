// Symmetric token sealing with key rotation support.
// Uses AES-256-GCM with a fresh random nonce per message, hex-encoded for transport.
//
// Wire layout before hex encoding:
//   version (1 byte) | nonce (12 bytes) | ciphertext + auth tag
//
// Keys are supplied as "key_id:base64_key". The primary key seals new tokens;
// previous keys stay accepted for opening until they are retired.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use crate::error::TokenError;

const NONCE_SIZE: usize = 12;
const KEY_SIZE: usize = 32;
const TAG_SIZE: usize = 16;
const TOKEN_VERSION: u8 = 1;

/// The only supported algorithm identifier.
pub const ALGORITHM: &str = "AES-256-GCM";

#[derive(Clone)]
struct VersionedKey {
    id: String,
    cipher: Aes256Gcm,
}

/// Seals and opens arbitrary serializable payloads as opaque hex strings.
/// Immutable after construction and cheap to clone.
#[derive(Clone)]
pub struct TokenCodec {
    /// Key used for new tokens
    primary: Arc<VersionedKey>,
    /// Retired keys still accepted when opening
    previous: Arc<Vec<VersionedKey>>,
}

impl TokenCodec {
    /// Create from versioned key strings in format "key_id:base64_key".
    pub fn new(primary_key: &str, previous_keys: &[&str]) -> Result<Self, TokenError> {
        let primary = Self::parse_versioned_key(primary_key)?;

        let mut previous = Vec::with_capacity(previous_keys.len());
        for key_str in previous_keys {
            let key = Self::parse_versioned_key(key_str)?;
            if key.id == primary.id || previous.iter().any(|k: &VersionedKey| k.id == key.id) {
                return Err(TokenError::config(format!("duplicate key ID: {}", key.id)));
            }
            previous.push(key);
        }

        Ok(Self {
            primary: Arc::new(primary),
            previous: Arc::new(previous),
        })
    }

    /// Create after checking the configured algorithm identifier.
    pub fn with_algorithm(
        algorithm: &str,
        primary_key: &str,
        previous_keys: &[&str],
    ) -> Result<Self, TokenError> {
        if !algorithm.eq_ignore_ascii_case(ALGORITHM) {
            return Err(TokenError::config(format!(
                "unsupported algorithm: {} (expected {})",
                algorithm, ALGORITHM
            )));
        }
        Self::new(primary_key, previous_keys)
    }

    fn parse_versioned_key(key_str: &str) -> Result<VersionedKey, TokenError> {
        let (key_id, encoded) = key_str.split_once(':').ok_or_else(|| {
            TokenError::config("invalid key format, expected 'key_id:base64_key'")
        })?;

        if key_id.is_empty() {
            return Err(TokenError::config("key ID must not be empty"));
        }

        let key_bytes = BASE64
            .decode(encoded)
            .map_err(|e| TokenError::config(format!("key '{}' is not base64: {}", key_id, e)))?;

        if key_bytes.len() != KEY_SIZE {
            return Err(TokenError::config(format!(
                "key must be {} bytes, got {} bytes for key_id '{}'",
                KEY_SIZE,
                key_bytes.len(),
                key_id
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(&key_bytes)
            .map_err(|e| TokenError::config(format!("key '{}': {}", key_id, e)))?;

        Ok(VersionedKey {
            id: key_id.to_string(),
            cipher,
        })
    }

    /// Seal raw bytes, returning the hex-encoded token.
    pub fn seal(&self, plaintext: &[u8]) -> Result<String, TokenError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .primary
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| TokenError::Encrypt(e.to_string()))?;

        let mut sealed = Vec::with_capacity(1 + NONCE_SIZE + ciphertext.len());
        sealed.push(TOKEN_VERSION);
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(hex::encode(sealed))
    }

    /// Open a hex-encoded token, trying the primary key first.
    pub fn open(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        let sealed = hex::decode(token.trim())
            .map_err(|e| TokenError::decode(format!("malformed hex: {}", e)))?;

        if sealed.len() < 1 + NONCE_SIZE + TAG_SIZE {
            return Err(TokenError::decode("token too short"));
        }

        if sealed[0] != TOKEN_VERSION {
            return Err(TokenError::decode(format!(
                "unsupported token version: {} (expected {})",
                sealed[0], TOKEN_VERSION
            )));
        }

        let (nonce_bytes, ciphertext) = sealed[1..].split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        std::iter::once(self.primary.as_ref())
            .chain(self.previous.iter())
            .find_map(|key| key.cipher.decrypt(nonce, ciphertext).ok())
            .ok_or_else(|| TokenError::decode("authentication failed (wrong key or corrupted token)"))
    }

    /// Serialize a payload to JSON and seal it.
    pub fn encrypt_payload<T: Serialize>(&self, payload: &T) -> Result<String, TokenError> {
        let json = serde_json::to_vec(payload)
            .map_err(|e| TokenError::Encrypt(format!("failed to serialize payload: {}", e)))?;
        self.seal(&json)
    }

    /// Open a token and deserialize its JSON payload.
    pub fn decrypt_payload<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let json = self.open(token)?;
        serde_json::from_slice(&json)
            .map_err(|e| TokenError::decode(format!("invalid payload: {}", e)))
    }

    /// Get the primary key ID.
    pub fn primary_key_id(&self) -> &str {
        &self.primary.id
    }

    /// Get all key IDs accepted for opening, primary first.
    pub fn available_key_ids(&self) -> Vec<&str> {
        std::iter::once(self.primary.id.as_str())
            .chain(self.previous.iter().map(|k| k.id.as_str()))
            .collect()
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("primary_key_id", &self.primary.id)
            .field("previous_key_ids", &self.previous.iter().map(|k| &k.id).collect::<Vec<_>>())
            .finish()
    }
}

/// Generate a new random key in versioned format "key_id:base64_key".
pub fn generate_token_key(key_id: &str) -> String {
    let mut key = [0u8; KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut key);
    format!("{}:{}", key_id, BASE64.encode(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codec(id: &str) -> TokenCodec {
        TokenCodec::new(&generate_token_key(id), &[]).unwrap()
    }

    /// Replace one hex character with a different hex character.
    fn corrupt_at(token: &str, idx: usize) -> String {
        let mut chars: Vec<char> = token.chars().collect();
        chars[idx] = if chars[idx] == 'a' { 'b' } else { 'a' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_round_trip() {
        let codec = codec("tok-v1");
        let payload = json!({"id": "42", "email": "john@example.com", "nested": {"n": [1, 2, 3]}});

        let token = codec.encrypt_payload(&payload).unwrap();
        let decoded: serde_json::Value = codec.decrypt_payload(&token).unwrap();

        assert_eq!(decoded, payload);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_same_plaintext_different_tokens() {
        let codec = codec("tok-v1");
        let payload = json!({"same": true});

        let token1 = codec.encrypt_payload(&payload).unwrap();
        let token2 = codec.encrypt_payload(&payload).unwrap();

        // Random nonce per message
        assert_ne!(token1, token2);
        assert_eq!(codec.decrypt_payload::<serde_json::Value>(&token1).unwrap(), payload);
        assert_eq!(codec.decrypt_payload::<serde_json::Value>(&token2).unwrap(), payload);
    }

    #[test]
    fn test_single_corrupted_character_fails() {
        let codec = codec("tok-v1");
        let token = codec.encrypt_payload(&json!({"role": "admin"})).unwrap();

        // Version byte, nonce, ciphertext body and tag
        for idx in [1, 5, 30, token.len() / 2, token.len() - 1] {
            let corrupted = corrupt_at(&token, idx);
            let result = codec.decrypt_payload::<serde_json::Value>(&corrupted);
            assert!(
                matches!(result, Err(TokenError::Decode(_))),
                "corruption at {} must fail to decode",
                idx
            );
        }
    }

    #[test]
    fn test_malformed_input() {
        let codec = codec("tok-v1");
        let short = "0".repeat(20);
        for bad in ["", "zz", "abc", "00", short.as_str()] {
            assert!(matches!(codec.open(bad), Err(TokenError::Decode(_))));
        }
    }

    #[test]
    fn test_wrong_key_fails() {
        let token = codec("tok-v1").encrypt_payload(&json!({"x": 1})).unwrap();
        let result = codec("tok-v1").decrypt_payload::<serde_json::Value>(&token);
        assert!(matches!(result, Err(TokenError::Decode(_))));
    }

    #[test]
    fn test_key_rotation() {
        let key_v1 = generate_token_key("tok-v1");
        let key_v2 = generate_token_key("tok-v2");

        let old = TokenCodec::new(&key_v1, &[]).unwrap();
        let token = old.encrypt_payload(&json!({"v": 1})).unwrap();

        let rotated = TokenCodec::new(&key_v2, &[&key_v1]).unwrap();
        assert_eq!(rotated.primary_key_id(), "tok-v2");
        assert_eq!(rotated.available_key_ids(), vec!["tok-v2", "tok-v1"]);

        let decoded: serde_json::Value = rotated.decrypt_payload(&token).unwrap();
        assert_eq!(decoded, json!({"v": 1}));

        // Tokens from the rotated codec are not readable with only the retired key
        let fresh = rotated.encrypt_payload(&json!({"v": 2})).unwrap();
        assert!(old.open(&fresh).is_err());
    }

    #[test]
    fn test_invalid_key_format() {
        assert!(TokenCodec::new("no-colon-here", &[]).is_err());
        assert!(TokenCodec::new("tok-v1:not-valid-base64!!!", &[]).is_err());
        let short_key = format!("tok-v1:{}", BASE64.encode([0u8; 16]));
        assert!(TokenCodec::new(&short_key, &[]).is_err());
        let no_id = format!(":{}", BASE64.encode([0u8; 32]));
        assert!(TokenCodec::new(&no_id, &[]).is_err());
    }

    #[test]
    fn test_duplicate_key_id() {
        let key1 = generate_token_key("tok-v1");
        let key2 = generate_token_key("tok-v1");
        assert!(matches!(
            TokenCodec::new(&key1, &[&key2]),
            Err(TokenError::Config(_))
        ));
    }

    #[test]
    fn test_algorithm_check() {
        let key = generate_token_key("tok-v1");
        assert!(TokenCodec::with_algorithm("AES-256-GCM", &key, &[]).is_ok());
        assert!(TokenCodec::with_algorithm("aes-256-gcm", &key, &[]).is_ok());
        assert!(matches!(
            TokenCodec::with_algorithm("aes-256-cbc", &key, &[]),
            Err(TokenError::Config(_))
        ));
    }

    #[test]
    fn test_debug_does_not_leak_key_material() {
        let key = generate_token_key("tok-v1");
        let codec = TokenCodec::new(&key, &[]).unwrap();
        let secret = key.split_once(':').unwrap().1;
        assert!(!format!("{:?}", codec).contains(secret));
    }
}
