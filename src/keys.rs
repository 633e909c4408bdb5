use ed25519_dalek::SigningKey;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::{Result, SolanaAgentChatError};

pub const KEYPAIR_LEN: usize = 64;
const SEED_LEN: usize = 32;

const INVALID_LENGTH: &str =
    "Invalid private key length. Please provide a valid Solana private key.";
const INVALID_FORMAT: &str =
    "Invalid private key format. Please provide a valid base58 encoded private key.";

/// A Solana keypair secret: 32-byte seed followed by the 32-byte public key.
pub struct PrivateKey {
    bytes: [u8; KEYPAIR_LEN],
}

impl PrivateKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEYPAIR_LEN {
            return Err(SolanaAgentChatError::InvalidKey(INVALID_LENGTH.to_string()));
        }
        let mut out = [0u8; KEYPAIR_LEN];
        out.copy_from_slice(bytes);
        Ok(Self { bytes: out })
    }

    pub fn from_base58(encoded: &str) -> Result<Self> {
        let mut decoded = bs58::decode(encoded.trim())
            .into_vec()
            .map_err(|_| SolanaAgentChatError::InvalidKey(INVALID_FORMAT.to_string()))?;
        let key = Self::from_bytes(&decoded);
        decoded.zeroize();
        key
    }

    /// The `[12, 250, ...]` form written by `solana-keygen` and wallet exports.
    pub fn from_json_array(raw: &str) -> Result<Self> {
        let mut decoded: Vec<u8> = serde_json::from_str(raw.trim())
            .map_err(|_| SolanaAgentChatError::InvalidKey(INVALID_FORMAT.to_string()))?;
        let key = Self::from_bytes(&decoded);
        decoded.zeroize();
        key
    }

    /// Accepts either the JSON array or the base58 form.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim_start().starts_with('[') {
            Self::from_json_array(raw)
        } else {
            Self::from_base58(raw)
        }
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(&self.bytes).into_string()
    }

    pub fn to_json_array(&self) -> String {
        serde_json::to_string(&self.bytes.to_vec()).unwrap_or_default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn wallet_address(&self) -> Result<String> {
        let mut seed = [0u8; SEED_LEN];
        seed.copy_from_slice(&self.bytes[..SEED_LEN]);
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();

        let public = signing_key.verifying_key().to_bytes();
        if public[..] != self.bytes[SEED_LEN..] {
            return Err(SolanaAgentChatError::InvalidKey(
                "Private key does not match its public key half.".to_string(),
            ));
        }
        Ok(bs58::encode(public).into_string())
    }
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        Self { bytes: self.bytes }
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey").field("bytes", &"<redacted>").finish()
    }
}

/// Non-secret identifier for a raw key string, safe to log and to key caches by.
pub fn session_id(raw_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_key.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
pub(crate) fn keypair_from_seed(seed: [u8; SEED_LEN]) -> PrivateKey {
    let signing_key = SigningKey::from_bytes(&seed);
    let mut bytes = [0u8; KEYPAIR_LEN];
    bytes[..SEED_LEN].copy_from_slice(&seed);
    bytes[SEED_LEN..].copy_from_slice(&signing_key.verifying_key().to_bytes());
    PrivateKey { bytes }
}
