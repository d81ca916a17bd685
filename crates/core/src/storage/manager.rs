use crate::errors::CoreError;
use crate::models::ledger::Ledger;

use super::encryption::{self, KdfParams};
use super::format;

/// High-level storage operations: save/load the ledger to/from
/// encrypted bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// Encrypt and serialize a ledger to raw bytes (portable,
    /// platform-independent).
    ///
    /// Flow: Ledger → bincode → AES-256-GCM(Argon2id(password)) → FTRK bytes
    pub fn save_to_bytes(ledger: &Ledger, password: &str) -> Result<Vec<u8>, CoreError> {
        // 1. Serialize ledger to binary
        let plaintext = bincode::serialize(ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))?;

        // 2. Generate fresh salt and nonce
        let salt = encryption::generate_salt()?;
        let nonce = encryption::generate_nonce()?;

        // 3. Derive encryption key from password
        let kdf_params = KdfParams::default();
        let key = encryption::derive_key(password, &salt, &kdf_params)?;

        // 4. Encrypt
        let ciphertext = encryption::encrypt(&plaintext, &key, &nonce)?;

        // 5. Assemble file format
        let file_bytes = format::write_file(
            format::CURRENT_VERSION,
            &kdf_params,
            &salt,
            &nonce,
            &ciphertext,
        );

        Ok(file_bytes)
    }

    /// Decrypt and deserialize a ledger from raw bytes.
    ///
    /// Flow: FTRK bytes → parse header → Argon2id(password, salt) →
    /// AES-256-GCM decrypt → bincode → Ledger
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<Ledger, CoreError> {
        // 1. Parse file header
        let (header, ciphertext) = format::read_file(data)?;

        // 2. Re-derive key from password + stored salt + stored params
        let key = encryption::derive_key(password, &header.salt, &header.kdf_params)?;

        // 3. Decrypt
        let plaintext = encryption::decrypt(ciphertext, &key, &header.nonce)?;

        // 4. Deserialize
        let ledger: Ledger = bincode::deserialize(&plaintext)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize ledger: {e}")))?;

        Ok(ledger)
    }

    /// Save the ledger to an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(ledger: &Ledger, path: &str, password: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(ledger, password)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load the ledger from an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<Ledger, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes, password)
    }
}
