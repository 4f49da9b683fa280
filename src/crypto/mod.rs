//! CryptoCore — AES-256-GCM seal/open, machine-bound master key envelope,
//! per-profile key derivation.
//!
//! Design choice (spec.md §4.1): machine-binding is intentional — an
//! exfiltrated `master.key` without the machine id is unusable. PBKDF2 with
//! 100 000 iterations is the slowdown floor against brute-forcing the
//! wrapping key from a stolen envelope.
pub mod machine_id;

use crate::error::{Result, ToolboxError};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;

/// Generate a cryptographically secure random 32-byte key.
pub fn generate_key() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

/// Seal `plaintext` under `key` (AES-256-GCM). Returns `nonce ∥ ciphertext ∥ tag`.
pub fn encrypt_with_key(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.len() != KEY_LEN {
        return Err(ToolboxError::Unsupported(format!(
            "key must be {KEY_LEN} bytes, got {}",
            key.len()
        )));
    }
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| ToolboxError::Decryption("encryption failure".to_string()))?;
    tracing::trace!(plaintext_len = plaintext.len(), "sealed blob under key");

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Open a blob produced by [`encrypt_with_key`]. Fails if the blob is too
/// short, the key length is wrong, or the GCM authentication tag doesn't
/// match (wrong key or tampered ciphertext).
pub fn decrypt_with_key(blob: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.len() != KEY_LEN {
        return Err(ToolboxError::Unsupported(format!(
            "key must be {KEY_LEN} bytes, got {}",
            key.len()
        )));
    }
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(ToolboxError::Decryption(
            "ciphertext blob is too short".to_string(),
        ));
    }
    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Nonce::from_slice(nonce_bytes);
    let plaintext = cipher.decrypt(nonce, ciphertext).map_err(|_| {
        tracing::debug!("GCM authentication failed opening blob");
        ToolboxError::Decryption("authentication failed".to_string())
    })?;
    tracing::trace!(plaintext_len = plaintext.len(), "opened blob under key");
    Ok(plaintext)
}

/// Deterministic per-profile key = SHA-256(master ∥ "provider:name").
pub fn derive_profile_key(master: &[u8; KEY_LEN], provider: &str, name: &str) -> [u8; KEY_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(master);
    hasher.update(format!("{provider}:{name}").as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; KEY_LEN];
    out.copy_from_slice(&digest);
    out
}

// ── Master key envelope ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MasterKeyEnvelope {
    salt: String,
    encrypted: String,
}

fn envelope_path(base_dir: &Path) -> std::path::PathBuf {
    base_dir.join("master.key")
}

fn wrapping_key(machine_id: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut out = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(machine_id.as_bytes(), salt, PBKDF2_ITERATIONS, &mut out);
    out
}

/// Load the master key from `<base_dir>/master.key`, creating it (with a
/// freshly generated master key) if it doesn't exist yet.
pub fn get_or_create_master_key(base_dir: &Path) -> Result<[u8; KEY_LEN]> {
    let path = envelope_path(base_dir);
    let machine_id = machine_id::get_machine_id()?;

    if path.exists() {
        tracing::debug!(path = %path.display(), "loading master key envelope");
        let raw = fs::read_to_string(&path)?;
        let envelope: MasterKeyEnvelope = serde_json::from_str(&raw)?;
        let salt = BASE64
            .decode(&envelope.salt)
            .map_err(|e| ToolboxError::Parse(format!("invalid salt encoding: {e}")))?;
        let encrypted = BASE64
            .decode(&envelope.encrypted)
            .map_err(|e| ToolboxError::Parse(format!("invalid ciphertext encoding: {e}")))?;
        let wrap_key = wrapping_key(&machine_id, &salt);
        let plaintext = decrypt_with_key(&encrypted, &wrap_key)?;
        if plaintext.len() != KEY_LEN {
            return Err(ToolboxError::Decryption(
                "decrypted master key has unexpected length".to_string(),
            ));
        }
        let mut master = [0u8; KEY_LEN];
        master.copy_from_slice(&plaintext);
        return Ok(master);
    }

    tracing::debug!(path = %path.display(), "no master key envelope found, generating one");
    let master = generate_key();
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let wrap_key = wrapping_key(&machine_id, &salt);
    let encrypted = encrypt_with_key(&master, &wrap_key)?;

    let envelope = MasterKeyEnvelope {
        salt: BASE64.encode(salt),
        encrypted: BASE64.encode(&encrypted),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(&envelope)?)?;
    set_owner_only(&path)?;

    Ok(master)
}

#[cfg(unix)]
fn set_owner_only(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_owner_only(_path: &Path) -> Result<()> {
    Ok(())
}
