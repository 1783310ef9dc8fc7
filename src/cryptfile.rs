//! Encryption/decryption of the cryptbox container format.
//!
//! This module implements password-based encryption using:
//! - PBKDF2-HMAC-SHA256 (10,000 iterations) for key derivation
//! - AES-256-CBC with PKCS7 padding for the payload
//!
//! The binary format is:
//! - salt: 16 bytes, raw random
//! - ciphertext: variable length, always a non-zero multiple of 16 bytes
//!
//! There is no length field, no integrity tag, and no algorithm identifier;
//! both sides agree out-of-band on cipher, mode, iteration count, and hash.

use std::io::{Read, Write};

use rand::RngCore;
use rand::rngs::OsRng;

use crate::cipher;
use crate::error::{CryptboxError, Result};
use crate::kdf::{self, SALT_LEN};

/// Encrypt `src` with a password, writing the container (salt header plus
/// ciphertext body) to `dst`. A fresh random salt is drawn from the OS
/// CSPRNG on every call, so two encryptions of the same plaintext under the
/// same password produce different containers.
pub fn encrypt(password: &[u8], src: &mut impl Read, dst: &mut impl Write) -> Result<()> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    encrypt_with_salt(password, &salt, src, dst)
}

/// Encrypt with a caller-provided salt.
///
/// This function is ONLY for testing purposes to generate deterministic
/// output. NEVER use this in production - always use [`encrypt`] which
/// generates a random salt.
pub fn encrypt_with_salt(
    password: &[u8],
    salt: &[u8; SALT_LEN],
    src: &mut impl Read,
    dst: &mut impl Write,
) -> Result<()> {
    let keys = kdf::derive_keys(password, salt);

    dst.write_all(salt).map_err(|e| CryptboxError::Io {
        context: "failed to write salt header".to_string(),
        source: e,
    })?;

    cipher::encrypt_stream(src, dst, &keys)
}

/// Decrypt a container from `src`, writing the recovered plaintext to `dst`.
///
/// Reads the 16-byte salt header, re-derives the key and IV from it and the
/// supplied password, and reverse-transforms the remaining bytes. An input
/// too short to contain the salt fails with
/// [`CryptboxError::MalformedContainer`]; a padding failure after the full
/// transform fails with [`CryptboxError::DecryptionFailed`].
pub fn decrypt(password: &[u8], src: &mut impl Read, dst: &mut impl Write) -> Result<()> {
    let mut salt = [0u8; SALT_LEN];
    src.read_exact(&mut salt).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            CryptboxError::MalformedContainer(format!(
                "input ended before the {SALT_LEN}-byte salt header could be read"
            ))
        } else {
            CryptboxError::Io {
                context: "failed to read salt header".to_string(),
                source: e,
            }
        }
    })?;

    let keys = kdf::derive_keys(password, &salt);
    cipher::decrypt_stream(src, dst, &keys)
}
