//! Cryptbox - Password-based file encryption using PBKDF2 and AES-256-CBC
//!
//! Encrypts a file under a human-supplied password into a self-contained
//! container (16-byte random salt header followed by the AES-CBC ciphertext
//! body) that can be decrypted later with the same password and no other
//! stored secret. The format carries no authentication tag: it offers
//! confidentiality only, not integrity.

#![forbid(unsafe_code)]

pub mod cipher;
pub mod cryptfile;
pub mod error;
pub mod file_ops;
pub mod kdf;
pub mod passphrase;

pub use error::{CryptboxError, Result};
pub use file_ops::{decrypt_file, encrypt_file};
