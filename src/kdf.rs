//! Password-based key derivation.
//!
//! Turns a password and a random salt into the AES key and IV used by the
//! cipher layer, via PBKDF2-HMAC-SHA256. The iteration count and hash are
//! part of the wire contract: two implementations interoperate only if they
//! agree on every constant below. Changing any of them breaks compatibility
//! with previously encrypted containers and would require a versioned format.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroize;

/// Length of the salt header in bytes.
pub const SALT_LEN: usize = 16;

/// Length of the derived AES key in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Length of the derived initialization vector in bytes (one AES block).
pub const IV_LEN: usize = 16;

/// PBKDF2 iteration count. Fixed; no negotiation exists in the format.
pub const PBKDF2_ITERATIONS: u32 = 10_000;

/// Key and IV derived from a (password, salt) pair.
///
/// Both buffers are wiped when the value is dropped.
pub struct DerivedKeys {
    pub key: [u8; KEY_LEN],
    pub iv: [u8; IV_LEN],
}

impl Drop for DerivedKeys {
    fn drop(&mut self) {
        self.key.zeroize();
        self.iv.zeroize();
    }
}

/// Derive the AES key and IV from a password and salt.
///
/// Deterministic: identical (password, salt) pairs always yield identical
/// output, which is what makes decryption possible without storing the key.
/// Any byte sequence is a legal password, including the empty one.
pub fn derive_keys(password: &[u8], salt: &[u8; SALT_LEN]) -> DerivedKeys {
    let mut okm = [0u8; KEY_LEN + IV_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut okm);

    let mut keys = DerivedKeys {
        key: [0u8; KEY_LEN],
        iv: [0u8; IV_LEN],
    };
    keys.key.copy_from_slice(&okm[..KEY_LEN]);
    keys.iv.copy_from_slice(&okm[KEY_LEN..]);
    okm.zeroize();

    keys
}
