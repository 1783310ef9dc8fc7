//! Error types for all cryptbox operations.
//!
//! Every fallible operation in this crate returns [`Result<T>`]. The variants
//! are deliberately coarse but programmatically distinguishable: callers can
//! tell a wrong password ([`CryptboxError::DecryptionFailed`]) apart from a
//! filesystem problem ([`CryptboxError::Io`]) without parsing messages.

use std::path::PathBuf;

use thiserror::Error;

/// The error type for encryption and decryption operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CryptboxError {
    /// The input path does not exist.
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// An underlying read/write/create operation failed (permissions, disk
    /// full, invalid path). The operation context and the original cause are
    /// both preserved.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The encrypted container is structurally invalid: shorter than the
    /// salt header, or its ciphertext body is empty or not a whole number of
    /// cipher blocks.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// Padding validation failed after transforming the full ciphertext.
    /// Almost always a wrong password; possibly corrupted or foreign data.
    ///
    /// Note that this format carries no authentication tag. Tampering with
    /// interior ciphertext bytes may produce garbage plaintext without
    /// triggering this error; the format offers confidentiality only.
    #[error("decryption failed: wrong password or corrupted data")]
    DecryptionFailed,

    /// A passphrase could not be obtained from the configured reader.
    #[error("passphrase unavailable: {0}")]
    PassphraseUnavailable(String),

    /// Unexpected failure outside the taxonomy above. Context is attached
    /// and the original error preserved; never silently swallowed.
    #[error("{context}")]
    Unexpected {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl CryptboxError {
    /// Wraps an `io::Error` with operation context, classifying `NotFound`
    /// separately so callers can branch on it.
    pub(crate) fn from_io(path: &std::path::Path, context: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            CryptboxError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            CryptboxError::Io {
                context: format!("{context} {}", path.display()),
                source: err,
            }
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CryptboxError>;
