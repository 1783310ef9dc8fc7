//! File encryption/decryption operations.
//!
//! High-level operations over paths: open the input, create the output, and
//! pipe one through the cipher into the other. Files are streamed through a
//! fixed-size buffer rather than loaded whole, so memory use is independent
//! of file size. All handles are owned by the call and released on every
//! exit path via RAII.
//!
//! A failed or interrupted operation may leave an incomplete output file
//! behind; such a file is invalid and must be discarded, never resumed.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::cryptfile;
use crate::error::{CryptboxError, Result};
use crate::passphrase::PassphraseReader;

/// Encrypt a file with a password.
///
/// Reads plaintext from `input_path`, encrypts it using a password from
/// `passphrase_reader`, and writes the container to `output_path`,
/// creating or truncating it.
///
/// The output file is created with mode 0o600 (read/write for owner only)
/// on Unix systems.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let input = open_input(input_path)?;
    let passphrase = passphrase_reader.read_passphrase()?;
    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(create_output(output_path)?);

    cryptfile::encrypt(&passphrase, &mut reader, &mut writer)?;
    finish_output(output_path, writer)
}

/// Decrypt a file with a password.
///
/// Reads a container from `input_path`, decrypts it using a password from
/// `passphrase_reader`, and writes the recovered plaintext to `output_path`.
/// A container shorter than the salt header fails with
/// [`CryptboxError::MalformedContainer`]; a wrong password fails with
/// [`CryptboxError::DecryptionFailed`] after the full transform.
///
/// The output file is created with mode 0o600 (read/write for owner only)
/// on Unix systems.
pub fn decrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let input = open_input(input_path)?;
    let passphrase = passphrase_reader.read_passphrase()?;
    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(create_output(output_path)?);

    cryptfile::decrypt(&passphrase, &mut reader, &mut writer)?;
    finish_output(output_path, writer)
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| CryptboxError::from_io(path, "failed to open", e))
}

/// Create or truncate the output file with restrictive permissions (0o600
/// on Unix).
fn create_output(path: &Path) -> Result<File> {
    #[cfg(unix)]
    {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .map_err(|e| CryptboxError::from_io(path, "failed to create", e))
    }

    #[cfg(not(unix))]
    {
        File::create(path).map_err(|e| CryptboxError::from_io(path, "failed to create", e))
    }
}

fn finish_output(path: &Path, mut writer: BufWriter<File>) -> Result<()> {
    writer
        .flush()
        .map_err(|e| CryptboxError::from_io(path, "failed to flush", e))
}
