//! Streaming AES-256-CBC transform with PKCS7 padding.
//!
//! Both directions run in a single pass over the stream with a fixed-size
//! chunk buffer, so memory use is independent of file size. Encryption must
//! always finalize: the padded last block is emitted even for empty input
//! (one full padding block). Decryption holds back the final ciphertext
//! block until EOF so the padding can be validated and stripped; a padding
//! failure -- in practice a wrong password or corrupted data -- surfaces as
//! [`CryptboxError::DecryptionFailed`], never as silently wrong plaintext.

use std::io::{Read, Write};

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::{CryptboxError, Result};
use crate::kdf::DerivedKeys;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// I/O chunk size. Must be a multiple of [`BLOCK_LEN`].
const CHUNK_LEN: usize = 256 * BLOCK_LEN;

/// Read from `src` until `buf` is full or EOF is reached, returning the
/// number of bytes read. A return value smaller than `buf.len()` means EOF.
fn read_to_capacity(src: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn read_err(err: std::io::Error) -> CryptboxError {
    CryptboxError::Io {
        context: "failed to read from input stream".to_string(),
        source: err,
    }
}

fn write_err(err: std::io::Error) -> CryptboxError {
    CryptboxError::Io {
        context: "failed to write to output stream".to_string(),
        source: err,
    }
}

/// Encrypt `src` to exhaustion, writing ciphertext to `dst`.
///
/// Output length is `(src_len / 16 + 1) * 16`: plaintext that is already
/// block-aligned still gains a full padding block.
pub fn encrypt_stream(src: &mut impl Read, dst: &mut impl Write, keys: &DerivedKeys) -> Result<()> {
    let mut enc = Aes256CbcEnc::new(&keys.key.into(), &keys.iv.into());
    let mut buf = [0u8; CHUNK_LEN];

    loop {
        let n = read_to_capacity(src, &mut buf).map_err(read_err)?;

        if n == CHUNK_LEN {
            for block in buf.chunks_exact_mut(BLOCK_LEN) {
                enc.encrypt_block_mut(GenericArray::from_mut_slice(block));
            }
            dst.write_all(&buf).map_err(write_err)?;
            continue;
        }

        // EOF: encrypt any complete blocks, then pad and emit the final one.
        let aligned = n - n % BLOCK_LEN;
        for block in buf[..aligned].chunks_exact_mut(BLOCK_LEN) {
            enc.encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        dst.write_all(&buf[..aligned]).map_err(write_err)?;

        let tail = n - aligned;
        let mut last = [0u8; BLOCK_LEN];
        last[..tail].copy_from_slice(&buf[aligned..n]);
        let final_block = enc
            .encrypt_padded_mut::<Pkcs7>(&mut last, tail)
            .map_err(|_| CryptboxError::Unexpected {
                context: "failed to pad final cipher block".to_string(),
                source: "padding buffer too small".into(),
            })?;
        dst.write_all(final_block).map_err(write_err)?;
        return Ok(());
    }
}

/// Decrypt `src` to exhaustion, writing plaintext to `dst`.
///
/// The entire ciphertext must be consumed before padding can be validated,
/// so the most recent ciphertext block is always held back until the next
/// read proves whether it is the final one.
pub fn decrypt_stream(src: &mut impl Read, dst: &mut impl Write, keys: &DerivedKeys) -> Result<()> {
    let mut dec = Aes256CbcDec::new(&keys.key.into(), &keys.iv.into());
    let mut buf = [0u8; CHUNK_LEN];
    let mut pending: Option<[u8; BLOCK_LEN]> = None;

    loop {
        let n = read_to_capacity(src, &mut buf).map_err(read_err)?;

        if n % BLOCK_LEN != 0 {
            return Err(CryptboxError::MalformedContainer(format!(
                "ciphertext body is not a whole number of {BLOCK_LEN}-byte blocks"
            )));
        }

        for block in buf[..n].chunks_exact(BLOCK_LEN) {
            if let Some(mut prev) = pending.take() {
                dec.decrypt_block_mut(GenericArray::from_mut_slice(&mut prev));
                dst.write_all(&prev).map_err(write_err)?;
            }
            let mut held = [0u8; BLOCK_LEN];
            held.copy_from_slice(block);
            pending = Some(held);
        }

        if n < CHUNK_LEN {
            break;
        }
    }

    // Valid ciphertext is never empty: even empty plaintext encrypts to one
    // full padding block.
    let mut last = pending.ok_or_else(|| {
        CryptboxError::MalformedContainer("ciphertext body is empty".to_string())
    })?;
    let plaintext = dec
        .decrypt_padded_mut::<Pkcs7>(&mut last)
        .map_err(|_| CryptboxError::DecryptionFailed)?;
    dst.write_all(plaintext).map_err(write_err)?;

    Ok(())
}
