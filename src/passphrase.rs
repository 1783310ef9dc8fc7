//! Passphrase acquisition.
//!
//! Operations never reach for a global secret source; whatever supplies the
//! passphrase is passed in explicitly, which keeps the core testable without
//! process-wide side effects.

use std::io::{self, IsTerminal, Read, Write};

use zeroize::Zeroizing;

use crate::error::{CryptboxError, Result};

/// Trait for reading passphrases from various sources.
pub trait PassphraseReader {
    /// Read a passphrase as arbitrary bytes (not necessarily UTF-8).
    ///
    /// Returns the passphrase wrapped in `Zeroizing` so it is wiped from
    /// memory when dropped.
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>>;
}

/// Returns a fixed passphrase (for testing).
pub struct ConstantPassphraseReader {
    passphrase: Zeroizing<Vec<u8>>,
}

impl ConstantPassphraseReader {
    pub fn new(passphrase: Vec<u8>) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase),
        }
    }
}

impl PassphraseReader for ConstantPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new((*self.passphrase).clone()))
    }
}

/// Reads a passphrase from any `io::Read` source, e.g. stdin.
pub struct ReaderPassphraseReader {
    reader: Box<dyn Read>,
}

impl ReaderPassphraseReader {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self { reader }
    }
}

impl PassphraseReader for ReaderPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        let mut data = Zeroizing::new(Vec::new());
        self.reader
            .read_to_end(&mut data)
            .map_err(|e| CryptboxError::PassphraseUnavailable(format!("read failed: {e}")))?;
        Ok(data)
    }
}

/// Reads a passphrase from the terminal with echo disabled.
pub struct TerminalPassphraseReader;

impl TerminalPassphraseReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalPassphraseReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PassphraseReader for TerminalPassphraseReader {
    /// Read a passphrase from the terminal.
    ///
    /// Terminal input is limited to UTF-8 due to rpassword constraints. For
    /// non-UTF-8 passphrases, use `--passphrase-stdin` instead.
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        if !io::stdin().is_terminal() {
            return Err(CryptboxError::PassphraseUnavailable(
                "stdin is not a terminal".to_string(),
            ));
        }

        io::stderr()
            .write_all(b"Password (cryptbox): ")
            .and_then(|()| io::stderr().flush())
            .map_err(|e| CryptboxError::Io {
                context: "failed to write passphrase prompt".to_string(),
                source: e,
            })?;

        // Read without echo. rpassword returns a String (UTF-8 only).
        let passphrase = rpassword::read_password().map_err(|e| {
            CryptboxError::PassphraseUnavailable(format!("terminal read failed: {e}"))
        })?;

        Ok(Zeroizing::new(passphrase.into_bytes()))
    }
}
