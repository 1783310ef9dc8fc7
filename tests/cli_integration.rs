//! CLI integration tests
//!
//! Tests the command-line interface end-to-end.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Get path to the cryptbox binary
fn cryptbox_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps/
    path.push("cryptbox");
    path
}

/// Run cryptbox with password from stdin
fn run_cryptbox_with_password(
    args: &[&str],
    password: &str,
) -> Result<std::process::Output, std::io::Error> {
    let mut child = Command::new(cryptbox_bin())
        .arg("--passphrase-stdin")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    {
        let stdin = child.stdin.as_mut().expect("failed to open stdin");
        // Ignore BrokenPipe errors - the command may exit before reading stdin
        // if it encounters an error (e.g., file not found)
        let _ = stdin.write_all(password.as_bytes());
    }

    child.wait_with_output()
}

/// Get path to testdata directory
fn testdata_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("testdata");
    path.push(filename);
    path
}

/// Decrypt known ciphertext.
#[test]
fn test_decrypt_known_ciphertext() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hello-decrypted.txt");

    let result = run_cryptbox_with_password(
        &[
            "decrypt",
            "-i",
            testdata_path("hello.txt.cryptbox").to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ],
        "test",
    )
    .unwrap();

    assert!(
        result.status.success(),
        "decrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let decrypted = fs::read_to_string(&output).unwrap();
    let expected = fs::read_to_string(testdata_path("hello.txt")).unwrap();
    assert_eq!(decrypted, expected);
}

#[test]
fn test_encrypt_decrypt_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext_path = testdata_path("hello.txt");
    let encrypted_path = temp_dir.path().join("hello-encrypted.txt.cryptbox");
    let decrypted_path = temp_dir.path().join("hello-decrypted.txt");

    let result = run_cryptbox_with_password(
        &[
            "encrypt",
            "-i",
            plaintext_path.to_str().unwrap(),
            "-o",
            encrypted_path.to_str().unwrap(),
        ],
        "test",
    )
    .unwrap();

    assert!(
        result.status.success(),
        "encrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let result = run_cryptbox_with_password(
        &[
            "decrypt",
            "-i",
            encrypted_path.to_str().unwrap(),
            "-o",
            decrypted_path.to_str().unwrap(),
        ],
        "test",
    )
    .unwrap();

    assert!(
        result.status.success(),
        "decrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let original = fs::read_to_string(&plaintext_path).unwrap();
    let decrypted = fs::read_to_string(&decrypted_path).unwrap();
    assert_eq!(original, decrypted);
}

#[test]
fn test_two_encryptions_use_fresh_salts() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext = temp_dir.path().join("plain.txt");
    let encrypted_a = temp_dir.path().join("a.cryptbox");
    let encrypted_b = temp_dir.path().join("b.cryptbox");

    fs::write(&plaintext, "Secret content").unwrap();

    for out in [&encrypted_a, &encrypted_b] {
        let result = run_cryptbox_with_password(
            &[
                "encrypt",
                "-i",
                plaintext.to_str().unwrap(),
                "-o",
                out.to_str().unwrap(),
            ],
            "password123",
        )
        .unwrap();
        assert!(result.status.success());
    }

    let a = fs::read(&encrypted_a).unwrap();
    let b = fs::read(&encrypted_b).unwrap();
    assert_eq!(a.len(), b.len());
    assert_ne!(&a[..16], &b[..16], "salt header must differ across runs");
    assert_ne!(a, b);
}

#[test]
fn test_decrypt_with_wrong_password_fails() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext = temp_dir.path().join("plain.txt");
    let encrypted = temp_dir.path().join("encrypted.cryptbox");
    let decrypted = temp_dir.path().join("decrypted.txt");

    fs::write(&plaintext, "Original").unwrap();
    let result = run_cryptbox_with_password(
        &[
            "encrypt",
            "-i",
            plaintext.to_str().unwrap(),
            "-o",
            encrypted.to_str().unwrap(),
        ],
        "correct_password",
    )
    .unwrap();
    assert!(result.status.success());

    let result = run_cryptbox_with_password(
        &[
            "decrypt",
            "-i",
            encrypted.to_str().unwrap(),
            "-o",
            decrypted.to_str().unwrap(),
        ],
        "wrong_password",
    )
    .unwrap();

    // Random salt per encryption makes padding rejection probabilistic in
    // principle; if it slips through, the output must still be garbage.
    if result.status.success() {
        assert_ne!(fs::read(&decrypted).unwrap(), b"Original");
    } else {
        let stderr = String::from_utf8_lossy(&result.stderr);
        assert!(
            stderr.contains("decryption failed"),
            "Expected decryption failure message, got: {}",
            stderr
        );
    }
}

#[test]
fn test_decrypt_nonexistent_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let nonexistent = temp_dir.path().join("nonexistent.cryptbox");
    let output = temp_dir.path().join("output.txt");

    let result = run_cryptbox_with_password(
        &[
            "decrypt",
            "-i",
            nonexistent.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ],
        "test",
    )
    .unwrap();

    assert!(!result.status.success());
    assert!(!output.exists());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("not found"),
        "Expected not-found message, got: {}",
        stderr
    );
}

#[test]
fn test_decrypt_truncated_container_fails() {
    let temp_dir = TempDir::new().unwrap();
    let truncated = temp_dir.path().join("truncated.cryptbox");
    let output = temp_dir.path().join("output.txt");

    // Shorter than the 16-byte salt header.
    fs::write(&truncated, [0u8; 7]).unwrap();

    let result = run_cryptbox_with_password(
        &[
            "decrypt",
            "-i",
            truncated.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ],
        "test",
    )
    .unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("malformed container"),
        "Expected malformed-container message, got: {}",
        stderr
    );
}

#[test]
fn test_empty_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext = temp_dir.path().join("empty.txt");
    let encrypted = temp_dir.path().join("empty.txt.cryptbox");
    let decrypted = temp_dir.path().join("empty-decrypted.txt");

    fs::write(&plaintext, b"").unwrap();

    let result = run_cryptbox_with_password(
        &[
            "encrypt",
            "-i",
            plaintext.to_str().unwrap(),
            "-o",
            encrypted.to_str().unwrap(),
        ],
        "test",
    )
    .unwrap();
    assert!(result.status.success());

    // Salt header plus one full padding block.
    assert_eq!(fs::metadata(&encrypted).unwrap().len(), 32);

    let result = run_cryptbox_with_password(
        &[
            "decrypt",
            "-i",
            encrypted.to_str().unwrap(),
            "-o",
            decrypted.to_str().unwrap(),
        ],
        "test",
    )
    .unwrap();

    assert!(result.status.success());
    let content = fs::read(&decrypted).unwrap();
    assert_eq!(content, b"");
}

#[test]
fn test_large_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext = temp_dir.path().join("large.bin");
    let encrypted = temp_dir.path().join("large.bin.cryptbox");
    let decrypted = temp_dir.path().join("large-decrypted.bin");

    // 10 MB of non-repeating bytes, exercising the constant-memory
    // streaming path across many chunk boundaries.
    let large_content: Vec<u8> = (0..10 * 1024 * 1024u32)
        .map(|i| (i % 251) as u8)
        .collect();
    fs::write(&plaintext, &large_content).unwrap();

    let result = run_cryptbox_with_password(
        &[
            "encrypt",
            "-i",
            plaintext.to_str().unwrap(),
            "-o",
            encrypted.to_str().unwrap(),
        ],
        "test",
    )
    .unwrap();
    assert!(result.status.success());

    let result = run_cryptbox_with_password(
        &[
            "decrypt",
            "-i",
            encrypted.to_str().unwrap(),
            "-o",
            decrypted.to_str().unwrap(),
        ],
        "test",
    )
    .unwrap();

    assert!(result.status.success());
    let decrypted_content = fs::read(&decrypted).unwrap();
    assert_eq!(decrypted_content, large_content);
}
