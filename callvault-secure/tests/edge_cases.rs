use std::io::{self, Write};

use callvault_codec::consts::{LENGTH_PREFIX_SIZE, NONCE_SIZE, TAG_SIZE};
use callvault_secure::{DecryptError, FormatErrorKind, HybridDecryptor, HybridEncryptor};

const KEY_A: &str = include_str!("fixtures/key_a.pem");
const KEY_A_PUB: &str = include_str!("fixtures/key_a.pub.pem");
const ENVELOPE: &[u8] = include_bytes!("fixtures/test_audio.enc");

const WRAPPED_KEY_LEN: usize = 256;
const NONCE_OFFSET: usize = LENGTH_PREFIX_SIZE + WRAPPED_KEY_LEN;
const CIPHERTEXT_OFFSET: usize = NONCE_OFFSET + NONCE_SIZE;

fn decryptor() -> HybridDecryptor {
    HybridDecryptor::from_pem(KEY_A).unwrap()
}

fn assert_auth_failed(result: Result<Vec<u8>, DecryptError>, what: &str) {
    match result {
        Err(DecryptError::AuthenticationFailed) => {}
        Err(other) => panic!("{what}: expected AuthenticationFailed, got {other:?}"),
        Ok(_) => panic!("{what}: tampered envelope produced plaintext"),
    }
}

fn assert_format(result: Result<Vec<u8>, DecryptError>, expected: FormatErrorKind, what: &str) {
    match result {
        Err(DecryptError::Format(e)) => assert_eq!(e.kind, expected, "{what}"),
        Err(other) => panic!("{what}: expected {expected:?}, got {other:?}"),
        Ok(_) => panic!("{what}: malformed envelope produced plaintext"),
    }
}

// ---------------------------------------------------------------------------
// Tampering
// ---------------------------------------------------------------------------

/// Flip every bit in `range` one at a time; each variant must fail the tag.
fn sweep_bits(range: std::ops::Range<usize>, what: &str) {
    let dec = decryptor();
    let mut env = ENVELOPE.to_vec();
    for offset in range {
        for bit in 0..8 {
            env[offset] ^= 1 << bit;
            assert_auth_failed(dec.decrypt(&env), &format!("{what} byte {offset} bit {bit}"));
            env[offset] ^= 1 << bit;
        }
    }
    assert_eq!(env, ENVELOPE);
}

#[test]
fn test_tampered_nonce() {
    sweep_bits(NONCE_OFFSET..CIPHERTEXT_OFFSET, "nonce");
}

#[test]
fn test_tampered_ciphertext() {
    sweep_bits(CIPHERTEXT_OFFSET..ENVELOPE.len() - TAG_SIZE, "ciphertext");
}

#[test]
fn test_tampered_auth_tag() {
    sweep_bits(ENVELOPE.len() - TAG_SIZE..ENVELOPE.len(), "tag");
}

#[test]
fn test_tampered_wrapped_key() {
    let mut env = ENVELOPE.to_vec();
    env[LENGTH_PREFIX_SIZE + 100] ^= 0x01;
    assert!(matches!(
        decryptor().decrypt(&env),
        Err(DecryptError::KeyUnwrapFailed)
    ));
}

// ---------------------------------------------------------------------------
// Truncation and trailing data
// ---------------------------------------------------------------------------

#[test]
fn test_truncated_before_tag_boundary() {
    let dec = decryptor();
    let boundary = CIPHERTEXT_OFFSET + TAG_SIZE;
    for cut in 0..boundary {
        assert_format(dec.decrypt(&ENVELOPE[..cut]), FormatErrorKind::Truncated, "truncated");
    }
}

#[test]
fn test_truncated_inside_ciphertext() {
    // Still structurally valid; the shortened tail fails authentication.
    let dec = decryptor();
    for drop in [1, 8, 16] {
        let cut = ENVELOPE.len() - drop;
        assert_auth_failed(dec.decrypt(&ENVELOPE[..cut]), "short ciphertext");
    }
}

#[test]
fn test_trailing_data() {
    let dec = decryptor();
    let mut env = ENVELOPE.to_vec();
    env.extend_from_slice(&[0x00, 0x00]);

    assert_format(
        dec.decrypt_sized(&env, ENVELOPE.len()),
        FormatErrorKind::TrailingData,
        "recorded size",
    );
    // Without the recorded size the extra bytes shift the tag and fail the AEAD.
    assert_auth_failed(dec.decrypt(&env), "unsized");
    assert_eq!(dec.decrypt_sized(ENVELOPE, ENVELOPE.len()).unwrap(), b"test-audio-bytes");
}

// ---------------------------------------------------------------------------
// Wrapped key length
// ---------------------------------------------------------------------------

#[test]
fn test_wrapped_key_longer_than_modulus() {
    let dec = decryptor();
    assert_eq!(dec.max_wrapped_key_len(), WRAPPED_KEY_LEN);

    let mut env = Vec::new();
    env.extend_from_slice(&257u32.to_be_bytes());
    env.extend_from_slice(&[0u8; 257 + NONCE_SIZE + TAG_SIZE]);
    assert_format(dec.decrypt(&env), FormatErrorKind::KeyLengthOutOfBounds, "257");
}

#[test]
fn test_wrapped_key_shorter_than_modulus() {
    let mut env = Vec::new();
    env.extend_from_slice(&128u32.to_be_bytes());
    env.extend_from_slice(&[0x42u8; 128 + NONCE_SIZE + TAG_SIZE]);
    assert!(matches!(
        decryptor().decrypt(&env),
        Err(DecryptError::KeyUnwrapFailed)
    ));
}

#[test]
fn test_zero_length_wrapped_key() {
    let env = vec![0u8; LENGTH_PREFIX_SIZE + NONCE_SIZE + TAG_SIZE];
    assert_format(decryptor().decrypt(&env), FormatErrorKind::KeyLengthOutOfBounds, "zero");
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("socket closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_untouched_on_auth_failure() {
    let mut env = ENVELOPE.to_vec();
    let last = env.len() - 1;
    env[last] ^= 0xFF;

    let mut sink = Vec::new();
    let err = decryptor().decrypt_to_sink(&env, &mut sink).unwrap_err();
    assert!(matches!(err, DecryptError::AuthenticationFailed));
    assert!(sink.is_empty());
}

#[test]
fn test_sink_write_failure_is_io() {
    let err = decryptor().decrypt_to_sink(ENVELOPE, &mut BrokenSink).unwrap_err();
    assert!(matches!(err, DecryptError::Io(_)));
    assert_eq!(err.diagnostic_code(), "io");
}

#[test]
fn test_failed_file_decrypt_leaves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("1700000000000_15550001111.enc");
    let mut env = ENVELOPE.to_vec();
    env[CIPHERTEXT_OFFSET] ^= 0x80;
    std::fs::write(&input, &env).unwrap();

    let err = decryptor().decrypt_file(&input, None).unwrap_err();
    assert!(matches!(err, DecryptError::AuthenticationFailed));
    assert_eq!(dir_entries(dir.path()), ["1700000000000_15550001111.enc"]);
}

fn dir_entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_unwritable_output_leaves_no_plaintext() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rec.enc");
    std::fs::write(&input, ENVELOPE).unwrap();
    let output = dir.path().join("out.mp3");
    std::fs::create_dir(&output).unwrap();
    std::fs::write(output.join("keep"), b"x").unwrap();

    let err = decryptor().decrypt_file(&input, Some(&output)).unwrap_err();
    assert!(matches!(err, DecryptError::Io(_)));
    assert_eq!(dir_entries(dir.path()), ["out.mp3", "rec.enc"]);
    assert_eq!(dir_entries(&output), ["keep"]);
}

#[test]
fn test_sized_file_decrypt_rejects_trailing_data() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rec.enc");
    let mut env = ENVELOPE.to_vec();
    env.extend_from_slice(&[0u8; 4]);
    std::fs::write(&input, &env).unwrap();

    let err = decryptor()
        .decrypt_file_sized(&input, None, ENVELOPE.len())
        .unwrap_err();
    assert!(matches!(
        err,
        DecryptError::Format(e) if e.kind == FormatErrorKind::TrailingData
    ));
    assert_eq!(dir_entries(dir.path()), ["rec.enc"]);
}

#[test]
fn test_sized_file_decrypt() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rec.enc");
    std::fs::write(&input, ENVELOPE).unwrap();

    let out = decryptor()
        .decrypt_file_sized(&input, None, ENVELOPE.len())
        .unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), b"test-audio-bytes");
    assert_eq!(dir_entries(dir.path()), ["rec.enc", "rec.mp3"]);
}

#[test]
fn test_output_may_not_overwrite_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("recording.mp3");
    std::fs::write(&input, ENVELOPE).unwrap();

    let err = decryptor().decrypt_file(&input, None).unwrap_err();
    assert!(matches!(err, DecryptError::Io(_)));
    assert_eq!(std::fs::read(&input).unwrap(), ENVELOPE);
}

// ---------------------------------------------------------------------------
// Error surface
// ---------------------------------------------------------------------------

#[test]
fn test_errors_never_echo_plaintext() {
    let dec = decryptor();
    let mut env = ENVELOPE.to_vec();
    env[CIPHERTEXT_OFFSET + 1] ^= 0x10;
    let err = dec.decrypt(&env).unwrap_err();
    let shown = format!("{err} {err:?}");
    assert!(!shown.contains("test-audio"));
    assert_eq!(err.public_message(), callvault_secure::PUBLIC_DECRYPT_MESSAGE);
}

#[test]
fn test_seal_rejects_bad_session_key() {
    let enc = HybridEncryptor::from_public_pem(KEY_A_PUB).unwrap();
    let err = enc.seal_with(b"audio", &[0u8; 20], &[0u8; NONCE_SIZE]).unwrap_err();
    assert!(matches!(err, DecryptError::SealFailed));
}

#[test]
fn test_key_load_failure() {
    let err = HybridDecryptor::from_pem_file("/nonexistent/private_key.pem").unwrap_err();
    assert!(matches!(err, DecryptError::KeyLoadFailed(_)));
    assert!(!err.is_retryable());
}
