use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use callvault_codec::{ParseLimits, parse_envelope_with};
use rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use tempfile::NamedTempFile;
use zeroize::Zeroizing;

use crate::cipher::aead_decrypt;
use crate::consts::{DEFAULT_PLAINTEXT_EXTENSION, FINGERPRINT_SIZE};
use crate::error::DecryptError;
use crate::fingerprint::{fingerprint_hex, public_key_fingerprint};
use crate::keystore::{FileKeyStore, KeyStore, PemKeyStore};
use crate::keywrap::unwrap_session_key;

/// Decrypt an envelope with the given private key.
///
/// Returns the full verified plaintext or an error; never partial output.
pub fn decrypt(private_key: &RsaPrivateKey, envelope: &[u8]) -> Result<Vec<u8>, DecryptError> {
    let limits = ParseLimits::default().with_max_wrapped_key_len(private_key.size());
    open(private_key, envelope, &limits)
}

/// Decrypt an envelope and write the plaintext to `sink`.
///
/// Nothing is written until the tag has verified.
pub fn decrypt_to_sink<W: Write + ?Sized>(
    private_key: &RsaPrivateKey,
    envelope: &[u8],
    sink: &mut W,
) -> Result<(), DecryptError> {
    write_verified(decrypt(private_key, envelope), sink)
}

/// Hand verified plaintext to `sink`; a failed decrypt writes nothing.
fn write_verified<W: Write + ?Sized>(
    plaintext: Result<Vec<u8>, DecryptError>,
    sink: &mut W,
) -> Result<(), DecryptError> {
    let plaintext = Zeroizing::new(plaintext?);
    sink.write_all(&plaintext)?;
    sink.flush()?;
    Ok(())
}

fn open(
    private_key: &RsaPrivateKey,
    envelope: &[u8],
    limits: &ParseLimits,
) -> Result<Vec<u8>, DecryptError> {
    let result = open_inner(private_key, envelope, limits);
    match &result {
        Ok(plaintext) => tracing::debug!(
            envelope_len = envelope.len(),
            plaintext_len = plaintext.len(),
            "envelope decrypted"
        ),
        Err(e) => tracing::warn!(
            envelope_len = envelope.len(),
            code = e.diagnostic_code(),
            "envelope rejected"
        ),
    }
    result
}

fn open_inner(
    private_key: &RsaPrivateKey,
    envelope: &[u8],
    limits: &ParseLimits,
) -> Result<Vec<u8>, DecryptError> {
    let parsed = parse_envelope_with(envelope, limits)?;
    tracing::trace!(
        wrapped_key_len = parsed.wrapped_key.len(),
        ciphertext_len = parsed.ciphertext.len(),
        "envelope parsed"
    );
    let session_key = unwrap_session_key(&mut OsRng, private_key, parsed.wrapped_key)?;
    aead_decrypt(session_key.as_bytes(), parsed.nonce, parsed.ciphertext, parsed.tag)
}

/// Owns the deployment's private key and decrypts envelopes with it.
///
/// Immutable after construction, so a single instance can be shared by
/// reference (or `Arc`) across threads with no locking.
pub struct HybridDecryptor {
    private_key: RsaPrivateKey,
    fingerprint: [u8; FINGERPRINT_SIZE],
}

impl HybridDecryptor {
    /// Wrap an already-decoded private key after checking its consistency.
    pub fn new(private_key: RsaPrivateKey) -> Result<Self, DecryptError> {
        private_key
            .validate()
            .map_err(|_| DecryptError::key_load("private key failed validation"))?;
        let fingerprint = public_key_fingerprint(&private_key.to_public_key());
        tracing::info!(
            fingerprint = %fingerprint_hex(&fingerprint),
            modulus_bits = private_key.size() * 8,
            "private key loaded"
        );
        Ok(Self {
            private_key,
            fingerprint,
        })
    }

    pub fn from_key_store(store: &impl KeyStore) -> Result<Self, DecryptError> {
        Self::new(store.load_private_key()?)
    }

    pub fn from_pem(pem: &str) -> Result<Self, DecryptError> {
        Self::from_key_store(&PemKeyStore::new(pem))
    }

    pub fn from_pem_file(path: impl Into<PathBuf>) -> Result<Self, DecryptError> {
        Self::from_key_store(&FileKeyStore::new(path))
    }

    /// Largest wrapped key this decryptor accepts: the RSA modulus size.
    #[must_use]
    pub fn max_wrapped_key_len(&self) -> usize {
        self.private_key.size()
    }

    #[must_use]
    pub fn fingerprint(&self) -> [u8; FINGERPRINT_SIZE] {
        self.fingerprint
    }

    /// Public half of the key, for building an encryptor.
    #[must_use]
    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }

    fn limits(&self) -> ParseLimits {
        ParseLimits::default().with_max_wrapped_key_len(self.max_wrapped_key_len())
    }

    pub fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>, DecryptError> {
        open(&self.private_key, envelope, &self.limits())
    }

    /// Decrypt an envelope whose size was recorded at upload time.
    ///
    /// Extra bytes are rejected as trailing data rather than fed to the AEAD.
    pub fn decrypt_sized(
        &self,
        envelope: &[u8],
        recorded_len: usize,
    ) -> Result<Vec<u8>, DecryptError> {
        let limits = self.limits().with_expected_len(recorded_len);
        open(&self.private_key, envelope, &limits)
    }

    pub fn decrypt_to_sink<W: Write + ?Sized>(
        &self,
        envelope: &[u8],
        sink: &mut W,
    ) -> Result<(), DecryptError> {
        write_verified(self.decrypt(envelope), sink)
    }

    /// Read a stored envelope and return its plaintext.
    pub fn decrypt_path(&self, input: impl AsRef<Path>) -> Result<Vec<u8>, DecryptError> {
        let envelope = fs::read(input.as_ref())?;
        self.decrypt(&envelope)
    }

    /// Decrypt a stored envelope to a file.
    ///
    /// Without an explicit `output`, the input's extension is replaced with
    /// `.mp3`. Plaintext is staged in a uniquely named temporary file beside
    /// the output and persisted over it only once fully written; the staging
    /// file is removed on any failure.
    pub fn decrypt_file(
        &self,
        input: impl AsRef<Path>,
        output: Option<&Path>,
    ) -> Result<PathBuf, DecryptError> {
        self.decrypt_file_with(input.as_ref(), output, None)
    }

    /// Like [`decrypt_file`](Self::decrypt_file), for an envelope whose size
    /// was recorded at upload time. The file is read once and checked
    /// against `recorded_len` before any key operation.
    pub fn decrypt_file_sized(
        &self,
        input: impl AsRef<Path>,
        output: Option<&Path>,
        recorded_len: usize,
    ) -> Result<PathBuf, DecryptError> {
        self.decrypt_file_with(input.as_ref(), output, Some(recorded_len))
    }

    fn decrypt_file_with(
        &self,
        input: &Path,
        output: Option<&Path>,
        recorded_len: Option<usize>,
    ) -> Result<PathBuf, DecryptError> {
        let output = match output {
            Some(p) => p.to_path_buf(),
            None => input.with_extension(DEFAULT_PLAINTEXT_EXTENSION),
        };
        if output == input {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "output path would overwrite the envelope",
            )
            .into());
        }

        let envelope = fs::read(input)?;
        let plaintext = Zeroizing::new(match recorded_len {
            Some(n) => self.decrypt_sized(&envelope, n)?,
            None => self.decrypt(&envelope)?,
        });

        persist_verified(&plaintext, &output)?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            "recording decrypted"
        );
        Ok(output)
    }
}

impl fmt::Debug for HybridDecryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybridDecryptor")
            .field("fingerprint", &fingerprint_hex(&self.fingerprint))
            .field("modulus_bits", &(self.private_key.size() * 8))
            .finish_non_exhaustive()
    }
}

/// Write `plaintext` to a temporary sibling of `output`, then rename it into place.
fn persist_verified(plaintext: &[u8], output: &Path) -> Result<(), DecryptError> {
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(plaintext)?;
    staged.as_file().sync_all()?;
    staged.persist(output).map_err(|e| e.error)?;
    Ok(())
}
