//! The encrypting side of the envelope, as performed by the recording client.

use std::fs;
use std::path::Path;

use callvault_codec::consts::NONCE_SIZE;
use callvault_codec::{Envelope, build_envelope, encoded_len};
use rand_core::{OsRng, RngCore};
use rsa::RsaPublicKey;
use zeroize::Zeroizing;

use crate::cipher::aead_encrypt;
use crate::consts::{AES_256_KEY_SIZE, FINGERPRINT_SIZE};
use crate::error::DecryptError;
use crate::fingerprint::public_key_fingerprint;
use crate::keystore::{load_public_key_pem, public_key_from_pem};
use crate::keywrap::wrap_session_key;

/// Produces envelopes that only the matching private key can open.
#[derive(Debug, Clone)]
pub struct HybridEncryptor {
    public_key: RsaPublicKey,
}

impl HybridEncryptor {
    #[must_use]
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self { public_key }
    }

    pub fn from_public_pem(pem: &str) -> Result<Self, DecryptError> {
        public_key_from_pem(pem).map(Self::new)
    }

    pub fn from_public_pem_file(path: impl AsRef<Path>) -> Result<Self, DecryptError> {
        load_public_key_pem(path).map(Self::new)
    }

    #[must_use]
    pub fn fingerprint(&self) -> [u8; FINGERPRINT_SIZE] {
        public_key_fingerprint(&self.public_key)
    }

    /// Seal with a fresh random AES-256 session key and nonce.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, DecryptError> {
        let mut session_key = Zeroizing::new([0u8; AES_256_KEY_SIZE]);
        OsRng.fill_bytes(&mut session_key[..]);
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);
        self.seal_with(plaintext, &session_key[..], &nonce)
    }

    /// Seal with a caller-chosen session key and nonce.
    ///
    /// The nonce must never be reused with the same session key.
    pub fn seal_with(
        &self,
        plaintext: &[u8],
        session_key: &[u8],
        nonce: &[u8; NONCE_SIZE],
    ) -> Result<Vec<u8>, DecryptError> {
        let wrapped_key = wrap_session_key(&mut OsRng, &self.public_key, session_key)?;
        let (ciphertext, tag) = aead_encrypt(session_key, nonce, plaintext)?;

        let envelope = Envelope {
            wrapped_key: &wrapped_key,
            nonce,
            ciphertext: &ciphertext,
            tag: &tag,
        };
        let mut out = vec![0u8; encoded_len(wrapped_key.len(), ciphertext.len())];
        let n = build_envelope(&envelope, &mut out).map_err(|_| DecryptError::SealFailed)?;
        out.truncate(n);
        Ok(out)
    }

    /// Seal a file's contents into `output`.
    pub fn seal_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<usize, DecryptError> {
        let plaintext = Zeroizing::new(fs::read(input.as_ref())?);
        let envelope = self.seal(&plaintext)?;
        fs::write(output.as_ref(), &envelope)?;
        tracing::debug!(
            output = %output.as_ref().display(),
            envelope_len = envelope.len(),
            "recording sealed"
        );
        Ok(envelope.len())
    }
}
