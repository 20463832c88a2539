//! Loading the long-lived RSA key pair.
//!
//! A key store is consulted once at startup. A failure here is fatal to
//! the process, never to an individual decrypt call.

use std::fs;
use std::path::{Path, PathBuf};

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::error::DecryptError;

/// Source of the deployment's private key.
pub trait KeyStore {
    fn load_private_key(&self) -> Result<RsaPrivateKey, DecryptError>;
}

/// Reads a PEM private key from disk.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyStore for FileKeyStore {
    fn load_private_key(&self) -> Result<RsaPrivateKey, DecryptError> {
        let pem = fs::read_to_string(&self.path).map(Zeroizing::new).map_err(|e| {
            DecryptError::key_load(format!("cannot read {}: {e}", self.path.display()))
        })?;
        private_key_from_pem(&pem)
    }
}

/// Holds a PEM private key in memory (wiped on drop).
pub struct PemKeyStore {
    pem: Zeroizing<String>,
}

impl PemKeyStore {
    pub fn new(pem: impl Into<String>) -> Self {
        Self {
            pem: Zeroizing::new(pem.into()),
        }
    }
}

impl KeyStore for PemKeyStore {
    fn load_private_key(&self) -> Result<RsaPrivateKey, DecryptError> {
        private_key_from_pem(&self.pem)
    }
}

/// Decode a PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1 (`BEGIN RSA PRIVATE KEY`) PEM.
pub fn private_key_from_pem(pem: &str) -> Result<RsaPrivateKey, DecryptError> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|_| DecryptError::key_load("not a PKCS#8 or PKCS#1 RSA private key"))
}

/// Decode an X.509 SubjectPublicKeyInfo (`BEGIN PUBLIC KEY`) or PKCS#1 public key PEM.
pub fn public_key_from_pem(pem: &str) -> Result<RsaPublicKey, DecryptError> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|_| DecryptError::key_load("not an RSA public key"))
}

/// Read a public key PEM from disk.
pub fn load_public_key_pem(path: impl AsRef<Path>) -> Result<RsaPublicKey, DecryptError> {
    let path = path.as_ref();
    let pem = fs::read_to_string(path)
        .map_err(|e| DecryptError::key_load(format!("cannot read {}: {e}", path.display())))?;
    public_key_from_pem(&pem)
}
