//! Hybrid RSA-OAEP + AES-GCM decryption of recording envelopes.
//!
//! The session key is unwrapped with RSA-OAEP (SHA-256), then the payload is
//! verified and decrypted with AES-GCM in one step. A decrypt call either
//! returns the full verified plaintext or an error with no plaintext at all.

#![forbid(unsafe_code)]

pub mod cipher;
pub mod consts;
pub mod decryptor;
pub mod error;
pub mod fingerprint;
pub mod keystore;
pub mod keywrap;
pub mod seal;
pub mod types;

pub use error::{DecryptError, PUBLIC_DECRYPT_MESSAGE};
pub use types::SessionKeySize;

pub use decryptor::{HybridDecryptor, decrypt, decrypt_to_sink};
pub use fingerprint::{fingerprint_hex, public_key_fingerprint};
pub use keystore::{FileKeyStore, KeyStore, PemKeyStore, load_public_key_pem};
pub use seal::HybridEncryptor;

pub use callvault_codec::{FormatError, FormatErrorKind};
pub use rsa::{RsaPrivateKey, RsaPublicKey};
