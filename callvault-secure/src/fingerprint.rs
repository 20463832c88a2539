use rsa::RsaPublicKey;
use rsa::traits::PublicKeyParts;
use sha2::{Digest, Sha256};

use crate::consts::FINGERPRINT_SIZE;

/// Derive a short fingerprint of an RSA public key.
///
/// SHA-256 over the big-endian modulus followed by the big-endian public
/// exponent, truncated to the first 8 bytes. Public information, safe to log.
#[must_use]
pub fn public_key_fingerprint(public_key: &RsaPublicKey) -> [u8; FINGERPRINT_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(public_key.n().to_bytes_be());
    hasher.update(public_key.e().to_bytes_be());
    let digest = hasher.finalize();
    let mut fp = [0u8; FINGERPRINT_SIZE];
    fp.copy_from_slice(&digest[..FINGERPRINT_SIZE]);
    fp
}

/// Lowercase hex rendering of a fingerprint.
#[must_use]
pub fn fingerprint_hex(fp: &[u8; FINGERPRINT_SIZE]) -> String {
    hex::encode(fp)
}
