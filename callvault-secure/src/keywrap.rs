//! RSA-OAEP (SHA-256) wrapping of the per-recording AES session key.

use rand_core::CryptoRngCore;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::DecryptError;
use crate::types::SessionKeySize;

/// An unwrapped session key. Wiped from memory on drop.
pub struct SessionKey {
    bytes: Zeroizing<Vec<u8>>,
    size: SessionKeySize,
}

impl SessionKey {
    #[must_use]
    pub fn size(&self) -> SessionKeySize {
        self.size
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl core::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionKey")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Recover the session key from its RSA-OAEP ciphertext.
///
/// Every failure is reported as [`DecryptError::KeyUnwrapFailed`]. The
/// reason is only visible in debug logs, as a short code.
pub fn unwrap_session_key<R: CryptoRngCore>(
    rng: &mut R,
    private_key: &RsaPrivateKey,
    wrapped: &[u8],
) -> Result<SessionKey, DecryptError> {
    if wrapped.len() != private_key.size() {
        tracing::debug!(reason = "length", "session key unwrap failed");
        return Err(DecryptError::KeyUnwrapFailed);
    }

    let bytes = private_key
        .decrypt_blinded(rng, Oaep::new::<Sha256>(), wrapped)
        .map(Zeroizing::new)
        .map_err(|_| {
            tracing::debug!(reason = "oaep", "session key unwrap failed");
            DecryptError::KeyUnwrapFailed
        })?;

    let Some(size) = SessionKeySize::from_len(bytes.len()) else {
        tracing::debug!(reason = "session_key_size", "session key unwrap failed");
        return Err(DecryptError::KeyUnwrapFailed);
    };

    Ok(SessionKey { bytes, size })
}

/// Encrypt a session key to the given public key.
pub fn wrap_session_key<R: CryptoRngCore>(
    rng: &mut R,
    public_key: &RsaPublicKey,
    session_key: &[u8],
) -> Result<Vec<u8>, DecryptError> {
    if SessionKeySize::from_len(session_key.len()).is_none() {
        return Err(DecryptError::SealFailed);
    }
    public_key
        .encrypt(rng, Oaep::new::<Sha256>(), session_key)
        .map_err(|_| DecryptError::SealFailed)
}
