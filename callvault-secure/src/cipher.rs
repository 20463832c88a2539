use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use callvault_codec::consts::{NONCE_SIZE, TAG_SIZE};
use zeroize::Zeroize;

use crate::error::DecryptError;
use crate::types::SessionKeySize;

type Aes192Gcm = AesGcm<aes::Aes192, U12>;

/// Verify the tag and decrypt, with the AES variant chosen by key length.
///
/// Tag verification and decryption are a single operation. On failure the
/// working buffer is wiped and no plaintext leaves this function.
pub fn aead_decrypt(
  session_key: &[u8],
  nonce: &[u8; NONCE_SIZE],
  ciphertext: &[u8],
  tag: &[u8; TAG_SIZE],
) -> Result<Vec<u8>, DecryptError> {
  match SessionKeySize::from_len(session_key.len()) {
    Some(SessionKeySize::Aes128) => open_detached::<Aes128Gcm>(session_key, nonce, ciphertext, tag),
    Some(SessionKeySize::Aes192) => open_detached::<Aes192Gcm>(session_key, nonce, ciphertext, tag),
    Some(SessionKeySize::Aes256) => open_detached::<Aes256Gcm>(session_key, nonce, ciphertext, tag),
    None => Err(DecryptError::AuthenticationFailed),
  }
}

/// Encrypt with the AES variant chosen by key length.
///
/// Returns the ciphertext and the detached 16-byte tag.
pub fn aead_encrypt(
  session_key: &[u8],
  nonce: &[u8; NONCE_SIZE],
  plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_SIZE]), DecryptError> {
  match SessionKeySize::from_len(session_key.len()) {
    Some(SessionKeySize::Aes128) => seal_detached::<Aes128Gcm>(session_key, nonce, plaintext),
    Some(SessionKeySize::Aes192) => seal_detached::<Aes192Gcm>(session_key, nonce, plaintext),
    Some(SessionKeySize::Aes256) => seal_detached::<Aes256Gcm>(session_key, nonce, plaintext),
    None => Err(DecryptError::SealFailed),
  }
}

fn open_detached<C>(
  key: &[u8],
  nonce: &[u8; NONCE_SIZE],
  ciphertext: &[u8],
  tag: &[u8; TAG_SIZE],
) -> Result<Vec<u8>, DecryptError>
where
  C: KeyInit + AeadInPlace,
{
  let cipher = C::new_from_slice(key).map_err(|_| DecryptError::AuthenticationFailed)?;
  let nonce = GenericArray::from_slice(nonce);
  let tag = GenericArray::from_slice(tag);

  let mut buf = ciphertext.to_vec();
  match cipher.decrypt_in_place_detached(nonce, b"", &mut buf, tag) {
    Ok(()) => Ok(buf),
    Err(_) => {
      buf.zeroize();
      Err(DecryptError::AuthenticationFailed)
    }
  }
}

fn seal_detached<C>(
  key: &[u8],
  nonce: &[u8; NONCE_SIZE],
  plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_SIZE]), DecryptError>
where
  C: KeyInit + AeadInPlace,
{
  let cipher = C::new_from_slice(key).map_err(|_| DecryptError::SealFailed)?;
  let nonce = GenericArray::from_slice(nonce);

  let mut buf = plaintext.to_vec();
  let tag = cipher
    .encrypt_in_place_detached(nonce, b"", &mut buf)
    .map_err(|_| DecryptError::SealFailed)?;

  let mut out = [0u8; TAG_SIZE];
  out.copy_from_slice(&tag);
  Ok((buf, out))
}
