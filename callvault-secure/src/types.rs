use crate::consts::{AES_128_KEY_SIZE, AES_192_KEY_SIZE, AES_256_KEY_SIZE};

/// AES key size of an unwrapped session key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKeySize {
    /// 16-byte key, AES-128-GCM.
    Aes128,
    /// 24-byte key, AES-192-GCM.
    Aes192,
    /// 32-byte key, AES-256-GCM.
    Aes256,
}

impl SessionKeySize {
    /// Classify an unwrapped key by length. Any other length is implausible.
    #[must_use]
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            AES_128_KEY_SIZE => Some(Self::Aes128),
            AES_192_KEY_SIZE => Some(Self::Aes192),
            AES_256_KEY_SIZE => Some(Self::Aes256),
            _ => None,
        }
    }

    /// Key length in bytes.
    #[must_use]
    pub fn key_len(self) -> usize {
        match self {
            Self::Aes128 => AES_128_KEY_SIZE,
            Self::Aes192 => AES_192_KEY_SIZE,
            Self::Aes256 => AES_256_KEY_SIZE,
        }
    }
}
