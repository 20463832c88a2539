use crate::consts::{FIXED_OVERHEAD, MAX_WRAPPED_KEY_SIZE, NONCE_SIZE, TAG_SIZE};

/// Borrowed view over the four fields of a hybrid-encrypted envelope.
///
/// ```text
/// [len:4 BE] [wrapped key:len] [nonce:12] [ciphertext:*] [tag:16]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// RSA-OAEP encrypted session key.
    pub wrapped_key: &'a [u8],
    /// AES-GCM nonce.
    pub nonce: &'a [u8; NONCE_SIZE],
    /// AES-GCM ciphertext without the tag. May be empty.
    pub ciphertext: &'a [u8],
    /// AES-GCM authentication tag.
    pub tag: &'a [u8; TAG_SIZE],
}

impl Envelope<'_> {
    /// Number of bytes this envelope occupies when encoded.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        FIXED_OVERHEAD + self.wrapped_key.len() + self.ciphertext.len()
    }
}

/// Bounds applied while parsing an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Largest wrapped-key length accepted from the length prefix.
    /// Normally the RSA modulus size of the deployed key.
    pub max_wrapped_key_len: usize,
    /// Exact envelope size the caller recorded at upload time, if known.
    pub expected_len: Option<usize>,
}

impl ParseLimits {
    #[must_use]
    pub fn with_max_wrapped_key_len(mut self, max: usize) -> Self {
        self.max_wrapped_key_len = max;
        self
    }

    #[must_use]
    pub fn with_expected_len(mut self, len: usize) -> Self {
        self.expected_len = Some(len);
        self
    }
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_wrapped_key_len: MAX_WRAPPED_KEY_SIZE,
            expected_len: None,
        }
    }
}
