use callvault_codec::{FormatError, FormatErrorKind};
use thiserror::Error;

/// Message returned to remote callers for every decrypt-time failure.
pub const PUBLIC_DECRYPT_MESSAGE: &str = "decryption failed";

/// Error returned by the hybrid decryption engine.
///
/// None of the variants carry key material, session keys or plaintext.
#[derive(Debug, Error)]
pub enum DecryptError {
    /// The envelope is structurally malformed.
    #[error("malformed envelope: {0}")]
    Format(#[from] FormatError),

    /// The session key could not be unwrapped with the loaded private key.
    #[error("session key unwrap failed")]
    KeyUnwrapFailed,

    /// The AES-GCM tag did not verify.
    #[error("payload authentication failed")]
    AuthenticationFailed,

    /// The private key could not be loaded. Fatal at startup.
    #[error("private key could not be loaded: {0}")]
    KeyLoadFailed(String),

    /// Sealing failed: unsupported session key size or a public key too small for OAEP.
    #[error("envelope sealing failed")]
    SealFailed,

    /// Reading an envelope or writing verified plaintext failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecryptError {
    /// Stable code for server-side logs.
    #[must_use]
    pub fn diagnostic_code(&self) -> &'static str {
        match self {
            Self::Format(e) => match e.kind {
                FormatErrorKind::Truncated => "format.truncated",
                FormatErrorKind::KeyLengthOutOfBounds => "format.key_length",
                FormatErrorKind::TrailingData => "format.trailing_data",
            },
            Self::KeyUnwrapFailed => "key_unwrap",
            Self::AuthenticationFailed => "auth",
            Self::KeyLoadFailed(_) => "key_load",
            Self::SealFailed => "seal",
            Self::Io(_) => "io",
        }
    }

    /// Message safe to hand to a remote caller.
    ///
    /// Every decrypt-time failure collapses to the same text so a caller
    /// cannot tell a padding failure from a tag failure.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::KeyLoadFailed(_) => "service unavailable",
            _ => PUBLIC_DECRYPT_MESSAGE,
        }
    }

    /// Cryptographic and format failures are terminal for a given envelope.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    pub(crate) fn key_load(msg: impl Into<String>) -> Self {
        Self::KeyLoadFailed(msg.into())
    }
}
