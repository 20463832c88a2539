/// AES-128 session key size.
pub const AES_128_KEY_SIZE: usize = 16;

/// AES-192 session key size.
pub const AES_192_KEY_SIZE: usize = 24;

/// AES-256 session key size. The mobile client always generates this size.
pub const AES_256_KEY_SIZE: usize = 32;

/// Extension given to decrypted recordings when no output path is supplied.
pub const DEFAULT_PLAINTEXT_EXTENSION: &str = "mp3";

/// Size of the public key fingerprint.
pub const FINGERPRINT_SIZE: usize = 8;
