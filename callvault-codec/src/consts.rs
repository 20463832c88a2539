/// Size of the big-endian wrapped-key length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// AES-GCM nonce size (96 bits).
pub const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size (128 bits).
pub const TAG_SIZE: usize = 16;

/// Smallest wrapped-key length accepted from the length prefix.
pub const MIN_WRAPPED_KEY_SIZE: usize = 1;

/// Wrapped-key ceiling when no key-specific bound is supplied (RSA-4096 ciphertext).
pub const MAX_WRAPPED_KEY_SIZE: usize = 512;

/// Wrapped-key size produced by a 2048-bit RSA public key.
pub const RSA_2048_WRAPPED_KEY_SIZE: usize = 256;

/// Bytes every envelope carries besides the wrapped key and ciphertext.
pub const FIXED_OVERHEAD: usize = LENGTH_PREFIX_SIZE + NONCE_SIZE + TAG_SIZE;

/// Offset of the wrapped key.
pub const WRAPPED_KEY_OFFSET: usize = LENGTH_PREFIX_SIZE;
