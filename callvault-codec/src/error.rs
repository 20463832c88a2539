use core::fmt;

/// Specific kind of envelope format error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatErrorKind {
    /// The envelope ends before a required field is complete.
    Truncated,
    /// The declared wrapped-key length is zero or above the configured maximum.
    KeyLengthOutOfBounds,
    /// The envelope is longer than the size it was recorded with.
    TrailingData,
}

/// Error returned when an envelope is structurally malformed.
///
/// Raised before any cryptographic operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatError {
    pub kind: FormatErrorKind,
    /// Byte offset in the envelope where the problem was detected.
    pub position: usize,
}

impl FormatError {
    #[must_use]
    pub fn new(kind: FormatErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    #[must_use]
    pub fn truncated(position: usize) -> Self {
        Self::new(FormatErrorKind::Truncated, position)
    }

    #[must_use]
    pub fn key_length_out_of_bounds(position: usize) -> Self {
        Self::new(FormatErrorKind::KeyLengthOutOfBounds, position)
    }

    #[must_use]
    pub fn trailing_data(position: usize) -> Self {
        Self::new(FormatErrorKind::TrailingData, position)
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = match self.kind {
            FormatErrorKind::Truncated => "envelope truncated",
            FormatErrorKind::KeyLengthOutOfBounds => "wrapped key length out of bounds",
            FormatErrorKind::TrailingData => "trailing data after authentication tag",
        };
        write!(f, "{} at byte {}", desc, self.position)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FormatError {}

/// Specific kind of build error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildErrorKind {
    /// Output buffer is too small.
    BufferTooSmall,
    /// Wrapped key is empty or its length does not fit the 4-byte prefix.
    InvalidInput,
}

/// Error returned by builder functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildError {
    pub kind: BuildErrorKind,
}

impl BuildError {
    #[must_use]
    pub fn buffer_too_small() -> Self {
        Self {
            kind: BuildErrorKind::BufferTooSmall,
        }
    }

    #[must_use]
    pub fn invalid_input() -> Self {
        Self {
            kind: BuildErrorKind::InvalidInput,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BuildErrorKind::BufferTooSmall => write!(f, "output buffer too small"),
            BuildErrorKind::InvalidInput => write!(f, "invalid wrapped key length"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuildError {}
