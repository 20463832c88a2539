#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

pub mod consts;
pub mod error;
pub mod types;

pub mod build;
pub mod parse;

pub use error::{BuildError, BuildErrorKind, FormatError, FormatErrorKind};
pub use types::{Envelope, ParseLimits};

pub use build::{build_envelope, encoded_len};
pub use parse::{parse_envelope, parse_envelope_with, read_wrapped_key_len};
