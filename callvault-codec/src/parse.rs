use crate::consts::{LENGTH_PREFIX_SIZE, MIN_WRAPPED_KEY_SIZE, NONCE_SIZE, TAG_SIZE};
use crate::error::FormatError;
use crate::types::{Envelope, ParseLimits};

/// A forward-only cursor over the envelope bytes.
struct EnvelopeReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> EnvelopeReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Take exactly `n` bytes, or fail with `Truncated` at the current offset.
    fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if self.remaining() < n {
            return Err(FormatError::truncated(self.pos));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<&'a [u8; N], FormatError> {
        let start = self.pos;
        let bytes = self.take(N)?;
        bytes.try_into().map_err(|_| FormatError::truncated(start))
    }

    /// Everything after the cursor.
    fn rest(&mut self) -> &'a [u8] {
        let out = &self.data[self.pos..];
        self.pos = self.data.len();
        out
    }
}

/// Read only the 4-byte wrapped-key length prefix.
///
/// Useful for diagnostics; performs no bounds check on the value.
pub fn read_wrapped_key_len(data: &[u8]) -> Result<u32, FormatError> {
    let mut reader = EnvelopeReader::new(data);
    let prefix = reader.take_array::<LENGTH_PREFIX_SIZE>()?;
    Ok(u32::from_be_bytes(*prefix))
}

/// Parse an envelope using the default limits.
pub fn parse_envelope(data: &[u8]) -> Result<Envelope<'_>, FormatError> {
    parse_envelope_with(data, &ParseLimits::default())
}

/// Parse an envelope into borrowed wrapped key, nonce, ciphertext and tag.
///
/// The length prefix is bounds-checked before it is used to slice, so a
/// hostile prefix can never cause a large allocation or an out-of-range read.
pub fn parse_envelope_with<'a>(
    data: &'a [u8],
    limits: &ParseLimits,
) -> Result<Envelope<'a>, FormatError> {
    let mut reader = EnvelopeReader::new(data);

    let prefix = reader.take_array::<LENGTH_PREFIX_SIZE>()?;
    let declared = u32::from_be_bytes(*prefix);
    let key_len = usize::try_from(declared).map_err(|_| FormatError::key_length_out_of_bounds(0))?;
    if key_len < MIN_WRAPPED_KEY_SIZE || key_len > limits.max_wrapped_key_len {
        return Err(FormatError::key_length_out_of_bounds(0));
    }

    if let Some(expected) = limits.expected_len {
        if data.len() > expected {
            return Err(FormatError::trailing_data(expected));
        }
        if data.len() < expected {
            return Err(FormatError::truncated(data.len()));
        }
    }

    let wrapped_key = reader.take(key_len)?;
    let nonce = reader.take_array::<NONCE_SIZE>()?;

    let tail_start = reader.pos;
    let tail = reader.rest();
    if tail.len() < TAG_SIZE {
        return Err(FormatError::truncated(tail_start));
    }
    let (ciphertext, tag) = tail.split_at(tail.len() - TAG_SIZE);
    let tag: &[u8; TAG_SIZE] = tag
        .try_into()
        .map_err(|_| FormatError::truncated(tail_start))?;

    Ok(Envelope {
        wrapped_key,
        nonce,
        ciphertext,
        tag,
    })
}
