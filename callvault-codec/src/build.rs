use crate::consts::FIXED_OVERHEAD;
use crate::error::BuildError;
use crate::types::Envelope;

/// A cursor-based writer into a caller-provided byte buffer.
pub struct EnvelopeWriter<'buf> {
    buf: &'buf mut [u8],
    pos: usize,
}

impl<'buf> EnvelopeWriter<'buf> {
    /// Create a new writer over the given buffer.
    pub fn new(buf: &'buf mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.pos
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), BuildError> {
        if self.pos + data.len() > self.buf.len() {
            return Err(BuildError::buffer_too_small());
        }
        self.buf[self.pos..self.pos + data.len()].copy_from_slice(data);
        self.pos += data.len();
        Ok(())
    }

    fn write_u32_be(&mut self, value: u32) -> Result<(), BuildError> {
        self.write_bytes(&value.to_be_bytes())
    }
}

/// Encoded size of an envelope with the given wrapped-key and ciphertext lengths.
#[must_use]
pub fn encoded_len(wrapped_key_len: usize, ciphertext_len: usize) -> usize {
    FIXED_OVERHEAD + wrapped_key_len + ciphertext_len
}

/// Serialize an envelope into `buf`, returning the number of bytes written.
///
/// Nothing is written unless the whole envelope fits.
pub fn build_envelope(envelope: &Envelope<'_>, buf: &mut [u8]) -> Result<usize, BuildError> {
    if envelope.wrapped_key.is_empty() {
        return Err(BuildError::invalid_input());
    }
    let key_len =
        u32::try_from(envelope.wrapped_key.len()).map_err(|_| BuildError::invalid_input())?;
    if buf.len() < envelope.encoded_len() {
        return Err(BuildError::buffer_too_small());
    }

    let mut w = EnvelopeWriter::new(buf);
    w.write_u32_be(key_len)?;
    w.write_bytes(envelope.wrapped_key)?;
    w.write_bytes(envelope.nonce)?;
    w.write_bytes(envelope.ciphertext)?;
    w.write_bytes(envelope.tag)?;
    Ok(w.written())
}
