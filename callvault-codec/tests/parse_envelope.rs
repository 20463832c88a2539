use callvault_codec::consts::{MAX_WRAPPED_KEY_SIZE, RSA_2048_WRAPPED_KEY_SIZE};
use callvault_codec::{
    Envelope, FormatErrorKind, ParseLimits, build_envelope, encoded_len, parse_envelope,
    parse_envelope_with,
};

const NONCE: [u8; 12] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b,
];
const TAG: [u8; 16] = [0x5a; 16];

fn encode(wrapped_key: &[u8], ciphertext: &[u8]) -> Vec<u8> {
    let env = Envelope {
        wrapped_key,
        nonce: &NONCE,
        ciphertext,
        tag: &TAG,
    };
    let mut buf = vec![0u8; encoded_len(wrapped_key.len(), ciphertext.len())];
    let n = build_envelope(&env, &mut buf).unwrap();
    assert_eq!(n, buf.len());
    buf
}

#[test]
fn parse_rsa_2048_sized_envelope() {
    let wrapped = [0x11u8; RSA_2048_WRAPPED_KEY_SIZE];
    let ciphertext = b"test-audio-bytes";
    let bytes = encode(&wrapped, ciphertext);

    assert_eq!(&bytes[..4], &[0x00, 0x00, 0x01, 0x00]);

    let env = parse_envelope(&bytes).unwrap();
    assert_eq!(env.wrapped_key, &wrapped[..]);
    assert_eq!(env.nonce, &NONCE);
    assert_eq!(env.ciphertext, ciphertext);
    assert_eq!(env.tag, &TAG);
}

#[test]
fn parse_borrows_from_input() {
    let bytes = encode(&[0x22; 8], b"abc");
    let env = parse_envelope(&bytes).unwrap();
    let base = bytes.as_ptr() as usize;
    assert_eq!(env.wrapped_key.as_ptr() as usize, base + 4);
    assert_eq!(env.nonce.as_ptr() as usize, base + 12);
    assert_eq!(env.ciphertext.as_ptr() as usize, base + 24);
    assert_eq!(env.tag.as_ptr() as usize, base + 27);
}

#[test]
fn parse_tag_only_tail() {
    let bytes = encode(&[0x22; 8], b"");
    let env = parse_envelope(&bytes).unwrap();
    assert!(env.ciphertext.is_empty());
    assert_eq!(env.tag, &TAG);
}

#[test]
fn parse_with_key_specific_bound() {
    let bytes = encode(&[0x33; 256], b"payload");
    let limits = ParseLimits::default().with_max_wrapped_key_len(256);
    assert!(parse_envelope_with(&bytes, &limits).is_ok());

    let limits = ParseLimits::default().with_max_wrapped_key_len(128);
    let err = parse_envelope_with(&bytes, &limits).unwrap_err();
    assert_eq!(err.kind, FormatErrorKind::KeyLengthOutOfBounds);
}

#[test]
fn parse_at_default_ceiling() {
    let bytes = encode(&[0x44; MAX_WRAPPED_KEY_SIZE], b"x");
    assert!(parse_envelope(&bytes).is_ok());
}

#[test]
fn parse_with_matching_expected_len() {
    let bytes = encode(&[0x55; 16], b"recorded");
    let limits = ParseLimits::default().with_expected_len(bytes.len());
    let env = parse_envelope_with(&bytes, &limits).unwrap();
    assert_eq!(env.ciphertext, b"recorded");
}
