//! Length-prefixed string framing for broker message bodies.
//!
//! Strings are encoded as a big-endian u16 byte length followed by the UTF-8
//! bytes. Decoding fails closed on truncated input or invalid UTF-8.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StringCodecError {
    #[error("string of {0} bytes exceeds the u16 length prefix")]
    TooLong(usize),
    #[error("truncated input: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },
    #[error("invalid utf-8 in string payload: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub fn encode_string(s: &str) -> Result<Vec<u8>, StringCodecError> {
    let len = s.len();
    let prefix = u16::try_from(len).map_err(|_| StringCodecError::TooLong(len))?;
    let mut buf = Vec::with_capacity(2 + len);
    buf.extend_from_slice(&prefix.to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
    Ok(buf)
}

/// Decode one length-prefixed string, returning it together with the
/// remaining input.
pub fn decode_string(buf: &[u8]) -> Result<(String, &[u8]), StringCodecError> {
    if buf.len() < 2 {
        return Err(StringCodecError::Truncated { expected: 2, got: buf.len() });
    }
    let len = u16::from_be_bytes([buf[0], buf[1]]) as usize;
    let rest = &buf[2..];
    if rest.len() < len {
        return Err(StringCodecError::Truncated { expected: len, got: rest.len() });
    }
    let s = String::from_utf8(rest[..len].to_vec())?;
    Ok((s, &rest[len..]))
}
