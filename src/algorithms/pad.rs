//! Special handling for converting the BigUint to u8 vectors

use num_bigint::BigUint;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Returns a new vector of the given length, with 0s left padded.
#[inline]
fn left_pad(input: &[u8], padded_len: usize) -> Result<Vec<u8>> {
    if input.len() > padded_len {
        return Err(Error::MessageTooLong);
    }

    let mut out = vec![0u8; padded_len];
    out[padded_len - input.len()..].copy_from_slice(input);
    Ok(out)
}

/// Converts input to the new vector of the given length, using BE and with 0s left padded.
#[inline]
pub(crate) fn uint_to_be_pad(input: BigUint, padded_len: usize) -> Result<Vec<u8>> {
    left_pad(&input.to_bytes_be(), padded_len)
}

/// Converts input to its minimal big-endian form, zeroizing the intermediate
/// integer once the bytes are taken.
#[inline]
pub(crate) fn uint_to_zeroizing_be(input: BigUint) -> Zeroizing<Vec<u8>> {
    let m = Zeroizing::new(input);
    Zeroizing::new(m.to_bytes_be())
}

/// Formats input as lowercase hex with exactly `2 * padded_len` digits.
pub(crate) fn uint_to_hex_pad(input: &BigUint, padded_len: usize) -> Result<String> {
    let digits = input.to_str_radix(16);
    let width = 2 * padded_len;
    if digits.len() > width {
        return Err(Error::MessageTooLong);
    }

    Ok(format!("{digits:0>width$}"))
}

/// Parses an unsigned hex number made only of ASCII hex digits.
///
/// Signs, prefixes and separators are rejected so that every accepted string
/// maps to exactly one integer.
pub(crate) fn uint_from_hex(input: &str) -> Option<BigUint> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    BigUint::parse_bytes(input.as_bytes(), 16)
}
