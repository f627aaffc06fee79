//! Byte encoding of message text before padding.
//!
//! Text is handled as a sequence of UTF-16 code units, each written as one,
//! two or three bytes:
//!
//! | code unit         | bytes                          |
//! |-------------------|--------------------------------|
//! | `0x0000..=0x007F` | `0xxxxxxx`                     |
//! | `0x0080..=0x07FF` | `110xxxxx 10xxxxxx`            |
//! | `0x0800..=0xFFFF` | `1110xxxx 10xxxxxx 10xxxxxx`   |
//!
//! On the Basic Multilingual Plane this is byte-for-byte UTF-8. Characters
//! beyond it travel as two three-byte surrogate halves, which keeps blocks
//! interoperable with peers that encode text the same way.

use zeroize::Zeroizing;

/// Encodes text into its multi-byte form.
pub(crate) fn encode(text: &str) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(text.len()));

    for unit in text.encode_utf16() {
        match unit {
            0x0000..=0x007f => out.push(unit as u8),
            0x0080..=0x07ff => {
                out.push(0xc0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3f) as u8);
            }
            _ => {
                out.push(0xe0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3f) as u8);
                out.push(0x80 | (unit & 0x3f) as u8);
            }
        }
    }

    out
}

/// Returns the number of bytes [`encode`] produces for `text`.
pub(crate) fn encoded_len(text: &str) -> usize {
    text.encode_utf16()
        .map(|unit| match unit {
            0x0000..=0x007f => 1,
            0x0080..=0x07ff => 2,
            _ => 3,
        })
        .sum()
}

/// Decodes the multi-byte form back into text.
///
/// The lead byte alone selects the sequence length; continuation bytes only
/// contribute their low six bits. Returns `None` for a truncated sequence or
/// when the code units do not form valid UTF-16.
pub(crate) fn decode(bytes: &[u8]) -> Option<String> {
    let mut units = Zeroizing::new(Vec::with_capacity(bytes.len()));
    let mut iter = bytes.iter().copied();

    while let Some(c) = iter.next() {
        let unit = match c {
            0x00..=0x7f => u16::from(c),
            0xc0..=0xdf => {
                let c2 = iter.next()?;
                (u16::from(c & 0x1f) << 6) | u16::from(c2 & 0x3f)
            }
            _ => {
                let c2 = iter.next()?;
                let c3 = iter.next()?;
                (u16::from(c & 0x0f) << 12) | (u16::from(c2 & 0x3f) << 6) | u16::from(c3 & 0x3f)
            }
        };
        units.push(unit);
    }

    String::from_utf16(&units).ok()
}
