//! PKCS#1 v1.5 encryption padding as described in [RFC8017 § 7.2].
//!
//! [RFC8017 § 7.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.2

use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Number of framing bytes (`0x00`, `0x02`, separator) plus the minimum
/// length of the random padding string.
pub(crate) const PADDING_OVERHEAD: usize = 11;

/// Fills the provided slice with random values, which are guaranteed
/// to not be zero.
#[inline]
fn non_zero_random_bytes<R: CryptoRngCore + ?Sized>(rng: &mut R, data: &mut [u8]) {
    rng.fill_bytes(data);

    for el in data {
        while *el == 0u8 {
            rng.fill_bytes(core::slice::from_mut(el));
        }
    }
}

/// Applies the padding scheme from PKCS#1 v1.5 for encryption. The message must be no longer than
/// the length of the public modulus minus 11 bytes.
pub(crate) fn pkcs1v15_encrypt_pad<R>(
    rng: &mut R,
    msg: &[u8],
    k: usize,
) -> Result<Zeroizing<Vec<u8>>>
where
    R: CryptoRngCore + ?Sized,
{
    if msg.len() + PADDING_OVERHEAD > k {
        return Err(Error::MessageTooLong);
    }

    // EM = 0x00 || 0x02 || PS || 0x00 || M
    let mut em = Zeroizing::new(vec![0u8; k]);
    em[1] = 2;
    non_zero_random_bytes(rng, &mut em[2..k - msg.len() - 1]);
    em[k - msg.len() - 1] = 0;
    em[k - msg.len()..].copy_from_slice(msg);
    Ok(em)
}

/// Removes the encryption padding scheme from PKCS#1 v1.5.
///
/// `em` is the minimal big-endian form of the decrypted integer, so the
/// leading `0x00` of the block is normally already gone; any zero bytes that
/// remain in front are skipped. What is left must be exactly `k - 1` bytes,
/// start with `0x02`, and contain a `0x00` separator after the marker.
///
/// Whether this function fails discloses information about the plaintext.
/// No attempt is made to hide it.
pub(crate) fn pkcs1v15_encrypt_unpad(em: &[u8], k: usize) -> Result<&[u8]> {
    let start = em.iter().position(|&b| b != 0).unwrap_or(em.len());
    let block = &em[start..];

    if k < PADDING_OVERHEAD || block.len() + 1 != k || block[0] != 2 {
        return Err(Error::BadPadding);
    }

    let separator = block[1..]
        .iter()
        .position(|&b| b == 0)
        .ok_or(Error::BadPadding)?;

    Ok(&block[separator + 2..])
}
