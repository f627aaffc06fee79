//! PKCS#1 v1.5 encryption as described in [RFC8017 § 7.2].
//!
//! Text is carried through the padding in its multi-byte form (see
//! [`encode`]); ciphertexts travel as fixed-width lowercase hex.
//!
//! [RFC8017 § 7.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.2

use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::algorithms::multibyte;
use crate::algorithms::pad::{uint_from_hex, uint_to_be_pad, uint_to_hex_pad, uint_to_zeroizing_be};
use crate::algorithms::pkcs1v15::*;
use crate::algorithms::rsa::{rsa_decrypt, rsa_encrypt};
use crate::errors::{Error, Result};
use crate::key::check_public;
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// Pads `text` into a `k`-byte type 2 block and returns it as an integer.
///
/// Fails with [`Error::MessageTooLong`] when the multi-byte form of `text`
/// is longer than `k - 11` bytes.
pub fn encode<R: CryptoRngCore + ?Sized>(rng: &mut R, text: &str, k: usize) -> Result<BigUint> {
    if multibyte::encoded_len(text) + PADDING_OVERHEAD > k {
        return Err(Error::MessageTooLong);
    }

    let msg = multibyte::encode(text);
    let em = pkcs1v15_encrypt_pad(rng, &msg, k)?;
    Ok(BigUint::from_bytes_be(&em))
}

/// Strips the type 2 padding from `m` and decodes the message text.
///
/// Every failure, including a message that is not valid text, is reported
/// as [`Error::BadPadding`].
pub fn decode(m: &BigUint, k: usize) -> Result<String> {
    let em = uint_to_zeroizing_be(m.clone());
    let msg = pkcs1v15_encrypt_unpad(&em, k)?;
    multibyte::decode(msg).ok_or(Error::BadPadding)
}

/// Encrypts the given message with RSA and the padding
/// scheme from PKCS#1 v1.5.  The message must be no longer than the
/// length of the public modulus minus 11 bytes.
#[inline]
pub(crate) fn encrypt<R: CryptoRngCore + ?Sized, K: PublicKeyParts>(
    rng: &mut R,
    pub_key: &K,
    msg: &[u8],
) -> Result<Vec<u8>> {
    check_public(pub_key)?;

    let em = pkcs1v15_encrypt_pad(rng, msg, pub_key.size())?;
    let int = Zeroizing::new(BigUint::from_bytes_be(&em));
    uint_to_be_pad(rsa_encrypt(pub_key, &int)?, pub_key.size())
}

/// Decrypts a plaintext using RSA and the padding scheme from PKCS#1 v1.5.
///
/// Whether this function returns an error or not discloses secret
/// information. No attempt is made to hide which check failed.
#[inline]
pub(crate) fn decrypt<K: PrivateKeyParts>(priv_key: &K, ciphertext: &[u8]) -> Result<Vec<u8>> {
    check_public(priv_key)?;

    let c = BigUint::from_bytes_be(ciphertext);
    let em = uint_to_zeroizing_be(rsa_decrypt(priv_key, &c)?);
    let msg = pkcs1v15_encrypt_unpad(&em, priv_key.size())?;

    Ok(msg.to_vec())
}

/// Encrypts `text` and formats the ciphertext as `2 * k` lowercase hex digits.
pub(crate) fn encrypt_text<R: CryptoRngCore + ?Sized, K: PublicKeyParts>(
    rng: &mut R,
    pub_key: &K,
    text: &str,
) -> Result<String> {
    check_public(pub_key)?;

    let k = pub_key.size();
    let m = Zeroizing::new(encode(rng, text, k)?);
    let c = rsa_encrypt(pub_key, &m)?;
    uint_to_hex_pad(&c, k)
}

/// Decrypts a hex ciphertext back into text.
pub(crate) fn decrypt_text<K: PrivateKeyParts>(priv_key: &K, ciphertext: &str) -> Result<String> {
    check_public(priv_key)?;

    let c = uint_from_hex(ciphertext).ok_or(Error::BadPadding)?;
    let m = Zeroizing::new(rsa_decrypt(priv_key, &c)?);
    decode(&m, priv_key.size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use num_traits::Num;
    use rand_chacha::{
        rand_core::{RngCore, SeedableRng},
        ChaCha8Rng,
    };

    use crate::{RsaPrivateKey, RsaPublicKey};

    fn get_private_key() -> RsaPrivateKey {
        // https://github.com/C2SP/wycheproof/blob/main/testvectors/rsa_oaep_misc_test.json
        RsaPrivateKey::from_components(
            BigUint::from_str_radix("d0941e63a980fa92fb25ed4c7b3307f827023034ae7f1a7491f0699ca7607285e62ad8e994bac21b8b6e305e334f4874067d28e304230dca7f0e85f7ce595770b6e054c9f844ba86c0696eeba0769d8d4a347e8fe85c724ac1c44994af18a39e719f721f1bc50c46a39e6c075fcd1649f01f22608ce7dc6955502258336987d9", 16).unwrap(),
            BigUint::from(65_537u64),
            BigUint::from_str_radix("5ff4a47e690ea338573e3d8b3fea5c32378ff4296855a51017cba86a9f3de9b1dc0fbe36c76b9bbd1c4a170a5f448c2a8489b3f3ac858be4aacb3daaa14dccc183622eedd3ae6f0427a2a298b51b97818a5430f13705f42d8b25476f939c935e389e30d9ade5d0180920135f5aef0c5fecd15f00b83b51dab8ba930d88826801", 16).unwrap(),
            vec![
                BigUint::from_str_radix("e882d12d5f0be26a80359f13c08210bdcbf759dfee695313efa8886919659b064e3c656a267af6275ed1af89a5dfe9e25b31a02bafbd59445b7507a22989a681", 16).unwrap(),
                BigUint::from_str_radix("e5a65cfa668bd857d59135a78c18c8adb7c222368e9d74abad8e83299f7ac3c2ad7aa44ddb05deea6d9b20dbaf09a8615284a17c72d3723240334685ea7e2559", 16).unwrap(),
            ],
        ).unwrap()
    }

    const TESTS: [(&str, &str); 4] = [
        (
            "7f47f8aac36e9cac5182c6a0e7fa7700447bba8aacfc6ba97b7de4b895860242e3a1b2ec2eccf1a7bbb056781ea31a438bceeb4dc27dcb449bbb641f9d5fcabf01078ae43c34bd45091b78ba3c2036d426b3d5c78e44de2d45fdb5aa68c5d0344212ec8db95915d6f77c0bd95c718a3d305d1e4c47bade8b1c6dfb4b16c77906",
            "x",
        ),
        (
            "97e2f8f8276b81c149f4b9e0a6903ea3ba5900a999b381aee5c46cba6ece0238b4f9735a99368f2b182d022a3903c96d44b271adf6674453883b29f8f7ae2f30807661f546fd56a4fff90b227feb6e06951a77665b142e47aca412bb8ebaa9f9254aafe091da5b7d1a0f312409ba575a9149edd85fad665d4afe172a9b7d718e",
            "testing.",
        ),
        (
            "26d9696379537829a4451ac881fb8e5c7d2e6cc38bd54fe7ea733aafa905da2b9188520f6a97c4cc7176592beb6f16576bc833268d4fb8026227a572f74bce59b3f8dd51172e4e70c8664f78fc074355b039c13eea8919f63f739809809d05326948cf7e1c320c2eb839b8e248a7883c2612b1d511cbf67aee571367a249f3ef",
            "testing.\n",
        ),
        (
            "4dccaa2398eb1b2967e40b29aa7bd64a13c88ca219b576cd0297fd4ea019aec977d514be93a6e5109cba61565ea30f502a2b3e53221ccf4f273065ff0f7966fc90386f0a7204502f485af630d8cda4687d42a11c1abc88d02a4b0357f2e7ac7b60607f6347896579d28fdd6e746b9b253108f542d3a2ea0500ac685aaee2a137",
            "01234567890123456789012345678901234567890123456789012",
        ),
    ];

    #[test]
    fn test_decrypt_pkcs1v15() {
        let priv_key = get_private_key();

        for (ciphertext, plaintext) in TESTS {
            assert_eq!(decrypt_text(&priv_key, ciphertext).unwrap(), plaintext);
            assert_eq!(priv_key.decrypt(ciphertext).unwrap(), plaintext);

            // uppercase hex is accepted as well
            let upper = ciphertext.to_uppercase();
            assert_eq!(priv_key.decrypt(&upper).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_decrypt_pkcs1v15_bytes() {
        let priv_key = get_private_key();
        let ciphertext = hex!(
            "7f47f8aac36e9cac5182c6a0e7fa7700447bba8aacfc6ba97b7de4b895860242"
            "e3a1b2ec2eccf1a7bbb056781ea31a438bceeb4dc27dcb449bbb641f9d5fcabf"
            "01078ae43c34bd45091b78ba3c2036d426b3d5c78e44de2d45fdb5aa68c5d034"
            "4212ec8db95915d6f77c0bd95c718a3d305d1e4c47bade8b1c6dfb4b16c77906"
        );
        assert_eq!(decrypt(&priv_key, &ciphertext).unwrap(), b"x");
    }

    #[test]
    fn test_decrypt_without_crt() {
        let mut priv_key = get_private_key();
        priv_key.clear_precomputed();

        for (ciphertext, plaintext) in TESTS {
            assert_eq!(decrypt_text(&priv_key, ciphertext).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_encrypt_decrypt_pkcs1v15() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let priv_key = get_private_key();
        let k = priv_key.size();

        for i in 1..100 {
            let mut input = vec![0u8; i * 8];
            rng.fill_bytes(&mut input);
            if input.len() > k - 11 {
                input = input[0..k - 11].to_vec();
            }

            let pub_key: RsaPublicKey = priv_key.clone().into();
            let ciphertext = encrypt(&mut rng, &pub_key, &input).unwrap();
            assert_ne!(input, ciphertext);
            assert_eq!(ciphertext.len(), k);

            let plaintext = decrypt(&priv_key, &ciphertext).unwrap();
            assert_eq!(input, plaintext);
        }
    }

    #[test]
    fn test_encrypt_decrypt_text() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let priv_key = get_private_key();
        let pub_key = priv_key.to_public_key();

        for text in ["", "hello", "sample String Value", "naïve café", "日本語", "\u{1F600}!"] {
            let ciphertext = encrypt_text(&mut rng, &pub_key, text).unwrap();
            assert_eq!(ciphertext.len(), 2 * priv_key.size());
            assert!(ciphertext
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
            assert_eq!(decrypt_text(&priv_key, &ciphertext).unwrap(), text);
        }
    }

    #[test]
    fn test_message_too_long() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let pub_key = get_private_key().to_public_key();
        let k = pub_key.size();

        // exactly at capacity
        let text = "a".repeat(k - 11);
        assert!(encrypt_text(&mut rng, &pub_key, &text).is_ok());

        let text = "a".repeat(k - 10);
        assert_eq!(
            encrypt_text(&mut rng, &pub_key, &text),
            Err(Error::MessageTooLong)
        );

        // three bytes per character once encoded
        let text = "€".repeat(40);
        assert_eq!(
            encrypt_text(&mut rng, &pub_key, &text),
            Err(Error::MessageTooLong)
        );
        let text = "€".repeat(39);
        assert!(encrypt_text(&mut rng, &pub_key, &text).is_ok());
    }

    #[test]
    fn test_decrypt_malformed_ciphertext() {
        let priv_key = get_private_key();

        for ciphertext in ["", "xyz", "0x1234", "-12", "12 34"] {
            assert_eq!(
                decrypt_text(&priv_key, ciphertext),
                Err(Error::BadPadding),
                "{ciphertext:?}"
            );
        }

        // c >= n
        let n = priv_key.n().to_str_radix(16);
        assert_eq!(decrypt_text(&priv_key, &n), Err(Error::BadPadding));
    }

    #[test]
    fn test_decrypt_missing_separator() {
        let priv_key = get_private_key();
        let k = priv_key.size();

        // 0x00 0x02 followed by non-zero bytes only
        let mut em = vec![0xffu8; k];
        em[0] = 0;
        em[1] = 2;
        let m = BigUint::from_bytes_be(&em);
        let c = rsa_encrypt(&priv_key, &m).unwrap();
        let ciphertext = uint_to_hex_pad(&c, k).unwrap();

        assert_eq!(decrypt_text(&priv_key, &ciphertext), Err(Error::BadPadding));
    }

    #[test]
    fn test_decode_rejects_invalid_text() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let k = 32;

        // a truncated two-byte sequence at the end of the message
        let em = pkcs1v15_encrypt_pad(&mut rng, &[b'a', 0xc3], k).unwrap();
        let m = BigUint::from_bytes_be(&em);
        assert_eq!(decode(&m, k), Err(Error::BadPadding));

        let m = encode(&mut rng, "ok", k).unwrap();
        assert_eq!(decode(&m, k).unwrap(), "ok");
    }
}
