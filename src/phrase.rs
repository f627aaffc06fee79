//! Deterministic entropy from a word phrase.
//!
//! # ⚠️ Low security
//!
//! [`PhraseRng`] is only as strong as the phrase it is built from. Anyone who
//! knows or guesses the phrase can regenerate every key drawn from it. Use it
//! when keys must be reproducible from something a person can write down, and
//! prefer a system generator such as `rand_core::OsRng` everywhere else.
//! Never use it for encryption padding.

use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, RngCore, SeedableRng};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// A ChaCha20 stream keyed by the SHA-256 hash of a word phrase.
///
/// Words are split on whitespace and rejoined with single spaces before
/// hashing, so line breaks and repeated spaces do not change the stream.
///
/// ```
/// use rand_core::RngCore;
/// use textbook_rsa::PhraseRng;
///
/// let mut a = PhraseRng::new("correct horse battery staple");
/// let mut b = PhraseRng::new("  correct horse\nbattery   staple ");
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
pub struct PhraseRng {
    inner: ChaCha20Rng,
}

impl PhraseRng {
    /// Creates the stream for `phrase`.
    pub fn new(phrase: &str) -> Self {
        let normalized = Zeroizing::new(phrase.split_whitespace().collect::<Vec<_>>().join(" "));
        let digest = Sha256::digest(normalized.as_bytes());

        let mut seed = Zeroizing::new([0u8; 32]);
        seed.copy_from_slice(&digest);

        Self {
            inner: ChaCha20Rng::from_seed(*seed),
        }
    }
}

impl RngCore for PhraseRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

impl CryptoRng for PhraseRng {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GenerationConfig, RsaPrivateKey};

    #[test]
    fn test_normalization() {
        let mut a = PhraseRng::new("alpha beta gamma");
        let mut b = PhraseRng::new("\talpha  beta\r\ngamma\n");
        let mut c = PhraseRng::new("alpha beta gamma delta");

        let mut x = [0u8; 64];
        let mut y = [0u8; 64];
        let mut z = [0u8; 64];
        a.fill_bytes(&mut x);
        b.fill_bytes(&mut y);
        c.fill_bytes(&mut z);

        assert_eq!(x, y);
        assert_ne!(x, z);
    }

    #[test]
    fn test_reproducible_keys() {
        let phrase = "sample phrase for a reproducible test key";
        let config = GenerationConfig::new(512);

        let a = RsaPrivateKey::generate(&mut PhraseRng::new(phrase), &config).unwrap();
        let b = RsaPrivateKey::generate(&mut PhraseRng::new(phrase), &config).unwrap();
        assert_eq!(a, b);

        let c = RsaPrivateKey::generate(&mut PhraseRng::new("another phrase"), &config).unwrap();
        assert_ne!(a, c);
    }
}
