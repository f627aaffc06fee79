use core::fmt;
use core::hash::{Hash, Hasher};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithms::generate::generate_key;
use crate::algorithms::rsa::{
    compute_modulus, compute_private_exponent_euler_totient, mod_inverse,
};
use crate::config::GenerationConfig;
use crate::errors::{Error, Result};
use crate::pkcs1v15;
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// Represents the public part of an RSA key.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct RsaPublicKey {
    /// Modulus: product of prime numbers `p` and `q`
    n: BigUint,
    /// Public exponent: power to which a plaintext message is raised in
    /// order to encrypt it.
    e: BigUint,
}

/// Represents a whole RSA key, public and private parts.
#[derive(Clone)]
pub struct RsaPrivateKey {
    /// Public components of the private key.
    pubkey_components: RsaPublicKey,
    /// Private exponent
    pub(crate) d: BigUint,
    /// Prime factors of N, either empty or `[p, q]`.
    pub(crate) primes: Vec<BigUint>,
    /// precomputed values to speed up private operations
    pub(crate) precomputed: Option<PrecomputedValues>,
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("pubkey_components", &self.pubkey_components)
            .finish_non_exhaustive()
    }
}

impl Eq for RsaPrivateKey {}
impl PartialEq for RsaPrivateKey {
    #[inline]
    fn eq(&self, other: &RsaPrivateKey) -> bool {
        self.pubkey_components == other.pubkey_components
            && self.d == other.d
            && self.primes == other.primes
    }
}

impl AsRef<RsaPublicKey> for RsaPrivateKey {
    fn as_ref(&self) -> &RsaPublicKey {
        &self.pubkey_components
    }
}

impl Hash for RsaPrivateKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Domain separator for RSA private keys
        state.write(b"RsaPrivateKey");
        Hash::hash(&self.pubkey_components, state);
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.d.zeroize();
        self.primes.zeroize();
        self.precomputed.zeroize();
    }
}

impl ZeroizeOnDrop for RsaPrivateKey {}

/// CRT values derived from the private exponent and the two primes.
#[derive(Clone)]
pub(crate) struct PrecomputedValues {
    /// D mod (P-1)
    pub(crate) dp: BigUint,
    /// D mod (Q-1)
    pub(crate) dq: BigUint,
    /// Q^-1 mod P
    pub(crate) qinv: BigUint,
}

impl PrecomputedValues {
    fn new(d: &BigUint, p: &BigUint, q: &BigUint) -> Result<Self> {
        let dp = d % (p - BigUint::one());
        let dq = d % (q - BigUint::one());
        let qinv = mod_inverse(q, p).ok_or(Error::InvalidPrime)?;

        Ok(Self { dp, dq, qinv })
    }
}

impl Zeroize for PrecomputedValues {
    fn zeroize(&mut self) {
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

impl Drop for PrecomputedValues {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl From<RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: RsaPrivateKey) -> Self {
        (&private_key).into()
    }
}

impl From<&RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: &RsaPrivateKey) -> Self {
        private_key.to_public_key()
    }
}

impl PublicKeyParts for RsaPublicKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl RsaPublicKey {
    /// Create a new public key from its components.
    ///
    /// The modulus must be odd and greater than one, the exponent at least 2.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        let k = Self { n, e };
        check_public(&k)?;
        Ok(k)
    }

    /// Create a new public key, bypassing checks around the modulus and
    /// public exponent size.
    ///
    /// This method is not recommended, and only intended for unusual use cases.
    /// Most applications should use [`RsaPublicKey::new`] instead.
    pub fn new_unchecked(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }

    /// Encrypts `text` and returns the ciphertext as fixed-width lowercase
    /// hex, two digits per modulus byte.
    ///
    /// The padding string is drawn from `rng` on every call.
    pub fn encrypt<R: CryptoRngCore + ?Sized>(&self, rng: &mut R, text: &str) -> Result<String> {
        pkcs1v15::encrypt_text(rng, self, text)
    }

    /// Encrypts raw bytes, returning exactly [`PublicKeyParts::size`] bytes.
    pub fn encrypt_bytes<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        pkcs1v15::encrypt(rng, self, msg)
    }
}

impl PublicKeyParts for RsaPrivateKey {
    fn n(&self) -> &BigUint {
        &self.pubkey_components.n
    }

    fn e(&self) -> &BigUint {
        &self.pubkey_components.e
    }
}

impl RsaPrivateKey {
    /// Generate a new RSA key pair of the given bit size using the default
    /// public exponent `65537`.
    pub fn new<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Result<RsaPrivateKey> {
        Self::generate(rng, &GenerationConfig::new(bit_size))
    }

    /// Generate a new RSA key pair of the given bit size and the public
    /// exponent using the passed in `rng`.
    pub fn new_with_exp<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        bit_size: usize,
        exp: u64,
    ) -> Result<RsaPrivateKey> {
        Self::generate(
            rng,
            &GenerationConfig::new(bit_size).with_public_exponent(exp),
        )
    }

    /// Generate a new RSA key pair as described by `config`.
    pub fn generate<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        config: &GenerationConfig,
    ) -> Result<RsaPrivateKey> {
        let components = generate_key(rng, config)?;
        RsaPrivateKey::from_components(
            components.n,
            components.e,
            components.d,
            components.primes,
        )
    }

    /// Constructs an RSA key pair from individual components.
    ///
    /// `primes` is either empty, in which case private operations use `d`
    /// directly, or holds exactly the two factors of `n`. The key is
    /// validated and the CRT values are computed when the primes are known.
    pub fn from_components(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        primes: Vec<BigUint>,
    ) -> Result<RsaPrivateKey> {
        let mut k = RsaPrivateKey {
            pubkey_components: RsaPublicKey { n, e },
            d,
            primes,
            precomputed: None,
        };

        k.validate()?;
        k.precompute()?;

        Ok(k)
    }

    /// Constructs an RSA key pair from its two primes `p` and `q` and the
    /// public exponent. The private exponent is derived from them.
    pub fn from_p_q(p: BigUint, q: BigUint, public_exponent: BigUint) -> Result<RsaPrivateKey> {
        if p == q {
            return Err(Error::InvalidPrime);
        }

        let primes = vec![p, q];
        let d = compute_private_exponent_euler_totient(&primes, &public_exponent)?;
        let n = compute_modulus(&primes);

        Self::from_components(n, public_exponent, d, primes)
    }

    /// Constructs a key that knows only `n`, `e` and `d`. Private operations
    /// fall back to `c^d mod n`.
    pub fn from_private_exponent(n: BigUint, e: BigUint, d: BigUint) -> Result<RsaPrivateKey> {
        Self::from_components(n, e, d, Vec::new())
    }

    /// Get the public key from the private key, cloning `n` and `e`.
    ///
    /// Generally this is not needed since `RsaPrivateKey` implements the `PublicKey` trait,
    /// but it can occasionally be useful to discard the private information entirely.
    pub fn to_public_key(&self) -> RsaPublicKey {
        self.pubkey_components.clone()
    }

    /// Performs some calculations to speed up private key operations.
    pub fn precompute(&mut self) -> Result<()> {
        if self.precomputed.is_some() {
            return Ok(());
        }

        if let [p, q] = self.primes.as_slice() {
            let values = PrecomputedValues::new(&self.d, p, q)?;
            self.precomputed = Some(values);
        }

        Ok(())
    }

    /// Clears precomputed values by setting to None
    pub fn clear_precomputed(&mut self) {
        self.precomputed = None;
    }

    /// Compute CRT coefficient: `(1/q) mod p`.
    pub fn crt_coefficient(&self) -> Option<BigUint> {
        match self.primes.as_slice() {
            [p, q] => mod_inverse(q, p),
            _ => None,
        }
    }

    /// Performs basic sanity checks on the key.
    /// Returns `Ok(())` if everything is good, otherwise an appropriate error.
    pub fn validate(&self) -> Result<()> {
        check_public(self)?;

        match self.primes.as_slice() {
            [] => {
                // Without the factors, check that d inverts e on a fixed witness.
                let two = BigUint::from(2u8);
                if two.modpow(&self.d, self.n()).modpow(self.e(), self.n()) != two {
                    return Err(Error::InvalidExponent);
                }
            }
            primes @ [_, _] => {
                // Check that Πprimes == n.
                let mut m = BigUint::one();
                for prime in primes {
                    // Any primes ≤ 1 will cause divide-by-zero panics later.
                    if *prime <= BigUint::one() {
                        return Err(Error::InvalidPrime);
                    }
                    m *= prime;
                }
                if m != self.pubkey_components.n {
                    return Err(Error::InvalidModulus);
                }

                // Check that de ≡ 1 mod p-1, for each prime.
                // This implies that e is coprime to each p-1 as e has a multiplicative
                // inverse. Therefore e is coprime to lcm(p-1,q-1) = λ(N).
                // It also implies that a^de ≡ a mod p as a^(p-1) ≡ 1 mod p. Thus a^de ≡ a
                // mod n for all a coprime to n, as required.
                let de = &self.d * self.e();
                for prime in primes {
                    if !(&de % (prime - BigUint::one())).is_one() {
                        return Err(Error::InvalidExponent);
                    }
                }
            }
            _ => return Err(Error::InvalidPrime),
        }

        Ok(())
    }

    /// Decrypts a hex ciphertext produced by [`RsaPublicKey::encrypt`].
    ///
    /// Malformed hex, out-of-range ciphertexts and broken padding all fail
    /// with [`Error::BadPadding`].
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        pkcs1v15::decrypt_text(self, ciphertext)
    }

    /// Decrypts a big-endian ciphertext produced by
    /// [`RsaPublicKey::encrypt_bytes`].
    pub fn decrypt_bytes(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        pkcs1v15::decrypt(self, ciphertext)
    }
}

impl PrivateKeyParts for RsaPrivateKey {
    fn d(&self) -> &BigUint {
        &self.d
    }

    fn primes(&self) -> &[BigUint] {
        &self.primes
    }

    fn dp(&self) -> Option<&BigUint> {
        self.precomputed.as_ref().map(|p| &p.dp)
    }

    fn dq(&self) -> Option<&BigUint> {
        self.precomputed.as_ref().map(|p| &p.dq)
    }

    fn qinv(&self) -> Option<&BigUint> {
        self.precomputed.as_ref().map(|p| &p.qinv)
    }
}

/// An RSA key that may or may not carry its private half.
///
/// Public keys only encrypt; asking one to decrypt fails with
/// [`Error::MissingPrivateKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPair {
    /// Only `n` and `e` are known.
    Public(RsaPublicKey),
    /// The full private key.
    Private(RsaPrivateKey),
}

impl From<RsaPublicKey> for KeyPair {
    fn from(key: RsaPublicKey) -> Self {
        KeyPair::Public(key)
    }
}

impl From<RsaPrivateKey> for KeyPair {
    fn from(key: RsaPrivateKey) -> Self {
        KeyPair::Private(key)
    }
}

impl KeyPair {
    /// Generates a fresh private key.
    pub fn generate<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        config: &GenerationConfig,
    ) -> Result<Self> {
        RsaPrivateKey::generate(rng, config).map(KeyPair::Private)
    }

    /// Builds a public-only key from `n` and `e`.
    pub fn from_public(n: BigUint, e: BigUint) -> Result<Self> {
        RsaPublicKey::new(n, e).map(KeyPair::Public)
    }

    /// Builds a private key from its components. See
    /// [`RsaPrivateKey::from_components`].
    pub fn from_private(n: BigUint, e: BigUint, d: BigUint, primes: Vec<BigUint>) -> Result<Self> {
        RsaPrivateKey::from_components(n, e, d, primes).map(KeyPair::Private)
    }

    /// Returns the public half.
    pub fn public_key(&self) -> &RsaPublicKey {
        match self {
            KeyPair::Public(key) => key,
            KeyPair::Private(key) => key.as_ref(),
        }
    }

    /// Returns the private key, if there is one.
    pub fn private_key(&self) -> Option<&RsaPrivateKey> {
        match self {
            KeyPair::Public(_) => None,
            KeyPair::Private(key) => Some(key),
        }
    }

    /// Whether private operations are available.
    pub fn is_private(&self) -> bool {
        matches!(self, KeyPair::Private(_))
    }

    /// Encrypts `text` with the public half. See [`RsaPublicKey::encrypt`].
    pub fn encrypt<R: CryptoRngCore + ?Sized>(&self, rng: &mut R, text: &str) -> Result<String> {
        self.public_key().encrypt(rng, text)
    }

    /// Decrypts a hex ciphertext. See [`RsaPrivateKey::decrypt`].
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        self.require_private()?.decrypt(ciphertext)
    }

    /// Private exponent.
    pub fn d(&self) -> Option<&BigUint> {
        self.private_key().map(PrivateKeyParts::d)
    }

    /// Larger prime factor.
    pub fn p(&self) -> Option<&BigUint> {
        self.private_key().and_then(|key| key.primes().first())
    }

    /// Smaller prime factor.
    pub fn q(&self) -> Option<&BigUint> {
        self.private_key().and_then(|key| key.primes().get(1))
    }

    /// `d mod (p - 1)`
    pub fn dmp1(&self) -> Option<&BigUint> {
        self.private_key().and_then(PrivateKeyParts::dp)
    }

    /// `d mod (q - 1)`
    pub fn dmq1(&self) -> Option<&BigUint> {
        self.private_key().and_then(PrivateKeyParts::dq)
    }

    /// `q^-1 mod p`
    pub fn coeff(&self) -> Option<&BigUint> {
        self.private_key().and_then(PrivateKeyParts::qinv)
    }

    pub(crate) fn require_private(&self) -> Result<&RsaPrivateKey> {
        self.private_key().ok_or(Error::MissingPrivateKey)
    }
}

impl PublicKeyParts for KeyPair {
    fn n(&self) -> &BigUint {
        self.public_key().n()
    }

    fn e(&self) -> &BigUint {
        self.public_key().e()
    }
}

/// Check that the public key is well formed.
#[inline]
pub(crate) fn check_public(public_key: &impl PublicKeyParts) -> Result<()> {
    let n = public_key.n();
    if *n <= BigUint::one() || n.is_even() {
        return Err(Error::InvalidModulus);
    }

    if *public_key.e() < BigUint::from(2u8) {
        return Err(Error::InvalidExponent);
    }

    Ok(())
}
