//! Generic RSA implementation

use num_bigint::{BigUint, IntoBigUint, ModInverse};
use num_traits::{One, Zero};
use zeroize::Zeroize;

use crate::errors::{Error, Result};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// ⚠️ Raw RSA encryption of m with the public key. No padding is performed.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Use this function with great care! Raw RSA should never be used without an appropriate padding
/// scheme. See the [module-level documentation][crate::hazmat] for more information.
#[inline]
pub fn rsa_encrypt<K: PublicKeyParts>(key: &K, m: &BigUint) -> Result<BigUint> {
    Ok(m.modpow(key.e(), key.n()))
}

/// ⚠️ Performs raw RSA decryption with no padding or error checking.
///
/// Returns a plaintext `BigUint`. When the key carries its prime factors and
/// the precomputed CRT values, the exponentiation is split over `p` and `q`;
/// otherwise it falls back to `c^d mod n`. Both paths yield the same value.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Use this function with great care! Raw RSA should never be used without an appropriate padding
/// scheme. See the [module-level documentation][crate::hazmat] for more information.
#[inline]
pub fn rsa_decrypt(priv_key: &impl PrivateKeyParts, c: &BigUint) -> Result<BigUint> {
    if priv_key.n().is_zero() {
        return Err(Error::InvalidModulus);
    }

    // Out-of-range input is reported like any other undecryptable block.
    if c >= priv_key.n() {
        return Err(Error::BadPadding);
    }

    let primes = priv_key.primes();
    let m = match (priv_key.dp(), priv_key.dq(), priv_key.qinv()) {
        (Some(dp), Some(dq), Some(qinv)) if primes.len() == 2 => {
            // We have the precalculated values needed for the CRT.
            let p = &primes[0];
            let q = &primes[1];

            let mut xp = (c % p).modpow(dp, p);
            let mut xq = (c % q).modpow(dq, q);

            while xp < xq {
                xp += p;
            }

            let mut h = ((&xp - &xq) * qinv) % p;
            let m = &h * q + &xq;

            // clear tmp values
            xp.zeroize();
            xq.zeroize();
            h.zeroize();

            m
        }
        _ => c.modpow(priv_key.d(), priv_key.n()),
    };

    Ok(m)
}

/// Computes `a^-1 mod m`, or `None` when `a` and `m` are not coprime.
pub(crate) fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    a.clone().mod_inverse(m).and_then(IntoBigUint::into_biguint)
}

/// Computes the modulus from the given prime factors.
pub(crate) fn compute_modulus(primes: &[BigUint]) -> BigUint {
    primes.iter().fold(BigUint::one(), |acc, prime| acc * prime)
}

/// Computes the private exponent `d = exp^-1 mod φ(n)` using Euler's totient.
///
/// Fails with [`Error::InvalidExponent`] when `exp` shares a factor with φ(n).
pub(crate) fn compute_private_exponent_euler_totient(
    primes: &[BigUint],
    exp: &BigUint,
) -> Result<BigUint> {
    if primes.len() < 2 {
        return Err(Error::InvalidPrime);
    }

    let mut totient = BigUint::one();
    for prime in primes {
        if prime <= &BigUint::one() {
            return Err(Error::InvalidPrime);
        }
        totient *= prime - BigUint::one();
    }

    let d = mod_inverse(exp, &totient).ok_or(Error::InvalidExponent);
    totient.zeroize();
    d
}
