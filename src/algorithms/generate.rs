//! Generate prime components for the RSA Private Key

use core::cmp::Ordering;
use core::mem;

use log::{debug, trace};
use num_bigint::{prime::probably_prime, BigUint};
use num_integer::Integer;
use num_traits::{One, ToPrimitive};
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::{
    algorithms::rsa::{compute_modulus, compute_private_exponent_euler_totient},
    config::GenerationConfig,
    errors::{Error, Result},
};

pub(crate) struct RsaPrivateKeyComponents {
    pub n: BigUint,
    pub e: BigUint,
    pub d: BigUint,
    pub primes: Vec<BigUint>,
}

/// A list of small, prime numbers that allows us to rapidly
/// exclude some fraction of composite candidates when searching for a random
/// prime. This list is truncated at the point where smallPrimesProduct exceeds
/// a u64. It does not include two because we ensure that the candidates are
/// odd by construction.
const SMALL_PRIMES: [u8; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// The product of the values in SMALL_PRIMES.
const SMALL_PRIMES_PRODUCT: u64 = 16_294_579_238_595_022_365;

/// Counts prime candidates drawn from the entropy source.
struct CandidateBudget {
    used: usize,
    max: usize,
}

impl CandidateBudget {
    fn new(max: usize) -> Self {
        Self { used: 0, max }
    }

    fn take(&mut self) -> Result<()> {
        if self.used >= self.max {
            return Err(Error::GenerationExhausted {
                attempts: self.used,
            });
        }
        self.used += 1;
        Ok(())
    }
}

/// Generates a two-prime RSA key pair as configured.
///
/// `p` receives `bits - bits / 2` bits and `q` the remaining `bits / 2`. A
/// prime is accepted only when `prime - 1` is coprime to the public exponent
/// and it passes the probabilistic primality test. The primes are ordered so
/// that `p > q`; a pair whose totient is not coprime to the exponent is
/// thrown away as a whole.
pub(crate) fn generate_key<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    config: &GenerationConfig,
) -> Result<RsaPrivateKeyComponents> {
    config.validate()?;

    let exp = BigUint::from(config.public_exponent);
    let q_bits = config.bits / 2;
    let p_bits = config.bits - q_bits;
    let mut budget = CandidateBudget::new(config.max_attempts);

    debug!(
        "generating {}-bit RSA key with e = {:#x}",
        config.bits, config.public_exponent
    );

    loop {
        let mut p =
            generate_prime_with_rng(rng, p_bits, &exp, config.primality_rounds, &mut budget)?;
        let mut q =
            generate_prime_with_rng(rng, q_bits, &exp, config.primality_rounds, &mut budget)?;

        match p.cmp(&q) {
            Ordering::Less => mem::swap(&mut p, &mut q),
            Ordering::Equal => {
                trace!("drew identical primes, discarding pair");
                continue;
            }
            Ordering::Greater => {}
        }

        let primes = vec![p, q];
        match compute_private_exponent_euler_totient(&primes, &exp) {
            Ok(d) => {
                let n = compute_modulus(&primes);
                debug!(
                    "generated {}-bit RSA key after {} prime candidates",
                    n.bits(),
                    budget.used
                );
                return Ok(RsaPrivateKeyComponents {
                    n,
                    e: exp,
                    d,
                    primes,
                });
            }
            Err(_) => trace!("totient shares a factor with e, discarding pair"),
        }
    }
}

/// Draws a random prime of exactly `bit_size` bits with `prime - 1` coprime
/// to `exp`.
///
/// Each candidate has its two most significant bits set, so the product of
/// two such primes never comes out one bit short.
fn generate_prime_with_rng<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_size: usize,
    exp: &BigUint,
    rounds: usize,
    budget: &mut CandidateBudget,
) -> Result<BigUint> {
    let mut b = bit_size % 8;
    if b == 0 {
        b = 8;
    }

    let bytes_len = (bit_size + 7) / 8;
    let mut bytes = Zeroizing::new(vec![0u8; bytes_len]);

    loop {
        budget.take()?;

        rng.fill_bytes(&mut bytes);
        // Clear bits in the first byte to make sure the candidate has a size <= bits.
        bytes[0] &= ((1u32 << (b as u32)) - 1) as u8;

        if b >= 2 {
            bytes[0] |= 3u8.wrapping_shl(b as u32 - 2);
        } else {
            // Here b==1, because b cannot be zero.
            bytes[0] |= 1;
            if bytes_len > 1 {
                bytes[1] |= 0x80;
            }
        }

        // Make the value odd since an even number this large certainly isn't prime.
        bytes[bytes_len - 1] |= 1u8;

        let mut p = BigUint::from_bytes_be(&bytes);
        let rem = match (&p % SMALL_PRIMES_PRODUCT).to_u64() {
            Some(rem) => rem,
            None => continue,
        };

        'next: for delta in (0..1u64 << 20).step_by(2) {
            let m = rem + delta;

            for prime in SMALL_PRIMES {
                if m % u64::from(prime) == 0 {
                    continue 'next;
                }
            }

            if delta > 0 {
                p += delta;
            }

            break;
        }

        // There is a tiny possibility that, by adding delta, we caused
        // the number to be one bit too long.
        if p.bits() != bit_size {
            trace!("candidate overflowed {} bits", bit_size);
            continue;
        }

        if !(&p - BigUint::one()).gcd(exp).is_one() {
            trace!("candidate - 1 shares a factor with e");
            continue;
        }

        if probably_prime(&p, rounds) {
            return Ok(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    const EXP: u64 = 65537;

    fn check_components(components: &RsaPrivateKeyComponents, bits: usize, exp: u64) {
        let p = &components.primes[0];
        let q = &components.primes[1];
        let one = BigUint::one();
        let exp = BigUint::from(exp);

        assert_eq!(components.n.bits(), bits);
        assert_eq!(&components.n, &(p * q));
        assert!(p > q);
        assert_eq!(components.e, exp);
        assert!((p - &one).gcd(&exp).is_one());
        assert!((q - &one).gcd(&exp).is_one());

        let totient = (p - &one) * (q - &one);
        assert_eq!((&components.d * &exp) % &totient, one);
        assert!(probably_prime(p, 20));
        assert!(probably_prime(q, 20));
    }

    #[test]
    fn test_impossible_keys() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);

        for i in 0..16 {
            let config = GenerationConfig::new(i);
            assert!(matches!(
                generate_key(&mut rng, &config),
                Err(Error::InvalidModulus)
            ));
        }
    }

    #[test]
    fn test_invalid_exponent() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let config = GenerationConfig::new(128).with_public_exponent(65536);
        assert!(matches!(
            generate_key(&mut rng, &config),
            Err(Error::InvalidExponent)
        ));
    }

    #[test]
    fn test_exhausted() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        // a pair needs at least two candidates
        let config = GenerationConfig::new(512).with_max_attempts(1);
        assert!(matches!(
            generate_key(&mut rng, &config),
            Err(Error::GenerationExhausted { attempts: 1 })
        ));

        let config = GenerationConfig::new(512).with_max_attempts(0);
        assert!(matches!(
            generate_key(&mut rng, &config),
            Err(Error::GenerationExhausted { attempts: 0 })
        ));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let config = GenerationConfig::new(256);
        let a = generate_key(&mut ChaCha8Rng::from_seed([7; 32]), &config).unwrap();
        let b = generate_key(&mut ChaCha8Rng::from_seed([7; 32]), &config).unwrap();
        assert_eq!(a.n, b.n);
        assert_eq!(a.d, b.d);
        assert_eq!(a.primes, b.primes);
    }

    #[test]
    fn test_small_exponent() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let config = GenerationConfig::new(256).with_public_exponent(3);
        let components = generate_key(&mut rng, &config).unwrap();
        check_components(&components, 256, 3);
    }

    #[test]
    fn test_odd_bit_size() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let components = generate_key(&mut rng, &GenerationConfig::new(129)).unwrap();
        check_components(&components, 129, EXP);
        assert_eq!(components.primes[0].bits(), 65);
        assert_eq!(components.primes[1].bits(), 64);
    }

    #[test]
    fn test_prime_candidates() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let exp = BigUint::from(EXP);
        for bits in [8, 9, 16, 33, 64, 100] {
            let mut budget = CandidateBudget::new(usize::MAX);
            let p = generate_prime_with_rng(&mut rng, bits, &exp, 10, &mut budget).unwrap();
            assert_eq!(p.bits(), bits);
            assert!(!(&p % 2u32).is_zero());
            assert!(probably_prime(&p, 20));
        }
    }

    macro_rules! key_generation {
        ($name:ident, $size:expr, $rounds:expr) => {
            #[test]
            fn $name() {
                let mut rng = ChaCha8Rng::from_seed([42; 32]);
                let config = GenerationConfig::new($size);
                for _ in 0..$rounds {
                    let components = generate_key(&mut rng, &config).unwrap();
                    check_components(&components, $size, EXP);
                }
            }
        };
    }

    key_generation!(key_generation_16, 16, 10);
    key_generation!(key_generation_128, 128, 10);
    key_generation!(key_generation_512, 512, 5);
    key_generation!(key_generation_1024, 1024, 2);
}
