//! Key generation parameters.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Default modulus size in bits.
pub const DEFAULT_BITS: usize = 2048;

/// Default public exponent, `0x10001`.
pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

/// Default number of extra Miller-Rabin rounds. Together with the base-2
/// round and the Lucas test this bounds the error probability by 2⁻²⁰.
pub const DEFAULT_PRIMALITY_ROUNDS: usize = 10;

/// Default number of prime candidates drawn before generation gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100_000;

/// Smallest modulus size accepted for generation.
pub const MIN_BITS: usize = 16;

/// Parameters for RSA key generation.
///
/// Missing fields take their defaults when deserializing, so a config file
/// only needs to name what it changes:
///
/// ```
/// use textbook_rsa::GenerationConfig;
///
/// let config = GenerationConfig::from_json(r#"{ "bits": 1024 }"#).unwrap();
/// assert_eq!(config.bits, 1024);
/// assert_eq!(config.public_exponent, 0x10001);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Size of the modulus `n` in bits.
    pub bits: usize,
    /// Public exponent `e`. Must be odd and at least 3.
    pub public_exponent: u64,
    /// Rounds handed to the probabilistic primality test.
    pub primality_rounds: usize,
    /// Upper bound on prime candidates drawn from the entropy source.
    pub max_attempts: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            bits: DEFAULT_BITS,
            public_exponent: DEFAULT_PUBLIC_EXPONENT,
            primality_rounds: DEFAULT_PRIMALITY_ROUNDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl GenerationConfig {
    /// Default parameters for a modulus of `bits` bits.
    pub fn new(bits: usize) -> Self {
        Self {
            bits,
            ..Self::default()
        }
    }

    /// Parses a JSON config object.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|err| Error::InvalidConfig(err.to_string()))
    }

    /// Sets the modulus size.
    pub fn with_bits(mut self, bits: usize) -> Self {
        self.bits = bits;
        self
    }

    /// Sets the public exponent.
    pub fn with_public_exponent(mut self, exp: u64) -> Self {
        self.public_exponent = exp;
        self
    }

    /// Sets the primality test round count.
    pub fn with_primality_rounds(mut self, rounds: usize) -> Self {
        self.primality_rounds = rounds;
        self
    }

    /// Sets the candidate budget.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Checks that the parameters can produce a key at all.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.bits < MIN_BITS {
            return Err(Error::InvalidModulus);
        }
        if self.public_exponent < 3 || self.public_exponent % 2 == 0 {
            return Err(Error::InvalidExponent);
        }

        Ok(())
    }
}
