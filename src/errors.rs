//! Error types.

/// Alias for [`core::result::Result`] with the crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A serialized key is malformed, incomplete or inconsistent.
    #[error("invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// The message does not fit into the modulus once padded.
    #[error("message too long")]
    MessageTooLong,

    /// The decrypted block is not a valid PKCS#1 v1.5 type 2 block.
    ///
    /// Corrupted ciphertexts, wrong keys and malformed input all end up here.
    #[error("bad padding")]
    BadPadding,

    /// A private-key operation was requested from a public-only key.
    #[error("private key material is missing")]
    MissingPrivateKey,

    /// Key generation used up its attempt budget without producing a key.
    #[error("key generation exhausted after {attempts} attempts")]
    GenerationExhausted {
        /// Number of prime-pair attempts made.
        attempts: usize,
    },

    /// The requested modulus size cannot produce a usable key.
    #[error("invalid modulus")]
    InvalidModulus,

    /// The public exponent is unusable (too small, or even where oddness is required).
    #[error("invalid exponent")]
    InvalidExponent,

    /// A prime factor is inconsistent with the rest of the key.
    #[error("invalid prime value")]
    InvalidPrime,

    /// Generation parameters could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidKeyFormat(err.to_string())
    }
}
