#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Usage
//!
//! ## Generating keys
//!
//! Key generation is driven by a [`GenerationConfig`]. Every prime candidate
//! counts against `max_attempts`, so generation either succeeds or fails with
//! [`Error::GenerationExhausted`]; it never loops forever.
//!
//! ```
//! use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
//! use textbook_rsa::{GenerationConfig, PrivateKeyParts, PublicKeyParts, RsaPrivateKey};
//!
//! let mut rng = ChaCha8Rng::from_seed([42; 32]);
//! let config = GenerationConfig::new(512).with_public_exponent(0x10001);
//! let key = RsaPrivateKey::generate(&mut rng, &config).expect("failed to generate a key");
//!
//! assert_eq!(key.n().bits(), 512);
//! assert!(key.primes()[0] > key.primes()[1]);
//! ```
//!
//! ## PKCS#1 v1.5 encryption
//!
//! Text is encrypted into fixed-width lowercase hex. The padding string is
//! drawn from the generator passed to each call.
//!
//! ```
//! use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
//! use textbook_rsa::{RsaPrivateKey, RsaPublicKey};
//!
//! let mut rng = ChaCha8Rng::from_seed([42; 32]);
//! let private_key = RsaPrivateKey::new(&mut rng, 512).expect("failed to generate a key");
//! let public_key = RsaPublicKey::from(&private_key);
//!
//! // Encrypt
//! let ciphertext = public_key.encrypt(&mut rng, "hello world").expect("failed to encrypt");
//! assert_eq!(ciphertext.len(), 128);
//!
//! // Decrypt
//! let plaintext = private_key.decrypt(&ciphertext).expect("failed to decrypt");
//! assert_eq!(plaintext, "hello world");
//! ```
//!
//! Raw bytes go through [`RsaPublicKey::encrypt_bytes`] and
//! [`RsaPrivateKey::decrypt_bytes`] without the text encoding.
//!
//! ## JSON key strings
//!
//! ```
//! use textbook_rsa::{Error, KeyPair};
//!
//! let public = KeyPair::from_public_string(r#"{"n":"0ca1","e":"11"}"#).unwrap();
//! assert!(!public.is_private());
//! assert_eq!(public.decrypt("00"), Err(Error::MissingPrivateKey));
//!
//! let private = KeyPair::from_private_string(
//!     r#"{"n":"0ca1","e":"11","d":"0ac1","p":"3d","q":"35"}"#,
//! )
//! .unwrap();
//! assert_eq!(
//!     private.private_string().unwrap(),
//!     r#"{"n":"0ca1","e":"11","d":"0ac1","p":"3d","q":"35","dmp1":"35","dmq1":"31","coeff":"26"}"#
//! );
//! ```

#[cfg(doctest)]
pub struct ReadmeDoctests;

pub use num_bigint::BigUint;
pub use rand_core;

mod algorithms;
pub mod config;
pub mod errors;
pub mod pkcs1v15;
pub mod traits;

mod encoding;
mod key;
#[cfg(feature = "phrase")]
mod phrase;

pub use crate::{
    config::GenerationConfig,
    errors::{Error, Result},
    key::{KeyPair, RsaPrivateKey, RsaPublicKey},
    traits::{PrivateKeyParts, PublicKeyParts},
};

#[cfg(feature = "phrase")]
pub use crate::phrase::PhraseRng;

#[cfg(feature = "hazmat")]
pub mod hazmat;
