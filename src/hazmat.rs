//! ⚠️ Unpadded RSA primitives.
//!
//! # ☢️️ WARNING: HAZARDOUS API ☢️
//!
//! [`rsa_encrypt`] computes `m^e mod n` and [`rsa_decrypt`] computes
//! `c^d mod n`, splitting the work over `p` and `q` when the key knows them.
//! Nothing is padded, unpadded or checked beyond `c < n`. Textbook RSA on raw
//! integers is malleable and deterministic; reach for these only to build or
//! test a padding scheme.

pub use crate::algorithms::rsa::{rsa_decrypt, rsa_encrypt};
