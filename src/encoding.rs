//! JSON key strings.
//!
//! Keys serialize to flat objects of hex strings:
//!
//! - public: `{"n": ..., "e": ...}`
//! - private: `{"n", "e", "d", "p", "q", "dmp1", "dmq1", "coeff"}`
//!
//! Every field except `e` is zero-padded to an even number of digits. On
//! import, upper- or lowercase hex of any length is accepted, and the
//! private fields after `d` are optional.

use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::algorithms::pad::uint_from_hex;
use crate::errors::{Error, Result};
use crate::key::KeyPair;
use crate::traits::{PrivateKeyParts, PublicKeyParts};
use crate::{RsaPrivateKey, RsaPublicKey};

#[derive(Serialize, Deserialize)]
#[serde(rename = "RsaPublicKey")]
struct PublicKeyJson {
    n: String,
    e: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "RsaPrivateKey")]
struct PrivateKeyJson {
    n: String,
    e: String,
    d: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dmp1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dmq1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coeff: Option<String>,
}

impl Drop for PrivateKeyJson {
    fn drop(&mut self) {
        self.d.zeroize();
        self.p.zeroize();
        self.q.zeroize();
        self.dmp1.zeroize();
        self.dmq1.zeroize();
        self.coeff.zeroize();
    }
}

fn to_hex(value: &BigUint) -> String {
    value.to_str_radix(16)
}

fn to_even_hex(value: &BigUint) -> String {
    let digits = value.to_str_radix(16);
    if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits
    }
}

fn parse_field(name: &str, value: &str) -> Result<BigUint> {
    uint_from_hex(value)
        .ok_or_else(|| Error::InvalidKeyFormat(format!("field `{name}` is not a hex number")))
}

fn parse_optional(name: &str, value: &Option<String>) -> Result<Option<BigUint>> {
    value.as_deref().map(|v| parse_field(name, v)).transpose()
}

fn invalid(err: Error) -> Error {
    match err {
        Error::InvalidKeyFormat(_) => err,
        other => Error::InvalidKeyFormat(other.to_string()),
    }
}

impl From<&RsaPublicKey> for PublicKeyJson {
    fn from(key: &RsaPublicKey) -> Self {
        Self {
            n: to_even_hex(key.n()),
            e: to_hex(key.e()),
        }
    }
}

impl PublicKeyJson {
    fn to_key(&self) -> Result<RsaPublicKey> {
        let n = parse_field("n", &self.n)?;
        let e = parse_field("e", &self.e)?;
        RsaPublicKey::new(n, e).map_err(invalid)
    }
}

impl From<&RsaPrivateKey> for PrivateKeyJson {
    fn from(key: &RsaPrivateKey) -> Self {
        let primes = key.primes();
        Self {
            n: to_even_hex(key.n()),
            e: to_hex(key.e()),
            d: to_even_hex(key.d()),
            p: primes.first().map(to_even_hex),
            q: primes.get(1).map(to_even_hex),
            dmp1: key.dp().map(to_even_hex),
            dmq1: key.dq().map(to_even_hex),
            coeff: key.qinv().map(to_even_hex),
        }
    }
}

impl PrivateKeyJson {
    fn to_key(&self) -> Result<RsaPrivateKey> {
        let n = parse_field("n", &self.n)?;
        let e = parse_field("e", &self.e)?;
        let d = parse_field("d", &self.d)?;
        let p = parse_optional("p", &self.p)?;
        let q = parse_optional("q", &self.q)?;
        let dmp1 = parse_optional("dmp1", &self.dmp1)?;
        let dmq1 = parse_optional("dmq1", &self.dmq1)?;
        let coeff = parse_optional("coeff", &self.coeff)?;

        let primes = match (p, q) {
            (Some(p), Some(q)) => vec![p, q],
            (None, None) => {
                if dmp1.is_some() || dmq1.is_some() || coeff.is_some() {
                    return Err(Error::InvalidKeyFormat(
                        "CRT values given without `p` and `q`".into(),
                    ));
                }
                Vec::new()
            }
            _ => {
                return Err(Error::InvalidKeyFormat(
                    "`p` and `q` must be given together".into(),
                ))
            }
        };

        let key = RsaPrivateKey::from_components(n, e, d, primes).map_err(invalid)?;

        let supplied = [("dmp1", dmp1, key.dp()), ("dmq1", dmq1, key.dq()), ("coeff", coeff, key.qinv())];
        for (name, supplied, computed) in supplied {
            if let Some(mut value) = supplied {
                let matches = Some(&value) == computed;
                value.zeroize();
                if !matches {
                    return Err(Error::InvalidKeyFormat(format!(
                        "field `{name}` does not match the key"
                    )));
                }
            }
        }

        Ok(key)
    }
}

impl Serialize for RsaPublicKey {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        PublicKeyJson::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RsaPublicKey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        PublicKeyJson::deserialize(deserializer)?
            .to_key()
            .map_err(de::Error::custom)
    }
}

impl Serialize for RsaPrivateKey {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        PrivateKeyJson::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RsaPrivateKey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        PrivateKeyJson::deserialize(deserializer)?
            .to_key()
            .map_err(de::Error::custom)
    }
}

impl RsaPublicKey {
    /// Serializes the key as `{"n": ..., "e": ...}`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&PublicKeyJson::from(self))?)
    }

    /// Parses a public key string. Extra fields, such as the private half of
    /// a private key string, are ignored.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str::<PublicKeyJson>(s)?.to_key()
    }
}

impl RsaPrivateKey {
    /// Serializes all key fields as hex strings.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&PrivateKeyJson::from(self))?)
    }

    /// Parses a private key string.
    ///
    /// `p`, `q`, `dmp1`, `dmq1` and `coeff` may be left out; without the
    /// primes the key decrypts with `d` directly. CRT values that are present
    /// must agree with the ones derived from `d`, `p` and `q`.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str::<PrivateKeyJson>(s)?.to_key()
    }
}

impl KeyPair {
    /// Parses a public key string into a public-only key.
    pub fn from_public_string(s: &str) -> Result<Self> {
        RsaPublicKey::from_json(s).map(KeyPair::Public)
    }

    /// Parses a private key string.
    pub fn from_private_string(s: &str) -> Result<Self> {
        RsaPrivateKey::from_json(s).map(KeyPair::Private)
    }

    /// Serializes the public half.
    pub fn public_string(&self) -> Result<String> {
        self.public_key().to_json()
    }

    /// Serializes the private key. Fails with [`Error::MissingPrivateKey`]
    /// for a public-only key.
    pub fn private_string(&self) -> Result<String> {
        self.require_private()?.to_json()
    }
}
