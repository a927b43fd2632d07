//! RSA public key and signature value objects.
//!
//! Both are plain values: parsed once from their encoded form, then queried for
//! circuit-ready limbs. Neither keeps a reference to the PEM/DER or string it
//! came from.

use std::{fmt, str::FromStr};

use num_bigint::BigUint;
use rsa::{
    pkcs1::DecodeRsaPublicKey, pkcs8::DecodePublicKey, traits::PublicKeyParts, RsaPublicKey,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    bignum::{bytes_to_bigint, redc_limbs, to_limbs, LimbConfig, Limbs},
    error::{CircuitInputError, Result},
    utils::decode_base64,
};

/// RSA modulus sizes the circuits are compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyBits {
    Rsa1024,
    #[default]
    Rsa2048,
}

impl KeyBits {
    pub fn bits(self) -> usize {
        match self {
            KeyBits::Rsa1024 => 1024,
            KeyBits::Rsa2048 => 2048,
        }
    }

    pub fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            1024 => Some(KeyBits::Rsa1024),
            2048 => Some(KeyBits::Rsa2048),
            _ => None,
        }
    }
}

impl fmt::Display for KeyBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl FromStr for KeyBits {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<u64>()
            .ok()
            .and_then(KeyBits::from_bits)
            .ok_or_else(|| format!("unsupported RSA key size '{s}', expected 1024 or 2048"))
    }
}

/// Modulus and reduction-constant limbs, as the circuit's `pub_key` input.
///
/// Both sequences have the same non-zero length; documents that disagree are
/// rejected on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPubKeyLimbs")]
pub struct PubKeyLimbs {
    pub modulus: Limbs,
    pub redc: Limbs,
}

#[derive(Deserialize)]
struct RawPubKeyLimbs {
    modulus: Limbs,
    redc: Limbs,
}

impl TryFrom<RawPubKeyLimbs> for PubKeyLimbs {
    type Error = CircuitInputError;

    fn try_from(raw: RawPubKeyLimbs) -> Result<Self> {
        if raw.modulus.is_empty() || raw.modulus.len() != raw.redc.len() {
            return Err(CircuitInputError::document(
                "pub_key",
                format!(
                    "modulus has {} limbs but redc has {}",
                    raw.modulus.len(),
                    raw.redc.len()
                ),
            ));
        }
        Ok(Self {
            modulus: raw.modulus,
            redc: raw.redc,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPubKey {
    modulus: BigUint,
    exponent: BigUint,
}

impl RsaPubKey {
    /// Accepts PKCS#1 (`RSA PUBLIC KEY`) or SubjectPublicKeyInfo (`PUBLIC KEY`) PEM.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let pem = pem.trim();
        let key = RsaPublicKey::from_pkcs1_pem(pem)
            .or_else(|_| RsaPublicKey::from_public_key_pem(pem))
            .map_err(|e| CircuitInputError::key_parse(e.to_string()))?;
        Ok(Self::from_rsa(&key))
    }

    /// Accepts PKCS#1 or SubjectPublicKeyInfo DER.
    pub fn from_asn1(der: &[u8]) -> Result<Self> {
        let key = RsaPublicKey::from_pkcs1_der(der)
            .or_else(|_| RsaPublicKey::from_public_key_der(der))
            .map_err(|e| CircuitInputError::key_parse(e.to_string()))?;
        Ok(Self::from_rsa(&key))
    }

    pub fn from_parts(modulus: BigUint, exponent: BigUint) -> Self {
        Self { modulus, exponent }
    }

    fn from_rsa(key: &RsaPublicKey) -> Self {
        let modulus = bytes_to_bigint(&key.n().to_bytes_be());
        let exponent = bytes_to_bigint(&key.e().to_bytes_be());
        debug!(modulus_bits = modulus.bits(), "parsed RSA public key");
        Self { modulus, exponent }
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn exponent(&self) -> &BigUint {
        &self.exponent
    }

    /// The supported size matching the modulus exactly, if any.
    pub fn key_bits(&self) -> Option<KeyBits> {
        KeyBits::from_bits(self.modulus.bits())
    }

    pub fn to_circuit_limbs(&self, bits: KeyBits, config: &LimbConfig) -> Result<PubKeyLimbs> {
        let modulus = to_limbs(&self.modulus, bits.bits(), config)?;
        let redc = redc_limbs(&self.modulus, bits.bits(), config)?;
        info!(
            bits = bits.bits(),
            limbs = modulus.len(),
            "encoded RSA public key"
        );
        Ok(PubKeyLimbs { modulus, redc })
    }

    pub fn to_circuit_inputs(&self, bits: KeyBits, config: &LimbConfig) -> Result<Value> {
        let pub_key = self.to_circuit_limbs(bits, config)?;
        Ok(json!({ "pub_key": pub_key }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureEncoding {
    /// Standard or URL-safe alphabet, padded or not.
    Base64,
    /// Optionally `0x`-prefixed.
    Hex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaSignature {
    bytes: Vec<u8>,
}

impl RsaSignature {
    pub fn from_encoded(signature: &str, encoding: SignatureEncoding) -> Result<Self> {
        let signature = signature.trim();
        let bytes = match encoding {
            SignatureEncoding::Base64 => decode_base64(signature)?,
            SignatureEncoding::Hex => {
                let digits = signature.strip_prefix("0x").unwrap_or(signature);
                hex::decode(digits)
                    .map_err(|e| CircuitInputError::InvalidEncoding(e.to_string()))?
            }
        };
        Ok(Self { bytes })
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bigint(&self) -> BigUint {
        bytes_to_bigint(&self.bytes)
    }

    pub fn to_circuit_limbs(&self, bits: KeyBits, config: &LimbConfig) -> Result<Limbs> {
        let limbs = to_limbs(&self.to_bigint(), bits.bits(), config)?;
        debug!(
            bytes = self.bytes.len(),
            limbs = limbs.len(),
            "encoded RSA signature"
        );
        Ok(limbs)
    }

    pub fn to_circuit_inputs(&self, bits: KeyBits, config: &LimbConfig) -> Result<Value> {
        let signature = self.to_circuit_limbs(bits, config)?;
        Ok(json!({ "signature": signature }))
    }
}
