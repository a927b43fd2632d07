//! Structural JWT parsing.
//!
//! Segments are kept as their base64url text, not decoded: the circuit hashes
//! the encoded text itself, so the characters are the payload. Nothing here
//! checks the signature or the claims.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    bignum::{LimbConfig, Limbs},
    bounded_vec::BoundedVec,
    error::{CircuitInputError, JwtSegment, Result, TokenDefect},
    rsa_key::{KeyBits, RsaSignature, SignatureEncoding},
};

pub const DEFAULT_MAX_HEADER_LENGTH: usize = 64;
pub const DEFAULT_MAX_PAYLOAD_LENGTH: usize = 256;
/// A base64url HMAC-SHA256 signature is always 43 characters.
pub const DEFAULT_MAX_SIGNATURE_LENGTH: usize = 43;

/// Signature algorithms the circuits can verify. Each variant carries its own
/// signature packing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JwtAlgorithm {
    /// HMAC-SHA256; the signature text goes into a byte container.
    #[default]
    H256,
    /// RSA-SHA256; the signature is decoded and split into limbs for a `bits`-bit modulus.
    Rs256 { bits: KeyBits },
}

impl JwtAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            JwtAlgorithm::H256 => "H256",
            JwtAlgorithm::Rs256 { .. } => "RS256",
        }
    }
}

/// Container sizes the target circuit was compiled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtCapacities {
    pub max_header_length: usize,
    pub max_payload_length: usize,
    /// Only used for H256; RS256 signatures are sized by the key.
    pub max_signature_length: usize,
}

impl Default for JwtCapacities {
    fn default() -> Self {
        Self {
            max_header_length: DEFAULT_MAX_HEADER_LENGTH,
            max_payload_length: DEFAULT_MAX_PAYLOAD_LENGTH,
            max_signature_length: DEFAULT_MAX_SIGNATURE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignatureInput {
    Bytes(BoundedVec<u8>),
    Limbs(Limbs),
}

/// The `header`, `payload` and `signature` fields shared by both JWT circuits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtInputs {
    pub header: BoundedVec<u8>,
    pub payload: BoundedVec<u8>,
    pub signature: SignatureInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jwt {
    header: String,
    payload: String,
    signature: String,
    algorithm: JwtAlgorithm,
}

impl Jwt {
    /// Splits `token` into its three segments. Surrounding whitespace is ignored.
    pub fn parse(token: &str, algorithm: JwtAlgorithm) -> Result<Self> {
        let parts: Vec<&str> = token.trim().split('.').collect();

        let segment = |index: usize, which: JwtSegment| -> Result<String> {
            match parts.get(index) {
                Some(s) if !s.is_empty() => Ok(s.to_string()),
                _ => Err(CircuitInputError::missing(which)),
            }
        };
        let header = segment(0, JwtSegment::Header)?;
        let payload = segment(1, JwtSegment::Payload)?;
        let signature = segment(2, JwtSegment::Signature)?;

        if parts.len() > 3 {
            return Err(CircuitInputError::MalformedToken(TokenDefect::SegmentCount(
                parts.len(),
            )));
        }

        debug!(
            alg = algorithm.name(),
            header_len = header.len(),
            payload_len = payload.len(),
            signature_len = signature.len(),
            "parsed JWT"
        );

        Ok(Self {
            header,
            payload,
            signature,
            algorithm,
        })
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn algorithm(&self) -> JwtAlgorithm {
        self.algorithm
    }

    /// The token re-joined as `header.payload.signature`.
    pub fn compact(&self) -> String {
        format!("{}.{}.{}", self.header, self.payload, self.signature)
    }

    pub fn header_input(&self, capacity: usize) -> Result<BoundedVec<u8>> {
        BoundedVec::from_slice(capacity, self.header.as_bytes())
    }

    pub fn payload_input(&self, capacity: usize) -> Result<BoundedVec<u8>> {
        BoundedVec::from_slice(capacity, self.payload.as_bytes())
    }

    /// HMAC path: the signature characters themselves.
    pub fn hmac_signature_input(&self, capacity: usize) -> Result<BoundedVec<u8>> {
        BoundedVec::from_slice(capacity, self.signature.as_bytes())
    }

    /// RSA path: the base64url signature decoded, read big-endian, split into limbs.
    pub fn rsa_signature_input(&self, bits: KeyBits, config: &LimbConfig) -> Result<Limbs> {
        RsaSignature::from_encoded(&self.signature, SignatureEncoding::Base64)?
            .to_circuit_limbs(bits, config)
    }

    pub fn to_circuit_inputs(
        &self,
        capacities: &JwtCapacities,
        config: &LimbConfig,
    ) -> Result<JwtInputs> {
        let signature = match self.algorithm {
            JwtAlgorithm::H256 => {
                SignatureInput::Bytes(self.hmac_signature_input(capacities.max_signature_length)?)
            }
            JwtAlgorithm::Rs256 { bits } => {
                SignatureInput::Limbs(self.rsa_signature_input(bits, config)?)
            }
        };
        let header = self.header_input(capacities.max_header_length)?;
        let payload = self.payload_input(capacities.max_payload_length)?;

        info!(alg = self.algorithm.name(), "encoded JWT circuit inputs");
        Ok(JwtInputs {
            header,
            payload,
            signature,
        })
    }
}

/// Parses as [`JwtAlgorithm::H256`].
impl FromStr for Jwt {
    type Err = CircuitInputError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, JwtAlgorithm::H256)
    }
}
