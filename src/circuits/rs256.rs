use std::collections::HashMap;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    bignum::{LimbConfig, Limbs},
    bounded_vec::BoundedVec,
    error::{CircuitInputError, Result},
    jwt::{Jwt, JwtAlgorithm, JwtCapacities},
    rsa_key::{PubKeyLimbs, RsaPubKey},
    utils::parse_rs256_inputs,
};

use super::CircuitInputs;

// jwt_rs256.nr
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRs256Inputs")]
pub struct Rs256Inputs {
    pub header: BoundedVec<u8>,
    pub payload: BoundedVec<u8>,
    pub signature: Limbs,
    pub pub_key: PubKeyLimbs,
}

#[derive(Deserialize)]
struct RawRs256Inputs {
    header: BoundedVec<u8>,
    payload: BoundedVec<u8>,
    signature: Limbs,
    pub_key: PubKeyLimbs,
}

// Signature, modulus and redc share one limb count, fixed by the key size.
impl TryFrom<RawRs256Inputs> for Rs256Inputs {
    type Error = CircuitInputError;

    fn try_from(raw: RawRs256Inputs) -> Result<Self> {
        if raw.signature.len() != raw.pub_key.modulus.len() {
            return Err(CircuitInputError::document(
                "signature",
                format!(
                    "{} limbs, but the modulus has {}",
                    raw.signature.len(),
                    raw.pub_key.modulus.len()
                ),
            ));
        }
        Ok(Self {
            header: raw.header,
            payload: raw.payload,
            signature: raw.signature,
            pub_key: raw.pub_key,
        })
    }
}

impl Rs256Inputs {
    pub fn new(
        jwt: &Jwt,
        pub_key: &RsaPubKey,
        capacities: &JwtCapacities,
        config: &LimbConfig,
    ) -> Result<Self> {
        let JwtAlgorithm::Rs256 { bits } = jwt.algorithm() else {
            return Err(CircuitInputError::AlgorithmMismatch {
                expected: "RS256",
                found: jwt.algorithm().name(),
            });
        };

        if pub_key.key_bits() != Some(bits) {
            warn!(
                declared = bits.bits(),
                modulus_bits = pub_key.modulus().bits(),
                "public key size differs from the declared key size"
            );
        }

        let inputs = Self {
            header: jwt.header_input(capacities.max_header_length)?,
            payload: jwt.payload_input(capacities.max_payload_length)?,
            signature: jwt.rsa_signature_input(bits, config)?,
            pub_key: pub_key.to_circuit_limbs(bits, config)?,
        };

        info!(
            bits = bits.bits(),
            header_len = inputs.header.len(),
            payload_len = inputs.payload.len(),
            limbs = inputs.signature.len(),
            "prepared RS256 circuit inputs"
        );
        Ok(inputs)
    }
}

impl CircuitInputs for Rs256Inputs {
    const LAYOUT: &'static str = "rs256";

    fn parse_document(json: &Value) -> Result<HashMap<String, Vec<BigUint>>> {
        parse_rs256_inputs(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(signature: Value, redc: Value) -> Value {
        json!({
            "header": { "storage": [97, 0], "len": 1 },
            "payload": { "storage": [98, 0], "len": 1 },
            "signature": signature,
            "pub_key": { "modulus": ["0x1", "0x2"], "redc": redc },
        })
    }

    #[test]
    fn reads_consistent_document() {
        let doc = document(json!(["0x5", "0x6"]), json!(["0x3", "0x4"]));
        let inputs: Rs256Inputs = serde_json::from_value(doc).unwrap();
        assert_eq!(inputs.signature.len(), 2);
        assert_eq!(inputs.header.as_slice(), b"a");
    }

    #[test]
    fn rejects_truncated_redc() {
        let doc = document(json!(["0x5", "0x6"]), json!(["0x3"]));
        assert!(serde_json::from_value::<Rs256Inputs>(doc.clone()).is_err());
        assert!(Rs256Inputs::parse_document(&doc).is_err());
    }

    #[test]
    fn rejects_signature_limb_count_mismatch() {
        let doc = document(json!(["0x5"]), json!(["0x3", "0x4"]));
        assert!(serde_json::from_value::<Rs256Inputs>(doc.clone()).is_err());
        assert!(Rs256Inputs::parse_document(&doc).is_err());
    }

    #[test]
    fn rejects_h256_token() {
        let jwt: Jwt = "a.b.c".parse().unwrap();
        let key = RsaPubKey::from_parts(BigUint::from(3233u32), BigUint::from(17u32));
        let err = Rs256Inputs::new(
            &jwt,
            &key,
            &JwtCapacities::default(),
            &LimbConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CircuitInputError::AlgorithmMismatch {
                expected: "RS256",
                found: "H256"
            }
        ));
    }
}
