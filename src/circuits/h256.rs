use std::collections::HashMap;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{
    bounded_vec::BoundedVec,
    error::{CircuitInputError, Result},
    jwt::{Jwt, JwtAlgorithm, JwtCapacities},
    utils::parse_h256_inputs,
};

use super::CircuitInputs;

pub const DEFAULT_SECRET_KEY_CAPACITY: usize = 64;

// jwt_h256.nr
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct H256Inputs {
    pub header: BoundedVec<u8>,
    pub payload: BoundedVec<u8>,
    pub signature: BoundedVec<u8>,
    /// Supplied by the caller; never derived from the token.
    pub secret_key: BoundedVec<u8>,
}

impl H256Inputs {
    pub fn new(
        jwt: &Jwt,
        capacities: &JwtCapacities,
        secret_key: &[u8],
        secret_key_capacity: usize,
    ) -> Result<Self> {
        if jwt.algorithm() != JwtAlgorithm::H256 {
            return Err(CircuitInputError::AlgorithmMismatch {
                expected: JwtAlgorithm::H256.name(),
                found: jwt.algorithm().name(),
            });
        }

        let inputs = Self {
            header: jwt.header_input(capacities.max_header_length)?,
            payload: jwt.payload_input(capacities.max_payload_length)?,
            signature: jwt.hmac_signature_input(capacities.max_signature_length)?,
            secret_key: BoundedVec::from_slice(secret_key_capacity, secret_key)?,
        };

        info!(
            header_len = inputs.header.len(),
            payload_len = inputs.payload.len(),
            signature_len = inputs.signature.len(),
            "prepared H256 circuit inputs"
        );
        Ok(inputs)
    }
}

impl CircuitInputs for H256Inputs {
    const LAYOUT: &'static str = "h256";

    fn parse_document(json: &Value) -> Result<HashMap<String, Vec<BigUint>>> {
        parse_h256_inputs(json)
    }
}
