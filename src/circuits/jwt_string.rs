use std::collections::HashMap;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{
    bounded_vec::BoundedVec,
    error::{CircuitInputError, Result},
    jwt::{Jwt, JwtAlgorithm},
    utils::parse_jwt_string_inputs,
};

use super::CircuitInputs;

pub const DEFAULT_JWT_STRING_CAPACITY: usize = 1133;

/// The whole compact token in one container, with the segment lengths the
/// circuit needs to locate the dots itself.
// jwt_string_verify.nr
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtStringInputs {
    pub jwt_string: BoundedVec<u8>,
    pub secret_key: BoundedVec<u8>,
    pub header_length: usize,
    pub payload_length: usize,
    pub signature_length: usize,
}

impl JwtStringInputs {
    pub fn new(
        jwt: &Jwt,
        capacity: usize,
        secret_key: &[u8],
        secret_key_capacity: usize,
    ) -> Result<Self> {
        if jwt.algorithm() != JwtAlgorithm::H256 {
            return Err(CircuitInputError::AlgorithmMismatch {
                expected: JwtAlgorithm::H256.name(),
                found: jwt.algorithm().name(),
            });
        }

        let compact = jwt.compact();
        let inputs = Self {
            jwt_string: BoundedVec::from_slice(capacity, compact.as_bytes())?,
            secret_key: BoundedVec::from_slice(secret_key_capacity, secret_key)?,
            header_length: jwt.header().len(),
            payload_length: jwt.payload().len(),
            signature_length: jwt.signature().len(),
        };

        info!(
            len = inputs.jwt_string.len(),
            capacity, "prepared JWT string circuit inputs"
        );
        Ok(inputs)
    }
}

impl CircuitInputs for JwtStringInputs {
    const LAYOUT: &'static str = "jwt-string";

    fn parse_document(json: &Value) -> Result<HashMap<String, Vec<BigUint>>> {
        parse_jwt_string_inputs(json)
    }
}
