//! Encoder configuration.
//!
//! Every size here is a property of the compiled circuit and must be fixed
//! ahead of time. Nothing is inferred from the token or key being encoded.
//!
//! ```json
//! {
//!   "limbs": { "limb_bits": 120, "order": "least_significant_first", "format": "hex" },
//!   "capacities": { "max_header_length": 64, "max_payload_length": 256, "max_signature_length": 43 },
//!   "secret_key_capacity": 64,
//!   "jwt_string_capacity": 1133
//! }
//! ```
//!
//! Any field may be omitted to keep its default.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    bignum::LimbConfig,
    circuits::{h256::DEFAULT_SECRET_KEY_CAPACITY, jwt_string::DEFAULT_JWT_STRING_CAPACITY},
    error::Result,
    jwt::JwtCapacities,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub limbs: LimbConfig,
    pub capacities: JwtCapacities,
    pub secret_key_capacity: usize,
    pub jwt_string_capacity: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            limbs: LimbConfig::default(),
            capacities: JwtCapacities::default(),
            secret_key_capacity: DEFAULT_SECRET_KEY_CAPACITY,
            jwt_string_capacity: DEFAULT_JWT_STRING_CAPACITY,
        }
    }
}

impl EncoderConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.limbs.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.limbs.validate()?;
        info!(path = %path.display(), "loaded encoder config");
        Ok(config)
    }
}
