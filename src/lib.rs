//! Circuit input encoding for JWT and RSA material
//!
//! This library turns tokens and keys into the statically sized inputs a
//! fixed-topology proving circuit expects:
//! - JWT segments packed into fixed-capacity, length-tagged byte containers
//! - RSA moduli and signatures split into fixed-width limbs, together with the
//!   reduction constant the circuit uses for modular arithmetic
//!
//! No signature or claim is verified here; the circuit is the only authority
//! on cryptographic validity.

pub mod bignum;
pub mod bounded_vec;
pub mod circuits;
pub mod config;
pub mod error;
pub mod jwt;
pub mod rsa_key;
pub mod utils;

// Re-export commonly used types and functions
pub use bignum::{
    bytes_to_bigint, from_limbs, redc_limbs, to_limbs, FieldFormat, LimbConfig, LimbOrder, Limbs,
    DEFAULT_LIMB_BITS,
};
pub use bounded_vec::BoundedVec;
pub use circuits::{
    h256::H256Inputs, jwt_string::JwtStringInputs, rs256::Rs256Inputs, CircuitInputs,
};
pub use config::EncoderConfig;
pub use error::{CircuitInputError, JwtSegment, Result, TokenDefect};
pub use jwt::{Jwt, JwtAlgorithm, JwtCapacities, JwtInputs, SignatureInput};
pub use rsa_key::{KeyBits, PubKeyLimbs, RsaPubKey, RsaSignature, SignatureEncoding};
pub use utils::{decode_base64, parse_h256_inputs, parse_jwt_string_inputs, parse_rs256_inputs};
