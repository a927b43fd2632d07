use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use num_bigint::BigUint;
use num_traits::Zero;
use serde_json::Value;
use std::collections::HashMap;

use crate::{
    bignum::{parse_field, Limbs},
    error::{CircuitInputError, Result},
};

#[derive(Clone, Copy)]
pub enum FieldParser {
    /// `{ storage, len }`; yields the storage under the field name and `len` under `<name>.len`.
    BoundedBytes,
    LimbArray,
    U64Scalar,
    /// `{ modulus, redc }`; yields `<name>.modulus` and `<name>.redc`.
    PubKey,
}

/// Generic function to read an emitted input document back, based on field definitions
pub fn parse_inputs(
    json_value: &Value,
    field_defs: &[(&str, FieldParser)],
) -> Result<HashMap<String, Vec<BigUint>>> {
    let mut inputs = HashMap::new();

    for (field_name, parser) in field_defs {
        match parser {
            FieldParser::BoundedBytes => {
                let (storage, len) = parse_bounded_bytes(json_value, field_name)?;
                inputs.insert(format!("{field_name}.len"), vec![BigUint::from(len)]);
                inputs.insert(field_name.to_string(), storage);
            }
            FieldParser::LimbArray => {
                inputs.insert(
                    field_name.to_string(),
                    parse_limb_array(json_value, field_name)?,
                );
            }
            FieldParser::U64Scalar => {
                inputs.insert(
                    field_name.to_string(),
                    vec![BigUint::from(parse_u64_scalar(json_value, field_name)?)],
                );
            }
            FieldParser::PubKey => {
                let pub_key = json_value
                    .get(*field_name)
                    .ok_or_else(|| CircuitInputError::document(*field_name, "missing"))?;
                let mut parts = Vec::with_capacity(2);
                for part in ["modulus", "redc"] {
                    let key = format!("{field_name}.{part}");
                    let limbs = parse_limb_array(pub_key, part)
                        .map_err(|_| CircuitInputError::document(key.as_str(), "invalid limbs"))?;
                    parts.push((key, limbs));
                }
                if parts[0].1.is_empty() || parts[0].1.len() != parts[1].1.len() {
                    return Err(CircuitInputError::document(
                        *field_name,
                        format!(
                            "modulus has {} limbs but redc has {}",
                            parts[0].1.len(),
                            parts[1].1.len()
                        ),
                    ));
                }
                inputs.extend(parts);
            }
        }
    }

    Ok(inputs)
}

// Layout-specific input readers
/// Read HMAC-SHA256 circuit inputs from JSON
pub fn parse_h256_inputs(json_value: &Value) -> Result<HashMap<String, Vec<BigUint>>> {
    let field_defs: &[(&str, FieldParser)] = &[
        ("header", FieldParser::BoundedBytes),
        ("payload", FieldParser::BoundedBytes),
        ("signature", FieldParser::BoundedBytes),
        ("secret_key", FieldParser::BoundedBytes),
    ];

    parse_inputs(json_value, field_defs)
}

/// Read RSA-SHA256 circuit inputs from JSON
pub fn parse_rs256_inputs(json_value: &Value) -> Result<HashMap<String, Vec<BigUint>>> {
    let field_defs: &[(&str, FieldParser)] = &[
        ("header", FieldParser::BoundedBytes),
        ("payload", FieldParser::BoundedBytes),
        ("signature", FieldParser::LimbArray),
        ("pub_key", FieldParser::PubKey),
    ];

    let inputs = parse_inputs(json_value, field_defs)?;
    let signature_limbs = inputs["signature"].len();
    let modulus_limbs = inputs["pub_key.modulus"].len();
    if signature_limbs != modulus_limbs {
        return Err(CircuitInputError::document(
            "signature",
            format!("{signature_limbs} limbs, but the modulus has {modulus_limbs}"),
        ));
    }
    Ok(inputs)
}

/// Read whole-token circuit inputs from JSON
pub fn parse_jwt_string_inputs(json_value: &Value) -> Result<HashMap<String, Vec<BigUint>>> {
    let field_defs: &[(&str, FieldParser)] = &[
        ("jwt_string", FieldParser::BoundedBytes),
        ("secret_key", FieldParser::BoundedBytes),
        ("header_length", FieldParser::U64Scalar),
        ("payload_length", FieldParser::U64Scalar),
        ("signature_length", FieldParser::U64Scalar),
    ];

    parse_inputs(json_value, field_defs)
}

pub fn parse_byte(value: &Value) -> Result<u8> {
    if let Some(as_str) = value.as_str() {
        let parsed = parse_field(as_str)
            .ok_or_else(|| CircuitInputError::document(as_str, "not a number"))?;
        return u8::try_from(parsed)
            .map_err(|_| CircuitInputError::document(as_str, "does not fit in a byte"));
    }

    if let Some(as_u64) = value.as_u64() {
        return u8::try_from(as_u64)
            .map_err(|_| CircuitInputError::document(as_u64.to_string(), "does not fit in a byte"));
    }

    Err(CircuitInputError::document(value.to_string(), "expected a byte"))
}

/// Decodes base64 the way JWT segments show up in practice: URL-safe or
/// standard alphabet, with or without padding.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    if encoded.len() % 4 == 1 {
        return Err(CircuitInputError::InvalidEncoding(format!(
            "base64 input of length {} cannot be valid",
            encoded.len()
        )));
    }

    let engines = [&URL_SAFE_NO_PAD, &URL_SAFE, &STANDARD_NO_PAD, &STANDARD];
    let mut last_err = None;
    for engine in engines {
        match engine.decode(encoded.as_bytes()) {
            Ok(decoded) => return Ok(decoded),
            Err(e) => last_err = Some(e),
        }
    }

    Err(CircuitInputError::InvalidEncoding(
        last_err.map(|e| e.to_string()).unwrap_or_default(),
    ))
}

// JSON Parsing Helpers
fn parse_bounded_bytes(json: &Value, key: &str) -> Result<(Vec<BigUint>, usize)> {
    let container = json
        .get(key)
        .ok_or_else(|| CircuitInputError::document(key, "missing"))?;

    let storage = container
        .get("storage")
        .and_then(|v| v.as_array())
        .ok_or_else(|| CircuitInputError::document(key, "storage must be an array"))?
        .iter()
        .map(|v| parse_byte(v).map(BigUint::from))
        .collect::<Result<Vec<_>>>()?;

    let len = container
        .get("len")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| CircuitInputError::document(key, "len must be a number"))?
        as usize;

    if len > storage.len() {
        return Err(CircuitInputError::document(
            key,
            format!("len {len} exceeds storage of {}", storage.len()),
        ));
    }
    if let Some(offset) = storage[len..].iter().position(|b| !b.is_zero()) {
        return Err(CircuitInputError::document(
            key,
            format!("slot {} past len {len} is not filler", len + offset),
        ));
    }

    Ok((storage, len))
}

/// Parse an array of field-element strings, all hex or all decimal
fn parse_limb_array(json: &Value, key: &str) -> Result<Vec<BigUint>> {
    let limbs: Limbs = serde_json::from_value(
        json.get(key)
            .cloned()
            .ok_or_else(|| CircuitInputError::document(key, "missing"))?,
    )
    .map_err(|e| CircuitInputError::document(key, e.to_string()))?;
    Ok(limbs.into_values())
}

fn parse_u64_scalar(json: &Value, key: &str) -> Result<u64> {
    json.get(key)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| CircuitInputError::document(key, "must be a number"))
}
