mod common;

use common::{hmac_sha256, sign_hs256, HS256_HEADER, PAYLOAD, SECRET};
use jwt_circuit_inputs::{
    parse_h256_inputs, parse_jwt_string_inputs, CircuitInputs, H256Inputs, Jwt, JwtAlgorithm,
    JwtCapacities, JwtStringInputs,
};
use num_bigint::BigUint;
use serde_json::Value;

fn storage_bytes(json: &Value, field: &str) -> Vec<u8> {
    json[field]["storage"]
        .as_array()
        .expect("storage array")
        .iter()
        .map(|v| v.as_u64().expect("byte") as u8)
        .collect()
}

#[test]
fn fixture_hmac_matches_rfc4231() {
    let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
    assert_eq!(
        hex::encode(mac),
        "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
    );
}

#[test]
fn h256_document_end_to_end() {
    let token = sign_hs256(HS256_HEADER, PAYLOAD, SECRET);
    assert!(token.starts_with("eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0."));

    let jwt = Jwt::parse(&token, JwtAlgorithm::H256).unwrap();
    assert_eq!(jwt.signature().len(), 43);

    let inputs = H256Inputs::new(&jwt, &JwtCapacities::default(), SECRET, 64).unwrap();
    assert_eq!(inputs.header.len(), "eyJhbGciOiJIUzI1NiJ9".len());
    assert_eq!(inputs.payload.len(), "eyJzdWIiOiIxMjM0NTY3ODkwIn0".len());
    assert_eq!(inputs.signature.len(), 43);
    assert_eq!(inputs.signature.capacity(), 43);
    assert_eq!(inputs.header.as_slice(), jwt.header().as_bytes());
    assert_eq!(inputs.signature.as_slice(), jwt.signature().as_bytes());

    let json = inputs.to_json().unwrap();
    let header = storage_bytes(&json, "header");
    assert_eq!(header.len(), 64);
    assert_eq!(&header[..20], b"eyJhbGciOiJIUzI1NiJ9");
    assert!(header[20..].iter().all(|&b| b == 0));
    assert_eq!(json["header"]["len"], 20);
    assert_eq!(json["payload"]["len"], 27);
    assert_eq!(storage_bytes(&json, "payload").len(), 256);
    assert_eq!(json["signature"]["len"], 43);
    assert_eq!(storage_bytes(&json, "signature"), jwt.signature().as_bytes());
    assert_eq!(&storage_bytes(&json, "secret_key")[..10], SECRET);
    assert_eq!(json["secret_key"]["len"], 10);
}

#[test]
fn h256_document_reads_back() {
    let token = sign_hs256(HS256_HEADER, PAYLOAD, SECRET);
    let jwt: Jwt = token.parse().unwrap();
    let inputs = H256Inputs::new(&jwt, &JwtCapacities::default(), SECRET, 64).unwrap();
    let json = inputs.to_json().unwrap();

    let fields = parse_h256_inputs(&json).unwrap();
    assert_eq!(fields["signature.len"], vec![BigUint::from(43u32)]);
    assert_eq!(fields["secret_key"].len(), 64);

    let back: H256Inputs = serde_json::from_value(json).unwrap();
    assert_eq!(back, inputs);
}

#[test]
fn signature_capacity_too_small_is_a_configuration_error() {
    let token = sign_hs256(HS256_HEADER, PAYLOAD, SECRET);
    let jwt: Jwt = token.parse().unwrap();
    let caps = JwtCapacities {
        max_signature_length: 42,
        ..JwtCapacities::default()
    };
    assert!(H256Inputs::new(&jwt, &caps, SECRET, 64).is_err());
}

#[test]
fn jwt_string_document_end_to_end() {
    let token = sign_hs256(HS256_HEADER, PAYLOAD, SECRET);
    let jwt: Jwt = token.parse().unwrap();
    let inputs = JwtStringInputs::new(&jwt, 1133, SECRET, 256).unwrap();
    let json = inputs.to_json().unwrap();

    assert_eq!(json["jwt_string"]["len"], token.len());
    assert_eq!(json["header_length"], 20);
    assert_eq!(json["payload_length"], 27);
    assert_eq!(json["signature_length"], 43);
    assert_eq!(
        &storage_bytes(&json, "jwt_string")[..token.len()],
        token.as_bytes()
    );

    let fields = parse_jwt_string_inputs(&json).unwrap();
    assert_eq!(fields["jwt_string"].len(), 1133);
    assert_eq!(fields["secret_key.len"], vec![BigUint::from(10u32)]);
    assert_eq!(fields["signature_length"], vec![BigUint::from(43u32)]);
    assert_eq!(JwtStringInputs::LAYOUT, "jwt-string");
}
