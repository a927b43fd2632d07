#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rsa::{BigUint as RsaBigUint, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

pub const HS256_HEADER: &str = r#"{"alg":"HS256"}"#;
pub const RS256_HEADER: &str = r#"{"alg":"RS256","typ":"JWT"}"#;
pub const PAYLOAD: &str = r#"{"sub":"1234567890"}"#;
pub const SECRET: &[u8] = b"secret_key";

pub fn b64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Deterministic 2048-bit RSA key built from fixed primes.
pub fn test_rsa_key() -> RsaPrivateKey {
    let p = RsaBigUint::from_bytes_be(
        &hex::decode(concat!(
            "c8b4e97508c3d0fad0062e8ee475909d5315bc9433e9b8a174a52b8f024e7d6b",
            "ea80a56901555021b2d44f727aa287b84de8bac5ceef88d03b259f8ac91bda42",
            "e653e27596d8090e08e9dac47dcd288e1c0e95ac74d7428cd0479c8514bc3538",
            "7380a480873c7f519ece6f5ea4356c81bd7ec31c126c1f097b84bb33c8acd565",
        ))
        .unwrap(),
    );
    let q = RsaBigUint::from_bytes_be(
        &hex::decode(concat!(
            "efffcc7f550f977db26971fb6a0f036d61cccde351c394fe177cd36a0a7dde60",
            "8cd263d8ca382031fc0f16bef5ebb2125ab1b8e837c71c006a8639c090a7ebac",
            "530de579bca2ea7ad175c8a31d45078130e0ad15cf23139d230f30c106259c7a",
            "55024f4e51a97b1b38b7ed4dfe05a0706bf53a067e7f0ee18dc685b53300708b",
        ))
        .unwrap(),
    );
    RsaPrivateKey::from_p_q(p, q, RsaBigUint::from(65537u32)).expect("valid key")
}

pub fn test_rsa_public_key() -> RsaPublicKey {
    RsaPublicKey::from(&test_rsa_key())
}

/// HMAC-SHA256, used only to sign fixture tokens.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
    const BLOCK: usize = 64;
    let mut block = [0u8; BLOCK];
    if key.len() > BLOCK {
        block[..32].copy_from_slice(&Sha256::digest(key));
    } else {
        block[..key.len()].copy_from_slice(key);
    }

    let ipad: Vec<u8> = block.iter().map(|b| b ^ 0x36).collect();
    let opad: Vec<u8> = block.iter().map(|b| b ^ 0x5c).collect();

    let inner = Sha256::new()
        .chain_update(&ipad)
        .chain_update(message)
        .finalize();
    Sha256::new()
        .chain_update(&opad)
        .chain_update(inner)
        .finalize()
        .to_vec()
}

pub fn sign_hs256(header: &str, payload: &str, secret: &[u8]) -> String {
    let signing_input = format!("{}.{}", b64url(header.as_bytes()), b64url(payload.as_bytes()));
    let signature = hmac_sha256(secret, signing_input.as_bytes());
    format!("{signing_input}.{}", b64url(&signature))
}

pub fn sign_rs256(header: &str, payload: &str, key: &RsaPrivateKey) -> String {
    let signing_input = format!("{}.{}", b64url(header.as_bytes()), b64url(payload.as_bytes()));
    let digest = Sha256::digest(signing_input.as_bytes());
    let signature = key
        .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
        .expect("failed to sign");
    format!("{signing_input}.{}", b64url(&signature))
}
