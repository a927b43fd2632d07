//! Big-integer limb decomposition for circuit inputs.
//!
//! The circuit's native field is far smaller than an RSA modulus, so every big
//! integer is split into fixed-width limbs. The number of limbs depends only on
//! the declared bit width and the limb width, never on the value itself.
//! Alongside the modulus the circuit needs the reduction constant
//! `floor(4^N / modulus)` to perform modular multiplication limb-wise.

use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{de, ser::SerializeSeq, Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{CircuitInputError, Result};

/// Limb width used by the Noir bignum library.
pub const DEFAULT_LIMB_BITS: usize = 120;

/// Widest limb that still fits comfortably below a ~254-bit native field.
pub const MAX_LIMB_BITS: usize = 248;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimbOrder {
    #[default]
    LeastSignificantFirst,
    MostSignificantFirst,
}

/// How a limb is rendered as a string in the input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    /// `0x`-prefixed lowercase hex.
    #[default]
    Hex,
    Decimal,
}

impl FieldFormat {
    pub fn render(&self, value: &BigUint) -> String {
        match self {
            FieldFormat::Hex => format!("{value:#x}"),
            FieldFormat::Decimal => value.to_str_radix(10),
        }
    }
}

/// Parses a field element written either as `0x` hex or as decimal.
pub fn parse_field(s: &str) -> Option<BigUint> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) if !hex.is_empty() => BigUint::parse_bytes(hex.as_bytes(), 16),
        Some(_) => None,
        None => BigUint::parse_bytes(s.as_bytes(), 10),
    }
}

/// Numeric convention of the target circuit. Must match the evaluator; it is
/// never derived from the data being encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimbConfig {
    pub limb_bits: usize,
    pub order: LimbOrder,
    pub format: FieldFormat,
}

impl Default for LimbConfig {
    fn default() -> Self {
        Self {
            limb_bits: DEFAULT_LIMB_BITS,
            order: LimbOrder::default(),
            format: FieldFormat::default(),
        }
    }
}

impl LimbConfig {
    pub fn new(limb_bits: usize) -> Result<Self> {
        let config = Self {
            limb_bits,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_order(mut self, order: LimbOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = format;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.limb_bits == 0 || self.limb_bits > MAX_LIMB_BITS {
            return Err(CircuitInputError::InvalidLimbWidth {
                got: self.limb_bits,
                max: MAX_LIMB_BITS,
            });
        }
        Ok(())
    }

    /// `ceil(bit_width / limb_bits)`
    pub fn limb_count(&self, bit_width: usize) -> usize {
        bit_width.div_ceil(self.limb_bits)
    }
}

/// A fixed-length limb sequence, ordered according to the [`LimbConfig`] that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limbs {
    values: Vec<BigUint>,
    format: FieldFormat,
}

impl Limbs {
    pub fn values(&self) -> &[BigUint] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn format(&self) -> FieldFormat {
        self.format
    }

    pub fn into_values(self) -> Vec<BigUint> {
        self.values
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.values.iter().map(|v| self.format.render(v)).collect()
    }
}

impl Serialize for Limbs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.values.len()))?;
        for value in &self.values {
            seq.serialize_element(&self.format.render(value))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Limbs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        let format_of = |s: &str| {
            if s.starts_with("0x") || s.starts_with("0X") {
                FieldFormat::Hex
            } else {
                FieldFormat::Decimal
            }
        };
        let format = strings.first().map_or(FieldFormat::Hex, |s| format_of(s));
        if let Some(mixed) = strings.iter().find(|s| format_of(s) != format) {
            return Err(de::Error::custom(format!(
                "limb '{mixed}' does not match the {format:?} format of the first limb"
            )));
        }
        let values = strings
            .iter()
            .map(|s| {
                parse_field(s)
                    .ok_or_else(|| de::Error::custom(format!("invalid field element '{s}'")))
            })
            .collect::<std::result::Result<Vec<_>, D::Error>>()?;
        Ok(Self { values, format })
    }
}

impl fmt::Display for Limbs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.to_strings().join(", "))
    }
}

/// Interprets `bytes` as a big-endian unsigned integer. Empty input is zero.
pub fn bytes_to_bigint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Splits `value` into `ceil(bit_width / limb_bits)` limbs.
///
/// Fails with [`CircuitInputError::LimbOverflow`] when `value` is wider than
/// `bit_width`, i.e. too large for the declared key size.
pub fn to_limbs(value: &BigUint, bit_width: usize, config: &LimbConfig) -> Result<Limbs> {
    config.validate()?;
    if value.bits() > bit_width as u64 {
        return Err(CircuitInputError::LimbOverflow {
            bits: value.bits(),
            capacity: bit_width as u64,
        });
    }
    decompose(value, config.limb_count(bit_width), config)
}

/// Limbs of the reduction constant `floor(4^bit_width / modulus)`.
///
/// The constant is up to two bits wider than an exact-size modulus; it only
/// fails when it no longer fits in the limb capacity.
pub fn redc_limbs(modulus: &BigUint, bit_width: usize, config: &LimbConfig) -> Result<Limbs> {
    config.validate()?;
    if modulus.is_zero() {
        return Err(CircuitInputError::ZeroModulus);
    }
    let redc = reduction_constant(modulus, bit_width);
    decompose(&redc, config.limb_count(bit_width), config)
}

/// `floor(4^bit_width / modulus)`, computed with exact integer division.
pub fn reduction_constant(modulus: &BigUint, bit_width: usize) -> BigUint {
    (BigUint::one() << (2 * bit_width)) / modulus
}

/// Reassembles limbs produced under `config`.
pub fn from_limbs(limbs: &[BigUint], config: &LimbConfig) -> BigUint {
    let shift = config.limb_bits;
    let fold = |acc: BigUint, limb: &BigUint| (acc << shift) | limb;
    match config.order {
        LimbOrder::LeastSignificantFirst => limbs.iter().rev().fold(BigUint::zero(), fold),
        LimbOrder::MostSignificantFirst => limbs.iter().fold(BigUint::zero(), fold),
    }
}

fn decompose(value: &BigUint, count: usize, config: &LimbConfig) -> Result<Limbs> {
    let limb_bits = config.limb_bits;
    let capacity = (count * limb_bits) as u64;
    if value.bits() > capacity {
        return Err(CircuitInputError::LimbOverflow {
            bits: value.bits(),
            capacity,
        });
    }

    let mask = (BigUint::one() << limb_bits) - 1u32;
    let mut rest = value.clone();
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(&rest & &mask);
        rest >>= limb_bits;
    }
    if config.order == LimbOrder::MostSignificantFirst {
        values.reverse();
    }

    debug!(count, limb_bits, value_bits = value.bits(), "decomposed into limbs");
    Ok(Limbs {
        values,
        format: config.format,
    })
}
