//! Input documents, one per circuit layout.

use std::collections::HashMap;

use num_bigint::BigUint;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

pub mod h256;
pub mod jwt_string;
pub mod rs256;

/// A fully populated input document for one circuit layout.
pub trait CircuitInputs: Serialize {
    /// Layout name, as accepted by the CLI's `inspect` command.
    const LAYOUT: &'static str;

    fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Reads an emitted document of this layout back into flat field values.
    fn parse_document(json: &Value) -> Result<HashMap<String, Vec<BigUint>>>;
}
