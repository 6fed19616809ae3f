//! Field policy table for Secret resources.
//!
//! Maps each governed top-level field to the encoding applied to resolved
//! values before they are written back. `data` holds base64 text, `stringData`
//! holds plain text; the placeholder itself is plain text in both.

use base64::Engine;

/// How a resolved secret is written into its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Standard base64 alphabet, padded.
    Base64,
    /// Raw value, unchanged.
    Plain,
}

impl Encoding {
    pub fn apply(self, raw: &str) -> String {
        match self {
            Encoding::Base64 => base64::engine::general_purpose::STANDARD.encode(raw.as_bytes()),
            Encoding::Plain => raw.to_string(),
        }
    }
}

/// Encoding rule for one governed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    pub field: &'static str,
    pub encoding: Encoding,
}

impl FieldPolicy {
    pub const fn new(field: &'static str, encoding: Encoding) -> Self {
        Self { field, encoding }
    }
}

pub const DATA_FIELD: &str = "data";
pub const STRING_DATA_FIELD: &str = "stringData";

/// Governed fields of a `v1` Secret, in processing order.
pub const SECRET_FIELD_POLICIES: [FieldPolicy; 2] = [
    FieldPolicy::new(DATA_FIELD, Encoding::Base64),
    FieldPolicy::new(STRING_DATA_FIELD, Encoding::Plain),
];
