//! Slot serialization codecs.
//!
//! # Responsibility
//! - Convert typed cell values to and from the raw strings storage holds.
//!
//! # Invariants
//! - `decode(encode(v)) == v` for every value the codec accepts.
//! - Codecs are stateless from the cell's point of view.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Encoding or decoding failure for one slot payload.
#[derive(Debug)]
pub enum CodecError {
    Encode {
        codec: &'static str,
        message: String,
    },
    Decode {
        codec: &'static str,
        message: String,
    },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode { codec, message } => write!(f, "{codec} encode failed: {message}"),
            Self::Decode { codec, message } => write!(f, "{codec} decode failed: {message}"),
        }
    }
}

impl Error for CodecError {}

/// Pluggable serialization format for persistent cells.
pub trait Codec {
    /// Short format name used in logs and errors.
    fn name(&self) -> &'static str;
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, CodecError>;
    fn decode<T: DeserializeOwned>(&self, raw: &str) -> Result<T, CodecError>;
}

/// Compact JSON, the format browsers' `localStorage` payloads use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<String, CodecError> {
        serde_json::to_string(value).map_err(|err| CodecError::Encode {
            codec: self.name(),
            message: err.to_string(),
        })
    }

    fn decode<T: DeserializeOwned>(&self, raw: &str) -> Result<T, CodecError> {
        serde_json::from_str(raw).map_err(|err| CodecError::Decode {
            codec: self.name(),
            message: err.to_string(),
        })
    }
}

/// Indented JSON; same wire shape as [`JsonCodec`], easier to diff by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrettyJsonCodec;

impl Codec for PrettyJsonCodec {
    fn name(&self) -> &'static str {
        "json_pretty"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<String, CodecError> {
        serde_json::to_string_pretty(value).map_err(|err| CodecError::Encode {
            codec: self.name(),
            message: err.to_string(),
        })
    }

    fn decode<T: DeserializeOwned>(&self, raw: &str) -> Result<T, CodecError> {
        JsonCodec.decode(raw)
    }
}
