//! Wire format: MessagePack maps with named fields, one request frame answered by one reply frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;

/// Lowest accepted sampling temperature.
pub const MIN_TEMPERATURE: f32 = 0.1;
/// Highest accepted sampling temperature.
pub const MAX_TEMPERATURE: f32 = 3.0;

/// Generation parameters forwarded verbatim to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub max_new_tokens: u32,
    pub num_beams: u32,
    pub no_repeat_ngram_size: u32,
    pub repetition_penalty: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 2.8,
            max_new_tokens: 500,
            num_beams: 2,
            no_repeat_ngram_size: 2,
            repetition_penalty: 1.01,
        }
    }
}

impl SamplingConfig {
    /// Sets the temperature clamped to `[MIN_TEMPERATURE, MAX_TEMPERATURE]` and returns the value kept.
    pub fn set_temperature(&mut self, temperature: f32) -> f32 {
        let t = if temperature.is_nan() {
            self.temperature
        } else {
            temperature.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
        };
        self.temperature = t;
        t
    }
}

/// Request frame. Serialized as `{"type": "generate", ...}` or `{"type": "ping", "from": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireRequest {
    Generate {
        text: String,
        model: String,
        config: SamplingConfig,
        from: String,
    },
    Ping {
        from: String,
    },
}

impl WireRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            WireRequest::Generate { .. } => "generate",
            WireRequest::Ping { .. } => "ping",
        }
    }
}

pub fn encode(request: &WireRequest) -> Result<Vec<u8>, RpcError> {
    rmp_serde::to_vec_named(request).map_err(|e| RpcError::Codec(e.to_string()))
}

/// Decodes a reply frame into a dynamic value; the service defines its shape.
pub fn decode(frame: &[u8]) -> Result<Value, RpcError> {
    rmp_serde::from_slice(frame).map_err(|e| RpcError::Codec(e.to_string()))
}

/// Interprets a reply as text: strings are used as-is, nil and blank strings are absence,
/// anything else is rendered as compact JSON.
pub fn reply_text(reply: Value) -> Option<String> {
    match reply {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
