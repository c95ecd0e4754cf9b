//! Tabular result frames and the frame-encoder contract
//!
//! Frames are opaque to the bridge beyond their encoded byte form; the
//! columnar encoding itself is supplied by the embedding application.

use serde::{Deserialize, Serialize};

use crate::error::EncodeError;

/// One unit of tabular result data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    /// Column payload, not interpreted by the bridge.
    pub fields: serde_json::Value,
}

impl Frame {
    pub fn new(name: impl Into<String>, fields: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// Encodes one frame into its wire byte payload.
pub trait FrameEncoder: Send + Sync {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, EncodeError>;
}

/// Frame encoder producing plain JSON payloads.
///
/// Lets the bridge run end-to-end without an external columnar codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFrameEncoder;

impl FrameEncoder for JsonFrameEncoder {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, EncodeError> {
        serde_json::to_vec(frame).map_err(|e| EncodeError::new(frame.name.clone(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_encoder_round_trips_a_frame() {
        let frame = Frame::new("cpu", serde_json::json!({"values": [1, 2, 3]}));
        let bytes = JsonFrameEncoder.encode(&frame).unwrap();

        let back: Frame = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, frame);
    }
}
