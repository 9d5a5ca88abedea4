//! Transport encoding for the place gesture.
//!
//! A palette drag hands the host an opaque [`DragPayload`]; the host gives
//! it back on drop. The encoding is JSON so it survives any string-typed
//! drag-and-drop channel and round-trips id, name and column order exactly.

use crate::template::NodeTemplate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors decoding a drag payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Malformed drag payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Serialized node template carried through a drag-and-drop transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DragPayload(String);

impl DragPayload {
    /// Encode a template for transport.
    pub fn encode(template: &NodeTemplate) -> Self {
        match serde_json::to_string(template) {
            Ok(json) => Self(json),
            Err(e) => {
                log::error!("Failed to encode template {}: {}", template.id, e);
                Self::default()
            }
        }
    }

    /// Wrap raw transport data received from the host.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Decode the template back out of the transport form.
    pub fn decode(&self) -> Result<NodeTemplate, PayloadError> {
        Ok(serde_json::from_str(&self.0)?)
    }

    /// Check if the host delivered no data at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
