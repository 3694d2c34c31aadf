use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PayloadError;
use crate::types::replay::ReplaySettings;

pub const PAYLOAD_VERSION: u64 = 1;

/// Replay request accepted at the HTTP boundary.
///
/// The `version` field is checked before the body is decoded so that payloads
/// from a different schema generation are rejected instead of half-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayPayload {
    pub version: u64,
    pub track_ids: Vec<String>,
    /// Falls back to the server's configured defaults when absent.
    #[serde(default)]
    pub settings: Option<ReplaySettings>,
    pub fps: Option<u32>,
    #[serde(default)]
    pub opponent: Option<OpponentRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpponentRequest {
    pub reference_id: String,
    pub target_duration_secs: f64,
    pub name: Option<String>,
}

impl ReplayPayload {
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        let version = value
            .get("version")
            .and_then(Value::as_u64)
            .ok_or(PayloadError::MissingVersion)?;
        if version != PAYLOAD_VERSION {
            return Err(PayloadError::UnsupportedVersion(version));
        }

        let payload: ReplayPayload =
            serde_json::from_value(value).map_err(|e| PayloadError::Malformed(e.to_string()))?;
        if payload.track_ids.is_empty() {
            return Err(PayloadError::NoTracks);
        }
        Ok(payload)
    }
}
