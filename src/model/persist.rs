//! Model files: the bundle as JSON inside an envelope carrying its SHA-256,
//! zstd-compressed. Floats are written and parsed with exact round-trip.

use super::ModelBundle;
use crate::error::{PredictError, Result};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use sha2::{Digest, Sha256};
use std::path::Path;

/// zstd level for model files.
const COMPRESSION_LEVEL: i32 = 3;

#[derive(Serialize)]
struct EnvelopeOut {
    sha256: String,
    bundle: Box<RawValue>,
}

#[derive(Deserialize)]
struct EnvelopeIn<'a> {
    sha256: String,
    #[serde(borrow)]
    bundle: &'a RawValue,
}

fn digest(payload: &str) -> String {
    format!("{:x}", Sha256::digest(payload.as_bytes()))
}

pub fn save(bundle: &ModelBundle, path: &Path) -> Result<()> {
    let payload = serde_json::to_string(bundle)?;
    let envelope = EnvelopeOut {
        sha256: digest(&payload),
        bundle: RawValue::from_string(payload)?,
    };
    let json = serde_json::to_vec(&envelope)?;
    let compressed = zstd::encode_all(json.as_slice(), COMPRESSION_LEVEL)?;
    std::fs::write(path, &compressed)?;
    tracing::info!(
        path = %path.display(),
        model_id = %bundle.model_id,
        json_bytes = json.len(),
        file_bytes = compressed.len(),
        "model saved"
    );
    Ok(())
}

pub fn load(path: &Path) -> Result<ModelBundle> {
    let compressed = std::fs::read(path)?;
    let data = zstd::decode_all(compressed.as_slice())?;
    let envelope: EnvelopeIn<'_> = serde_json::from_slice(&data)?;
    if digest(envelope.bundle.get()) != envelope.sha256 {
        return Err(PredictError::Checksum);
    }
    Ok(serde_json::from_str(envelope.bundle.get())?)
}
