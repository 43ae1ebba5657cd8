//! SQL for each document family, plus the column codecs they share.

pub mod engagement;
pub mod fix_crud;
pub mod issue_crud;
pub mod listing;
pub mod search;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use civicfix_core::errors::{CivicResult, StorageError};

use crate::to_storage_err;

/// Fixed-width RFC 3339 so timestamps compare correctly as text.
pub(crate) fn ts(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(s: &str) -> CivicResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp {s:?}: {e}")))
}

pub(crate) fn to_json<T: Serialize>(id: &str, value: &T) -> CivicResult<String> {
    serde_json::to_string(value).map_err(|e| {
        StorageError::Serialization {
            id: id.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

pub(crate) fn from_json<T: DeserializeOwned>(id: &str, raw: &str) -> CivicResult<T> {
    serde_json::from_str(raw).map_err(|e| {
        StorageError::Serialization {
            id: id.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Little-endian f32 encoding.
pub(crate) fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

pub(crate) fn bytes_to_f32_vec(id: &str, bytes: &[u8], dims: usize) -> CivicResult<Vec<f32>> {
    if bytes.len() != dims * 4 {
        return Err(StorageError::CorruptEmbedding {
            id: id.to_string(),
            reason: format!("{} bytes for {dims} dimensions", bytes.len()),
        }
        .into());
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Decode a LEFT JOINed `(embedding, dimensions)` pair. Both columns are
/// NULL when the document has no stored vector.
pub(crate) fn joined_embedding(
    id: &str,
    blob: Option<Vec<u8>>,
    dims: Option<i64>,
) -> CivicResult<Option<Vec<f32>>> {
    match (blob, dims) {
        (Some(blob), Some(dims)) => bytes_to_f32_vec(id, &blob, dims.max(0) as usize).map(Some),
        _ => Ok(None),
    }
}

/// Cosine similarity in f64. Zero when either side has zero norm.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
