//! REST envelope and error-body shapes shared by every endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Failure envelope: `{ error, fields? }`.
///
/// `fields` carries per-field validation messages when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

/// Single-payload wrapper: `{ data }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Paginated list wrapper: `{ data, total, page, limit }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
}
