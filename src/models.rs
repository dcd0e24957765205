use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// An attachment saved alongside a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub originalname: String,
    /// URL path the file is served under (`/uploads/<stored name>`)
    pub path: String,
    pub size: u64,
}

/// A submitted procurement request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEntry {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient_string_map")]
    pub body: BTreeMap<String, String>,
    #[serde(default)]
    pub files: Vec<UploadedFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Form fields written by older clients may hold numbers or arrays; keep them
/// as their JSON text rather than rejecting the whole store.
fn lenient_string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, Value> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| {
            let s = match v {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (k, s)
        })
        .collect())
}

/// A vendor as listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_per_month: Option<f64>,
}

impl VendorProfile {
    /// Degraded profile built from a bare vendor name.
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            services: Vec::new(),
            countries: Vec::new(),
            description: name.to_string(),
            capacity_per_month: None,
        }
    }
}

/// A vendor with its retrieval score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub name: String,
    pub score: f64,
}

/// One entry of the final ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorPick {
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "integral_score"
    )]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Whole-number scores go out as JSON integers (`40`, not `40.0`).
fn integral_score<S>(score: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match score {
        Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => serializer.serialize_i64(*v as i64),
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_none(),
    }
}

/// Persisted trace of one vendor-selection call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub request: Value,
    pub retrieval_candidates: Vec<CandidateScore>,
    pub final_selection: Vec<VendorPick>,
    pub method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRef {
    pub id: String,
    pub method: String,
}

/// Vendor selection response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub vendors: Vec<VendorPick>,
    pub audit: AuditRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRequestResponse {
    pub success: bool,
    pub id: String,
    pub entry: RequestEntry,
}

#[derive(Debug, Clone, Serialize)]
pub struct RfpResponse {
    pub success: bool,
    pub download_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RebuildResponse {
    pub success: bool,
    pub count: usize,
}

/// A form schema available to the frontend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaEntry {
    pub id: String,
    pub file: String,
}

/// Current UTC time as ISO-8601 with millisecond precision and a `Z` suffix.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}
