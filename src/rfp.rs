//! Plain-text RFP documents rendered from stored requests.

use std::collections::BTreeMap;
use std::path::Path;

use crate::store::{RequestRepository, StoreError};

/// Body fields rendered in fixed order, with their labels.
const RFP_FIELDS: [(&str, &str); 12] = [
    ("projectName", "Project Name"),
    ("description", "Description"),
    ("company_name", "Company"),
    ("primary_contact", "Primary Contact"),
    ("email", "Email"),
    ("request_type", "Request Type"),
    ("services_needed", "Services Needed"),
    ("target_markets", "Target Markets"),
    ("budget", "Budget"),
    ("decisionDeadline", "Decision Deadline"),
    ("additional_info", "Additional Info"),
    ("keyCriteria", "Key Criteria"),
];

pub fn rfp_file_name(request_id: &str) -> String {
    format!("{request_id}_rfp.txt")
}

fn field<'a>(body: &'a BTreeMap<String, String>, key: &str) -> &'a str {
    body.get(key).map(String::as_str).unwrap_or_default()
}

pub fn render(request_id: &str, body: &BTreeMap<String, String>) -> String {
    let mut lines = vec![
        "Request for Proposal (RFP)".to_string(),
        format!("Request ID: {request_id}"),
    ];
    lines.extend(
        RFP_FIELDS
            .iter()
            .map(|(key, label)| format!("{label}: {}", field(body, key))),
    );

    let extras: Vec<String> = body
        .iter()
        .filter(|(k, v)| !v.is_empty() && !RFP_FIELDS.iter().any(|(key, _)| *key == k.as_str()))
        .map(|(k, v)| format!("{k}: {v}"))
        .collect();
    if !extras.is_empty() {
        lines.push(String::new());
        lines.push("Additional Fields:".to_string());
        lines.extend(extras);
    }

    lines.push(String::new());
    lines.push("Thank you for considering this RFP.".to_string());
    lines.join("\n")
}

/// Render the RFP for `request_id` into `rfp_dir` and return its download path.
pub fn generate(
    requests: &dyn RequestRepository,
    rfp_dir: &Path,
    request_id: &str,
) -> Result<String, StoreError> {
    let entry = requests
        .find(request_id)
        .ok_or_else(|| StoreError::NotFound("Request".to_string()))?;

    std::fs::create_dir_all(rfp_dir)?;
    let file_name = rfp_file_name(&entry.id);
    std::fs::write(rfp_dir.join(&file_name), render(&entry.id, &entry.body))?;
    tracing::info!("Generated RFP {file_name}");

    Ok(format!("/data/rfps/{file_name}"))
}
