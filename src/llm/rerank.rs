use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use super::{ChatMessage, LlmProvider};
use crate::models::VendorPick;
use crate::selection::ScoredVendor;

/// Most picks kept from the model's ranking.
pub const MAX_PICKS: usize = 9;
const DESCRIPTION_CHARS: usize = 300;

const SYSTEM_PROMPT: &str = "You are a careful procurement assistant. Given a user request and a short list of candidate vendor profiles, produce a ranked top-7 to top-9 list. \
Each returned item must be JSON object with: name (string), score (0-100 integer), reason (1-2 sentences). Return a single JSON object with key 'top_k'.";

const REQUIREMENTS_NOTES: &str = "Prioritize exact service match, regulatory coverage for target markets, capacity and track record. Keep output concise and factual.";

#[derive(Serialize)]
struct CandidateSummary<'a> {
    name: &'a str,
    services: &'a [String],
    countries: &'a [String],
    short_description: String,
}

#[derive(Serialize)]
struct RerankPayload<'a> {
    request_summary: &'a str,
    candidates: Vec<CandidateSummary<'a>>,
    requirements_notes: &'a str,
}

/// Ask the chat model to reorder and annotate the retrieval shortlist.
/// Any failure (transport, empty reply, unparsable JSON) is an error the
/// caller is expected to swallow.
pub async fn rerank(
    llm: &dyn LlmProvider,
    query_text: &str,
    candidates: &[ScoredVendor],
) -> Result<Vec<VendorPick>> {
    let messages = build_messages(query_text, candidates)?;
    let reply = llm.chat(&messages).await?;
    parse_rerank_response(&reply).with_context(|| {
        let preview: String = reply.chars().take(200).collect();
        format!("Re-rank reply had no usable ranking: {preview}")
    })
}

pub fn build_messages(query_text: &str, candidates: &[ScoredVendor]) -> Result<Vec<ChatMessage>> {
    let payload = RerankPayload {
        request_summary: query_text,
        candidates: candidates
            .iter()
            .map(|c| CandidateSummary {
                name: &c.vendor.name,
                services: &c.vendor.services,
                countries: &c.vendor.countries,
                short_description: c.vendor.description.chars().take(DESCRIPTION_CHARS).collect(),
            })
            .collect(),
        requirements_notes: REQUIREMENTS_NOTES,
    };
    let user = serde_json::to_string_pretty(&payload)?;
    Ok(vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)])
}

/// Extract the ranked list from a model reply. Accepts the list under
/// `top_k`, `vendors` or `results`, tolerates prose before the JSON object,
/// and returns `None` when nothing usable is found.
pub fn parse_rerank_response(content: &str) -> Option<Vec<VendorPick>> {
    let parsed: Value = serde_json::from_str(content).ok().or_else(|| {
        let start = content.find('{')?;
        let end = content.rfind('}')?;
        if end <= start {
            return None;
        }
        serde_json::from_str(&content[start..=end]).ok()
    })?;

    let list = ["top_k", "vendors", "results"]
        .iter()
        .filter_map(|k| parsed.get(k))
        .find(|v| !v.is_null() && v.as_array().map_or(true, |a| !a.is_empty()))?
        .as_array()?;

    let picks: Vec<VendorPick> = list
        .iter()
        .take(MAX_PICKS)
        .filter_map(parse_pick)
        .collect();

    if picks.is_empty() {
        None
    } else {
        Some(picks)
    }
}

fn parse_pick(item: &Value) -> Option<VendorPick> {
    match item {
        Value::String(name) if !name.is_empty() => Some(VendorPick {
            name: name.clone(),
            score: None,
            reason: None,
        }),
        Value::Object(obj) => {
            let name = obj.get("name")?.as_str().filter(|n| !n.is_empty())?;
            let score = obj.get("score").and_then(|s| match s {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            });
            let reason = obj.get("reason").and_then(|r| match r {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            });
            Some(VendorPick {
                name: name.to_string(),
                score,
                reason,
            })
        }
        _ => None,
    }
}
