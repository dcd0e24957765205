use serde_json::Value;

use super::filter::{matches_service, prefilter};
use super::keyword::rank_by_keywords;
use super::vector::rank_by_embedding;
use super::{ScoredVendor, SelectionQuery};
use crate::llm::rerank::{rerank, MAX_PICKS};
use crate::llm::LlmProvider;
use crate::models::{now_iso, AuditRecord, AuditRef, SelectionResponse, VendorPick, VendorProfile};
use crate::state::AppState;

/// Shortlist size handed to the re-rank step and written to the audit log.
pub const RETRIEVAL_LIMIT: usize = 20;

pub const METHOD_LLM_RERANK: &str = "rag_retrieval:llm_rerank";
pub const METHOD_LOCAL_RERANK: &str = "rag_retrieval:local_rerank";

const REASON_MATCHED: &str = "Matched requested services and markets";
const REASON_PARTIAL: &str = "Partial match - review details";

/// Which scorer produced the retrieval ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retrieval {
    /// Cosine similarity in `[-1, 1]`
    Embedding,
    /// Additive keyword heuristic in `[0, 100]`
    Keyword,
}

/// Full recommendation flow for one request:
///   1. Pre-filter the catalog on requested service
///   2. Retrieve: embedding similarity when vectors are available, keyword heuristic otherwise
///   3. Keep the top 20
///   4. Re-rank via the chat model when configured, else take the top 9 as-is
///   5. Append an audit record
///
/// Provider failures only ever downgrade the result; this never errors.
pub async fn select_vendors(state: &AppState, request: &Value) -> SelectionResponse {
    let catalog = state.catalog.load();
    let query = SelectionQuery::from_request(request);
    let pool = prefilter(&catalog, &query);
    let llm = state.llm.as_deref();

    let (retrieval, mut ranked) = retrieve(state, llm, &catalog, &pool, &query).await;
    ranked.truncate(RETRIEVAL_LIMIT);
    tracing::info!(
        "Retrieved {} candidates via {:?} from a pool of {}",
        ranked.len(),
        retrieval,
        pool.len()
    );

    let mut final_list = Vec::new();
    let mut used_llm = false;
    if let Some(llm) = llm.filter(|_| !ranked.is_empty()) {
        match rerank(llm, &query.text, &ranked).await {
            Ok(picks) => {
                used_llm = true;
                final_list = picks;
            }
            Err(e) => tracing::warn!("Re-rank via {} failed: {e:#}", llm.name()),
        }
    }
    if final_list.is_empty() {
        final_list = local_picks(&ranked, retrieval, &query);
    }

    let method = if used_llm {
        METHOD_LLM_RERANK
    } else {
        METHOD_LOCAL_RERANK
    };
    let record = AuditRecord {
        created_at: now_iso(),
        request: request.clone(),
        retrieval_candidates: ranked.iter().map(ScoredVendor::to_candidate).collect(),
        final_selection: final_list.clone(),
        method: method.to_string(),
    };
    if let Err(e) = state.audit.append(&record) {
        tracing::warn!("Failed to write selection audit record: {e}");
    }
    tracing::info!("Selected {} vendors ({method})", final_list.len());

    SelectionResponse {
        vendors: final_list,
        audit: AuditRef {
            id: record.created_at,
            method: record.method,
        },
    }
}

async fn retrieve(
    state: &AppState,
    llm: Option<&dyn LlmProvider>,
    catalog: &[VendorProfile],
    pool: &[VendorProfile],
    query: &SelectionQuery,
) -> (Retrieval, Vec<ScoredVendor>) {
    if let Some(embeddings) = state.embeddings.ensure(catalog, llm, false).await {
        match llm {
            Some(llm) => match llm.embed(&query.text).await {
                Ok(query_embedding) => {
                    let ranked = rank_by_embedding(pool, &query_embedding, &embeddings);
                    if !ranked.is_empty() {
                        return (Retrieval::Embedding, ranked);
                    }
                    tracing::warn!("No cached vectors for any candidate; using keyword scoring");
                }
                Err(e) => tracing::warn!("Query embedding failed: {e:#}"),
            },
            None => tracing::debug!("Embedding cache present but no provider to embed the query"),
        }
    }
    (Retrieval::Keyword, rank_by_keywords(pool, query))
}

/// Top picks straight from the retrieval order, with a canned reason.
fn local_picks(
    ranked: &[ScoredVendor],
    retrieval: Retrieval,
    query: &SelectionQuery,
) -> Vec<VendorPick> {
    ranked
        .iter()
        .take(MAX_PICKS)
        .map(|c| {
            let raw = match retrieval {
                Retrieval::Embedding => c.score * 100.0,
                Retrieval::Keyword => c.score,
            };
            let reason = if matches_service(&c.vendor, query.service.as_deref()) {
                REASON_MATCHED
            } else {
                REASON_PARTIAL
            };
            VendorPick {
                name: c.vendor.name.clone(),
                score: Some(raw.min(100.0).trunc()),
                reason: Some(reason.to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(name: &str, services: &[&str], score: f64) -> ScoredVendor {
        ScoredVendor {
            vendor: VendorProfile {
                name: name.to_string(),
                services: services.iter().map(|s| s.to_string()).collect(),
                countries: vec![],
                description: String::new(),
                capacity_per_month: None,
            },
            score,
        }
    }

    #[test]
    fn test_local_picks_keyword_scores() {
        let query = SelectionQuery {
            service: Some("Packaging".to_string()),
            ..SelectionQuery::default()
        };
        let ranked = vec![
            scored("A", &["Packaging"], 75.9),
            scored("B", &["Testing"], 15.0),
        ];
        let picks = local_picks(&ranked, Retrieval::Keyword, &query);
        assert_eq!(picks[0].score, Some(75.0));
        assert_eq!(picks[0].reason.as_deref(), Some(REASON_MATCHED));
        assert_eq!(picks[1].reason.as_deref(), Some(REASON_PARTIAL));
    }

    #[test]
    fn test_local_picks_embedding_scores_scaled() {
        let ranked = vec![scored("A", &[], 0.876), scored("B", &[], -0.25)];
        let picks = local_picks(&ranked, Retrieval::Embedding, &SelectionQuery::default());
        assert_eq!(picks[0].score, Some(87.0));
        assert_eq!(picks[1].score, Some(-25.0));
        // No service requested counts as a match
        assert_eq!(picks[0].reason.as_deref(), Some(REASON_MATCHED));
    }

    #[test]
    fn test_local_picks_capped() {
        let ranked: Vec<ScoredVendor> = (0..15).map(|i| scored(&format!("V{i}"), &[], 150.0)).collect();
        let picks = local_picks(&ranked, Retrieval::Keyword, &SelectionQuery::default());
        assert_eq!(picks.len(), MAX_PICKS);
        assert!(picks.iter().all(|p| p.score == Some(100.0)));
    }
}
