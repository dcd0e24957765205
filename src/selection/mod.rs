//! Vendor recommendation: deterministic pre-filter, retrieval scoring
//! (embedding similarity or keyword heuristic), optional LLM re-rank, audit.

pub mod filter;
pub mod keyword;
pub mod pipeline;
pub mod query;
pub mod vector;

use crate::models::{CandidateScore, VendorProfile};

pub use pipeline::{select_vendors, Retrieval};
pub use query::SelectionQuery;

/// A catalog vendor with its retrieval score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredVendor {
    pub vendor: VendorProfile,
    pub score: f64,
}

impl ScoredVendor {
    pub fn to_candidate(&self) -> CandidateScore {
        CandidateScore {
            name: self.vendor.name.clone(),
            score: self.score,
        }
    }
}

/// Stable sort, highest score first. Ties keep catalog order.
pub(crate) fn sort_desc(scored: &mut [ScoredVendor]) {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
