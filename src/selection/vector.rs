use crate::models::VendorProfile;
use crate::store::EmbeddingMap;

use super::{sort_desc, ScoredVendor};

/// Score candidates by cosine similarity to the query embedding.
/// Vendors without a cached vector are left out.
pub fn rank_by_embedding(
    pool: &[VendorProfile],
    query_embedding: &[f32],
    embeddings: &EmbeddingMap,
) -> Vec<ScoredVendor> {
    let mut scored: Vec<ScoredVendor> = pool
        .iter()
        .filter_map(|v| {
            let vec = embeddings.get(&v.name).filter(|e| !e.is_empty())?;
            Some(ScoredVendor {
                vendor: v.clone(),
                score: f64::from(cosine_similarity(query_embedding, vec)),
            })
        })
        .collect();
    sort_desc(&mut scored);
    scored
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
