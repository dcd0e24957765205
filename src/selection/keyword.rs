use crate::models::VendorProfile;

use super::{sort_desc, ScoredVendor, SelectionQuery};

pub const SERVICE_BONUS: f64 = 40.0;
pub const MARKET_BONUS: f64 = 25.0;
pub const DESCRIPTION_BONUS: f64 = 15.0;
pub const MAX_CAPACITY_BONUS: f64 = 20.0;
/// Monthly capacity that earns the full capacity bonus.
pub const REFERENCE_CAPACITY: f64 = 1_000_000.0;

/// Leading description words checked against the query text.
const DESCRIPTION_WORDS: usize = 6;

/// Additive heuristic used when no embeddings are available.
pub fn keyword_score(vendor: &VendorProfile, query: &SelectionQuery) -> f64 {
    let mut score = 0.0;

    if let Some(service) = query.service.as_deref() {
        let wanted = service.to_lowercase();
        let hit = vendor.services.iter().any(|s| {
            let s = s.to_lowercase();
            s.contains(&wanted) || wanted.contains(&s)
        });
        if hit {
            score += SERVICE_BONUS;
        }
    }

    if !query.markets.is_empty() {
        let countries = vendor.countries.join(" ").to_lowercase();
        if query
            .markets
            .iter()
            .any(|m| countries.contains(&m.to_lowercase()))
        {
            score += MARKET_BONUS;
        }
    }

    let query_lower = query.text.to_lowercase();
    let description = vendor.description.to_lowercase();
    if description
        .split_whitespace()
        .take(DESCRIPTION_WORDS)
        .any(|word| query_lower.contains(word))
    {
        score += DESCRIPTION_BONUS;
    }

    let capacity = vendor.capacity_per_month.unwrap_or(0.0);
    if capacity > 0.0 {
        score += (capacity / REFERENCE_CAPACITY * MAX_CAPACITY_BONUS).min(MAX_CAPACITY_BONUS);
    }

    score
}

pub fn rank_by_keywords(pool: &[VendorProfile], query: &SelectionQuery) -> Vec<ScoredVendor> {
    let mut scored: Vec<ScoredVendor> = pool
        .iter()
        .map(|v| ScoredVendor {
            vendor: v.clone(),
            score: keyword_score(v, query),
        })
        .collect();
    sort_desc(&mut scored);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> VendorProfile {
        VendorProfile {
            name: "Acme Biologics".to_string(),
            services: vec!["Packaging".to_string()],
            countries: vec!["United States".to_string()],
            description: "desc".to_string(),
            capacity_per_month: Some(500_000.0),
        }
    }

    #[test]
    fn test_service_market_and_capacity() {
        let query = SelectionQuery {
            service: Some("Packaging".to_string()),
            markets: vec!["United States".to_string()],
            text: "Packaging".to_string(),
        };
        let score = keyword_score(&acme(), &query);
        assert!((score - (SERVICE_BONUS + MARKET_BONUS + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_description_word_bonus() {
        let mut v = acme();
        v.description = "Sterile fill finish specialists".to_string();
        v.capacity_per_month = None;
        let query = SelectionQuery {
            service: None,
            markets: vec![],
            text: "Need STERILE fill".to_string(),
        };
        assert_eq!(keyword_score(&v, &query), DESCRIPTION_BONUS);
    }

    #[test]
    fn test_description_bonus_only_checks_leading_words() {
        let mut v = acme();
        v.description = "one two three four five six seven".to_string();
        v.capacity_per_month = None;
        let query = SelectionQuery {
            text: "seven".to_string(),
            ..SelectionQuery::default()
        };
        assert_eq!(keyword_score(&v, &query), 0.0);
    }

    #[test]
    fn test_capacity_bonus_is_capped() {
        let mut v = acme();
        v.capacity_per_month = Some(5_000_000.0);
        let query = SelectionQuery::default();
        assert_eq!(keyword_score(&v, &query), MAX_CAPACITY_BONUS);
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let mut low = acme();
        low.name = "Low".to_string();
        low.capacity_per_month = Some(100_000.0);
        let mut tie_a = acme();
        tie_a.name = "TieA".to_string();
        let mut tie_b = acme();
        tie_b.name = "TieB".to_string();

        let query = SelectionQuery::default();
        let ranked = rank_by_keywords(&[low, tie_a, tie_b], &query);
        let names: Vec<&str> = ranked.iter().map(|s| s.vendor.name.as_str()).collect();
        assert_eq!(names, vec!["TieA", "TieB", "Low"]);
    }
}
