use crate::models::VendorProfile;

use super::SelectionQuery;

/// True when no service was requested, or when the requested service and one
/// of the vendor's services contain each other (case-insensitive).
pub fn matches_service(vendor: &VendorProfile, service: Option<&str>) -> bool {
    let Some(service) = service else {
        return true;
    };
    let wanted = service.to_lowercase();
    vendor.services.iter().any(|s| {
        let s = s.to_lowercase();
        s.contains(&wanted) || wanted.contains(&s)
    })
}

/// True when no market was requested, or when a requested market and one of
/// the vendor's countries contain each other (case-insensitive).
pub fn matches_market(vendor: &VendorProfile, markets: &[String]) -> bool {
    if markets.is_empty() {
        return true;
    }
    let countries: Vec<String> = vendor.countries.iter().map(|c| c.to_lowercase()).collect();
    markets.iter().any(|m| {
        let m = m.to_lowercase();
        countries.iter().any(|c| c.contains(&m) || m.contains(c.as_str()))
    })
}

/// Narrow the catalog to vendors offering the requested service.
///
/// Market coverage is evaluated but does not exclude anyone; an uncovered
/// market only costs the vendor its keyword bonus later. An empty result
/// falls back to the whole catalog.
pub fn prefilter(catalog: &[VendorProfile], query: &SelectionQuery) -> Vec<VendorProfile> {
    let mut pool = Vec::new();
    for vendor in catalog {
        if query.service.is_some() && !matches_service(vendor, query.service.as_deref()) {
            continue;
        }
        if !matches_market(vendor, &query.markets) {
            tracing::debug!("{} does not cover requested markets; kept", vendor.name);
        }
        pool.push(vendor.clone());
    }

    if pool.is_empty() {
        tracing::debug!("Service filter matched no vendor; using full catalog");
        return catalog.to_vec();
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor(name: &str, services: &[&str], countries: &[&str]) -> VendorProfile {
        VendorProfile {
            name: name.to_string(),
            services: services.iter().map(|s| s.to_string()).collect(),
            countries: countries.iter().map(|s| s.to_string()).collect(),
            description: String::new(),
            capacity_per_month: None,
        }
    }

    fn query(service: Option<&str>, markets: &[&str]) -> SelectionQuery {
        SelectionQuery {
            service: service.map(str::to_string),
            markets: markets.iter().map(|s| s.to_string()).collect(),
            text: String::new(),
        }
    }

    #[test]
    fn test_service_match_is_bidirectional_substring() {
        let v = vendor("A", &["Secondary Packaging"], &[]);
        assert!(matches_service(&v, Some("packaging")));
        let v = vendor("B", &["Testing"], &[]);
        assert!(matches_service(&v, Some("Stability Testing")));
        assert!(!matches_service(&v, Some("Packaging")));
        assert!(matches_service(&v, None));
    }

    #[test]
    fn test_market_match() {
        let v = vendor("A", &[], &["United States", "Canada"]);
        assert!(matches_market(&v, &["united states (FDA)".to_string()]));
        assert!(matches_market(&v, &["Canada".to_string()]));
        assert!(!matches_market(&v, &["Japan".to_string()]));
        assert!(matches_market(&v, &[]));
    }

    #[test]
    fn test_prefilter_by_service() {
        let catalog = vec![
            vendor("Pack", &["Packaging"], &[]),
            vendor("Test", &["Testing"], &[]),
        ];
        let pool = prefilter(&catalog, &query(Some("packaging"), &[]));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].name, "Pack");
    }

    #[test]
    fn test_prefilter_market_never_excludes() {
        let catalog = vec![
            vendor("US", &["Packaging"], &["United States"]),
            vendor("JP", &["Packaging"], &["Japan"]),
        ];
        let pool = prefilter(&catalog, &query(Some("Packaging"), &["United States"]));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_prefilter_no_match_falls_back_to_catalog() {
        let catalog = vec![
            vendor("Pack", &["Packaging"], &[]),
            vendor("Test", &["Testing"], &[]),
        ];
        let pool = prefilter(&catalog, &query(Some("Gene Therapy"), &[]));
        assert_eq!(pool, catalog);
    }
}
