use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::models::VendorProfile;

use super::{read_json, seed_json, StoreError};

/// Names seeded into `vendors.json` on first start.
pub const DEFAULT_VENDOR_NAMES: [&str; 10] = [
    "Acme Biologics",
    "BioGenix Solutions",
    "PharmaPro Partners",
    "SterilePack Inc.",
    "GlobalTest Labs",
    "MedPack Services",
    "NextGen Pharma",
    "Vaxel Manufacturing",
    "EuroPharm Logistics",
    "Precision Analytics",
];

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<Value>),
    Wrapped { vendors: Vec<Value> },
}

/// Decode one catalog record; a malformed record is skipped, not fatal.
fn parse_record(raw: Value) -> Option<VendorProfile> {
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string();
    match serde_json::from_value(raw) {
        Ok(vendor) => Some(vendor),
        Err(e) => {
            tracing::warn!("Skipping malformed catalog record {name}: {e}");
            None
        }
    }
}

/// Read-only vendor catalog.
///
/// The full catalog lives in `vendors_catalog.json`. When it is missing or
/// unreadable, profiles are synthesized from the plain name list in
/// `vendors.json` (no services, no countries, description = name).
pub struct VendorCatalog {
    catalog_path: PathBuf,
    names_path: PathBuf,
}

impl VendorCatalog {
    /// Open the catalog, seeding the fallback name list if absent.
    pub fn open(catalog_path: &Path, names_path: &Path) -> Result<Self, StoreError> {
        seed_json(names_path, &DEFAULT_VENDOR_NAMES)?;
        Ok(Self {
            catalog_path: catalog_path.to_path_buf(),
            names_path: names_path.to_path_buf(),
        })
    }

    pub fn load(&self) -> Vec<VendorProfile> {
        let vendors: Vec<VendorProfile> = match read_json::<CatalogFile>(&self.catalog_path) {
            Some(CatalogFile::List(records)) | Some(CatalogFile::Wrapped { vendors: records }) => {
                records.into_iter().filter_map(parse_record).collect()
            }
            None => {
                let names: Vec<String> = read_json(&self.names_path).unwrap_or_default();
                names.iter().map(|n| VendorProfile::from_name(n)).collect()
            }
        };
        vendors.into_iter().filter(|v| !v.name.is_empty()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(dir: &tempfile::TempDir) -> VendorCatalog {
        VendorCatalog::open(
            &dir.path().join("vendors_catalog.json"),
            &dir.path().join("vendors.json"),
        )
        .unwrap()
    }

    #[test]
    fn test_falls_back_to_seeded_names() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = open(&dir);
        let vendors = catalog.load();
        assert_eq!(vendors.len(), DEFAULT_VENDOR_NAMES.len());
        assert_eq!(vendors[0].name, "Acme Biologics");
        assert_eq!(vendors[0].description, "Acme Biologics");
        assert!(vendors[0].services.is_empty());
    }

    #[test]
    fn test_reads_array_catalog() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("vendors_catalog.json"),
            r#"[{"name":"Acme","services":["Packaging"],"countries":["US"],"description":"d","capacity_per_month":1000}]"#,
        )
        .unwrap();
        let vendors = open(&dir).load();
        assert_eq!(vendors.len(), 1);
        assert_eq!(vendors[0].services, vec!["Packaging".to_string()]);
        assert_eq!(vendors[0].capacity_per_month, Some(1000.0));
    }

    #[test]
    fn test_reads_wrapped_catalog_and_skips_nameless() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("vendors_catalog.json"),
            r#"{"vendors":[{"name":"A"},{"description":"no name"}]}"#,
        )
        .unwrap();
        let vendors = open(&dir).load();
        assert_eq!(vendors.len(), 1);
        assert_eq!(vendors[0].name, "A");
    }

    #[test]
    fn test_malformed_record_skipped_not_whole_catalog() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("vendors_catalog.json"),
            r#"[
                {"name":"Acme","services":["Packaging"],"capacity_per_month":500000},
                {"name":"Odd","services":["Testing"],"capacity_per_month":"1000"},
                {"name":"Flat","services":"Testing"},
                "not a record",
                {"name":"Beta","countries":["DE"]}
            ]"#,
        )
        .unwrap();
        let names: Vec<String> = open(&dir).load().into_iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["Acme".to_string(), "Beta".to_string()]);
    }

    #[test]
    fn test_corrupt_catalog_uses_name_list() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vendors_catalog.json"), "{{").unwrap();
        std::fs::write(dir.path().join("vendors.json"), r#"["Only One"]"#).unwrap();
        let vendors = open(&dir).load();
        assert_eq!(vendors.len(), 1);
        assert_eq!(vendors[0].name, "Only One");
    }
}
