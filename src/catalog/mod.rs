pub mod builder;
pub mod persistence;

pub use builder::*;
pub use persistence::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::affiliation::AffiliationMode;
use crate::common::{Publication, SourceKind};

/// The persisted catalog: run metadata plus the reconciled publications
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub affiliations: Vec<String>,
    #[serde(default)]
    pub affiliation_mode: Option<AffiliationMode>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub count: usize,
    /// Output items each system contributed to
    #[serde(default)]
    pub sources: BTreeMap<String, usize>,
    #[serde(default)]
    pub items: Vec<Publication>,
}

/// Metadata describing how a catalog was produced
#[derive(Debug, Clone)]
pub struct CatalogMeta {
    pub generated_at: String,
    pub affiliations: Vec<String>,
    pub affiliation_mode: AffiliationMode,
    pub query: String,
    /// Remote sources enabled for the run; manual is always counted
    pub enabled: Vec<SourceKind>,
}

/// Count the items each source label appears on. Manual and every enabled source
/// are listed even when they contributed nothing.
pub fn source_counts(items: &[Publication], enabled: &[SourceKind]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    counts.insert(SourceKind::Manual.as_str().to_string(), 0);
    for kind in enabled {
        counts.insert(kind.as_str().to_string(), 0);
    }

    for item in items {
        for label in &item.sources {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
    }
    counts
}

impl CatalogDocument {
    pub fn new(meta: CatalogMeta, items: Vec<Publication>) -> Self {
        Self {
            generated_at: meta.generated_at,
            affiliation: meta.affiliations.first().cloned(),
            sources: source_counts(&items, &meta.enabled),
            count: items.len(),
            affiliations: meta.affiliations,
            affiliation_mode: Some(meta.affiliation_mode),
            query: Some(meta.query),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, sources: &[&str]) -> Publication {
        Publication {
            title: Some(title.to_string()),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn meta() -> CatalogMeta {
        CatalogMeta {
            generated_at: "2026-01-01T00:00:00Z".to_string(),
            affiliations: vec!["Systems Biology".to_string(), "Kyiv".to_string()],
            affiliation_mode: AffiliationMode::Strict,
            query: "AFF:\"Systems Biology\"".to_string(),
            enabled: vec![SourceKind::EuropePmc, SourceKind::Crossref],
        }
    }

    #[test]
    fn test_document_counts() {
        let items = vec![
            item("a", &["europepmc", "crossref"]),
            item("b", &["manual", "europepmc"]),
            item("c", &["crossref"]),
        ];
        let doc = CatalogDocument::new(meta(), items);

        assert_eq!(doc.count, 3);
        assert_eq!(doc.affiliation.as_deref(), Some("Systems Biology"));
        let counts: Vec<(&str, usize)> = doc.sources.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(counts, vec![("crossref", 2), ("europepmc", 2), ("manual", 1)]);
    }

    #[test]
    fn test_disabled_source_absent_unless_contributing() {
        let counts = source_counts(&[], &[SourceKind::OpenAlex]);
        assert_eq!(counts.get("openalex"), Some(&0));
        assert_eq!(counts.get("manual"), Some(&0));
        assert!(!counts.contains_key("crossref"));
    }

    #[test]
    fn test_json_layout() {
        let doc = CatalogDocument::new(meta(), vec![item("a", &["crossref"])]);
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["generatedAt"], "2026-01-01T00:00:00Z");
        assert_eq!(value["affiliationMode"], "strict");
        assert_eq!(value["count"], 1);
        assert!(value["items"][0]["doi"].is_null());
        assert_eq!(value["items"][0]["type"], serde_json::Value::Null);
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert!(keys.contains(&"sources"));
        assert!(keys.contains(&"query"));
    }

    #[test]
    fn test_reads_sparse_document() {
        let doc: CatalogDocument = serde_json::from_str(r#"{"generatedAt": "x", "items": []}"#).unwrap();
        assert_eq!(doc.generated_at, "x");
        assert_eq!(doc.count, 0);
        assert!(doc.affiliation_mode.is_none());
    }
}
