//! OpenAlex institution lookup and works search.
//!
//! Works are scoped by institution lineage, so records come back already relevant
//! and are not filtered by affiliation text afterwards.

use anyhow::Result;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;

use super::{endpoint, fetch_json, Page, QueryService};
use crate::normalize::normalize_text;
use crate::sources::openalex::short_openalex_id;

/// Largest `per-page` value OpenAlex accepts
pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Default, Deserialize)]
struct InstitutionResults {
    #[serde(default)]
    results: Vec<Institution>,
}

#[derive(Debug, Default, Deserialize)]
struct Institution {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    display_name_alternatives: Vec<String>,
}

impl Institution {
    fn is_named(&self, phrase: &str) -> bool {
        self.display_name
            .iter()
            .chain(self.display_name_alternatives.iter())
            .any(|name| normalize_text(name).contains(phrase))
    }
}

fn push_unique(ids: &mut Vec<String>, id: String) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

/// Institution ids for the affiliation phrases, found through the institutions search.
/// Only results whose name contains the phrase are kept; fuzzy search hits for other
/// organisations are discarded.
pub async fn resolve_institutions<S: AsRef<str>>(
    client: &Client,
    base_url: &str,
    phrases: &[S],
    mailto: Option<&str>,
) -> Result<Vec<String>> {
    let url = endpoint(base_url, "institutions");
    let mut ids = Vec::new();

    for phrase in phrases.iter().map(|p| p.as_ref().trim()).filter(|p| !p.is_empty()) {
        let wanted = normalize_text(phrase);
        let mut params = vec![("search", phrase.to_string())];
        if let Some(mailto) = mailto {
            params.push(("mailto", mailto.to_string()));
        }

        let body = fetch_json(client, &url, &params).await?;
        let found: InstitutionResults = serde_json::from_value(body).unwrap_or_default();

        for institution in found.results.iter().filter(|i| i.is_named(&wanted)) {
            if let Some(id) = institution.id.as_deref().and_then(short_openalex_id) {
                debug!("OpenAlex institution {} ({:?}) matches {:?}", id, institution.display_name, phrase);
                push_unique(&mut ids, id);
            }
        }
    }

    info!("Resolved {} OpenAlex institution id(s)", ids.len());
    Ok(ids)
}

/// Configured institution ids in short form ("I123"), accepting full entity URLs
pub fn configured_institutions(raw: &[String]) -> Vec<String> {
    let mut ids = Vec::new();
    for id in raw.iter().filter_map(|r| short_openalex_id(r)) {
        push_unique(&mut ids, id);
    }
    ids
}

pub struct OpenAlexSearch<'a> {
    client: &'a Client,
    url: String,
    filter: String,
    page_size: usize,
    mailto: Option<String>,
}

impl<'a> OpenAlexSearch<'a> {
    pub fn new(
        client: &'a Client,
        base_url: &str,
        institution_ids: &[String],
        page_size: usize,
        mailto: Option<String>,
    ) -> Self {
        Self {
            client,
            url: endpoint(base_url, "works"),
            filter: format!("authorships.institutions.lineage:{}", institution_ids.join("|")),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            mailto,
        }
    }

    fn params(&self, cursor: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("filter", self.filter.clone()),
            ("per-page", self.page_size.to_string()),
            ("cursor", cursor.to_string()),
        ];
        if let Some(mailto) = &self.mailto {
            params.push(("mailto", mailto.clone()));
        }
        params
    }
}

impl QueryService for OpenAlexSearch<'_> {
    fn name(&self) -> &str {
        "OpenAlex"
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    async fn fetch_page(&self, cursor: &str) -> Result<Page> {
        let body = fetch_json(self.client, &self.url, &self.params(cursor)).await?;
        Ok(Page::from_body(&body, "/results", "/meta/next_cursor"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    use crate::remote::create_api_client;

    #[test]
    fn test_institution_name_filter() {
        let found: InstitutionResults = serde_json::from_value(json!({
            "results": [
                {
                    "id": "https://openalex.org/I1",
                    "display_name": "Ukrainian Institute for Systems Biology and Medicine"
                },
                {
                    "id": "https://openalex.org/I2",
                    "display_name": "Institute of Molecular Biology",
                    "display_name_alternatives": ["UISBM - Systems Biology"]
                },
                { "id": "https://openalex.org/I3", "display_name": "Kyiv University" }
            ]
        }))
        .unwrap();

        let wanted = normalize_text("Systems-Biology");
        let kept: Vec<&str> = found
            .results
            .iter()
            .filter(|i| i.is_named(&wanted))
            .filter_map(|i| i.id.as_deref())
            .collect();
        assert_eq!(kept, vec!["https://openalex.org/I1", "https://openalex.org/I2"]);
    }

    #[test]
    fn test_configured_institutions() {
        let raw = vec![
            "https://openalex.org/I123".to_string(),
            "I123".to_string(),
            " I456 ".to_string(),
            "".to_string(),
        ];
        assert_eq!(configured_institutions(&raw), vec!["I123", "I456"]);
    }

    #[test]
    fn test_works_request_params() {
        let client = create_api_client(Duration::from_secs(5)).unwrap();
        let ids = vec!["I1".to_string(), "I2".to_string()];
        let search = OpenAlexSearch::new(&client, "https://api.openalex.org", &ids, 1000, None);
        assert_eq!(search.page_size(), MAX_PAGE_SIZE);
        assert_eq!(
            search.params("*"),
            vec![
                ("filter", "authorships.institutions.lineage:I1|I2".to_string()),
                ("per-page", "200".to_string()),
                ("cursor", "*".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_layout() {
        let body = json!({ "meta": { "next_cursor": "IlsxNjk" }, "results": [ {"id": "W1"} ] });
        let page = Page::from_body(&body, "/results", "/meta/next_cursor");
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.next_cursor.as_deref(), Some("IlsxNjk"));
    }
}
