//! Europe PMC REST search.
//!
//! Endpoint: https://www.ebi.ac.uk/europepmc/webservices/rest/search

use anyhow::Result;
use reqwest::Client;

use super::{endpoint, fetch_json, Page, QueryService};

/// Largest page the search endpoint accepts
pub const MAX_PAGE_SIZE: usize = 1000;

const STOP_WORDS: &[&str] = &["and", "or", "for", "of", "the", "a", "an", "in", "to", "with"];

/// Query for one affiliation phrase: the exact AFF phrase, a wildcard token query
/// (wildcards only work on terms, not quoted phrases), then a plain phrase search
/// for records whose affiliation field is incompletely indexed.
fn phrase_query(affiliation: &str) -> String {
    let quoted = affiliation.trim().replace('"', "\\\"");

    let tokens: Vec<&str> = affiliation
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| t.len() >= 3)
        .filter(|t| !STOP_WORDS.contains(&t.to_lowercase().as_str()))
        .collect();

    let token_query = match tokens.split_last() {
        Some((last, head)) if !head.is_empty() => {
            Some(format!("AFF:({} AND {}*)", head.join(" AND "), last))
        }
        Some((only, _)) => Some(format!("AFF:{}*", only)),
        None => None,
    };

    let mut parts = vec![format!("AFF:\"{}\"", quoted)];
    parts.extend(token_query);
    parts.push(format!("\"{}\"", quoted));
    parts.join(" OR ")
}

/// Europe PMC query covering every affiliation phrase
pub fn build_query<S: AsRef<str>>(affiliations: &[S]) -> String {
    affiliations
        .iter()
        .map(|a| a.as_ref().trim())
        .filter(|a| !a.is_empty())
        .map(phrase_query)
        .collect::<Vec<_>>()
        .join(" OR ")
}

pub struct EuropePmcSearch<'a> {
    client: &'a Client,
    url: String,
    query: String,
    page_size: usize,
}

impl<'a> EuropePmcSearch<'a> {
    pub fn new(client: &'a Client, base_url: &str, query: String, page_size: usize) -> Self {
        Self {
            client,
            url: endpoint(base_url, "search"),
            query,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

impl QueryService for EuropePmcSearch<'_> {
    fn name(&self) -> &str {
        "Europe PMC"
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    async fn fetch_page(&self, cursor: &str) -> Result<Page> {
        let params = [
            ("query", self.query.clone()),
            ("format", "json".to_string()),
            ("resultType", "core".to_string()),
            ("pageSize", self.page_size.to_string()),
            ("cursorMark", cursor.to_string()),
            ("sort", "FIRST_PDATE_D desc".to_string()),
        ];
        let body = fetch_json(self.client, &self.url, &params).await?;
        Ok(Page::from_body(&body, "/resultList/result", "/nextCursorMark"))
    }
}
