//! Crossref REST works search by affiliation.

use anyhow::Result;
use reqwest::Client;

use super::{endpoint, fetch_json, Page, QueryService};

/// Largest `rows` value Crossref serves with deep paging
pub const MAX_PAGE_SIZE: usize = 1000;

pub struct CrossrefSearch<'a> {
    client: &'a Client,
    url: String,
    affiliation: String,
    page_size: usize,
    mailto: Option<String>,
}

impl<'a> CrossrefSearch<'a> {
    pub fn new(
        client: &'a Client,
        base_url: &str,
        affiliation: &str,
        page_size: usize,
        mailto: Option<String>,
    ) -> Self {
        Self {
            client,
            url: endpoint(base_url, "works"),
            affiliation: affiliation.trim().to_string(),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            mailto,
        }
    }

    fn params(&self, cursor: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query.affiliation", self.affiliation.clone()),
            ("rows", self.page_size.to_string()),
            ("cursor", cursor.to_string()),
        ];
        if let Some(mailto) = &self.mailto {
            params.push(("mailto", mailto.clone()));
        }
        params
    }
}

impl QueryService for CrossrefSearch<'_> {
    fn name(&self) -> &str {
        "Crossref"
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    async fn fetch_page(&self, cursor: &str) -> Result<Page> {
        let body = fetch_json(self.client, &self.url, &self.params(cursor)).await?;
        Ok(Page::from_body(&body, "/message/items", "/message/next-cursor"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    use crate::remote::create_api_client;

    #[test]
    fn test_request_params() {
        let client = create_api_client(Duration::from_secs(5)).unwrap();
        let search = CrossrefSearch::new(&client, "https://api.crossref.org/", " Systems Biology ", 5000, None);
        assert_eq!(search.url, "https://api.crossref.org/works");
        assert_eq!(search.page_size(), MAX_PAGE_SIZE);
        assert_eq!(
            search.params("*"),
            vec![
                ("query.affiliation", "Systems Biology".to_string()),
                ("rows", "1000".to_string()),
                ("cursor", "*".to_string()),
            ]
        );

        let polite = CrossrefSearch::new(&client, "https://api.crossref.org", "x", 20, Some("lab@example.org".into()));
        assert!(polite.params("*").contains(&("mailto", "lab@example.org".to_string())));
    }

    #[test]
    fn test_page_layout() {
        let body = json!({
            "status": "ok",
            "message": { "items": [ {"DOI": "10.1/a"}, {"DOI": "10.1/b"} ], "next-cursor": "DnF1ZXJ5" }
        });
        let page = Page::from_body(&body, "/message/items", "/message/next-cursor");
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.next_cursor.as_deref(), Some("DnF1ZXJ5"));
    }
}
