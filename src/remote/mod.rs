//! Remote query services: cursor-paginated searches against the literature APIs.
//!
//! Europe PMC, Crossref and OpenAlex share one cursor protocol: the first request
//! uses `*`, every response hands back the next cursor. Pages are fetched strictly
//! one after another.

pub mod crossref;
pub mod europepmc;
pub mod http;
pub mod openalex;

pub use crossref::CrossrefSearch;
pub use europepmc::{build_query, EuropePmcSearch};
pub use http::*;
pub use openalex::{configured_institutions, resolve_institutions, OpenAlexSearch};

use anyhow::Result;
use log::debug;
use serde_json::Value;

use crate::common::create_harvest_spinner;

pub const FIRST_CURSOR: &str = "*";

/// One page of raw records
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub records: Vec<Value>,
    pub next_cursor: Option<String>,
}

impl Page {
    /// Records as a JSON array at `records_ptr`, cursor as a string at `cursor_ptr`
    pub fn from_body(body: &Value, records_ptr: &str, cursor_ptr: &str) -> Self {
        let records = body
            .pointer(records_ptr)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let next_cursor = body
            .pointer(cursor_ptr)
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .map(String::from);
        Self { records, next_cursor }
    }
}

/// A paginated search against one API.
#[allow(async_fn_in_trait)]
pub trait QueryService {
    /// Name used in progress output and logs
    fn name(&self) -> &str;

    /// Records requested per page
    fn page_size(&self) -> usize;

    async fn fetch_page(&self, cursor: &str) -> Result<Page>;
}

/// Fetch pages until the cursor stops advancing, a page comes back short, or
/// `max_pages` pages have been read.
pub async fn harvest_pages<S: QueryService>(service: &S, max_pages: usize) -> Result<Vec<Value>> {
    let spinner = create_harvest_spinner(service.name());
    let mut cursor = FIRST_CURSOR.to_string();
    let mut all: Vec<Value> = Vec::new();

    for page_number in 1..=max_pages {
        let page = match service.fetch_page(&cursor).await {
            Ok(page) => page,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e);
            }
        };

        let received = page.records.len();
        all.extend(page.records);
        spinner.set_message(format!("{} records ({} pages)", all.len(), page_number));
        spinner.tick();
        debug!("{} page {}: {} records", service.name(), page_number, received);

        match page.next_cursor {
            Some(next) if next != cursor && received >= service.page_size() => cursor = next,
            _ => break,
        }
    }

    spinner.finish_and_clear();
    Ok(all)
}
