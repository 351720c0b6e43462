//! Hand-curated override records.
//!
//! The manual file is either an object `{ "dois": [...], "pmids": [...], "items": [...] }`
//! (every key optional) or a bare array of records. A missing or unreadable file means
//! no manual input.

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::{decode_records, lenient};
use crate::common::{unique_authors, Publication};
use crate::normalize::{clean_doi, clean_pmid, doi_url, iso_date_prefix, pubmed_url, year_of};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualRecord {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub source: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub venue: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub doi: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub pmid: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
}

impl ManualRecord {
    pub fn from_doi(doi: &str) -> Self {
        Self {
            doi: Some(doi.to_string()),
            ..Default::default()
        }
    }

    pub fn from_pmid(pmid: &str) -> Self {
        Self {
            pmid: Some(pmid.to_string()),
            ..Default::default()
        }
    }

    /// Map to the canonical record shape
    pub fn to_publication(&self) -> Publication {
        let doi = clean_doi(self.doi.as_deref());
        let pmid = clean_pmid(self.pmid.as_deref()).or_else(|| self.pmid.clone());
        let date = self.date.as_deref().and_then(iso_date_prefix);
        let year = self.year.or_else(|| date.as_deref().and_then(year_of));

        let title = self
            .title
            .clone()
            .or_else(|| doi.as_ref().map(|doi| format!("DOI: {}", doi)));

        let url = self
            .url
            .clone()
            .or_else(|| doi.as_deref().map(doi_url))
            .or_else(|| pmid.as_deref().map(pubmed_url));

        let id = match (&doi, &pmid) {
            (Some(doi), _) => Some(format!("DOI:{}", doi)),
            (None, Some(pmid)) => Some(format!("PMID:{}", pmid)),
            (None, None) => self.url.clone().or_else(|| self.id.clone()),
        };

        Publication {
            id,
            source: self.source.clone().unwrap_or_else(|| "Manual".to_string()),
            sources: Vec::new(),
            kind: self.kind.clone(),
            title,
            authors: unique_authors(self.authors.iter().cloned()),
            venue: self.venue.clone(),
            year,
            date,
            doi,
            pmid,
            url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ManualListing {
    #[serde(default, deserialize_with = "lenient::string_list")]
    dois: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pmids: Vec<String>,
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManualFile {
    Items(Vec<Value>),
    Listing(ManualListing),
}

/// Everything the manual file seeds into the merge.
#[derive(Debug, Clone, Default)]
pub struct ManualInput {
    pub records: Vec<ManualRecord>,
}

impl ManualInput {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Parse manual input; full records first, then bare DOIs, then bare PMIDs
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        let (items, dois, pmids) = match serde_json::from_str::<ManualFile>(text)? {
            ManualFile::Items(items) => (items, Vec::new(), Vec::new()),
            ManualFile::Listing(listing) => (listing.items, listing.dois, listing.pmids),
        };

        let mut records: Vec<ManualRecord> = decode_records(items, "manual");
        records.extend(dois.iter().map(|doi| ManualRecord::from_doi(doi)));
        records.extend(pmids.iter().map(|pmid| ManualRecord::from_pmid(pmid)));
        Ok(Self { records })
    }
}

/// Read the manual file; absent or malformed input yields no records
pub fn read_manual_input<P: AsRef<Path>>(path: P) -> ManualInput {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!("No manual input at {}: {}", path.display(), e);
            return ManualInput::default();
        }
    };

    match ManualInput::parse(&text) {
        Ok(input) => {
            info!("Loaded {} manual records from {}", input.len(), path.display());
            input
        }
        Err(e) => {
            warn!("Ignoring unparsable manual input {}: {}", path.display(), e);
            ManualInput::default()
        }
    }
}
