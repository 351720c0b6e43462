//! Crossref `works` items and their canonical mapping.

use serde::Deserialize;
use serde_json::Value;

use super::lenient;
use crate::affiliation::AffiliationSource;
use crate::common::{unique_authors, Publication};
use crate::normalize::{clean_doi, date_from_parts, doi_url, year_of};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrossrefWork {
    #[serde(rename = "DOI", default, deserialize_with = "lenient::opt_string")]
    pub doi: Option<String>,
    #[serde(rename = "URL", default, deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub title: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub author: Option<Vec<CrossrefAuthor>>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub container_title: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub published_print: Option<DateParts>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub published_online: Option<DateParts>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub issued: Option<DateParts>,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefAuthor {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub given: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub family: Option<String>,
    /// Organizational authors carry a single name
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub affiliation: Option<Vec<CrossrefAffiliation>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefAffiliation {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
}

/// `{"date-parts": [[2021, 3, 5]]}`; entries may be null or partial
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DateParts {
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub date_parts: Option<Vec<Vec<Value>>>,
}

impl DateParts {
    fn to_iso(&self) -> Option<String> {
        let first = self.date_parts.as_ref()?.first()?;
        let parts: Vec<i64> = first.iter().map_while(|v| v.as_i64()).collect();
        date_from_parts(&parts)
    }
}

impl CrossrefAuthor {
    fn display_name(&self) -> String {
        let joined = [self.given.as_deref(), self.family.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            self.name.clone().unwrap_or_default()
        } else {
            joined
        }
    }
}

impl CrossrefWork {
    /// print, then online, then issued
    fn resolved_date(&self) -> Option<String> {
        [&self.published_print, &self.published_online, &self.issued]
            .into_iter()
            .flatten()
            .find_map(DateParts::to_iso)
    }

    /// Map to the canonical record shape
    pub fn to_publication(&self) -> Publication {
        let doi = clean_doi(self.doi.as_deref());
        let date = self.resolved_date();
        let year = date.as_deref().and_then(year_of);

        let authors = unique_authors(
            self.author
                .iter()
                .flatten()
                .map(CrossrefAuthor::display_name),
        );

        let (id, url) = match &doi {
            Some(doi) => (Some(format!("DOI:{}", doi)), Some(doi_url(doi))),
            None => (self.url.clone(), self.url.clone()),
        };

        Publication {
            id,
            source: "Crossref".to_string(),
            sources: Vec::new(),
            kind: self.kind.clone(),
            title: self.title.first().cloned(),
            authors,
            venue: self.container_title.first().cloned(),
            year,
            date,
            doi,
            pmid: None,
            url,
        }
    }
}

impl AffiliationSource for CrossrefWork {
    fn affiliations(&self) -> Vec<&str> {
        self.author
            .iter()
            .flatten()
            .flat_map(|a| a.affiliation.iter().flatten())
            .filter_map(|aff| aff.name.as_deref())
            .collect()
    }
}
