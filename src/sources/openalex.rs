//! OpenAlex `works` results and their canonical mapping.
//!
//! OpenAlex results are not filtered by affiliation here; the works query is already
//! restricted to the resolved institution ids.

use serde::Deserialize;

use super::lenient;
use crate::common::{unique_authors, Publication};
use crate::normalize::{clean_doi, clean_pmid, doi_url, iso_date_prefix, year_of};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAlexWork {
    /// Work URL, e.g. https://openalex.org/W2741809807
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub doi: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_year")]
    pub publication_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub publication_date: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub authorships: Option<Vec<Authorship>>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub primary_location: Option<Location>,
    /// Retired in favour of primary_location but still present in older snapshots
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub host_venue: Option<HostVenue>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub ids: Option<WorkIds>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Authorship {
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub author: Option<AuthorRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorRef {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub source: Option<LocationSource>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub landing_page_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationSource {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub publisher: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub host_organization_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostVenue {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkIds {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub pmid: Option<String>,
}

/// Short OpenAlex key ("W123", "I456") from a full entity URL
pub fn short_openalex_id(raw: &str) -> Option<String> {
    let tail = raw.trim().trim_end_matches('/').rsplit('/').next()?.trim();
    if tail.is_empty() {
        None
    } else {
        Some(tail.to_string())
    }
}

impl OpenAlexWork {
    fn location_source(&self) -> Option<&LocationSource> {
        self.primary_location.as_ref()?.source.as_ref()
    }

    /// primary source name, legacy host venue, then the source's publisher
    fn venue(&self) -> Option<String> {
        let source = self.location_source();
        source
            .and_then(|s| s.display_name.clone())
            .or_else(|| self.host_venue.as_ref().and_then(|v| v.display_name.clone()))
            .or_else(|| source.and_then(|s| s.publisher.clone().or_else(|| s.host_organization_name.clone())))
    }

    /// Map to the canonical record shape
    pub fn to_publication(&self) -> Publication {
        let doi = clean_doi(self.doi.as_deref());
        let pmid = clean_pmid(self.ids.as_ref().and_then(|ids| ids.pmid.as_deref()));
        let date = self.publication_date.as_deref().and_then(iso_date_prefix);
        let year = self.publication_year.or_else(|| date.as_deref().and_then(year_of));

        let authors = unique_authors(
            self.authorships
                .iter()
                .flatten()
                .filter_map(|a| a.author.as_ref()?.display_name.clone()),
        );

        let id = match &doi {
            Some(doi) => Some(format!("DOI:{}", doi)),
            None => self
                .id
                .as_deref()
                .and_then(short_openalex_id)
                .map(|work| format!("OpenAlex:{}", work)),
        };

        let url = doi
            .as_deref()
            .map(doi_url)
            .or_else(|| self.primary_location.as_ref().and_then(|l| l.landing_page_url.clone()))
            .or_else(|| self.id.clone());

        Publication {
            id,
            source: "OpenAlex".to_string(),
            sources: Vec::new(),
            kind: self.kind.clone(),
            title: self.title.clone().or_else(|| self.display_name.clone()),
            authors,
            venue: self.venue(),
            year,
            date,
            doi,
            pmid,
            url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn work(value: serde_json::Value) -> OpenAlexWork {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_work_mapping() {
        let w = work(json!({
            "id": "https://openalex.org/W4300000001",
            "doi": "https://doi.org/10.3389/FCELL.2022.1",
            "title": "Aging clocks",
            "publication_year": 2022,
            "publication_date": "2022-08-15",
            "type": "article",
            "authorships": [
                { "author": { "display_name": "Olena Kovalenko" } },
                { "author": { "display_name": "OLENA KOVALENKO" } },
                { "author": null }
            ],
            "primary_location": { "source": { "display_name": "Frontiers in Cell and Developmental Biology" } },
            "ids": { "pmid": "https://pubmed.ncbi.nlm.nih.gov/36000001" }
        }));
        let p = w.to_publication();
        assert_eq!(p.source, "OpenAlex");
        assert_eq!(p.doi.as_deref(), Some("10.3389/fcell.2022.1"));
        assert_eq!(p.id.as_deref(), Some("DOI:10.3389/fcell.2022.1"));
        assert_eq!(p.pmid.as_deref(), Some("36000001"));
        assert_eq!(p.authors, vec!["Olena Kovalenko"]);
        assert_eq!(p.venue.as_deref(), Some("Frontiers in Cell and Developmental Biology"));
        assert_eq!(p.date.as_deref(), Some("2022-08-15"));
        assert_eq!(p.year, Some(2022));
    }

    #[test]
    fn test_id_and_url_without_doi() {
        let w = work(json!({
            "id": "https://openalex.org/W42",
            "display_name": "Display only",
            "primary_location": { "landing_page_url": "https://example.org/w42", "source": null }
        }));
        let p = w.to_publication();
        assert_eq!(p.id.as_deref(), Some("OpenAlex:W42"));
        assert_eq!(p.title.as_deref(), Some("Display only"));
        assert_eq!(p.url.as_deref(), Some("https://example.org/w42"));
        assert_eq!(p.venue, None);
    }

    #[test]
    fn test_venue_preference() {
        let legacy = work(json!({
            "host_venue": { "display_name": "Legacy Venue" },
            "primary_location": { "source": { "publisher": "Elsevier" } }
        }));
        assert_eq!(legacy.venue().as_deref(), Some("Legacy Venue"));

        let publisher = work(json!({
            "primary_location": { "source": { "host_organization_name": "Springer" } }
        }));
        assert_eq!(publisher.venue().as_deref(), Some("Springer"));
    }

    #[test]
    fn test_short_openalex_id() {
        assert_eq!(short_openalex_id("https://openalex.org/I123"), Some("I123".to_string()));
        assert_eq!(short_openalex_id("I123"), Some("I123".to_string()));
        assert_eq!(short_openalex_id(""), None);
    }
}
