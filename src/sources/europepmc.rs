//! Europe PMC search results (`resultType=core`) and their canonical mapping.

use serde::Deserialize;

use super::lenient;
use crate::affiliation::AffiliationSource;
use crate::common::{unique_authors, Publication};
use crate::normalize::{clean_doi, doi_url, iso_date_prefix, pubmed_url, year_of};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EuropePmcRecord {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    /// Europe PMC collection code: MED, PPR, PMC, AGR, ...
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub pmid: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub doi: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub author_string: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub author_list: Option<AuthorList>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub journal_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub journal_info: Option<JournalInfo>,
    #[serde(default, deserialize_with = "lenient::opt_year")]
    pub pub_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub first_publication_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub pub_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub pub_type: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub pub_type_list: Option<PubTypeList>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub full_text_url_list: Option<FullTextUrlList>,
    /// Document-level affiliation (lite result type)
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub affiliation: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub author_affiliation_details_list: Option<AffiliationDetailsList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorList {
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub author: Option<Vec<Author>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub affiliation: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub author_affiliation_details_list: Option<AffiliationDetailsList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliationDetailsList {
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub author_affiliation: Option<Vec<AffiliationDetail>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AffiliationDetail {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub affiliation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JournalInfo {
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub journal: Option<Journal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Journal {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubTypeList {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub pub_type: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullTextUrlList {
    #[serde(default, deserialize_with = "lenient::opt_nested")]
    pub full_text_url: Option<Vec<FullTextUrl>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FullTextUrl {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
}

impl AffiliationDetailsList {
    fn affiliations(&self) -> impl Iterator<Item = &str> {
        self.author_affiliation
            .iter()
            .flatten()
            .filter_map(|d| d.affiliation.as_deref())
    }
}

impl Author {
    fn display_name(&self) -> Option<String> {
        if let Some(full) = &self.full_name {
            return Some(full.clone());
        }
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

impl EuropePmcRecord {
    /// Canonical source label: PubMed, Preprint, or the raw collection code
    pub fn source_label(&self) -> String {
        match self.source.as_deref() {
            Some("MED") => "PubMed".to_string(),
            Some("PPR") => "Preprint".to_string(),
            Some(other) => other.to_string(),
            None => "Unknown".to_string(),
        }
    }

    pub fn journal(&self) -> Option<&str> {
        self.journal_title.as_deref().or_else(|| {
            self.journal_info
                .as_ref()
                .and_then(|info| info.journal.as_ref())
                .and_then(|journal| journal.title.as_deref())
        })
    }

    /// PubMed records are always kept; preprints only from the listed servers
    pub fn is_wanted_source(&self, preprint_servers: &[String]) -> bool {
        match self.source.as_deref() {
            Some("MED") => true,
            Some("PPR") => {
                let journal = self.journal().unwrap_or("").to_lowercase();
                preprint_servers
                    .iter()
                    .map(|s| s.trim().to_lowercase())
                    .any(|server| !server.is_empty() && journal.contains(&server))
            }
            _ => false,
        }
    }

    fn authors(&self) -> Vec<String> {
        if let Some(authors) = self.author_list.as_ref().and_then(|l| l.author.as_ref()) {
            return unique_authors(authors.iter().filter_map(Author::display_name));
        }
        match &self.author_string {
            Some(s) => unique_authors(
                s.trim_end_matches('.')
                    .split(',')
                    .map(|name| name.trim().to_string()),
            ),
            None => Vec::new(),
        }
    }

    fn publication_type(&self) -> Option<String> {
        self.pub_type.first().cloned().or_else(|| {
            self.pub_type_list
                .as_ref()
                .and_then(|list| list.pub_type.first().cloned())
        })
    }

    fn first_full_text_url(&self) -> Option<String> {
        self.full_text_url_list
            .as_ref()
            .and_then(|list| list.full_text_url.as_ref())
            .and_then(|urls| urls.iter().find_map(|u| u.url.clone()))
    }

    /// Map to the canonical record shape
    pub fn to_publication(&self) -> Publication {
        let source = self.source_label();
        let doi = clean_doi(self.doi.as_deref());
        let pmid = self.pmid.clone();

        let date = [self.first_publication_date.as_deref(), self.pub_date.as_deref()]
            .into_iter()
            .flatten()
            .find_map(iso_date_prefix);
        let year = self.pub_year.or_else(|| date.as_deref().and_then(year_of));

        let venue = self
            .journal()
            .map(String::from)
            .or_else(|| (source == "Preprint").then(|| "Preprint".to_string()));

        let url = match (&doi, &pmid) {
            (Some(doi), _) => Some(doi_url(doi)),
            (None, Some(pmid)) => Some(pubmed_url(pmid)),
            (None, None) => self.first_full_text_url(),
        };

        let id = match (&pmid, &doi, &self.id) {
            (Some(pmid), _, _) => Some(format!("PMID:{}", pmid)),
            (None, Some(doi), _) => Some(format!("DOI:{}", doi)),
            (None, None, Some(raw)) => Some(format!("EPMC:{}", raw)),
            (None, None, None) => None,
        };

        Publication {
            id,
            source,
            sources: Vec::new(),
            kind: self.publication_type(),
            title: self.title.clone(),
            authors: self.authors(),
            venue,
            year,
            date,
            doi,
            pmid,
            url,
        }
    }
}

impl AffiliationSource for EuropePmcRecord {
    fn affiliations(&self) -> Vec<&str> {
        let mut found: Vec<&str> = self.affiliation.as_deref().into_iter().collect();
        if let Some(details) = &self.author_affiliation_details_list {
            found.extend(details.affiliations());
        }
        for author in self.author_list.iter().flat_map(|l| l.author.iter().flatten()) {
            found.extend(author.affiliation.as_deref());
            if let Some(details) = &author.author_affiliation_details_list {
                found.extend(details.affiliations());
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affiliation::{matches, TargetPhrases};
    use serde_json::json;

    fn record(value: serde_json::Value) -> EuropePmcRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_pubmed_record_mapping() {
        let r = record(json!({
            "id": "36512345",
            "source": "MED",
            "pmid": "36512345",
            "doi": "10.1000/ABC.1",
            "title": "Kinase signalling in yeast",
            "authorList": { "author": [
                { "fullName": "Kovalenko O", "affiliation": "Ukrainian Institute for Systems Biology and Medicine, Kyiv" },
                { "firstName": "Taras", "lastName": "Shevchuk" }
            ]},
            "journalInfo": { "journal": { "title": "FEBS Journal" } },
            "pubYear": "2022",
            "firstPublicationDate": "2022-11-03",
            "pubTypeList": { "pubType": ["research-article", "Journal Article"] }
        }));
        let p = r.to_publication();
        assert_eq!(p.source, "PubMed");
        assert_eq!(p.id.as_deref(), Some("PMID:36512345"));
        assert_eq!(p.doi.as_deref(), Some("10.1000/abc.1"));
        assert_eq!(p.url.as_deref(), Some("https://doi.org/10.1000/abc.1"));
        assert_eq!(p.authors, vec!["Kovalenko O", "Taras Shevchuk"]);
        assert_eq!(p.venue.as_deref(), Some("FEBS Journal"));
        assert_eq!(p.year, Some(2022));
        assert_eq!(p.date.as_deref(), Some("2022-11-03"));
        assert_eq!(p.kind.as_deref(), Some("research-article"));
    }

    #[test]
    fn test_preprint_fallbacks() {
        let r = record(json!({
            "id": "PPR123",
            "source": "PPR",
            "title": "A preprint",
            "authorString": "Bondar I, Melnyk V, bondar i.",
            "pubDate": "2023-02-01T00:00:00",
            "fullTextUrlList": { "fullTextUrl": [ { "url": "https://example.org/ppr123" } ] }
        }));
        let p = r.to_publication();
        assert_eq!(p.source, "Preprint");
        assert_eq!(p.venue.as_deref(), Some("Preprint"));
        assert_eq!(p.authors, vec!["Bondar I", "Melnyk V"]);
        assert_eq!(p.date.as_deref(), Some("2023-02-01"));
        assert_eq!(p.year, Some(2023));
        assert_eq!(p.url.as_deref(), Some("https://example.org/ppr123"));
        assert_eq!(p.id.as_deref(), Some("EPMC:PPR123"));
        assert_eq!(p.doi, None);
    }

    #[test]
    fn test_pmid_link_and_unknown_source() {
        let p = record(json!({ "pmid": 999, "title": "T" })).to_publication();
        assert_eq!(p.source, "Unknown");
        assert_eq!(p.url.as_deref(), Some("https://pubmed.ncbi.nlm.nih.gov/999/"));
        assert_eq!(p.id.as_deref(), Some("PMID:999"));
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let p = record(json!({})).to_publication();
        assert_eq!(p.id, None);
        assert_eq!(p.title, None);
        assert_eq!(p.url, None);
        assert_eq!(p.venue, None);
        assert!(p.authors.is_empty());
    }

    #[test]
    fn test_wanted_sources() {
        let servers = vec!["biorxiv".to_string()];
        assert!(record(json!({ "source": "MED" })).is_wanted_source(&servers));
        assert!(record(json!({ "source": "PPR", "journalTitle": "bioRxiv" })).is_wanted_source(&servers));
        assert!(!record(json!({ "source": "PPR", "journalTitle": "Research Square" })).is_wanted_source(&servers));
        assert!(!record(json!({ "source": "AGR" })).is_wanted_source(&servers));
    }

    #[test]
    fn test_affiliations_collected_from_all_shapes() {
        let r = record(json!({
            "affiliation": "Top level",
            "authorAffiliationDetailsList": { "authorAffiliation": [ { "affiliation": "Document detail" } ] },
            "authorList": { "author": [
                {
                    "fullName": "A",
                    "affiliation": "Author level",
                    "authorAffiliationDetailsList": { "authorAffiliation": [ { "affiliation": "Author detail" } ] }
                }
            ]}
        }));
        assert_eq!(
            r.affiliations(),
            vec!["Top level", "Document detail", "Author level", "Author detail"]
        );
    }

    #[test]
    fn test_nested_author_affiliation_matches() {
        let r = record(json!({
            "authorList": { "author": [
                { "fullName": "A", "authorAffiliationDetailsList": { "authorAffiliation": [
                    { "affiliation": "Institute For Systems Biology, Kyiv" }
                ]}}
            ]}
        }));
        let m = matches(&r, &TargetPhrases::new(&["systems biology"]));
        assert!(m.has_affiliation_data && m.matched);
    }
}
