use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Resolver and scheme prefixes: doi:, doi.org/, dx.doi.org/ with or without http(s)
    static ref DOI_PREFIX: Regex = Regex::new(
        r"(?i)^(?:doi:\s*|(?:https?://)?(?:dx\.)?doi\.org/)"
    ).unwrap();

    /// Preprint version marker after a digit: 10.1101/2021.01.01.425000v2
    static ref DOI_VERSION: Regex = Regex::new(r"(\d)v\d+$").unwrap();
}

/// Clean up a DOI string
/// - Decode URL-encoded characters
/// - Strip resolver URL / doi: prefix
/// - Strip trailing punctuation
/// - Normalize to lowercase
/// - Drop a trailing version marker
pub fn normalize_doi(doi: &str) -> String {
    let decoded = doi
        .trim()
        .replace("%2F", "/")
        .replace("%2f", "/")
        .replace("%3A", ":")
        .replace("%3a", ":")
        .replace("%28", "(")
        .replace("%29", ")");

    let mut result = DOI_PREFIX.replace(&decoded, "").to_string();

    let trailing_chars: &[char] = &['.', ',', ';', ':', ')', ']', '>', '"', '\'', ' '];
    while result.ends_with(trailing_chars) {
        result.pop();
    }

    let result = result.to_lowercase();
    DOI_VERSION.replace(&result, "$1").to_string()
}

/// Normalize an optional raw DOI, treating blank input as absent
pub fn clean_doi(raw: Option<&str>) -> Option<String> {
    let doi = normalize_doi(raw?);
    if doi.is_empty() {
        None
    } else {
        Some(doi)
    }
}

/// Resolver link for a normalized DOI
pub fn doi_url(doi: &str) -> String {
    format!("https://doi.org/{}", doi)
}

/// PubMed landing page for a PMID
pub fn pubmed_url(pmid: &str) -> String {
    format!("https://pubmed.ncbi.nlm.nih.gov/{}/", pmid)
}

/// Pull the numeric PMID out of a bare id or a PubMed URL
pub fn clean_pmid(raw: Option<&str>) -> Option<String> {
    let tail = raw?.trim().trim_end_matches('/').rsplit('/').next()?.trim();
    if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
        Some(tail.to_string())
    } else {
        None
    }
}
