use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// System a publication record was harvested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum SourceKind {
    /// Hand-curated overrides (always merged, never harvested)
    #[value(skip)]
    Manual,
    #[value(name = "europepmc")]
    EuropePmc,
    #[value(name = "crossref")]
    Crossref,
    #[value(name = "openalex")]
    OpenAlex,
}

/// Order in which sources win field conflicts during merging.
pub const SOURCE_PRIORITY: [SourceKind; 4] = [
    SourceKind::Manual,
    SourceKind::EuropePmc,
    SourceKind::Crossref,
    SourceKind::OpenAlex,
];

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Manual => "manual",
            SourceKind::EuropePmc => "europepmc",
            SourceKind::Crossref => "crossref",
            SourceKind::OpenAlex => "openalex",
        }
    }

    /// Human-readable name for log lines
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::Manual => "Manual",
            SourceKind::EuropePmc => "Europe PMC",
            SourceKind::Crossref => "Crossref",
            SourceKind::OpenAlex => "OpenAlex",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical publication record every source is normalized into.
///
/// Absent values serialize as `null` so the catalog schema is identical across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub venue: Option<String>,
    pub year: Option<i32>,
    pub date: Option<String>,
    pub doi: Option<String>,
    pub pmid: Option<String>,
    pub url: Option<String>,
}

impl Publication {
    /// A record is publishable with a title and at least one way to reach it.
    pub fn is_presentable(&self) -> bool {
        let has_title = self.title.as_deref().is_some_and(|t| !t.trim().is_empty());
        has_title && (self.url.is_some() || self.doi.is_some() || self.pmid.is_some())
    }

    /// Sort key: the date, else January 1st of the year, else empty.
    pub fn effective_date(&self) -> String {
        match (&self.date, self.year) {
            (Some(date), _) => date.clone(),
            (None, Some(year)) => format!("{:04}-01-01", year),
            (None, None) => String::new(),
        }
    }
}

/// Append names to `authors`, skipping blanks and case-insensitive repeats.
pub fn union_authors<I>(authors: &mut Vec<String>, more: I)
where
    I: IntoIterator<Item = String>,
{
    for name in more {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let folded = name.to_lowercase();
        if !authors.iter().any(|a| a.to_lowercase() == folded) {
            authors.push(name.to_string());
        }
    }
}

/// Build a de-duplicated author list preserving first-seen order and casing.
pub fn unique_authors<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut authors = Vec::new();
    union_authors(&mut authors, names);
    authors
}

/// Sort records newest first by effective date; ties keep their merge order.
pub fn sort_newest_first(records: &mut [Publication]) {
    records.sort_by_cached_key(|r| std::cmp::Reverse(r.effective_date()));
}
