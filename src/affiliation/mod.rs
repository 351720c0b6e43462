//! Affiliation-based relevance filter.
//!
//! Matching is shared across sources; extracting affiliation strings is not, so
//! each raw record type implements [`AffiliationSource`] for its own shapes.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::normalize::normalize_text;

/// Raw record that can list the affiliation strings it carries.
pub trait AffiliationSource {
    fn affiliations(&self) -> Vec<&str>;
}

/// Outcome of checking one raw record against the target phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffiliationMatch {
    /// False only when the record carried no affiliation string at all
    pub has_affiliation_data: bool,
    pub matched: bool,
}

/// What to do with records whose source reported no affiliation metadata.
///
/// Lenient admits them, trading precision for recall when an API omits affiliations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AffiliationMode {
    /// Include only records with affiliation data that matched
    Strict,
    /// Include matches and records without any affiliation data
    Lenient,
}

impl AffiliationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AffiliationMode::Strict => "strict",
            AffiliationMode::Lenient => "lenient",
        }
    }

    pub fn admits(&self, m: AffiliationMatch) -> bool {
        match self {
            AffiliationMode::Strict => m.has_affiliation_data && m.matched,
            AffiliationMode::Lenient => m.matched || !m.has_affiliation_data,
        }
    }
}

impl fmt::Display for AffiliationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized target phrases; blanks are dropped.
#[derive(Debug, Clone, Default)]
pub struct TargetPhrases {
    phrases: Vec<String>,
}

impl TargetPhrases {
    pub fn new<S: AsRef<str>>(phrases: &[S]) -> Self {
        let mut normalized: Vec<String> = Vec::new();
        for phrase in phrases {
            let n = normalize_text(phrase.as_ref());
            if !n.is_empty() && !normalized.contains(&n) {
                normalized.push(n);
            }
        }
        Self { phrases: normalized }
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// True when the normalized text contains any target phrase
    pub fn found_in(&self, text: &str) -> bool {
        let normalized = normalize_text(text);
        self.phrases.iter().any(|p| normalized.contains(p.as_str()))
    }
}

/// Check a set of affiliation strings against the targets
pub fn check_affiliations<'a, I>(affiliations: I, targets: &TargetPhrases) -> AffiliationMatch
where
    I: IntoIterator<Item = &'a str>,
{
    let mut has_affiliation_data = false;
    let mut matched = false;

    for affiliation in affiliations {
        if affiliation.trim().is_empty() {
            continue;
        }
        has_affiliation_data = true;
        if targets.found_in(affiliation) {
            matched = true;
            break;
        }
    }

    AffiliationMatch {
        has_affiliation_data,
        matched,
    }
}

/// Check a raw record against the targets
pub fn matches<R: AffiliationSource>(record: &R, targets: &TargetPhrases) -> AffiliationMatch {
    check_affiliations(record.affiliations(), targets)
}
