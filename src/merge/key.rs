use std::fmt;

use crate::common::Publication;

/// Identity of a publication across sources, in priority order DOI > PMID > URL > id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityKey {
    Doi(String),
    Pmid(String),
    Url(String),
    Id(String),
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl IdentityKey {
    /// Primary key of a record, or None when it is unkeyable
    pub fn of(record: &Publication) -> Option<Self> {
        Self::all_of(record).into_iter().next()
    }

    /// Every key the record can be reached by, primary first
    pub fn all_of(record: &Publication) -> Vec<Self> {
        let mut keys = Vec::with_capacity(4);
        if let Some(doi) = present(&record.doi) {
            keys.push(IdentityKey::Doi(doi.to_lowercase()));
        }
        if let Some(pmid) = present(&record.pmid) {
            keys.push(IdentityKey::Pmid(pmid));
        }
        if let Some(url) = present(&record.url) {
            keys.push(IdentityKey::Url(url.trim_end_matches('/').to_string()));
        }
        if let Some(id) = present(&record.id) {
            keys.push(IdentityKey::Id(id));
        }
        keys
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Doi(v) => write!(f, "doi:{}", v),
            IdentityKey::Pmid(v) => write!(f, "pmid:{}", v),
            IdentityKey::Url(v) => write!(f, "url:{}", v),
            IdentityKey::Id(v) => write!(f, "id:{}", v),
        }
    }
}
