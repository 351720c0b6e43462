pub mod crossref;
pub mod europepmc;
pub mod lenient;
pub mod manual;
pub mod openalex;

pub use crossref::CrossrefWork;
pub use europepmc::EuropePmcRecord;
pub use manual::{read_manual_input, ManualInput, ManualRecord};
pub use openalex::OpenAlexWork;

use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::affiliation::{matches, AffiliationMatch, TargetPhrases};
use crate::common::{Publication, SourceKind};

/// Number of decode failures reported individually before going quiet
const MAX_DECODE_WARNINGS: usize = 5;

/// Raw record from one of the harvested systems.
#[derive(Debug, Clone)]
pub enum RawRecord {
    EuropePmc(EuropePmcRecord),
    Crossref(CrossrefWork),
    OpenAlex(OpenAlexWork),
    Manual(ManualRecord),
}

impl RawRecord {
    pub fn kind(&self) -> SourceKind {
        match self {
            RawRecord::EuropePmc(_) => SourceKind::EuropePmc,
            RawRecord::Crossref(_) => SourceKind::Crossref,
            RawRecord::OpenAlex(_) => SourceKind::OpenAlex,
            RawRecord::Manual(_) => SourceKind::Manual,
        }
    }

    pub fn to_publication(&self) -> Publication {
        match self {
            RawRecord::EuropePmc(r) => r.to_publication(),
            RawRecord::Crossref(r) => r.to_publication(),
            RawRecord::OpenAlex(r) => r.to_publication(),
            RawRecord::Manual(r) => r.to_publication(),
        }
    }

    /// Affiliation check for sources filtered at record level; None when the
    /// source is trusted (manual) or scoped upstream (OpenAlex).
    pub fn affiliation_match(&self, targets: &TargetPhrases) -> Option<AffiliationMatch> {
        match self {
            RawRecord::EuropePmc(r) => Some(matches(r, targets)),
            RawRecord::Crossref(r) => Some(matches(r, targets)),
            RawRecord::OpenAlex(_) | RawRecord::Manual(_) => None,
        }
    }
}

/// Decode raw JSON values one by one, skipping (and logging) values that do not fit
pub fn decode_records<T: DeserializeOwned>(values: Vec<Value>, label: &str) -> Vec<T> {
    let mut decoded = Vec::with_capacity(values.len());
    let mut failed = 0;

    for value in values {
        match serde_json::from_value::<T>(value) {
            Ok(record) => decoded.push(record),
            Err(e) => {
                if failed < MAX_DECODE_WARNINGS {
                    warn!("Skipping malformed {} record: {}", label, e);
                }
                failed += 1;
            }
        }
    }

    if failed > MAX_DECODE_WARNINGS {
        warn!("Skipped {} malformed {} records in total", failed, label);
    }

    decoded
}

/// Decode a page of harvested values; manual records are read by [`ManualInput::parse`]
pub fn decode_raw(kind: SourceKind, values: Vec<Value>) -> Vec<RawRecord> {
    let label = kind.display_name();
    match kind {
        SourceKind::EuropePmc => decode_records(values, label).into_iter().map(RawRecord::EuropePmc).collect(),
        SourceKind::Crossref => decode_records(values, label).into_iter().map(RawRecord::Crossref).collect(),
        SourceKind::OpenAlex => decode_records(values, label).into_iter().map(RawRecord::OpenAlex).collect(),
        SourceKind::Manual => Vec::new(),
    }
}
