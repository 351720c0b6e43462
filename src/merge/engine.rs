use std::collections::HashMap;

use super::IdentityKey;
use crate::common::{union_authors, Publication, SourceKind};

/// Canonical records harvested from one system.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub kind: SourceKind,
    pub records: Vec<Publication>,
}

impl SourceBatch {
    pub fn new(kind: SourceKind, records: Vec<Publication>) -> Self {
        Self { kind, records }
    }
}

/// What happened to a record folded into the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    Inserted,
    Merged,
    Unkeyable,
}

/// Fold `incoming` into `existing`: existing scalars win, authors and sources are unioned.
pub fn merge_publications(existing: Publication, incoming: Publication) -> Publication {
    let mut authors = existing.authors;
    union_authors(&mut authors, incoming.authors);

    let mut sources = existing.sources;
    for label in incoming.sources {
        if !sources.contains(&label) {
            sources.push(label);
        }
    }

    Publication {
        id: existing.id.or(incoming.id),
        source: if existing.source.is_empty() {
            incoming.source
        } else {
            existing.source
        },
        sources,
        kind: existing.kind.or(incoming.kind),
        title: existing.title.or(incoming.title),
        authors,
        venue: existing.venue.or(incoming.venue),
        year: existing.year.or(incoming.year),
        date: existing.date.or(incoming.date),
        doi: existing.doi.or(incoming.doi),
        pmid: existing.pmid.or(incoming.pmid),
        url: existing.url.or(incoming.url),
    }
}

fn same_value(a: Option<&str>, b: Option<&str>) -> Option<bool> {
    match (a.map(str::trim).filter(|v| !v.is_empty()), b.map(str::trim).filter(|v| !v.is_empty())) {
        (Some(a), Some(b)) => Some(a.eq_ignore_ascii_case(b)),
        _ => None,
    }
}

/// Records sharing an alias are still different works when their DOIs differ, or,
/// with no two DOIs to compare, when their PMIDs differ.
fn compatible(slot: &Publication, incoming: &Publication) -> bool {
    same_value(slot.doi.as_deref(), incoming.doi.as_deref())
        .or_else(|| same_value(slot.pmid.as_deref(), incoming.pmid.as_deref()))
        .unwrap_or(true)
}

/// Keyed merge map. Records keep their first-insertion order, and every identifier a
/// merged record carries (DOI, PMID, URL, id) points back at its slot, so a later
/// record that shares any identifier folds into the same publication, unless the two
/// carry conflicting DOIs or PMIDs.
#[derive(Debug, Default)]
pub struct MergeMap {
    records: Vec<Publication>,
    index: HashMap<IdentityKey, usize>,
    unkeyable: usize,
}

impl MergeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records dropped because they had no DOI, PMID, URL or id
    pub fn unkeyable(&self) -> usize {
        self.unkeyable
    }

    pub fn fold(&mut self, record: Publication) -> FoldOutcome {
        let keys = IdentityKey::all_of(&record);
        if keys.is_empty() {
            self.unkeyable += 1;
            return FoldOutcome::Unkeyable;
        }

        let hit = keys
            .iter()
            .filter_map(|k| self.index.get(k).copied())
            .find(|&slot| compatible(&self.records[slot], &record));

        match hit {
            Some(slot) => {
                let existing = std::mem::take(&mut self.records[slot]);
                let merged = merge_publications(existing, record);
                self.register(&merged, slot);
                self.records[slot] = merged;
                FoldOutcome::Merged
            }
            None => {
                let slot = self.records.len();
                self.register(&record, slot);
                self.records.push(record);
                FoldOutcome::Inserted
            }
        }
    }

    fn register(&mut self, record: &Publication, slot: usize) {
        for key in IdentityKey::all_of(record) {
            self.index.entry(key).or_insert(slot);
        }
    }

    /// Merged records with their primary identity keys, in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (IdentityKey, &Publication)> {
        self.records
            .iter()
            .filter_map(|r| IdentityKey::of(r).map(|key| (key, r)))
    }

    pub fn into_records(self) -> Vec<Publication> {
        self.records
    }
}

/// Fold every batch into one map, higher-priority sources first.
///
/// Each record is tagged with its batch's source label before folding. Batches whose
/// kind is missing from `priority` fold last, in their given order.
pub fn merge_all(batches: Vec<SourceBatch>, priority: &[SourceKind]) -> MergeMap {
    let rank = |kind: SourceKind| {
        priority
            .iter()
            .position(|p| *p == kind)
            .unwrap_or(priority.len())
    };

    let mut ordered = batches;
    ordered.sort_by_key(|batch| rank(batch.kind));

    let mut map = MergeMap::new();
    for batch in ordered {
        let label = batch.kind.as_str().to_string();
        for mut record in batch.records {
            if !record.sources.contains(&label) {
                record.sources.push(label.clone());
            }
            map.fold(record);
        }
    }
    map
}
