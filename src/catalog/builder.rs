use log::{debug, info};
use std::collections::BTreeMap;

use crate::affiliation::{AffiliationMode, TargetPhrases};
use crate::common::{sort_newest_first, Publication, SourceKind, SOURCE_PRIORITY};
use crate::merge::{merge_all, SourceBatch};
use crate::sources::RawRecord;

/// Filters applied to raw records before merging
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub targets: TargetPhrases,
    pub mode: AffiliationMode,
    pub preprint_servers: Vec<String>,
}

/// Per-stage record counts for the run report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildStats {
    pub raw: BTreeMap<SourceKind, usize>,
    pub admitted: BTreeMap<SourceKind, usize>,
    pub unwanted_source: usize,
    pub unkeyable: usize,
    pub merged: usize,
    pub not_presentable: usize,
    pub total: usize,
}

impl BuildStats {
    pub fn log_summary(&self) {
        for (kind, raw) in &self.raw {
            let admitted = self.admitted.get(kind).copied().unwrap_or(0);
            info!("  {:<11} {} raw, {} after filtering", kind.display_name(), raw, admitted);
        }
        if self.unwanted_source > 0 {
            info!("  Dropped {} Europe PMC records from unwanted collections", self.unwanted_source);
        }
        info!("  Dropped {} records without any identifier", self.unkeyable);
        info!("  Merged into {} publications", self.merged);
        info!("  Excluded {} without a title or link", self.not_presentable);
        info!("  Catalog size: {}", self.total);
    }
}

/// Whether a raw record survives the collection and affiliation filters
fn admits(record: &RawRecord, options: &BuildOptions, stats: &mut BuildStats) -> bool {
    if let RawRecord::EuropePmc(r) = record {
        if !r.is_wanted_source(&options.preprint_servers) {
            stats.unwanted_source += 1;
            return false;
        }
    }

    match record.affiliation_match(&options.targets) {
        Some(m) => options.mode.admits(m),
        None => true,
    }
}

/// Build the sorted catalog from every raw record of the run.
///
/// Records are filtered, mapped to the canonical shape, grouped by source and folded
/// in source priority order. Only presentable records are kept, newest first.
pub fn build_catalog(raw: Vec<RawRecord>, options: &BuildOptions) -> (Vec<Publication>, BuildStats) {
    let mut stats = BuildStats::default();
    let mut grouped: BTreeMap<SourceKind, Vec<Publication>> = BTreeMap::new();

    for record in raw {
        let kind = record.kind();
        *stats.raw.entry(kind).or_insert(0) += 1;
        if !admits(&record, options, &mut stats) {
            continue;
        }
        *stats.admitted.entry(kind).or_insert(0) += 1;
        grouped.entry(kind).or_default().push(record.to_publication());
    }

    let batches: Vec<SourceBatch> = grouped
        .into_iter()
        .map(|(kind, records)| SourceBatch::new(kind, records))
        .collect();

    let map = merge_all(batches, &SOURCE_PRIORITY);
    stats.unkeyable = map.unkeyable();
    stats.merged = map.len();

    let mut records: Vec<Publication> = map.into_records();
    records.retain(|r| {
        let keep = r.is_presentable();
        if !keep {
            debug!("Excluding record without title or link: {:?}", r.id);
        }
        keep
    });
    stats.not_presentable = stats.merged - records.len();

    sort_newest_first(&mut records);
    stats.total = records.len();

    (records, stats)
}
