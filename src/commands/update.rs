use anyhow::{bail, Context, Error, Result};
use log::{error, info, warn};
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::affiliation::TargetPhrases;
use crate::catalog::{build_catalog, read_previous, write_catalog, BuildOptions, CatalogDocument, CatalogMeta};
use crate::cli::UpdateArgs;
use crate::common::{format_elapsed, setup_logging, SourceKind};
use crate::remote::{
    build_query, configured_institutions, create_api_client, harvest_pages, resolve_institutions,
    CrossrefSearch, EuropePmcSearch, OpenAlexSearch,
};
use crate::sources::{decode_raw, read_manual_input, RawRecord};

/// How an update run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Written { count: usize },
    /// Europe PMC failed; the previous catalog was left untouched
    KeptPrevious,
}

/// Generation timestamp: a fixed RFC 3339 override normalized to UTC, else now
pub fn resolve_generated_at(fixed: Option<&str>) -> Result<String> {
    let moment = match fixed {
        Some(value) => OffsetDateTime::parse(value.trim(), &Rfc3339)
            .with_context(|| format!("Invalid --generated-at timestamp: {}", value))?
            .to_offset(UtcOffset::UTC),
        None => OffsetDateTime::now_utc().replace_nanosecond(0)?,
    };
    moment.format(&Rfc3339).context("Failed to format generation timestamp")
}

/// Keep the previous catalog when one exists, otherwise the failure ends the run
fn fallback_or_fail(err: Error, has_previous: bool, outfile: &str) -> Result<UpdateOutcome> {
    if has_previous {
        error!("Europe PMC query failed: {:#}", err);
        error!("Keeping previous catalog at {}", outfile);
        Ok(UpdateOutcome::KeptPrevious)
    } else {
        Err(err.context("Europe PMC query failed and there is no previous catalog to keep"))
    }
}

async fn harvest_crossref(client: &Client, args: &UpdateArgs) -> Result<Vec<Value>> {
    let mut values = Vec::new();
    for phrase in args.affiliations.iter().filter(|p| !p.trim().is_empty()) {
        let search = CrossrefSearch::new(client, &args.crossref_url, phrase, args.page_size, args.mailto.clone());
        values.extend(harvest_pages(&search, args.max_pages).await?);
    }
    Ok(values)
}

async fn harvest_openalex(client: &Client, args: &UpdateArgs) -> Result<Vec<Value>> {
    let mut ids = configured_institutions(&args.openalex_institutions);
    if ids.is_empty() {
        ids = resolve_institutions(client, &args.openalex_url, &args.affiliations, args.mailto.as_deref()).await?;
    }
    if ids.is_empty() {
        info!("No OpenAlex institution matches the affiliation; skipping OpenAlex");
        return Ok(Vec::new());
    }

    let search = OpenAlexSearch::new(client, &args.openalex_url, &ids, args.page_size, args.mailto.clone());
    harvest_pages(&search, args.max_pages).await
}

/// Secondary sources never fail the run
fn secondary(kind: SourceKind, result: Result<Vec<Value>>) -> Vec<RawRecord> {
    match result {
        Ok(values) => {
            info!("{}: fetched {} records", kind.display_name(), values.len());
            decode_raw(kind, values)
        }
        Err(e) => {
            warn!("{} query failed, continuing without it: {:#}", kind.display_name(), e);
            Vec::new()
        }
    }
}

pub async fn run_update_async(args: UpdateArgs) -> Result<UpdateOutcome> {
    let start_time = Instant::now();

    let targets = TargetPhrases::new(&args.affiliations);
    if targets.is_empty() {
        bail!("No affiliation phrase configured");
    }
    let generated_at = resolve_generated_at(args.generated_at.as_deref())?;
    let query = build_query(&args.affiliations);

    info!("Updating publication catalog");
    info!("Affiliation: {}", args.affiliations.join("; "));
    info!("Affiliation mode: {}", args.affiliation_mode);
    info!("Sources: {}", args.sources.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", "));
    info!("Output: {}", args.outfile);

    let previous = read_previous(&args.outfile);
    let manual = read_manual_input(&args.manual);
    let mut raw: Vec<RawRecord> = manual.records.into_iter().map(RawRecord::Manual).collect();

    let client = create_api_client(Duration::from_secs(args.timeout))
        .context("Failed to create HTTP client")?;

    if args.sources.contains(&SourceKind::EuropePmc) {
        let search = EuropePmcSearch::new(&client, &args.europepmc_url, query.clone(), args.page_size);
        match harvest_pages(&search, args.max_pages).await {
            Ok(values) => {
                info!("Europe PMC: fetched {} records", values.len());
                raw.extend(decode_raw(SourceKind::EuropePmc, values));
            }
            Err(e) => return fallback_or_fail(e, previous.is_some(), &args.outfile),
        }
    }

    if args.sources.contains(&SourceKind::Crossref) {
        raw.extend(secondary(SourceKind::Crossref, harvest_crossref(&client, &args).await));
    }

    if args.sources.contains(&SourceKind::OpenAlex) {
        raw.extend(secondary(SourceKind::OpenAlex, harvest_openalex(&client, &args).await));
    }

    let options = BuildOptions {
        targets,
        mode: args.affiliation_mode,
        preprint_servers: args.preprint_servers.clone(),
    };
    let (items, stats) = build_catalog(raw, &options);

    let doc = CatalogDocument::new(
        CatalogMeta {
            generated_at,
            affiliations: args.affiliations.clone(),
            affiliation_mode: args.affiliation_mode,
            query,
            enabled: args.sources.clone(),
        },
        items,
    );
    write_catalog(&args.outfile, &doc)?;

    if let Some(previous) = &previous {
        let delta = doc.count as i64 - previous.items.len() as i64;
        info!("Catalog changed by {:+} items since {}", delta, previous.generated_at);
    }

    info!("");
    info!("==================== UPDATE COMPLETE ====================");
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));
    stats.log_summary();
    for (label, count) in &doc.sources {
        info!("  Items from {}: {}", label, count);
    }
    info!("Output: {}", args.outfile);
    info!("==========================================================");

    Ok(UpdateOutcome::Written { count: doc.count })
}

pub fn run_update(args: UpdateArgs) -> Result<UpdateOutcome> {
    setup_logging(&args.log_level)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_update_async(args))
}
