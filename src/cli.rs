use clap::{Parser, Subcommand};

use crate::affiliation::AffiliationMode;
use crate::common::SourceKind;

pub const DEFAULT_AFFILIATION: &str = "Ukrainian Institute for Systems Biology and Medicine";
pub const DEFAULT_OUTFILE: &str = "data/publications.json";
pub const DEFAULT_MANUAL_FILE: &str = "data/publications.manual.json";

pub const EUROPEPMC_API_URL: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest";
pub const CROSSREF_API_URL: &str = "https://api.crossref.org";
pub const OPENALEX_API_URL: &str = "https://api.openalex.org";

#[derive(Parser)]
#[command(name = "publication-catalog")]
#[command(about = "Harvest an institution's publications from Europe PMC, Crossref and OpenAlex into one reconciled catalog")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all sources, reconcile the records and rewrite the catalog file
    Update(UpdateArgs),

    /// Print the Europe PMC search query built for the configured affiliations
    Query(QueryArgs),
}

#[derive(Parser, Clone)]
pub struct UpdateArgs {
    /// Target affiliation phrase (repeatable; ';'-separated in the environment)
    #[arg(long = "affiliation", env = "AFFILIATION", value_delimiter = ';', default_value = DEFAULT_AFFILIATION)]
    pub affiliations: Vec<String>,

    /// Catalog file to write
    #[arg(short, long, env = "OUTFILE", default_value = DEFAULT_OUTFILE)]
    pub outfile: String,

    /// Hand-curated records merged into every run
    #[arg(short, long, env = "MANUAL_FILE", default_value = DEFAULT_MANUAL_FILE)]
    pub manual: String,

    /// How to treat records whose source reports no affiliation at all
    #[arg(long, env = "AFFILIATION_MODE", value_enum, default_value_t = AffiliationMode::Lenient)]
    pub affiliation_mode: AffiliationMode,

    /// Remote sources to harvest
    #[arg(
        long,
        env = "SOURCES",
        value_enum,
        value_delimiter = ',',
        default_values_t = [SourceKind::EuropePmc, SourceKind::Crossref, SourceKind::OpenAlex]
    )]
    pub sources: Vec<SourceKind>,

    /// Contact address sent to Crossref and OpenAlex (polite pool)
    #[arg(long, env = "CONTACT_EMAIL")]
    pub mailto: Option<String>,

    /// OpenAlex institution ids (skips the lookup by affiliation name)
    #[arg(long = "openalex-institution", env = "OPENALEX_INSTITUTION_IDS", value_delimiter = ',')]
    pub openalex_institutions: Vec<String>,

    /// Preprint servers whose Europe PMC preprints are kept
    #[arg(long = "preprint-server", env = "PREPRINT_SERVERS", value_delimiter = ',', default_value = "biorxiv")]
    pub preprint_servers: Vec<String>,

    /// Records requested per page (clamped to each API's maximum)
    #[arg(long, default_value = "1000")]
    pub page_size: usize,

    /// Maximum pages fetched per query
    #[arg(long, default_value = "10")]
    pub max_pages: usize,

    /// Timeout in seconds per request
    #[arg(short, long, env = "HTTP_TIMEOUT", default_value = "60")]
    pub timeout: u64,

    /// Fixed RFC 3339 generation timestamp (defaults to now)
    #[arg(long, env = "GENERATED_AT")]
    pub generated_at: Option<String>,

    #[arg(long, env = "EUROPEPMC_API_URL", default_value = EUROPEPMC_API_URL, hide = true)]
    pub europepmc_url: String,

    #[arg(long, env = "CROSSREF_API_URL", default_value = CROSSREF_API_URL, hide = true)]
    pub crossref_url: String,

    #[arg(long, env = "OPENALEX_API_URL", default_value = OPENALEX_API_URL, hide = true)]
    pub openalex_url: String,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}

#[derive(Parser, Clone)]
pub struct QueryArgs {
    /// Target affiliation phrase (repeatable; ';'-separated in the environment)
    #[arg(long = "affiliation", env = "AFFILIATION", value_delimiter = ';', default_value = DEFAULT_AFFILIATION)]
    pub affiliations: Vec<String>,
}
