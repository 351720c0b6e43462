use anyhow::{bail, Result};

use crate::cli::QueryArgs;
use crate::remote::build_query;

/// Print the Europe PMC query for the configured affiliations
pub fn run_query(args: QueryArgs) -> Result<()> {
    let query = build_query(&args.affiliations);
    if query.is_empty() {
        bail!("No affiliation phrase configured");
    }
    println!("{}", query);
    Ok(())
}
