use anyhow::Result;
use clap::Parser;

use publication_catalog::cli::{Cli, Commands};
use publication_catalog::commands::{run_query, run_update};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Update(args) => {
            run_update(args)?;
        }
        Commands::Query(args) => {
            run_query(args)?;
        }
    }

    Ok(())
}
