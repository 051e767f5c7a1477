//! Search command handler
//!
//! Forward geocodes free text and prints the candidates.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::{get_geocoder, GeocodeClient};
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Address or place name
    pub query: String,

    /// Maximum number of candidates
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// Print candidates as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(limit) = args.limit {
        config.geocoder.limit = limit;
    }

    let query = args.query.trim();
    if query.is_empty() {
        return Err(Error::GeocodeNotFound(args.query.clone()));
    }

    let geocoder = get_geocoder(&config)?;
    let results = geocoder.forward_lookup(query).await?;
    if results.is_empty() {
        return Err(Error::GeocodeNotFound(query.to_string()));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for (i, location) in results.iter().enumerate() {
        println!("{}. {}", i + 1, location.label().unwrap_or("(unnamed)"));
        println!("   {}", location.coords());
    }

    Ok(())
}
