//! Locate command handler
//!
//! Requests the device position once and prints it.

use crate::config::Config;
use crate::error::Result;
use crate::geo::{get_position_source, GeolocationSource};
use clap::Args;
use std::time::Duration;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Give up after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Skip the cached position and ask for a fresh fix
    #[arg(long)]
    pub high_accuracy: bool,

    /// Print the location as JSON
    #[arg(long)]
    pub json: bool,

    /// Print a map link instead (provider name, or the default)
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub url: Option<String>,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    let config = Config::load()?;

    let timeout = Duration::from_millis(
        args.timeout_ms
            .unwrap_or(config.resolver.geolocation_timeout_ms),
    );
    let high_accuracy = args.high_accuracy || config.resolver.high_accuracy;

    let locator = get_position_source(&config)?;
    let location = locator.current_position(timeout, high_accuracy).await?;

    if let Some(provider) = &args.url {
        let provider = Some(provider.as_str()).filter(|p| !p.is_empty());
        println!("{}", config.format_url(provider, location.lat(), location.lng())?);
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&location)?);
    } else {
        println!("{}", location);
    }

    Ok(())
}
