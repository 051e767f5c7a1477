//! Reverse command handler

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::geo::{get_geocoder, GeocodeClient};
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Print the location as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the reverse command
pub async fn run(args: ReverseArgs) -> Result<()> {
    let config = Config::load()?;

    let coords = Coordinates::new(args.lat, args.lng);
    coords.validate()?;

    let geocoder = get_geocoder(&config)?;
    let location = geocoder.reverse_lookup(coords).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&location)?);
    } else {
        match location.label() {
            Some(label) => println!("{}", label),
            None => println!("No address known at {}", location.coords()),
        }
    }

    Ok(())
}
