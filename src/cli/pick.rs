//! Pick command handler
//!
//! Runs the resolver against a headless map and reads picker commands from
//! stdin. Status lines go to stderr so stdout carries only the final
//! selection.

use crate::config::Config;
use crate::coord::Location;
use crate::error::Result;
use crate::form::SharedSelection;
use crate::geo::{get_geocoder, get_position_source};
use crate::map::HeadlessMap;
use crate::resolver::{Intent, LocationResolver, ResolverOptions};
use crate::view::{LocationPickerView, ViewCommand};
use clap::{Args, ValueEnum};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// How `done` prints the selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    /// Map link built from the `[url]` config section
    Url,
}

/// Pick command arguments
#[derive(Args)]
pub struct PickArgs {
    /// Start from this latitude
    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    pub lat: Option<f64>,

    /// Start from this longitude
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lng: Option<f64>,

    /// Output format for the confirmed selection
    #[arg(long, short = 'f', value_enum, default_value_t)]
    pub format: OutputFormat,

    /// URL provider for `--format url`
    #[arg(long)]
    pub provider: Option<String>,

    /// Override the search debounce
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

enum Outcome {
    Done,
    Quit,
}

/// Run the pick command
pub async fn run(args: PickArgs) -> Result<()> {
    let config = Config::load()?;

    let initial = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Some(Location::new(lat, lng)?),
        _ => None,
    };

    let mut options = ResolverOptions::from_config(&config).with_initial_location(initial.clone());
    if let Some(ms) = args.debounce_ms {
        options.debounce = Duration::from_millis(ms);
    }

    let field = SharedSelection::new();
    if let Some(location) = initial {
        let mut seed = field.sink();
        seed(location);
    }

    let geocoder = Arc::new(get_geocoder(&config)?);
    let locator = Arc::new(get_position_source(&config)?);
    let mut resolver = LocationResolver::mount(geocoder, locator, HeadlessMap::new(), options)?
        .on_location_selected(field.sink());

    let mut view = LocationPickerView::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("{}", LocationPickerView::help());
    eprintln!("{}", view.render(&resolver.snapshot(), resolver.map()));

    let outcome = loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break Outcome::Quit;
                };
                match line.parse::<ViewCommand>() {
                    Ok(ViewCommand::Intent(intent)) => {
                        if intent == Intent::ClearSelection {
                            field.clear();
                        }
                        resolver.dispatch(intent);
                    }
                    Ok(ViewCommand::Status) => {}
                    Ok(ViewCommand::Wait) => resolver.settle().await,
                    Ok(ViewCommand::Help) => {
                        eprintln!("{}", LocationPickerView::help());
                        continue;
                    }
                    Ok(ViewCommand::Done) => break Outcome::Done,
                    Ok(ViewCommand::Quit) => break Outcome::Quit,
                    Err(message) => {
                        eprintln!("{}", message);
                        continue;
                    }
                }
                view.invalidate();
            }
            true = resolver.next_completion(), if !resolver.is_idle() => {}
        }

        if let Some(status) = view.render_if_changed(&resolver.snapshot(), resolver.map()) {
            eprintln!("{}", status);
        }
    };

    resolver.teardown();

    match outcome {
        Outcome::Quit => {
            debug!("Picker closed without a selection");
            Ok(())
        }
        Outcome::Done => {
            let location = field.commit()?;
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&location)?),
                OutputFormat::Url => println!(
                    "{}",
                    config.format_url(args.provider.as_deref(), location.lat(), location.lng())?
                ),
            }
            Ok(())
        }
    }
}
