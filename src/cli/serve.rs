//! Serve command handler
//!
//! Runs the HTTP lookup API in the foreground.

use crate::config::Config;
use crate::error::Result;
use crate::server;
use clap::Args;
use tracing::info;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Proxy a different Nominatim instance
    #[arg(long)]
    pub geocoder_url: Option<String>,
}

impl ServeArgs {
    fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = self.geocoder_url {
            config.set("geocoder.base_url", &url)?;
        }
        Ok(())
    }
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?;
    args.apply(&mut config)?;

    info!(
        "location-picker v{} serving lookups from {} on {}",
        env!("CARGO_PKG_VERSION"),
        config.geocoder.base_url,
        config.server_addr()
    );

    server::run(config).await
}
