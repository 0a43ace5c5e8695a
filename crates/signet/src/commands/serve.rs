//! `signet serve` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use signet_config::{CliSettings, Config};
use signet_core::{CredentialStore, MemoryStore};
use signet_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover signet.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Expose the debug registration and echo endpoints (overrides config).
    #[arg(long)]
    debug_endpoints: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Build CLI settings from args
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            debug_endpoints: self.debug_endpoints.then_some(true),
        };

        // Load config
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let store = Arc::new(MemoryStore::new());

        if config.oauth.debug_endpoints {
            // The memory store starts empty; hand out one consumer so the
            // handshake can be exercised immediately.
            let consumer = store.add_consumer(None, None).await?;
            output.success("Registered debug consumer");
            output.info(&format!("  key:    {}", consumer.key));
            output.info(&format!("  secret: {}", consumer.secret));
        }

        output.info(&format!(
            "OAuth provider listening on {}:{}",
            config.server.host, config.server.port
        ));

        let server_config = server_config_from_config(&config);
        run_server(server_config, store)
            .await
            .map_err(|e| CliError::Server(e.to_string()))
    }
}
