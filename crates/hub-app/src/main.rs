mod cli;
mod commands;

use std::process::ExitCode;
use std::time::Duration;

use hub_bridge::{Bridge, Channel, ChannelOptions, WebSocketTransport};
use hub_config::HubConfig;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};

/// `RUST_LOG` wins, then `--log-level`, then the configured level.
fn init_logging(args: &Args, config: &HubConfig) {
    let fallback = config.logging.directive();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = args.log_level.as_deref().unwrap_or(&fallback);
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(&fallback))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn channel_options(args: &Args, config: &HubConfig) -> ChannelOptions {
    let handshake_timeout = match args.handshake_timeout_ms {
        Some(0) => None,
        Some(ms) => Some(Duration::from_millis(ms)),
        None => config.bridge.handshake_timeout(),
    };
    ChannelOptions {
        objects: config.bridge.requested_objects(),
        handshake_timeout,
        ..ChannelOptions::default()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let loaded = match &args.config {
        Some(path) => hub_config::load_config_from(path),
        None => hub_config::load_config(),
    };
    let (config, load_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (HubConfig::default(), Some(e)),
    };

    init_logging(&args, &config);
    tracing::info!("project-hub v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Some(e) = load_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let command = args.command();
    if command == Command::Config {
        println!("{}", hub_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }

    let url = args.url.clone().unwrap_or_else(|| config.bridge.url.clone());
    let options = channel_options(&args, &config);
    tracing::info!(url = %url, "Connecting to host");

    let registry = match Bridge::global()
        .initialize(|| Channel::connect(WebSocketTransport::open(url.clone()), options))
        .await
    {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!("Bridge connection failed: {e}");
            eprintln!("project-hub: could not connect to {url}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = commands::run(&command, registry).await;
    registry.channel().close();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            eprintln!("project-hub: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_timeout_overrides_config() {
        let mut config = HubConfig::default();
        config.bridge.handshake_timeout_ms = 5_000;

        let args = Args::try_parse_from(["project-hub", "--handshake-timeout-ms", "250"]).unwrap();
        assert_eq!(
            channel_options(&args, &config).handshake_timeout,
            Some(Duration::from_millis(250))
        );

        let args = Args::try_parse_from(["project-hub", "--handshake-timeout-ms", "0"]).unwrap();
        assert_eq!(channel_options(&args, &config).handshake_timeout, None);

        let args = Args::try_parse_from(["project-hub"]).unwrap();
        assert_eq!(
            channel_options(&args, &config).handshake_timeout,
            Some(Duration::from_millis(5_000))
        );
    }

    #[test]
    fn configured_objects_become_the_handshake_request() {
        let mut config = HubConfig::default();
        let args = Args::try_parse_from(["project-hub"]).unwrap();
        assert_eq!(channel_options(&args, &config).objects, None);

        config.bridge.objects = vec!["backend".into()];
        assert_eq!(
            channel_options(&args, &config).objects,
            Some(vec!["backend".to_string()])
        );
    }
}
