pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::api_key::{ApiKey, resolve_api_key};
use crate::core::config::AppConfig;
use crate::core::fallback::FallbackRates;
use crate::core::Converter;
use crate::providers::ExchangeRateApiProvider;
use crate::store::HistoryStore;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Currencies,
    Convert {
        from: String,
        to: String,
        amount: f64,
    },
    Rate {
        from: String,
        to: String,
    },
    History {
        limit: usize,
        clear: bool,
    },
}

/// Wires the provider, fallback table and history store described by `config`.
pub fn build_converter(config: &AppConfig, api_key: ApiKey) -> Result<Converter> {
    let provider = ExchangeRateApiProvider::new(
        config.base_url(),
        api_key,
        Duration::from_secs(config.timeout_secs),
    )?;

    let fallback = config
        .fallback_rates
        .as_deref()
        .map_or_else(FallbackRates::default, FallbackRates::from_entries);

    let history = HistoryStore::open(config.history_path()?);
    debug!(
        path = %history.path().display(),
        count = history.len(),
        "Opened conversion history"
    );

    Ok(Converter::new(Arc::new(provider), fallback, history))
}

/// Reads the config file at `config_path`, or the default location.
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    run_with_config(command, load_config(config_path)?).await
}

pub async fn run_with_config(command: AppCommand, config: AppConfig) -> Result<()> {
    info!("xfx starting...");
    debug!(
        base_url = config.base_url(),
        timeout_secs = config.timeout_secs,
        "Loaded config"
    );

    let api_key = resolve_api_key(&config);
    debug!(source = %api_key.source(), "Resolved API key");
    if api_key.is_demo() {
        cli::ui::print_demo_mode_notice();
    }
    let mut converter = build_converter(&config, api_key)?;

    match command {
        AppCommand::Currencies => cli::currencies::run(&mut converter).await,
        AppCommand::Convert { from, to, amount } => {
            Ok(cli::convert::run(&mut converter, &from, &to, amount).await?)
        }
        AppCommand::Rate { from, to } => Ok(cli::rate::run(&converter, &from, &to).await?),
        AppCommand::History { limit, clear } => cli::history::run(&mut converter, limit, clear),
    }
}
