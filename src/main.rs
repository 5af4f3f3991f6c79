use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xfx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List available currencies
    Currencies,
    /// Convert an amount between two currencies
    Convert {
        /// Source currency code, e.g. USD
        from: String,
        /// Target currency code, e.g. EUR
        to: String,
        /// Amount to convert, must be positive
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Swap source and target currencies
        #[arg(short, long)]
        swap: bool,
    },
    /// Show the current exchange rate between two currencies
    Rate {
        from: String,
        to: String,
    },
    /// Show recent conversions, most recent first
    History {
        /// Number of entries to show
        #[arg(
            short = 'n',
            long,
            default_value_t = 10,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        limit: usize,
        /// Delete all recorded conversions
        #[arg(long)]
        clear: bool,
    },
}

impl From<Commands> for xfx::AppCommand {
    fn from(cmd: Commands) -> xfx::AppCommand {
        match cmd {
            Commands::Currencies => xfx::AppCommand::Currencies,
            Commands::Convert {
                from,
                to,
                amount,
                swap,
            } => {
                let (from, to) = if swap { (to, from) } else { (from, to) };
                xfx::AppCommand::Convert { from, to, amount }
            }
            Commands::Rate { from, to } => xfx::AppCommand::Rate { from, to },
            Commands::History { limit, clear } => xfx::AppCommand::History { limit, clear },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Setup) => {
            init_logging(cli.verbose, None);
            xfx::cli::setup::setup()
        }
        Some(cmd) => match xfx::load_config(cli.config_path.as_deref()) {
            Ok(config) => {
                init_logging(cli.verbose, config.log_path().ok().as_deref());
                xfx::run_with_config(cmd.into(), config).await
            }
            Err(e) => {
                init_logging(cli.verbose, None);
                Err(e)
            }
        },
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
