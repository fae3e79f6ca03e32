use std::path::{Path, PathBuf};

mod check;
mod config;
mod contact;
mod draft;
mod quote;
mod reserve;
mod terminal;

use check::Check;
use clap::ArgAction;
use config::Config;
use contact::Contact;
use quote::Quote;
use reserve::Reserve;

/// Configuration file picked up from the working directory when `--config`
/// is not given.
const DEFAULT_CONFIG: &str = "lodge.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the lodge configuration file [default: lodge.toml if present]
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config_path = self
            .config
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
        self.command.run(&config_path)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Estimate the price of a stay
    Quote(Quote),

    /// Validate a reservation and print the message to send
    ///
    /// Exits with code 2 when any field is invalid.
    Reserve(Reserve),

    /// Validate a reservation without composing the message
    Check(Check),

    /// Show the lodge's WhatsApp and Instagram links
    Contact(Contact),

    /// Show or initialize the configuration file
    Config(Config),
}

impl Command {
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        match self {
            Self::Quote(command) => command.run(&load_config(config_path)?)?,
            Self::Reserve(command) => command.run(&load_config(config_path)?)?,
            Self::Check(command) => command.run(&load_config(config_path)?)?,
            Self::Contact(command) => command.run(&load_config(config_path)?),
            Self::Config(command) => command.run(config_path)?,
        }
        Ok(())
    }
}

/// Loads the configuration, falling back to the built-in defaults when the
/// file does not exist.
fn load_config(path: &Path) -> anyhow::Result<lodge::Config> {
    if path.exists() {
        tracing::debug!(path = %path.display(), "loading configuration");
        lodge::Config::load(path).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
    } else {
        tracing::debug!(path = %path.display(), "no configuration file, using defaults");
        Ok(lodge::Config::default())
    }
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}
