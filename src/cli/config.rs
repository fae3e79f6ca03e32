use std::path::Path;

use clap::Parser;
use lodge::{
    RoomType,
    pricing::{Brl, ExtrasPolicy},
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show or initialize the configuration file")]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show the configuration in effect
    Show {
        /// Print the raw TOML instead of a summary
        #[arg(long)]
        raw: bool,
    },

    /// Write the default configuration to the configuration path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Config {
    #[instrument]
    pub fn run(self, path: &Path) -> anyhow::Result<()> {
        match self.command {
            ConfigCommand::Show { raw } => {
                let config = super::load_config(path)?;
                if raw {
                    print!("{}", toml::to_string_pretty(&config)?);
                } else {
                    Self::output_summary(path, &config);
                }
            }
            ConfigCommand::Init { force } => {
                Self::init(path, force)?;
                println!(
                    "{}",
                    format!("Wrote default configuration to {}", path.display()).success()
                );
            }
        }
        Ok(())
    }

    fn init(path: &Path, force: bool) -> anyhow::Result<()> {
        if path.exists() && !force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }
        lodge::Config::default()
            .save(path)
            .map_err(|e| anyhow::anyhow!("{e}"))
    }

    fn output_summary(path: &Path, config: &lodge::Config) {
        let source = if path.exists() {
            path.display().to_string()
        } else {
            "built-in defaults".to_string()
        };
        let tariff = &config.tariff;

        println!("Configuration ({})", source.dim());
        println!("  lodge_name: {}", config.lodge_name());
        println!("  whatsapp_phone: {}", config.contact.whatsapp_phone);
        println!("  instagram: {}", config.contact.instagram);
        println!("  rooms ({}):", "weekday / weekend".dim());
        for room in RoomType::ALL {
            let rate = tariff.nightly_rate(room);
            println!(
                "    {}: {} / {} {}",
                room.code(),
                Brl(rate.weekday),
                Brl(rate.weekend),
                room.label().dim()
            );
        }
        println!("  weekend_days: {:?}", tariff.weekend_days);
        println!("  extra_guest: {}", Brl(tariff.extra_guest));
        println!("  extra_kit: {}", Brl(tariff.extra_kit));
        println!("  pet_per_night: {}", Brl(tariff.pet_per_night));
        println!(
            "  extras_policy: {}",
            match tariff.extras_policy {
                ExtrasPolicy::PerStay => "per_stay",
                ExtrasPolicy::PerNight => "per_night",
            }
        );
    }
}
