use std::process;

use clap::Parser;
use lodge::{Config, FormModel, pricing::Brl};
use tracing::instrument;

use super::{
    OutputFormat,
    draft::{DraftArgs, print_errors},
    terminal::Colorize,
};

#[derive(Debug, Parser)]
#[command(about = "Validate a reservation without composing the message")]
pub struct Check {
    #[command(flatten)]
    draft: DraftArgs,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Check {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let output = self.output;
        let form = self.draft.build()?;
        let errors = form.validate();

        match output {
            OutputFormat::Json => Self::output_json(&form, config)?,
            OutputFormat::Table => {
                if errors.is_valid() {
                    println!("{}", "Reserva válida ✅".success());
                } else {
                    print_errors(&errors);
                }
                // A partially filled form can still be priced.
                if let Ok(breakdown) = form.quote(&config.tariff) {
                    println!(
                        "{} {}",
                        "Estimativa:".dim(),
                        Brl(breakdown.total).to_string().strong()
                    );
                }
            }
        }

        if !errors.is_valid() {
            process::exit(2);
        }
        Ok(())
    }

    fn output_json(form: &FormModel, config: &Config) -> anyhow::Result<()> {
        use serde_json::json;

        let errors = form.validate();
        let estimate = form.quote(&config.tariff).ok().map(|b| b.total);
        let output = json!({
            "valid": errors.is_valid(),
            "errors": errors,
            "estimate": estimate,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
