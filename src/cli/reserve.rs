use std::process;

use clap::Parser;
use lodge::{Config, Outbound, OutboundError, SubmitError, ValidationResult};
use tracing::instrument;

use super::{
    draft::{DraftArgs, print_errors},
    terminal::{Colorize, rule},
};

#[derive(Debug, Parser)]
#[command(about = "Validate a reservation and print the message to send")]
pub struct Reserve {
    #[command(flatten)]
    draft: DraftArgs,

    /// Print only the WhatsApp link
    #[arg(long)]
    link_only: bool,
}

/// What a reservation attempt produced.
#[derive(Debug)]
enum Outcome {
    Ready(Box<Outbound>),
    Invalid(ValidationResult),
}

impl Reserve {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let link_only = self.link_only;

        match self.prepare(config)? {
            Outcome::Ready(outbound) => {
                if link_only {
                    println!("{}", outbound.link);
                } else {
                    Self::output_message(&outbound);
                }
                Ok(())
            }
            Outcome::Invalid(errors) => {
                print_errors(&errors);
                process::exit(2);
            }
        }
    }

    fn prepare(self, config: &Config) -> anyhow::Result<Outcome> {
        let form = self.draft.build()?;
        match Outbound::prepare(&form, config) {
            Ok(outbound) => Ok(Outcome::Ready(Box::new(outbound))),
            Err(OutboundError::Invalid(SubmitError::Invalid(errors))) => {
                Ok(Outcome::Invalid(errors))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn output_message(outbound: &Outbound) {
        println!("{}", outbound.text);
        println!("{}", rule());
        println!("{}", "Envie a reserva pelo WhatsApp:".success());
        println!("{}", outbound.link.info());
    }
}
