use clap::Parser;
use lodge::{Config, DeepLink};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show the lodge's WhatsApp and Instagram links")]
pub struct Contact {
    /// Message to pre-fill instead of the configured greeting
    #[arg(long, value_name = "TEXT")]
    message: Option<String>,
}

impl Contact {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) {
        let (whatsapp, instagram) = self.links(config);

        println!("{}", config.lodge_name().strong());
        println!("  {:<10} {}", "WhatsApp".dim(), whatsapp.info());
        println!("  {:<10} {}", "Instagram".dim(), instagram.info());
    }

    fn links(&self, config: &Config) -> (DeepLink, DeepLink) {
        let contact = &config.contact;
        let greeting = self.message.as_deref().unwrap_or(&contact.greeting);
        (
            DeepLink::whatsapp(&contact.whatsapp_phone, greeting),
            DeepLink::instagram(&contact.instagram),
        )
    }
}
