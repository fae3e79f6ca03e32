use chrono::NaiveDate;
use clap::Parser;
use lodge::{Config, LineItem, PriceBreakdown, QuoteInput, RoomType, Stay};
use tracing::instrument;

use super::{
    OutputFormat,
    terminal::{Colorize, is_narrow, rule},
};

#[derive(Debug, Parser)]
#[command(about = "Estimate the price of a stay")]
pub struct Quote {
    /// Room type (3p, 4p)
    #[arg(long, value_name = "ROOM")]
    room: RoomType,

    /// Arrival date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    check_in: NaiveDate,

    /// Departure date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    check_out: NaiveDate,

    /// Number of extra guests
    #[arg(long, value_name = "N", default_value_t = 0)]
    extra_guests: u32,

    /// Number of extra bedding kits
    #[arg(long, value_name = "N", default_value_t = 0)]
    extra_kits: u32,

    /// Number of pets
    #[arg(long, value_name = "N", default_value_t = 0)]
    pets: u32,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Quote {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let breakdown = self.breakdown(config)?;

        match self.output {
            OutputFormat::Json => self.output_json(&breakdown)?,
            OutputFormat::Table => self.output_table(&breakdown),
        }
        Ok(())
    }

    fn breakdown(&self, config: &Config) -> anyhow::Result<PriceBreakdown> {
        let stay = Stay::new(self.check_in, self.check_out)?;
        let input = QuoteInput {
            room_type: Some(self.room),
            check_in: Some(stay.check_in()),
            check_out: Some(stay.check_out()),
            extra_guests: self.extra_guests,
            extra_kits: self.extra_kits,
            pets: self.pets,
        };
        Ok(lodge::quote(&input, &config.tariff)?)
    }

    fn output_json(&self, breakdown: &PriceBreakdown) -> anyhow::Result<()> {
        use serde_json::json;

        let output = json!({
            "room": self.room.code(),
            "check_in": self.check_in,
            "check_out": self.check_out,
            "quote": breakdown,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_table(&self, breakdown: &PriceBreakdown) {
        let heading = if is_narrow() {
            self.room.short_label()
        } else {
            self.room.label()
        };
        println!("{heading}, {} noite(s)", breakdown.nights);
        println!("{}", rule());

        for item in &breakdown.line_items {
            match item {
                LineItem::Total { .. } => {
                    println!("{}", rule());
                    println!("{}", item.strong().success());
                }
                LineItem::Night { .. } => println!("{item}"),
                _ => println!("{}", item.info()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;

    fn parse(args: &[&str]) -> Quote {
        Quote::try_parse_from(std::iter::once("quote").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn prices_the_requested_stay() {
        let quote = parse(&[
            "--room",
            "4p",
            "--check-in",
            "2024-06-07",
            "--check-out",
            "2024-06-09",
            "--extra-guests",
            "1",
        ]);

        let breakdown = quote.breakdown(&Config::default()).unwrap();
        assert_eq!(breakdown.nights, 2);
        assert!((breakdown.total - 620.0).abs() < f64::EPSILON);
    }

    #[test]
    fn uses_the_configured_weekend() {
        let quote = parse(&[
            "--room",
            "4p",
            "--check-in",
            "2024-06-07",
            "--check-out",
            "2024-06-09",
            "--extra-guests",
            "1",
        ]);
        let mut config = Config::default();
        config.tariff.weekend_days = vec![Weekday::Fri, Weekday::Sat];

        let breakdown = quote.breakdown(&config).unwrap();
        assert!((breakdown.total - 870.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_check_out_before_check_in() {
        let quote = parse(&[
            "--room",
            "3p",
            "--check-in",
            "2024-06-09",
            "--check-out",
            "2024-06-09",
        ]);

        assert!(quote.breakdown(&Config::default()).is_err());
    }

    #[test]
    fn rejects_unknown_room() {
        assert!(
            Quote::try_parse_from([
                "quote",
                "--room",
                "suite",
                "--check-in",
                "2024-06-07",
                "--check-out",
                "2024-06-09",
            ])
            .is_err()
        );
    }
}
