use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use lodge::{BookingDraft, FormModel, Pet, ValidationResult};

use super::terminal::Colorize;

/// Arguments that assemble a reservation form from a draft file and edits.
#[derive(Debug, clap::Args)]
pub struct DraftArgs {
    /// TOML file holding a partially filled reservation
    #[arg(long, value_name = "FILE")]
    draft: Option<PathBuf>,

    /// Set a field, e.g. --set cpf=123.456.789-00 (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, String)>,

    /// Bring a pet, as kind:size:description (repeatable)
    #[arg(long = "pet", value_name = "KIND:SIZE:DESCRIPTION")]
    pets: Vec<Pet>,

    /// Accept the pet rules
    #[arg(long)]
    accept_pet_terms: bool,

    /// Validate against this date instead of today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    today: Option<NaiveDate>,
}

/// Parse a `field=value` pair.
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(field, value)| (field.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))
}

impl DraftArgs {
    /// Builds the form: the draft file first, then pets, then each `--set` in
    /// order.
    pub fn build(self) -> anyhow::Result<FormModel> {
        let today = self
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        let mut draft = match &self.draft {
            Some(path) => load_draft(path)?,
            None => BookingDraft::default(),
        };
        if !self.pets.is_empty() {
            draft.has_pet = true;
            draft.pets.extend(self.pets);
        }
        draft.pet_terms_accepted |= self.accept_pet_terms;

        let mut form = FormModel::from_draft(draft, today);
        for (field, value) in &self.assignments {
            form.set_field_str(field, value)?;
        }
        Ok(form)
    }
}

fn load_draft(path: &Path) -> anyhow::Result<BookingDraft> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read draft {}: {e}", path.display()))?;
    toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse draft {}: {e}", path.display()))
}

/// Prints every field error, one per line.
pub fn print_errors(errors: &ValidationResult) {
    println!(
        "{}",
        format!("{} campo(s) com erro:", errors.len()).warning()
    );
    for (path, error) in errors.iter() {
        println!("  {:<20} {}", path.to_string().dim(), error);
    }
}
