//! Outbound reservation messages and the links that carry them.
//!
//! Nothing is sent from here: a submitted [`BookingRequest`] is formatted
//! into newline-delimited text, and [`DeepLink`] turns that text into a
//! `wa.me` link that opens the lodge's chat with the message pre-filled.

use std::fmt::{self, Write};

use crate::{
    domain::{BookingRequest, Config},
    form::{FormModel, SubmitError},
    pricing::{self, Brl, PriceBreakdown, QuoteError, QuoteInput},
};

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Formats the reservation message for a submitted request.
///
/// Lines, in order: header, identity, room and dates, guest count, extras
/// (when extra guests are booked), pets (when declared), total, then the
/// price details.
#[must_use]
pub fn compose(config: &Config, request: &BookingRequest, breakdown: &PriceBreakdown) -> String {
    let mut text = String::new();
    // Writing into a `String` cannot fail.
    let _ = write_message(&mut text, config, request, breakdown);
    text
}

fn write_message(
    out: &mut String,
    config: &Config,
    request: &BookingRequest,
    breakdown: &PriceBreakdown,
) -> fmt::Result {
    writeln!(out, "{}", config.message_header())?;
    writeln!(out)?;
    writeln!(out, "*Nome:* {}", request.full_name)?;
    writeln!(out, "*RG:* {}", request.national_id)?;
    writeln!(out, "*CPF:* {}", request.tax_id)?;
    writeln!(out)?;
    writeln!(out, "*Quarto:* {}", request.room_type.label())?;
    writeln!(
        out,
        "*Check-in:* {}",
        request.stay.check_in().format(DATE_FORMAT)
    )?;
    writeln!(
        out,
        "*Check-out:* {}",
        request.stay.check_out().format(DATE_FORMAT)
    )?;
    writeln!(out, "*Nº de Hóspedes:* {}", request.guest_count)?;

    if request.extra_guests > 0 {
        writeln!(out, "*Hóspedes Extras:* {}", request.extra_guests)?;
        writeln!(out, "*Kits Extras:* {}", request.extra_kit_quantity)?;
        writeln!(out)?;
    }

    if request.has_pet() {
        writeln!(out, "*Pets:*")?;
        for pet in request.pets() {
            writeln!(out, "- {pet}")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "*Valor Total:* {}", Brl(breakdown.total))?;
    writeln!(out)?;
    write!(out, "*Detalhes do Cálculo:*")?;
    for item in &breakdown.line_items {
        write!(out, "\n{item}")?;
    }
    Ok(())
}

/// A link that opens an external app on a given page or chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink(String);

impl DeepLink {
    /// A WhatsApp chat with `phone`, with `text` pre-filled.
    ///
    /// Anything but digits is stripped from the phone number.
    #[must_use]
    pub fn whatsapp(phone: &str, text: &str) -> Self {
        let phone: String = phone.chars().filter(char::is_ascii_digit).collect();
        Self(format!(
            "https://wa.me/{phone}?text={}",
            urlencoding::encode(text)
        ))
    }

    /// An Instagram profile.
    #[must_use]
    pub fn instagram(handle: &str) -> Self {
        let handle = handle.trim().trim_start_matches('@');
        Self(format!("https://instagram.com/{}", urlencoding::encode(handle)))
    }

    /// The link as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything produced when a reservation is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    /// The validated request.
    pub request: BookingRequest,
    /// Its price.
    pub breakdown: PriceBreakdown,
    /// The formatted message.
    pub text: String,
    /// The chat link carrying the message.
    pub link: DeepLink,
}

/// Errors raised while preparing an outbound message.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OutboundError {
    /// The form does not validate.
    #[error(transparent)]
    Invalid(#[from] SubmitError),

    /// The request could not be priced.
    #[error(transparent)]
    Quote(#[from] QuoteError),
}

impl Outbound {
    /// Submits the form, prices the request and formats the message.
    ///
    /// # Errors
    ///
    /// Returns an error if the form does not validate.
    pub fn prepare(form: &FormModel, config: &Config) -> Result<Self, OutboundError> {
        let request = form.submit()?;
        let breakdown = pricing::quote(&QuoteInput::from(&request), &config.tariff)?;
        let text = compose(config, &request, &breakdown);
        let link = DeepLink::whatsapp(&config.contact.whatsapp_phone, &text);

        tracing::debug!(bytes = text.len(), "composed reservation message");

        Ok(Self {
            request,
            breakdown,
            text,
            link,
        })
    }
}
