//! Reservation requests for a small eco-lodge
//!
//! Guests fill in a [`FormModel`], which validates every edit and prices the
//! stay as it goes. A valid form is submitted as a [`BookingRequest`] and
//! formatted into the message sent to the lodge over WhatsApp.

pub mod domain;
pub use domain::{BookingRequest, Config, ConfigError, Contact, Pet, PetSize, RoomType, Stay, TaxId};

pub mod form;
pub use form::{
    BookingDraft, Change, ChangeError, ErrorKind, Field, FieldError, FieldPath, FormModel,
    PetField, PetListError, SubmitError, ValidationResult,
};

pub mod pricing;
pub use pricing::{LineItem, PriceBreakdown, QuoteError, QuoteInput, Tariff, quote};

pub mod message;
pub use message::{DeepLink, Outbound, OutboundError};
