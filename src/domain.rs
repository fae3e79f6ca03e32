//! Domain models for reservation requests.
//!
//! This module contains the validated building blocks of a reservation:
//! room types, pets, tax IDs, stays, the submitted request itself, and the
//! lodge configuration.

mod booking;
pub use booking::{BookingRequest, InvalidStay, Stay};

mod config;
pub use config::{Config, ConfigError, Contact};

/// Pets travelling on a reservation.
pub mod pet;
pub use pet::{Pet, PetSize};

mod room;
pub use room::{RoomType, UnknownRoomType};

/// Taxpayer number (CPF) parsing.
pub mod tax_id;
pub use tax_id::{InvalidTaxId, TaxId};
