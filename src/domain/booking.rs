use chrono::NaiveDate;
use non_empty_string::NonEmptyString;
use nonempty::NonEmpty;

use super::{Pet, RoomType, TaxId};

/// The dates of a stay.
///
/// A `Stay` always covers at least one night: check-out is strictly after
/// check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl Stay {
    /// Creates a stay, requiring check-out to be after check-in.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStay`] if `check_out` is not strictly later than
    /// `check_in`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, InvalidStay> {
        if check_out > check_in {
            Ok(Self {
                check_in,
                check_out,
            })
        } else {
            Err(InvalidStay {
                check_in,
                check_out,
            })
        }
    }

    /// The arrival date.
    #[must_use]
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// The departure date.
    #[must_use]
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights; always at least one.
    #[must_use]
    pub fn nights(&self) -> u32 {
        crate::pricing::nights(self.check_in, self.check_out)
    }
}

/// Error returned when check-out is not after check-in.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Check-out ({check_out}) must be after check-in ({check_in})")]
pub struct InvalidStay {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

/// A validated reservation request.
///
/// Produced by [`crate::FormModel::submit`] once every field passes
/// validation. The types carry the invariants: names are non-empty, the tax
/// ID is well formed, the stay has at least one night and pets are present
/// exactly when the guest declared them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// The guest's full name.
    pub full_name: NonEmptyString,
    /// National identity document (RG).
    pub national_id: NonEmptyString,
    /// Taxpayer number (CPF).
    pub tax_id: TaxId,
    /// The room requested.
    pub room_type: RoomType,
    /// Arrival and departure dates.
    pub stay: Stay,
    /// Number of guests, between 1 and 4.
    pub guest_count: u8,
    /// Pets travelling with the guests, if any.
    pub pets: Option<NonEmpty<Pet>>,
    /// Extra guests beyond the room's capacity.
    pub extra_guests: u32,
    /// Extra bedding kits.
    pub extra_kit_quantity: u32,
}

impl BookingRequest {
    /// Whether any pets were declared.
    #[must_use]
    pub const fn has_pet(&self) -> bool {
        self.pets.is_some()
    }

    /// Iterates over the declared pets.
    pub fn pets(&self) -> impl Iterator<Item = &Pet> {
        self.pets.iter().flat_map(NonEmpty::iter)
    }
}
