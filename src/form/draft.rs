use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Pet, RoomType};

/// The reservation form's field bag.
///
/// Every field is editable and may hold values that would not pass
/// validation yet: blank names, a check-out before check-in, negative
/// counts. Counts are signed on purpose so that out-of-range input can be
/// reported instead of being unrepresentable.
///
/// The draft is serializable so a half-filled form can be loaded from a
/// file and edited further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingDraft {
    /// The guest's full name.
    #[serde(alias = "fullName")]
    pub full_name: String,
    /// National identity document (RG).
    #[serde(alias = "rg", alias = "nationalId")]
    pub national_id: String,
    /// Taxpayer number (CPF), expected as `NNN.NNN.NNN-NN`.
    #[serde(alias = "cpf", alias = "taxId")]
    pub tax_id: String,
    /// The room requested.
    #[serde(alias = "roomType")]
    pub room_type: Option<RoomType>,
    /// Arrival date.
    #[serde(alias = "checkIn")]
    pub check_in: Option<NaiveDate>,
    /// Departure date.
    #[serde(alias = "checkOut")]
    pub check_out: Option<NaiveDate>,
    /// Number of guests in the room.
    #[serde(alias = "guestCount")]
    pub guest_count: i64,
    /// Whether pets are coming.
    #[serde(alias = "hasPet")]
    pub has_pet: bool,
    /// The pets, meaningful only while `has_pet` is set.
    pub pets: Vec<Pet>,
    /// Extra guests beyond the room's capacity.
    #[serde(alias = "extraGuests")]
    pub extra_guests: i64,
    /// Extra bedding kits.
    #[serde(alias = "extraKitQuantity")]
    pub extra_kit_quantity: i64,
    /// Whether the guest accepted the pet rules.
    #[serde(alias = "petTerms")]
    pub pet_terms_accepted: bool,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            national_id: String::new(),
            tax_id: String::new(),
            room_type: None,
            check_in: None,
            check_out: None,
            guest_count: 1,
            has_pet: false,
            pets: Vec::new(),
            extra_guests: 0,
            extra_kit_quantity: 0,
            pet_terms_accepted: false,
        }
    }
}

impl BookingDraft {
    /// Returns the draft with one change applied.
    ///
    /// This is the form's update function: it only moves the new value into
    /// place. Validation is left to the caller, see
    /// [`crate::FormModel::set_field`].
    #[must_use]
    pub fn apply(mut self, change: Change) -> Self {
        match change {
            Change::FullName(value) => self.full_name = value,
            Change::NationalId(value) => self.national_id = value,
            Change::TaxId(value) => self.tax_id = value,
            Change::RoomType(value) => self.room_type = value,
            Change::CheckIn(value) => self.check_in = value,
            Change::CheckOut(value) => self.check_out = value,
            Change::GuestCount(value) => self.guest_count = value,
            Change::HasPet(value) => self.has_pet = value,
            Change::ExtraGuests(value) => self.extra_guests = value,
            Change::ExtraKitQuantity(value) => self.extra_kit_quantity = value,
            Change::PetTerms(value) => self.pet_terms_accepted = value,
        }
        self
    }
}

/// The top-level fields of the reservation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Full name.
    FullName,
    /// National identity document (RG).
    NationalId,
    /// Taxpayer number (CPF).
    TaxId,
    /// Room type.
    RoomType,
    /// Arrival date.
    CheckIn,
    /// Departure date.
    CheckOut,
    /// Number of guests.
    GuestCount,
    /// Whether pets are coming.
    HasPet,
    /// The pet list.
    Pets,
    /// Extra guests.
    ExtraGuests,
    /// Extra bedding kits.
    ExtraKitQuantity,
    /// Pet rules acceptance.
    PetTerms,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Self; 12] = [
        Self::FullName,
        Self::NationalId,
        Self::TaxId,
        Self::RoomType,
        Self::CheckIn,
        Self::CheckOut,
        Self::GuestCount,
        Self::HasPet,
        Self::Pets,
        Self::ExtraGuests,
        Self::ExtraKitQuantity,
        Self::PetTerms,
    ];

    /// The field's canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::NationalId => "national_id",
            Self::TaxId => "tax_id",
            Self::RoomType => "room_type",
            Self::CheckIn => "check_in",
            Self::CheckOut => "check_out",
            Self::GuestCount => "guest_count",
            Self::HasPet => "has_pet",
            Self::Pets => "pets",
            Self::ExtraGuests => "extra_guests",
            Self::ExtraKitQuantity => "extra_kit_quantity",
            Self::PetTerms => "pet_terms",
        }
    }

    /// The fields whose validity may change when this one is edited,
    /// starting with the field itself.
    #[must_use]
    pub const fn dependents(self) -> &'static [Self] {
        match self {
            Self::FullName => &[Self::FullName],
            Self::NationalId => &[Self::NationalId],
            Self::TaxId => &[Self::TaxId],
            Self::RoomType => &[Self::RoomType],
            Self::CheckIn => &[Self::CheckIn, Self::CheckOut],
            Self::CheckOut => &[Self::CheckOut],
            Self::GuestCount => &[Self::GuestCount],
            Self::HasPet => &[Self::HasPet, Self::Pets, Self::PetTerms],
            Self::Pets => &[Self::Pets],
            Self::ExtraGuests => &[Self::ExtraGuests, Self::ExtraKitQuantity],
            Self::ExtraKitQuantity => &[Self::ExtraKitQuantity],
            Self::PetTerms => &[Self::PetTerms],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ChangeError;

    /// Accepts `snake_case`, `camelCase` and the form's short names (`rg`,
    /// `cpf`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        let field = match normalized.as_str() {
            "fullname" | "name" => Self::FullName,
            "nationalid" | "rg" => Self::NationalId,
            "taxid" | "cpf" => Self::TaxId,
            "roomtype" | "room" => Self::RoomType,
            "checkin" => Self::CheckIn,
            "checkout" => Self::CheckOut,
            "guestcount" | "guests" => Self::GuestCount,
            "haspet" => Self::HasPet,
            "pets" => Self::Pets,
            "extraguests" => Self::ExtraGuests,
            "extrakitquantity" | "extrakits" | "extrakit" => Self::ExtraKitQuantity,
            "petterms" | "pettermsaccepted" => Self::PetTerms,
            _ => return Err(ChangeError::UnknownField(s.to_string())),
        };
        Ok(field)
    }
}

/// The editable fields of a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PetField {
    /// What animal it is.
    Kind,
    /// How big it is.
    Size,
    /// Free-text description.
    Description,
}

impl PetField {
    /// The field's canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kind => "kind",
            Self::Size => "size",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for PetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PetField {
    type Err = ChangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kind" | "type" | "tipo" => Ok(Self::Kind),
            "size" | "porte" => Ok(Self::Size),
            "description" | "descricao" | "descrição" => Ok(Self::Description),
            _ => Err(ChangeError::UnknownField(s.to_string())),
        }
    }
}

/// A new value for one top-level field.
///
/// The pet list is edited through [`crate::FormModel::add_pet`],
/// [`crate::FormModel::remove_pet`] and
/// [`crate::FormModel::set_pet_field`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Sets the full name.
    FullName(String),
    /// Sets the national ID.
    NationalId(String),
    /// Sets the tax ID.
    TaxId(String),
    /// Sets or clears the room type.
    RoomType(Option<RoomType>),
    /// Sets or clears the arrival date.
    CheckIn(Option<NaiveDate>),
    /// Sets or clears the departure date.
    CheckOut(Option<NaiveDate>),
    /// Sets the guest count.
    GuestCount(i64),
    /// Turns the pet section on or off.
    HasPet(bool),
    /// Sets the number of extra guests.
    ExtraGuests(i64),
    /// Sets the number of extra kits.
    ExtraKitQuantity(i64),
    /// Accepts or declines the pet rules.
    PetTerms(bool),
}

impl Change {
    /// The field this change edits.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::FullName(_) => Field::FullName,
            Self::NationalId(_) => Field::NationalId,
            Self::TaxId(_) => Field::TaxId,
            Self::RoomType(_) => Field::RoomType,
            Self::CheckIn(_) => Field::CheckIn,
            Self::CheckOut(_) => Field::CheckOut,
            Self::GuestCount(_) => Field::GuestCount,
            Self::HasPet(_) => Field::HasPet,
            Self::ExtraGuests(_) => Field::ExtraGuests,
            Self::ExtraKitQuantity(_) => Field::ExtraKitQuantity,
            Self::PetTerms(_) => Field::PetTerms,
        }
    }

    /// Builds a change from a field name and its textual value.
    ///
    /// Dates are accepted as `YYYY-MM-DD` or `DD/MM/YYYY`; an empty value
    /// clears optional fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is unknown, is not set through a plain
    /// value (the pet list), or if the value cannot be parsed for that field.
    pub fn parse(field: &str, value: &str) -> Result<Self, ChangeError> {
        let field: Field = field.parse()?;
        let invalid = |reason: String| ChangeError::InvalidValue {
            field,
            value: value.to_string(),
            reason,
        };

        let change = match field {
            Field::FullName => Self::FullName(value.to_string()),
            Field::NationalId => Self::NationalId(value.to_string()),
            Field::TaxId => Self::TaxId(value.to_string()),
            Field::RoomType => Self::RoomType(
                non_blank(value)
                    .map(str::parse::<RoomType>)
                    .transpose()
                    .map_err(|e| invalid(format!("{e}")))?,
            ),
            Field::CheckIn => Self::CheckIn(parse_date(value).map_err(invalid)?),
            Field::CheckOut => Self::CheckOut(parse_date(value).map_err(invalid)?),
            Field::GuestCount => Self::GuestCount(parse_count(value).map_err(invalid)?),
            Field::HasPet => Self::HasPet(parse_flag(value).map_err(invalid)?),
            Field::Pets => return Err(ChangeError::NotSettable(field)),
            Field::ExtraGuests => Self::ExtraGuests(parse_count(value).map_err(invalid)?),
            Field::ExtraKitQuantity => {
                Self::ExtraKitQuantity(parse_count(value).map_err(invalid)?)
            }
            Field::PetTerms => Self::PetTerms(parse_flag(value).map_err(invalid)?),
        };
        Ok(change)
    }
}

/// Errors raised while turning text into a [`Change`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChangeError {
    /// No field has this name.
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// The field is not set from a single value.
    #[error("Field '{0}' cannot be set directly")]
    NotSettable(Field),

    /// The value does not parse for this field.
    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidValue {
        /// The field being set.
        field: Field,
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn parse_date(value: &str) -> Result<Option<NaiveDate>, String> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .map(Some)
        .map_err(|_| "expected YYYY-MM-DD or DD/MM/YYYY".to_string())
}

fn parse_count(value: &str) -> Result<i64, String> {
    value
        .trim()
        .parse()
        .map_err(|_| "expected a whole number".to_string())
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "sim" | "s" | "on" => Ok(true),
        "false" | "no" | "n" | "0" | "não" | "nao" | "off" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn default_draft_has_one_guest_and_nothing_else() {
        let draft = BookingDraft::default();
        assert_eq!(draft.guest_count, 1);
        assert_eq!(draft.extra_guests, 0);
        assert_eq!(draft.extra_kit_quantity, 0);
        assert!(!draft.has_pet);
        assert!(draft.pets.is_empty());
        assert!(draft.room_type.is_none());
    }

    #[test]
    fn apply_only_touches_the_named_field() {
        let before = BookingDraft::default();
        let after = before
            .clone()
            .apply(Change::RoomType(Some(RoomType::FourPerson)));

        assert_eq!(after.room_type, Some(RoomType::FourPerson));
        assert_eq!(
            BookingDraft {
                room_type: None,
                ..after
            },
            before
        );
    }

    #[test_case("full_name"; "snake case")]
    #[test_case("fullName"; "camel case")]
    #[test_case("FULL-NAME"; "kebab upper")]
    fn field_names_are_flexible(name: &str) {
        assert_eq!(name.parse::<Field>().unwrap(), Field::FullName);
    }

    #[test]
    fn every_field_parses_from_its_canonical_name() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>().unwrap(), field);
        }
    }

    #[test_case("rg", Field::NationalId; "rg")]
    #[test_case("cpf", Field::TaxId; "cpf")]
    #[test_case("petTerms", Field::PetTerms; "pet terms")]
    #[test_case("extraKitQuantity", Field::ExtraKitQuantity; "extra kits")]
    fn form_short_names(name: &str, expected: Field) {
        assert_eq!(name.parse::<Field>().unwrap(), expected);
    }

    #[test]
    fn parses_dates_in_both_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 7);
        assert_eq!(
            Change::parse("checkIn", "2024-06-07").unwrap(),
            Change::CheckIn(expected)
        );
        assert_eq!(
            Change::parse("check_out", "07/06/2024").unwrap(),
            Change::CheckOut(expected)
        );
        assert_eq!(
            Change::parse("check_out", "").unwrap(),
            Change::CheckOut(None)
        );
    }

    #[test]
    fn negative_counts_are_kept_for_validation() {
        assert_eq!(
            Change::parse("extra_guests", "-2").unwrap(),
            Change::ExtraGuests(-2)
        );
    }

    #[test]
    fn rejects_unparseable_values() {
        assert!(matches!(
            Change::parse("guest_count", "two"),
            Err(ChangeError::InvalidValue {
                field: Field::GuestCount,
                ..
            })
        ));
        assert!(matches!(
            Change::parse("room_type", "suite"),
            Err(ChangeError::InvalidValue {
                field: Field::RoomType,
                ..
            })
        ));
        assert_eq!(
            Change::parse("favourite_colour", "green"),
            Err(ChangeError::UnknownField("favourite_colour".to_string()))
        );
        assert_eq!(
            Change::parse("pets", "2"),
            Err(ChangeError::NotSettable(Field::Pets))
        );
    }

    #[test]
    fn parses_portuguese_flags() {
        assert_eq!(
            Change::parse("hasPet", "sim").unwrap(),
            Change::HasPet(true)
        );
        assert_eq!(
            Change::parse("pet_terms", "não").unwrap(),
            Change::PetTerms(false)
        );
    }

    #[test]
    fn deserializes_camel_case_draft() {
        let draft: BookingDraft = toml::from_str(
            "fullName = \"Ana\"\ncpf = \"123.456.789-00\"\nroomType = \"4p\"\ncheckIn = \
             \"2024-06-07\"\nhasPet = true\n\n[[pets]]\ntype = \"gato\"\nsize = \"P\"\n",
        )
        .unwrap();

        assert_eq!(draft.full_name, "Ana");
        assert_eq!(draft.tax_id, "123.456.789-00");
        assert_eq!(draft.room_type, Some(RoomType::FourPerson));
        assert_eq!(draft.check_in, NaiveDate::from_ymd_opt(2024, 6, 7));
        assert_eq!(draft.guest_count, 1);
        assert_eq!(draft.pets.len(), 1);
        assert_eq!(draft.pets[0].kind, "gato");
        assert!(draft.pets[0].description.is_empty());
    }
}
