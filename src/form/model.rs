use chrono::NaiveDate;
use non_empty_string::NonEmptyString;
use nonempty::NonEmpty;

use super::{
    BookingDraft, Change, ChangeError, Field, PetField,
    validation::{self, ValidationResult},
};
use crate::{
    domain::{BookingRequest, Pet, Stay, TaxId, pet::UnknownPetSize},
    pricing::{self, PriceBreakdown, QuoteError, QuoteInput, Tariff},
};

/// The reservation form.
///
/// Holds the [`BookingDraft`] being edited and the errors currently shown
/// next to each field. Every edit goes through [`FormModel::set_field`] (or
/// one of the pet helpers), which applies the change and re-validates the
/// edited field together with the fields that depend on it.
///
/// The model never reads the clock: the date used to reject past check-ins
/// is supplied when it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormModel {
    draft: BookingDraft,
    today: NaiveDate,
    errors: ValidationResult,
}

impl FormModel {
    /// Creates an empty form.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self::from_draft(BookingDraft::default(), today)
    }

    /// Creates a form pre-filled from a draft.
    ///
    /// No field has been touched yet, so no errors are shown until the first
    /// edit or an explicit [`FormModel::validate`].
    #[must_use]
    pub fn from_draft(draft: BookingDraft, today: NaiveDate) -> Self {
        Self {
            draft,
            today,
            errors: ValidationResult::default(),
        }
    }

    /// The current form state.
    #[must_use]
    pub const fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// The date the form validates against.
    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    /// The errors shown next to the fields edited so far.
    #[must_use]
    pub const fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    /// Applies one change and re-validates the affected fields.
    pub fn set_field(&mut self, change: Change) {
        let field = change.field();
        self.draft = std::mem::take(&mut self.draft).apply(change);
        self.revalidate(field.dependents());
        tracing::debug!(%field, errors = self.errors.len(), "field updated");
    }

    /// Sets a field from its name and textual value.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is unknown or the value does not parse.
    /// The form is left unchanged in that case.
    pub fn set_field_str(&mut self, field: &str, value: &str) -> Result<(), ChangeError> {
        self.set_field(Change::parse(field, value)?);
        Ok(())
    }

    /// Turns the pet section on or off.
    ///
    /// Opening the section with no pets listed adds a first blank pet.
    /// Closing it keeps the list but waives every pet requirement.
    pub fn set_pets_enabled(&mut self, enabled: bool) {
        if enabled && self.draft.pets.is_empty() {
            self.draft.pets.push(Pet::default());
        }
        self.set_field(Change::HasPet(enabled));
    }

    /// Turns the extras section on or off.
    ///
    /// Opening it starts with one extra guest and one kit; closing it resets
    /// both to zero so no stale surcharge remains.
    pub fn set_extras_enabled(&mut self, enabled: bool) {
        let count = i64::from(enabled);
        self.set_field(Change::ExtraGuests(count));
        self.set_field(Change::ExtraKitQuantity(count));
    }

    /// Appends a blank pet (medium size) and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`PetListError::PetsDisabled`] unless pets are enabled.
    pub fn add_pet(&mut self) -> Result<usize, PetListError> {
        self.ensure_pets_enabled()?;
        self.draft.pets.push(Pet::default());
        self.revalidate(&[Field::Pets]);
        Ok(self.draft.pets.len() - 1)
    }

    /// Removes the pet at `index`, shifting later pets down by one.
    ///
    /// # Errors
    ///
    /// Returns an error unless pets are enabled and `index` is in range.
    pub fn remove_pet(&mut self, index: usize) -> Result<Pet, PetListError> {
        self.ensure_pets_enabled()?;
        self.ensure_in_range(index)?;
        let pet = self.draft.pets.remove(index);
        self.revalidate(&[Field::Pets]);
        Ok(pet)
    }

    /// Edits one field of the pet at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error unless pets are enabled and `index` is in range, or
    /// if a size is given that is not small, medium or large.
    pub fn set_pet_field(
        &mut self,
        index: usize,
        field: PetField,
        value: &str,
    ) -> Result<(), PetListError> {
        self.ensure_pets_enabled()?;
        self.ensure_in_range(index)?;

        let pet = &mut self.draft.pets[index];
        match field {
            PetField::Kind => pet.kind = value.to_string(),
            PetField::Size => pet.size = value.parse()?,
            PetField::Description => pet.description = value.to_string(),
        }
        self.revalidate(&[Field::Pets]);
        Ok(())
    }

    /// Checks every field.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        validation::validate(&self.draft, self.today)
    }

    /// Whether the form can be submitted.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.validate().is_valid()
    }

    /// Prices the current state of the form.
    ///
    /// This works on partially filled forms; only the dates and the room type
    /// are needed.
    ///
    /// # Errors
    ///
    /// Returns a [`QuoteError`] while dates or room type are missing.
    pub fn quote(&self, tariff: &Tariff) -> Result<PriceBreakdown, QuoteError> {
        pricing::quote(&QuoteInput::from(&self.draft), tariff)
    }

    /// Takes a validated snapshot of the form.
    ///
    /// Succeeds exactly when [`FormModel::can_submit`] is true.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Invalid`] with every field error when the form
    /// cannot be submitted.
    pub fn submit(&self) -> Result<BookingRequest, SubmitError> {
        let result = self.validate();
        if !result.is_valid() {
            return Err(SubmitError::Invalid(result));
        }

        let request = snapshot(&self.draft).map_err(SubmitError::Unrepresentable)?;
        tracing::info!(has_pet = request.has_pet(), "reservation submitted");
        Ok(request)
    }

    fn revalidate(&mut self, fields: &[Field]) {
        self.errors.clear(fields);
        self.errors
            .merge(validation::validate_fields(&self.draft, self.today, fields));
    }

    fn ensure_pets_enabled(&self) -> Result<(), PetListError> {
        if self.draft.has_pet {
            Ok(())
        } else {
            Err(PetListError::PetsDisabled)
        }
    }

    fn ensure_in_range(&self, index: usize) -> Result<(), PetListError> {
        let len = self.draft.pets.len();
        if index < len {
            Ok(())
        } else {
            Err(PetListError::OutOfRange { index, len })
        }
    }
}

/// Converts a draft that passed validation into the typed request.
///
/// Fails with the first field whose value has no typed counterpart, which
/// means a validation rule is missing for it.
fn snapshot(draft: &BookingDraft) -> Result<BookingRequest, Field> {
    let pets = if draft.has_pet {
        Some(NonEmpty::from_vec(draft.pets.clone()).ok_or(Field::Pets)?)
    } else {
        None
    };
    let check_in = draft.check_in.ok_or(Field::CheckIn)?;
    let check_out = draft.check_out.ok_or(Field::CheckOut)?;

    Ok(BookingRequest {
        full_name: NonEmptyString::new(draft.full_name.trim().to_string())
            .map_err(|_| Field::FullName)?,
        national_id: NonEmptyString::new(draft.national_id.trim().to_string())
            .map_err(|_| Field::NationalId)?,
        tax_id: TaxId::new(draft.tax_id.clone()).map_err(|_| Field::TaxId)?,
        room_type: draft.room_type.ok_or(Field::RoomType)?,
        stay: Stay::new(check_in, check_out).map_err(|_| Field::CheckOut)?,
        guest_count: u8::try_from(draft.guest_count).map_err(|_| Field::GuestCount)?,
        pets,
        extra_guests: u32::try_from(draft.extra_guests).map_err(|_| Field::ExtraGuests)?,
        extra_kit_quantity: u32::try_from(draft.extra_kit_quantity)
            .map_err(|_| Field::ExtraKitQuantity)?,
    })
}

/// Errors raised when editing the pet list.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PetListError {
    /// Pets can only be edited while the pet section is enabled.
    #[error("Pets are not enabled on this reservation")]
    PetsDisabled,

    /// There is no pet at this position.
    #[error("No pet at position {index} (the reservation lists {len})")]
    OutOfRange {
        /// The requested position.
        index: usize,
        /// How many pets are listed.
        len: usize,
    },

    /// The size given is not one of small, medium or large.
    #[error(transparent)]
    Size(#[from] UnknownPetSize),
}

/// Error returned when submitting a form that does not validate.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    /// At least one field is invalid.
    #[error("The reservation has {} invalid field(s)", .0.len())]
    Invalid(ValidationResult),

    /// A field passed validation but does not fit the submitted request.
    #[error("Field '{0}' passed validation but cannot be submitted")]
    Unrepresentable(Field),
}
