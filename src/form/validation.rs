//! Declarative validation rules.
//!
//! Validation is a table of [`Rule`]s, one `(field, error kind, message,
//! predicate)` entry per constraint. Rules for the same field are checked in
//! table order and the first violation is reported, so a blank tax ID says
//! "required" rather than "badly formatted".

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use super::{BookingDraft, Field, PetField};
use crate::domain::{Pet, tax_id};

/// Smallest number of guests in a room.
pub const MIN_GUESTS: i64 = 1;

/// Largest number of guests in a room.
pub const MAX_GUESTS: i64 = 4;

/// Largest number of extra guests a request can carry (`u32::MAX`).
pub const MAX_EXTRA_GUESTS: i64 = 4_294_967_295;

/// The category of a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required value is blank or unset.
    RequiredFieldMissing,
    /// The value does not have the expected layout.
    InvalidFormat,
    /// A date is in the past, or check-out is not after check-in.
    DateOutOfRange,
    /// A count is outside its allowed range.
    BoundsViolation,
    /// A requirement that only applies when pets are declared.
    ConditionalRequirement,
}

/// A validation failure on one field, ready to be shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[error("{message}")]
pub struct FieldError {
    /// What kind of problem this is.
    pub kind: ErrorKind,
    /// The message shown to the guest.
    pub message: &'static str,
}

/// Identifies a single input: a top-level field or one field of one pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    /// A top-level field.
    Field(Field),
    /// A field of the pet at `index`.
    Pet {
        /// Position of the pet in the list.
        index: usize,
        /// Which of its fields.
        field: PetField,
    },
}

impl FieldPath {
    /// The top-level field this path belongs to.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Field(field) => *field,
            Self::Pet { .. } => Field::Pets,
        }
    }
}

impl From<Field> for FieldPath {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, "{field}"),
            Self::Pet { index, field } => write!(f, "pets[{index}].{field}"),
        }
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-field outcome of validating a draft.
///
/// Fields without an entry are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: BTreeMap<FieldPath, FieldError>,
}

impl ValidationResult {
    /// Whether every field passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with an error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error on a field or pet field, if any.
    #[must_use]
    pub fn get(&self, path: impl Into<FieldPath>) -> Option<&FieldError> {
        self.errors.get(&path.into())
    }

    /// Iterates over the errors in form order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &FieldError)> {
        self.errors.iter()
    }

    /// Drops every error belonging to the given top-level fields.
    pub(crate) fn clear(&mut self, fields: &[Field]) {
        self.errors.retain(|path, _| !fields.contains(&path.field()));
    }

    /// Adds the errors from another result, replacing any on the same path.
    pub(crate) fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    fn insert(&mut self, path: FieldPath, error: FieldError) {
        self.errors.entry(path).or_insert(error);
    }
}

impl<'a> IntoIterator for &'a ValidationResult {
    type Item = (&'a FieldPath, &'a FieldError);
    type IntoIter = std::collections::btree_map::Iter<'a, FieldPath, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// What a rule sees: the draft and the date it is validated on.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// The form state.
    pub draft: &'a BookingDraft,
    /// The current date, used to reject past check-ins.
    pub today: NaiveDate,
}

/// One constraint on a top-level field.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// The field the error is reported on.
    pub field: Field,
    /// The category of the error.
    pub kind: ErrorKind,
    /// The message shown when the rule is violated.
    pub message: &'static str,
    /// Returns `true` when the draft breaks the rule.
    pub violated: fn(&Context<'_>) -> bool,
}

impl Rule {
    /// Evaluates the rule.
    #[must_use]
    pub fn check(&self, context: &Context<'_>) -> Option<FieldError> {
        (self.violated)(context).then_some(FieldError {
            kind: self.kind,
            message: self.message,
        })
    }
}

/// One constraint on each declared pet.
#[derive(Debug, Clone, Copy)]
pub struct PetRule {
    /// The pet field the error is reported on.
    pub field: PetField,
    /// The category of the error.
    pub kind: ErrorKind,
    /// The message shown when the rule is violated.
    pub message: &'static str,
    /// Returns `true` when the pet breaks the rule.
    pub violated: fn(&Pet) -> bool,
}

impl PetRule {
    /// Evaluates the rule against one pet.
    #[must_use]
    pub fn check(&self, pet: &Pet) -> Option<FieldError> {
        (self.violated)(pet).then_some(FieldError {
            kind: self.kind,
            message: self.message,
        })
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// The form's field rules, in form order.
pub const RULES: &[Rule] = &[
    Rule {
        field: Field::FullName,
        kind: ErrorKind::RequiredFieldMissing,
        message: "Nome completo é obrigatório",
        violated: |cx| blank(&cx.draft.full_name),
    },
    Rule {
        field: Field::NationalId,
        kind: ErrorKind::RequiredFieldMissing,
        message: "RG é obrigatório",
        violated: |cx| blank(&cx.draft.national_id),
    },
    Rule {
        field: Field::TaxId,
        kind: ErrorKind::RequiredFieldMissing,
        message: "CPF é obrigatório",
        violated: |cx| blank(&cx.draft.tax_id),
    },
    Rule {
        field: Field::TaxId,
        kind: ErrorKind::InvalidFormat,
        message: "CPF inválido (use o formato 000.000.000-00)",
        violated: |cx| !tax_id::is_well_formed(&cx.draft.tax_id),
    },
    Rule {
        field: Field::RoomType,
        kind: ErrorKind::RequiredFieldMissing,
        message: "Tipo de quarto é obrigatório",
        violated: |cx| cx.draft.room_type.is_none(),
    },
    Rule {
        field: Field::CheckIn,
        kind: ErrorKind::RequiredFieldMissing,
        message: "Data de entrada é obrigatória",
        violated: |cx| cx.draft.check_in.is_none(),
    },
    Rule {
        field: Field::CheckIn,
        kind: ErrorKind::DateOutOfRange,
        message: "Não é possível reservar para datas passadas",
        violated: |cx| cx.draft.check_in.is_some_and(|date| date < cx.today),
    },
    Rule {
        field: Field::CheckOut,
        kind: ErrorKind::RequiredFieldMissing,
        message: "Data de saída é obrigatória",
        violated: |cx| cx.draft.check_out.is_none(),
    },
    Rule {
        field: Field::CheckOut,
        kind: ErrorKind::DateOutOfRange,
        message: "Reserva mínima de 1 noite: a saída deve ser após a entrada",
        violated: |cx| match (cx.draft.check_in, cx.draft.check_out) {
            (Some(check_in), Some(check_out)) => check_out <= check_in,
            _ => false,
        },
    },
    Rule {
        field: Field::GuestCount,
        kind: ErrorKind::BoundsViolation,
        message: "Mínimo 1 hóspede",
        violated: |cx| cx.draft.guest_count < MIN_GUESTS,
    },
    Rule {
        field: Field::GuestCount,
        kind: ErrorKind::BoundsViolation,
        message: "Máximo 4 hóspedes",
        violated: |cx| cx.draft.guest_count > MAX_GUESTS,
    },
    Rule {
        field: Field::Pets,
        kind: ErrorKind::ConditionalRequirement,
        message: "Pelo menos um pet deve ser informado",
        violated: |cx| cx.draft.has_pet && cx.draft.pets.is_empty(),
    },
    Rule {
        field: Field::ExtraGuests,
        kind: ErrorKind::BoundsViolation,
        message: "Número de hóspedes extras não pode ser negativo",
        violated: |cx| cx.draft.extra_guests < 0,
    },
    Rule {
        field: Field::ExtraGuests,
        kind: ErrorKind::BoundsViolation,
        message: "Número de hóspedes extras muito alto",
        violated: |cx| cx.draft.extra_guests > MAX_EXTRA_GUESTS,
    },
    Rule {
        field: Field::ExtraKitQuantity,
        kind: ErrorKind::BoundsViolation,
        message: "Quantidade não pode ser negativa",
        violated: |cx| cx.draft.extra_kit_quantity < 0,
    },
    Rule {
        field: Field::ExtraKitQuantity,
        kind: ErrorKind::BoundsViolation,
        message: "No máximo um kit por hóspede extra",
        violated: |cx| cx.draft.extra_kit_quantity > cx.draft.extra_guests.max(0),
    },
    Rule {
        field: Field::PetTerms,
        kind: ErrorKind::ConditionalRequirement,
        message: "Você deve aceitar os termos para pets",
        violated: |cx| cx.draft.has_pet && !cx.draft.pet_terms_accepted,
    },
];

/// Rules applied to every pet while pets are declared.
pub const PET_RULES: &[PetRule] = &[
    PetRule {
        field: PetField::Kind,
        kind: ErrorKind::RequiredFieldMissing,
        message: "Tipo do pet é obrigatório",
        violated: |pet| blank(&pet.kind),
    },
    PetRule {
        field: PetField::Description,
        kind: ErrorKind::RequiredFieldMissing,
        message: "Descrição é obrigatória",
        violated: |pet| blank(&pet.description),
    },
];

/// Validates every field of a draft.
#[must_use]
pub fn validate(draft: &BookingDraft, today: NaiveDate) -> ValidationResult {
    validate_fields(draft, today, &Field::ALL)
}

/// Validates only the given fields of a draft.
#[must_use]
pub fn validate_fields(
    draft: &BookingDraft,
    today: NaiveDate,
    fields: &[Field],
) -> ValidationResult {
    let context = Context { draft, today };
    let mut result = ValidationResult::default();

    for rule in RULES.iter().filter(|rule| fields.contains(&rule.field)) {
        if let Some(error) = rule.check(&context) {
            result.insert(FieldPath::Field(rule.field), error);
        }
    }

    if draft.has_pet && fields.contains(&Field::Pets) {
        for (index, pet) in draft.pets.iter().enumerate() {
            for rule in PET_RULES {
                if let Some(error) = rule.check(pet) {
                    result.insert(
                        FieldPath::Pet {
                            index,
                            field: rule.field,
                        },
                        error,
                    );
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::{PetSize, RoomType};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn valid_draft() -> BookingDraft {
        BookingDraft {
            full_name: "Maria da Silva".to_string(),
            national_id: "12.345.678-9".to_string(),
            tax_id: "123.456.789-00".to_string(),
            room_type: Some(RoomType::ThreePerson),
            check_in: Some(date("2024-06-10")),
            check_out: Some(date("2024-06-12")),
            ..BookingDraft::default()
        }
    }

    fn kind_of(result: &ValidationResult, path: impl Into<FieldPath>) -> Option<ErrorKind> {
        result.get(path).map(|error| error.kind)
    }

    #[test]
    fn valid_draft_passes() {
        assert!(validate(&valid_draft(), today()).is_valid());
    }

    #[test]
    fn empty_draft_reports_required_fields() {
        let result = validate(&BookingDraft::default(), today());

        for field in [
            Field::FullName,
            Field::NationalId,
            Field::TaxId,
            Field::RoomType,
            Field::CheckIn,
            Field::CheckOut,
        ] {
            assert_eq!(
                kind_of(&result, field),
                Some(ErrorKind::RequiredFieldMissing),
                "{field}"
            );
        }
        assert_eq!(result.len(), 6);
    }

    #[test]
    fn blank_tax_id_is_missing_not_malformed() {
        let draft = BookingDraft {
            tax_id: "  ".to_string(),
            ..valid_draft()
        };
        assert_eq!(
            kind_of(&validate(&draft, today()), Field::TaxId),
            Some(ErrorKind::RequiredFieldMissing)
        );
    }

    #[test]
    fn unpunctuated_tax_id_is_malformed() {
        let draft = BookingDraft {
            tax_id: "12345678900".to_string(),
            ..valid_draft()
        };
        let result = validate(&draft, today());
        assert_eq!(kind_of(&result, Field::TaxId), Some(ErrorKind::InvalidFormat));
        assert_eq!(
            result.get(Field::TaxId).unwrap().to_string(),
            "CPF inválido (use o formato 000.000.000-00)"
        );
    }

    #[test]
    fn past_check_in_is_out_of_range() {
        let draft = BookingDraft {
            check_in: Some(date("2024-05-31")),
            ..valid_draft()
        };
        assert_eq!(
            kind_of(&validate(&draft, today()), Field::CheckIn),
            Some(ErrorKind::DateOutOfRange)
        );
    }

    #[test]
    fn check_in_today_is_allowed() {
        let draft = BookingDraft {
            check_in: Some(today()),
            ..valid_draft()
        };
        assert!(validate(&draft, today()).is_valid());
    }

    #[test_case("2024-06-10", "2024-06-10"; "same day")]
    #[test_case("2024-06-10", "2024-06-09"; "before check in")]
    fn check_out_must_follow_check_in(check_in: &str, check_out: &str) {
        let draft = BookingDraft {
            check_in: Some(date(check_in)),
            check_out: Some(date(check_out)),
            ..valid_draft()
        };
        let result = validate(&draft, today());
        assert_eq!(
            kind_of(&result, Field::CheckOut),
            Some(ErrorKind::DateOutOfRange)
        );
        assert_eq!(kind_of(&result, Field::CheckIn), None);
    }

    #[test_case(0, Some(ErrorKind::BoundsViolation); "zero guests")]
    #[test_case(1, None; "one guest")]
    #[test_case(4, None; "four guests")]
    #[test_case(5, Some(ErrorKind::BoundsViolation); "five guests")]
    fn guest_count_bounds(guest_count: i64, expected: Option<ErrorKind>) {
        let draft = BookingDraft {
            guest_count,
            ..valid_draft()
        };
        assert_eq!(kind_of(&validate(&draft, today()), Field::GuestCount), expected);
    }

    #[test]
    fn negative_extras_are_bounds_violations() {
        let draft = BookingDraft {
            extra_guests: -1,
            extra_kit_quantity: -3,
            ..valid_draft()
        };
        let result = validate(&draft, today());
        assert_eq!(
            kind_of(&result, Field::ExtraGuests),
            Some(ErrorKind::BoundsViolation)
        );
        assert_eq!(
            kind_of(&result, Field::ExtraKitQuantity),
            Some(ErrorKind::BoundsViolation)
        );
    }

    #[test_case(0, 0, None; "no extras")]
    #[test_case(2, 2, None; "one kit per extra guest")]
    #[test_case(2, 3, Some(ErrorKind::BoundsViolation); "more kits than extra guests")]
    #[test_case(0, 1, Some(ErrorKind::BoundsViolation); "kit without extra guest")]
    fn kits_are_capped_by_extra_guests(
        extra_guests: i64,
        extra_kit_quantity: i64,
        expected: Option<ErrorKind>,
    ) {
        let draft = BookingDraft {
            extra_guests,
            extra_kit_quantity,
            ..valid_draft()
        };
        assert_eq!(
            kind_of(&validate(&draft, today()), Field::ExtraKitQuantity),
            expected
        );
    }

    #[test]
    fn extra_guests_must_fit_a_request() {
        let draft = BookingDraft {
            extra_guests: MAX_EXTRA_GUESTS + 1,
            ..valid_draft()
        };
        let result = validate(&draft, today());
        assert_eq!(
            kind_of(&result, Field::ExtraGuests),
            Some(ErrorKind::BoundsViolation)
        );

        let draft = BookingDraft {
            extra_guests: MAX_EXTRA_GUESTS,
            ..valid_draft()
        };
        assert!(validate(&draft, today()).is_valid());
    }

    #[test]
    fn pets_declared_but_missing() {
        let draft = BookingDraft {
            has_pet: true,
            pet_terms_accepted: true,
            ..valid_draft()
        };
        let result = validate(&draft, today());
        assert_eq!(
            kind_of(&result, Field::Pets),
            Some(ErrorKind::ConditionalRequirement)
        );
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn pet_terms_required_only_with_pets() {
        let with_pets = BookingDraft {
            has_pet: true,
            pets: vec![Pet::new("cachorro", PetSize::Large, "labrador")],
            ..valid_draft()
        };
        assert_eq!(
            kind_of(&validate(&with_pets, today()), Field::PetTerms),
            Some(ErrorKind::ConditionalRequirement)
        );

        let without_pets = BookingDraft {
            has_pet: false,
            ..with_pets
        };
        assert!(validate(&without_pets, today()).is_valid());
    }

    #[test]
    fn blank_pet_fields_are_reported_per_pet() {
        let draft = BookingDraft {
            has_pet: true,
            pet_terms_accepted: true,
            pets: vec![
                Pet::new("gato", PetSize::Small, "siamês"),
                Pet::default(),
            ],
            ..valid_draft()
        };
        let result = validate(&draft, today());

        let paths: Vec<String> = result.iter().map(|(path, _)| path.to_string()).collect();
        assert_eq!(paths, vec!["pets[1].kind", "pets[1].description"]);
    }

    #[test]
    fn rules_can_be_checked_individually() {
        let draft = BookingDraft::default();
        let context = Context {
            draft: &draft,
            today: today(),
        };
        let room_rule = RULES
            .iter()
            .find(|rule| rule.field == Field::RoomType)
            .unwrap();

        assert_eq!(
            room_rule.check(&context).map(|error| error.kind),
            Some(ErrorKind::RequiredFieldMissing)
        );
    }

    #[test]
    fn validating_some_fields_ignores_the_rest() {
        let result = validate_fields(&BookingDraft::default(), today(), &[Field::FullName]);
        assert_eq!(result.len(), 1);
        assert!(result.get(Field::FullName).is_some());
    }

    #[test]
    fn serializes_as_map_keyed_by_path() {
        let draft = BookingDraft {
            tax_id: "123".to_string(),
            ..valid_draft()
        };
        let json = serde_json::to_value(validate(&draft, today())).unwrap();
        assert_eq!(json["tax_id"]["kind"], "invalid_format");
    }
}
