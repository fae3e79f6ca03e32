//! Nightly-rate price calculation.
//!
//! [`quote`] is a pure function of its inputs: it never caches, never
//! touches the clock and returns an identical [`PriceBreakdown`] for
//! identical inputs.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{BookingRequest, RoomType},
    form::BookingDraft,
};

/// Monetary amounts in reais.
///
/// Amounts are accumulated in full precision and only rounded to cents when
/// displayed through [`Brl`].
pub type Money = f64;

/// Formats an amount as `R$ 0.00`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brl(pub Money);

impl fmt::Display for Brl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {:.2}", self.0)
    }
}

/// Weekday and weekend price of one night in a room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NightlyRate {
    /// Price of a night starting on a weekday.
    pub weekday: Money,
    /// Price of a night starting on a weekend day.
    pub weekend: Money,
}

impl NightlyRate {
    /// The price for a night of the given kind.
    #[must_use]
    pub const fn for_day(self, kind: DayKind) -> Money {
        match kind {
            DayKind::Weekday => self.weekday,
            DayKind::Weekend => self.weekend,
        }
    }
}

/// How extra guests and extra kits are billed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrasPolicy {
    /// A flat fee per stay, regardless of the number of nights.
    #[default]
    PerStay,
    /// The fee is charged once per night.
    PerNight,
}

/// The lodge's price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tariff {
    /// Whether extras are billed per stay or per night.
    pub extras_policy: ExtrasPolicy,
    /// Days billed at the weekend rate.
    pub weekend_days: Vec<Weekday>,
    /// Fee per extra guest.
    pub extra_guest: Money,
    /// Fee per extra bedding kit.
    pub extra_kit: Money,
    /// Fee per pet per night.
    pub pet_per_night: Money,
    /// Rates for the three-person room.
    pub three_person: NightlyRate,
    /// Rates for the four-person room.
    pub four_person: NightlyRate,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            extras_policy: ExtrasPolicy::PerStay,
            weekend_days: vec![Weekday::Sat, Weekday::Sun],
            extra_guest: 70.0,
            extra_kit: 30.0,
            pet_per_night: 50.0,
            three_person: NightlyRate {
                weekday: 100.0,
                weekend: 300.0,
            },
            four_person: NightlyRate {
                weekday: 150.0,
                weekend: 400.0,
            },
        }
    }
}

impl Tariff {
    /// The nightly rates of a room type.
    #[must_use]
    pub const fn nightly_rate(&self, room_type: RoomType) -> NightlyRate {
        match room_type {
            RoomType::ThreePerson => self.three_person,
            RoomType::FourPerson => self.four_person,
        }
    }

    /// Classifies a calendar day as weekday or weekend.
    #[must_use]
    pub fn classify(&self, date: NaiveDate) -> DayKind {
        if self.weekend_days.contains(&date.weekday()) {
            DayKind::Weekend
        } else {
            DayKind::Weekday
        }
    }
}

/// Whether a night is billed at the weekday or the weekend rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// Billed at the weekday rate.
    Weekday,
    /// Billed at the weekend rate.
    Weekend,
}

impl DayKind {
    const fn label(self) -> &'static str {
        match self {
            Self::Weekday => "dia útil",
            Self::Weekend => "final de semana",
        }
    }
}

/// The pricing-relevant subset of a reservation.
///
/// Built from a partially filled [`BookingDraft`] while the guest is still
/// typing, or from a validated [`BookingRequest`] at submission time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoteInput {
    /// The room to price, if chosen.
    pub room_type: Option<RoomType>,
    /// Arrival date, if chosen.
    pub check_in: Option<NaiveDate>,
    /// Departure date, if chosen.
    pub check_out: Option<NaiveDate>,
    /// Number of extra guests.
    pub extra_guests: u32,
    /// Number of extra bedding kits.
    pub extra_kits: u32,
    /// Number of pets declared.
    pub pets: u32,
}

impl From<&BookingDraft> for QuoteInput {
    fn from(draft: &BookingDraft) -> Self {
        let pets = if draft.has_pet { draft.pets.len() } else { 0 };
        Self {
            room_type: draft.room_type,
            check_in: draft.check_in,
            check_out: draft.check_out,
            extra_guests: non_negative(draft.extra_guests),
            extra_kits: non_negative(draft.extra_kit_quantity),
            pets: u32::try_from(pets).unwrap_or(u32::MAX),
        }
    }
}

impl From<&BookingRequest> for QuoteInput {
    fn from(request: &BookingRequest) -> Self {
        let pets = request.pets.as_ref().map_or(0, nonempty::NonEmpty::len);
        Self {
            room_type: Some(request.room_type),
            check_in: Some(request.stay.check_in()),
            check_out: Some(request.stay.check_out()),
            extra_guests: request.extra_guests,
            extra_kits: request.extra_kit_quantity,
            pets: u32::try_from(pets).unwrap_or(u32::MAX),
        }
    }
}

fn non_negative(count: i64) -> u32 {
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}

/// One row of the price summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum LineItem {
    /// One night of the stay, keyed by the calendar day it starts on.
    Night {
        /// The day the night starts on.
        date: NaiveDate,
        /// Whether it was billed at the weekend rate.
        kind: DayKind,
        /// The room rate for that night.
        amount: Money,
    },
    /// Extra guests surcharge.
    ExtraGuests {
        /// Number of extra guests.
        count: u32,
        /// Fee per extra guest.
        unit: Money,
        /// Nights multiplied in, when billed per night.
        nights: Option<u32>,
        /// Total surcharge.
        amount: Money,
    },
    /// Extra bedding kits.
    ExtraKits {
        /// Number of kits.
        count: u32,
        /// Fee per kit.
        unit: Money,
        /// Nights multiplied in, when billed per night.
        nights: Option<u32>,
        /// Total surcharge.
        amount: Money,
    },
    /// Pet fee.
    Pets {
        /// Number of pets.
        count: u32,
        /// Fee per pet per night.
        unit: Money,
        /// Number of nights.
        nights: u32,
        /// Total surcharge.
        amount: Money,
    },
    /// Grand total.
    Total {
        /// The total price of the stay.
        amount: Money,
    },
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Night { date, kind, amount } => write!(
                f,
                "{}: {} ({})",
                date.format("%d/%m/%Y"),
                Brl(*amount),
                kind.label()
            ),
            Self::ExtraGuests {
                count,
                unit,
                nights,
                amount,
            } => match nights {
                None => write!(f, "Hóspedes extras ({count}): {}", Brl(*amount)),
                Some(n) => write!(
                    f,
                    "Hóspedes extras: {count} x {} x {n} noites = {}",
                    Brl(*unit),
                    Brl(*amount)
                ),
            },
            Self::ExtraKits {
                count,
                unit,
                nights,
                amount,
            } => match nights {
                None => write!(f, "Kits extras ({count}): {}", Brl(*amount)),
                Some(n) => write!(
                    f,
                    "Kits extras: {count} x {} x {n} noites = {}",
                    Brl(*unit),
                    Brl(*amount)
                ),
            },
            Self::Pets {
                count,
                unit,
                nights,
                amount,
            } => write!(
                f,
                "Taxa para {count} pet(s): {} x {nights} noites = {}",
                Brl(Money::from(*count) * unit),
                Brl(*amount)
            ),
            Self::Total { amount } => write!(f, "Total: {}", Brl(*amount)),
        }
    }
}

/// Itemized price of a stay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    /// Number of nights priced.
    pub nights: u32,
    /// Sum of the nightly room rates.
    pub base_price: Money,
    /// Extra guest surcharge.
    pub extra_guests_fee: Money,
    /// Extra kit surcharge.
    pub extra_kit_fee: Money,
    /// Pet surcharge, zero when no pets are declared.
    pub pet_fee: Money,
    /// Sum of all of the above.
    pub total: Money,
    /// Ordered summary rows: nights, extras, then the total.
    pub line_items: Vec<LineItem>,
}

impl PriceBreakdown {
    /// The line items rendered as human-readable strings.
    #[must_use]
    pub fn details(&self) -> Vec<String> {
        self.line_items.iter().map(ToString::to_string).collect()
    }
}

/// Preconditions the calculator needs before it can price anything.
///
/// These are distinct from field validation: they signal that the caller
/// asked for a quote too early, not that the guest typed something wrong.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuoteError {
    /// Check-in or check-out is missing.
    #[error("Datas de check-in e check-out são necessárias")]
    MissingDates,

    /// No room type was chosen.
    #[error("Tipo de quarto é obrigatório")]
    MissingRoomType,
}

/// Number of nights between two dates.
///
/// Dates have calendar-day granularity, so this is the whole number of days
/// between them. Inverted ranges have no nights.
#[must_use]
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    u32::try_from((check_out - check_in).num_days().max(0)).unwrap_or(u32::MAX)
}

/// Prices a stay.
///
/// # Errors
///
/// Returns a [`QuoteError`] if either date or the room type is missing.
pub fn quote(input: &QuoteInput, tariff: &Tariff) -> Result<PriceBreakdown, QuoteError> {
    let (Some(check_in), Some(check_out)) = (input.check_in, input.check_out) else {
        return Err(QuoteError::MissingDates);
    };
    let room_type = input.room_type.ok_or(QuoteError::MissingRoomType)?;

    let nights = nights(check_in, check_out);
    let rate = tariff.nightly_rate(room_type);

    let mut line_items = Vec::new();
    let mut base_price = 0.0;
    for date in check_in.iter_days().take(nights as usize) {
        let kind = tariff.classify(date);
        let amount = rate.for_day(kind);
        base_price += amount;
        line_items.push(LineItem::Night { date, kind, amount });
    }

    let extras_nights = match tariff.extras_policy {
        ExtrasPolicy::PerStay => None,
        ExtrasPolicy::PerNight => Some(nights),
    };
    let extras_multiplier = Money::from(extras_nights.unwrap_or(1));

    let extra_guests_fee = Money::from(input.extra_guests) * tariff.extra_guest * extras_multiplier;
    if input.extra_guests > 0 {
        line_items.push(LineItem::ExtraGuests {
            count: input.extra_guests,
            unit: tariff.extra_guest,
            nights: extras_nights,
            amount: extra_guests_fee,
        });
    }

    let extra_kit_fee = Money::from(input.extra_kits) * tariff.extra_kit * extras_multiplier;
    if input.extra_kits > 0 {
        line_items.push(LineItem::ExtraKits {
            count: input.extra_kits,
            unit: tariff.extra_kit,
            nights: extras_nights,
            amount: extra_kit_fee,
        });
    }

    let pet_fee = Money::from(input.pets) * tariff.pet_per_night * Money::from(nights);
    if input.pets > 0 {
        line_items.push(LineItem::Pets {
            count: input.pets,
            unit: tariff.pet_per_night,
            nights,
            amount: pet_fee,
        });
    }

    let total = base_price + extra_guests_fee + extra_kit_fee + pet_fee;
    line_items.push(LineItem::Total { amount: total });

    tracing::debug!(%room_type, nights, total, "computed quote");

    Ok(PriceBreakdown {
        nights,
        base_price,
        extra_guests_fee,
        extra_kit_fee,
        pet_fee,
        total,
        line_items,
    })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn input(room_type: RoomType, check_in: &str, check_out: &str) -> QuoteInput {
        QuoteInput {
            room_type: Some(room_type),
            check_in: Some(date(check_in)),
            check_out: Some(date(check_out)),
            ..QuoteInput::default()
        }
    }

    #[test]
    fn missing_dates_is_a_precondition_failure() {
        let tariff = Tariff::default();
        let mut partial = input(RoomType::ThreePerson, "2024-06-10", "2024-06-11");
        partial.check_out = None;
        assert_eq!(quote(&partial, &tariff), Err(QuoteError::MissingDates));

        partial.check_in = None;
        partial.check_out = Some(date("2024-06-11"));
        assert_eq!(quote(&partial, &tariff), Err(QuoteError::MissingDates));
    }

    #[test]
    fn missing_room_type_is_a_precondition_failure() {
        let mut partial = input(RoomType::ThreePerson, "2024-06-10", "2024-06-11");
        partial.room_type = None;
        assert_eq!(
            quote(&partial, &Tariff::default()),
            Err(QuoteError::MissingRoomType)
        );
    }

    // 2024-06-08 is a Saturday, 2024-06-10 a Monday.
    #[test_case(RoomType::ThreePerson, "2024-06-08", 300.0; "three person saturday")]
    #[test_case(RoomType::ThreePerson, "2024-06-09", 300.0; "three person sunday")]
    #[test_case(RoomType::ThreePerson, "2024-06-10", 100.0; "three person monday")]
    #[test_case(RoomType::FourPerson, "2024-06-08", 400.0; "four person saturday")]
    #[test_case(RoomType::FourPerson, "2024-06-07", 150.0; "four person friday")]
    fn single_night_uses_day_rate(room_type: RoomType, check_in: &str, expected: Money) {
        let check_in = date(check_in);
        let check_out = check_in.succ_opt().unwrap();
        let breakdown = quote(
            &QuoteInput {
                room_type: Some(room_type),
                check_in: Some(check_in),
                check_out: Some(check_out),
                ..QuoteInput::default()
            },
            &Tariff::default(),
        )
        .unwrap();

        assert_eq!(breakdown.nights, 1);
        assert_eq!(breakdown.base_price, expected);
        assert_eq!(breakdown.total, expected);
    }

    #[test]
    fn friday_to_sunday_with_one_extra_guest() {
        let mut request = input(RoomType::FourPerson, "2024-06-07", "2024-06-09");
        request.extra_guests = 1;

        let breakdown = quote(&request, &Tariff::default()).unwrap();

        // Friday is a weekday night, Saturday a weekend night.
        assert_eq!(breakdown.nights, 2);
        assert_eq!(breakdown.base_price, 550.0);
        assert_eq!(breakdown.extra_guests_fee, 70.0);
        assert_eq!(breakdown.total, 620.0);
    }

    #[test]
    fn friday_counts_as_weekend_when_configured() {
        let tariff = Tariff {
            weekend_days: vec![Weekday::Fri, Weekday::Sat],
            ..Tariff::default()
        };
        let mut request = input(RoomType::FourPerson, "2024-06-07", "2024-06-09");
        request.extra_guests = 1;

        let breakdown = quote(&request, &tariff).unwrap();

        assert_eq!(breakdown.base_price, 800.0);
        assert_eq!(breakdown.extra_guests_fee, 70.0);
        assert_eq!(breakdown.total, 870.0);
    }

    #[test]
    fn extras_are_flat_per_stay_by_default() {
        let mut request = input(RoomType::ThreePerson, "2024-06-10", "2024-06-13");
        request.extra_guests = 2;
        request.extra_kits = 1;

        let breakdown = quote(&request, &Tariff::default()).unwrap();

        assert_eq!(breakdown.nights, 3);
        assert_eq!(breakdown.extra_guests_fee, 140.0);
        assert_eq!(breakdown.extra_kit_fee, 30.0);
    }

    #[test]
    fn extras_scale_with_nights_when_billed_per_night() {
        let tariff = Tariff {
            extras_policy: ExtrasPolicy::PerNight,
            ..Tariff::default()
        };
        let mut request = input(RoomType::ThreePerson, "2024-06-10", "2024-06-13");
        request.extra_guests = 2;
        request.extra_kits = 1;

        let breakdown = quote(&request, &tariff).unwrap();

        assert_eq!(breakdown.extra_guests_fee, 420.0);
        assert_eq!(breakdown.extra_kit_fee, 90.0);
        assert_eq!(
            breakdown.line_items[3].to_string(),
            "Hóspedes extras: 2 x R$ 70.00 x 3 noites = R$ 420.00"
        );
    }

    #[test]
    fn pet_fee_is_per_pet_per_night() {
        let mut request = input(RoomType::ThreePerson, "2024-06-10", "2024-06-12");
        request.pets = 2;

        let breakdown = quote(&request, &Tariff::default()).unwrap();

        assert_eq!(breakdown.pet_fee, 200.0);
        assert_eq!(breakdown.total, 400.0);
    }

    #[test]
    fn total_is_sum_of_components() {
        let mut request = input(RoomType::FourPerson, "2024-06-05", "2024-06-12");
        request.extra_guests = 3;
        request.extra_kits = 2;
        request.pets = 1;

        let breakdown = quote(&request, &Tariff::default()).unwrap();

        assert_eq!(
            breakdown.total,
            breakdown.base_price
                + breakdown.extra_guests_fee
                + breakdown.extra_kit_fee
                + breakdown.pet_fee
        );
    }

    #[test]
    fn quoting_is_idempotent() {
        let mut request = input(RoomType::FourPerson, "2024-06-05", "2024-06-12");
        request.extra_kits = 1;
        request.pets = 1;
        let tariff = Tariff::default();

        assert_eq!(
            quote(&request, &tariff).unwrap(),
            quote(&request, &tariff).unwrap()
        );
    }

    #[test]
    fn line_items_are_ordered_nights_extras_total() {
        let mut request = input(RoomType::ThreePerson, "2024-06-07", "2024-06-09");
        request.extra_guests = 1;
        request.extra_kits = 1;
        request.pets = 1;

        let details = quote(&request, &Tariff::default()).unwrap().details();

        assert_eq!(
            details,
            vec![
                "07/06/2024: R$ 100.00 (dia útil)",
                "08/06/2024: R$ 300.00 (final de semana)",
                "Hóspedes extras (1): R$ 70.00",
                "Kits extras (1): R$ 30.00",
                "Taxa para 1 pet(s): R$ 50.00 x 2 noites = R$ 100.00",
                "Total: R$ 600.00",
            ]
        );
    }

    #[test_case("2024-06-10", "2024-06-11", 1; "one night")]
    #[test_case("2024-06-10", "2024-06-17", 7; "one week")]
    #[test_case("2024-02-28", "2024-03-01", 2; "leap day")]
    #[test_case("2024-06-10", "2024-06-10", 0; "same day")]
    #[test_case("2024-06-10", "2024-06-08", 0; "inverted")]
    fn counts_nights(check_in: &str, check_out: &str, expected: u32) {
        assert_eq!(nights(date(check_in), date(check_out)), expected);
    }

    #[test]
    fn formats_reais_with_two_decimals() {
        assert_eq!(Brl(870.0).to_string(), "R$ 870.00");
        assert_eq!(Brl(12.346).to_string(), "R$ 12.35");
    }
}
