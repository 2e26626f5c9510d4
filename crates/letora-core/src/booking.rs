// ── Booking fee computation ──
//
// Deterministic arithmetic over apartment price, stay duration, and
// deposit. Derived fields are only valid after `calculate_fees` runs;
// nothing recomputes automatically on field changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fixed platform convenience fee, in currency minor units.
pub const CONVENIENCE_FEE: u64 = 2_500;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Accumulated booking state plus derived fee fields.
///
/// `duration` is signed: date setting does not validate that checkout
/// follows checkin, so zero or negative durations flow through to
/// `calculate_fees`'s guard instead of erroring here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingData {
    pub apartment_id: Option<String>,
    pub apartment_price: u64,
    pub checkin_date: Option<DateTime<Utc>>,
    pub checkout_date: Option<DateTime<Utc>>,
    pub duration: i64,
    pub booking_fee: u64,
    pub security_deposit: u64,
    pub convenience_fee: u64,
    pub total_amount: u64,
    pub base_amount: Option<u64>,
}

/// Read-only projection of a booking for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub apartment_id: Option<String>,
    pub checkin_date: Option<DateTime<Utc>>,
    pub checkout_date: Option<DateTime<Utc>>,
    pub duration: i64,
    pub base_amount: u64,
    pub booking_fee: u64,
    pub convenience_fee: u64,
    pub security_deposit: u64,
    pub total_amount: u64,
}

/// Partial update for [`BookingData`]'s input fields. `None` fields
/// are left untouched. Derived fee fields are never patched directly;
/// callers re-run [`BookingData::calculate_fees`] after an update.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub apartment_id: Option<String>,
    pub apartment_price: Option<u64>,
    pub checkin_date: Option<DateTime<Utc>>,
    pub checkout_date: Option<DateTime<Utc>>,
    pub duration: Option<i64>,
    pub security_deposit: Option<u64>,
}

impl BookingData {
    /// Record the apartment being booked. Warns and leaves all state
    /// untouched if the id is empty or the price is zero.
    pub fn set_apartment_details(&mut self, apartment_id: &str, price: u64, deposit: u64) {
        if apartment_id.is_empty() || price == 0 {
            warn!(
                apartment_id,
                price, "ignoring apartment details with missing id or price"
            );
            return;
        }
        self.apartment_id = Some(apartment_id.to_owned());
        self.apartment_price = price;
        self.security_deposit = deposit;
    }

    /// Record the stay dates and derive `duration` in calendar days,
    /// rounding partial days up. Silently ignores the call unless both
    /// dates are present. Does not validate ordering: a checkout at or
    /// before checkin yields a non-positive duration.
    pub fn set_booking_dates(
        &mut self,
        checkin: Option<DateTime<Utc>>,
        checkout: Option<DateTime<Utc>>,
    ) {
        let (Some(checkin), Some(checkout)) = (checkin, checkout) else {
            return;
        };
        self.checkin_date = Some(checkin);
        self.checkout_date = Some(checkout);
        let millis = (checkout - checkin).num_milliseconds();
        // Ceiling division; `i64::div_ceil` is still unstable.
        self.duration = millis.div_euclid(MILLIS_PER_DAY)
            + i64::from(millis.rem_euclid(MILLIS_PER_DAY) != 0);
    }

    /// Merge a bulk patch onto the input fields. Unlike the setters,
    /// no field is validated here; the guards in `calculate_fees`
    /// absorb whatever lands.
    pub fn update(&mut self, patch: BookingPatch) {
        if let Some(v) = patch.apartment_id {
            self.apartment_id = Some(v);
        }
        if let Some(v) = patch.apartment_price {
            self.apartment_price = v;
        }
        if let Some(v) = patch.checkin_date {
            self.checkin_date = Some(v);
        }
        if let Some(v) = patch.checkout_date {
            self.checkout_date = Some(v);
        }
        if let Some(v) = patch.duration {
            self.duration = v;
        }
        if let Some(v) = patch.security_deposit {
            self.security_deposit = v;
        }
    }

    /// Recompute all derived fee fields from the current price,
    /// duration, and deposit. Idempotent. Leaves state completely
    /// unchanged when price is zero or duration is non-positive.
    pub fn calculate_fees(&mut self) {
        if self.apartment_price == 0 || self.duration <= 0 {
            return;
        }
        let days = self.duration.unsigned_abs();
        let base = self.apartment_price * days;
        self.base_amount = Some(base);
        self.booking_fee = base;
        self.convenience_fee = CONVENIENCE_FEE;
        self.total_amount = self.booking_fee + CONVENIENCE_FEE + self.security_deposit;
    }

    /// Projection for display. Falls back to `price * duration` for
    /// the base amount when `calculate_fees` hasn't run yet.
    pub fn summary(&self) -> BookingSummary {
        let fallback_base = if self.duration > 0 {
            self.apartment_price * self.duration.unsigned_abs()
        } else {
            0
        };
        BookingSummary {
            apartment_id: self.apartment_id.clone(),
            checkin_date: self.checkin_date,
            checkout_date: self.checkout_date,
            duration: self.duration,
            base_amount: self.base_amount.unwrap_or(fallback_base),
            booking_fee: self.booking_fee,
            convenience_fee: self.convenience_fee,
            security_deposit: self.security_deposit,
            total_amount: self.total_amount,
        }
    }

    /// Reset to the initial state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn fees_for_valid_price_and_days() {
        let mut booking = BookingData::default();
        booking.set_apartment_details("a1", 20_000, 5_000);
        booking.set_booking_dates(Some(utc(2025, 1, 1, 12)), Some(utc(2025, 1, 4, 12)));
        booking.calculate_fees();

        assert_eq!(booking.duration, 3);
        assert_eq!(booking.booking_fee, 60_000);
        assert_eq!(booking.convenience_fee, 2_500);
        assert_eq!(booking.total_amount, 67_500);
        assert_eq!(booking.base_amount, Some(60_000));
    }

    #[test]
    fn exact_24h_is_one_day_25h_is_two() {
        let mut booking = BookingData::default();
        booking.set_booking_dates(Some(utc(2025, 3, 1, 10)), Some(utc(2025, 3, 2, 10)));
        assert_eq!(booking.duration, 1);

        booking.set_booking_dates(Some(utc(2025, 3, 1, 10)), Some(utc(2025, 3, 2, 11)));
        assert_eq!(booking.duration, 2);
    }

    #[test]
    fn zero_price_or_duration_leaves_state_unchanged() {
        let mut booking = BookingData::default();
        booking.set_booking_dates(Some(utc(2025, 1, 1, 0)), Some(utc(2025, 1, 3, 0)));
        let before = booking.clone();
        booking.calculate_fees(); // price still 0
        assert_eq!(booking, before);

        let mut booking = BookingData::default();
        booking.set_apartment_details("a1", 10_000, 0);
        let before = booking.clone();
        booking.calculate_fees(); // duration still 0
        assert_eq!(booking, before);
    }

    #[test]
    fn negative_duration_flows_through_to_guard() {
        let mut booking = BookingData::default();
        booking.set_apartment_details("a1", 10_000, 0);
        booking.set_booking_dates(Some(utc(2025, 1, 5, 0)), Some(utc(2025, 1, 3, 0)));
        assert_eq!(booking.duration, -2);

        let before = booking.clone();
        booking.calculate_fees();
        assert_eq!(booking, before);
    }

    #[test]
    fn empty_id_or_zero_price_is_rejected() {
        let mut booking = BookingData::default();
        booking.set_apartment_details("", 10_000, 0);
        assert!(booking.apartment_id.is_none());

        booking.set_apartment_details("a1", 0, 500);
        assert!(booking.apartment_id.is_none());
        assert_eq!(booking.security_deposit, 0);
    }

    #[test]
    fn missing_date_is_ignored() {
        let mut booking = BookingData::default();
        booking.set_booking_dates(Some(utc(2025, 1, 1, 0)), None);
        assert!(booking.checkin_date.is_none());
        assert_eq!(booking.duration, 0);
    }

    #[test]
    fn calculate_fees_is_idempotent() {
        let mut booking = BookingData::default();
        booking.set_apartment_details("a1", 15_000, 1_000);
        booking.set_booking_dates(Some(utc(2025, 6, 1, 14)), Some(utc(2025, 6, 3, 14)));
        booking.calculate_fees();
        let first = booking.clone();
        booking.calculate_fees();
        assert_eq!(booking, first);
    }

    #[test]
    fn summary_falls_back_to_computed_base() {
        let mut booking = BookingData::default();
        booking.set_apartment_details("a1", 8_000, 0);
        booking.set_booking_dates(Some(utc(2025, 2, 1, 0)), Some(utc(2025, 2, 3, 0)));

        // No calculate_fees call yet.
        let summary = booking.summary();
        assert_eq!(summary.base_amount, 16_000);
        assert_eq!(summary.booking_fee, 0);
    }

    #[test]
    fn update_merges_only_present_fields() {
        let mut booking = BookingData::default();
        booking.set_apartment_details("a1", 20_000, 5_000);

        booking.update(BookingPatch {
            security_deposit: Some(2_000),
            duration: Some(4),
            ..BookingPatch::default()
        });

        assert_eq!(booking.apartment_id.as_deref(), Some("a1"));
        assert_eq!(booking.apartment_price, 20_000);
        assert_eq!(booking.security_deposit, 2_000);
        assert_eq!(booking.duration, 4);

        booking.calculate_fees();
        assert_eq!(booking.total_amount, 80_000 + 2_500 + 2_000);
    }

    #[test]
    fn empty_update_is_a_noop() {
        let mut booking = BookingData::default();
        booking.set_apartment_details("a1", 15_000, 1_000);
        booking.set_booking_dates(Some(utc(2025, 6, 1, 14)), Some(utc(2025, 6, 3, 14)));

        let before = booking.clone();
        booking.update(BookingPatch::default());
        assert_eq!(booking, before);
    }

    #[test]
    fn clear_resets_everything() {
        let mut booking = BookingData::default();
        booking.set_apartment_details("a1", 8_000, 500);
        booking.set_booking_dates(Some(utc(2025, 2, 1, 0)), Some(utc(2025, 2, 3, 0)));
        booking.calculate_fees();

        booking.clear();
        assert_eq!(booking, BookingData::default());
    }
}
