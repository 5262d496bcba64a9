//! Smoking exposure in pack-years.
//!
//! `pack_years = (cigarettes_per_day / 20) * years`, rounded to one decimal place.
//!
//! The value is derived, not kept in sync: the smoking section only recomputes it when the
//! form asks for it (when either contributing field loses focus). See
//! [`crate::forms::social_history::SocialHistoryAction::RecalculatePackYears`].

use crate::constants::CIGARETTES_PER_PACK;
use crate::forms::social_history::UseStatus;

/// Compute pack-years, or `None` when there is nothing to compute.
///
/// No value is produced for never-smokers or when either the daily amount or the number of
/// years is zero.
pub fn pack_years(status: UseStatus, cigarettes_per_day: u32, years: u32) -> Option<f64> {
    if status == UseStatus::Never || cigarettes_per_day == 0 || years == 0 {
        return None;
    }
    let raw = (f64::from(cigarettes_per_day) / CIGARETTES_PER_PACK) * f64::from(years);
    Some(round_one_decimal(raw))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_pack_a_day_for_ten_years() {
        assert_eq!(pack_years(UseStatus::Current, 20, 10), Some(10.0));
    }

    #[test]
    fn rounds_to_one_decimal() {
        // 15 / 20 * 7 = 5.25
        assert_eq!(pack_years(UseStatus::Former, 15, 7), Some(5.3));
        // 25 / 20 * 3 = 3.75
        assert_eq!(pack_years(UseStatus::Current, 25, 3), Some(3.8));
        assert_eq!(pack_years(UseStatus::Current, 10, 3), Some(1.5));
    }

    #[test]
    fn no_value_without_exposure() {
        assert_eq!(pack_years(UseStatus::Current, 0, 10), None);
        assert_eq!(pack_years(UseStatus::Current, 20, 0), None);
        assert_eq!(pack_years(UseStatus::Never, 20, 10), None);
    }
}
