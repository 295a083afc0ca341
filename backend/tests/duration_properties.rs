mod support;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use proptest::prelude::*;

use platinum_tool::models::{Duration, Operation, Scale, ScalingPolicy};
use platinum_tool::services::duration::{calendar_delta, difference, shift};
use platinum_tool::services::scaling::scale_duration;

fn instant() -> impl Strategy<Value = NaiveDateTime> {
    (1900i32..2100, 1u32..=12, 1u32..=28, 0u32..24).prop_map(|(y, m, d, h)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    })
}

fn scale() -> impl Strategy<Value = Scale> {
    prop::sample::select(Scale::ALL.to_vec())
}

proptest! {
    #[test]
    fn difference_ignores_argument_order(a in instant(), b in instant(), scale in scale()) {
        prop_assert_eq!(difference(a, b, scale), difference(b, a, scale));
    }

    #[test]
    fn difference_of_same_instant_is_zero(a in instant(), scale in scale()) {
        prop_assert!(difference(a, a, scale).is_zero());
    }

    #[test]
    fn shifting_whole_days_round_trips(a in instant(), days in 0i64..20_000) {
        let later = shift(a, Scale::Days, days as f64, Operation::Add).unwrap();
        prop_assert_eq!(later - a, TimeDelta::days(days));
        prop_assert_eq!(
            difference(a, later, Scale::Days),
            Duration::Days { days, hours: 0 }
        );
        let back = shift(later, Scale::Days, days as f64, Operation::Subtract).unwrap();
        prop_assert_eq!(back, a);
    }

    #[test]
    fn shifting_whole_hours_round_trips(a in instant(), hours in 0i64..200_000) {
        let later = shift(a, Scale::Hours, hours as f64, Operation::Add).unwrap();
        prop_assert_eq!(difference(a, later, Scale::Hours), Duration::Hours { hours });
    }

    #[test]
    fn fractional_weeks_split_into_whole_weeks_and_days(a in instant(), weeks in 0.0f64..500.0) {
        let total_days = weeks * 7.0;
        // Keep clear of day boundaries so microsecond rounding cannot cross one.
        prop_assume!(total_days.fract() > 1e-6 && total_days.fract() < 1.0 - 1e-6);

        let later = shift(a, Scale::Weeks, weeks, Operation::Add).unwrap();
        match difference(a, later, Scale::Weeks) {
            Duration::Weeks { weeks: w, days } => {
                prop_assert!((0..7).contains(&days));
                prop_assert_eq!(w * 7 + days, (later - a).num_days());
                prop_assert_eq!(w * 7 + days, total_days.floor() as i64);
            }
            other => prop_assert!(false, "expected weeks, got {other:?}"),
        }
    }

    #[test]
    fn fractional_days_keep_microsecond_precision(a in instant(), days in 0.0f64..20_000.0) {
        let later = shift(a, Scale::Days, days, Operation::Add).unwrap();
        let micros = (later - a).num_microseconds().unwrap();
        let expected = (days * 86_400e6).round() as i64;
        prop_assert!((micros - expected).abs() <= 1, "{micros} vs {expected}");
    }

    #[test]
    fn shifting_months_from_early_days_round_trips(a in instant(), months in 0i64..1_200) {
        // Days 1..=28 never clamp, so the month count comes back exactly.
        let later = shift(a, Scale::Months, months as f64, Operation::Add).unwrap();
        prop_assert_eq!(
            difference(a, later, Scale::Months),
            Duration::Months { months, days: 0 }
        );
    }

    #[test]
    fn calendar_delta_days_stay_below_a_month(a in instant(), b in instant()) {
        let delta = calendar_delta(a, b);
        prop_assert!((0..31).contains(&delta.days));
        prop_assert!((0..12).contains(&delta.months));
        prop_assert!(delta.years >= 0);
    }

    #[test]
    fn direct_scaling_is_linear(base in 1i64..10_000, ratios in prop::collection::vec(0.01f64..1.0, 1..8)) {
        let scaled = scale_duration(base as f64, &ratios, ScalingPolicy::Direct).unwrap();
        prop_assert_eq!(scaled.len(), ratios.len());
        for (value, ratio) in scaled.iter().zip(&ratios) {
            prop_assert!((value - base as f64 * ratio).abs() < 1e-9);
        }
    }

    #[test]
    fn compounding_grows_with_ratios_above_one(base in 1i64..10_000, ratios in prop::collection::vec(1.01f64..3.0, 1..6)) {
        let scaled = scale_duration(base as f64, &ratios, ScalingPolicy::Compounding).unwrap();
        for pair in scaled.windows(2) {
            prop_assert!(pair[1] > pair[0]);
        }
    }
}

#[test]
fn test_month_end_difference_scenarios() {
    use support::date;

    assert_eq!(
        difference(date(2024, 1, 31), date(2024, 2, 28), Scale::Months),
        Duration::Months { months: 0, days: 28 }
    );
    assert_eq!(
        difference(date(2024, 1, 31), date(2024, 2, 29), Scale::Months),
        Duration::Months { months: 1, days: 0 }
    );
    assert_eq!(
        difference(date(2023, 1, 31), date(2023, 3, 1), Scale::Months),
        Duration::Months { months: 1, days: 1 }
    );
}
