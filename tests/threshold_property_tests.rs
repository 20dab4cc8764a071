//! Property-based tests for threshold resolution
//!
//! Uses proptest to verify:
//! 1. An absent argument always resolves to the default
//! 2. In-range integer arguments resolve to themselves
//! 3. Out-of-range and non-numeric arguments fall back with a reported reason
//! 4. Trailing text after a leading integer is ignored
//! 5. Resolved ratios always lie in [0, 1]

#![cfg(not(target_arch = "wasm32"))]

use proptest::prelude::*;
use reinhardt_element_in_view::{Threshold, ThresholdError, resolve, resolve_with_diagnostic};

fn default_threshold() -> impl Strategy<Value = Threshold> {
	(0u8..=100).prop_map(|percent| Threshold::from_percent(percent).unwrap())
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(200))]

	/// Property: no argument means the default, without a diagnostic
	#[test]
	fn test_absent_argument_resolves_to_default(default in default_threshold()) {
		let resolution = resolve_with_diagnostic(default, None);

		prop_assert_eq!(resolution.threshold, default);
		prop_assert_eq!(resolution.threshold.ratio(), f64::from(default.percent()) / 100.0);
		prop_assert!(resolution.fallback.is_none());
	}

	/// Property: a valid percentage overrides the default
	#[test]
	fn test_in_range_argument_wins(default in default_threshold(), value in 0u8..=100) {
		let resolved = resolve(default, Some(&value.to_string()));

		prop_assert_eq!(resolved.percent(), value);
		prop_assert_eq!(resolved.ratio(), f64::from(value) / 100.0);
	}

	/// Property: integers outside [0, 100] fall back and report the value
	#[test]
	fn test_out_of_range_argument_falls_back(
		default in default_threshold(),
		value in prop_oneof![i64::MIN..0i64, 101i64..=i64::MAX],
	) {
		let resolution = resolve_with_diagnostic(default, Some(&value.to_string()));

		prop_assert_eq!(resolution.threshold, default);
		prop_assert_eq!(
			resolution.fallback,
			Some(ThresholdError::OutOfBounds(value.to_string()))
		);
	}

	/// Property: strings that are not integers fall back and report the input
	#[test]
	fn test_non_numeric_argument_falls_back(
		default in default_threshold(),
		raw in "[a-zA-Z%.]{1,12}",
	) {
		let resolution = resolve_with_diagnostic(default, Some(&raw));

		prop_assert_eq!(resolution.threshold, default);
		prop_assert_eq!(resolution.fallback, Some(ThresholdError::NotANumber(raw.clone())));
	}

	/// Property: only the leading integer counts
	#[test]
	fn test_trailing_text_is_ignored(
		default in default_threshold(),
		value in 0u8..=100,
		suffix in "[a-zA-Z%. ][a-zA-Z0-9%. ]{0,8}",
	) {
		let resolution = resolve_with_diagnostic(default, Some(&format!("{value}{suffix}")));

		prop_assert_eq!(resolution.threshold.percent(), value);
		prop_assert!(resolution.fallback.is_none());
	}

	/// Property: whatever the input, the ratio stays within [0, 1]
	#[test]
	fn test_ratio_always_in_unit_interval(default in default_threshold(), raw in ".*") {
		let ratio = resolve(default, Some(&raw)).ratio();

		prop_assert!((0.0..=1.0).contains(&ratio));
	}
}
