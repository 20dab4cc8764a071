//! Visibility thresholds.
//!
//! A threshold is the fraction of an element's area that must be inside the
//! viewport for the element to count as visible. Users supply it as an integer
//! percentage in `[0, 100]`; the observer consumes the fractional ratio.
//!
//! Invalid per-use arguments never fail a mount. [`resolve`] falls back to the
//! installation default and emits a warning naming the rejected value.

use thiserror::Error;

/// Largest accepted percentage.
pub const MAX_PERCENT: u8 = 100;

/// A validated visibility threshold.
///
/// Stored as the integer percentage, so two thresholds are equal exactly when
/// their [`ratio`](Self::ratio) values are equal. This makes the type usable as
/// a cache key for shared observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Threshold(u8);

impl Threshold {
	/// Threshold that fires as soon as a single pixel is visible.
	pub const ANY_PIXEL: Self = Self(0);

	/// Threshold that fires only when the element is fully visible.
	pub const FULLY_VISIBLE: Self = Self(MAX_PERCENT);

	/// Creates a threshold from an integer percentage.
	///
	/// # Errors
	///
	/// Returns [`ThresholdError::OutOfBounds`] if `percent` is greater than 100.
	pub fn from_percent(percent: u8) -> Result<Self, ThresholdError> {
		if percent > MAX_PERCENT {
			return Err(ThresholdError::OutOfBounds(percent.to_string()));
		}
		Ok(Self(percent))
	}

	/// Parses a percentage argument such as `"50"`.
	///
	/// Leading whitespace and an optional sign are skipped, then the leading run
	/// of digits is read and anything after it is ignored. `"50%"` reads as 50,
	/// `"25px"` as 25 and `"0.5"` as 0.
	///
	/// # Errors
	///
	/// Returns [`ThresholdError::NotANumber`] when `raw` does not start with an
	/// integer and [`ThresholdError::OutOfBounds`] when the integer lies outside
	/// `[0, 100]`. Both carry `raw` as supplied.
	pub fn parse(raw: &str) -> Result<Self, ThresholdError> {
		let trimmed = raw.trim_start();
		let (negative, unsigned) = match trimmed.as_bytes().first() {
			Some(b'-') => (true, &trimmed[1..]),
			Some(b'+') => (false, &trimmed[1..]),
			_ => (false, trimmed),
		};
		let digit_count = unsigned.bytes().take_while(|b| b.is_ascii_digit()).count();
		if digit_count == 0 {
			return Err(ThresholdError::NotANumber(raw.to_string()));
		}

		// Overlong digit runs fail to parse and land out of bounds.
		unsigned[..digit_count]
			.parse::<u8>()
			.ok()
			.filter(|percent| *percent <= MAX_PERCENT && (!negative || *percent == 0))
			.map(Self)
			.ok_or_else(|| ThresholdError::OutOfBounds(raw.to_string()))
	}

	/// Returns the integer percentage.
	pub fn percent(self) -> u8 {
		self.0
	}

	/// Returns the fractional ratio in `[0.0, 1.0]`.
	pub fn ratio(self) -> f64 {
		f64::from(self.0) / 100.0
	}
}

impl std::fmt::Display for Threshold {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}%", self.0)
	}
}

impl std::str::FromStr for Threshold {
	type Err = ThresholdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// Why a threshold argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdError {
	/// The argument does not start with an integer.
	#[error("'{0}' is not a number")]
	NotANumber(String),
	/// The argument starts with an integer outside `[0, 100]`.
	#[error("'{0}' is out of bounds [0, 100]")]
	OutOfBounds(String),
}

/// Outcome of resolving a per-use threshold argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
	/// The threshold the element will be observed with.
	pub threshold: Threshold,
	/// Set when the argument was rejected and `threshold` is the default.
	pub fallback: Option<ThresholdError>,
}

impl Resolution {
	/// Returns true if the default was used because the argument was invalid.
	pub fn fell_back(&self) -> bool {
		self.fallback.is_some()
	}
}

/// Resolves the threshold for one directive use and reports any fallback.
///
/// A missing or empty `argument` selects `default` without a diagnostic.
pub fn resolve_with_diagnostic(default: Threshold, argument: Option<&str>) -> Resolution {
	let Some(raw) = argument.filter(|raw| !raw.is_empty()) else {
		return Resolution {
			threshold: default,
			fallback: None,
		};
	};

	match Threshold::parse(raw) {
		Ok(threshold) => Resolution {
			threshold,
			fallback: None,
		},
		Err(error) => {
			crate::warn_log!(
				"Supplied threshold {}. Falling back to default threshold {}.",
				error,
				default.percent()
			);
			Resolution {
				threshold: default,
				fallback: Some(error),
			}
		}
	}
}

/// Resolves the threshold for one directive use.
///
/// Never fails: an invalid argument degrades to `default` with a warning.
///
/// # Example
///
/// ```
/// use reinhardt_element_in_view::threshold::{Threshold, resolve};
///
/// let default = Threshold::from_percent(10).unwrap();
/// assert_eq!(resolve(default, None).ratio(), 0.1);
/// assert_eq!(resolve(default, Some("50")).ratio(), 0.5);
/// assert_eq!(resolve(default, Some("150")).ratio(), 0.1);
/// ```
pub fn resolve(default: Threshold, argument: Option<&str>) -> Threshold {
	resolve_with_diagnostic(default, argument).threshold
}
