//! Install-time configuration.
//!
//! ```
//! use reinhardt_element_in_view::ElementInViewConfig;
//!
//! let config = ElementInViewConfig::from_json(r#"{ "threshold": 10 }"#).unwrap();
//! assert_eq!(config.threshold, 10);
//! assert!(!config.ssr);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::threshold::Threshold;

/// Options passed when installing the directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElementInViewConfig {
	/// Default threshold percentage, used when a binding has no argument or an
	/// invalid one.
	pub threshold: u8,
	/// Install the server-rendering stub instead of the live directive.
	pub ssr: bool,
}

impl ElementInViewConfig {
	/// Creates a client-side configuration with the given default percentage.
	pub fn new(threshold: u8) -> Self {
		Self {
			threshold,
			ssr: false,
		}
	}

	/// Creates a server-rendering configuration.
	pub fn server() -> Self {
		Self {
			threshold: 0,
			ssr: true,
		}
	}

	/// Sets the default threshold percentage.
	pub fn threshold(mut self, threshold: u8) -> Self {
		self.threshold = threshold;
		self
	}

	/// Sets the ssr option.
	pub fn ssr(mut self, ssr: bool) -> Self {
		self.ssr = ssr;
		self
	}

	/// Parses a configuration from JSON.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::Parse`] for malformed JSON or unknown keys and
	/// [`ConfigError::ThresholdOutOfBounds`] for a default above 100.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: Self =
			serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}

	/// Checks that the default threshold is a valid percentage.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::ThresholdOutOfBounds`] for a default above 100.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.default_threshold().map(|_| ())
	}

	/// Returns the validated default threshold.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::ThresholdOutOfBounds`] for a default above 100.
	pub fn default_threshold(&self) -> Result<Threshold, ConfigError> {
		Threshold::from_percent(self.threshold)
			.map_err(|_| ConfigError::ThresholdOutOfBounds(self.threshold))
	}
}

/// Invalid install-time configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	/// The default threshold is above 100.
	#[error("default threshold {0} is out of bounds [0, 100]")]
	ThresholdOutOfBounds(u8),
	/// The configuration could not be parsed.
	#[error("failed to parse configuration: {0}")]
	Parse(String),
}
