//! Error types for the element-in-view directive.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by directive installation and mounting.
///
/// Invalid threshold arguments are not errors: they fall back to the default
/// and are only reported through the log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementInViewError {
	/// The install-time configuration was rejected.
	#[error("invalid element-in-view configuration: {0}")]
	Config(#[from] ConfigError),
	/// The platform could not construct a viewport observer.
	#[error("failed to create viewport observer: {0}")]
	ObserverCreation(String),
}

impl ElementInViewError {
	/// Creates an observer creation error.
	pub fn observer_creation(msg: impl Into<String>) -> Self {
		Self::ObserverCreation(msg.into())
	}
}
