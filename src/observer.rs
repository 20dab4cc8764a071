//! Viewport observer abstraction.
//!
//! This is the seam between the directive and the platform's viewport
//! observation primitive. In the browser it is backed by
//! `IntersectionObserver` (see [`crate::platform`]); native builds use the
//! in-memory doubles from [`crate::testing`].
//!
//! The platform owns delivery: it calls the [`ChangeHandler`] with a finite,
//! ordered batch of entries and a reference to the observer that produced them,
//! so the handler can stop observing targets without holding the observer.

use std::rc::Rc;

use crate::element::ObservedElement;
use crate::error::ElementInViewError;
use crate::threshold::Threshold;

/// One change reported by a viewport observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionEntry<T> {
	/// The element whose visibility changed.
	pub target: T,
	/// Whether at least the configured threshold of the element is visible.
	pub is_intersecting: bool,
}

impl<T> IntersectionEntry<T> {
	/// Creates an entry reporting that `target` became visible.
	pub fn visible(target: T) -> Self {
		Self {
			target,
			is_intersecting: true,
		}
	}

	/// Creates an entry reporting that `target` left the viewport.
	pub fn hidden(target: T) -> Self {
		Self {
			target,
			is_intersecting: false,
		}
	}
}

/// Registration operations offered by a viewport observer.
pub trait ViewportObserver<T> {
	/// Starts reporting visibility changes for `target`.
	fn observe(&self, target: &T);

	/// Stops reporting visibility changes for `target`.
	///
	/// Unobserving a target that is not observed is a no-op.
	fn unobserve(&self, target: &T);
}

/// Callback invoked by the platform with each batch of changes.
pub type ChangeHandler<T> = Rc<dyn Fn(&[IntersectionEntry<T>], &dyn ViewportObserver<T>)>;

/// Factory for platform observers.
pub trait ObserverPlatform: 'static {
	/// Element type the platform can observe.
	type Target: ObservedElement;

	/// Observer handle produced by [`create_observer`](Self::create_observer).
	type Observer: ViewportObserver<Self::Target> + 'static;

	/// Creates an observer that reports crossings of `threshold` to `handler`.
	///
	/// # Errors
	///
	/// Returns [`ElementInViewError::ObserverCreation`] if the platform refuses
	/// to construct the observer.
	fn create_observer(
		&self,
		threshold: Threshold,
		handler: ChangeHandler<Self::Target>,
	) -> Result<Self::Observer, ElementInViewError>;
}
