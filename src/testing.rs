//! In-memory observer doubles.
//!
//! These types stand in for the browser when the directive runs natively, in
//! unit tests and in host-framework tests that want to simulate scrolling.
//! A [`MockObserver`] remembers which elements it observes and delivers
//! simulated entry batches through the handler the registry gave it.
//!
//! ```
//! use reinhardt_element_in_view::testing::{MockElement, MockPlatform};
//! use reinhardt_element_in_view::{DirectiveBinding, ElementInView, ElementInViewConfig};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let directive =
//!     ElementInView::install(ElementInViewConfig::new(10), MockPlatform::new()).unwrap();
//! let element = MockElement::new();
//! let seen = Rc::new(Cell::new(false));
//!
//! directive
//!     .mount(&element, DirectiveBinding::new({
//!         let seen = seen.clone();
//!         move || seen.set(true)
//!     }))
//!     .unwrap();
//!
//! directive.observer_for(&element).unwrap().intersect(&element);
//! assert!(seen.get());
//! ```

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::element::{ElementId, ObservedElement};
use crate::error::ElementInViewError;
use crate::observer::{ChangeHandler, IntersectionEntry, ObserverPlatform, ViewportObserver};
use crate::threshold::Threshold;

static NEXT_MOCK_ID: AtomicU64 = AtomicU64::new(1);

/// A stand-in for a DOM element.
///
/// Every call to [`MockElement::new`] creates a distinct identity; clones share
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MockElement {
	id: ElementId,
}

impl MockElement {
	/// Creates an element with a fresh identity.
	pub fn new() -> Self {
		Self {
			id: ElementId::new(NEXT_MOCK_ID.fetch_add(1, Ordering::Relaxed)),
		}
	}
}

impl Default for MockElement {
	fn default() -> Self {
		Self::new()
	}
}

impl ObservedElement for MockElement {
	fn identity(&self) -> ElementId {
		self.id
	}
}

/// Platform that hands out [`MockObserver`]s.
#[derive(Debug, Default)]
pub struct MockPlatform {
	created: Cell<usize>,
	failing: Cell<bool>,
}

impl MockPlatform {
	/// Creates a platform that always succeeds.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a platform whose observer creation fails.
	pub fn failing() -> Self {
		let platform = Self::default();
		platform.failing.set(true);
		platform
	}

	/// Switches observer creation failures on or off.
	pub fn set_failing(&self, failing: bool) {
		self.failing.set(failing);
	}

	/// Returns how many observers were created.
	pub fn created(&self) -> usize {
		self.created.get()
	}
}

impl ObserverPlatform for MockPlatform {
	type Target = MockElement;
	type Observer = MockObserver;

	fn create_observer(
		&self,
		threshold: Threshold,
		handler: ChangeHandler<MockElement>,
	) -> Result<MockObserver, ElementInViewError> {
		if self.failing.get() {
			return Err(ElementInViewError::observer_creation(
				"mock platform configured to fail",
			));
		}
		self.created.set(self.created.get() + 1);
		Ok(MockObserver {
			threshold,
			handler,
			observed: RefCell::new(Vec::new()),
		})
	}
}

/// Observer created by [`MockPlatform`].
pub struct MockObserver {
	threshold: Threshold,
	handler: ChangeHandler<MockElement>,
	observed: RefCell<Vec<ElementId>>,
}

impl MockObserver {
	/// Returns the threshold the observer was created with.
	pub fn threshold(&self) -> Threshold {
		self.threshold
	}

	/// Returns true if `element` is currently observed.
	pub fn is_observing(&self, element: &MockElement) -> bool {
		self.observed.borrow().contains(&element.identity())
	}

	/// Returns the number of observed elements.
	pub fn observed_count(&self) -> usize {
		self.observed.borrow().len()
	}

	/// Delivers a batch of entries to the change handler, as the browser would.
	pub fn deliver(&self, entries: &[IntersectionEntry<MockElement>]) {
		(self.handler)(entries, self);
	}

	/// Delivers a single "became visible" entry for `element`.
	pub fn intersect(&self, element: &MockElement) {
		self.deliver(&[IntersectionEntry::visible(element.clone())]);
	}

	/// Delivers a single "left the viewport" entry for `element`.
	pub fn leave(&self, element: &MockElement) {
		self.deliver(&[IntersectionEntry::hidden(element.clone())]);
	}
}

impl ViewportObserver<MockElement> for MockObserver {
	fn observe(&self, target: &MockElement) {
		let id = target.identity();
		let mut observed = self.observed.borrow_mut();
		if !observed.contains(&id) {
			observed.push(id);
		}
	}

	fn unobserve(&self, target: &MockElement) {
		let id = target.identity();
		self.observed.borrow_mut().retain(|observed| *observed != id);
	}
}

impl std::fmt::Debug for MockObserver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MockObserver")
			.field("threshold", &self.threshold)
			.field("observed", &self.observed.borrow())
			.finish()
	}
}

/// Observer that only records calls, for driving the dispatcher directly.
#[derive(Debug, Default)]
pub struct RecordingObserver {
	observed: RefCell<Vec<ElementId>>,
	unobserved: RefCell<Vec<ElementId>>,
}

impl RecordingObserver {
	/// Returns the identities passed to `observe`, in call order.
	pub fn observed(&self) -> Vec<ElementId> {
		self.observed.borrow().clone()
	}

	/// Returns the identities passed to `unobserve`, in call order.
	pub fn unobserved(&self) -> Vec<ElementId> {
		self.unobserved.borrow().clone()
	}
}

impl<T: ObservedElement> ViewportObserver<T> for RecordingObserver {
	fn observe(&self, target: &T) {
		self.observed.borrow_mut().push(target.identity());
	}

	fn unobserve(&self, target: &T) {
		self.unobserved.borrow_mut().push(target.identity());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::rc::Rc;

	fn noop_handler() -> ChangeHandler<MockElement> {
		Rc::new(
			|_: &[IntersectionEntry<MockElement>], _: &dyn ViewportObserver<MockElement>| {},
		)
	}

	#[rstest]
	fn test_mock_elements_have_distinct_identities() {
		let first = MockElement::new();
		let second = MockElement::new();

		assert_ne!(first.identity(), second.identity());
		assert_eq!(first.clone().identity(), first.identity());
	}

	#[rstest]
	fn test_mock_observer_tracks_observation() {
		let platform = MockPlatform::new();
		let observer = platform
			.create_observer(Threshold::ANY_PIXEL, noop_handler())
			.unwrap();
		let element = MockElement::new();

		observer.observe(&element);
		observer.observe(&element);
		assert!(observer.is_observing(&element));
		assert_eq!(observer.observed_count(), 1);

		observer.unobserve(&element);
		assert!(!observer.is_observing(&element));
	}

	#[rstest]
	fn test_deliver_passes_batch_and_self_to_handler() {
		let platform = MockPlatform::new();
		let seen = Rc::new(RefCell::new(Vec::new()));
		let observer = platform
			.create_observer(
				Threshold::ANY_PIXEL,
				Rc::new({
					let seen = seen.clone();
					move |entries: &[IntersectionEntry<MockElement>],
					      observer: &dyn ViewportObserver<MockElement>| {
						for entry in entries {
							seen.borrow_mut().push(entry.is_intersecting);
							observer.unobserve(&entry.target);
						}
					}
				}),
			)
			.unwrap();
		let element = MockElement::new();
		observer.observe(&element);

		observer.deliver(&[
			IntersectionEntry::visible(element.clone()),
			IntersectionEntry::hidden(element.clone()),
		]);

		assert_eq!(*seen.borrow(), vec![true, false]);
		assert!(!observer.is_observing(&element));
	}

	#[rstest]
	fn test_failing_platform() {
		let platform = MockPlatform::failing();
		let result = platform.create_observer(Threshold::ANY_PIXEL, noop_handler());

		assert!(result.is_err());
		assert_eq!(platform.created(), 0);
	}
}
