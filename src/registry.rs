//! Shared observer registry.
//!
//! Elements that request the same threshold share one platform observer. The
//! registry creates observers lazily and keeps them for its own lifetime;
//! the set of distinct thresholds an application uses is small, so there is no
//! eviction.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::binding::BindingTable;
use crate::dispatch::dispatch_entries;
use crate::error::ElementInViewError;
use crate::observer::{ChangeHandler, IntersectionEntry, ObserverPlatform, ViewportObserver};
use crate::threshold::Threshold;

/// Threshold-keyed cache of shared observers plus the binding table their
/// change handlers consult.
pub struct ObserverRegistry<P: ObserverPlatform> {
	platform: P,
	observers: RefCell<HashMap<Threshold, Rc<P::Observer>>>,
	bindings: Rc<BindingTable>,
}

impl<P: ObserverPlatform> ObserverRegistry<P> {
	/// Creates an empty registry on top of `platform`.
	pub fn new(platform: P) -> Self {
		Self {
			platform,
			observers: RefCell::new(HashMap::new()),
			bindings: BindingTable::shared(),
		}
	}

	/// Returns the observer for `threshold`, creating it on first use.
	///
	/// # Errors
	///
	/// Propagates [`ElementInViewError::ObserverCreation`] from the platform.
	/// A failed creation is not cached, so a later call retries.
	pub fn get_or_create(
		&self,
		threshold: Threshold,
	) -> Result<Rc<P::Observer>, ElementInViewError> {
		if let Some(observer) = self.get(threshold) {
			return Ok(observer);
		}

		let observer = Rc::new(
			self.platform
				.create_observer(threshold, self.change_handler(threshold))?,
		);
		self.observers
			.borrow_mut()
			.insert(threshold, Rc::clone(&observer));
		crate::debug_log!("Created shared viewport observer for threshold {}", threshold);
		Ok(observer)
	}

	/// Returns the observer for `threshold` if one was created.
	pub fn get(&self, threshold: Threshold) -> Option<Rc<P::Observer>> {
		self.observers.borrow().get(&threshold).cloned()
	}

	/// Returns the number of shared observers created so far.
	pub fn observer_count(&self) -> usize {
		self.observers.borrow().len()
	}

	/// Returns the thresholds that have a shared observer, in ascending order.
	pub fn thresholds(&self) -> Vec<Threshold> {
		let mut thresholds: Vec<_> = self.observers.borrow().keys().copied().collect();
		thresholds.sort_unstable();
		thresholds
	}

	/// Returns the binding table consulted by every observer's handler.
	pub fn bindings(&self) -> &BindingTable {
		&self.bindings
	}

	/// Returns the platform the registry creates observers on.
	pub fn platform(&self) -> &P {
		&self.platform
	}

	fn change_handler(&self, threshold: Threshold) -> ChangeHandler<P::Target> {
		let bindings = Rc::clone(&self.bindings);
		Rc::new(
			move |entries: &[IntersectionEntry<P::Target>],
			      observer: &dyn ViewportObserver<P::Target>| {
				dispatch_entries(entries, &bindings, observer, threshold);
			},
		)
	}
}

impl<P: ObserverPlatform + std::fmt::Debug> std::fmt::Debug for ObserverRegistry<P> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ObserverRegistry")
			.field("platform", &self.platform)
			.field("thresholds", &self.thresholds())
			.field("bindings", &self.bindings.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MockPlatform;
	use rstest::rstest;

	fn pct(percent: u8) -> Threshold {
		Threshold::from_percent(percent).unwrap()
	}

	#[rstest]
	fn test_same_threshold_shares_observer() {
		let registry = ObserverRegistry::new(MockPlatform::new());

		let first = registry.get_or_create(pct(50)).unwrap();
		let second = registry.get_or_create(pct(50)).unwrap();

		assert!(Rc::ptr_eq(&first, &second));
		assert_eq!(registry.observer_count(), 1);
		assert_eq!(registry.platform().created(), 1);
	}

	#[rstest]
	fn test_distinct_thresholds_get_distinct_observers() {
		let registry = ObserverRegistry::new(MockPlatform::new());

		let low = registry.get_or_create(pct(10)).unwrap();
		let high = registry.get_or_create(pct(90)).unwrap();

		assert!(!Rc::ptr_eq(&low, &high));
		assert_eq!(low.threshold(), pct(10));
		assert_eq!(high.threshold(), pct(90));
		assert_eq!(registry.thresholds(), vec![pct(10), pct(90)]);
	}

	#[rstest]
	fn test_get_does_not_create() {
		let registry = ObserverRegistry::new(MockPlatform::new());

		assert!(registry.get(pct(10)).is_none());
		assert_eq!(registry.platform().created(), 0);
	}

	#[rstest]
	fn test_failed_creation_is_not_cached() {
		let registry = ObserverRegistry::new(MockPlatform::failing());

		let result = registry.get_or_create(pct(10));

		assert!(matches!(result, Err(ElementInViewError::ObserverCreation(_))));
		assert_eq!(registry.observer_count(), 0);

		registry.platform().set_failing(false);
		assert!(registry.get_or_create(pct(10)).is_ok());
		assert_eq!(registry.observer_count(), 1);
	}
}
