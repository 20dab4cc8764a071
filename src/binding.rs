//! Element binding table.
//!
//! Associates each observed element with the behavior it registered on mount:
//! the callback to run and whether to stop after the first run. Entries are
//! keyed by [`ElementId`] and never own the element.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::element::{ElementId, ObservedElement};
use crate::threshold::Threshold;

/// A cloneable zero-argument action run when an element becomes visible.
///
/// Cloning shares the underlying closure.
#[derive(Clone)]
pub struct VisibilityCallback {
	inner: Rc<dyn Fn() + 'static>,
}

impl VisibilityCallback {
	/// Wraps a closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn() + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Runs the callback.
	pub fn call(&self) {
		(self.inner)()
	}

	/// Returns true if both callbacks share the same closure.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl<F> From<F> for VisibilityCallback
where
	F: Fn() + 'static,
{
	fn from(f: F) -> Self {
		Self::new(f)
	}
}

impl std::fmt::Debug for VisibilityCallback {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("VisibilityCallback")
			.field("inner", &"<function>")
			.finish()
	}
}

/// What to do when an element becomes visible.
#[derive(Debug, Clone)]
pub struct Behavior {
	/// The action to run.
	pub callback: VisibilityCallback,
	/// Stop observing after the first run.
	pub once: bool,
	/// Threshold of the shared observer the element is registered with.
	pub threshold: Threshold,
}

impl Behavior {
	/// Creates a behavior that runs on every crossing.
	pub fn new(callback: impl Into<VisibilityCallback>, threshold: Threshold) -> Self {
		Self {
			callback: callback.into(),
			once: false,
			threshold,
		}
	}

	/// Sets the once option.
	pub fn once(mut self, once: bool) -> Self {
		self.once = once;
		self
	}
}

/// Identity-keyed table of registered behaviors.
///
/// A record lives until it is removed: by [`remove`](Self::remove), or by
/// [`take_for_dispatch`](Self::take_for_dispatch) for `once` behaviors. The
/// table never sees element destruction, so a repeating behavior whose element
/// is dropped without being removed keeps its callback, and everything the
/// callback captured, alive.
///
/// Interior mutability lets the table be shared between the directive and
/// every observer's change handler on the single UI thread. No borrow is held
/// across a callback invocation.
#[derive(Debug, Default)]
pub struct BindingTable {
	entries: RefCell<HashMap<ElementId, Behavior>>,
}

impl BindingTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty, shareable table.
	pub fn shared() -> Rc<Self> {
		Rc::new(Self::new())
	}

	/// Records `behavior` for `element`, returning the behavior it replaced.
	pub fn set<E: ObservedElement>(&self, element: &E, behavior: Behavior) -> Option<Behavior> {
		self.entries
			.borrow_mut()
			.insert(element.identity(), behavior)
	}

	/// Returns a copy of the behavior recorded for `element`.
	pub fn get<E: ObservedElement>(&self, element: &E) -> Option<Behavior> {
		self.get_by_id(element.identity())
	}

	/// Returns a copy of the behavior recorded under `id`.
	pub fn get_by_id(&self, id: ElementId) -> Option<Behavior> {
		self.entries.borrow().get(&id).cloned()
	}

	/// Removes and returns the behavior recorded for `element`.
	pub fn remove<E: ObservedElement>(&self, element: &E) -> Option<Behavior> {
		self.entries.borrow_mut().remove(&element.identity())
	}

	/// Reads the behavior `element` registered at `threshold`, removing it in
	/// the same step when it is a `once` behavior.
	///
	/// Returns `None` if nothing is recorded or the element is registered at a
	/// different threshold. A mismatched record is left untouched.
	pub fn take_for_dispatch<E: ObservedElement>(
		&self,
		element: &E,
		threshold: Threshold,
	) -> Option<Behavior> {
		let mut entries = self.entries.borrow_mut();
		let id = element.identity();
		match entries.get(&id) {
			Some(behavior) if behavior.threshold != threshold => None,
			Some(behavior) if behavior.once => entries.remove(&id),
			Some(behavior) => Some(behavior.clone()),
			None => None,
		}
	}

	/// Returns true if a behavior is recorded for `element`.
	pub fn contains<E: ObservedElement>(&self, element: &E) -> bool {
		self.entries.borrow().contains_key(&element.identity())
	}

	/// Returns the number of tracked elements.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Returns true if no element is tracked.
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MockElement;
	use rstest::rstest;
	use std::cell::Cell;

	fn noop() -> VisibilityCallback {
		VisibilityCallback::new(|| {})
	}

	#[rstest]
	fn test_set_get_remove() {
		let table = BindingTable::new();
		let element = MockElement::new();

		assert!(table.set(&element, Behavior::new(noop(), Threshold::ANY_PIXEL)).is_none());
		assert!(table.contains(&element));
		assert_eq!(table.len(), 1);

		let removed = table.remove(&element).unwrap();
		assert_eq!(removed.threshold, Threshold::ANY_PIXEL);
		assert!(table.is_empty());
		assert!(table.get(&element).is_none());
	}

	#[rstest]
	fn test_keyed_by_identity_not_value() {
		let table = BindingTable::new();
		let first = MockElement::new();
		let second = MockElement::new();
		let first_again = first.clone();

		table.set(&first, Behavior::new(noop(), Threshold::ANY_PIXEL));

		assert!(table.contains(&first_again));
		assert!(!table.contains(&second));
	}

	#[rstest]
	fn test_set_replaces_previous_behavior() {
		let table = BindingTable::new();
		let element = MockElement::new();
		table.set(&element, Behavior::new(noop(), Threshold::ANY_PIXEL));

		let replaced = table
			.set(
				&element,
				Behavior::new(noop(), Threshold::FULLY_VISIBLE).once(true),
			)
			.unwrap();

		assert_eq!(replaced.threshold, Threshold::ANY_PIXEL);
		assert!(table.get(&element).unwrap().once);
		assert_eq!(table.len(), 1);
	}

	#[rstest]
	fn test_take_for_dispatch_keeps_repeating_behavior() {
		let table = BindingTable::new();
		let element = MockElement::new();
		table.set(&element, Behavior::new(noop(), Threshold::ANY_PIXEL));

		assert!(table.take_for_dispatch(&element, Threshold::ANY_PIXEL).is_some());
		assert!(table.contains(&element));
	}

	#[rstest]
	fn test_take_for_dispatch_removes_once_behavior() {
		let table = BindingTable::new();
		let element = MockElement::new();
		table.set(&element, Behavior::new(noop(), Threshold::ANY_PIXEL).once(true));

		assert!(table.take_for_dispatch(&element, Threshold::ANY_PIXEL).is_some());
		assert!(!table.contains(&element));
		assert!(table.take_for_dispatch(&element, Threshold::ANY_PIXEL).is_none());
	}

	#[rstest]
	fn test_take_for_dispatch_skips_other_threshold() {
		let table = BindingTable::new();
		let element = MockElement::new();
		table.set(&element, Behavior::new(noop(), Threshold::FULLY_VISIBLE).once(true));

		assert!(table.take_for_dispatch(&element, Threshold::ANY_PIXEL).is_none());
		assert!(table.contains(&element));
		assert!(table.take_for_dispatch(&element, Threshold::FULLY_VISIBLE).is_some());
	}

	#[rstest]
	fn test_callback_clone_shares_closure() {
		let hits = Rc::new(Cell::new(0));
		let callback = VisibilityCallback::new({
			let hits = hits.clone();
			move || hits.set(hits.get() + 1)
		});
		let clone = callback.clone();

		callback.call();
		clone.call();

		assert!(callback.ptr_eq(&clone));
		assert_eq!(hits.get(), 2);
	}
}
