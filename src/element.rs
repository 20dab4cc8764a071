//! Element identity.
//!
//! The binding table is keyed by element identity rather than by value and
//! never holds the element itself. Each observable element type hands out a
//! stable [`ElementId`] for as long as it is alive.

/// Identity of an observed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
	/// Wraps a raw identity value.
	pub const fn new(raw: u64) -> Self {
		Self(raw)
	}

	/// Returns the raw identity value.
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl std::fmt::Display for ElementId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "element#{}", self.0)
	}
}

/// An element that can be handed to a viewport observer.
///
/// Two handles to the same underlying element must report the same identity,
/// and the identity must not be reused while the element is alive.
pub trait ObservedElement: Clone + 'static {
	/// Returns the identity of this element.
	fn identity(&self) -> ElementId;
}

#[cfg(target_arch = "wasm32")]
mod web {
	use std::cell::Cell;

	use wasm_bindgen::JsCast;

	use super::{ElementId, ObservedElement};

	thread_local! {
		// Weakly keyed so an id never keeps a detached element alive.
		static ELEMENT_IDS: js_sys::WeakMap = js_sys::WeakMap::new();
		static NEXT_ELEMENT_ID: Cell<u64> = const { Cell::new(1) };
	}

	impl ObservedElement for web_sys::Element {
		fn identity(&self) -> ElementId {
			let key: &js_sys::Object = self.unchecked_ref();
			ELEMENT_IDS.with(|ids| {
				if let Some(existing) = ids.get(key).as_f64() {
					return ElementId::new(existing as u64);
				}
				let id = NEXT_ELEMENT_ID.with(|next| {
					let id = next.get();
					next.set(id + 1);
					id
				});
				// f64 represents every id below 2^53 exactly.
				ids.set(key, &wasm_bindgen::JsValue::from_f64(id as f64));
				ElementId::new(id)
			})
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_element_id_round_trip() {
		let id = ElementId::new(7);
		assert_eq!(id.get(), 7);
		assert_eq!(id.to_string(), "element#7");
	}
}
