//! Browser platform backed by `IntersectionObserver`.
//!
//! Only compiled for `wasm32`. Each [`WebObserver`] owns the JS closure the
//! browser calls with entry batches, so the closure lives exactly as long as
//! the observer.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::ElementInViewError;
use crate::observer::{ChangeHandler, IntersectionEntry, ObserverPlatform, ViewportObserver};
use crate::threshold::Threshold;

type JsChangeCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Creates `IntersectionObserver`s in the current document.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebPlatform;

impl WebPlatform {
	/// Creates the browser platform.
	pub fn new() -> Self {
		Self
	}
}

impl ObserverPlatform for WebPlatform {
	type Target = Element;
	type Observer = WebObserver;

	fn create_observer(
		&self,
		threshold: Threshold,
		handler: ChangeHandler<Element>,
	) -> Result<WebObserver, ElementInViewError> {
		let callback: JsChangeCallback = Closure::new(
			move |entries: js_sys::Array, observer: IntersectionObserver| {
				let batch: Vec<IntersectionEntry<Element>> = entries
					.iter()
					.filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
					.map(|entry| IntersectionEntry {
						target: entry.target(),
						is_intersecting: entry.is_intersecting(),
					})
					.collect();
				handler(&batch, &observer);
			},
		);

		let options = IntersectionObserverInit::new();
		options.set_threshold(&JsValue::from_f64(threshold.ratio()));

		let inner =
			IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
				.map_err(|e| ElementInViewError::observer_creation(format!("{:?}", e)))?;

		Ok(WebObserver {
			inner,
			_callback: callback,
		})
	}
}

/// A shared `IntersectionObserver` and the closure it reports to.
#[derive(Debug)]
pub struct WebObserver {
	inner: IntersectionObserver,
	_callback: JsChangeCallback,
}

impl WebObserver {
	/// Returns the underlying browser observer.
	pub fn as_js(&self) -> &IntersectionObserver {
		&self.inner
	}
}

impl ViewportObserver<Element> for WebObserver {
	fn observe(&self, target: &Element) {
		self.inner.observe(target);
	}

	fn unobserve(&self, target: &Element) {
		self.inner.unobserve(target);
	}
}

impl ViewportObserver<Element> for IntersectionObserver {
	fn observe(&self, target: &Element) {
		IntersectionObserver::observe(self, target);
	}

	fn unobserve(&self, target: &Element) {
		IntersectionObserver::unobserve(self, target);
	}
}

impl Drop for WebObserver {
	fn drop(&mut self) {
		self.inner.disconnect();
	}
}
