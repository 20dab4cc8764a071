//! Browser tests for the `IntersectionObserver` platform
//!
//! Run with:
//!   wasm-pack test --chrome --headless

#![cfg(target_arch = "wasm32")]

use gloo_timers::future::TimeoutFuture;
use reinhardt_element_in_view::{
	DirectiveBinding, ElementInView, ElementInViewConfig, ObservedElement, WebPlatform,
};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

fn visible_box() -> Element {
	let document = web_sys::window().unwrap().document().unwrap();
	let element = document.create_element("div").unwrap();
	element
		.set_attribute("style", "width: 50px; height: 50px;")
		.unwrap();
	document.body().unwrap().append_child(&element).unwrap();
	element
}

async fn wait_until(condition: impl Fn() -> bool) -> bool {
	for _ in 0..40 {
		if condition() {
			return true;
		}
		TimeoutFuture::new(25).await;
	}
	condition()
}

#[wasm_bindgen_test]
fn test_identity_is_stable_across_handles() {
	let element = visible_box();
	let other = visible_box();
	let same: Element = element.clone().unchecked_into::<web_sys::Node>().unchecked_into();

	assert_eq!(element.identity(), same.identity());
	assert_ne!(element.identity(), other.identity());
}

#[wasm_bindgen_test]
fn test_same_threshold_shares_browser_observer() {
	let directive =
		ElementInView::install(ElementInViewConfig::new(10), WebPlatform::new()).unwrap();
	let first = visible_box();
	let second = visible_box();

	directive
		.mount(&first, DirectiveBinding::new(|| {}).arg("25"))
		.unwrap();
	directive
		.mount(&second, DirectiveBinding::new(|| {}).arg("25"))
		.unwrap();

	assert!(Rc::ptr_eq(
		&directive.observer_for(&first).unwrap(),
		&directive.observer_for(&second).unwrap()
	));
}

#[wasm_bindgen_test]
async fn test_once_binding_fires_for_visible_element() {
	let directive =
		ElementInView::install(ElementInViewConfig::new(0), WebPlatform::new()).unwrap();
	let element = visible_box();
	let hits = Rc::new(Cell::new(0));

	directive
		.mount(
			&element,
			DirectiveBinding::new({
				let hits = hits.clone();
				move || hits.set(hits.get() + 1)
			})
			.once(),
		)
		.unwrap();

	assert!(wait_until(|| hits.get() > 0).await);
	assert_eq!(hits.get(), 1);
	assert!(!directive.is_tracked(&element));
}

#[wasm_bindgen_test]
fn test_server_stub_in_browser() {
	let directive =
		ElementInView::install(ElementInViewConfig::server(), WebPlatform::new()).unwrap();

	assert!(directive.ssr_props().is_empty());
	assert!(!directive.is_tracked(&visible_box()));
}
