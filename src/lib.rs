//! Reinhardt Element In View - visibility directive for WASM frontends
//!
//! Runs a callback when an element scrolls into view, optionally only once.
//! Hosts attach the behavior declaratively, the way a template directive is
//! attached, and the crate maps mount hooks onto a small set of shared
//! `IntersectionObserver`s.
//!
//! ## Features
//!
//! - **Shared observers**: elements requesting the same threshold share one
//!   platform observer
//! - **Forgiving thresholds**: invalid percentage arguments fall back to the
//!   installation default with a console warning instead of failing the mount
//! - **Once or repeat**: the `once` modifier stops observing after the first hit
//! - **SSR stub**: server rendering contributes no attributes and observes nothing
//!
//! ## Architecture
//!
//! - [`threshold`]: percentage parsing and fallback
//! - [`registry`]: threshold-keyed cache of shared observers
//! - [`binding`]: identity-keyed table of per-element behaviors
//! - [`dispatch`]: turns entry batches into callback invocations
//! - [`directive`]: install, mount, unmount and server hooks
//! - [`observer`]: the platform seam; `platform` implements it in the browser
//! - [`testing`]: in-memory platform for native tests
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_element_in_view::platform::WebPlatform;
//! use reinhardt_element_in_view::{DirectiveBinding, ElementInView, ElementInViewConfig};
//!
//! let directive = ElementInView::install(ElementInViewConfig::new(10), WebPlatform::new())?;
//!
//! // <img v-element-in-view:50.once="load_image">
//! directive.mount(&image, DirectiveBinding::new(load_image).arg("50").once())?;
//! ```

#![warn(missing_docs)]

pub mod binding;
pub mod config;
pub mod directive;
pub mod dispatch;
pub mod element;
pub mod error;
pub mod logging;
pub mod observer;
pub mod registry;
pub mod testing;
pub mod threshold;

// Browser-backed observers
#[cfg(target_arch = "wasm32")]
pub mod platform;

pub use binding::{Behavior, BindingTable, VisibilityCallback};
pub use config::{ConfigError, ElementInViewConfig};
pub use directive::{
	DIRECTIVE_NAME, DirectiveBinding, DirectiveModifiers, ElementInView, LiveDirective,
	ServerDirective, ServerProps,
};
pub use dispatch::{DispatchReport, dispatch_entries};
pub use element::{ElementId, ObservedElement};
pub use error::ElementInViewError;
pub use observer::{ChangeHandler, IntersectionEntry, ObserverPlatform, ViewportObserver};
#[cfg(target_arch = "wasm32")]
pub use platform::{WebObserver, WebPlatform};
pub use registry::ObserverRegistry;
pub use threshold::{Resolution, Threshold, ThresholdError, resolve, resolve_with_diagnostic};

#[doc(hidden)]
pub mod __private {
	#[cfg(not(target_arch = "wasm32"))]
	pub use tracing;
	#[cfg(target_arch = "wasm32")]
	pub use web_sys;
}
