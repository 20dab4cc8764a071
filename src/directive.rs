//! The `element-in-view` directive.
//!
//! Host frameworks install the directive once per application with an
//! [`ElementInViewConfig`] and then call [`ElementInView::mount`] from their
//! element mount hook, translating their own binding syntax into a
//! [`DirectiveBinding`]. During server rendering the directive installs a stub
//! that contributes no attributes and observes nothing.
//!
//! ```
//! use reinhardt_element_in_view::testing::{MockElement, MockPlatform};
//! use reinhardt_element_in_view::{DirectiveBinding, ElementInView, ElementInViewConfig};
//!
//! let directive =
//!     ElementInView::install(ElementInViewConfig::new(10), MockPlatform::new()).unwrap();
//! let banner = MockElement::new();
//!
//! directive
//!     .mount(&banner, DirectiveBinding::new(|| {}).arg("50").once())
//!     .unwrap();
//! assert!(directive.is_tracked(&banner));
//! ```

use std::collections::HashMap;
use std::rc::Rc;

use crate::binding::{Behavior, VisibilityCallback};
use crate::config::ElementInViewConfig;
use crate::error::ElementInViewError;
use crate::observer::{ObserverPlatform, ViewportObserver};
use crate::registry::ObserverRegistry;
use crate::threshold::{Resolution, Threshold, resolve_with_diagnostic};

/// Name under which host frameworks register the directive.
pub const DIRECTIVE_NAME: &str = "element-in-view";

/// Modifier name selecting "fire once then stop".
pub const ONCE_MODIFIER: &str = "once";

/// Extra attributes contributed during server rendering.
pub type ServerProps = HashMap<String, String>;

/// Boolean modifiers of one directive use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectiveModifiers {
	/// Stop observing after the first time the element becomes visible.
	pub once: bool,
}

impl DirectiveModifiers {
	/// Builds modifiers from the names a template attached to the directive.
	///
	/// Unknown names are ignored.
	pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
		let mut modifiers = Self::default();
		for name in names {
			if name == ONCE_MODIFIER {
				modifiers.once = true;
			}
		}
		modifiers
	}
}

/// Everything a host passes when the directive is attached to an element.
#[derive(Debug, Clone)]
pub struct DirectiveBinding {
	/// Action to run when the element becomes visible.
	pub value: VisibilityCallback,
	/// Optional threshold percentage override, such as `"50"`.
	pub arg: Option<String>,
	/// Modifier flags.
	pub modifiers: DirectiveModifiers,
}

impl DirectiveBinding {
	/// Creates a binding with no argument and no modifiers.
	pub fn new(value: impl Into<VisibilityCallback>) -> Self {
		Self {
			value: value.into(),
			arg: None,
			modifiers: DirectiveModifiers::default(),
		}
	}

	/// Sets the threshold argument.
	pub fn arg(mut self, arg: impl Into<String>) -> Self {
		self.arg = Some(arg.into());
		self
	}

	/// Sets the `once` modifier.
	pub fn once(mut self) -> Self {
		self.modifiers.once = true;
		self
	}

	/// Replaces all modifiers.
	pub fn modifiers(mut self, modifiers: DirectiveModifiers) -> Self {
		self.modifiers = modifiers;
		self
	}
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Client-side directive backed by shared viewport observers.
///
/// # Element lifecycle
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> Observed: mount
///     Observed --> Observed: visible (repeat)
///     Observed --> Released: visible (once)
///     Observed --> Released: unmount
///     Released --> [*]
/// ```
///
/// Hosts must call [`unmount`](Self::unmount) from their element teardown
/// hook. A destroyed element only ever reports "not intersecting", which
/// dispatch ignores, so without `unmount` a repeating behavior stays recorded
/// and keeps its callback and captured state alive for the directive's
/// lifetime. `once` behaviors that already fired have released themselves.
pub struct LiveDirective<P: ObserverPlatform> {
	default_threshold: Threshold,
	registry: ObserverRegistry<P>,
}

impl<P: ObserverPlatform> LiveDirective<P> {
	/// Creates a live directive with the given default threshold.
	pub fn new(default_threshold: Threshold, platform: P) -> Self {
		Self {
			default_threshold,
			registry: ObserverRegistry::new(platform),
		}
	}

	/// Returns the installation default threshold.
	pub fn default_threshold(&self) -> Threshold {
		self.default_threshold
	}

	/// Starts observing `element` with the behavior described by `binding`.
	///
	/// The returned [`Resolution`] carries the threshold in use and, when the
	/// argument was rejected, the reason. Mounting an element that is already
	/// tracked replaces its behavior and moves it to the new threshold's
	/// observer.
	///
	/// # Errors
	///
	/// Returns [`ElementInViewError::ObserverCreation`] if no observer exists
	/// for the threshold and the platform cannot create one. The element is
	/// left untracked.
	pub fn register_live_element(
		&self,
		element: &P::Target,
		binding: DirectiveBinding,
	) -> Result<Resolution, ElementInViewError> {
		let resolution =
			resolve_with_diagnostic(self.default_threshold, binding.arg.as_deref());
		let threshold = resolution.threshold;

		let observer = self.registry.get_or_create(threshold).inspect_err(|e| {
			crate::error_log!("element-in-view could not observe element: {}", e);
		})?;
		observer.observe(element);

		let behavior = Behavior::new(binding.value, threshold).once(binding.modifiers.once);
		let moved_from = self
			.registry
			.bindings()
			.set(element, behavior)
			.map(|previous| previous.threshold)
			.filter(|previous| *previous != threshold);
		if let Some(old) = moved_from.and_then(|previous| self.registry.get(previous)) {
			old.unobserve(element);
		}

		Ok(resolution)
	}

	/// Stops observing `element` and forgets its behavior, dropping its
	/// callback.
	///
	/// Call this when the element is destroyed. Returns false if the element
	/// was not tracked.
	pub fn unmount(&self, element: &P::Target) -> bool {
		let Some(behavior) = self.registry.bindings().remove(element) else {
			return false;
		};
		if let Some(observer) = self.registry.get(behavior.threshold) {
			observer.unobserve(element);
		}
		true
	}

	/// Returns true if `element` has a recorded behavior.
	pub fn is_tracked(&self, element: &P::Target) -> bool {
		self.registry.bindings().contains(element)
	}

	/// Returns the shared observer `element` is registered with.
	pub fn observer_for(&self, element: &P::Target) -> Option<Rc<P::Observer>> {
		let behavior = self.registry.bindings().get(element)?;
		self.registry.get(behavior.threshold)
	}

	/// Returns the underlying registry.
	pub fn registry(&self) -> &ObserverRegistry<P> {
		&self.registry
	}
}

impl<P: ObserverPlatform + std::fmt::Debug> std::fmt::Debug for LiveDirective<P> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LiveDirective")
			.field("default_threshold", &self.default_threshold)
			.field("registry", &self.registry)
			.finish()
	}
}

/// Server-rendering stub.
///
/// Visibility is a client-side concern, so the stub adds no attributes and
/// never observes anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerDirective;

impl ServerDirective {
	/// Returns the attributes to render for a bound element: always empty.
	pub fn describe_server_placeholder(&self) -> ServerProps {
		ServerProps::new()
	}
}

/// An installed `element-in-view` directive.
#[derive(Debug)]
pub enum ElementInView<P: ObserverPlatform> {
	/// Client-side directive.
	Live(LiveDirective<P>),
	/// Server-rendering stub.
	Server(ServerDirective),
}

impl<P: ObserverPlatform> ElementInView<P> {
	/// Installs the directive.
	///
	/// `config.ssr` selects the server stub, in which case `platform` is
	/// dropped unused.
	///
	/// # Errors
	///
	/// Returns [`ElementInViewError::Config`] if the default threshold is above
	/// 100.
	pub fn install(config: ElementInViewConfig, platform: P) -> Result<Self, ElementInViewError> {
		let default_threshold = config.default_threshold()?;
		if config.ssr {
			return Ok(Self::Server(ServerDirective));
		}
		Ok(Self::Live(LiveDirective::new(default_threshold, platform)))
	}

	/// Mount hook: observes `element` on the client, does nothing on the server.
	///
	/// Returns the threshold resolution on the client and `None` on the server.
	///
	/// # Errors
	///
	/// See [`LiveDirective::register_live_element`].
	pub fn mount(
		&self,
		element: &P::Target,
		binding: DirectiveBinding,
	) -> Result<Option<Resolution>, ElementInViewError> {
		match self {
			Self::Live(live) => live.register_live_element(element, binding).map(Some),
			Self::Server(_) => Ok(None),
		}
	}

	/// Unmount hook. Hosts call it on element teardown; see
	/// [`LiveDirective::unmount`] for what is retained otherwise.
	///
	/// Returns false if the element was not tracked.
	pub fn unmount(&self, element: &P::Target) -> bool {
		match self {
			Self::Live(live) => live.unmount(element),
			Self::Server(_) => false,
		}
	}

	/// Server-rendering hook: the extra attributes for a bound element.
	pub fn ssr_props(&self) -> ServerProps {
		ServerDirective.describe_server_placeholder()
	}

	/// Returns true if `element` has a recorded behavior.
	pub fn is_tracked(&self, element: &P::Target) -> bool {
		match self {
			Self::Live(live) => live.is_tracked(element),
			Self::Server(_) => false,
		}
	}

	/// Returns the shared observer `element` is registered with.
	pub fn observer_for(&self, element: &P::Target) -> Option<Rc<P::Observer>> {
		match self {
			Self::Live(live) => live.observer_for(element),
			Self::Server(_) => None,
		}
	}

	/// Returns the live directive, or `None` for the server stub.
	pub fn as_live(&self) -> Option<&LiveDirective<P>> {
		match self {
			Self::Live(live) => Some(live),
			Self::Server(_) => None,
		}
	}

	/// Returns true if this is the server stub.
	pub fn is_server(&self) -> bool {
		matches!(self, Self::Server(_))
	}
}
