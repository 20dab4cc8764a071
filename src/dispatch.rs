//! Change dispatch.
//!
//! Turns one batch of intersection entries into callback invocations. The
//! per-entry logic depends only on the entry and the current table state, so
//! it is exercised directly in tests without a platform observer.
//!
//! For each entry, in delivery order:
//!
//! 1. Entries that are not intersecting are ignored.
//! 2. A target with no behavior recorded at the observer's threshold is stale:
//!    it is unobserved from that observer and nothing else happens. This
//!    covers entries queued by an observer the element has since moved away
//!    from.
//! 3. A `once` behavior is removed from the table and its target unobserved.
//! 4. The behavior's callback runs.
//!
//! Steps 3 and 4 are ordered so a callback that remounts its own element sees
//! a clean table. A panicking callback propagates to the caller.

use crate::binding::BindingTable;
use crate::element::ObservedElement;
use crate::observer::{IntersectionEntry, ViewportObserver};
use crate::threshold::Threshold;

/// Counters describing what one dispatch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
	/// Callbacks invoked.
	pub fired: usize,
	/// Targets deregistered after a `once` callback.
	pub released: usize,
	/// Targets unobserved because no behavior was recorded at the threshold.
	pub stale: usize,
	/// Entries skipped because the target was not intersecting.
	pub ignored: usize,
}

/// Processes one batch of entries delivered by `observer`, the shared
/// observer for `threshold`.
pub fn dispatch_entries<T: ObservedElement>(
	entries: &[IntersectionEntry<T>],
	table: &BindingTable,
	observer: &dyn ViewportObserver<T>,
	threshold: Threshold,
) -> DispatchReport {
	let mut report = DispatchReport::default();

	for entry in entries {
		if !entry.is_intersecting {
			report.ignored += 1;
			continue;
		}

		let Some(behavior) = table.take_for_dispatch(&entry.target, threshold) else {
			observer.unobserve(&entry.target);
			report.stale += 1;
			continue;
		};

		if behavior.once {
			observer.unobserve(&entry.target);
			report.released += 1;
		}

		behavior.callback.call();
		report.fired += 1;
	}

	crate::debug_log!("element-in-view dispatch: {:?}", report);
	report
}
