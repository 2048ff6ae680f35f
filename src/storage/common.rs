//! Pagination policy shared by every backend.
//!
//! All listing operations accept a [`Window`] and return a [`Page`]. The
//! policy is backend-agnostic: a window describes the sub-range
//! `[offset, offset + limit)` of a stable-ordered sequence, and the page
//! reports the effective window alongside the full sequence length at the
//! instant of the call. Windows are computed against call-time state; no
//! snapshot is held across calls.

use serde::Serialize;

/// Default and built-in maximum number of items returned per listing call.
pub const DEFAULT_PAGE_LIMIT: usize = 1000;

/// A requested sub-range of an ordered sequence.
///
/// Fields are private so that every constructed window has already had its
/// limit capped; a backend can trust any `Window` it receives. Requests above
/// the maximum are silently capped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
	offset: usize,
	limit: usize,
}

impl Window {
	/// Window capped at [`DEFAULT_PAGE_LIMIT`].
	pub fn new(offset: usize, limit: usize) -> Self {
		Self::with_max(offset, limit, DEFAULT_PAGE_LIMIT)
	}

	/// Window capped at a configured maximum, for deployments that override
	/// the built-in page size.
	pub fn with_max(offset: usize, limit: usize, max_limit: usize) -> Self {
		Self { offset, limit: limit.min(max_limit) }
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn limit(&self) -> usize {
		self.limit
	}

	/// One past the last requested position.
	pub fn end(&self) -> usize {
		self.offset.saturating_add(self.limit)
	}

	/// The in-range portion of `full` covered by this window.
	///
	/// An offset beyond the sequence, or a limit of zero, yields an empty
	/// slice rather than an error.
	pub fn slice<'a, T>(&self, full: &'a [T]) -> &'a [T] {
		let start = self.offset.min(full.len());
		let end = self.end().min(full.len());
		&full[start..end]
	}
}

impl Default for Window {
	fn default() -> Self {
		Self::new(0, DEFAULT_PAGE_LIMIT)
	}
}

/// One window of identifiers plus the pagination summary callers echo back
/// alongside the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
	/// Identifiers inside the requested window, in the sequence's order.
	pub items: Vec<String>,
	/// Effective offset of this window.
	pub offset: usize,
	/// Effective (post-cap) limit of this window.
	pub limit: usize,
	/// Full length of the underlying sequence at the time of the call,
	/// independent of the requested window.
	pub total: usize,
}

impl Page {
	pub fn new(items: Vec<String>, window: Window, total: usize) -> Self {
		Self { items, offset: window.offset(), limit: window.limit(), total }
	}

	/// Offset of the next window, or `None` once the collection is exhausted.
	///
	/// Drives paging loops to termination: keep requesting windows until this
	/// returns `None`.
	pub fn next_offset(&self) -> Option<usize> {
		let next = self.offset.saturating_add(self.items.len());
		(next < self.total && !self.items.is_empty()).then_some(next)
	}
}
