//! Per-request parameter buffer.

use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of path parameters stored inline before spilling to the heap.
/// Most REST APIs have ≤4 path params (e.g. `/users/:id/posts/:post_id`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Byte range of one capture within the request path.
type Span = (usize, usize);

/// An empty capture reads as `""` whatever the path; an empty request path is
/// matched as `/`, so its spans may sit one byte past its end.
#[inline]
fn resolve(path: &str, (start, end): Span) -> Option<&str> {
    if start == end {
        Some("")
    } else {
        path.get(start..end)
    }
}

/// Captured path parameters for one lookup.
///
/// The buffer records byte offsets into the request path rather than
/// borrowing it, so one buffer serves any number of requests, including paths
/// owned by a short-lived `String`. Values are read back by handing the same
/// path to [`get`](Params::get), [`value`](Params::value),
/// [`values`](Params::values) or [`iter`](Params::iter).
///
/// Size it with [`Router::new_params`](super::Router::new_params) once
/// registration is complete; a lookup that needs more slots than reserved still
/// succeeds, at the cost of one reallocation.
#[derive(Debug, Clone, Default)]
pub struct Params {
    names: Option<Arc<[Arc<str>]>>,
    spans: SmallVec<[Span; MAX_INLINE_PARAMS]>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: None,
            spans: SmallVec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.names = None;
        self.spans.clear();
    }

    #[inline]
    pub(crate) fn push(&mut self, start: usize, end: usize) {
        self.spans.push((start, end));
    }

    #[inline]
    pub(crate) fn truncate(&mut self, len: usize) {
        self.spans.truncate(len);
    }

    #[inline]
    pub(crate) fn set_names(&mut self, names: &Arc<[Arc<str>]>) {
        self.names = Some(Arc::clone(names));
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of values the buffer holds without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.spans.capacity()
    }

    /// True once the buffer has moved its storage to the heap.
    #[must_use]
    pub fn spilled(&self) -> bool {
        self.spans.spilled()
    }

    /// Byte ranges of the captures within the matched path, in order.
    #[must_use]
    pub fn spans(&self) -> &[(usize, usize)] {
        &self.spans
    }

    /// Value at position `index` of `path`, in the order the route declares
    /// its captures. `path` must be the one passed to the lookup.
    #[inline]
    #[must_use]
    pub fn value<'a>(&self, path: &'a str, index: usize) -> Option<&'a str> {
        resolve(path, *self.spans.get(index)?)
    }

    /// All captured values of `path` in order.
    pub fn values<'a, 'p>(&'a self, path: &'p str) -> impl Iterator<Item = &'p str> + 'a
    where
        'p: 'a,
    {
        self.spans
            .iter()
            .filter_map(move |&span| resolve(path, span))
    }

    /// Capture names of the matched route; empty before a successful lookup.
    #[must_use]
    pub fn names(&self) -> &[Arc<str>] {
        self.names.as_deref().unwrap_or(&[])
    }

    /// Value captured for `name`. A trailing wildcard is named `_*`.
    #[must_use]
    pub fn get<'a>(&self, path: &'a str, name: &str) -> Option<&'a str> {
        let index = self.names().iter().position(|n| n.as_ref() == name)?;
        self.value(path, index)
    }

    /// `(name, value)` pairs in capture order.
    pub fn iter<'a, 'p>(&'a self, path: &'p str) -> impl Iterator<Item = (&'a str, &'p str)> + 'a
    where
        'p: 'a,
    {
        self.names()
            .iter()
            .map(|n| n.as_ref())
            .zip(self.values(path))
    }
}
