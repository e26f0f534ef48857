//! Fixed-size per-method handler slots.
//!
//! Dispatch on the hot path indexes a 9-element array with a compact
//! [`MethodKind`] instead of hashing an [`http::Method`].

use http::Method;

/// The HTTP methods a route can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MethodKind {
    Connect = 0,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

/// Number of method slots in a [`MethodHandler`].
pub const METHOD_COUNT: usize = 9;

impl MethodKind {
    /// All kinds in slot order.
    pub const ALL: [MethodKind; METHOD_COUNT] = [
        MethodKind::Connect,
        MethodKind::Delete,
        MethodKind::Get,
        MethodKind::Head,
        MethodKind::Options,
        MethodKind::Patch,
        MethodKind::Post,
        MethodKind::Put,
        MethodKind::Trace,
    ];

    /// Map a request method to its slot.
    ///
    /// Returns `None` for extension methods, which are never routable.
    #[inline]
    #[must_use]
    pub fn from_method(method: &Method) -> Option<Self> {
        let kind = match *method {
            Method::CONNECT => MethodKind::Connect,
            Method::DELETE => MethodKind::Delete,
            Method::GET => MethodKind::Get,
            Method::HEAD => MethodKind::Head,
            Method::OPTIONS => MethodKind::Options,
            Method::PATCH => MethodKind::Patch,
            Method::POST => MethodKind::Post,
            Method::PUT => MethodKind::Put,
            Method::TRACE => MethodKind::Trace,
            _ => return None,
        };
        Some(kind)
    }

    #[must_use]
    pub fn as_method(self) -> Method {
        match self {
            MethodKind::Connect => Method::CONNECT,
            MethodKind::Delete => Method::DELETE,
            MethodKind::Get => Method::GET,
            MethodKind::Head => Method::HEAD,
            MethodKind::Options => Method::OPTIONS,
            MethodKind::Patch => Method::PATCH,
            MethodKind::Post => Method::POST,
            MethodKind::Put => Method::PUT,
            MethodKind::Trace => Method::TRACE,
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

/// One handler slot per [`MethodKind`] for a single path terminus.
#[derive(Debug, Clone)]
pub struct MethodHandler<T> {
    slots: [Option<T>; METHOD_COUNT],
}

impl<T> Default for MethodHandler<T> {
    fn default() -> Self {
        Self {
            slots: Default::default(),
        }
    }
}

impl<T> MethodHandler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` for `kind`, returning whatever was there before.
    pub fn add_handler(&mut self, kind: MethodKind, value: T) -> Option<T> {
        self.slots[kind.slot()].replace(value)
    }

    #[inline]
    #[must_use]
    pub fn find_handler(&self, kind: MethodKind) -> Option<&T> {
        self.slots[kind.slot()].as_ref()
    }

    /// True when no method has a handler, i.e. the node is a pure branch point.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Methods that have a handler, in slot order. Feeds the `Allow` header of a 405.
    pub fn allowed_methods(&self) -> impl Iterator<Item = Method> + '_ {
        MethodKind::ALL
            .iter()
            .filter(|kind| self.slots[kind.slot()].is_some())
            .map(|kind| kind.as_method())
    }

    /// Iterate over `(kind, handler)` for every occupied slot.
    pub fn iter(&self) -> impl Iterator<Item = (MethodKind, &T)> + '_ {
        MethodKind::ALL
            .iter()
            .filter_map(|kind| self.slots[kind.slot()].as_ref().map(|v| (*kind, v)))
    }
}
