#![forbid(unsafe_code)]

//! Test case registry.
//!
//! An explicit, insertion-ordered table built once at startup by
//! enumerating constructors — no self-registering global state, so lookup
//! behavior is independent of link order. Names are expected unique;
//! lookup is a case-sensitive linear scan, first match wins. Sorting
//! happens only for display.

use fcanvas_surface::HostHandle;

use crate::canvas2d::{self, Canvas2DCase};
use crate::case::TestCase;

/// Constructor for one registered case, bound to a host at creation time.
pub type CaseFactory = fn(HostHandle) -> Box<dyn TestCase>;

/// The case table.
pub struct Registry {
    entries: Vec<(&'static str, CaseFactory)>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The registry of all built-in cases.
    pub fn with_builtin_cases() -> Self {
        let mut registry = Self::new();
        registry.register(canvas2d::CASE_NAME, Canvas2DCase::factory);
        registry
    }

    /// Append a case. Duplicate names are tolerated; the earlier
    /// registration wins at lookup.
    pub fn register(&mut self, name: &'static str, factory: CaseFactory) {
        self.entries.push((name, factory));
    }

    /// Construct the named case, bound to `host`. Exact, case-sensitive
    /// name match.
    pub fn create(&self, name: &str, host: &HostHandle) -> Option<Box<dyn TestCase>> {
        self.entries
            .iter()
            .find(|(entry_name, _)| *entry_name == name)
            .map(|(_, factory)| factory(host.clone()))
    }

    /// All registered names, sorted lexicographically for display.
    pub fn sorted_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered cases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no case is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtin_cases()
    }
}
