//! Fresh global names for synthetic procedures.
//!
//! One [`NameCounter`] is shared by every compilation unit of a session, so
//! the numeric suffix is unique even when units are processed in parallel.
//! Each unit draws from it through its own [`NameSupply`], which adds the
//! unit's prefix and skips names that are already taken.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::{Name, StringInterner};

/// Session-wide monotonically increasing counter.
#[derive(Debug)]
pub struct NameCounter(AtomicU32);

impl NameCounter {
    /// Create a counter whose first value is 1.
    pub fn new() -> Self {
        Self(AtomicU32::new(1))
    }

    /// Take the next value. Never returns the same value twice.
    pub fn take_next(&self) -> u32 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for NameCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-unit source of synthetic procedure names of the form
/// `{prefix}.{suffix}_{n}` (or `{suffix}_{n}` with an empty prefix).
pub struct NameSupply<'a> {
    counter: &'a NameCounter,
    interner: &'a StringInterner,
    base: String,
}

impl<'a> NameSupply<'a> {
    pub fn new(
        counter: &'a NameCounter,
        interner: &'a StringInterner,
        prefix: Name,
        suffix: &str,
    ) -> Self {
        let prefix = interner.lookup(prefix);
        let base = if prefix.is_empty() {
            suffix.to_owned()
        } else {
            format!("{prefix}.{suffix}")
        };
        Self {
            counter,
            interner,
            base,
        }
    }

    /// Mint a name for which `is_taken` returns `false`.
    pub fn fresh(&mut self, is_taken: impl Fn(Name) -> bool) -> Name {
        loop {
            let n = self.counter.take_next();
            let name = self.interner.intern(&format!("{}_{n}", self.base));
            if !is_taken(name) {
                return name;
            }
        }
    }
}
