//! Per-unit configuration.

use lamc_ir::Name;

/// Suffix used for synthetic procedure names unless overridden.
pub const DEFAULT_SUFFIX: &str = "_lambda";

/// Configuration for lifting one compilation unit.
///
/// # Example
///
/// ```text
/// let config = LiftConfig::new(interner.intern("Foo.bar")).with_validation(true);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiftConfig {
    /// Prefix for synthetic procedure names, unique to the unit.
    pub prefix: Name,
    /// Human-readable part of synthetic names.
    pub suffix: String,
    /// Check the output invariants after lifting (debug builds only).
    pub validate: bool,
}

impl LiftConfig {
    pub fn new(prefix: Name) -> Self {
        Self {
            prefix,
            suffix: DEFAULT_SUFFIX.to_owned(),
            validate: cfg!(debug_assertions),
        }
    }

    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}
