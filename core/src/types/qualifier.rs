use std::fmt;

use serde::{Deserialize, Serialize};

/// A qualifier annotation with its (single) member value, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Qualifier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Qualifier {
    pub const DEFAULT: &'static str = "Default";
    pub const ANY: &'static str = "Any";
    pub const NAMED: &'static str = "Named";
    pub const NEW: &'static str = "New";
    pub const INTERCEPTED: &'static str = "Intercepted";
    pub const DECORATED: &'static str = "Decorated";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn default_qualifier() -> Self {
        Self::new(Self::DEFAULT)
    }

    pub fn any() -> Self {
        Self::new(Self::ANY)
    }

    pub fn named(value: impl Into<String>) -> Self {
        Self::with_value(Self::NAMED, value)
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// `@Named` with no value (or an empty one).
    pub fn is_unnamed_named(&self) -> bool {
        self.is(Self::NAMED) && self.value.as_deref().map_or(true, str::is_empty)
    }

    /// Whether a bean carrying `self` satisfies a required qualifier.
    ///
    /// A required qualifier without a value matches any member value.
    pub fn satisfies(&self, required: &Qualifier) -> bool {
        self.name == required.name
            && (required.value.is_none() || self.value == required.value)
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "@{}(\"{}\")", self.name, value),
            None => write!(f, "@{}", self.name),
        }
    }
}
