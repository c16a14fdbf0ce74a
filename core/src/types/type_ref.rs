//! Resolved Java-like type references as seen at injection points and bean
//! type sets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fully-resolved type reference.
///
/// Equality is structural: `List<String>` only equals `List<String>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    /// A raw class or interface, e.g. `PaymentService` or `Instance` with no
    /// type argument.
    Class { name: String },

    /// A parameterized type, e.g. `Instance<PaymentService>`.
    Parameterized { raw: String, args: Vec<TypeRef> },

    /// A type variable, e.g. `T`.
    Variable { name: String },

    /// A wildcard type argument, optionally bounded (`? extends Number`).
    Wildcard {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upper: Option<Box<TypeRef>>,
    },

    /// An array of the component type.
    Array { component: Box<TypeRef> },

    /// A primitive, e.g. `int`.
    Primitive { name: String },
}

impl TypeRef {
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class { name: name.into() }
    }

    pub fn parameterized(raw: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Parameterized {
            raw: raw.into(),
            args,
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        TypeRef::Variable { name: name.into() }
    }

    pub fn wildcard() -> Self {
        TypeRef::Wildcard { upper: None }
    }

    pub fn array_of(component: TypeRef) -> Self {
        TypeRef::Array {
            component: Box::new(component),
        }
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        TypeRef::Primitive { name: name.into() }
    }

    /// The raw (erased) name of this type, if it has one.
    ///
    /// Variables and wildcards have no raw class.
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class { name } | TypeRef::Primitive { name } => Some(name),
            TypeRef::Parameterized { raw, .. } => Some(raw),
            TypeRef::Variable { .. } | TypeRef::Wildcard { .. } | TypeRef::Array { .. } => None,
        }
    }

    /// Type arguments of a parameterized type (empty otherwise).
    pub fn type_args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Parameterized { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, TypeRef::Variable { .. })
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, TypeRef::Wildcard { .. })
    }

    /// Whether this is a raw class reference (no type arguments).
    pub fn is_raw_class(&self) -> bool {
        matches!(self, TypeRef::Class { .. })
    }

    /// Check whether the erased type is `name`.
    pub fn is_raw(&self, name: &str) -> bool {
        self.raw_name() == Some(name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Class { name } | TypeRef::Primitive { name } | TypeRef::Variable { name } => {
                f.write_str(name)
            }
            TypeRef::Parameterized { raw, args } => {
                write!(f, "{raw}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            TypeRef::Wildcard { upper: None } => f.write_str("?"),
            TypeRef::Wildcard { upper: Some(bound) } => write!(f, "? extends {bound}"),
            TypeRef::Array { component } => write!(f, "{component}[]"),
        }
    }
}
