//! Resolution oracle: the resolver-side queries the validator relies on.
//!
//! The validator never reimplements typesafe resolution or alternative
//! precedence. It asks an implementation of [`ResolutionOracle`], which must
//! be side-effect free and safe to call from several threads at once.

mod static_resolver;

use serde::{Deserialize, Serialize};

pub use static_resolver::StaticResolver;

use crate::error::{UnproxyableError, UnproxyableReason};
use crate::model::{ArchiveId, Bean, BeanId, GraphModel};
use crate::types::{Qualifier, TypeRef};

/// The bean archive whose enablement decides alternative precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrecedenceContext {
    pub archive: ArchiveId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionQuery {
    pub required_type: TypeRef,
    pub qualifiers: Vec<Qualifier>,
    pub context: PrecedenceContext,
}

/// A class that would have matched but was dropped during discovery because
/// a type it references is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoredClass {
    pub class_name: String,
    pub missing: String,
}

pub trait ResolutionOracle: Send + Sync {
    /// Beans satisfying the query after alternative precedence has been
    /// applied, in a stable order. More than one entry means ambiguity.
    fn resolve(&self, model: &GraphModel, query: &ResolutionQuery) -> Vec<BeanId>;

    /// Beans assignable to `required_type` regardless of qualifiers.
    fn resolve_by_type(
        &self,
        model: &GraphModel,
        required_type: &TypeRef,
        context: PrecedenceContext,
    ) -> Vec<BeanId>;

    /// Beans resolvable by EL name.
    fn resolve_name(&self, model: &GraphModel, name: &str) -> Vec<BeanId>;

    /// Whether the container can build a client proxy for `ty`.
    fn type_proxyability(&self, ty: &TypeRef) -> Result<(), UnproxyableError>;

    /// Whether every type of a normal-scoped bean can be proxied.
    fn bean_proxyability(&self, _model: &GraphModel, bean: &Bean) -> Result<(), UnproxyableError> {
        bean.types
            .iter()
            .try_for_each(|ty| self.type_proxyability(ty))
    }

    fn is_passivation_capable(&self, bean: &Bean) -> bool {
        bean.passivation_capable
    }

    /// Discovery-time reason why a class assignable to `ty` is missing.
    fn ignored_class(&self, _ty: &TypeRef) -> Option<IgnoredClass> {
        None
    }
}

/// Classify a type that is never proxyable regardless of its class.
pub fn structural_unproxyable_reason(ty: &TypeRef) -> Option<UnproxyableReason> {
    match ty {
        TypeRef::Primitive { .. } => Some(UnproxyableReason::Primitive),
        TypeRef::Array { .. } => Some(UnproxyableReason::ArrayType),
        _ => None,
    }
}
