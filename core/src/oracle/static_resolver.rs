use std::collections::HashMap;

use anyhow::anyhow;

use crate::error::{UnproxyableError, UnproxyableReason};
use crate::model::{Bean, BeanId, GraphModel};
use crate::oracle::{
    structural_unproxyable_reason, IgnoredClass, PrecedenceContext, ResolutionOracle,
    ResolutionQuery,
};
use crate::types::TypeRef;

/// Reference oracle working purely from the frozen model.
///
/// Precedence contract:
/// 1. Interceptors and decorators are never injectable.
/// 2. An alternative is a candidate only when its class, or one of its
///    stereotypes, is enabled in the precedence archive, or when its class is
///    selected application-wide.
/// 3. A bean specialized by another bean is replaced by its specializer.
/// 4. When several candidates remain and some are enabled alternatives, the
///    alternatives win; among them, the highest application-wide priority
///    wins.
///
/// Type matching is structural equality on [`TypeRef`]. Proxyability
/// failures, class-loading failures and classes ignored during discovery are
/// configured up front.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    unproxyable: HashMap<String, UnproxyableReason>,
    undetermined: HashMap<String, String>,
    ignored: HashMap<String, IgnoredClass>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a class as not proxyable for `reason`.
    pub fn with_unproxyable(mut self, class_name: impl Into<String>, reason: UnproxyableReason) -> Self {
        self.unproxyable.insert(class_name.into(), reason);
        self
    }

    /// Make proxyability of a class fail with an inspection error.
    pub fn with_undetermined(mut self, class_name: impl Into<String>, failure: impl Into<String>) -> Self {
        self.undetermined.insert(class_name.into(), failure.into());
        self
    }

    /// Record that a class assignable to `required` was ignored during
    /// discovery because `missing` could not be loaded.
    pub fn with_ignored_class(
        mut self,
        required: &TypeRef,
        class_name: impl Into<String>,
        missing: impl Into<String>,
    ) -> Self {
        self.ignored.insert(
            required.to_string(),
            IgnoredClass {
                class_name: class_name.into(),
                missing: missing.into(),
            },
        );
        self
    }

    fn is_enabled(model: &GraphModel, bean: &Bean, context: PrecedenceContext) -> bool {
        if bean.kind.is_interceptor() || bean.kind.is_decorator() {
            return false;
        }
        if bean.alternative && !Self::is_selected_alternative(model, bean, context) {
            return false;
        }
        let replaced = model.beans.iter().any(|other| {
            other.specializes == Some(bean.id)
                && (!other.alternative || Self::is_selected_alternative(model, other, context))
        });
        !replaced
    }

    fn is_selected_alternative(model: &GraphModel, bean: &Bean, context: PrecedenceContext) -> bool {
        if model.global.alternative_priority(&bean.class_name).is_some() {
            return true;
        }
        model.archive(context.archive).is_some_and(|archive| {
            archive.enables_alternative(&bean.class_name)
                || bean.stereotypes.iter().any(|s| archive.enables_stereotype(s))
        })
    }

    fn apply_precedence(model: &GraphModel, mut candidates: Vec<&Bean>) -> Vec<BeanId> {
        if candidates.len() > 1 && candidates.iter().any(|b| b.alternative) {
            candidates.retain(|b| b.alternative);
            let top = candidates
                .iter()
                .filter_map(|b| model.global.alternative_priority(&b.class_name))
                .max();
            if let Some(top) = top {
                candidates
                    .retain(|b| model.global.alternative_priority(&b.class_name) == Some(top));
            }
        }
        let mut ids: Vec<BeanId> = candidates.iter().map(|b| b.id).collect();
        ids.sort();
        ids
    }
}

impl ResolutionOracle for StaticResolver {
    fn resolve(&self, model: &GraphModel, query: &ResolutionQuery) -> Vec<BeanId> {
        let candidates = model
            .beans
            .iter()
            .filter(|bean| bean.has_type(&query.required_type))
            .filter(|bean| Self::is_enabled(model, bean, query.context))
            .filter(|bean| {
                let carried = bean.effective_qualifiers();
                query
                    .qualifiers
                    .iter()
                    .all(|required| carried.iter().any(|q| q.satisfies(required)))
            })
            .collect();
        Self::apply_precedence(model, candidates)
    }

    fn resolve_by_type(
        &self,
        model: &GraphModel,
        required_type: &TypeRef,
        context: PrecedenceContext,
    ) -> Vec<BeanId> {
        model
            .beans
            .iter()
            .filter(|bean| bean.has_type(required_type))
            .filter(|bean| Self::is_enabled(model, bean, context))
            .map(|bean| bean.id)
            .collect()
    }

    fn resolve_name(&self, model: &GraphModel, name: &str) -> Vec<BeanId> {
        let candidates = model
            .beans
            .iter()
            .filter(|bean| bean.name.as_deref() == Some(name))
            .filter(|bean| {
                Self::is_enabled(
                    model,
                    bean,
                    PrecedenceContext {
                        archive: bean.archive,
                    },
                )
            })
            .collect();
        Self::apply_precedence(model, candidates)
    }

    fn type_proxyability(&self, ty: &TypeRef) -> Result<(), UnproxyableError> {
        if let Some(reason) = structural_unproxyable_reason(ty) {
            return Err(UnproxyableError::NotProxyable {
                type_name: ty.to_string(),
                reason,
            });
        }
        let Some(raw) = ty.raw_name() else {
            return Ok(());
        };
        if let Some(failure) = self.undetermined.get(raw) {
            return Err(UnproxyableError::Undetermined {
                type_name: ty.to_string(),
                source: anyhow!("{failure}"),
            });
        }
        match self.unproxyable.get(raw) {
            Some(reason) => Err(UnproxyableError::NotProxyable {
                type_name: ty.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn ignored_class(&self, ty: &TypeRef) -> Option<IgnoredClass> {
        self.ignored.get(&ty.to_string()).cloned()
    }
}
