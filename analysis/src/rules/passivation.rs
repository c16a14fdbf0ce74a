//! Rule: beans with a passivating scope must survive serialization, together
//! with everything that travels with them.
//!
//! For a passivating bean this covers the bean itself, its bound interceptors
//! and decorators, and every pseudo-scoped dependency reachable through
//! non-transient fields, constructor parameters and initializer parameters.
//! Normal-scoped dependencies are reached through a serializable proxy and
//! never count. Extension-registered normal-scoped beans that are not
//! passivation capable get a warning.

use async_trait::async_trait;

use beancheck_core::model::{Bean, BeanKind};

use crate::graph::traversal::passivation_hazards;
use crate::graph::DependencyGraph;
use crate::rules::{Phase, Rule, RuleContext};
use crate::types::finding::{ComponentRole, Finding, FindingKind};

#[derive(Debug, Default)]
pub struct PassivationRule;

impl PassivationRule {
    pub fn new() -> Self {
        Self
    }
}

fn check_passivating(ctx: &RuleContext, graph: &DependencyGraph, bean: &Bean, out: &mut Vec<Finding>) {
    let model = &ctx.model;
    let oracle = ctx.oracle.as_ref();

    if !oracle.is_passivation_capable(bean) {
        out.push(
            FindingKind::BeanWithPassivatingScopeNotPassivationCapable { bean: bean.id }.into(),
        );
    }

    for &interceptor in &bean.interceptors {
        if !oracle.is_passivation_capable(model.bean(interceptor)) {
            out.push(
                FindingKind::PassivatingBeanWithNonserializableInterceptor {
                    bean: bean.id,
                    interceptor,
                }
                .into(),
            );
        }
    }
    for &decorator in &bean.decorators {
        if !oracle.is_passivation_capable(model.bean(decorator)) {
            out.push(
                FindingKind::PassivatingBeanWithNonserializableDecorator {
                    bean: bean.id,
                    decorator,
                }
                .into(),
            );
        }
    }

    let components = bean
        .interceptors
        .iter()
        .map(|c| (ComponentRole::Interceptor, *c))
        .chain(bean.decorators.iter().map(|c| (ComponentRole::Decorator, *c)));
    for (role, component) in components {
        let roots = &model.bean(component).injection_points;
        for hazard in passivation_hazards(model, graph, oracle, roots) {
            out.push(
                FindingKind::InterceptorDecoratorInjectionPointHasNonSerializableDependency {
                    bean: bean.id,
                    role,
                    component,
                    dependency: hazard.dependency,
                    injection_point: hazard.injection_point,
                }
                .into(),
            );
        }
    }

    for hazard in passivation_hazards(model, graph, oracle, &bean.injection_points) {
        out.push(
            FindingKind::InjectionPointHasNonSerializableDependency {
                bean: bean.id,
                dependency: hazard.dependency,
                injection_point: hazard.injection_point,
            }
            .into(),
        );
    }
}

#[async_trait]
impl Rule for PassivationRule {
    fn id(&self) -> &'static str {
        "bean.passivation"
    }

    fn name(&self) -> &'static str {
        "Passivating bean is not serializable"
    }

    fn phase(&self) -> Phase {
        Phase::Deployment
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let Some(graph) = ctx.graph() else {
            log::debug!("{}: no dependency graph, skipping", self.id());
            return Vec::new();
        };
        let mut findings = Vec::new();

        for bean in ctx.beans() {
            if bean.scope.is_passivating() {
                check_passivating(ctx, graph, bean, &mut findings);
            }
            // Extension-registered beans cannot be checked for a serializable
            // class, only for the capability itself.
            if bean.custom && bean.scope.is_normal() && !ctx.oracle.is_passivation_capable(bean) {
                findings.push(FindingKind::BeanNotPassivationCapable { bean: bean.id }.into());
            }
            if matches!(bean.kind, BeanKind::BuiltIn) {
                for &decorator in &bean.decorators {
                    if !ctx.oracle.is_passivation_capable(ctx.model.bean(decorator)) {
                        findings.push(
                            FindingKind::BuiltinBeanWithNonserializableDecorator {
                                decorator,
                                bean: bean.id,
                            }
                            .into(),
                        );
                    }
                }
            }
        }
        findings
    }
}
