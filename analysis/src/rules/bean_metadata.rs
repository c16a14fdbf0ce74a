//! Rule: `Bean<X>`, `Interceptor<X>` and `Decorator<X>` metadata injection.
//!
//! A bean may only ask for metadata describing itself. Interceptors and
//! decorators may additionally ask for the intercepted or decorated bean with
//! `@Intercepted Bean<?>` / `@Decorated Bean<?>`.

use async_trait::async_trait;

use beancheck_core::model::{Bean, BeanKind, InjectionPoint};
use beancheck_core::types::{well_known, Qualifier, TypeRef};

use crate::rules::{Phase, Rule, RuleContext};
use crate::types::finding::{ComponentRole, Finding, FindingKind};

#[derive(Debug, Default)]
pub struct BeanMetadataRule;

impl BeanMetadataRule {
    pub fn new() -> Self {
        Self
    }
}

fn describes(owner: &Bean, arg: &TypeRef) -> bool {
    match &owner.kind {
        BeanKind::ProducerMethod { .. } | BeanKind::ProducerField { .. } => owner.has_type(arg),
        _ => arg.raw_name() == Some(owner.class_name.as_str()),
    }
}

fn check(owner: &Bean, ip: &InjectionPoint, out: &mut Vec<Finding>) {
    let ty = &ip.required_type;
    let intercepted = ip.has_qualifier(Qualifier::INTERCEPTED);
    let decorated = ip.has_qualifier(Qualifier::DECORATED);

    if intercepted && !owner.kind.is_interceptor() {
        out.push(Finding::new(FindingKind::InvalidBeanMetadataInjectionPointQualifier {
            qualifier: format!("@{}", Qualifier::INTERCEPTED),
            required_kind: ComponentRole::Interceptor,
            injection_point: ip.id,
        }));
    }
    if decorated && !owner.kind.is_decorator() {
        out.push(Finding::new(FindingKind::InvalidBeanMetadataInjectionPointQualifier {
            qualifier: format!("@{}", Qualifier::DECORATED),
            required_kind: ComponentRole::Decorator,
            injection_point: ip.id,
        }));
    }

    let wrong_kind = (ty.is_raw(well_known::INTERCEPTOR) && !owner.kind.is_interceptor())
        || (ty.is_raw(well_known::DECORATOR) && !owner.kind.is_decorator());
    let Some(arg) = ty.type_args().first() else {
        out.push(Finding::new(FindingKind::InvalidBeanMetadataInjectionPointType {
            required_type: ty.clone(),
            injection_point: ip.id,
        }));
        return;
    };
    if wrong_kind {
        out.push(Finding::new(FindingKind::InvalidBeanMetadataInjectionPointType {
            required_type: ty.clone(),
            injection_point: ip.id,
        }));
        return;
    }

    let valid_arg = if intercepted || decorated {
        arg.is_wildcard()
    } else {
        describes(owner, arg)
    };
    if !valid_arg {
        out.push(Finding::new(FindingKind::InvalidBeanMetadataInjectionPointTypeArgument {
            type_argument: arg.clone(),
            injection_point: ip.id,
        }));
    }
}

#[async_trait]
impl Rule for BeanMetadataRule {
    fn id(&self) -> &'static str {
        "bean.bean_metadata"
    }

    fn name(&self) -> &'static str {
        "Invalid bean metadata injection point"
    }

    fn phase(&self) -> Phase {
        Phase::Definition
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        for ip in &ctx.model.injection_points {
            if !ip.is_bean_metadata() {
                continue;
            }
            // Non-bean owners are reported as injection into a non-bean.
            let Some(owner) = ip.owner_bean() else {
                continue;
            };
            check(ctx.model.bean(owner), ip, &mut findings);
        }
        findings
    }
}
