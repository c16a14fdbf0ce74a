//! Rule: shape of individual injection points.
//!
//! Checks what can be decided from the injection point and its owner alone:
//! qualifier combinations, type variables and raw container types, and where
//! `InjectionPoint`, `EventMetadata` and `UserTransaction` may be injected.

use async_trait::async_trait;

use beancheck_core::model::{GraphModel, InjectionPoint, MethodRole};
use beancheck_core::types::{well_known, Qualifier};

use crate::rules::{Phase, Rule, RuleContext};
use crate::types::finding::{Finding, FindingKind};

#[derive(Debug, Default)]
pub struct InjectionPointRule;

impl InjectionPointRule {
    pub fn new() -> Self {
        Self
    }
}

fn check(model: &GraphModel, ip: &InjectionPoint, out: &mut Vec<Finding>) {
    let id = ip.id;
    let mut push = |kind: FindingKind| out.push(Finding::new(kind));

    if ip.has_qualifier(Qualifier::NEW) && ip.qualifiers.len() > 1 {
        push(FindingKind::NewWithQualifiers { injection_point: id });
    }

    if ip.is_injection_point_metadata() {
        match ip.owner_bean().map(|bean| model.bean(bean)) {
            None => push(FindingKind::InjectionIntoNonBean { injection_point: id }),
            Some(owner) if !owner.scope.is_dependent() => {
                push(FindingKind::InjectionIntoNonDependentBean { injection_point: id })
            }
            Some(_) if ip.method_role() == Some(MethodRole::Disposer) => {
                push(FindingKind::InjectionIntoDisposerMethod { injection_point: id })
            }
            Some(_) => {}
        }
    }

    if ip.is_event_metadata() && ip.method_role() != Some(MethodRole::Observer) {
        push(FindingKind::EventMetadataInjectedOutsideOfObserver { injection_point: id });
    }

    if ip.required_type.is_variable() {
        push(FindingKind::InjectionPointWithTypeVariable { injection_point: id });
    }

    if !ip.is_field() && ip.qualifiers.iter().any(Qualifier::is_unnamed_named) {
        push(FindingKind::NonFieldInjectionPointCannotUseNamed { injection_point: id });
    }

    let ty = &ip.required_type;
    if ty.is_raw(well_known::INSTANCE) || ty.is_raw(well_known::EVENT) {
        if ty.is_raw_class() {
            push(FindingKind::InjectionPointMustHaveTypeParameter {
                required_type: ty.clone(),
                injection_point: id,
            });
        } else if ty.type_args().iter().any(|arg| arg.is_wildcard()) {
            push(FindingKind::InjectionPointHasWildcard {
                required_type: ty.clone(),
                injection_point: id,
            });
        }
    }

    for scope in &ip.scope_annotations {
        push(FindingKind::ScopeAnnotationOnInjectionPoint {
            scope: scope.clone(),
            injection_point: id,
        });
    }

    if ty.is_raw(well_known::USER_TRANSACTION)
        && ip
            .owner_bean()
            .is_some_and(|bean| model.bean(bean).container_managed_transactions)
    {
        push(FindingKind::UserTransactionInjectionIntoBeanWithContainerManagedTransactions {
            injection_point: id,
        });
    }
}

#[async_trait]
impl Rule for InjectionPointRule {
    fn id(&self) -> &'static str {
        "bean.injection_point"
    }

    fn name(&self) -> &'static str {
        "Malformed injection point"
    }

    fn phase(&self) -> Phase {
        Phase::Definition
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        for ip in &ctx.model.injection_points {
            check(&ctx.model, ip, &mut findings);
        }
        findings
    }
}
