//! Rule: interceptors and decorators must not declare beans or observers,
//! must be `@Dependent`, and decorators must decorate at least one type.

use async_trait::async_trait;

use beancheck_core::model::{Bean, BeanKind};

use crate::rules::{Phase, Rule, RuleContext};
use crate::types::finding::{Finding, FindingKind};

#[derive(Debug, Default)]
pub struct ComponentShapeRule;

impl ComponentShapeRule {
    pub fn new() -> Self {
        Self
    }
}

fn check_interceptor(bean: &Bean, out: &mut Vec<Finding>) {
    let id = bean.id;
    let members = &bean.members;
    if !members.producer_methods.is_empty() {
        out.push(FindingKind::InterceptorsCannotHaveProducerMethods { interceptor: id }.into());
    }
    if !members.producer_fields.is_empty() {
        out.push(FindingKind::InterceptorsCannotHaveProducerFields { interceptor: id }.into());
    }
    if !members.disposer_methods.is_empty() {
        out.push(FindingKind::InterceptorsCannotHaveDisposerMethods { interceptor: id }.into());
    }
    if !members.observer_methods.is_empty() {
        out.push(FindingKind::InterceptorsCannotHaveObserverMethods { interceptor: id }.into());
    }
}

fn check_decorator(bean: &Bean, out: &mut Vec<Finding>) {
    let id = bean.id;
    let members = &bean.members;
    if !members.producer_methods.is_empty() {
        out.push(FindingKind::DecoratorsCannotHaveProducerMethods { decorator: id }.into());
    }
    if !members.producer_fields.is_empty() {
        out.push(FindingKind::DecoratorsCannotHaveProducerFields { decorator: id }.into());
    }
    if !members.disposer_methods.is_empty() {
        out.push(FindingKind::DecoratorsCannotHaveDisposerMethods { decorator: id }.into());
    }
    if !members.observer_methods.is_empty() {
        out.push(FindingKind::DecoratorsCannotHaveObserverMethods { decorator: id }.into());
    }
    if let BeanKind::Decorator(info) = &bean.kind {
        if info.decorated_types.is_empty() {
            out.push(FindingKind::NoDecoratedTypes { decorator: id }.into());
        }
    }
}

#[async_trait]
impl Rule for ComponentShapeRule {
    fn id(&self) -> &'static str {
        "bean.component_shape"
    }

    fn name(&self) -> &'static str {
        "Malformed interceptor or decorator"
    }

    fn phase(&self) -> Phase {
        Phase::Definition
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        for bean in &ctx.model.beans {
            match &bean.kind {
                BeanKind::Interceptor(_) => check_interceptor(bean, &mut findings),
                BeanKind::Decorator(_) => check_decorator(bean, &mut findings),
                _ => continue,
            }
            if !bean.scope.is_dependent() {
                findings.push(FindingKind::InterceptorMustBeDependent { component: bean.id }.into());
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ModelBuilder;
    use beancheck_core::model::{DecoratorInfo, Scope};
    use beancheck_core::oracle::StaticResolver;
    use beancheck_core::types::TypeRef;
    use std::sync::Arc;

    async fn evaluate(b: ModelBuilder) -> Vec<Finding> {
        let ctx = RuleContext::new(b.arc(), Arc::new(StaticResolver::new()));
        ComponentShapeRule::new().evaluate(&ctx).await
    }

    #[tokio::test]
    async fn test_decorator_with_producer_and_observer_yields_two_findings() {
        let mut b = ModelBuilder::new();
        let deco = b.decorator("TimingDecorator", TypeRef::class("Orders"));
        b.bean_mut(deco).members.producer_methods.push("clock".into());
        b.bean_mut(deco).members.observer_methods.push("onStart".into());
        let findings = evaluate(b).await;
        assert_eq!(
            findings.iter().map(|f| f.kind.clone()).collect::<Vec<_>>(),
            vec![
                FindingKind::DecoratorsCannotHaveProducerMethods { decorator: deco },
                FindingKind::DecoratorsCannotHaveObserverMethods { decorator: deco },
            ]
        );
    }

    #[tokio::test]
    async fn test_interceptor_member_categories() {
        let mut b = ModelBuilder::new();
        let audit = b.interceptor("AuditInterceptor");
        let members = &mut b.bean_mut(audit).members;
        members.producer_fields.push("auditLog".into());
        members.disposer_methods.push(beancheck_core::model::DisposerMethod {
            name: "close".into(),
            disposed_type: TypeRef::class("AuditLog"),
            qualifiers: vec![],
        });
        let ids: Vec<u16> = evaluate(b).await.iter().map(Finding::id).collect();
        assert_eq!(ids, vec![1432, 1433]);
    }

    #[tokio::test]
    async fn test_decorator_without_types_and_wrong_scope() {
        let mut b = ModelBuilder::new();
        let deco = b.decorator("TimingDecorator", TypeRef::class("Orders"));
        b.bean_mut(deco).kind = BeanKind::Decorator(DecoratorInfo::default());
        b.bean_mut(deco).scope = Scope::application();
        let ids: Vec<u16> = evaluate(b).await.iter().map(Finding::id).collect();
        assert_eq!(ids, vec![1455, 1476]);
    }

    #[tokio::test]
    async fn test_plain_beans_are_ignored() {
        let mut b = ModelBuilder::new();
        let factory = b.bean("LoggerFactory", Scope::application());
        b.bean_mut(factory).members.producer_methods.push("logger".into());
        assert!(evaluate(b).await.is_empty());
    }
}
