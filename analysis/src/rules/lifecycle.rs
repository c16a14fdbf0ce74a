//! Rule: interception method signatures.
//!
//! | method                    | declared on        | returns        | parameters           |
//! |---------------------------|--------------------|----------------|----------------------|
//! | around-invoke / -timeout  | any class          | Object         | one InvocationContext|
//! | lifecycle callback        | interceptor class  | Object or void | one InvocationContext|
//! | lifecycle callback        | target class       | void           | none                 |
//!
//! Lifecycle callbacks that declare checked exceptions only draw a warning.

use async_trait::async_trait;

use beancheck_core::model::{Bean, InterceptionMethod};
use beancheck_core::types::well_known;

use crate::rules::{Phase, Rule, RuleContext};
use crate::types::finding::{Finding, FindingKind, MethodRef};

#[derive(Debug, Default)]
pub struct LifecycleRule;

impl LifecycleRule {
    pub fn new() -> Self {
        Self
    }
}

fn method_ref(bean: &Bean, method: &InterceptionMethod) -> MethodRef {
    MethodRef {
        bean: bean.id,
        method: method.name.clone(),
        declaring_class: method.declaring_class.clone(),
        kind: method.kind.clone(),
    }
}

fn check_invocation_context_parameter(
    method: &InterceptionMethod,
    at: &MethodRef,
    out: &mut Vec<Finding>,
) {
    match method.parameters.as_slice() {
        [param] if param.is_raw(well_known::INVOCATION_CONTEXT) => {}
        [_] => out.push(Finding::new(
            FindingKind::InterceptorMethodDoesNotHaveCorrectTypeOfParameter {
                method: at.clone(),
                expected: well_known::INVOCATION_CONTEXT.to_string(),
            },
        )),
        _ => out.push(Finding::new(
            FindingKind::InterceptorMethodDoesNotHaveExactlyOneParameter { method: at.clone() },
        )),
    }
}

fn check(bean: &Bean, method: &InterceptionMethod, out: &mut Vec<Finding>) {
    let at = method_ref(bean, method);
    let returns_object = method.return_type.is_raw(well_known::OBJECT);
    let returns_void = method.return_type.is_raw(well_known::VOID);

    if method.kind.is_around_invoke() {
        if !returns_object {
            out.push(Finding::new(FindingKind::InterceptorMethodDoesNotReturnObject {
                method: at.clone(),
                expected: well_known::OBJECT.to_string(),
            }));
        }
        check_invocation_context_parameter(method, &at, out);
        return;
    }

    if bean.kind.is_interceptor() {
        if !returns_object && !returns_void {
            out.push(Finding::new(FindingKind::InterceptorMethodDoesNotReturnObjectOrVoid {
                method: at.clone(),
            }));
        }
        check_invocation_context_parameter(method, &at, out);
    } else {
        if !returns_void {
            out.push(Finding::new(FindingKind::InterceptorMethodDoesNotHaveVoidReturnType {
                method: at.clone(),
            }));
        }
        if !method.parameters.is_empty() {
            out.push(Finding::new(FindingKind::InterceptorMethodDoesNotHaveZeroParameters {
                method: at.clone(),
            }));
        }
    }

    for exception in method.exceptions.iter().filter(|e| e.checked) {
        out.push(Finding::new(
            FindingKind::InterceptorMethodShouldNotThrowCheckedExceptions {
                method: at.clone(),
                exception: exception.name.clone(),
            },
        ));
    }
}

#[async_trait]
impl Rule for LifecycleRule {
    fn id(&self) -> &'static str {
        "bean.lifecycle"
    }

    fn name(&self) -> &'static str {
        "Invalid interception method signature"
    }

    fn phase(&self) -> Phase {
        Phase::Definition
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        for bean in &ctx.model.beans {
            for method in &bean.lifecycle_methods {
                check(bean, method, &mut findings);
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ModelBuilder;
    use crate::types::finding::Severity;
    use beancheck_core::model::{BeanId, DeclaredException, InterceptionKind, Scope};
    use beancheck_core::oracle::StaticResolver;
    use beancheck_core::types::TypeRef;
    use std::sync::Arc;

    fn method(kind: InterceptionKind, ret: TypeRef, params: Vec<TypeRef>) -> InterceptionMethod {
        InterceptionMethod {
            name: "intercept".into(),
            declaring_class: "Declaring".into(),
            kind,
            return_type: ret,
            parameters: params,
            exceptions: vec![],
        }
    }

    fn ctx_param() -> TypeRef {
        TypeRef::class("InvocationContext")
    }

    fn object() -> TypeRef {
        TypeRef::class("Object")
    }

    fn void() -> TypeRef {
        TypeRef::primitive("void")
    }

    async fn evaluate(on_interceptor: bool, methods: Vec<InterceptionMethod>) -> Vec<Finding> {
        let mut b = ModelBuilder::new();
        let bean: BeanId = if on_interceptor {
            b.interceptor("AuditInterceptor")
        } else {
            b.bean("OrderService", Scope::dependent())
        };
        b.bean_mut(bean).lifecycle_methods = methods;
        let ctx = RuleContext::new(b.arc(), Arc::new(StaticResolver::new()));
        LifecycleRule::new().evaluate(&ctx).await
    }

    fn ids(findings: &[Finding]) -> Vec<u16> {
        findings.iter().map(Finding::id).collect()
    }

    #[tokio::test]
    async fn test_well_formed_methods() {
        let methods = vec![
            method(InterceptionKind::AroundInvoke, object(), vec![ctx_param()]),
            method(InterceptionKind::PostConstruct, void(), vec![ctx_param()]),
        ];
        assert!(evaluate(true, methods).await.is_empty());
        let target = vec![method(InterceptionKind::PostConstruct, void(), vec![])];
        assert!(evaluate(false, target).await.is_empty());
    }

    #[tokio::test]
    async fn test_around_invoke_shape() {
        let methods = vec![
            method(InterceptionKind::AroundInvoke, void(), vec![ctx_param()]),
            method(InterceptionKind::AroundTimeout, object(), vec![]),
            method(InterceptionKind::AroundInvoke, object(), vec![object()]),
        ];
        assert_eq!(ids(&evaluate(true, methods).await), vec![1447, 1448, 1449]);
    }

    #[tokio::test]
    async fn test_interceptor_class_callback_shape() {
        let methods = vec![method(
            InterceptionKind::PreDestroy,
            TypeRef::class("String"),
            vec![ctx_param(), ctx_param()],
        )];
        assert_eq!(ids(&evaluate(true, methods).await), vec![1467, 1448]);
    }

    #[tokio::test]
    async fn test_target_class_callback_shape() {
        let methods = vec![method(InterceptionKind::PostConstruct, object(), vec![ctx_param()])];
        assert_eq!(ids(&evaluate(false, methods).await), vec![1468, 1469]);
    }

    #[tokio::test]
    async fn test_checked_exception_is_a_warning() {
        let mut m = method(InterceptionKind::PostConstruct, void(), vec![]);
        m.exceptions = vec![
            DeclaredException {
                name: "IOException".into(),
                checked: true,
            },
            DeclaredException {
                name: "IllegalStateException".into(),
                checked: false,
            },
        ];
        let findings = evaluate(false, vec![m]).await;
        assert_eq!(ids(&findings), vec![1471]);
        assert_eq!(findings[0].severity(), Severity::Warning);
    }
}
