//! Rule: every normal-scoped bean needs a client proxy.
//!
//! The oracle decides proxyability; this rule only maps its reason onto the
//! matching finding. The oracle error is flattened into the finding's
//! parameters and not kept as a cause.

use async_trait::async_trait;

use beancheck_core::error::{UnproxyableError, UnproxyableReason};
use beancheck_core::model::BeanId;

use crate::rules::{Phase, Rule, RuleContext};
use crate::types::finding::{Finding, FindingKind};

#[derive(Debug, Default)]
pub struct ProxyabilityRule;

impl ProxyabilityRule {
    pub fn new() -> Self {
        Self
    }
}

/// Error chain flattened into one line: `outer: inner: root`.
fn chain_detail(err: &UnproxyableError) -> String {
    let mut detail = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

pub(crate) fn classify(bean: BeanId, err: &UnproxyableError) -> FindingKind {
    match err {
        UnproxyableError::NotProxyable { type_name, reason } => {
            let type_name = type_name.clone();
            match reason {
                UnproxyableReason::NoNoArgsConstructor => {
                    FindingKind::NotProxyableNoConstructor { bean, type_name }
                }
                UnproxyableReason::PrivateConstructor { constructor } => {
                    FindingKind::NotProxyablePrivateConstructor {
                        type_name,
                        constructor: constructor.clone(),
                        bean,
                    }
                }
                UnproxyableReason::FinalTypeOrMethod { member } => {
                    FindingKind::NotProxyableFinalTypeOrMethod {
                        bean,
                        member: member.clone(),
                        type_name,
                    }
                }
                UnproxyableReason::Primitive => FindingKind::NotProxyablePrimitive { bean, type_name },
                UnproxyableReason::ArrayType => FindingKind::NotProxyableArrayType { bean, type_name },
                UnproxyableReason::Unknown(detail) => FindingKind::NotProxyableUnknown {
                    bean,
                    detail: detail.clone(),
                },
            }
        }
        UnproxyableError::Undetermined { .. } => FindingKind::NotProxyableUnknown {
            bean,
            detail: chain_detail(err),
        },
    }
}

#[async_trait]
impl Rule for ProxyabilityRule {
    fn id(&self) -> &'static str {
        "bean.proxyability"
    }

    fn name(&self) -> &'static str {
        "Normal-scoped bean is not proxyable"
    }

    fn phase(&self) -> Phase {
        Phase::Deployment
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        for bean in ctx.beans().filter(|b| b.scope.is_normal()) {
            if let Err(err) = ctx.oracle.bean_proxyability(&ctx.model, bean) {
                log::trace!("{} is not proxyable: {}", bean.describe(), err);
                findings.push(Finding::new(classify(bean.id, &err)));
            }
        }
        findings
    }
}
