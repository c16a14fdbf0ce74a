//! Rule: a bean may be specialized by at most one other bean.

use std::collections::BTreeMap;

use async_trait::async_trait;

use beancheck_core::model::BeanId;

use crate::rules::{Phase, Rule, RuleContext};
use crate::types::finding::{Finding, FindingKind};

#[derive(Debug, Default)]
pub struct SpecializationRule;

impl SpecializationRule {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Rule for SpecializationRule {
    fn id(&self) -> &'static str {
        "bean.specialization"
    }

    fn name(&self) -> &'static str {
        "Bean specialized more than once"
    }

    fn phase(&self) -> Phase {
        Phase::Definition
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let mut specializers: BTreeMap<BeanId, Vec<BeanId>> = BTreeMap::new();
        for bean in &ctx.model.beans {
            if let Some(target) = bean.specializes {
                specializers.entry(target).or_default().push(bean.id);
            }
        }

        specializers
            .into_iter()
            .filter(|(_, by)| by.len() > 1)
            .map(|(target, specializers)| {
                Finding::new(FindingKind::BeanSpecializedTooManyTimes {
                    target,
                    specializers,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ModelBuilder;
    use beancheck_core::model::Scope;
    use beancheck_core::oracle::StaticResolver;
    use std::sync::Arc;

    async fn run(specializer_count: usize) -> Vec<Finding> {
        let mut b = ModelBuilder::new();
        let target = b.bean("PaymentService", Scope::dependent());
        for i in 0..specializer_count {
            let s = b.bean(&format!("SpecialPayments{i}"), Scope::dependent());
            b.bean_mut(s).specializes = Some(target);
        }
        let ctx = RuleContext::new(b.arc(), Arc::new(StaticResolver::new()));
        SpecializationRule::new().evaluate(&ctx).await
    }

    #[tokio::test]
    async fn test_zero_and_one_specializer_are_fine() {
        assert!(run(0).await.is_empty());
        assert!(run(1).await.is_empty());
    }

    #[tokio::test]
    async fn test_two_specializers_yield_one_finding() {
        let findings = run(2).await;
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].kind,
            FindingKind::BeanSpecializedTooManyTimes {
                target: BeanId(0),
                specializers: vec![BeanId(1), BeanId(2)],
            }
        );
    }

    #[tokio::test]
    async fn test_every_over_specialized_target_is_reported() {
        let mut b = ModelBuilder::new();
        let first = b.bean("A", Scope::dependent());
        let second = b.bean("B", Scope::dependent());
        for (i, target) in [first, first, second, second].into_iter().enumerate() {
            let s = b.bean(&format!("S{i}"), Scope::dependent());
            b.bean_mut(s).specializes = Some(target);
        }
        let ctx = RuleContext::new(b.arc(), Arc::new(StaticResolver::new()));
        let findings = SpecializationRule::new().evaluate(&ctx).await;
        assert_eq!(findings.len(), 2);
    }
}
