//! Rule: every disposer method must pair with a producer declared on the same
//! bean that produces the disposed type with matching qualifiers.
//!
//! All unpaired disposers are reported together in one finding.

use async_trait::async_trait;

use beancheck_core::model::{Bean, DisposerMethod, GraphModel};
use beancheck_core::types::Qualifier;

use crate::rules::{Phase, Rule, RuleContext};
use crate::types::finding::{DisposerRef, Finding, FindingKind};

#[derive(Debug, Default)]
pub struct DisposalRule;

impl DisposalRule {
    pub fn new() -> Self {
        Self
    }
}

fn has_producer(model: &GraphModel, declaring: &Bean, disposer: &DisposerMethod) -> bool {
    let required = if disposer.qualifiers.is_empty() {
        vec![Qualifier::default_qualifier()]
    } else {
        disposer.qualifiers.clone()
    };
    model
        .beans
        .iter()
        .filter(|b| b.kind.declaring_bean() == Some(declaring.id))
        .filter(|b| b.has_type(&disposer.disposed_type))
        .any(|producer| {
            let carried = producer.effective_qualifiers();
            required
                .iter()
                .all(|r| carried.iter().any(|q| q.satisfies(r)))
        })
}

#[async_trait]
impl Rule for DisposalRule {
    fn id(&self) -> &'static str {
        "bean.disposal"
    }

    fn name(&self) -> &'static str {
        "Disposer method without producer"
    }

    fn phase(&self) -> Phase {
        Phase::Definition
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let model = &ctx.model;
        let disposers: Vec<DisposerRef> = model
            .beans
            .iter()
            // Interceptors and decorators are reported for declaring disposers at all.
            .filter(|b| !b.kind.is_interceptor() && !b.kind.is_decorator())
            .flat_map(|bean| {
                bean.members
                    .disposer_methods
                    .iter()
                    .filter(move |d| !has_producer(model, bean, d))
                    .map(move |d| DisposerRef {
                        bean: bean.id,
                        method: d.name.clone(),
                    })
            })
            .collect();

        if disposers.is_empty() {
            Vec::new()
        } else {
            vec![Finding::new(FindingKind::DisposalMethodsWithoutProducer { disposers })]
        }
    }
}
