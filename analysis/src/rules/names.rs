//! Rule: EL bean names must be unique and must not shadow a dotted path.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::rules::{Phase, Rule, RuleContext};
use crate::types::finding::{Finding, FindingKind};

#[derive(Debug, Default)]
pub struct NamesRule;

impl NamesRule {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Rule for NamesRule {
    fn id(&self) -> &'static str {
        "bean.names"
    }

    fn name(&self) -> &'static str {
        "Ambiguous or prefixing bean name"
    }

    fn phase(&self) -> Phase {
        Phase::Deployment
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let names: BTreeSet<&str> = ctx.beans().filter_map(|b| b.name.as_deref()).collect();
        let mut findings = Vec::new();

        for name in &names {
            let resolved = ctx.oracle.resolve_name(&ctx.model, name);
            if resolved.len() > 1 {
                findings.push(Finding::new(FindingKind::AmbiguousElName {
                    name: name.to_string(),
                    beans: resolved,
                }));
            }
        }

        // `orders` shadows `orders.pending`.
        for name in &names {
            let dotted = format!("{name}.");
            if names.iter().any(|other| other.starts_with(&dotted))
                && !ctx.oracle.resolve_name(&ctx.model, name).is_empty()
            {
                findings.push(Finding::new(FindingKind::BeanNameIsPrefix {
                    name: name.to_string(),
                }));
            }
        }
        findings
    }
}
