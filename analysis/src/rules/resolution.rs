//! Rule: every injection point resolves to exactly one bean.
//!
//! Unsatisfied injection points carry hints explaining the near miss.
//! A unique normal-scoped candidate additionally needs a proxyable required
//! type; the oracle's failure is kept as the finding's cause.

use async_trait::async_trait;

use beancheck_core::model::InjectionPoint;

use crate::graph::{precedence_context, takes_part_in_resolution};
use crate::rules::{Phase, Rule, RuleContext};
use crate::types::finding::{Finding, FindingKind, UnsatisfiedHint};

#[derive(Debug, Default)]
pub struct ResolutionRule;

impl ResolutionRule {
    pub fn new() -> Self {
        Self
    }
}

fn unsatisfied_hints(ctx: &RuleContext, ip: &InjectionPoint) -> Vec<UnsatisfiedHint> {
    let mut hints = Vec::new();
    let by_type = ctx.oracle.resolve_by_type(
        &ctx.model,
        &ip.required_type,
        precedence_context(&ctx.model, ip),
    );
    if !by_type.is_empty() {
        hints.push(UnsatisfiedHint::QualifiersDontMatch { beans: by_type });
    }
    if let Some(ignored) = ctx.oracle.ignored_class(&ip.required_type) {
        hints.push(UnsatisfiedHint::ClassIgnored {
            class_name: ignored.class_name,
            missing: ignored.missing,
        });
    }
    hints
}

#[async_trait]
impl Rule for ResolutionRule {
    fn id(&self) -> &'static str {
        "bean.resolution"
    }

    fn name(&self) -> &'static str {
        "Unsatisfied, ambiguous or unproxyable dependency"
    }

    fn phase(&self) -> Phase {
        Phase::Deployment
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let Some(graph) = ctx.graph() else {
            log::debug!("{}: no dependency graph, skipping", self.id());
            return Vec::new();
        };
        let model = &ctx.model;
        let mut findings = Vec::new();

        for ip in &model.injection_points {
            if !takes_part_in_resolution(ip) || ctx.exclusions.excludes_injection_point(model, ip.id)
            {
                continue;
            }
            let Some(candidates) = graph.resolution(ip.id) else {
                continue;
            };
            match candidates {
                [] => findings.push(Finding::new(
                    FindingKind::InjectionPointHasUnsatisfiedDependencies {
                        injection_point: ip.id,
                        qualifiers: ip.effective_qualifiers(),
                        required_type: ip.required_type.clone(),
                        hints: unsatisfied_hints(ctx, ip),
                    },
                )),
                [single] => {
                    if !model.bean(*single).scope.is_normal() {
                        continue;
                    }
                    if let Err(cause) = ctx.oracle.type_proxyability(&ip.required_type) {
                        findings.push(Finding::with_cause(
                            FindingKind::InjectionPointHasNonProxyableDependencies {
                                injection_point: ip.id,
                            },
                            cause,
                        ));
                    }
                }
                many => findings.push(Finding::new(
                    FindingKind::InjectionPointHasAmbiguousDependencies {
                        injection_point: ip.id,
                        qualifiers: ip.effective_qualifiers(),
                        required_type: ip.required_type.clone(),
                        candidates: many.to_vec(),
                    },
                )),
            }
        }
        findings
    }
}
