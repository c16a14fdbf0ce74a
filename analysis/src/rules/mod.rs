pub mod registry;

pub mod bean_metadata;
pub mod circular;
pub mod component_shape;
pub mod disposal;
pub mod enablement;
pub mod injection_point;
pub mod lifecycle;
pub mod names;
pub mod passivation;
pub mod proxyability;
pub mod resolution;
pub mod specialization;

use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::sync::Arc;

use async_trait::async_trait;

use beancheck_core::model::{Bean, BeanId, GraphModel, InjectionPointId};
use beancheck_core::oracle::ResolutionOracle;

use crate::graph::DependencyGraph;
use crate::types::finding::{Finding, Subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Per-bean checks, run before the dependency graph exists.
    Definition,
    /// Whole-graph checks, run against the dependency graph.
    Deployment,
}

/// Beans and injection points already anchored by a definition error.
/// Deployment rules skip them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    pub beans: HashSet<BeanId>,
    pub injection_points: HashSet<InjectionPointId>,
}

impl Exclusions {
    /// Anchors of the given findings. An injection point takes its owning
    /// bean down with it.
    pub fn from_findings<'a>(
        model: &GraphModel,
        findings: impl IntoIterator<Item = &'a Finding>,
    ) -> Self {
        let mut exclusions = Self::default();
        for finding in findings {
            for subject in finding.subjects() {
                match subject {
                    Subject::Bean(bean) => {
                        exclusions.beans.insert(bean);
                    }
                    Subject::InjectionPoint(ip) => {
                        exclusions.injection_points.insert(ip);
                        if let Some(owner) = model.injection_point(ip).owner_bean() {
                            exclusions.beans.insert(owner);
                        }
                    }
                    Subject::Archive(_) => {}
                }
            }
        }
        exclusions
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty() && self.injection_points.is_empty()
    }

    pub fn excludes_bean(&self, bean: BeanId) -> bool {
        self.beans.contains(&bean)
    }

    /// An injection point is excluded directly or through its owning bean.
    pub fn excludes_injection_point(&self, model: &GraphModel, ip: InjectionPointId) -> bool {
        self.injection_points.contains(&ip)
            || model
                .injection_point(ip)
                .owner_bean()
                .is_some_and(|owner| self.beans.contains(&owner))
    }
}

/// Everything a rule may look at. Cheap to clone for task fan-out.
#[derive(Clone)]
pub struct RuleContext {
    pub model: Arc<GraphModel>,
    pub oracle: Arc<dyn ResolutionOracle>,
    pub graph: Option<Arc<DependencyGraph>>,
    pub exclusions: Arc<Exclusions>,
}

impl RuleContext {
    pub fn new(model: Arc<GraphModel>, oracle: Arc<dyn ResolutionOracle>) -> Self {
        Self {
            model,
            oracle,
            graph: None,
            exclusions: Arc::new(Exclusions::default()),
        }
    }

    pub fn with_graph(mut self, graph: Arc<DependencyGraph>, exclusions: Arc<Exclusions>) -> Self {
        self.graph = Some(graph);
        self.exclusions = exclusions;
        self
    }

    pub fn graph(&self) -> Option<&DependencyGraph> {
        self.graph.as_deref()
    }

    /// Beans not excluded by an earlier definition error.
    pub fn beans(&self) -> impl Iterator<Item = &Bean> {
        self.model
            .beans
            .iter()
            .filter(|b| !self.exclusions.excludes_bean(b.id))
    }
}

impl Debug for RuleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleContext")
            .field("beans", &self.model.beans.len())
            .field("injection_points", &self.model.injection_points.len())
            .field("graph", &self.graph.is_some())
            .field("exclusions", &self.exclusions)
            .finish()
    }
}

/// A single validation rule.
///
/// Rules are pure: they inspect the model, the oracle and the dependency
/// graph and return findings. They do not mutate session state.
#[async_trait]
pub trait Rule: Send + Sync + Debug {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn phase(&self) -> Phase;

    /// Returns findings in a deterministic order (may be empty).
    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ModelBuilder;
    use crate::types::finding::FindingKind;
    use beancheck_core::model::Scope;
    use beancheck_core::oracle::StaticResolver;
    use beancheck_core::types::TypeRef;

    #[derive(Debug)]
    struct DummyRule;

    #[async_trait]
    impl Rule for DummyRule {
        fn id(&self) -> &'static str {
            "dummy.rule"
        }
        fn name(&self) -> &'static str {
            "Dummy Rule"
        }
        fn phase(&self) -> Phase {
            Phase::Definition
        }
        async fn evaluate(&self, _ctx: &RuleContext) -> Vec<Finding> {
            vec![]
        }
    }

    #[test]
    fn test_rule_trait_methods() {
        let rule = DummyRule;
        assert_eq!(rule.id(), "dummy.rule");
        assert_eq!(rule.name(), "Dummy Rule");
        assert_eq!(rule.phase(), Phase::Definition);
    }

    #[tokio::test]
    async fn test_rule_evaluate_empty() {
        let ctx = RuleContext::new(Arc::new(GraphModel::new()), Arc::new(StaticResolver::new()));
        assert!(DummyRule.evaluate(&ctx).await.is_empty());
    }

    #[test]
    fn test_exclusions_cover_owned_injection_points() {
        let mut b = ModelBuilder::new();
        let a = b.bean("A", Scope::dependent());
        let ip = b.field(a, "t", TypeRef::variable("T"));
        let model = b.build();

        let findings = vec![Finding::new(FindingKind::NoDecoratedTypes { decorator: a })];
        let exclusions = Exclusions::from_findings(&model, &findings);
        assert!(exclusions.excludes_bean(a));
        assert!(exclusions.excludes_injection_point(&model, ip));
    }

    #[test]
    fn test_exclusions_from_injection_point_finding_take_owner() {
        let mut b = ModelBuilder::new();
        let a = b.bean("A", Scope::dependent());
        let other = b.bean("B", Scope::dependent());
        let ip = b.field(a, "t", TypeRef::variable("T"));
        let model = b.build();

        let findings = vec![Finding::new(FindingKind::InjectionPointWithTypeVariable {
            injection_point: ip,
        })];
        let exclusions = Exclusions::from_findings(&model, &findings);
        assert!(exclusions.injection_points.contains(&ip));
        assert!(exclusions.excludes_bean(a));
        assert!(!exclusions.excludes_bean(other));
    }
}
