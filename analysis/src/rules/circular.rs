//! Rule: pseudo-scoped beans must not depend on themselves.
//!
//! Without a client proxy in between, a cycle of `@Dependent` or
//! `@Singleton` beans cannot be instantiated.

use async_trait::async_trait;

use crate::graph::traversal::pseudo_scoped_cycles;
use crate::rules::{Phase, Rule, RuleContext};
use crate::types::finding::{Finding, FindingKind};

#[derive(Debug, Default)]
pub struct CircularRule;

impl CircularRule {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Rule for CircularRule {
    fn id(&self) -> &'static str {
        "bean.circular"
    }

    fn name(&self) -> &'static str {
        "Circular pseudo-scoped dependencies"
    }

    fn phase(&self) -> Phase {
        Phase::Deployment
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let Some(graph) = ctx.graph() else {
            log::debug!("{}: no dependency graph, skipping", self.id());
            return Vec::new();
        };
        pseudo_scoped_cycles(&ctx.model, graph)
            .into_iter()
            .filter(|path| !path.iter().any(|b| ctx.exclusions.excludes_bean(*b)))
            .map(|path| FindingKind::PseudoScopedBeanHasCircularReferences { path }.into())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyGraph;
    use crate::rules::Exclusions;
    use crate::testing::ModelBuilder;
    use beancheck_core::model::{BeanId, MethodRole, Scope};
    use beancheck_core::oracle::{ResolutionOracle, StaticResolver};
    use beancheck_core::types::TypeRef;
    use std::sync::Arc;

    async fn evaluate(b: ModelBuilder, exclusions: Exclusions) -> Vec<Finding> {
        let model = b.arc();
        let oracle: Arc<dyn ResolutionOracle> = Arc::new(StaticResolver::new());
        let graph = DependencyGraph::build(&model, oracle.as_ref(), &Exclusions::default())
            .expect("graph");
        let ctx = RuleContext::new(model, oracle).with_graph(Arc::new(graph), Arc::new(exclusions));
        CircularRule::new().evaluate(&ctx).await
    }

    fn triangle(b: &mut ModelBuilder, scope: Scope) -> [BeanId; 3] {
        let a = b.bean("A", Scope::dependent());
        let bb = b.bean("B", Scope::dependent());
        let c = b.bean("C", scope);
        b.field(a, "b", TypeRef::class("B"));
        b.field(bb, "c", TypeRef::class("C"));
        b.field(c, "a", TypeRef::class("A"));
        [a, bb, c]
    }

    #[tokio::test]
    async fn test_pseudo_scoped_triangle() {
        let mut b = ModelBuilder::new();
        let [a, bb, c] = triangle(&mut b, Scope::singleton());
        let findings = evaluate(b, Exclusions::default()).await;
        assert_eq!(
            findings,
            vec![Finding::new(
                FindingKind::PseudoScopedBeanHasCircularReferences {
                    path: vec![a, bb, c, a]
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_normal_scope_breaks_cycle() {
        let mut b = ModelBuilder::new();
        triangle(&mut b, Scope::request());
        assert!(evaluate(b, Exclusions::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_excluded_member_suppresses_cycle() {
        let mut b = ModelBuilder::new();
        let [_, bb, _] = triangle(&mut b, Scope::dependent());
        let mut exclusions = Exclusions::default();
        exclusions.beans.insert(bb);
        assert!(evaluate(b, exclusions).await.is_empty());
    }

    #[tokio::test]
    async fn test_observer_and_disposer_parameters_do_not_close_cycle() {
        let mut b = ModelBuilder::new();
        let a = b.bean("A", Scope::dependent());
        let bb = b.bean("B", Scope::dependent());
        b.field(a, "b", TypeRef::class("B"));
        b.param(bb, "onEvent", MethodRole::Observer, TypeRef::class("A"));
        b.param(bb, "release", MethodRole::Disposer, TypeRef::class("A"));
        assert!(evaluate(b, Exclusions::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_producer_parameter_cycle_is_reported() {
        let mut b = ModelBuilder::new();
        let pool = b.bean("Pool", Scope::dependent());
        let connection = b.producer_method(pool, "open", TypeRef::class("Connection"));
        b.field(pool, "connection", TypeRef::class("Connection"));
        b.param(pool, "open", MethodRole::Producer, TypeRef::class("Connection"));
        let findings = evaluate(b, Exclusions::default()).await;
        assert_eq!(
            findings,
            vec![Finding::new(
                FindingKind::PseudoScopedBeanHasCircularReferences {
                    path: vec![pool, connection, pool]
                }
            )]
        );
    }
}
