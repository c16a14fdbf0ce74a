//! Graph traversal queries.

use std::collections::{BTreeSet, HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use beancheck_core::model::{BeanId, GraphModel, InjectionPointId};
use beancheck_core::oracle::ResolutionOracle;

use crate::graph::DependencyGraph;

/// Cycles made only of pseudo-scoped beans.
///
/// Returns one closed path per strongly connected component, starting and
/// ending at the component's lowest bean id. Paths are ordered by that id.
pub fn pseudo_scoped_cycles(model: &GraphModel, graph: &DependencyGraph) -> Vec<Vec<BeanId>> {
    let pseudo: Vec<BeanId> = model
        .beans
        .iter()
        .filter(|b| b.scope.is_pseudo())
        .map(|b| b.id)
        .collect();

    let mut sub: DiGraph<BeanId, ()> = DiGraph::with_capacity(pseudo.len(), 0);
    let mut index: Vec<Option<NodeIndex>> = vec![None; model.beans.len()];
    for bean in &pseudo {
        index[bean.0] = Some(sub.add_node(*bean));
    }
    for bean in &pseudo {
        for (_, target) in graph.dependencies(*bean) {
            if let (Some(from), Some(to)) = (index[bean.0], index[target.0]) {
                sub.update_edge(from, to, ());
            }
        }
    }

    let mut cycles: Vec<Vec<BeanId>> = tarjan_scc(&sub)
        .into_iter()
        .filter_map(|component| {
            let members: BTreeSet<BeanId> = component.iter().map(|n| sub[*n]).collect();
            let start = *members.iter().next()?;
            let looped = members.len() > 1
                || graph.dependencies(start).iter().any(|(_, t)| *t == start);
            if !looped {
                return None;
            }
            closed_path(graph, start, &members)
        })
        .collect();
    cycles.sort_by_key(|path| path.first().copied());
    cycles
}

/// Depth-first search for a path from `start` back to itself that stays
/// inside `members`. Successors are visited in ascending id order.
fn closed_path(
    graph: &DependencyGraph,
    start: BeanId,
    members: &BTreeSet<BeanId>,
) -> Option<Vec<BeanId>> {
    let successors = |bean: BeanId| -> Vec<BeanId> {
        let mut next: Vec<BeanId> = graph
            .dependencies(bean)
            .into_iter()
            .map(|(_, t)| t)
            .filter(|t| members.contains(t))
            .collect();
        next.dedup();
        next
    };

    let mut path = vec![start];
    let mut visited: HashSet<BeanId> = HashSet::from([start]);
    let mut stack: Vec<std::vec::IntoIter<BeanId>> = vec![successors(start).into_iter()];

    while let Some(frontier) = stack.last_mut() {
        match frontier.next() {
            Some(next) if next == start => {
                path.push(start);
                return Some(path);
            }
            Some(next) if visited.insert(next) => {
                path.push(next);
                stack.push(successors(next).into_iter());
            }
            Some(_) => {}
            None => {
                stack.pop();
                path.pop();
            }
        }
    }
    None
}

/// A non-passivation-capable pseudo-scoped bean reached from a passivating
/// component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassivationHazard {
    pub injection_point: InjectionPointId,
    pub dependency: BeanId,
}

/// Walk from `roots` through non-transient instance-state injection points
/// (see
/// [`InjectionPoint::is_instance_state`](beancheck_core::model::InjectionPoint::is_instance_state)), descending into
/// passivation-capable `@Dependent` beans whose state travels with their
/// owner. Normal-scoped targets are reached through a serializable proxy and
/// end the walk.
pub fn passivation_hazards(
    model: &GraphModel,
    graph: &DependencyGraph,
    oracle: &dyn ResolutionOracle,
    roots: &[InjectionPointId],
) -> Vec<PassivationHazard> {
    let mut hazards = Vec::new();
    let mut seen_beans: HashSet<BeanId> = HashSet::new();
    let mut queue: VecDeque<InjectionPointId> = roots.iter().copied().collect();

    while let Some(ip_id) = queue.pop_front() {
        let ip = model.injection_point(ip_id);
        if ip.is_transient() || !ip.is_instance_state() {
            continue;
        }
        let Some(target_id) = graph.resolved_bean(ip_id) else {
            continue;
        };
        let target = model.bean(target_id);
        if target.scope.is_normal() {
            continue;
        }
        if !oracle.is_passivation_capable(target) {
            hazards.push(PassivationHazard {
                injection_point: ip_id,
                dependency: target_id,
            });
            continue;
        }
        if target.scope.is_dependent() && seen_beans.insert(target_id) {
            queue.extend(target.injection_points.iter().copied());
        }
    }
    hazards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Exclusions;
    use crate::testing::ModelBuilder;
    use beancheck_core::model::{MethodRole, Scope};
    use beancheck_core::oracle::StaticResolver;
    use beancheck_core::types::TypeRef;

    fn build(model: &GraphModel) -> DependencyGraph {
        DependencyGraph::build(model, &StaticResolver::new(), &Exclusions::default())
            .expect("graph")
    }

    fn triangle(scope_of_c: Scope) -> (GraphModel, [BeanId; 3]) {
        let mut b = ModelBuilder::new();
        let a = b.bean("A", Scope::dependent());
        let bb = b.bean("B", Scope::dependent());
        let c = b.bean("C", scope_of_c);
        b.field(a, "b", TypeRef::class("B"));
        b.field(bb, "c", TypeRef::class("C"));
        b.field(c, "a", TypeRef::class("A"));
        (b.build(), [a, bb, c])
    }

    #[test]
    fn test_pseudo_cycle_path_starts_at_lowest_bean() {
        let (model, [a, b, c]) = triangle(Scope::singleton());
        let cycles = pseudo_scoped_cycles(&model, &build(&model));
        assert_eq!(cycles, vec![vec![a, b, c, a]]);
    }

    #[test]
    fn test_normal_scope_breaks_cycle() {
        let (model, _) = triangle(Scope::application());
        assert!(pseudo_scoped_cycles(&model, &build(&model)).is_empty());
    }

    #[test]
    fn test_self_injection_is_a_cycle() {
        let mut b = ModelBuilder::new();
        let a = b.bean("A", Scope::dependent());
        b.field(a, "me", TypeRef::class("A"));
        let model = b.build();
        assert_eq!(pseudo_scoped_cycles(&model, &build(&model)), vec![vec![a, a]]);
    }

    #[test]
    fn test_two_disjoint_cycles_are_reported_separately() {
        let mut b = ModelBuilder::new();
        let a = b.bean("A", Scope::dependent());
        let bb = b.bean("B", Scope::dependent());
        let c = b.bean("C", Scope::dependent());
        let d = b.bean("D", Scope::dependent());
        b.field(a, "b", TypeRef::class("B"));
        b.field(bb, "a", TypeRef::class("A"));
        b.field(c, "d", TypeRef::class("D"));
        b.field(d, "c", TypeRef::class("C"));
        let model = b.build();
        assert_eq!(
            pseudo_scoped_cycles(&model, &build(&model)),
            vec![vec![a, bb, a], vec![c, d, c]]
        );
    }

    #[test]
    fn test_hazard_through_dependent_chain() {
        let mut b = ModelBuilder::new();
        let orders = b.bean("OrderService", Scope::session());
        let audit = b.bean("AuditTrail", Scope::dependent());
        let logger = b.bean("Logger", Scope::dependent());
        b.bean_mut(audit).passivation_capable = true;
        let root = b.field(orders, "audit", TypeRef::class("AuditTrail"));
        let nested = b.field(audit, "logger", TypeRef::class("Logger"));
        let model = b.build();

        let hazards =
            passivation_hazards(&model, &build(&model), &StaticResolver::new(), &[root]);
        assert_eq!(
            hazards,
            vec![PassivationHazard {
                injection_point: nested,
                dependency: logger,
            }]
        );
    }

    #[test]
    fn test_transient_and_normal_scoped_targets_are_safe() {
        let mut b = ModelBuilder::new();
        let orders = b.bean("OrderService", Scope::session());
        b.bean("Logger", Scope::dependent());
        b.bean("Clock", Scope::application());
        let t = b.transient_field(orders, "logger", TypeRef::class("Logger"));
        let n = b.field(orders, "clock", TypeRef::class("Clock"));
        let model = b.build();

        let hazards =
            passivation_hazards(&model, &build(&model), &StaticResolver::new(), &[t, n]);
        assert!(hazards.is_empty());
    }

    #[test]
    fn test_observer_and_disposer_parameters_form_no_cycle() {
        let mut b = ModelBuilder::new();
        let a = b.bean("A", Scope::dependent());
        let bb = b.bean("B", Scope::dependent());
        b.field(a, "b", TypeRef::class("B"));
        b.param(bb, "onEvent", MethodRole::Observer, TypeRef::class("A"));
        b.param(bb, "dispose", MethodRole::Disposer, TypeRef::class("A"));
        let model = b.build();
        assert!(pseudo_scoped_cycles(&model, &build(&model)).is_empty());
    }

    #[test]
    fn test_producer_parameter_cycle_runs_through_producer() {
        let mut b = ModelBuilder::new();
        let factory = b.bean("ConnectionFactory", Scope::dependent());
        let producer = b.producer_method(factory, "open", TypeRef::class("Connection"));
        b.param(factory, "open", MethodRole::Producer, TypeRef::class("Connection"));
        let model = b.build();
        assert_eq!(
            pseudo_scoped_cycles(&model, &build(&model)),
            vec![vec![producer, producer]]
        );
    }

    #[test]
    fn test_method_parameters_are_not_passivation_roots() {
        let mut b = ModelBuilder::new();
        let orders = b.bean("OrderService", Scope::session());
        b.bean("Logger", Scope::dependent());
        let observed = b.param(orders, "onCheckout", MethodRole::Observer, TypeRef::class("Logger"));
        let disposed = b.param(orders, "close", MethodRole::Disposer, TypeRef::class("Logger"));
        let produced = b.param(orders, "create", MethodRole::Producer, TypeRef::class("Logger"));
        let initialized = b.param(orders, "init", MethodRole::Initializer, TypeRef::class("Logger"));
        let model = b.build();

        let hazards = passivation_hazards(
            &model,
            &build(&model),
            &StaticResolver::new(),
            &[observed, disposed, produced, initialized],
        );
        assert_eq!(hazards.len(), 1);
        assert_eq!(hazards[0].injection_point, initialized);
    }
}
