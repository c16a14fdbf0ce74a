//! Bean dependency graph built from oracle resolutions.
//!
//! Nodes are beans (one per `BeanId`, in model order). Edges run from the
//! depending bean to the bean it depends on and record why:
//! - `Injection`: an injection point of the source resolved to the target.
//!   Only points the source is built from count; a producer method's
//!   parameters belong to the producer bean, observer and disposer
//!   parameters to no bean at all.
//! - `DeclaringBean`: the source is a producer declared on the target
//!
//! Every injection point that takes part in resolution is resolved exactly
//! once here, and the candidate lists are kept so deployment rules never ask
//! the oracle twice.

pub mod traversal;

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use beancheck_core::model::{
    ArchiveId, BeanId, GraphModel, InjectionPoint, InjectionPointId, Member, MethodRole,
};
use beancheck_core::oracle::{PrecedenceContext, ResolutionOracle, ResolutionQuery};

use crate::error::GraphError;
use crate::rules::Exclusions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyEdge {
    Injection(InjectionPointId),
    DeclaringBean,
}

impl DependencyEdge {
    pub fn injection_point(&self) -> Option<InjectionPointId> {
        match self {
            DependencyEdge::Injection(ip) => Some(*ip),
            DependencyEdge::DeclaringBean => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct DependencyGraph {
    pub graph: DiGraph<BeanId, DependencyEdge>,
    nodes: Vec<NodeIndex>,
    resolutions: HashMap<InjectionPointId, Vec<BeanId>>,
}

impl DependencyGraph {
    /// Resolve every injection point that takes part in typesafe resolution
    /// and link beans along unambiguous resolutions.
    pub fn build(
        model: &GraphModel,
        oracle: &dyn ResolutionOracle,
        exclusions: &Exclusions,
    ) -> Result<Self, GraphError> {
        let mut graph = DiGraph::with_capacity(model.beans.len(), model.injection_points.len());
        let nodes: Vec<NodeIndex> = model.beans.iter().map(|b| graph.add_node(b.id)).collect();
        let mut resolutions = HashMap::new();

        for bean in &model.beans {
            if let Some(declaring) = bean.kind.declaring_bean() {
                graph.add_edge(nodes[bean.id.0], nodes[declaring.0], DependencyEdge::DeclaringBean);
            }
        }

        for ip in &model.injection_points {
            if !takes_part_in_resolution(ip) || exclusions.excludes_injection_point(model, ip.id) {
                continue;
            }
            let candidates = oracle.resolve(model, &resolution_query(model, ip));
            if let Some(unknown) = candidates.iter().find(|b| b.0 >= model.beans.len()) {
                return Err(GraphError::Inconsistent(format!(
                    "oracle resolved {} to unknown {}",
                    ip.id, unknown
                )));
            }
            if let ([target], Some(source)) = (candidates.as_slice(), dependent_bean(model, ip)) {
                graph.add_edge(nodes[source.0], nodes[target.0], DependencyEdge::Injection(ip.id));
            }
            resolutions.insert(ip.id, candidates);
        }

        log::debug!(
            "dependency graph: {} beans, {} edges, {} resolved injection points",
            graph.node_count(),
            graph.edge_count(),
            resolutions.len()
        );

        Ok(Self {
            graph,
            nodes,
            resolutions,
        })
    }

    pub fn node(&self, bean: BeanId) -> Option<NodeIndex> {
        self.nodes.get(bean.0).copied()
    }

    /// Candidates the oracle returned for an injection point, if it was
    /// resolved.
    pub fn resolution(&self, ip: InjectionPointId) -> Option<&[BeanId]> {
        self.resolutions.get(&ip).map(Vec::as_slice)
    }

    /// The single bean an injection point resolved to.
    pub fn resolved_bean(&self, ip: InjectionPointId) -> Option<BeanId> {
        match self.resolution(ip) {
            Some([bean]) => Some(*bean),
            _ => None,
        }
    }

    /// Outgoing dependencies of a bean, ordered by target then edge.
    pub fn dependencies(&self, bean: BeanId) -> Vec<(DependencyEdge, BeanId)> {
        let Some(node) = self.node(bean) else {
            return Vec::new();
        };
        let mut deps: Vec<(DependencyEdge, BeanId)> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (*edge.weight(), self.graph[edge.target()]))
            .collect();
        deps.sort_by_key(|(edge, target)| (*target, edge.injection_point()));
        deps
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// The bean whose construction needs `ip` to be satisfied.
fn dependent_bean(model: &GraphModel, ip: &InjectionPoint) -> Option<BeanId> {
    let owner = ip.owner_bean()?;
    if ip.is_instance_state() {
        return Some(owner);
    }
    match &ip.member {
        Member::Parameter {
            method,
            role: MethodRole::Producer,
            ..
        } => model.producer_method_bean(owner, method).map(|b| b.id),
        _ => None,
    }
}

/// Delegate injection points and container-provided types are satisfied by
/// the container itself.
pub fn takes_part_in_resolution(ip: &InjectionPoint) -> bool {
    !ip.delegate && !ip.is_container_provided()
}

/// The archive whose enablement applies to an injection point: the owning
/// bean's archive, or the first archive for non-bean owners.
pub fn precedence_context(model: &GraphModel, ip: &InjectionPoint) -> PrecedenceContext {
    let archive = ip
        .owner_bean()
        .map(|bean| model.bean(bean).archive)
        .unwrap_or(ArchiveId(0));
    PrecedenceContext { archive }
}

pub fn resolution_query(model: &GraphModel, ip: &InjectionPoint) -> ResolutionQuery {
    ResolutionQuery {
        required_type: ip.required_type.clone(),
        qualifiers: ip.effective_qualifiers(),
        context: precedence_context(model, ip),
    }
}
