use std::collections::HashSet;
use std::sync::Arc;

use crate::rules::{Phase, Rule};

// Definition rules
use crate::rules::bean_metadata::BeanMetadataRule;
use crate::rules::component_shape::ComponentShapeRule;
use crate::rules::disposal::DisposalRule;
use crate::rules::injection_point::InjectionPointRule;
use crate::rules::lifecycle::LifecycleRule;
use crate::rules::specialization::SpecializationRule;

// Deployment rules
use crate::rules::circular::CircularRule;
use crate::rules::enablement::EnablementRule;
use crate::rules::names::NamesRule;
use crate::rules::passivation::PassivationRule;
use crate::rules::proxyability::ProxyabilityRule;
use crate::rules::resolution::ResolutionRule;

#[derive(Debug, Default, Clone)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn all(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    /// Get a rule by ID.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Rule>> {
        self.rules.iter().find(|r| r.id() == id).cloned()
    }

    /// Check if a rule exists.
    pub fn contains(&self, id: &str) -> bool {
        self.rules.iter().any(|r| r.id() == id)
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules of one phase, in registration order.
    pub fn for_phase(&self, phase: Phase) -> Vec<Arc<dyn Rule>> {
        self.rules
            .iter()
            .filter(|r| r.phase() == phase)
            .cloned()
            .collect()
    }

    /// Create a new registry containing only rules with the given IDs.
    ///
    /// Rules not found are silently ignored.
    pub fn filter_by_ids(&self, ids: &[String]) -> Self {
        let id_set: HashSet<&str> = ids.iter().map(|s| s.as_str()).collect();
        let filtered_rules: Vec<Arc<dyn Rule>> = self
            .rules
            .iter()
            .filter(|r| id_set.contains(r.id()))
            .cloned()
            .collect();

        Self {
            rules: filtered_rules,
        }
    }

    /// Convenience factory to build a registry with built-in rules.
    ///
    /// Registration order is report order.
    pub fn with_builtin_rules() -> Self {
        let mut registry = RuleRegistry::new();

        registry.register(Arc::new(SpecializationRule::new()));
        registry.register(Arc::new(InjectionPointRule::new()));
        registry.register(Arc::new(BeanMetadataRule::new()));
        registry.register(Arc::new(ComponentShapeRule::new()));
        registry.register(Arc::new(LifecycleRule::new()));
        registry.register(Arc::new(DisposalRule::new()));

        registry.register(Arc::new(ResolutionRule::new()));
        registry.register(Arc::new(NamesRule::new()));
        registry.register(Arc::new(ProxyabilityRule::new()));
        registry.register(Arc::new(PassivationRule::new()));
        registry.register(Arc::new(CircularRule::new()));
        registry.register(Arc::new(EnablementRule::new()));

        registry
    }
}
