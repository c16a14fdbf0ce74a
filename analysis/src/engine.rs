use std::sync::Arc;

use arc_swap::ArcSwap;

use beancheck_core::model::GraphModel;
use beancheck_core::oracle::ResolutionOracle;

use crate::config::ValidatorConfig;
use crate::error::EngineError;
use crate::rules::registry::RuleRegistry;
use crate::session::ValidationSession;
use crate::types::report::ValidationReport;

/// The bean graph validator.
///
/// Thread-safe and designed for concurrent use. Configuration and rules can
/// be hot-swapped via `ArcSwap`; a validation pass works on the snapshot it
/// loaded when it started.
///
/// # Usage
///
/// ```rust,ignore
/// use beancheck_analysis::Engine;
/// use beancheck_core::StaticResolver;
///
/// let engine = Engine::with_default_config();
///
/// // Validate with all built-in rules
/// let report = engine.validate(model, Arc::new(StaticResolver::new())).await?;
///
/// // Or with a subset of rules
/// let report = engine.validate_with_rules(model, oracle, &rule_ids).await?;
///
/// // Refuse the deployment on fatal findings
/// let warnings = report.into_result()?;
/// ```
pub struct Engine {
    pub config: ArcSwap<ValidatorConfig>,
    pub rule_registry: ArcSwap<RuleRegistry>,
}

impl Engine {
    /// Create a new engine with the given configuration and rules.
    pub fn new(config: ValidatorConfig, rule_registry: RuleRegistry) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            rule_registry: ArcSwap::from_pointee(rule_registry),
        }
    }

    /// Convenience constructor with default configuration and built-in rules.
    pub fn with_default_config() -> Self {
        Self::new(ValidatorConfig::default(), RuleRegistry::with_builtin_rules())
    }

    /// Convenience constructor with default config and an empty registry.
    ///
    /// Useful for testing when you want to register rules manually.
    pub fn with_defaults_and_builtin_rules() -> Self {
        Self::new(ValidatorConfig::default(), RuleRegistry::new())
    }

    /// Main entry point: validate a frozen model and return every finding.
    ///
    /// The engine is stateless between calls; all state lives inside the call.
    /// An `Err` means the validator itself could not run. A deployment that
    /// must be refused comes back as an `Ok` report with `fatal` set.
    pub async fn validate(
        &self,
        model: Arc<GraphModel>,
        oracle: Arc<dyn ResolutionOracle>,
    ) -> Result<ValidationReport, EngineError> {
        let rules = self.rule_registry.load_full();
        self.run(model, oracle, rules).await
    }

    /// Validate with a specific set of rules (by ID).
    ///
    /// Rules not found in the registry are silently ignored.
    pub async fn validate_with_rules(
        &self,
        model: Arc<GraphModel>,
        oracle: Arc<dyn ResolutionOracle>,
        rule_ids: &[String],
    ) -> Result<ValidationReport, EngineError> {
        let full_registry = self.rule_registry.load_full();
        let filtered_registry = full_registry.filter_by_ids(rule_ids);
        self.run(model, oracle, Arc::new(filtered_registry)).await
    }

    async fn run(
        &self,
        model: Arc<GraphModel>,
        oracle: Arc<dyn ResolutionOracle>,
        rules: Arc<RuleRegistry>,
    ) -> Result<ValidationReport, EngineError> {
        let config = self.config.load_full();
        config.validate()?;
        log::debug!(
            "validating {} bean(s), {} injection point(s) with {} rule(s)",
            model.beans.len(),
            model.injection_points.len(),
            rules.len()
        );
        let mut session = ValidationSession::new(model, oracle, rules, (*config).clone());
        session.run().await
    }

    /// Get the rule registry.
    pub fn rules(&self) -> arc_swap::Guard<Arc<RuleRegistry>> {
        self.rule_registry.load()
    }

    /// Get the current configuration.
    pub fn config(&self) -> arc_swap::Guard<Arc<ValidatorConfig>> {
        self.config.load()
    }
}
