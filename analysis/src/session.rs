use std::sync::Arc;
use std::time::Instant;

use anyhow::anyhow;
use scc::HashMap as ConcurrentHashMap;
use tokio::sync::Semaphore;

use beancheck_core::model::GraphModel;
use beancheck_core::oracle::ResolutionOracle;

use crate::config::ValidatorConfig;
use crate::error::{EngineError, RuleError, SessionError};
use crate::graph::DependencyGraph;
use crate::rules::registry::RuleRegistry;
use crate::rules::{Exclusions, Phase, Rule, RuleContext};
use crate::types::finding::{Finding, Severity};
use crate::types::report::ValidationReport;

/// State for a single validation pass.
///
/// This is a helper struct that manages the pipeline:
/// 1. Check model consistency
/// 2. Run definition rules
/// 3. Exclude everything anchored by a definition error
/// 4. Build the dependency graph
/// 5. Run deployment rules
pub struct ValidationSession {
    model: Arc<GraphModel>,
    oracle: Arc<dyn ResolutionOracle>,
    rules: Arc<RuleRegistry>,
    config: ValidatorConfig,

    /// Dependency graph, once built.
    graph: Option<Arc<DependencyGraph>>,

    /// Beans and injection points skipped by deployment rules.
    exclusions: Arc<Exclusions>,

    findings: Vec<Finding>,
}

impl ValidationSession {
    pub fn new(
        model: Arc<GraphModel>,
        oracle: Arc<dyn ResolutionOracle>,
        rules: Arc<RuleRegistry>,
        config: ValidatorConfig,
    ) -> Self {
        Self {
            model,
            oracle,
            rules,
            config,
            graph: None,
            exclusions: Arc::new(Exclusions::default()),
            findings: Vec::new(),
        }
    }

    /// Top-level pipeline. Running it again on the same session starts from
    /// scratch and yields the same report.
    pub async fn run(&mut self) -> Result<ValidationReport, EngineError> {
        self.reset();
        self.model.check_consistency()?;

        self.run_definition_phase().await?;
        if self.config.fail_fast && self.findings.iter().any(Finding::is_fatal) {
            log::debug!("definition errors found, skipping deployment phase");
            return Ok(ValidationReport::new(std::mem::take(&mut self.findings)));
        }

        self.compute_exclusions();
        self.build_dependency_graph()?;
        self.run_deployment_phase().await?;

        Ok(ValidationReport::new(std::mem::take(&mut self.findings)))
    }

    fn reset(&mut self) {
        self.graph = None;
        self.exclusions = Arc::new(Exclusions::default());
        self.findings.clear();
    }

    async fn run_definition_phase(&mut self) -> Result<(), EngineError> {
        let ctx = RuleContext::new(Arc::clone(&self.model), Arc::clone(&self.oracle));
        let mut findings = self.run_phase(Phase::Definition, ctx).await?;
        self.findings.append(&mut findings);
        Ok(())
    }

    /// Definition errors anchor their subjects; deployment rules would only
    /// report follow-up noise on them.
    fn compute_exclusions(&mut self) {
        let definition_errors = self
            .findings
            .iter()
            .filter(|f| f.severity() == Severity::DefinitionError);
        let exclusions = Exclusions::from_findings(&self.model, definition_errors);
        if !exclusions.is_empty() {
            log::debug!(
                "excluding {} bean(s) and {} injection point(s) from deployment validation",
                exclusions.beans.len(),
                exclusions.injection_points.len()
            );
        }
        self.exclusions = Arc::new(exclusions);
    }

    fn build_dependency_graph(&mut self) -> Result<(), EngineError> {
        let graph = DependencyGraph::build(&self.model, self.oracle.as_ref(), &self.exclusions)?;
        self.graph = Some(Arc::new(graph));
        Ok(())
    }

    async fn run_deployment_phase(&mut self) -> Result<(), EngineError> {
        let graph = self.graph.clone().ok_or(SessionError::GraphNotBuilt)?;
        let ctx = RuleContext::new(Arc::clone(&self.model), Arc::clone(&self.oracle))
            .with_graph(graph, Arc::clone(&self.exclusions));
        let mut findings = self.run_phase(Phase::Deployment, ctx).await?;
        self.findings.append(&mut findings);
        Ok(())
    }

    /// Run every rule of `phase` and return their findings in registry order.
    async fn run_phase(&self, phase: Phase, ctx: RuleContext) -> Result<Vec<Finding>, EngineError> {
        let rules = self.rules.for_phase(phase);
        let per_rule = if self.config.concurrent_validation {
            evaluate_concurrently(&rules, &ctx, self.config.max_parallel_rules).await?
        } else {
            evaluate_sequentially(&rules, &ctx).await
        };
        let findings: Vec<Finding> = per_rule.into_iter().flatten().collect();

        for warning in findings.iter().filter(|f| f.severity() == Severity::Warning) {
            log::warn!("{warning}");
        }
        log::debug!(
            "{:?} phase: {} rule(s), {} finding(s), {} fatal",
            phase,
            rules.len(),
            findings.len(),
            findings.iter().filter(|f| f.is_fatal()).count()
        );
        Ok(findings)
    }
}

async fn evaluate_timed(rule: &dyn Rule, ctx: &RuleContext) -> Vec<Finding> {
    let started = Instant::now();
    let findings = rule.evaluate(ctx).await;
    log::trace!(
        "rule {} produced {} finding(s) in {:?}",
        rule.id(),
        findings.len(),
        started.elapsed()
    );
    findings
}

async fn evaluate_sequentially(rules: &[Arc<dyn Rule>], ctx: &RuleContext) -> Vec<Vec<Finding>> {
    let mut per_rule = Vec::with_capacity(rules.len());
    for rule in rules {
        per_rule.push(evaluate_timed(rule.as_ref(), ctx).await);
    }
    per_rule
}

/// Store one rule's findings under its registry index.
fn collect(
    sink: &ConcurrentHashMap<usize, Vec<Finding>>,
    index: usize,
    rule_id: &str,
    findings: Vec<Finding>,
) -> Result<(), RuleError> {
    sink.insert_sync(index, findings)
        .map_err(|(index, _)| RuleError::RuleFailed {
            rule_id: rule_id.to_string(),
            source: anyhow!("findings for rule #{index} collected twice"),
        })
}

/// One task per rule, at most `max_parallel` evaluating at once. Results are
/// collected by rule index so the output order matches the sequential path.
async fn evaluate_concurrently(
    rules: &[Arc<dyn Rule>],
    ctx: &RuleContext,
    max_parallel: usize,
) -> Result<Vec<Vec<Finding>>, RuleError> {
    let semaphore = Arc::new(Semaphore::new(max_parallel.max(1)));
    let sink: Arc<ConcurrentHashMap<usize, Vec<Finding>>> = Arc::new(ConcurrentHashMap::new());

    let mut handles = Vec::with_capacity(rules.len());
    for (index, rule) in rules.iter().enumerate() {
        let rule_id = rule.id();
        let rule = Arc::clone(rule);
        let ctx = ctx.clone();
        let semaphore = Arc::clone(&semaphore);
        let sink = Arc::clone(&sink);
        let handle = tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| RuleError::RuleFailed {
                    rule_id: rule_id.to_string(),
                    source: anyhow::Error::new(e),
                })?;
            let findings = evaluate_timed(rule.as_ref(), &ctx).await;
            collect(&sink, index, rule_id, findings)
        });
        handles.push((rule_id, handle));
    }

    for (rule_id, handle) in handles {
        match handle.await {
            Ok(result) => result?,
            Err(join_error) => {
                return Err(RuleError::Panicked {
                    rule_id: rule_id.to_string(),
                    message: join_error.to_string(),
                })
            }
        }
    }

    let per_rule = (0..rules.len())
        .map(|index| {
            sink.read_sync(&index, |_, findings| findings.clone())
                .unwrap_or_default()
        })
        .collect();
    Ok(per_rule)
}
