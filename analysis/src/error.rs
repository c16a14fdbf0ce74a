use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use beancheck_core::error::ModelError;

use crate::types::finding::{Finding, Severity};

/// Top-level error type exposed by the engine.
///
/// These are failures of the validator itself. A deployment that is refused
/// because of its findings is reported through [`ValidationError`] instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("inconsistent graph model: {0}")]
    Model(#[from] ModelError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("rule evaluation error: {0}")]
    Rule(#[from] RuleError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// "Catch-all" for unexpected internal failures.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Errors building or querying the dependency graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("inconsistent graph state: {0}")]
    Inconsistent(String),
}

/// Errors executing rules.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule {rule_id} failed: {source}")]
    RuleFailed {
        rule_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("rule {rule_id} panicked: {message}")]
    Panicked { rule_id: String, message: String },
}

/// Errors in the session orchestration layer.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("dependency graph requested before it was built")]
    GraphNotBuilt,
}

/// Aggregate refusal to deploy, carrying every fatal finding of the pass.
///
/// `Error` is implemented by hand: `source()` is the first cause found among
/// the findings, and `thiserror` only derives a source from a single field.
#[derive(Debug)]
pub enum ValidationError {
    /// At least one definition error was found.
    Definition { findings: Vec<Finding> },
    /// Only deployment errors were found.
    Deployment { findings: Vec<Finding> },
}

impl ValidationError {
    pub fn findings(&self) -> &[Finding] {
        match self {
            ValidationError::Definition { findings } | ValidationError::Deployment { findings } => {
                findings
            }
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ValidationError::Definition { .. } => Severity::DefinitionError,
            ValidationError::Deployment { .. } => Severity::DeploymentError,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let findings = self.findings();
        let label = match self {
            ValidationError::Definition { .. } => "definition errors",
            ValidationError::Deployment { .. } => "deployment errors",
        };
        write!(f, "{label}: {} fatal finding(s)", findings.len())?;
        if let Some(first) = findings.first() {
            write!(f, ", first {first}")?;
        }
        Ok(())
    }
}

impl StdError for ValidationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.findings()
            .iter()
            .find_map(Finding::cause)
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}
