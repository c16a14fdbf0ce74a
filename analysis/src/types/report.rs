use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ValidationError;
use crate::types::finding::{Finding, Severity};

/// Outcome of one validation pass.
///
/// Findings keep rule registry order; inside a rule they keep the order the
/// rule produced them in.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    pub fatal: bool,
}

impl ValidationReport {
    pub fn new(findings: Vec<Finding>) -> Self {
        let fatal = findings.iter().any(Finding::is_fatal);
        Self { findings, fatal }
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_fatal())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_fatal())
    }

    pub fn count_by_severity(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for finding in &self.findings {
            *counts.entry(finding.severity()).or_insert(0) += 1;
        }
        counts
    }

    /// Deployable: the warnings. Otherwise the aggregate refusal carrying
    /// every fatal finding.
    pub fn into_result(self) -> Result<Vec<Finding>, ValidationError> {
        if !self.fatal {
            return Ok(self.findings);
        }
        let has_definition_errors = self
            .findings
            .iter()
            .any(|f| f.severity() == Severity::DefinitionError);
        let findings: Vec<Finding> = self.findings.into_iter().filter(Finding::is_fatal).collect();
        if has_definition_errors {
            Err(ValidationError::Definition { findings })
        } else {
            Err(ValidationError::Deployment { findings })
        }
    }
}
