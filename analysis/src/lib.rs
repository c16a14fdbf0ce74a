//! beancheck-analysis: Rule evaluation and validation engine
//!
//! This crate validates a frozen bean graph ([`beancheck_core::GraphModel`])
//! before a container goes live, including:
//! - 12 built-in rules in two phases (definition, deployment)
//! - A dependency graph built once from oracle resolutions
//! - Session orchestration for a validation pass
//!
//! # Example
//!
//! ```ignore
//! use beancheck_analysis::Engine;
//!
//! let engine = Engine::with_default_config();
//! let report = engine.validate(model, oracle).await?;
//! for warning in report.into_result()? {
//!     println!("{warning}");
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod rules;
pub mod session;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use graph::DependencyGraph;
pub use types::finding::{Finding, FindingKind, Severity, Subject};
pub use types::report::ValidationReport;

// Re-export main engine types
pub use config::ValidatorConfig;
pub use engine::Engine;
pub use error::{EngineError, ValidationError};
pub use rules::registry::RuleRegistry;
pub use rules::{Phase, Rule, RuleContext};
pub use session::ValidationSession;
