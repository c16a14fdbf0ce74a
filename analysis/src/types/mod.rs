pub mod finding;
pub mod report;

pub use finding::{
    ComponentRole, DisposerRef, Finding, FindingKind, MethodRef, Param, Severity, Subject,
    UnsatisfiedHint,
};
pub use report::ValidationReport;
