use thiserror::Error;

use crate::model::{ArchiveId, BeanId, InjectionPointId};

/// The graph handed over by the resolver violates a structural invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("{referrer} references unknown bean {bean}")]
    UnknownBean { referrer: String, bean: BeanId },

    #[error("{referrer} references unknown injection point {injection_point}")]
    UnknownInjectionPoint {
        referrer: String,
        injection_point: InjectionPointId,
    },

    #[error("{referrer} references unknown archive {archive}")]
    UnknownArchive { referrer: String, archive: ArchiveId },

    #[error("{kind} at index {index} carries id {id}")]
    MisplacedId {
        kind: &'static str,
        index: usize,
        id: usize,
    },

    #[error("injection point {injection_point} is declared by {owners} owners")]
    OwnerCount {
        injection_point: InjectionPointId,
        owners: usize,
    },
}

/// Why a type cannot be proxied. Each reason maps to its own remediation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnproxyableReason {
    #[error("no non-private no-args constructor")]
    NoNoArgsConstructor,

    #[error("private constructor {constructor}")]
    PrivateConstructor { constructor: String },

    #[error("final type or final method {member}")]
    FinalTypeOrMethod { member: String },

    #[error("primitive type")]
    Primitive,

    #[error("array type")]
    ArrayType,

    #[error("{0}")]
    Unknown(String),
}

/// Failure reported by the oracle for a proxyability query.
#[derive(Debug, Error)]
pub enum UnproxyableError {
    #[error("type {type_name} is not proxyable: {reason}")]
    NotProxyable {
        type_name: String,
        reason: UnproxyableReason,
    },

    /// The oracle could not inspect the type at all (e.g. a class failed to
    /// load). The underlying failure is kept as the source.
    #[error("proxyability of {type_name} could not be determined")]
    Undetermined {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },
}

impl UnproxyableError {
    pub fn type_name(&self) -> &str {
        match self {
            UnproxyableError::NotProxyable { type_name, .. }
            | UnproxyableError::Undetermined { type_name, .. } => type_name,
        }
    }
}
