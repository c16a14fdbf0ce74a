//! # beancheck-core
//!
//! Frozen bean graph model and resolver contract for beancheck.
//!
//! This crate holds everything the validator reads but does not own:
//!
//! - **Model**: beans, injection points, interceptors, decorators, bean
//!   archives and enablement lists, addressed by index
//! - **Types**: resolved type references and qualifiers
//! - **Oracle**: the [`ResolutionOracle`] trait the validator queries for
//!   typesafe resolution, proxyability and passivation capability, plus a
//!   [`StaticResolver`] reference implementation
//!
//! ## Example
//!
//! ```rust,ignore
//! use beancheck_core::model::{ArchiveId, Bean, BeanArchive, BeanId, GraphModel};
//!
//! let mut model = GraphModel::new();
//! model.archives.push(BeanArchive::new(ArchiveId(0), "app.jar"));
//! model.beans.push(Bean::managed(BeanId(0), "OrderService", ArchiveId(0)));
//! model.check_consistency()?;
//! ```

pub mod error;
pub mod model;
pub mod oracle;
pub mod types;

pub use error::{ModelError, UnproxyableError, UnproxyableReason};
pub use model::{Bean, BeanId, GraphModel, InjectionPoint, InjectionPointId};
pub use oracle::{PrecedenceContext, ResolutionOracle, ResolutionQuery, StaticResolver};
pub use types::{Qualifier, TypeRef};
