use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::BeanId;
use crate::types::{well_known, Qualifier, TypeRef};

/// Index of an injection point inside
/// [`GraphModel::injection_points`](crate::model::GraphModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InjectionPointId(pub usize);

impl fmt::Display for InjectionPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ip#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InjectionPointOwner {
    Bean { bean: BeanId },
    /// A class the container injects into without managing it as a bean
    /// (e.g. a servlet or a listener).
    NonBean { class_name: String },
}

/// The method a parameter injection point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodRole {
    Initializer,
    Producer,
    Disposer,
    Observer,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Member {
    Field {
        name: String,
        #[serde(default)]
        transient: bool,
    },
    Parameter {
        method: String,
        position: usize,
        role: MethodRole,
    },
    ConstructorParameter {
        position: usize,
    },
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Field { name, .. } => write!(f, "field {name}"),
            Member::Parameter {
                method, position, ..
            } => write!(f, "parameter {position} of {method}()"),
            Member::ConstructorParameter { position } => {
                write!(f, "parameter {position} of constructor")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionPoint {
    pub id: InjectionPointId,
    pub owner: InjectionPointOwner,
    pub member: Member,
    pub required_type: TypeRef,
    #[serde(default)]
    pub qualifiers: Vec<Qualifier>,

    /// Scope annotations found on the injection point. Always a mistake.
    #[serde(default)]
    pub scope_annotations: Vec<String>,

    /// Decorator delegate injection point.
    #[serde(default)]
    pub delegate: bool,
}

impl InjectionPoint {
    pub fn new(
        id: InjectionPointId,
        owner: BeanId,
        member: Member,
        required_type: TypeRef,
    ) -> Self {
        Self {
            id,
            owner: InjectionPointOwner::Bean { bean: owner },
            member,
            required_type,
            qualifiers: Vec::new(),
            scope_annotations: Vec::new(),
            delegate: false,
        }
    }

    pub fn owner_bean(&self) -> Option<BeanId> {
        match &self.owner {
            InjectionPointOwner::Bean { bean } => Some(*bean),
            InjectionPointOwner::NonBean { .. } => None,
        }
    }

    pub fn is_field(&self) -> bool {
        matches!(self.member, Member::Field { .. })
    }

    pub fn is_transient(&self) -> bool {
        matches!(self.member, Member::Field { transient: true, .. })
    }

    /// Fields, constructor parameters and initializer parameters are filled
    /// while the owner is built and stay with the instance. Producer, disposer
    /// and observer parameters are resolved per invocation.
    pub fn is_instance_state(&self) -> bool {
        match &self.member {
            Member::Field { .. } | Member::ConstructorParameter { .. } => true,
            Member::Parameter { role, .. } => matches!(role, MethodRole::Initializer),
        }
    }

    pub fn method_role(&self) -> Option<MethodRole> {
        match &self.member {
            Member::Parameter { role, .. } => Some(*role),
            _ => None,
        }
    }

    pub fn is_event_metadata(&self) -> bool {
        self.required_type.is_raw(well_known::EVENT_METADATA)
    }

    pub fn is_injection_point_metadata(&self) -> bool {
        self.required_type.is_raw(well_known::INJECTION_POINT)
    }

    /// `Bean<X>`, `Interceptor<X>` or `Decorator<X>` metadata.
    pub fn is_bean_metadata(&self) -> bool {
        self.required_type
            .raw_name()
            .is_some_and(|raw| well_known::BEAN_METADATA.contains(&raw))
    }

    /// Satisfied by a built-in bean regardless of the deployment.
    pub fn is_container_provided(&self) -> bool {
        self.required_type
            .raw_name()
            .is_some_and(|raw| well_known::CONTAINER_PROVIDED.contains(&raw))
    }

    pub fn has_qualifier(&self, name: &str) -> bool {
        self.qualifiers.iter().any(|q| q.is(name))
    }

    /// Required qualifiers, with the implicit `@Default` when none are given.
    pub fn effective_qualifiers(&self) -> Vec<Qualifier> {
        let explicit: Vec<Qualifier> = self
            .qualifiers
            .iter()
            .filter(|q| !q.is(Qualifier::NAMED) || !q.is_unnamed_named())
            .cloned()
            .collect();
        if explicit.is_empty() {
            vec![Qualifier::default_qualifier()]
        } else {
            explicit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(ty: TypeRef) -> InjectionPoint {
        InjectionPoint::new(
            InjectionPointId(0),
            BeanId(0),
            Member::Field {
                name: "dep".into(),
                transient: false,
            },
            ty,
        )
    }

    #[test]
    fn default_qualifier_is_implicit() {
        let point = ip(TypeRef::class("Logger"));
        assert_eq!(point.effective_qualifiers(), vec![Qualifier::default_qualifier()]);
    }

    #[test]
    fn explicit_qualifiers_replace_default() {
        let mut point = ip(TypeRef::class("Logger"));
        point.qualifiers.push(Qualifier::new("Audit"));
        assert_eq!(point.effective_qualifiers(), vec![Qualifier::new("Audit")]);
    }

    #[test]
    fn container_provided_types() {
        assert!(ip(TypeRef::class("InjectionPoint")).is_container_provided());
        assert!(ip(TypeRef::parameterized("Instance", vec![TypeRef::class("X")]))
            .is_container_provided());
        assert!(!ip(TypeRef::class("Logger")).is_container_provided());
    }

    #[test]
    fn metadata_predicates() {
        assert!(ip(TypeRef::class("EventMetadata")).is_event_metadata());
        assert!(ip(TypeRef::parameterized("Bean", vec![TypeRef::class("X")])).is_bean_metadata());
        assert!(!ip(TypeRef::class("Logger")).is_bean_metadata());
    }

    #[test]
    fn transient_fields() {
        let mut point = ip(TypeRef::class("Logger"));
        assert!(!point.is_transient());
        point.member = Member::Field {
            name: "dep".into(),
            transient: true,
        };
        assert!(point.is_transient());
    }

    #[test]
    fn only_construction_members_are_instance_state() {
        let mut point = ip(TypeRef::class("Logger"));
        assert!(point.is_instance_state());
        point.member = Member::ConstructorParameter { position: 0 };
        assert!(point.is_instance_state());

        let param = |role| Member::Parameter {
            method: "m".into(),
            position: 0,
            role,
        };
        point.member = param(MethodRole::Initializer);
        assert!(point.is_instance_state());
        for role in [MethodRole::Producer, MethodRole::Disposer, MethodRole::Observer] {
            point.member = param(role);
            assert!(!point.is_instance_state(), "{role:?}");
        }
    }
}
