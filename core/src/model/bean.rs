use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ArchiveId, InjectionPointId};
use crate::types::{Qualifier, TypeRef};

/// Index of a bean inside [`GraphModel::beans`](crate::model::GraphModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeanId(pub usize);

impl fmt::Display for BeanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bean#{}", self.0)
    }
}

/// How the container treats a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// `@Dependent`: a new instance per injection, owned by the injecting bean.
    Dependent,
    /// Any other pseudo-scope (e.g. `@Singleton`): no client proxy.
    Pseudo,
    /// Normal scope reached through a client proxy.
    Normal,
    /// Normal scope whose instances may be passivated (session, conversation).
    Passivating,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub name: String,
    pub kind: ScopeKind,
}

impl Scope {
    pub fn dependent() -> Self {
        Self {
            name: "Dependent".into(),
            kind: ScopeKind::Dependent,
        }
    }

    pub fn singleton() -> Self {
        Self {
            name: "Singleton".into(),
            kind: ScopeKind::Pseudo,
        }
    }

    pub fn application() -> Self {
        Self {
            name: "ApplicationScoped".into(),
            kind: ScopeKind::Normal,
        }
    }

    pub fn request() -> Self {
        Self {
            name: "RequestScoped".into(),
            kind: ScopeKind::Normal,
        }
    }

    pub fn session() -> Self {
        Self {
            name: "SessionScoped".into(),
            kind: ScopeKind::Passivating,
        }
    }

    pub fn conversation() -> Self {
        Self {
            name: "ConversationScoped".into(),
            kind: ScopeKind::Passivating,
        }
    }

    pub fn is_dependent(&self) -> bool {
        self.kind == ScopeKind::Dependent
    }

    pub fn is_pseudo(&self) -> bool {
        matches!(self.kind, ScopeKind::Dependent | ScopeKind::Pseudo)
    }

    pub fn is_normal(&self) -> bool {
        !self.is_pseudo()
    }

    pub fn is_passivating(&self) -> bool {
        self.kind == ScopeKind::Passivating
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptionKind {
    AroundInvoke,
    AroundTimeout,
    AroundConstruct,
    PostConstruct,
    PreDestroy,
    PrePassivate,
    PostActivate,
}

impl InterceptionKind {
    /// Business-method interception, as opposed to lifecycle callbacks.
    pub fn is_around_invoke(&self) -> bool {
        matches!(self, InterceptionKind::AroundInvoke | InterceptionKind::AroundTimeout)
    }

    pub fn annotation_name(&self) -> &'static str {
        match self {
            InterceptionKind::AroundInvoke => "AroundInvoke",
            InterceptionKind::AroundTimeout => "AroundTimeout",
            InterceptionKind::AroundConstruct => "AroundConstruct",
            InterceptionKind::PostConstruct => "PostConstruct",
            InterceptionKind::PreDestroy => "PreDestroy",
            InterceptionKind::PrePassivate => "PrePassivate",
            InterceptionKind::PostActivate => "PostActivate",
        }
    }
}

impl fmt::Display for InterceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.annotation_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclaredException {
    pub name: String,
    pub checked: bool,
}

/// An interception (around-invoke or lifecycle callback) method signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterceptionMethod {
    pub name: String,
    pub declaring_class: String,
    pub kind: InterceptionKind,
    pub return_type: TypeRef,
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    #[serde(default)]
    pub exceptions: Vec<DeclaredException>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisposerMethod {
    pub name: String,
    pub disposed_type: TypeRef,
    #[serde(default)]
    pub qualifiers: Vec<Qualifier>,
}

/// Members declared on the bean class that themselves define beans or
/// observers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredMembers {
    #[serde(default)]
    pub producer_methods: Vec<String>,
    #[serde(default)]
    pub producer_fields: Vec<String>,
    #[serde(default)]
    pub disposer_methods: Vec<DisposerMethod>,
    #[serde(default)]
    pub observer_methods: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptorInfo {
    #[serde(default)]
    pub bindings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratorInfo {
    #[serde(default)]
    pub decorated_types: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<InjectionPointId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BeanKind {
    Managed,
    ProducerMethod { declaring_bean: BeanId, method: String },
    ProducerField { declaring_bean: BeanId, field: String },
    BuiltIn,
    Interceptor(InterceptorInfo),
    Decorator(DecoratorInfo),
}

impl BeanKind {
    pub fn is_interceptor(&self) -> bool {
        matches!(self, BeanKind::Interceptor(_))
    }

    pub fn is_decorator(&self) -> bool {
        matches!(self, BeanKind::Decorator(_))
    }

    /// Producer methods and fields, with the bean that declares them.
    pub fn declaring_bean(&self) -> Option<BeanId> {
        match self {
            BeanKind::ProducerMethod { declaring_bean, .. }
            | BeanKind::ProducerField { declaring_bean, .. } => Some(*declaring_bean),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BeanKind::Managed => "managed bean",
            BeanKind::ProducerMethod { .. } => "producer method",
            BeanKind::ProducerField { .. } => "producer field",
            BeanKind::BuiltIn => "built-in bean",
            BeanKind::Interceptor(_) => "interceptor",
            BeanKind::Decorator(_) => "decorator",
        }
    }
}

/// A container-managed injectable component, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bean {
    pub id: BeanId,

    /// Bean class (for producers: the declaring class).
    pub class_name: String,

    /// EL name, if the bean is `@Named`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub kind: BeanKind,
    pub scope: Scope,

    #[serde(default)]
    pub qualifiers: Vec<Qualifier>,
    #[serde(default)]
    pub types: Vec<TypeRef>,

    #[serde(default)]
    pub passivation_capable: bool,

    #[serde(default)]
    pub alternative: bool,
    #[serde(default)]
    pub stereotypes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specializes: Option<BeanId>,

    pub archive: ArchiveId,

    #[serde(default)]
    pub injection_points: Vec<InjectionPointId>,

    /// Interceptors bound to this bean, in invocation order.
    #[serde(default)]
    pub interceptors: Vec<BeanId>,
    /// Decorators bound to this bean, in invocation order.
    #[serde(default)]
    pub decorators: Vec<BeanId>,

    #[serde(default)]
    pub members: DeclaredMembers,
    #[serde(default)]
    pub lifecycle_methods: Vec<InterceptionMethod>,

    /// Registered by an extension rather than discovered.
    #[serde(default)]
    pub custom: bool,

    /// Enterprise bean with container-managed transactions.
    #[serde(default)]
    pub container_managed_transactions: bool,
}

impl Bean {
    /// A `@Dependent` managed bean with the given class as its only type.
    pub fn managed(id: BeanId, class_name: impl Into<String>, archive: ArchiveId) -> Self {
        let class_name = class_name.into();
        Self {
            id,
            types: vec![TypeRef::class(class_name.clone())],
            class_name,
            name: None,
            kind: BeanKind::Managed,
            scope: Scope::dependent(),
            qualifiers: Vec::new(),
            passivation_capable: false,
            alternative: false,
            stereotypes: Vec::new(),
            specializes: None,
            archive,
            injection_points: Vec::new(),
            interceptors: Vec::new(),
            decorators: Vec::new(),
            members: DeclaredMembers::default(),
            lifecycle_methods: Vec::new(),
            custom: false,
            container_managed_transactions: false,
        }
    }

    /// Qualifiers the bean effectively carries: declared ones plus `@Any`,
    /// plus `@Default` when nothing but `@Named`/`@Any` is declared.
    pub fn effective_qualifiers(&self) -> Vec<Qualifier> {
        let mut qualifiers = self.qualifiers.clone();
        let only_implicit = qualifiers
            .iter()
            .all(|q| q.is(Qualifier::NAMED) || q.is(Qualifier::ANY));
        if only_implicit && !qualifiers.iter().any(|q| q.is(Qualifier::DEFAULT)) {
            qualifiers.push(Qualifier::default_qualifier());
        }
        if !qualifiers.iter().any(|q| q.is(Qualifier::ANY)) {
            qualifiers.push(Qualifier::any());
        }
        qualifiers
    }

    pub fn has_type(&self, ty: &TypeRef) -> bool {
        self.types.iter().any(|t| t == ty)
    }

    /// Short human label: `OrderService (managed bean, @SessionScoped)`.
    pub fn describe(&self) -> String {
        format!("{} ({}, {})", self.class_name, self.kind.label(), self.scope)
    }
}
