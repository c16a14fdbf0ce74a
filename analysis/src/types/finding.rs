//! The closed catalog of validation conditions.
//!
//! Every kind fixes a stable numeric id (1401–1479), a severity and the typed
//! parameters needed to render a precise diagnostic. Rendering itself is left
//! to callers.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use beancheck_core::error::UnproxyableError;
use beancheck_core::model::{ArchiveId, BeanId, DeclarationSite, InjectionPointId, InterceptionKind};
use beancheck_core::types::{Qualifier, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// A single bean, interceptor or decorator is malformed.
    DefinitionError,
    /// A whole-graph property is violated.
    DeploymentError,
    /// Advisory only; never blocks deployment.
    Warning,
}

impl Severity {
    pub fn is_fatal(self) -> bool {
        !matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::DefinitionError => "definition error",
            Severity::DeploymentError => "deployment error",
            Severity::Warning => "warning",
        })
    }
}

/// Why no bean satisfied an injection point. Ids follow the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "hint", rename_all = "snake_case")]
pub enum UnsatisfiedHint {
    /// 1474: a class that would have matched by type was dropped during
    /// discovery.
    ClassIgnored { class_name: String, missing: String },
    /// 1475: beans match by type, but none has matching qualifiers.
    QualifiersDontMatch { beans: Vec<BeanId> },
}

impl UnsatisfiedHint {
    pub fn id(&self) -> u16 {
        match self {
            UnsatisfiedHint::ClassIgnored { .. } => 1474,
            UnsatisfiedHint::QualifiersDontMatch { .. } => 1475,
        }
    }
}

/// Whether a passivation problem was found on an interceptor or a decorator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    Interceptor,
    Decorator,
}

impl fmt::Display for ComponentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComponentRole::Interceptor => "interceptor",
            ComponentRole::Decorator => "decorator",
        })
    }
}

/// A disposer method that paired with no producer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisposerRef {
    pub bean: BeanId,
    pub method: String,
}

/// An interception method, located on the bean whose class declares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub bean: BeanId,
    pub method: String,
    pub declaring_class: String,
    pub kind: InterceptionKind,
}

/// One raw, unformatted diagnostic parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "param", content = "value", rename_all = "snake_case")]
pub enum Param {
    Bean(BeanId),
    Beans(Vec<BeanId>),
    InjectionPoint(InjectionPointId),
    Type(TypeRef),
    Qualifier(Qualifier),
    Qualifiers(Vec<Qualifier>),
    Text(String),
    Site(DeclarationSite),
    Archive(ArchiveId),
    Path(Vec<BeanId>),
    Disposers(Vec<DisposerRef>),
    Hints(Vec<UnsatisfiedHint>),
}

/// What a finding is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Bean(BeanId),
    InjectionPoint(InjectionPointId),
    Archive(ArchiveId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
    BeanSpecializedTooManyTimes {
        target: BeanId,
        specializers: Vec<BeanId>,
    },
    PassivatingBeanWithNonserializableInterceptor {
        bean: BeanId,
        interceptor: BeanId,
    },
    PassivatingBeanWithNonserializableDecorator {
        bean: BeanId,
        decorator: BeanId,
    },
    NewWithQualifiers {
        injection_point: InjectionPointId,
    },
    InjectionIntoNonBean {
        injection_point: InjectionPointId,
    },
    InjectionIntoNonDependentBean {
        injection_point: InjectionPointId,
    },
    InjectionPointWithTypeVariable {
        injection_point: InjectionPointId,
    },
    InjectionPointHasUnsatisfiedDependencies {
        injection_point: InjectionPointId,
        qualifiers: Vec<Qualifier>,
        required_type: TypeRef,
        hints: Vec<UnsatisfiedHint>,
    },
    InjectionPointHasAmbiguousDependencies {
        injection_point: InjectionPointId,
        qualifiers: Vec<Qualifier>,
        required_type: TypeRef,
        candidates: Vec<BeanId>,
    },
    InjectionPointHasNonProxyableDependencies {
        injection_point: InjectionPointId,
    },
    InjectionPointHasNonSerializableDependency {
        bean: BeanId,
        dependency: BeanId,
        injection_point: InjectionPointId,
    },
    AmbiguousElName {
        name: String,
        beans: Vec<BeanId>,
    },
    BeanNameIsPrefix {
        name: String,
    },
    InterceptorSpecifiedTwice {
        class_name: String,
        first: DeclarationSite,
        second: DeclarationSite,
    },
    InterceptorClassDoesNotMatchInterceptorBean {
        class_name: String,
        site: DeclarationSite,
    },
    DecoratorSpecifiedTwice {
        class_name: String,
        first: DeclarationSite,
        second: DeclarationSite,
    },
    DecoratorClassNotBeanClassOfDecorator {
        class_name: String,
        decorators: Vec<BeanId>,
    },
    AlternativeStereotypeNotStereotype {
        class_name: String,
        site: DeclarationSite,
    },
    AlternativeStereotypeSpecifiedMultipleTimes {
        class_name: String,
        first: DeclarationSite,
        second: DeclarationSite,
    },
    AlternativeBeanClassNotAnnotated {
        class_name: String,
        site: DeclarationSite,
    },
    DisposalMethodsWithoutProducer {
        disposers: Vec<DisposerRef>,
    },
    InjectionPointHasWildcard {
        required_type: TypeRef,
        injection_point: InjectionPointId,
    },
    InjectionPointMustHaveTypeParameter {
        required_type: TypeRef,
        injection_point: InjectionPointId,
    },
    NonFieldInjectionPointCannotUseNamed {
        injection_point: InjectionPointId,
    },
    DecoratorsCannotHaveProducerMethods {
        decorator: BeanId,
    },
    DecoratorsCannotHaveProducerFields {
        decorator: BeanId,
    },
    DecoratorsCannotHaveDisposerMethods {
        decorator: BeanId,
    },
    InterceptorsCannotHaveProducerMethods {
        interceptor: BeanId,
    },
    InterceptorsCannotHaveProducerFields {
        interceptor: BeanId,
    },
    InterceptorsCannotHaveDisposerMethods {
        interceptor: BeanId,
    },
    NotProxyableUnknown {
        bean: BeanId,
        detail: String,
    },
    NotProxyableNoConstructor {
        bean: BeanId,
        type_name: String,
    },
    NotProxyablePrivateConstructor {
        type_name: String,
        constructor: String,
        bean: BeanId,
    },
    NotProxyableFinalTypeOrMethod {
        bean: BeanId,
        member: String,
        type_name: String,
    },
    NotProxyablePrimitive {
        bean: BeanId,
        type_name: String,
    },
    NotProxyableArrayType {
        bean: BeanId,
        type_name: String,
    },
    ScopeAnnotationOnInjectionPoint {
        scope: String,
        injection_point: InjectionPointId,
    },
    AlternativeBeanClassNotClass {
        class_name: String,
        site: DeclarationSite,
    },
    AlternativeStereotypeNotAnnotated {
        class_name: String,
        site: DeclarationSite,
    },
    PseudoScopedBeanHasCircularReferences {
        path: Vec<BeanId>,
    },
    InterceptorsCannotHaveObserverMethods {
        interceptor: BeanId,
    },
    DecoratorsCannotHaveObserverMethods {
        decorator: BeanId,
    },
    InterceptorMethodDoesNotReturnObject {
        method: MethodRef,
        expected: String,
    },
    InterceptorMethodDoesNotHaveExactlyOneParameter {
        method: MethodRef,
    },
    InterceptorMethodDoesNotHaveCorrectTypeOfParameter {
        method: MethodRef,
        expected: String,
    },
    UserTransactionInjectionIntoBeanWithContainerManagedTransactions {
        injection_point: InjectionPointId,
    },
    InvalidBeanMetadataInjectionPointType {
        required_type: TypeRef,
        injection_point: InjectionPointId,
    },
    InvalidBeanMetadataInjectionPointTypeArgument {
        type_argument: TypeRef,
        injection_point: InjectionPointId,
    },
    InvalidBeanMetadataInjectionPointQualifier {
        qualifier: String,
        required_kind: ComponentRole,
        injection_point: InjectionPointId,
    },
    NoDecoratedTypes {
        decorator: BeanId,
    },
    AlternativeClassSpecifiedMultipleTimes {
        class_name: String,
        first: DeclarationSite,
        second: DeclarationSite,
    },
    BeanWithPassivatingScopeNotPassivationCapable {
        bean: BeanId,
    },
    BuiltinBeanWithNonserializableDecorator {
        decorator: BeanId,
        bean: BeanId,
    },
    InjectionIntoDisposerMethod {
        injection_point: InjectionPointId,
    },
    InterceptorMethodDoesNotReturnObjectOrVoid {
        method: MethodRef,
    },
    InterceptorMethodDoesNotHaveVoidReturnType {
        method: MethodRef,
    },
    InterceptorMethodDoesNotHaveZeroParameters {
        method: MethodRef,
    },
    InterceptorMethodShouldNotThrowCheckedExceptions {
        method: MethodRef,
        exception: String,
    },
    EventMetadataInjectedOutsideOfObserver {
        injection_point: InjectionPointId,
    },
    BeanNotPassivationCapable {
        bean: BeanId,
    },
    InterceptorMustBeDependent {
        component: BeanId,
    },
    InterceptorDecoratorInjectionPointHasNonSerializableDependency {
        bean: BeanId,
        role: ComponentRole,
        component: BeanId,
        dependency: BeanId,
        injection_point: InjectionPointId,
    },
    InterceptorEnabledForApplicationAndBeanArchive {
        class_name: String,
        archive: ArchiveId,
    },
    DecoratorEnabledForApplicationAndBeanArchive {
        class_name: String,
        archive: ArchiveId,
    },
}

impl FindingKind {
    /// Stable numeric identifier.
    pub fn id(&self) -> u16 {
        use FindingKind::*;
        match self {
            BeanSpecializedTooManyTimes { .. } => 1401,
            PassivatingBeanWithNonserializableInterceptor { .. } => 1402,
            PassivatingBeanWithNonserializableDecorator { .. } => 1403,
            NewWithQualifiers { .. } => 1404,
            InjectionIntoNonBean { .. } => 1405,
            InjectionIntoNonDependentBean { .. } => 1406,
            InjectionPointWithTypeVariable { .. } => 1407,
            InjectionPointHasUnsatisfiedDependencies { .. } => 1408,
            InjectionPointHasAmbiguousDependencies { .. } => 1409,
            InjectionPointHasNonProxyableDependencies { .. } => 1410,
            InjectionPointHasNonSerializableDependency { .. } => 1413,
            AmbiguousElName { .. } => 1414,
            BeanNameIsPrefix { .. } => 1415,
            InterceptorSpecifiedTwice { .. } => 1416,
            InterceptorClassDoesNotMatchInterceptorBean { .. } => 1417,
            DecoratorSpecifiedTwice { .. } => 1418,
            DecoratorClassNotBeanClassOfDecorator { .. } => 1419,
            AlternativeStereotypeNotStereotype { .. } => 1420,
            AlternativeStereotypeSpecifiedMultipleTimes { .. } => 1421,
            AlternativeBeanClassNotAnnotated { .. } => 1422,
            DisposalMethodsWithoutProducer { .. } => 1424,
            InjectionPointHasWildcard { .. } => 1425,
            InjectionPointMustHaveTypeParameter { .. } => 1426,
            NonFieldInjectionPointCannotUseNamed { .. } => 1427,
            DecoratorsCannotHaveProducerMethods { .. } => 1428,
            DecoratorsCannotHaveProducerFields { .. } => 1429,
            DecoratorsCannotHaveDisposerMethods { .. } => 1430,
            InterceptorsCannotHaveProducerMethods { .. } => 1431,
            InterceptorsCannotHaveProducerFields { .. } => 1432,
            InterceptorsCannotHaveDisposerMethods { .. } => 1433,
            NotProxyableUnknown { .. } => 1434,
            NotProxyableNoConstructor { .. } => 1435,
            NotProxyablePrivateConstructor { .. } => 1436,
            NotProxyableFinalTypeOrMethod { .. } => 1437,
            NotProxyablePrimitive { .. } => 1438,
            NotProxyableArrayType { .. } => 1439,
            ScopeAnnotationOnInjectionPoint { .. } => 1440,
            AlternativeBeanClassNotClass { .. } => 1441,
            AlternativeStereotypeNotAnnotated { .. } => 1442,
            PseudoScopedBeanHasCircularReferences { .. } => 1443,
            InterceptorsCannotHaveObserverMethods { .. } => 1445,
            DecoratorsCannotHaveObserverMethods { .. } => 1446,
            InterceptorMethodDoesNotReturnObject { .. } => 1447,
            InterceptorMethodDoesNotHaveExactlyOneParameter { .. } => 1448,
            InterceptorMethodDoesNotHaveCorrectTypeOfParameter { .. } => 1449,
            UserTransactionInjectionIntoBeanWithContainerManagedTransactions { .. } => 1451,
            InvalidBeanMetadataInjectionPointType { .. } => 1452,
            InvalidBeanMetadataInjectionPointTypeArgument { .. } => 1453,
            InvalidBeanMetadataInjectionPointQualifier { .. } => 1454,
            NoDecoratedTypes { .. } => 1455,
            AlternativeClassSpecifiedMultipleTimes { .. } => 1457,
            BeanWithPassivatingScopeNotPassivationCapable { .. } => 1463,
            BuiltinBeanWithNonserializableDecorator { .. } => 1465,
            InjectionIntoDisposerMethod { .. } => 1466,
            InterceptorMethodDoesNotReturnObjectOrVoid { .. } => 1467,
            InterceptorMethodDoesNotHaveVoidReturnType { .. } => 1468,
            InterceptorMethodDoesNotHaveZeroParameters { .. } => 1469,
            InterceptorMethodShouldNotThrowCheckedExceptions { .. } => 1471,
            EventMetadataInjectedOutsideOfObserver { .. } => 1472,
            BeanNotPassivationCapable { .. } => 1473,
            InterceptorMustBeDependent { .. } => 1476,
            InterceptorDecoratorInjectionPointHasNonSerializableDependency { .. } => 1477,
            InterceptorEnabledForApplicationAndBeanArchive { .. } => 1478,
            DecoratorEnabledForApplicationAndBeanArchive { .. } => 1479,
        }
    }

    pub fn severity(&self) -> Severity {
        use FindingKind::*;
        match self {
            ScopeAnnotationOnInjectionPoint { .. }
            | InterceptorMethodShouldNotThrowCheckedExceptions { .. }
            | BeanNotPassivationCapable { .. }
            | InterceptorEnabledForApplicationAndBeanArchive { .. }
            | DecoratorEnabledForApplicationAndBeanArchive { .. } => Severity::Warning,

            BeanSpecializedTooManyTimes { .. }
            | NewWithQualifiers { .. }
            | InjectionIntoNonBean { .. }
            | InjectionIntoNonDependentBean { .. }
            | InjectionPointWithTypeVariable { .. }
            | DisposalMethodsWithoutProducer { .. }
            | InjectionPointHasWildcard { .. }
            | InjectionPointMustHaveTypeParameter { .. }
            | NonFieldInjectionPointCannotUseNamed { .. }
            | DecoratorsCannotHaveProducerMethods { .. }
            | DecoratorsCannotHaveProducerFields { .. }
            | DecoratorsCannotHaveDisposerMethods { .. }
            | InterceptorsCannotHaveProducerMethods { .. }
            | InterceptorsCannotHaveProducerFields { .. }
            | InterceptorsCannotHaveDisposerMethods { .. }
            | InterceptorsCannotHaveObserverMethods { .. }
            | DecoratorsCannotHaveObserverMethods { .. }
            | InterceptorMethodDoesNotReturnObject { .. }
            | InterceptorMethodDoesNotHaveExactlyOneParameter { .. }
            | InterceptorMethodDoesNotHaveCorrectTypeOfParameter { .. }
            | UserTransactionInjectionIntoBeanWithContainerManagedTransactions { .. }
            | InvalidBeanMetadataInjectionPointType { .. }
            | InvalidBeanMetadataInjectionPointTypeArgument { .. }
            | InvalidBeanMetadataInjectionPointQualifier { .. }
            | NoDecoratedTypes { .. }
            | InjectionIntoDisposerMethod { .. }
            | InterceptorMethodDoesNotReturnObjectOrVoid { .. }
            | InterceptorMethodDoesNotHaveVoidReturnType { .. }
            | InterceptorMethodDoesNotHaveZeroParameters { .. }
            | EventMetadataInjectedOutsideOfObserver { .. }
            | InterceptorMustBeDependent { .. } => Severity::DefinitionError,

            _ => Severity::DeploymentError,
        }
    }

    /// Stable snake_case name, identical to the serialized tag.
    pub fn name(&self) -> &'static str {
        use FindingKind::*;
        match self {
            BeanSpecializedTooManyTimes { .. } => "bean_specialized_too_many_times",
            PassivatingBeanWithNonserializableInterceptor { .. } => {
                "passivating_bean_with_nonserializable_interceptor"
            }
            PassivatingBeanWithNonserializableDecorator { .. } => {
                "passivating_bean_with_nonserializable_decorator"
            }
            NewWithQualifiers { .. } => "new_with_qualifiers",
            InjectionIntoNonBean { .. } => "injection_into_non_bean",
            InjectionIntoNonDependentBean { .. } => "injection_into_non_dependent_bean",
            InjectionPointWithTypeVariable { .. } => "injection_point_with_type_variable",
            InjectionPointHasUnsatisfiedDependencies { .. } => {
                "injection_point_has_unsatisfied_dependencies"
            }
            InjectionPointHasAmbiguousDependencies { .. } => {
                "injection_point_has_ambiguous_dependencies"
            }
            InjectionPointHasNonProxyableDependencies { .. } => {
                "injection_point_has_non_proxyable_dependencies"
            }
            InjectionPointHasNonSerializableDependency { .. } => {
                "injection_point_has_non_serializable_dependency"
            }
            AmbiguousElName { .. } => "ambiguous_el_name",
            BeanNameIsPrefix { .. } => "bean_name_is_prefix",
            InterceptorSpecifiedTwice { .. } => "interceptor_specified_twice",
            InterceptorClassDoesNotMatchInterceptorBean { .. } => {
                "interceptor_class_does_not_match_interceptor_bean"
            }
            DecoratorSpecifiedTwice { .. } => "decorator_specified_twice",
            DecoratorClassNotBeanClassOfDecorator { .. } => {
                "decorator_class_not_bean_class_of_decorator"
            }
            AlternativeStereotypeNotStereotype { .. } => "alternative_stereotype_not_stereotype",
            AlternativeStereotypeSpecifiedMultipleTimes { .. } => {
                "alternative_stereotype_specified_multiple_times"
            }
            AlternativeBeanClassNotAnnotated { .. } => "alternative_bean_class_not_annotated",
            DisposalMethodsWithoutProducer { .. } => "disposal_methods_without_producer",
            InjectionPointHasWildcard { .. } => "injection_point_has_wildcard",
            InjectionPointMustHaveTypeParameter { .. } => {
                "injection_point_must_have_type_parameter"
            }
            NonFieldInjectionPointCannotUseNamed { .. } => {
                "non_field_injection_point_cannot_use_named"
            }
            DecoratorsCannotHaveProducerMethods { .. } => "decorators_cannot_have_producer_methods",
            DecoratorsCannotHaveProducerFields { .. } => "decorators_cannot_have_producer_fields",
            DecoratorsCannotHaveDisposerMethods { .. } => "decorators_cannot_have_disposer_methods",
            InterceptorsCannotHaveProducerMethods { .. } => {
                "interceptors_cannot_have_producer_methods"
            }
            InterceptorsCannotHaveProducerFields { .. } => {
                "interceptors_cannot_have_producer_fields"
            }
            InterceptorsCannotHaveDisposerMethods { .. } => {
                "interceptors_cannot_have_disposer_methods"
            }
            NotProxyableUnknown { .. } => "not_proxyable_unknown",
            NotProxyableNoConstructor { .. } => "not_proxyable_no_constructor",
            NotProxyablePrivateConstructor { .. } => "not_proxyable_private_constructor",
            NotProxyableFinalTypeOrMethod { .. } => "not_proxyable_final_type_or_method",
            NotProxyablePrimitive { .. } => "not_proxyable_primitive",
            NotProxyableArrayType { .. } => "not_proxyable_array_type",
            ScopeAnnotationOnInjectionPoint { .. } => "scope_annotation_on_injection_point",
            AlternativeBeanClassNotClass { .. } => "alternative_bean_class_not_class",
            AlternativeStereotypeNotAnnotated { .. } => "alternative_stereotype_not_annotated",
            PseudoScopedBeanHasCircularReferences { .. } => {
                "pseudo_scoped_bean_has_circular_references"
            }
            InterceptorsCannotHaveObserverMethods { .. } => {
                "interceptors_cannot_have_observer_methods"
            }
            DecoratorsCannotHaveObserverMethods { .. } => "decorators_cannot_have_observer_methods",
            InterceptorMethodDoesNotReturnObject { .. } => "interceptor_method_does_not_return_object",
            InterceptorMethodDoesNotHaveExactlyOneParameter { .. } => {
                "interceptor_method_does_not_have_exactly_one_parameter"
            }
            InterceptorMethodDoesNotHaveCorrectTypeOfParameter { .. } => {
                "interceptor_method_does_not_have_correct_type_of_parameter"
            }
            UserTransactionInjectionIntoBeanWithContainerManagedTransactions { .. } => {
                "user_transaction_injection_into_bean_with_container_managed_transactions"
            }
            InvalidBeanMetadataInjectionPointType { .. } => {
                "invalid_bean_metadata_injection_point_type"
            }
            InvalidBeanMetadataInjectionPointTypeArgument { .. } => {
                "invalid_bean_metadata_injection_point_type_argument"
            }
            InvalidBeanMetadataInjectionPointQualifier { .. } => {
                "invalid_bean_metadata_injection_point_qualifier"
            }
            NoDecoratedTypes { .. } => "no_decorated_types",
            AlternativeClassSpecifiedMultipleTimes { .. } => {
                "alternative_class_specified_multiple_times"
            }
            BeanWithPassivatingScopeNotPassivationCapable { .. } => {
                "bean_with_passivating_scope_not_passivation_capable"
            }
            BuiltinBeanWithNonserializableDecorator { .. } => {
                "builtin_bean_with_nonserializable_decorator"
            }
            InjectionIntoDisposerMethod { .. } => "injection_into_disposer_method",
            InterceptorMethodDoesNotReturnObjectOrVoid { .. } => {
                "interceptor_method_does_not_return_object_or_void"
            }
            InterceptorMethodDoesNotHaveVoidReturnType { .. } => {
                "interceptor_method_does_not_have_void_return_type"
            }
            InterceptorMethodDoesNotHaveZeroParameters { .. } => {
                "interceptor_method_does_not_have_zero_parameters"
            }
            InterceptorMethodShouldNotThrowCheckedExceptions { .. } => {
                "interceptor_method_should_not_throw_checked_exceptions"
            }
            EventMetadataInjectedOutsideOfObserver { .. } => {
                "event_metadata_injected_outside_of_observer"
            }
            BeanNotPassivationCapable { .. } => "bean_not_passivation_capable",
            InterceptorMustBeDependent { .. } => "interceptor_must_be_dependent",
            InterceptorDecoratorInjectionPointHasNonSerializableDependency { .. } => {
                "interceptor_decorator_injection_point_has_non_serializable_dependency"
            }
            InterceptorEnabledForApplicationAndBeanArchive { .. } => {
                "interceptor_enabled_for_application_and_bean_archive"
            }
            DecoratorEnabledForApplicationAndBeanArchive { .. } => {
                "decorator_enabled_for_application_and_bean_archive"
            }
        }
    }

    /// Positional parameters in catalog order.
    pub fn params(&self) -> Vec<Param> {
        use FindingKind::*;
        let text = |s: &str| Param::Text(s.to_string());
        let method_params = |m: &MethodRef| {
            vec![
                Param::Text(m.method.clone()),
                Param::Text(m.declaring_class.clone()),
                Param::Text(m.kind.annotation_name().to_string()),
            ]
        };
        match self {
            BeanSpecializedTooManyTimes {
                target,
                specializers,
            } => vec![Param::Bean(*target), Param::Beans(specializers.clone())],
            PassivatingBeanWithNonserializableInterceptor { bean, interceptor } => {
                vec![Param::Bean(*bean), Param::Bean(*interceptor)]
            }
            PassivatingBeanWithNonserializableDecorator { bean, decorator } => {
                vec![Param::Bean(*bean), Param::Bean(*decorator)]
            }
            NewWithQualifiers { injection_point }
            | InjectionIntoNonBean { injection_point }
            | InjectionIntoNonDependentBean { injection_point }
            | InjectionPointWithTypeVariable { injection_point }
            | InjectionPointHasNonProxyableDependencies { injection_point }
            | NonFieldInjectionPointCannotUseNamed { injection_point }
            | UserTransactionInjectionIntoBeanWithContainerManagedTransactions {
                injection_point,
            }
            | InjectionIntoDisposerMethod { injection_point }
            | EventMetadataInjectedOutsideOfObserver { injection_point } => {
                vec![Param::InjectionPoint(*injection_point)]
            }
            InjectionPointHasUnsatisfiedDependencies {
                injection_point,
                qualifiers,
                required_type,
                hints,
            } => vec![
                Param::InjectionPoint(*injection_point),
                Param::Qualifiers(qualifiers.clone()),
                Param::Type(required_type.clone()),
                Param::Hints(hints.clone()),
            ],
            InjectionPointHasAmbiguousDependencies {
                injection_point,
                qualifiers,
                required_type,
                candidates,
            } => vec![
                Param::InjectionPoint(*injection_point),
                Param::Qualifiers(qualifiers.clone()),
                Param::Type(required_type.clone()),
                Param::Beans(candidates.clone()),
            ],
            InjectionPointHasNonSerializableDependency {
                bean,
                dependency,
                injection_point,
            } => vec![
                Param::Bean(*bean),
                Param::Bean(*dependency),
                Param::InjectionPoint(*injection_point),
            ],
            AmbiguousElName { name, beans } => vec![text(name), Param::Beans(beans.clone())],
            BeanNameIsPrefix { name } => vec![text(name)],
            InterceptorSpecifiedTwice {
                class_name,
                first,
                second,
            }
            | DecoratorSpecifiedTwice {
                class_name,
                first,
                second,
            }
            | AlternativeStereotypeSpecifiedMultipleTimes {
                class_name,
                first,
                second,
            }
            | AlternativeClassSpecifiedMultipleTimes {
                class_name,
                first,
                second,
            } => vec![
                text(class_name),
                Param::Site(first.clone()),
                Param::Site(second.clone()),
            ],
            InterceptorClassDoesNotMatchInterceptorBean { class_name, site }
            | AlternativeStereotypeNotStereotype { class_name, site }
            | AlternativeBeanClassNotAnnotated { class_name, site }
            | AlternativeBeanClassNotClass { class_name, site }
            | AlternativeStereotypeNotAnnotated { class_name, site } => {
                vec![text(class_name), Param::Site(site.clone())]
            }
            DecoratorClassNotBeanClassOfDecorator {
                class_name,
                decorators,
            } => vec![text(class_name), Param::Beans(decorators.clone())],
            DisposalMethodsWithoutProducer { disposers } => {
                vec![Param::Disposers(disposers.clone())]
            }
            InjectionPointHasWildcard {
                required_type,
                injection_point,
            }
            | InjectionPointMustHaveTypeParameter {
                required_type,
                injection_point,
            }
            | InvalidBeanMetadataInjectionPointType {
                required_type,
                injection_point,
            } => vec![
                Param::Type(required_type.clone()),
                Param::InjectionPoint(*injection_point),
            ],
            DecoratorsCannotHaveProducerMethods { decorator }
            | DecoratorsCannotHaveProducerFields { decorator }
            | DecoratorsCannotHaveDisposerMethods { decorator }
            | DecoratorsCannotHaveObserverMethods { decorator }
            | NoDecoratedTypes { decorator } => vec![Param::Bean(*decorator)],
            InterceptorsCannotHaveProducerMethods { interceptor }
            | InterceptorsCannotHaveProducerFields { interceptor }
            | InterceptorsCannotHaveDisposerMethods { interceptor }
            | InterceptorsCannotHaveObserverMethods { interceptor } => {
                vec![Param::Bean(*interceptor)]
            }
            NotProxyableUnknown { bean, detail } => vec![Param::Bean(*bean), text(detail)],
            NotProxyableNoConstructor { bean, type_name }
            | NotProxyablePrimitive { bean, type_name }
            | NotProxyableArrayType { bean, type_name } => {
                vec![Param::Bean(*bean), text(type_name)]
            }
            NotProxyablePrivateConstructor {
                type_name,
                constructor,
                bean,
            } => vec![text(type_name), text(constructor), Param::Bean(*bean)],
            NotProxyableFinalTypeOrMethod {
                bean,
                member,
                type_name,
            } => vec![Param::Bean(*bean), text(member), text(type_name)],
            ScopeAnnotationOnInjectionPoint {
                scope,
                injection_point,
            } => vec![text(scope), Param::InjectionPoint(*injection_point)],
            PseudoScopedBeanHasCircularReferences { path } => vec![Param::Path(path.clone())],
            InterceptorMethodDoesNotReturnObject { method, expected }
            | InterceptorMethodDoesNotHaveCorrectTypeOfParameter { method, expected } => {
                let mut params = method_params(method);
                params.push(text(expected));
                params
            }
            InterceptorMethodDoesNotHaveExactlyOneParameter { method }
            | InterceptorMethodDoesNotHaveZeroParameters { method } => method_params(method),
            InterceptorMethodDoesNotReturnObjectOrVoid { method } => {
                let mut params = method_params(method);
                params.push(text("Object"));
                params.push(text("void"));
                params
            }
            InterceptorMethodDoesNotHaveVoidReturnType { method } => {
                let mut params = method_params(method);
                params.push(text("void"));
                params
            }
            InterceptorMethodShouldNotThrowCheckedExceptions { method, exception } => vec![
                Param::Text(method.method.clone()),
                Param::Text(method.declaring_class.clone()),
                text(exception),
            ],
            InvalidBeanMetadataInjectionPointTypeArgument {
                type_argument,
                injection_point,
            } => vec![
                Param::Type(type_argument.clone()),
                Param::InjectionPoint(*injection_point),
            ],
            InvalidBeanMetadataInjectionPointQualifier {
                qualifier,
                required_kind,
                injection_point,
            } => vec![
                text(qualifier),
                Param::Text(required_kind.to_string()),
                Param::InjectionPoint(*injection_point),
            ],
            BeanWithPassivatingScopeNotPassivationCapable { bean }
            | BeanNotPassivationCapable { bean } => vec![Param::Bean(*bean)],
            BuiltinBeanWithNonserializableDecorator { decorator, bean } => {
                vec![Param::Bean(*decorator), Param::Bean(*bean)]
            }
            InterceptorMustBeDependent { component } => vec![Param::Bean(*component)],
            InterceptorDecoratorInjectionPointHasNonSerializableDependency {
                bean,
                role,
                component,
                dependency,
                injection_point,
            } => vec![
                Param::Bean(*bean),
                Param::Text(role.to_string()),
                Param::Bean(*component),
                Param::Bean(*dependency),
                Param::InjectionPoint(*injection_point),
            ],
            InterceptorEnabledForApplicationAndBeanArchive { class_name, archive }
            | DecoratorEnabledForApplicationAndBeanArchive { class_name, archive } => {
                vec![text(class_name), Param::Archive(*archive)]
            }
        }
    }

    /// Graph elements this finding is anchored to.
    pub fn subjects(&self) -> Vec<Subject> {
        use FindingKind::*;
        match self {
            BeanSpecializedTooManyTimes { specializers, .. } => {
                specializers.iter().copied().map(Subject::Bean).collect()
            }
            DisposalMethodsWithoutProducer { disposers } => {
                let mut beans: Vec<BeanId> = disposers.iter().map(|d| d.bean).collect();
                beans.dedup();
                beans.into_iter().map(Subject::Bean).collect()
            }
            PseudoScopedBeanHasCircularReferences { path } => {
                let mut beans = path.clone();
                beans.sort();
                beans.dedup();
                beans.into_iter().map(Subject::Bean).collect()
            }
            InterceptorEnabledForApplicationAndBeanArchive { archive, .. }
            | DecoratorEnabledForApplicationAndBeanArchive { archive, .. } => {
                vec![Subject::Archive(*archive)]
            }
            InterceptorMethodDoesNotReturnObject { method, .. }
            | InterceptorMethodDoesNotHaveExactlyOneParameter { method }
            | InterceptorMethodDoesNotHaveCorrectTypeOfParameter { method, .. }
            | InterceptorMethodDoesNotReturnObjectOrVoid { method }
            | InterceptorMethodDoesNotHaveVoidReturnType { method }
            | InterceptorMethodDoesNotHaveZeroParameters { method }
            | InterceptorMethodShouldNotThrowCheckedExceptions { method, .. } => {
                vec![Subject::Bean(method.bean)]
            }
            _ => self
                .params()
                .into_iter()
                .find_map(|p| match p {
                    Param::InjectionPoint(ip) => Some(Subject::InjectionPoint(ip)),
                    Param::Bean(bean) => Some(Subject::Bean(bean)),
                    _ => None,
                })
                .into_iter()
                .collect(),
        }
    }
}

/// A single validation result.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    #[serde(flatten)]
    pub kind: FindingKind,

    /// Underlying oracle failure, kept as an error value.
    #[serde(skip)]
    cause: Option<Arc<UnproxyableError>>,
}

impl Finding {
    pub fn new(kind: FindingKind) -> Self {
        Self { kind, cause: None }
    }

    pub fn with_cause(kind: FindingKind, cause: UnproxyableError) -> Self {
        Self {
            kind,
            cause: Some(Arc::new(cause)),
        }
    }

    pub fn id(&self) -> u16 {
        self.kind.id()
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn params(&self) -> Vec<Param> {
        self.kind.params()
    }

    pub fn subjects(&self) -> Vec<Subject> {
        self.kind.subjects()
    }

    /// Primary anchor, if the finding is tied to a single graph element.
    pub fn subject(&self) -> Option<Subject> {
        self.kind.subjects().into_iter().next()
    }

    pub fn cause(&self) -> Option<&UnproxyableError> {
        self.cause.as_deref()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity().is_fatal()
    }

    /// Display code, e.g. `BEAN-001408`.
    pub fn code(&self) -> String {
        format!("BEAN-{:06}", self.id())
    }
}

impl PartialEq for Finding {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.cause.as_ref().map(ToString::to_string)
                == other.cause.as_ref().map(ToString::to_string)
    }
}

impl From<FindingKind> for Finding {
    fn from(kind: FindingKind) -> Self {
        Finding::new(kind)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.code(), self.severity(), self.name())
    }
}
