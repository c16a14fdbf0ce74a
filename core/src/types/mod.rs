pub mod qualifier;
pub mod type_ref;

pub use qualifier::Qualifier;
pub use type_ref::TypeRef;

/// Raw names of container-provided types that get special treatment during
/// validation.
pub mod well_known {
    pub const OBJECT: &str = "Object";
    pub const INJECTION_POINT: &str = "InjectionPoint";
    pub const EVENT_METADATA: &str = "EventMetadata";
    pub const INSTANCE: &str = "Instance";
    pub const EVENT: &str = "Event";
    pub const BEAN: &str = "Bean";
    pub const INTERCEPTOR: &str = "Interceptor";
    pub const DECORATOR: &str = "Decorator";
    pub const INVOCATION_CONTEXT: &str = "InvocationContext";
    pub const USER_TRANSACTION: &str = "UserTransaction";
    pub const VOID: &str = "void";

    /// Types that are always satisfied by built-in beans and never go through
    /// typesafe resolution.
    pub const CONTAINER_PROVIDED: &[&str] = &[
        INJECTION_POINT,
        EVENT_METADATA,
        INSTANCE,
        EVENT,
        BEAN,
        INTERCEPTOR,
        DECORATOR,
    ];

    /// Bean metadata facades.
    pub const BEAN_METADATA: &[&str] = &[BEAN, INTERCEPTOR, DECORATOR];
}
