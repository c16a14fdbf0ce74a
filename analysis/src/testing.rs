//! Fixture builder for rule and session tests.

use std::sync::Arc;

use beancheck_core::model::{
    ArchiveId, Bean, BeanArchive, BeanId, BeanKind, ClassDecl, DeclKind, DecoratorInfo,
    GraphModel, InjectionPoint, InjectionPointId, InjectionPointOwner, InterceptorInfo, Member,
    MethodRole, Scope,
};
use beancheck_core::types::TypeRef;

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct ModelBuilder {
    model: GraphModel,
}

impl ModelBuilder {
    /// A model with a single archive, `app.jar`.
    pub fn new() -> Self {
        let mut model = GraphModel::new();
        model.archives.push(BeanArchive::new(ArchiveId(0), "app.jar"));
        Self { model }
    }

    pub fn archive(&mut self, name: &str) -> ArchiveId {
        let id = ArchiveId(self.model.archives.len());
        self.model.archives.push(BeanArchive::new(id, name));
        id
    }

    pub fn archive_mut(&mut self, id: ArchiveId) -> &mut BeanArchive {
        &mut self.model.archives[id.0]
    }

    pub fn model_mut(&mut self) -> &mut GraphModel {
        &mut self.model
    }

    pub fn bean(&mut self, class_name: &str, scope: Scope) -> BeanId {
        let id = BeanId(self.model.beans.len());
        let mut bean = Bean::managed(id, class_name, ArchiveId(0));
        bean.scope = scope;
        self.model.beans.push(bean);
        id
    }

    pub fn bean_mut(&mut self, id: BeanId) -> &mut Bean {
        &mut self.model.beans[id.0]
    }

    pub fn add_type(&mut self, bean: BeanId, ty: TypeRef) {
        self.bean_mut(bean).types.push(ty);
    }

    pub fn interceptor(&mut self, class_name: &str) -> BeanId {
        let id = self.bean(class_name, Scope::dependent());
        self.bean_mut(id).kind = BeanKind::Interceptor(InterceptorInfo {
            bindings: vec!["Audited".into()],
        });
        id
    }

    pub fn decorator(&mut self, class_name: &str, decorated: TypeRef) -> BeanId {
        let id = self.bean(class_name, Scope::dependent());
        self.bean_mut(id).kind = BeanKind::Decorator(DecoratorInfo {
            decorated_types: vec![decorated],
            delegate: None,
        });
        id
    }

    pub fn producer_method(&mut self, declaring: BeanId, method: &str, ty: TypeRef) -> BeanId {
        let id = BeanId(self.model.beans.len());
        let declaring_bean = self.bean_mut(declaring);
        declaring_bean.members.producer_methods.push(method.to_string());
        let mut bean = Bean::managed(id, declaring_bean.class_name.clone(), declaring_bean.archive);
        bean.kind = BeanKind::ProducerMethod {
            declaring_bean: declaring,
            method: method.to_string(),
        };
        bean.types = vec![ty, TypeRef::class("Object")];
        self.model.beans.push(bean);
        id
    }

    fn push_point(&mut self, owner: Option<BeanId>, point: InjectionPoint) -> InjectionPointId {
        let id = point.id;
        self.model.injection_points.push(point);
        if let Some(owner) = owner {
            self.bean_mut(owner).injection_points.push(id);
        }
        id
    }

    pub fn field(&mut self, owner: BeanId, name: &str, ty: TypeRef) -> InjectionPointId {
        let id = InjectionPointId(self.model.injection_points.len());
        let member = Member::Field {
            name: name.to_string(),
            transient: false,
        };
        self.push_point(Some(owner), InjectionPoint::new(id, owner, member, ty))
    }

    pub fn transient_field(&mut self, owner: BeanId, name: &str, ty: TypeRef) -> InjectionPointId {
        let id = InjectionPointId(self.model.injection_points.len());
        let member = Member::Field {
            name: name.to_string(),
            transient: true,
        };
        self.push_point(Some(owner), InjectionPoint::new(id, owner, member, ty))
    }

    pub fn param(
        &mut self,
        owner: BeanId,
        method: &str,
        role: MethodRole,
        ty: TypeRef,
    ) -> InjectionPointId {
        let id = InjectionPointId(self.model.injection_points.len());
        let member = Member::Parameter {
            method: method.to_string(),
            position: 0,
            role,
        };
        self.push_point(Some(owner), InjectionPoint::new(id, owner, member, ty))
    }

    /// Injection into a class the container does not manage as a bean.
    pub fn non_bean_field(&mut self, class_name: &str, name: &str, ty: TypeRef) -> InjectionPointId {
        let id = InjectionPointId(self.model.injection_points.len());
        let mut point = InjectionPoint::new(
            id,
            BeanId(0),
            Member::Field {
                name: name.to_string(),
                transient: false,
            },
            ty,
        );
        point.owner = InjectionPointOwner::NonBean {
            class_name: class_name.to_string(),
        };
        self.push_point(None, point)
    }

    pub fn ip_mut(&mut self, id: InjectionPointId) -> &mut InjectionPoint {
        &mut self.model.injection_points[id.0]
    }

    pub fn class(&mut self, name: &str, kind: DeclKind, alternative: bool, stereotype: bool) {
        self.model.classes.insert(
            name.to_string(),
            ClassDecl {
                name: name.to_string(),
                kind,
                alternative,
                stereotype,
            },
        );
    }

    pub fn build(self) -> GraphModel {
        self.model
    }

    pub fn arc(self) -> Arc<GraphModel> {
        Arc::new(self.model)
    }
}
