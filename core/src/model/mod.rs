//! Frozen view of a resolved deployment.
//!
//! The model is produced by an external resolver after discovery and handed
//! to the validator behind an `Arc`. Everything is referenced by index
//! (`BeanId`, `InjectionPointId`, `ArchiveId`) so that whole-graph passes can
//! work on plain integers.

pub mod archive;
pub mod bean;
pub mod injection_point;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

pub use archive::{
    ArchiveId, BeanArchive, ClassDecl, DeclKind, DeclarationSite, EnabledClass, GlobalEnablement,
};
pub use bean::{
    Bean, BeanId, BeanKind, DeclaredException, DeclaredMembers, DecoratorInfo, DisposerMethod,
    InterceptionKind, InterceptionMethod, InterceptorInfo, Scope, ScopeKind,
};
pub use injection_point::{
    InjectionPoint, InjectionPointId, InjectionPointOwner, Member, MethodRole,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphModel {
    #[serde(default)]
    pub beans: Vec<Bean>,
    #[serde(default)]
    pub injection_points: Vec<InjectionPoint>,
    #[serde(default)]
    pub archives: Vec<BeanArchive>,
    #[serde(default)]
    pub global: GlobalEnablement,
    /// Classes named by descriptors, keyed by class name.
    #[serde(default)]
    pub classes: BTreeMap<String, ClassDecl>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panics on an out-of-range id; call [`check_consistency`] first.
    ///
    /// [`check_consistency`]: GraphModel::check_consistency
    pub fn bean(&self, id: BeanId) -> &Bean {
        &self.beans[id.0]
    }

    /// Panics on an out-of-range id; call [`check_consistency`] first.
    ///
    /// [`check_consistency`]: GraphModel::check_consistency
    pub fn injection_point(&self, id: InjectionPointId) -> &InjectionPoint {
        &self.injection_points[id.0]
    }

    pub fn archive(&self, id: ArchiveId) -> Option<&BeanArchive> {
        self.archives.get(id.0)
    }

    pub fn class_decl(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    pub fn interceptors(&self) -> impl Iterator<Item = &Bean> {
        self.beans.iter().filter(|b| b.kind.is_interceptor())
    }

    pub fn decorators(&self) -> impl Iterator<Item = &Bean> {
        self.beans.iter().filter(|b| b.kind.is_decorator())
    }

    /// The bean owning an injection point, if it is owned by a bean.
    pub fn owner_of(&self, id: InjectionPointId) -> Option<&Bean> {
        self.injection_point(id)
            .owner_bean()
            .map(|bean| self.bean(bean))
    }

    /// The producer method bean declared on `declaring` by `method`.
    pub fn producer_method_bean(&self, declaring: BeanId, method: &str) -> Option<&Bean> {
        self.beans.iter().find(|b| {
            matches!(
                &b.kind,
                BeanKind::ProducerMethod { declaring_bean, method: m }
                    if *declaring_bean == declaring && m == method
            )
        })
    }

    /// Injection points declared by a bean, in declaration order.
    pub fn injection_points_of<'a>(
        &'a self,
        bean: &'a Bean,
    ) -> impl Iterator<Item = &'a InjectionPoint> + 'a {
        bean.injection_points
            .iter()
            .map(move |id| self.injection_point(*id))
    }

    /// Verify every index reference is in range and that each injection
    /// point is declared by exactly one owner.
    pub fn check_consistency(&self) -> Result<(), ModelError> {
        let bean_in_range = |referrer: String, id: BeanId| {
            if id.0 < self.beans.len() {
                Ok(())
            } else {
                Err(ModelError::UnknownBean { referrer, bean: id })
            }
        };
        let ip_in_range = |referrer: String, id: InjectionPointId| {
            if id.0 < self.injection_points.len() {
                Ok(())
            } else {
                Err(ModelError::UnknownInjectionPoint {
                    referrer,
                    injection_point: id,
                })
            }
        };

        for (index, bean) in self.beans.iter().enumerate() {
            if bean.id.0 != index {
                return Err(ModelError::MisplacedId {
                    kind: "bean",
                    index,
                    id: bean.id.0,
                });
            }
            if bean.archive.0 >= self.archives.len() {
                return Err(ModelError::UnknownArchive {
                    referrer: format!("{}.archive", bean.id),
                    archive: bean.archive,
                });
            }
            if let Some(target) = bean.specializes {
                bean_in_range(format!("{}.specializes", bean.id), target)?;
            }
            if let Some(declaring) = bean.kind.declaring_bean() {
                bean_in_range(format!("{}.declaring_bean", bean.id), declaring)?;
            }
            for id in bean.interceptors.iter().chain(&bean.decorators) {
                bean_in_range(format!("{}.bindings", bean.id), *id)?;
            }
            for ip in &bean.injection_points {
                ip_in_range(format!("{}.injection_points", bean.id), *ip)?;
            }
            if let BeanKind::Decorator(info) = &bean.kind {
                if let Some(delegate) = info.delegate {
                    ip_in_range(format!("{}.delegate", bean.id), delegate)?;
                }
            }
        }

        for (index, archive) in self.archives.iter().enumerate() {
            if archive.id.0 != index {
                return Err(ModelError::MisplacedId {
                    kind: "archive",
                    index,
                    id: archive.id.0,
                });
            }
        }

        let mut owners = vec![0usize; self.injection_points.len()];
        for bean in &self.beans {
            for ip in &bean.injection_points {
                owners[ip.0] += 1;
            }
        }
        for (index, ip) in self.injection_points.iter().enumerate() {
            if ip.id.0 != index {
                return Err(ModelError::MisplacedId {
                    kind: "injection point",
                    index,
                    id: ip.id.0,
                });
            }
            let expected = match ip.owner_bean() {
                Some(bean) => {
                    bean_in_range(format!("{}.owner", ip.id), bean)?;
                    if !self.bean(bean).injection_points.contains(&ip.id) {
                        return Err(ModelError::OwnerCount {
                            injection_point: ip.id,
                            owners: 0,
                        });
                    }
                    1
                }
                None => 0,
            };
            if owners[index] != expected {
                return Err(ModelError::OwnerCount {
                    injection_point: ip.id,
                    owners: owners[index],
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeRef;

    fn field(name: &str) -> Member {
        Member::Field {
            name: name.into(),
            transient: false,
        }
    }

    fn two_bean_model() -> GraphModel {
        let mut model = GraphModel::new();
        model
            .archives
            .push(BeanArchive::new(ArchiveId(0), "app.jar"));
        let mut a = Bean::managed(BeanId(0), "A", ArchiveId(0));
        a.injection_points.push(InjectionPointId(0));
        model.beans.push(a);
        model.beans.push(Bean::managed(BeanId(1), "B", ArchiveId(0)));
        model.injection_points.push(InjectionPoint::new(
            InjectionPointId(0),
            BeanId(0),
            field("b"),
            TypeRef::class("B"),
        ));
        model
    }

    #[test]
    fn consistent_model_passes() {
        assert_eq!(two_bean_model().check_consistency(), Ok(()));
    }

    #[test]
    fn dangling_specialization_is_rejected() {
        let mut model = two_bean_model();
        model.beans[1].specializes = Some(BeanId(7));
        assert!(matches!(
            model.check_consistency(),
            Err(ModelError::UnknownBean { bean: BeanId(7), .. })
        ));
    }

    #[test]
    fn injection_point_owned_twice_is_rejected() {
        let mut model = two_bean_model();
        model.beans[1].injection_points.push(InjectionPointId(0));
        assert!(matches!(
            model.check_consistency(),
            Err(ModelError::OwnerCount { owners: 2, .. })
        ));
    }

    #[test]
    fn injection_point_missing_from_owner_is_rejected() {
        let mut model = two_bean_model();
        model.beans[0].injection_points.clear();
        assert!(matches!(
            model.check_consistency(),
            Err(ModelError::OwnerCount { owners: 0, .. })
        ));
    }

    #[test]
    fn misplaced_bean_id_is_rejected() {
        let mut model = two_bean_model();
        model.beans[1].id = BeanId(5);
        assert!(matches!(
            model.check_consistency(),
            Err(ModelError::MisplacedId { kind: "bean", .. })
        ));
    }

    #[test]
    fn owner_lookup() {
        let model = two_bean_model();
        assert_eq!(
            model.owner_of(InjectionPointId(0)).map(|b| b.class_name.as_str()),
            Some("A")
        );
        let a = model.bean(BeanId(0));
        assert_eq!(model.injection_points_of(a).count(), 1);
    }

    #[test]
    fn model_round_trips_through_json() {
        let model = two_bean_model();
        let json = serde_json::to_string(&model).expect("serialize");
        let back: GraphModel = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, model);
    }
}
