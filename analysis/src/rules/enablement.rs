//! Rule: archive enablement descriptors.
//!
//! Each archive lists enabled interceptors, decorators, alternative classes
//! and alternative stereotypes. Entries must be unique within a list and must
//! name something of the right kind. Enabling an interceptor or decorator
//! both application-wide and in an archive is allowed but warned about.

use std::collections::BTreeMap;

use async_trait::async_trait;

use beancheck_core::model::{
    BeanArchive, DeclKind, DeclarationSite, EnabledClass, GraphModel,
};

use crate::rules::{Phase, Rule, RuleContext};
use crate::types::finding::{Finding, FindingKind};

#[derive(Debug, Default)]
pub struct EnablementRule;

impl EnablementRule {
    pub fn new() -> Self {
        Self
    }
}

/// First two sites of every class listed more than once, in order of first
/// appearance.
fn duplicates(entries: &[EnabledClass]) -> Vec<(&str, &DeclarationSite, &DeclarationSite)> {
    let mut first_seen: BTreeMap<&str, &DeclarationSite> = BTreeMap::new();
    let mut reported: Vec<&str> = Vec::new();
    let mut out = Vec::new();
    for entry in entries {
        let class = entry.class_name.as_str();
        match first_seen.get(class) {
            Some(first) if !reported.contains(&class) => {
                reported.push(class);
                out.push((class, *first, &entry.site));
            }
            Some(_) => {}
            None => {
                first_seen.insert(class, &entry.site);
            }
        }
    }
    out
}

/// Entries with repeats removed, keeping the first site.
fn distinct(entries: &[EnabledClass]) -> Vec<&EnabledClass> {
    let mut out: Vec<&EnabledClass> = Vec::new();
    for entry in entries {
        if !out.iter().any(|e| e.class_name == entry.class_name) {
            out.push(entry);
        }
    }
    out
}

fn globally_enabled(list: &[EnabledClass], class_name: &str) -> bool {
    list.iter().any(|e| e.class_name == class_name)
}

fn check_interceptors(model: &GraphModel, archive: &BeanArchive, out: &mut Vec<Finding>) {
    for (class, first, second) in duplicates(&archive.interceptors) {
        out.push(
            FindingKind::InterceptorSpecifiedTwice {
                class_name: class.to_string(),
                first: first.clone(),
                second: second.clone(),
            }
            .into(),
        );
    }
    for entry in distinct(&archive.interceptors) {
        if globally_enabled(&model.global.interceptors, &entry.class_name) {
            out.push(
                FindingKind::InterceptorEnabledForApplicationAndBeanArchive {
                    class_name: entry.class_name.clone(),
                    archive: archive.id,
                }
                .into(),
            );
        }
        if !model.interceptors().any(|b| b.class_name == entry.class_name) {
            out.push(
                FindingKind::InterceptorClassDoesNotMatchInterceptorBean {
                    class_name: entry.class_name.clone(),
                    site: entry.site.clone(),
                }
                .into(),
            );
        }
    }
}

fn check_decorators(model: &GraphModel, archive: &BeanArchive, out: &mut Vec<Finding>) {
    for (class, first, second) in duplicates(&archive.decorators) {
        out.push(
            FindingKind::DecoratorSpecifiedTwice {
                class_name: class.to_string(),
                first: first.clone(),
                second: second.clone(),
            }
            .into(),
        );
    }
    for entry in distinct(&archive.decorators) {
        if globally_enabled(&model.global.decorators, &entry.class_name) {
            out.push(
                FindingKind::DecoratorEnabledForApplicationAndBeanArchive {
                    class_name: entry.class_name.clone(),
                    archive: archive.id,
                }
                .into(),
            );
        }
        if !model.decorators().any(|b| b.class_name == entry.class_name) {
            out.push(
                FindingKind::DecoratorClassNotBeanClassOfDecorator {
                    class_name: entry.class_name.clone(),
                    decorators: model.decorators().map(|b| b.id).collect(),
                }
                .into(),
            );
        }
    }
}

fn check_alternative_classes(model: &GraphModel, archive: &BeanArchive, out: &mut Vec<Finding>) {
    for (class, first, second) in duplicates(&archive.alternative_classes) {
        out.push(
            FindingKind::AlternativeClassSpecifiedMultipleTimes {
                class_name: class.to_string(),
                first: first.clone(),
                second: second.clone(),
            }
            .into(),
        );
    }
    for entry in distinct(&archive.alternative_classes) {
        let decl = model.class_decl(&entry.class_name);
        if decl.is_some_and(|d| d.kind != DeclKind::Class) {
            out.push(
                FindingKind::AlternativeBeanClassNotClass {
                    class_name: entry.class_name.clone(),
                    site: entry.site.clone(),
                }
                .into(),
            );
            continue;
        }
        // Producers declared `@Alternative` on a plain class count as well.
        let annotated = decl.is_some_and(|d| d.alternative)
            || model
                .beans
                .iter()
                .any(|b| b.alternative && b.class_name == entry.class_name);
        if !annotated {
            out.push(
                FindingKind::AlternativeBeanClassNotAnnotated {
                    class_name: entry.class_name.clone(),
                    site: entry.site.clone(),
                }
                .into(),
            );
        }
    }
}

fn check_alternative_stereotypes(
    model: &GraphModel,
    archive: &BeanArchive,
    out: &mut Vec<Finding>,
) {
    for (class, first, second) in duplicates(&archive.alternative_stereotypes) {
        out.push(
            FindingKind::AlternativeStereotypeSpecifiedMultipleTimes {
                class_name: class.to_string(),
                first: first.clone(),
                second: second.clone(),
            }
            .into(),
        );
    }
    for entry in distinct(&archive.alternative_stereotypes) {
        let kind = match model.class_decl(&entry.class_name) {
            Some(decl) if decl.stereotype && decl.alternative => continue,
            Some(decl) if decl.stereotype => FindingKind::AlternativeStereotypeNotAnnotated {
                class_name: entry.class_name.clone(),
                site: entry.site.clone(),
            },
            _ => FindingKind::AlternativeStereotypeNotStereotype {
                class_name: entry.class_name.clone(),
                site: entry.site.clone(),
            },
        };
        out.push(kind.into());
    }
}

#[async_trait]
impl Rule for EnablementRule {
    fn id(&self) -> &'static str {
        "bean.enablement"
    }

    fn name(&self) -> &'static str {
        "Invalid archive enablement"
    }

    fn phase(&self) -> Phase {
        Phase::Deployment
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let model = &ctx.model;
        let mut findings = Vec::new();
        for archive in &model.archives {
            check_interceptors(model, archive, &mut findings);
            check_decorators(model, archive, &mut findings);
            check_alternative_classes(model, archive, &mut findings);
            check_alternative_stereotypes(model, archive, &mut findings);
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ModelBuilder;
    use crate::types::finding::Severity;
    use beancheck_core::model::{ArchiveId, Scope};
    use beancheck_core::oracle::StaticResolver;
    use beancheck_core::types::TypeRef;
    use std::sync::Arc;

    const DESCRIPTOR: &str = "META-INF/beans.xml";

    fn enabled(class: &str, line: u32) -> EnabledClass {
        EnabledClass::new(class, DeclarationSite::new(DESCRIPTOR, line))
    }

    async fn evaluate(b: ModelBuilder) -> Vec<Finding> {
        let ctx = RuleContext::new(b.arc(), Arc::new(StaticResolver::new()));
        EnablementRule::new().evaluate(&ctx).await
    }

    #[tokio::test]
    async fn test_duplicate_interceptor_reports_both_sites() {
        let mut b = ModelBuilder::new();
        b.interceptor("AuditInterceptor");
        b.archive_mut(ArchiveId(0)).interceptors = vec![
            enabled("AuditInterceptor", 4),
            enabled("AuditInterceptor", 5),
            enabled("AuditInterceptor", 6),
        ];
        let findings = evaluate(b).await;
        assert_eq!(
            findings,
            vec![Finding::new(FindingKind::InterceptorSpecifiedTwice {
                class_name: "AuditInterceptor".into(),
                first: DeclarationSite::new(DESCRIPTOR, 4),
                second: DeclarationSite::new(DESCRIPTOR, 5),
            })]
        );
    }

    #[tokio::test]
    async fn test_global_and_archive_overlap_is_only_a_warning() {
        let mut b = ModelBuilder::new();
        b.interceptor("AuditInterceptor");
        b.model_mut().global.interceptors = vec![enabled("AuditInterceptor", 1)];
        b.archive_mut(ArchiveId(0)).interceptors = vec![enabled("AuditInterceptor", 4)];
        let findings = evaluate(b).await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id(), 1478);
        assert_eq!(findings[0].severity(), Severity::Warning);
    }

    #[tokio::test]
    async fn test_enabled_classes_must_be_components() {
        let mut b = ModelBuilder::new();
        let timing = b.decorator("TimingDecorator", TypeRef::class("Orders"));
        b.bean("OrderService", Scope::dependent());
        let archive = b.archive("orders.jar");
        b.archive_mut(archive).interceptors = vec![enabled("OrderService", 3)];
        b.archive_mut(archive).decorators = vec![enabled("OrderService", 7)];
        let findings = evaluate(b).await;
        assert_eq!(
            findings.iter().map(|f| f.kind.clone()).collect::<Vec<_>>(),
            vec![
                FindingKind::InterceptorClassDoesNotMatchInterceptorBean {
                    class_name: "OrderService".into(),
                    site: DeclarationSite::new(DESCRIPTOR, 3),
                },
                FindingKind::DecoratorClassNotBeanClassOfDecorator {
                    class_name: "OrderService".into(),
                    decorators: vec![timing],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_alternative_classes() {
        let mut b = ModelBuilder::new();
        b.class("Payments", DeclKind::Interface, false, false);
        b.class("MockPayments", DeclKind::Class, true, false);
        b.class("StubPayments", DeclKind::Class, false, false);
        let factory = b.bean("PaymentsFactory", Scope::dependent());
        b.bean_mut(factory).alternative = true;
        b.archive_mut(ArchiveId(0)).alternative_classes = vec![
            enabled("Payments", 1),
            enabled("MockPayments", 2),
            enabled("StubPayments", 3),
            enabled("PaymentsFactory", 4),
            enabled("MockPayments", 5),
        ];
        let ids: Vec<u16> = evaluate(b).await.iter().map(Finding::id).collect();
        assert_eq!(ids, vec![1457, 1441, 1422]);
    }

    #[tokio::test]
    async fn test_alternative_stereotypes() {
        let mut b = ModelBuilder::new();
        b.class("Mock", DeclKind::Annotation, true, true);
        b.class("Staging", DeclKind::Annotation, false, true);
        b.class("Audited", DeclKind::Annotation, false, false);
        b.archive_mut(ArchiveId(0)).alternative_stereotypes = vec![
            enabled("Mock", 1),
            enabled("Staging", 2),
            enabled("Audited", 3),
            enabled("Unknown", 4),
        ];
        let ids: Vec<u16> = evaluate(b).await.iter().map(Finding::id).collect();
        assert_eq!(ids, vec![1442, 1420, 1420]);
    }
}
