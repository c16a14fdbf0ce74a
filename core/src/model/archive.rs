use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a bean archive inside
/// [`GraphModel::archives`](crate::model::GraphModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArchiveId(pub usize);

impl fmt::Display for ArchiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "archive#{}", self.0)
    }
}

/// Where an enablement entry was declared (descriptor path and line).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclarationSite {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl DeclarationSite {
    pub fn new(source: impl Into<String>, line: u32) -> Self {
        Self {
            source: source.into(),
            line: Some(line),
        }
    }
}

impl fmt::Display for DeclarationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}@{}", self.source, line),
            None => f.write_str(&self.source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledClass {
    pub class_name: String,
    pub site: DeclarationSite,
}

impl EnabledClass {
    pub fn new(class_name: impl Into<String>, site: DeclarationSite) -> Self {
        Self {
            class_name: class_name.into(),
            site,
        }
    }
}

/// A deployment unit and its local enablement configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeanArchive {
    pub id: ArchiveId,
    pub name: String,
    #[serde(default)]
    pub interceptors: Vec<EnabledClass>,
    #[serde(default)]
    pub decorators: Vec<EnabledClass>,
    #[serde(default)]
    pub alternative_classes: Vec<EnabledClass>,
    #[serde(default)]
    pub alternative_stereotypes: Vec<EnabledClass>,
}

impl BeanArchive {
    pub fn new(id: ArchiveId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            interceptors: Vec::new(),
            decorators: Vec::new(),
            alternative_classes: Vec::new(),
            alternative_stereotypes: Vec::new(),
        }
    }

    pub fn enables_alternative(&self, class_name: &str) -> bool {
        self.alternative_classes
            .iter()
            .any(|e| e.class_name == class_name)
    }

    pub fn enables_stereotype(&self, stereotype: &str) -> bool {
        self.alternative_stereotypes
            .iter()
            .any(|e| e.class_name == stereotype)
    }
}

/// Application-wide enablement. Lists are ordered by ascending priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalEnablement {
    #[serde(default)]
    pub interceptors: Vec<EnabledClass>,
    #[serde(default)]
    pub decorators: Vec<EnabledClass>,
    #[serde(default)]
    pub alternatives: Vec<EnabledClass>,
}

impl GlobalEnablement {
    /// Priority of a globally selected alternative (higher wins).
    pub fn alternative_priority(&self, class_name: &str) -> Option<usize> {
        self.alternatives
            .iter()
            .rposition(|e| e.class_name == class_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Class,
    Interface,
    Annotation,
}

/// What the deployment knows about a class named in a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub kind: DeclKind,
    /// Annotated `@Alternative`.
    #[serde(default)]
    pub alternative: bool,
    /// Annotated `@Stereotype`.
    #[serde(default)]
    pub stereotype: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_priority_is_position() {
        let global = GlobalEnablement {
            alternatives: vec![
                EnabledClass::new("MockPayments", DeclarationSite::new("app", 1)),
                EnabledClass::new("StubPayments", DeclarationSite::new("app", 2)),
            ],
            ..Default::default()
        };
        assert_eq!(global.alternative_priority("MockPayments"), Some(0));
        assert_eq!(global.alternative_priority("StubPayments"), Some(1));
        assert_eq!(global.alternative_priority("Other"), None);
    }

    #[test]
    fn site_display() {
        assert_eq!(
            DeclarationSite::new("META-INF/beans.xml", 12).to_string(),
            "META-INF/beans.xml@12"
        );
    }
}
