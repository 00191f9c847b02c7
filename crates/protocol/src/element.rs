use serde::{Deserialize, Serialize};

/// Element category, in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementCategory {
    Endpoint,
    Middleware,
    Model,
    Service,
    Component,
    Utility,
    ConfigObject,
}

impl ElementCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementCategory::Endpoint => "endpoint",
            ElementCategory::Middleware => "middleware",
            ElementCategory::Model => "model",
            ElementCategory::Service => "service",
            ElementCategory::Component => "component",
            ElementCategory::Utility => "utility",
            ElementCategory::ConfigObject => "config_object",
        }
    }
}

/// HTTP route found in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// `"{method} {path}"`
    pub name: String,
    pub file: String,
    pub line: usize,
    /// Upper-case HTTP verb (`ALL` for verb-agnostic handlers)
    pub method: String,
    pub path: String,
    /// Handler identifier, `"anonymous"` when not statically resolvable
    pub handler: String,
    /// Framework convention the match belongs to (e.g. `express`, `nestjs`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
}

impl Endpoint {
    pub fn new(
        file: impl Into<String>,
        line: usize,
        method: impl Into<String>,
        path: impl Into<String>,
        handler: impl Into<String>,
        framework: Option<&str>,
    ) -> Self {
        let method = method.into();
        let path = path.into();
        Self {
            name: format!("{method} {path}"),
            file: file.into(),
            line,
            method,
            path,
            handler: handler.into(),
            framework: framework.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Function,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub file: String,
    pub line: usize,
    pub kind: ComponentKind,
    /// Destructured prop names of the first parameter
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub file: String,
    pub line: usize,
    pub methods: Vec<String>,
    #[serde(default)]
    pub injectable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Interface,
    TypeAlias,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub file: String,
    pub line: usize,
    pub kind: ModelKind,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigObject {
    pub name: String,
    pub file: String,
    pub line: usize,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Middleware {
    pub name: String,
    pub file: String,
    pub line: usize,
    pub params: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utility {
    pub name: String,
    pub file: String,
    pub line: usize,
}

/// Code element matched by a classification rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifiedElement {
    Endpoint(Endpoint),
    Component(Component),
    Service(Service),
    Model(Model),
    ConfigObject(ConfigObject),
    Middleware(Middleware),
    Utility(Utility),
}

impl ClassifiedElement {
    pub fn category(&self) -> ElementCategory {
        match self {
            ClassifiedElement::Endpoint(_) => ElementCategory::Endpoint,
            ClassifiedElement::Component(_) => ElementCategory::Component,
            ClassifiedElement::Service(_) => ElementCategory::Service,
            ClassifiedElement::Model(_) => ElementCategory::Model,
            ClassifiedElement::ConfigObject(_) => ElementCategory::ConfigObject,
            ClassifiedElement::Middleware(_) => ElementCategory::Middleware,
            ClassifiedElement::Utility(_) => ElementCategory::Utility,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ClassifiedElement::Endpoint(e) => &e.name,
            ClassifiedElement::Component(e) => &e.name,
            ClassifiedElement::Service(e) => &e.name,
            ClassifiedElement::Model(e) => &e.name,
            ClassifiedElement::ConfigObject(e) => &e.name,
            ClassifiedElement::Middleware(e) => &e.name,
            ClassifiedElement::Utility(e) => &e.name,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ClassifiedElement::Endpoint(e) => e.line,
            ClassifiedElement::Component(e) => e.line,
            ClassifiedElement::Service(e) => e.line,
            ClassifiedElement::Model(e) => e.line,
            ClassifiedElement::ConfigObject(e) => e.line,
            ClassifiedElement::Middleware(e) => e.line,
            ClassifiedElement::Utility(e) => e.line,
        }
    }

    pub fn as_endpoint(&self) -> Option<&Endpoint> {
        match self {
            ClassifiedElement::Endpoint(endpoint) => Some(endpoint),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn endpoint_name_combines_method_and_path() {
        let endpoint = Endpoint::new("src/app.js", 3, "GET", "/users", "listUsers", Some("express"));
        assert_eq!(endpoint.name, "GET /users");
        assert_eq!(endpoint.framework.as_deref(), Some("express"));
    }

    #[test]
    fn element_serializes_with_kind_tag() {
        let element = ClassifiedElement::Service(Service {
            name: "UserService".into(),
            file: "src/user.service.ts".into(),
            line: 1,
            methods: vec!["findAll".into()],
            injectable: false,
        });
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["kind"], "service");
        assert_eq!(value["methods"][0], "findAll");
        assert_eq!(element.category(), ElementCategory::Service);
        assert_eq!(element.name(), "UserService");
    }
}
