//! Ordered classification rules. The first rule whose node kinds include the
//! visited node and whose extractor yields elements wins for that node, so
//! the table order is the category priority.

use crate::routes::{self, HTTP_VERBS};
use crate::syntax::{self, NodeKind};
use context_protocol::{
    ClassifiedElement, Component, ComponentKind, ConfigObject, ElementCategory, Endpoint,
    Middleware, Model, ModelKind, Service, SourceFile, Utility,
};
use tree_sitter::Node;

const ANONYMOUS: &str = "anonymous";

/// Decorators naming an HTTP verb on a controller method
const ROUTE_DECORATORS: &[&str] = &["Get", "Post", "Put", "Delete", "Patch", "Options", "Head", "All"];

/// Receivers of `receiver.verb(path, handler)` route registrations
const ROUTE_OBJECTS: &[&str] = &["app", "router", "server", "api", "route", "routes", "fastify"];

/// Route registration verbs (`all` registers every verb)
const ROUTE_VERBS: &[&str] = &["get", "post", "put", "delete", "patch", "options", "head", "all"];

const HANDLER_FACTORIES: &[&str] = &["defineEventHandler", "eventHandler", "defineHandler"];

const MIDDLEWARE_PARAMS: &[&str] = &[
    "req", "res", "next", "ctx", "context", "request", "response", "err", "error",
];

/// Calls whose function argument is still a component (`memo(() => <a />)`)
const COMPONENT_WRAPPERS: &[&str] = &["memo", "forwardRef", "observer"];

const SERVICE_SUFFIXES: &[&str] = &["Service", "Repository", "Manager"];

const CONFIG_FACTORIES: &[&str] = &[
    "defineConfig",
    "defineNuxtConfig",
    "defineAppConfig",
    "defineWorkspace",
];

const FUNCTION_KINDS: &[NodeKind] = &[
    NodeKind::FunctionDeclaration,
    NodeKind::FunctionExpression,
    NodeKind::ArrowFunction,
];

/// Inputs shared by every extractor for one file
pub(crate) struct RuleContext<'a> {
    pub source: &'a str,
    pub file: &'a SourceFile,
}

impl RuleContext<'_> {
    fn path(&self) -> &str {
        &self.file.path
    }
}

pub(crate) type Extractor = for<'a, 't> fn(&RuleContext<'a>, Node<'t>) -> Vec<ClassifiedElement>;

pub(crate) struct ClassificationRule {
    pub name: &'static str,
    pub category: ElementCategory,
    pub node_kinds: &'static [NodeKind],
    pub extract: Extractor,
}

pub(crate) const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "decorated-route",
        category: ElementCategory::Endpoint,
        node_kinds: &[NodeKind::Method],
        extract: decorated_route,
    },
    ClassificationRule {
        name: "route-object-call",
        category: ElementCategory::Endpoint,
        node_kinds: &[NodeKind::Call],
        extract: route_object_call,
    },
    ClassificationRule {
        name: "define-handler",
        category: ElementCategory::Endpoint,
        node_kinds: &[NodeKind::Call],
        extract: define_handler,
    },
    ClassificationRule {
        name: "verb-export",
        category: ElementCategory::Endpoint,
        node_kinds: &[NodeKind::Export],
        extract: verb_export,
    },
    ClassificationRule {
        name: "middleware",
        category: ElementCategory::Middleware,
        node_kinds: FUNCTION_KINDS,
        extract: middleware,
    },
    ClassificationRule {
        name: "model",
        category: ElementCategory::Model,
        node_kinds: &[NodeKind::Interface, NodeKind::TypeAlias],
        extract: model,
    },
    ClassificationRule {
        name: "service",
        category: ElementCategory::Service,
        node_kinds: &[NodeKind::Class],
        extract: service,
    },
    ClassificationRule {
        name: "function-component",
        category: ElementCategory::Component,
        node_kinds: FUNCTION_KINDS,
        extract: function_component,
    },
    ClassificationRule {
        name: "class-component",
        category: ElementCategory::Component,
        node_kinds: &[NodeKind::Class],
        extract: class_component,
    },
    ClassificationRule {
        name: "hook",
        category: ElementCategory::Utility,
        node_kinds: FUNCTION_KINDS,
        extract: hook,
    },
    ClassificationRule {
        name: "config-object",
        category: ElementCategory::ConfigObject,
        node_kinds: &[NodeKind::Call, NodeKind::Export, NodeKind::Assignment],
        extract: config_object,
    },
];

/// Node kinds some rule applies to, in table order
pub(crate) fn rule_kinds() -> Vec<NodeKind> {
    let mut kinds = Vec::new();
    for kind in RULES.iter().flat_map(|rule| rule.node_kinds) {
        if !kinds.contains(kind) {
            kinds.push(*kind);
        }
    }
    kinds
}

/// Elements of the first matching rule for the node
pub(crate) fn first_match(
    ctx: &RuleContext<'_>,
    kind: NodeKind,
    node: Node<'_>,
) -> Option<(&'static ClassificationRule, Vec<ClassifiedElement>)> {
    RULES
        .iter()
        .filter(|rule| rule.node_kinds.contains(&kind))
        .find_map(|rule| {
            let elements = (rule.extract)(ctx, node);
            (!elements.is_empty()).then_some((rule, elements))
        })
}

fn decorated_route(ctx: &RuleContext<'_>, node: Node<'_>) -> Vec<ClassifiedElement> {
    for decorator in syntax::decorators(node) {
        let Some((name, call)) = syntax::decorator_target(decorator, ctx.source) else {
            continue;
        };
        if !ROUTE_DECORATORS.contains(&name) {
            continue;
        }
        let path = call
            .and_then(syntax::first_argument)
            .and_then(|arg| syntax::string_literal(arg, ctx.source))
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| "/".to_string());
        let handler = syntax::field_text(node, "name", ctx.source).unwrap_or(ANONYMOUS);
        return vec![ClassifiedElement::Endpoint(Endpoint::new(
            ctx.path(),
            syntax::line_of(decorator),
            name.to_ascii_uppercase(),
            path,
            handler,
            Some("nestjs"),
        ))];
    }
    Vec::new()
}

/// `app.get("/users", handler)`. The framework tag is filled in from the
/// file imports once the whole file has been visited.
fn route_object_call(ctx: &RuleContext<'_>, node: Node<'_>) -> Vec<ClassifiedElement> {
    let Some(function) = node
        .child_by_field_name("function")
        .filter(|f| f.kind() == "member_expression")
    else {
        return Vec::new();
    };
    let receiver = function
        .child_by_field_name("object")
        .filter(|object| object.kind() == "identifier")
        .map(|object| syntax::text(object, ctx.source));
    let verb = syntax::field_text(function, "property", ctx.source);
    let (Some(receiver), Some(verb)) = (receiver, verb) else {
        return Vec::new();
    };
    if !ROUTE_OBJECTS.contains(&receiver) || !ROUTE_VERBS.contains(&verb) {
        return Vec::new();
    }

    let args = syntax::arguments(node);
    let Some(path) = args
        .first()
        .and_then(|first| syntax::string_literal(*first, ctx.source))
    else {
        return Vec::new();
    };
    // A lone argument registers only when it looks like a path;
    // `app.get("port")` reads a setting.
    if args.len() == 1 && !path.starts_with('/') {
        return Vec::new();
    }
    let handler = args[1..]
        .last()
        .and_then(|handler| handler_name(*handler, ctx.source))
        .unwrap_or_else(|| ANONYMOUS.to_string());

    vec![ClassifiedElement::Endpoint(Endpoint::new(
        ctx.path(),
        syntax::line_of(node),
        verb.to_ascii_uppercase(),
        path,
        handler,
        None,
    ))]
}

fn define_handler(ctx: &RuleContext<'_>, node: Node<'_>) -> Vec<ClassifiedElement> {
    let Some(name) = syntax::callee_name(node, ctx.source) else {
        return Vec::new();
    };
    if !HANDLER_FACTORIES.contains(&name)
        || node
            .child_by_field_name("function")
            .is_some_and(|f| f.kind() != "identifier")
    {
        return Vec::new();
    }
    let Some(route) = routes::handler_route(ctx.path()) else {
        return Vec::new();
    };
    let handler = syntax::first_argument(node)
        .and_then(|arg| handler_name(arg, ctx.source))
        .unwrap_or_else(|| ANONYMOUS.to_string());

    vec![ClassifiedElement::Endpoint(Endpoint::new(
        ctx.path(),
        syntax::line_of(node),
        route.method.unwrap_or_else(|| "ALL".to_string()),
        route.path,
        handler,
        Some("nuxt"),
    ))]
}

/// `export async function GET(...)` in a file-routed API module
fn verb_export(ctx: &RuleContext<'_>, node: Node<'_>) -> Vec<ClassifiedElement> {
    let Some(path) = routes::api_route(ctx.path()) else {
        return Vec::new();
    };
    syntax::exported_bindings(node, ctx.source)
        .into_iter()
        .filter(|(exported, _)| {
            let lowered = exported.to_ascii_lowercase();
            exported.to_ascii_uppercase() == *exported && HTTP_VERBS.contains(&lowered.as_str())
        })
        .map(|(exported, local)| {
            ClassifiedElement::Endpoint(Endpoint::new(
                ctx.path(),
                syntax::line_of(node),
                exported,
                path.clone(),
                local,
                Some("nextjs"),
            ))
        })
        .collect()
}

fn middleware(ctx: &RuleContext<'_>, node: Node<'_>) -> Vec<ClassifiedElement> {
    let params = syntax::parameters(node);
    if params.len() < 3 || is_inline_route_handler(ctx, node) {
        return Vec::new();
    }
    let names: Vec<String> = params
        .into_iter()
        .filter_map(|param| syntax::parameter_name(param, ctx.source))
        .collect();
    if !names
        .iter()
        .any(|name| MIDDLEWARE_PARAMS.contains(&name.as_str()))
    {
        return Vec::new();
    }

    vec![ClassifiedElement::Middleware(Middleware {
        name: syntax::function_name(node, ctx.source).unwrap_or_else(|| ANONYMOUS.to_string()),
        file: ctx.path().to_string(),
        line: syntax::line_of(node),
        params: names,
    })]
}

/// Handlers written inline in a route registration belong to the endpoint
fn is_inline_route_handler(ctx: &RuleContext<'_>, node: Node<'_>) -> bool {
    node.parent()
        .filter(|parent| parent.kind() == "arguments")
        .and_then(|args| args.parent())
        .is_some_and(|call| !route_object_call(ctx, call).is_empty())
}

fn model(ctx: &RuleContext<'_>, node: Node<'_>) -> Vec<ClassifiedElement> {
    let Some(name) = syntax::field_text(node, "name", ctx.source) else {
        return Vec::new();
    };
    let (kind, body) = if node.kind() == "interface_declaration" {
        (ModelKind::Interface, node.child_by_field_name("body"))
    } else {
        (ModelKind::TypeAlias, node.child_by_field_name("value"))
    };
    let fields = body
        .filter(|body| matches!(body.kind(), "interface_body" | "object_type"))
        .map(|body| property_names(body, ctx.source))
        .unwrap_or_default();

    vec![ClassifiedElement::Model(Model {
        name: name.to_string(),
        file: ctx.path().to_string(),
        line: syntax::line_of(node),
        kind,
        fields,
    })]
}

fn property_names(body: Node<'_>, source: &str) -> Vec<String> {
    syntax::named_children(body)
        .into_iter()
        .filter(|member| member.kind() == "property_signature")
        .filter_map(|member| member.child_by_field_name("name"))
        .map(|name| syntax::property_key(name, source))
        .collect()
}

fn service(ctx: &RuleContext<'_>, node: Node<'_>) -> Vec<ClassifiedElement> {
    let Some(name) = syntax::class_name(node, ctx.source) else {
        return Vec::new();
    };
    let injectable = syntax::decorators(node).into_iter().any(|decorator| {
        syntax::decorator_target(decorator, ctx.source)
            .is_some_and(|(target, _)| target == "Injectable")
    });
    if !injectable && !SERVICE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        return Vec::new();
    }

    let methods = syntax::class_methods(node, ctx.source)
        .into_iter()
        .filter(|method| method != "constructor")
        .collect();
    vec![ClassifiedElement::Service(Service {
        name,
        file: ctx.path().to_string(),
        line: syntax::line_of(node),
        methods,
        injectable,
    })]
}

fn function_component(ctx: &RuleContext<'_>, node: Node<'_>) -> Vec<ClassifiedElement> {
    if !syntax::returns_markup(node) || is_render_callback(ctx, node) {
        return Vec::new();
    }
    let props = syntax::parameters(node)
        .into_iter()
        .next()
        .and_then(syntax::parameter_pattern)
        .filter(|pattern| pattern.kind() == "object_pattern")
        .map(|pattern| syntax::object_pattern_names(pattern, ctx.source))
        .unwrap_or_default();

    vec![ClassifiedElement::Component(Component {
        name: syntax::function_name(node, ctx.source).unwrap_or_else(|| ANONYMOUS.to_string()),
        file: ctx.path().to_string(),
        line: syntax::line_of(node),
        kind: ComponentKind::Function,
        props,
    })]
}

/// Markup-returning functions handed to a call (`items.map(i => <li />)`),
/// unless the call is a component wrapper
fn is_render_callback(ctx: &RuleContext<'_>, node: Node<'_>) -> bool {
    node.parent()
        .filter(|parent| parent.kind() == "arguments")
        .and_then(|args| args.parent())
        .is_some_and(|call| {
            !syntax::callee_name(call, ctx.source)
                .is_some_and(|callee| COMPONENT_WRAPPERS.contains(&callee))
        })
}

fn class_component(ctx: &RuleContext<'_>, node: Node<'_>) -> Vec<ClassifiedElement> {
    if !syntax::class_methods(node, ctx.source)
        .iter()
        .any(|method| method == "render")
    {
        return Vec::new();
    }
    vec![ClassifiedElement::Component(Component {
        name: syntax::class_name(node, ctx.source).unwrap_or_else(|| ANONYMOUS.to_string()),
        file: ctx.path().to_string(),
        line: syntax::line_of(node),
        kind: ComponentKind::Class,
        props: Vec::new(),
    })]
}

/// Functions following the `useXxx` naming convention
fn hook(ctx: &RuleContext<'_>, node: Node<'_>) -> Vec<ClassifiedElement> {
    let Some(name) = syntax::function_name(node, ctx.source) else {
        return Vec::new();
    };
    let is_hook = name
        .strip_prefix("use")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase());
    if !is_hook {
        return Vec::new();
    }
    vec![ClassifiedElement::Utility(Utility {
        name,
        file: ctx.path().to_string(),
        line: syntax::line_of(node),
    })]
}

/// `defineConfig({...})` anywhere, or a default / `module.exports` object in
/// a `*.config.*` file.
fn config_object(ctx: &RuleContext<'_>, node: Node<'_>) -> Vec<ClassifiedElement> {
    let found = match node.kind() {
        "call_expression" => syntax::callee_name(node, ctx.source)
            .filter(|name| CONFIG_FACTORIES.contains(name))
            .and_then(|name| {
                let object = syntax::first_argument(node).filter(|arg| arg.kind() == "object")?;
                Some((name.to_string(), object))
            }),
        "export_statement" if is_config_file(ctx.path()) && syntax::is_default_export(node) => node
            .child_by_field_name("value")
            .filter(|value| value.kind() == "object")
            .map(|object| (config_name(ctx.path()), object)),
        "assignment_expression" if is_config_file(ctx.path()) => {
            let is_module_exports = syntax::field_text(node, "left", ctx.source)
                .is_some_and(|left| left == "module.exports");
            node.child_by_field_name("right")
                .filter(|right| is_module_exports && right.kind() == "object")
                .map(|object| (config_name(ctx.path()), object))
        }
        _ => None,
    };

    let Some((name, object)) = found else {
        return Vec::new();
    };
    vec![ClassifiedElement::ConfigObject(ConfigObject {
        name,
        file: ctx.path().to_string(),
        line: syntax::line_of(node),
        keys: syntax::object_keys(object, ctx.source),
    })]
}

fn is_config_file(path: &str) -> bool {
    file_name(path).contains(".config.")
}

/// `vite.config.ts` -> `vite.config`
fn config_name(path: &str) -> String {
    let name = file_name(path);
    name.rsplit_once('.').map_or(name, |(stem, _)| stem).to_string()
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Statically resolvable name of a handler argument
fn handler_name(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "identifier" | "member_expression" => Some(syntax::text(node, source).to_string()),
        "function_expression" | "function" => {
            syntax::field_text(node, "name", source).map(str::to_string)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_table_is_in_category_priority_order() {
        let categories: Vec<_> = RULES.iter().map(|rule| rule.category).collect();
        let mut sorted = categories.clone();
        sorted.sort();
        assert_eq!(categories, sorted);
    }

    #[test]
    fn rule_names_are_unique() {
        let mut names: Vec<_> = RULES.iter().map(|rule| rule.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RULES.len());
    }

    #[test]
    fn config_file_names() {
        assert!(is_config_file("vite.config.ts"));
        assert!(is_config_file("apps/web/next.config.mjs"));
        assert!(!is_config_file("src/config.ts"));
        assert_eq!(config_name("apps/web/next.config.mjs"), "next.config");
    }
}
