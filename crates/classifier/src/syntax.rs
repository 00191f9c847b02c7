//! Node kinds the traversal dispatches on and small helpers over tree-sitter
//! nodes shared by the collectors and the classification rules.

use tree_sitter::Node;

/// Closed set of syntax node kinds with registered handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NodeKind {
    Import,
    Export,
    Call,
    Assignment,
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunction,
    Class,
    Method,
    Interface,
    TypeAlias,
    VariableDeclarator,
}

impl NodeKind {
    pub(crate) fn of(node: Node) -> Option<Self> {
        // Keywords share kind strings with named nodes ("function", "class")
        if !node.is_named() {
            return None;
        }
        let kind = match node.kind() {
            "import_statement" => NodeKind::Import,
            "export_statement" => NodeKind::Export,
            "call_expression" => NodeKind::Call,
            "assignment_expression" => NodeKind::Assignment,
            "function_declaration" | "generator_function_declaration" => {
                NodeKind::FunctionDeclaration
            }
            "function_expression" | "function" | "generator_function" => {
                NodeKind::FunctionExpression
            }
            "arrow_function" => NodeKind::ArrowFunction,
            "class_declaration" | "abstract_class_declaration" | "class" => NodeKind::Class,
            "method_definition" => NodeKind::Method,
            "interface_declaration" => NodeKind::Interface,
            "type_alias_declaration" => NodeKind::TypeAlias,
            "variable_declarator" => NodeKind::VariableDeclarator,
            _ => return None,
        };
        Some(kind)
    }

    /// Nodes that open a new function scope
    pub(crate) fn opens_scope(self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration
                | NodeKind::FunctionExpression
                | NodeKind::ArrowFunction
                | NodeKind::Class
                | NodeKind::Method
        )
    }
}

pub(crate) fn text<'s>(node: Node, source: &'s str) -> &'s str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

pub(crate) fn field_text<'s>(node: Node, field: &str, source: &'s str) -> Option<&'s str> {
    node.child_by_field_name(field).map(|child| text(child, source))
}

/// 1-based line of the node start
pub(crate) fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

/// Named children without comments
pub(crate) fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Value of a static string literal; template strings only when they have no
/// substitutions.
pub(crate) fn string_literal(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "string" => {
            let raw = text(node, source);
            (raw.len() >= 2).then(|| raw[1..raw.len() - 1].to_string())
        }
        "template_string" => {
            if named_children(node)
                .iter()
                .any(|child| child.kind() == "template_substitution")
            {
                return None;
            }
            let raw = text(node, source);
            (raw.len() >= 2).then(|| raw[1..raw.len() - 1].to_string())
        }
        _ => None,
    }
}

/// Property key as written, quotes removed
pub(crate) fn property_key(node: Node, source: &str) -> String {
    string_literal(node, source).unwrap_or_else(|| text(node, source).to_string())
}

/// First argument of an `arguments` node
pub(crate) fn first_argument(call: Node) -> Option<Node> {
    let args = call.child_by_field_name("arguments")?;
    named_children(args).into_iter().next()
}

pub(crate) fn arguments(call: Node) -> Vec<Node> {
    call.child_by_field_name("arguments")
        .map(named_children)
        .unwrap_or_default()
}

/// Identifier a call is made through: `foo(...)` gives `foo`,
/// `a.b.foo(...)` gives `foo`.
pub(crate) fn callee_name<'s>(call: Node, source: &'s str) -> Option<&'s str> {
    let function = call.child_by_field_name("function")?;
    match function.kind() {
        "identifier" => Some(text(function, source)),
        "member_expression" => field_text(function, "property", source),
        _ => None,
    }
}

/// Declared or inferred name of a function-like node: its own name, the
/// declarator it initialises (also through a wrapping call such as
/// `memo(() => ...)`), the object key or the assignment target.
pub(crate) fn function_name(node: Node, source: &str) -> Option<String> {
    if let Some(name) = field_text(node, "name", source) {
        return Some(name.to_string());
    }

    let mut parent = node.parent()?;
    if parent.kind() == "arguments" {
        let call = parent.parent()?;
        if call.kind() != "call_expression" {
            return None;
        }
        parent = call.parent()?;
    }

    match parent.kind() {
        "variable_declarator" => parent
            .child_by_field_name("name")
            .filter(|name| name.kind() == "identifier")
            .map(|name| text(name, source).to_string()),
        "pair" => parent
            .child_by_field_name("key")
            .map(|key| property_key(key, source)),
        "assignment_expression" => {
            let left = parent.child_by_field_name("left")?;
            match left.kind() {
                "identifier" => Some(text(left, source).to_string()),
                "member_expression" => field_text(left, "property", source).map(str::to_string),
                _ => None,
            }
        }
        "public_field_definition" | "field_definition" => field_text(parent, "name", source)
            .or_else(|| field_text(parent, "property", source))
            .map(str::to_string),
        _ => None,
    }
}

/// Formal parameters of a function-like node; a bare arrow parameter counts
/// as a single parameter.
pub(crate) fn parameters(node: Node) -> Vec<Node> {
    if let Some(params) = node.child_by_field_name("parameters") {
        return named_children(params)
            .into_iter()
            .filter(|param| param.kind() != "decorator")
            .collect();
    }
    node.child_by_field_name("parameter")
        .into_iter()
        .collect()
}

/// Binding pattern of a parameter, unwrapping TypeScript parameter nodes
pub(crate) fn parameter_pattern(param: Node) -> Option<Node> {
    match param.kind() {
        "required_parameter" | "optional_parameter" => param.child_by_field_name("pattern"),
        _ => Some(param),
    }
}

pub(crate) fn parameter_name(param: Node, source: &str) -> Option<String> {
    let pattern = parameter_pattern(param)?;
    match pattern.kind() {
        "identifier" => Some(text(pattern, source).to_string()),
        "assignment_pattern" => parameter_name(pattern.child_by_field_name("left")?, source),
        "rest_pattern" => named_children(pattern)
            .into_iter()
            .next()
            .and_then(|inner| parameter_name(inner, source)),
        _ => None,
    }
}

/// Names bound by a destructuring object pattern
pub(crate) fn object_pattern_names(pattern: Node, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for child in named_children(pattern) {
        match child.kind() {
            "shorthand_property_identifier_pattern" => names.push(text(child, source).to_string()),
            "pair_pattern" => {
                if let Some(key) = child.child_by_field_name("key") {
                    names.push(property_key(key, source));
                }
            }
            "object_assignment_pattern" => {
                if let Some(left) = child.child_by_field_name("left") {
                    names.push(text(left, source).to_string());
                }
            }
            _ => {}
        }
    }
    names
}

/// Identifiers bound by a declarator name (plain, object or array pattern)
pub(crate) fn binding_names(pattern: Node, source: &str) -> Vec<String> {
    match pattern.kind() {
        "identifier" => vec![text(pattern, source).to_string()],
        "object_pattern" => object_pattern_names(pattern, source),
        "array_pattern" => named_children(pattern)
            .into_iter()
            .flat_map(|element| binding_names(element, source))
            .collect(),
        _ => Vec::new(),
    }
}

/// Keys of an object literal
pub(crate) fn object_keys(object: Node, source: &str) -> Vec<String> {
    let mut keys = Vec::new();
    for child in named_children(object) {
        match child.kind() {
            "pair" => {
                if let Some(key) = child.child_by_field_name("key") {
                    keys.push(property_key(key, source));
                }
            }
            "shorthand_property_identifier" => keys.push(text(child, source).to_string()),
            "method_definition" => {
                if let Some(name) = field_text(child, "name", source) {
                    keys.push(name.to_string());
                }
            }
            _ => {}
        }
    }
    keys
}

/// Decorators attached to a node. JavaScript nests them as children;
/// TypeScript class members and exported classes carry them as preceding
/// siblings.
pub(crate) fn decorators(node: Node) -> Vec<Node> {
    let mut found = Vec::new();

    let mut sibling = node.prev_named_sibling();
    while let Some(prev) = sibling {
        match prev.kind() {
            "decorator" => found.insert(0, prev),
            "comment" => {}
            _ => break,
        }
        sibling = prev.prev_named_sibling();
    }

    found.extend(
        named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "decorator"),
    );
    found
}

/// Name of a decorator (`@Get`, `@Get('/x')`, `@common.Get()`) and the call
/// node when it is invoked.
pub(crate) fn decorator_target<'t, 's>(
    decorator: Node<'t>,
    source: &'s str,
) -> Option<(&'s str, Option<Node<'t>>)> {
    let expression = named_children(decorator).into_iter().next()?;
    match expression.kind() {
        "identifier" => Some((text(expression, source), None)),
        "member_expression" => field_text(expression, "property", source).map(|name| (name, None)),
        "call_expression" => callee_name(expression, source).map(|name| (name, Some(expression))),
        _ => None,
    }
}

/// Markup expression, looking through parentheses, conditionals and
/// short-circuit operators.
pub(crate) fn is_markup(node: Node) -> bool {
    match node.kind() {
        "jsx_element" | "jsx_self_closing_element" | "jsx_fragment" => true,
        "parenthesized_expression" => named_children(node).into_iter().any(is_markup),
        "ternary_expression" => ["consequence", "alternative"]
            .iter()
            .filter_map(|field| node.child_by_field_name(field))
            .any(is_markup),
        "binary_expression" => node.child_by_field_name("right").is_some_and(is_markup),
        _ => false,
    }
}

/// A function returns markup when its expression body is markup or a
/// `return` in its own scope yields markup.
pub(crate) fn returns_markup(function: Node) -> bool {
    let Some(body) = function.child_by_field_name("body") else {
        return false;
    };
    if body.kind() != "statement_block" {
        return is_markup(body);
    }
    scope_returns_markup(body)
}

fn scope_returns_markup(node: Node) -> bool {
    for child in named_children(node) {
        if child.kind() == "return_statement" {
            if named_children(child).into_iter().next().is_some_and(is_markup) {
                return true;
            }
            continue;
        }
        if NodeKind::of(child).is_some_and(NodeKind::opens_scope) {
            continue;
        }
        if scope_returns_markup(child) {
            return true;
        }
    }
    false
}

/// Method names of a class body, in source order
pub(crate) fn class_methods(class: Node, source: &str) -> Vec<String> {
    class
        .child_by_field_name("body")
        .map(named_children)
        .unwrap_or_default()
        .into_iter()
        .filter(|member| member.kind() == "method_definition")
        .filter_map(|member| field_text(member, "name", source).map(str::to_string))
        .collect()
}

/// Name of a class declaration or of the declarator a class expression
/// initialises.
pub(crate) fn class_name(class: Node, source: &str) -> Option<String> {
    function_name(class, source)
}

/// Top-level means directly in the program, or in an export at program level
pub(crate) fn is_top_level(statement: Node) -> bool {
    match statement.parent() {
        Some(parent) if parent.kind() == "program" => true,
        Some(parent) if parent.kind() == "export_statement" => parent
            .parent()
            .is_some_and(|grand| grand.kind() == "program"),
        _ => false,
    }
}

/// `export default ...`
pub(crate) fn is_default_export(export: Node) -> bool {
    let mut cursor = export.walk();
    let found = export
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == "default");
    found
}

/// `(exported, local)` names bound by a named export statement
pub(crate) fn exported_bindings(export: Node, source: &str) -> Vec<(String, String)> {
    let mut bindings = Vec::new();

    if let Some(declaration) = export.child_by_field_name("declaration") {
        match declaration.kind() {
            "lexical_declaration" | "variable_declaration" => {
                for declarator in named_children(declaration) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    if let Some(name) = declarator.child_by_field_name("name") {
                        for bound in binding_names(name, source) {
                            bindings.push((bound.clone(), bound));
                        }
                    }
                }
            }
            _ => {
                if let Some(name) = field_text(declaration, "name", source) {
                    bindings.push((name.to_string(), name.to_string()));
                }
            }
        }
    }

    for clause in named_children(export)
        .into_iter()
        .filter(|child| child.kind() == "export_clause")
    {
        for specifier in named_children(clause) {
            if specifier.kind() != "export_specifier" {
                continue;
            }
            let Some(local) = specifier.child_by_field_name("name") else {
                continue;
            };
            let local = property_key(local, source);
            let exported = specifier
                .child_by_field_name("alias")
                .map(|alias| property_key(alias, source))
                .unwrap_or_else(|| local.clone());
            bindings.push((exported, local));
        }
    }

    bindings
}
