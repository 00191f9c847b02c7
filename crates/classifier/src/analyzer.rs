use crate::category::resolve_file_category;
use crate::error::{ClassifierError, Result};
use crate::grammar;
use crate::rules::{self, RuleContext};
use crate::syntax::{self, NodeKind};
use context_protocol::{ClassifiedElement, Dialect, FileAnalysisRecord, SourceFile};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tree_sitter::{Node, Parser};

/// Imported packages whose presence tags object-call routes
const ROUTE_FRAMEWORK_IMPORTS: &[(&str, &str)] = &[
    ("express", "express"),
    ("fastify", "fastify"),
    ("koa", "koa"),
    ("@koa/router", "koa"),
    ("koa-router", "koa"),
    ("hono", "hono"),
    ("@hapi/hapi", "hapi"),
];

/// Syntax-tree classifier for JavaScript/TypeScript sources.
///
/// One parser is kept per dialect; node handlers are looked up by node kind
/// while the tree is walked once in pre-order.
pub struct SyntaxClassifier {
    parsers: HashMap<Dialect, Parser>,
    registry: HandlerRegistry,
}

impl Default for SyntaxClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxClassifier {
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
            registry: HandlerRegistry::standard(),
        }
    }

    /// Classify one file. Fails when the content cannot be parsed or the tree
    /// contains syntax errors; nothing is recorded for such a file.
    pub fn classify(&mut self, file: &SourceFile, content: &str) -> Result<FileAnalysisRecord> {
        let tree = self
            .parser_for(file.dialect)?
            .parse(content, None)
            .ok_or_else(|| ClassifierError::parse(format!("Failed to parse {}", file.path)))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ClassifierError::SyntaxError {
                line: first_error_line(root).unwrap_or(1),
            });
        }

        let mut scan = FileScan::new(file, content);
        let mut cursor = root.walk();
        loop {
            self.registry.dispatch(&mut scan, cursor.node());

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(scan.finish());
                }
            }
        }
    }

    fn parser_for(&mut self, dialect: Dialect) -> Result<&mut Parser> {
        match self.parsers.entry(dialect) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(grammar::parser_for(dialect)?)),
        }
    }
}

fn first_error_line(node: Node<'_>) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(syntax::line_of(node));
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_line)
}

/// Per-file state filled in by the node handlers
pub(crate) struct FileScan<'a> {
    ctx: RuleContext<'a>,
    imports: Vec<String>,
    exports: Vec<String>,
    functions: Vec<String>,
    classes: Vec<String>,
    elements: Vec<ClassifiedElement>,
}

impl<'a> FileScan<'a> {
    fn new(file: &'a SourceFile, source: &'a str) -> Self {
        Self {
            ctx: RuleContext { source, file },
            imports: Vec::new(),
            exports: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
            elements: Vec::new(),
        }
    }

    fn finish(mut self) -> FileAnalysisRecord {
        if let Some(tag) = route_framework(&self.imports) {
            for element in &mut self.elements {
                if let ClassifiedElement::Endpoint(endpoint) = element {
                    if endpoint.framework.is_none() {
                        endpoint.framework = Some(tag.to_string());
                    }
                }
            }
        }

        let category = resolve_file_category(&self.ctx.file.path, &self.elements);
        log::debug!(
            "Classified {} as {} ({} elements)",
            self.ctx.file.path,
            category,
            self.elements.len()
        );

        FileAnalysisRecord {
            path: self.ctx.file.path.clone(),
            category,
            imports: self.imports,
            exports: self.exports,
            functions: self.functions,
            classes: self.classes,
            elements: self.elements,
        }
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

fn route_framework(imports: &[String]) -> Option<&'static str> {
    imports.iter().find_map(|import| {
        ROUTE_FRAMEWORK_IMPORTS
            .iter()
            .find(|(package, _)| {
                import == package
                    || import
                        .strip_prefix(package)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .map(|(_, tag)| *tag)
    })
}

type Handler = for<'a, 't> fn(&mut FileScan<'a>, Node<'t>);

/// Node-kind keyed handler table
pub(crate) struct HandlerRegistry {
    handlers: HashMap<NodeKind, Vec<Handler>>,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    fn register(&mut self, kind: NodeKind, handler: Handler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Collectors for the file outline plus the classification rules
    fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(NodeKind::Import, collect_import);
        registry.register(NodeKind::Export, collect_export);
        registry.register(NodeKind::Call, collect_dynamic_import);
        registry.register(NodeKind::Assignment, collect_commonjs_export);
        registry.register(NodeKind::FunctionDeclaration, collect_declaration);
        registry.register(NodeKind::Class, collect_declaration);
        registry.register(NodeKind::VariableDeclarator, collect_declaration);
        for kind in rules::rule_kinds() {
            registry.register(kind, classify_node);
        }
        registry
    }

    fn dispatch(&self, scan: &mut FileScan<'_>, node: Node<'_>) {
        let Some(kind) = NodeKind::of(node) else {
            return;
        };
        if let Some(handlers) = self.handlers.get(&kind) {
            for handler in handlers {
                handler(scan, node);
            }
        }
    }
}

fn classify_node(scan: &mut FileScan<'_>, node: Node<'_>) {
    let Some(kind) = NodeKind::of(node) else {
        return;
    };
    if let Some((rule, elements)) = rules::first_match(&scan.ctx, kind, node) {
        log::trace!(
            "{}:{} matched rule {} ({})",
            scan.ctx.file.path,
            syntax::line_of(node),
            rule.name,
            rule.category.as_str()
        );
        scan.elements.extend(elements);
    }
}

fn collect_import(scan: &mut FileScan<'_>, node: Node<'_>) {
    if let Some(source) = node
        .child_by_field_name("source")
        .and_then(|source| syntax::string_literal(source, scan.ctx.source))
    {
        push_unique(&mut scan.imports, source);
    }
}

/// `require("x")` and `import("x")`
fn collect_dynamic_import(scan: &mut FileScan<'_>, node: Node<'_>) {
    let Some(function) = node.child_by_field_name("function") else {
        return;
    };
    let is_loader = function.kind() == "import"
        || (function.kind() == "identifier" && syntax::text(function, scan.ctx.source) == "require");
    if !is_loader {
        return;
    }
    if let Some(source) =
        syntax::first_argument(node).and_then(|arg| syntax::string_literal(arg, scan.ctx.source))
    {
        push_unique(&mut scan.imports, source);
    }
}

fn collect_export(scan: &mut FileScan<'_>, node: Node<'_>) {
    // Re-exports depend on their source module
    if let Some(source) = node
        .child_by_field_name("source")
        .and_then(|source| syntax::string_literal(source, scan.ctx.source))
    {
        push_unique(&mut scan.imports, source);
    }

    if syntax::is_default_export(node) {
        push_unique(&mut scan.exports, "default".to_string());
        return;
    }
    for (exported, _) in syntax::exported_bindings(node, scan.ctx.source) {
        push_unique(&mut scan.exports, exported);
    }
}

/// `module.exports = ...`, `exports.name = ...`, `module.exports.name = ...`
fn collect_commonjs_export(scan: &mut FileScan<'_>, node: Node<'_>) {
    let Some(left) = node
        .child_by_field_name("left")
        .filter(|left| left.kind() == "member_expression")
    else {
        return;
    };
    let source = scan.ctx.source;
    if syntax::text(left, source) == "module.exports" {
        push_unique(&mut scan.exports, "default".to_string());
        return;
    }
    let object = syntax::field_text(left, "object", source);
    if matches!(object, Some("exports" | "module.exports")) {
        if let Some(property) = syntax::field_text(left, "property", source) {
            push_unique(&mut scan.exports, property.to_string());
        }
    }
}

/// Top-level function and class names
fn collect_declaration(scan: &mut FileScan<'_>, node: Node<'_>) {
    let source = scan.ctx.source;
    match node.kind() {
        "function_declaration" | "generator_function_declaration" if syntax::is_top_level(node) => {
            if let Some(name) = syntax::field_text(node, "name", source) {
                push_unique(&mut scan.functions, name.to_string());
            }
        }
        "class_declaration" | "abstract_class_declaration" if syntax::is_top_level(node) => {
            if let Some(name) = syntax::field_text(node, "name", source) {
                push_unique(&mut scan.classes, name.to_string());
            }
        }
        "variable_declarator" => {
            let top_level = node.parent().is_some_and(syntax::is_top_level);
            let Some(value) = node.child_by_field_name("value") else {
                return;
            };
            let Some(name) = node
                .child_by_field_name("name")
                .filter(|name| name.kind() == "identifier")
                .map(|name| syntax::text(name, source).to_string())
            else {
                return;
            };
            if !top_level {
                return;
            }
            match value.kind() {
                "arrow_function" | "function_expression" | "function" => {
                    push_unique(&mut scan.functions, name)
                }
                "class" => push_unique(&mut scan.classes, name),
                _ => {}
            }
        }
        _ => {}
    }
}
