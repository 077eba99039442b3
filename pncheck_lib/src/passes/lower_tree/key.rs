use std::ops::Range;

use tree_sitter::Node;

use super::declarator::{declarator_name, named_children};

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Collapses whitespace, keeping a single space only where two words would otherwise merge.
///
/// ```text
/// "const  std::string &"  =>  "const std::string&"
/// ```
pub(super) fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && is_ident_char(c) && out.chars().next_back().is_some_and(is_ident_char) {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

/// The spelling of a scope in a key. Template arguments are dropped, so `A<T>::f` and a
/// member `f` declared in the body of `A` end up with the same key.
pub(super) fn scope_component(scope: Node<'_>, source: &str) -> String {
    let scope = match scope.kind() {
        "template_type" => scope.child_by_field_name("name").unwrap_or(scope),
        _ => scope,
    };
    normalize(&source[scope.byte_range()])
}

#[derive(Debug, Clone)]
pub(super) struct QualifiedName<'t> {
    /// Scopes spelled out in the declarator, outermost first.
    pub qualifier: Vec<String>,
    /// Whether the name starts with `::`.
    pub global: bool,
    pub leaf: Node<'t>,
}

pub(super) fn split_qualified<'t>(name: Node<'t>, source: &str) -> QualifiedName<'t> {
    let mut qualifier = Vec::new();
    let mut global = false;
    let mut node = name;
    while node.kind() == "qualified_identifier" {
        match node.child_by_field_name("scope") {
            Some(scope) => qualifier.push(scope_component(scope, source)),
            None if qualifier.is_empty() => global = true,
            None => {}
        }
        match node.child_by_field_name("name") {
            Some(next) => node = next,
            None => break,
        }
    }
    QualifiedName {
        qualifier,
        global,
        leaf: node,
    }
}

/// The type of a parameter as it takes part in the identity of a function: its spelling with
/// parameter names, default arguments, attributes and comments left out, and builtin types
/// spelled one way.
pub(super) fn parameter_type(param: Node<'_>, source: &str) -> String {
    let mut rewrites = Vec::new();
    collect_rewrites(param, source, &mut rewrites);
    rewrites.sort_by_key(|(r, _)| r.start);

    let mut text = String::new();
    let mut pos = param.start_byte();
    for (range, replacement) in rewrites {
        if range.start >= pos {
            text.push_str(&source[pos..range.start]);
            text.push_str(&replacement);
        }
        pos = pos.max(range.end);
    }
    if pos < param.end_byte() {
        text.push_str(&source[pos..param.end_byte()]);
    }
    normalize(&text)
}

fn collect_rewrites(node: Node<'_>, source: &str, rewrites: &mut Vec<(Range<usize>, String)>) {
    match node.kind() {
        "comment" | "attribute_declaration" | "attribute_specifier" | "ms_declspec_modifier" => {
            rewrites.push((node.byte_range(), String::new()));
            return;
        }
        "sized_type_specifier" => {
            if let Some(spelling) = builtin_spelling(node, source) {
                rewrites.push((node.byte_range(), spelling));
                return;
            }
        }
        "parameter_declaration"
        | "optional_parameter_declaration"
        | "variadic_parameter_declaration" => {
            let declarator = node.child_by_field_name("declarator");
            if let Some(name) = declarator.and_then(declarator_name) {
                rewrites.push((name.byte_range(), String::new()));
            }
            if let Some(default) = node.child_by_field_name("default_value") {
                let from = declarator
                    .or_else(|| node.child_by_field_name("type"))
                    .map_or(default.start_byte(), |n| n.end_byte());
                rewrites.push((from..node.end_byte(), String::new()));
            }
        }
        _ => {}
    }

    for child in named_children(node) {
        collect_rewrites(child, source, rewrites);
    }
}

/// One spelling per builtin type, so `unsigned`, `unsigned int` and `int unsigned` all read
/// `unsigned int`. `None` when the specifier modifies something other than a builtin.
fn builtin_spelling(node: Node<'_>, source: &str) -> Option<String> {
    let base = node.child_by_field_name("type");
    let base_name = match base {
        Some(base) if base.kind() == "primitive_type" => &source[base.byte_range()],
        Some(_) => return None,
        None => "int",
    };

    let (mut signed, mut unsigned, mut short, mut longs) = (false, false, false, 0);
    let mut words = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if Some(child.id()) == base.map(|b| b.id()) {
            continue;
        }
        match child.kind() {
            "signed" => signed = true,
            "unsigned" => unsigned = true,
            "short" => short = true,
            "long" => longs += 1,
            "comment" | "attribute_declaration" | "attribute_specifier" => {}
            _ => words.push(normalize(&source[child.byte_range()])),
        }
    }

    let size = match (short, longs) {
        (true, _) => "short",
        (false, 0) => "",
        (false, 1) => "long",
        (false, _) => "long long",
    };
    match base_name {
        "char" if unsigned => words.push("unsigned char".to_owned()),
        "char" if signed => words.push("signed char".to_owned()),
        "int" => {
            if unsigned {
                words.push("unsigned".to_owned());
            }
            words.push(if size.is_empty() { "int" } else { size }.to_owned());
        }
        _ => {
            if unsigned {
                words.push("unsigned".to_owned());
            }
            if !size.is_empty() {
                words.push(size.to_owned());
            }
            words.push(base_name.to_owned());
        }
    }
    Some(words.join(" "))
}
