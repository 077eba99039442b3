//! Helpers to dig through declarators.
//!
//! A declarator wraps the declared name in any number of pointer, reference, array and
//! parenthesized declarators, so `int (*f(int a))(double)` declares a function `f` while
//! `void (*f)(int a)` declares a pointer variable `f`.

use tree_sitter::Node;

pub(super) fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Nodes that name the entity being declared.
pub(super) fn is_name(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "identifier"
            | "field_identifier"
            | "qualified_identifier"
            | "operator_name"
            | "destructor_name"
            | "template_function"
            | "template_method"
    )
}

/// The declarator directly wrapped by `node`.
pub(super) fn inner_declarator(node: Node<'_>) -> Option<Node<'_>> {
    if let Some(inner) = node.child_by_field_name("declarator") {
        return Some(inner);
    }

    // parenthesized, reference, attributed and variadic declarators have no field for it
    let mut cursor = node.walk();
    let inner = node.named_children(&mut cursor).find(|c| {
        !matches!(
            c.kind(),
            "attribute_declaration" | "attribute_specifier" | "type_qualifier" | "comment"
        ) && !c.kind().starts_with("ms_")
    });
    inner
}

pub(super) fn unparenthesize(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_declarator" {
        match inner_declarator(node) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// The name declared by `declarator`, `None` for abstract declarators.
pub(super) fn declarator_name(declarator: Node<'_>) -> Option<Node<'_>> {
    if is_name(declarator) {
        return Some(declarator);
    }
    if declarator.kind().starts_with("abstract_") {
        return None;
    }
    inner_declarator(declarator).and_then(declarator_name)
}

#[derive(Debug, Clone, Copy)]
pub(super) struct FunctionDeclarator<'t> {
    /// The `function_declarator` node, holding the parameter list.
    pub node: Node<'t>,
    /// The declared name, unparenthesized.
    pub name: Node<'t>,
}

/// Finds the function declared by `declarator`, if it declares one.
///
/// Only a function declarator applied directly to a name declares a function. One applied to
/// a pointer or reference declarator declares a function pointer or reference, which is a
/// variable.
pub(super) fn find_function_declarator(declarator: Node<'_>) -> Option<FunctionDeclarator<'_>> {
    if is_name(declarator) || declarator.kind().starts_with("abstract_") {
        return None;
    }
    if declarator.kind() == "function_declarator" {
        let inner = declarator.child_by_field_name("declarator")?;
        let name = unparenthesize(inner);
        if is_name(name) {
            return Some(FunctionDeclarator {
                node: declarator,
                name,
            });
        }
        return find_function_declarator(inner);
    }
    inner_declarator(declarator).and_then(find_function_declarator)
}
