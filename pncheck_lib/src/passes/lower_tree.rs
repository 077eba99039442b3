//! Lowers a tree-sitter syntax tree to a [`TranslationUnit`].
//!
//! Only declarations are kept. Every top-level item becomes one group, which is handed to an
//! [`AstConsumer`] as soon as it is complete. Preprocessor conditionals don't form items of their
//! own: the items of every branch are lowered, in source order.

mod declarator;
mod key;
#[cfg(test)]
mod tests;

use tree_sitter::{Node, Tree};

use self::{
    declarator::{declarator_name, find_function_declarator, named_children, FunctionDeclarator},
    key::{normalize, parameter_type, scope_component, split_qualified, QualifiedName},
};
use crate::{
    decl::{
        Decl, DeclGroupRef, DeclId, DeclKind, FunctionDecl, FunctionKey, IdentNode, ParamDecl,
        TranslationUnit,
    },
    diagnostic::Span,
    plugin::AstConsumer,
    settings::Language,
    util::Ice,
};

/// Lowers the whole tree.
pub fn lower(tree: &Tree, source: &str, language: Language) -> TranslationUnit {
    lower_with_consumer(tree, source, language, &mut KeepLowering)
}

/// Lowers the tree group by group, handing every group to `consumer` right after it has been
/// built. Stops early, returning what was lowered so far, when the consumer returns `false`.
pub fn lower_with_consumer(
    tree: &Tree,
    source: &str,
    language: Language,
    consumer: &mut dyn AstConsumer,
) -> TranslationUnit {
    let mut builder = DeclBuilder::new(source, language);
    let completed = builder.build_from_translation_unit(tree.root_node(), consumer);

    tracing::debug!(
        target: "pncheck::lower",
        groups = builder.tu.group_count(),
        decls = builder.tu.len(),
        completed,
        "lowered translation unit"
    );

    builder.tu
}

struct KeepLowering;

impl AstConsumer for KeepLowering {
    fn handle_top_level_decl(&mut self, _tu: &TranslationUnit, _group: DeclGroupRef<'_>) -> bool {
        true
    }
}

fn is_preproc_conditional(kind: &str) -> bool {
    matches!(
        kind,
        "preproc_if" | "preproc_ifdef" | "preproc_elif" | "preproc_elifdef" | "preproc_else"
    )
}

fn is_record(kind: &str) -> bool {
    matches!(kind, "struct_specifier" | "class_specifier" | "union_specifier")
}

/// The items inside a preprocessor conditional, including the `#else`/`#elif` branch that
/// follows it.
fn preproc_items(node: Node<'_>) -> Vec<Node<'_>> {
    let condition = node
        .child_by_field_name("condition")
        .or_else(|| node.child_by_field_name("name"));
    named_children(node)
        .into_iter()
        .filter(|c| Some(*c) != condition)
        .collect()
}

/// Where the declarations being built live.
#[derive(Debug, Clone, Copy, Default)]
struct Context<'t> {
    /// Template parameters of the template declaring the current item.
    template: Option<Node<'t>>,
    friend: bool,
    block_scope: bool,
}

#[derive(Debug)]
struct Scope {
    name: String,
    is_namespace: bool,
}

#[derive(Debug, Default)]
struct ParameterList {
    params: Vec<ParamDecl>,
    types: Vec<String>,
    has_prototype: bool,
    is_variadic: bool,
}

struct DeclBuilder<'s> {
    source: &'s str,
    language: Language,
    tu: TranslationUnit,
    scopes: Vec<Scope>,
}

impl<'s> DeclBuilder<'s> {
    fn new(source: &'s str, language: Language) -> Self {
        Self {
            source,
            language,
            tu: TranslationUnit::new(language),
            scopes: Vec::new(),
        }
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn ident(&self, node: Node<'_>) -> IdentNode {
        IdentNode {
            span: node.byte_range().into(),
            data: normalize(self.text(node)),
        }
    }

    fn build_from_translation_unit(
        &mut self,
        root: Node<'_>,
        consumer: &mut dyn AstConsumer,
    ) -> bool {
        named_children(root)
            .into_iter()
            .all(|item| self.build_top_level(item, consumer))
    }

    fn build_top_level(&mut self, item: Node<'_>, consumer: &mut dyn AstConsumer) -> bool {
        if is_preproc_conditional(item.kind()) {
            return preproc_items(item)
                .into_iter()
                .all(|child| self.build_top_level(child, consumer));
        }

        let decls = self.build_from_item(item, Context::default());
        if decls.is_empty() {
            return true;
        }

        let index = self.tu.add_group(decls);
        let tu = &self.tu;
        let group = tu.group(index).ok_or("group missing right after adding it").ice();
        tracing::trace!(target: "pncheck::lower", index, decls = group.len(), "handing over group");
        consumer.handle_top_level_decl(tu, group)
    }

    fn build_from_item<'t>(&mut self, item: Node<'t>, ctx: Context<'t>) -> Vec<DeclId> {
        match item.kind() {
            "function_definition" => self
                .build_from_function_definition(item, ctx)
                .into_iter()
                .collect(),
            "declaration" | "field_declaration" => self.build_from_declaration(item, ctx),
            kind if is_record(kind) => self.build_from_record(item).into_iter().collect(),
            "namespace_definition" => vec![self.build_from_namespace(item)],
            "linkage_specification" => vec![self.build_from_linkage_spec(item)],
            "template_declaration" => vec![self.build_from_template(item, ctx)],
            "friend_declaration" => vec![self.build_from_friend(item, ctx)],
            kind if is_preproc_conditional(kind) => preproc_items(item)
                .into_iter()
                .flat_map(|child| self.build_from_item(child, ctx))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn add_scoped_decl(&mut self, span: Span, kind: DeclKind) -> DeclId {
        self.tu.add_decl(Decl {
            span,
            kind,
            children: Vec::new(),
        })
    }

    fn build_children<'t>(&mut self, parent: DeclId, items: Vec<Node<'t>>, ctx: Context<'t>) {
        for item in items {
            for child in self.build_from_item(item, ctx) {
                self.tu.add_child(parent, child);
            }
        }
    }

    fn build_from_namespace(&mut self, item: Node<'_>) -> DeclId {
        let name = item.child_by_field_name("name");
        let ident = name.map(|n| self.ident(n));
        let scope = ident
            .as_ref()
            .map_or_else(|| "(anonymous)".to_owned(), |i| i.data.clone());
        let id = self.add_scoped_decl(item.byte_range().into(), DeclKind::Namespace(ident));

        self.scopes.push(Scope {
            name: scope,
            is_namespace: true,
        });
        if let Some(body) = item.child_by_field_name("body") {
            self.build_children(id, named_children(body), Context::default());
        }
        self.scopes.pop();

        id
    }

    fn build_from_record(&mut self, item: Node<'_>) -> Option<DeclId> {
        // forward declarations and elaborated type specifiers declare nothing of interest
        let body = item.child_by_field_name("body")?;
        let name = item.child_by_field_name("name");
        let scope = name.map_or_else(
            || "(anonymous)".to_owned(),
            |n| scope_component(n, self.source),
        );
        let ident = name.map(|n| self.ident(n));
        let id = self.add_scoped_decl(item.byte_range().into(), DeclKind::Record(ident));

        self.scopes.push(Scope {
            name: scope,
            is_namespace: false,
        });
        self.build_children(id, named_children(body), Context::default());
        self.scopes.pop();

        Some(id)
    }

    fn build_from_linkage_spec(&mut self, item: Node<'_>) -> DeclId {
        let id = self.add_scoped_decl(item.byte_range().into(), DeclKind::LinkageSpec);
        match item.child_by_field_name("body") {
            Some(body) if body.kind() == "declaration_list" => {
                self.build_children(id, named_children(body), Context::default())
            }
            Some(body) => self.build_children(id, vec![body], Context::default()),
            None => {}
        }
        id
    }

    fn build_from_template<'t>(&mut self, item: Node<'t>, ctx: Context<'t>) -> DeclId {
        let id = self.add_scoped_decl(item.byte_range().into(), DeclKind::Template);
        let params = item.child_by_field_name("parameters");
        let items = named_children(item)
            .into_iter()
            .filter(|c| Some(*c) != params && c.kind() != "requires_clause")
            .collect();
        self.build_children(
            id,
            items,
            Context {
                template: params,
                ..ctx
            },
        );
        id
    }

    fn build_from_friend<'t>(&mut self, item: Node<'t>, ctx: Context<'t>) -> DeclId {
        let id = self.add_scoped_decl(item.byte_range().into(), DeclKind::Friend);
        self.build_children(
            id,
            named_children(item),
            Context {
                friend: true,
                ..ctx
            },
        );
        id
    }

    fn build_from_declaration<'t>(&mut self, item: Node<'t>, ctx: Context<'t>) -> Vec<DeclId> {
        let mut decls = Vec::new();

        if let Some(ty) = item.child_by_field_name("type") {
            if is_record(ty.kind()) && !ctx.block_scope {
                decls.extend(self.build_from_record(ty));
            }
        }

        let declarators: Vec<_> = {
            let mut cursor = item.walk();
            item.children_by_field_name("declarator", &mut cursor)
                .collect()
        };
        for declarator in declarators {
            if let Some(func) = find_function_declarator(declarator) {
                decls.push(self.build_from_function(
                    declarator.byte_range().into(),
                    func,
                    false,
                    ctx,
                ));
            } else if !ctx.block_scope {
                if let Some(name) = declarator_name(declarator) {
                    let ident = self.ident(name);
                    let span = declarator.byte_range().into();
                    decls.push(self.add_scoped_decl(span, DeclKind::Variable(ident)));
                }
            }
        }

        decls
    }

    fn build_from_function_definition<'t>(
        &mut self,
        item: Node<'t>,
        ctx: Context<'t>,
    ) -> Option<DeclId> {
        let func = find_function_declarator(item.child_by_field_name("declarator")?)?;
        let id = self.build_from_function(item.byte_range().into(), func, true, ctx);
        if let Some(body) = item.child_by_field_name("body") {
            self.build_from_block(id, body);
        }
        Some(id)
    }

    /// Collects the declarations in a function body, however deeply nested in statements.
    fn build_from_block(&mut self, function: DeclId, node: Node<'_>) {
        let ctx = Context {
            block_scope: true,
            ..Context::default()
        };
        for child in named_children(node) {
            match child.kind() {
                "declaration" => {
                    for decl in self.build_from_declaration(child, ctx) {
                        self.tu.add_child(function, decl);
                    }
                }
                // members of local classes are not block-scope declarations
                kind if is_record(kind) => {}
                _ => self.build_from_block(function, child),
            }
        }
    }

    fn build_from_function<'t>(
        &mut self,
        span: Span,
        func: FunctionDeclarator<'t>,
        is_definition: bool,
        ctx: Context<'t>,
    ) -> DeclId {
        let name = split_qualified(func.name, self.source);
        let ident = self.ident(name.leaf);
        let list = self.build_from_parameter_list(func.node.child_by_field_name("parameters"));
        let key = self.function_key(&name, &ident, &list, func.node, ctx);

        tracing::trace!(
            target: "pncheck::lower",
            %key,
            params = list.params.len(),
            has_prototype = list.has_prototype,
            is_definition,
            "function declaration"
        );

        self.add_scoped_decl(
            span,
            DeclKind::Function(FunctionDecl {
                ident,
                key,
                params: list.params,
                has_prototype: list.has_prototype,
                is_definition,
                is_variadic: list.is_variadic,
            }),
        )
    }

    fn build_from_parameter_list(&self, list: Option<Node<'_>>) -> ParameterList {
        let Some(list) = list else {
            return ParameterList::default();
        };

        let mut out = ParameterList {
            has_prototype: true,
            ..ParameterList::default()
        };
        let mut cursor = list.walk();
        let children: Vec<_> = list.children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "parameter_declaration"
                | "optional_parameter_declaration"
                | "variadic_parameter_declaration"
                | "explicit_object_parameter_declaration" => {
                    let name = child
                        .child_by_field_name("declarator")
                        .and_then(declarator_name);
                    out.params.push(ParamDecl {
                        span: child.byte_range().into(),
                        ident: name.map(|n| self.ident(n)),
                    });
                    out.types.push(parameter_type(child, self.source));
                }
                "variadic_parameter" | "..." => out.is_variadic = true,
                // an old-style identifier list
                "identifier" => out.has_prototype = false,
                _ => {}
            }
        }

        let is_void =
            out.params.len() == 1 && out.params[0].ident.is_none() && out.types[0] == "void";
        if is_void {
            out.params.clear();
            out.types.clear();
        } else if out.params.is_empty() && !out.is_variadic && out.has_prototype {
            out.has_prototype = self.language.empty_params_is_prototype();
        }

        out
    }

    fn function_key(
        &self,
        name: &QualifiedName<'_>,
        ident: &IdentNode,
        list: &ParameterList,
        func: Node<'_>,
        ctx: Context<'_>,
    ) -> FunctionKey {
        if self.language == Language::C {
            return FunctionKey::new(ident.data.clone());
        }

        // friends and block-scope declarations declare a function of the enclosing namespace
        let namespace_only = ctx.friend || ctx.block_scope;
        let mut path: Vec<&str> = if name.global {
            Vec::new()
        } else {
            self.scopes
                .iter()
                .filter(|s| s.is_namespace || !namespace_only)
                .map(|s| s.name.as_str())
                .collect()
        };
        path.extend(name.qualifier.iter().map(String::as_str));
        path.push(&ident.data);

        let mut key = String::new();
        if let Some(params) = ctx.template.filter(|_| name.qualifier.is_empty()) {
            key.push_str("template");
            key.push_str(&normalize(self.text(params)));
            key.push(' ');
        }
        key.push_str(&path.join("::"));
        key.push('(');
        key.push_str(&list.types.join(","));
        if list.is_variadic {
            if !list.types.is_empty() {
                key.push(',');
            }
            key.push_str("...");
        }
        key.push(')');
        for qualifier in named_children(func) {
            if matches!(qualifier.kind(), "type_qualifier" | "ref_qualifier") {
                key.push(' ');
                key.push_str(&normalize(self.text(qualifier)));
            }
        }

        FunctionKey::new(key)
    }
}
