use super::{DotTree, ToDot};
use crate::decl::{DeclId, DeclKind, FunctionDecl, IdentNode, TranslationUnit};

impl ToDot for TranslationUnit {
    fn to_dot(&self) -> DotTree {
        DotTree::new(
            format!("translation unit ({})", self.language()),
            self.groups()
                .enumerate()
                .map(|(i, group)| {
                    let decls = group.iter().map(|id| ("", to_dot_decl(self, id))).collect();
                    ("group", DotTree::new(format!("group {i}"), decls))
                })
                .collect(),
        )
    }
}

fn to_dot_ident(ident: Option<&IdentNode>) -> DotTree {
    DotTree::new_leaf(ident.map_or_else(|| "<anonymous>".to_owned(), |i| i.data.clone()))
}

fn to_dot_decl(tu: &TranslationUnit, id: DeclId) -> DotTree {
    let decl = tu.decl(id);
    let (name, ident) = match &decl.kind {
        DeclKind::Function(func) => return to_dot_function(tu, id, func),
        DeclKind::Namespace(name) => ("namespace", Some(to_dot_ident(name.as_ref()))),
        DeclKind::Record(name) => ("record", Some(to_dot_ident(name.as_ref()))),
        DeclKind::Variable(name) => ("var decl", Some(to_dot_ident(Some(name)))),
        DeclKind::LinkageSpec => ("linkage spec", None),
        DeclKind::Template => ("template", None),
        DeclKind::Friend => ("friend", None),
    };

    DotTree::new(
        format!("{name} {id}"),
        ident
            .map(|ident| ("ident", ident))
            .into_iter()
            .chain(decl.children.iter().map(|c| ("", to_dot_decl(tu, *c))))
            .collect(),
    )
}

fn to_dot_function(tu: &TranslationUnit, id: DeclId, func: &FunctionDecl) -> DotTree {
    let name = if func.is_definition { "fn def" } else { "fn decl" };
    let mut children = vec![
        ("ident", to_dot_ident(Some(&func.ident))),
        ("key", DotTree::new_leaf(func.key.to_string())),
    ];
    if !func.has_prototype {
        children.push(("", DotTree::new_leaf("no prototype".to_owned())));
    }
    children.extend(
        func.params
            .iter()
            .map(|p| ("param", to_dot_ident(p.ident.as_ref()))),
    );
    if func.is_variadic {
        children.push(("param", DotTree::new_leaf("...".to_owned())));
    }
    if let Some((prev, _)) = tu.previous_decl(id) {
        children.push(("previous", DotTree::new_leaf(prev.to_string())));
    }
    children.extend(
        tu.decl(id)
            .children
            .iter()
            .map(|c| ("", to_dot_decl(tu, *c))),
    );

    DotTree::new(format!("{name} {id}"), children)
}
