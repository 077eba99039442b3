//! The declaration model the analysis passes run on.
//!
//! A [`TranslationUnit`] owns every declaration found in a source file in an arena. Declarations
//! refer to each other through [`DeclId`]s: a scope lists its children, and the translation unit
//! keeps, per [`FunctionKey`], the ids of every declaration of that function in source order.
//! That last relation is what "the previous declaration" of a function is read from.

use std::collections::HashMap;

use crate::{diagnostic::Span, settings::Language};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentNode {
    pub span: Span,
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

impl std::fmt::Display for DeclId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "decl{}", self.0)
    }
}

/// Identity of a function: two declarations with an equal key declare the same function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionKey(String);

impl FunctionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FunctionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub span: Span,
    pub kind: DeclKind,
    /// Declarations nested in this one, in source order.
    pub children: Vec<DeclId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    Function(FunctionDecl),
    /// `None` for anonymous namespaces.
    Namespace(Option<IdentNode>),
    /// A struct, class or union with a body.
    Record(Option<IdentNode>),
    /// `extern "C" { ... }`
    LinkageSpec,
    Template,
    Friend,
    Variable(IdentNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub ident: IdentNode,
    pub key: FunctionKey,
    pub params: Vec<ParamDecl>,
    /// `false` when the parameter list leaves the parameters unspecified, like `f()` or an
    /// old-style identifier list in C.
    pub has_prototype: bool,
    pub is_definition: bool,
    pub is_variadic: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub span: Span,
    pub ident: Option<IdentNode>,
}

impl ParamDecl {
    /// The name of the parameter, `None` for anonymous parameters.
    pub fn name(&self) -> Option<&str> {
        self.ident
            .as_ref()
            .map(|i| i.data.as_str())
            .filter(|n| !n.is_empty())
    }

    /// Where diagnostics about this parameter point to: its name, or the whole parameter when
    /// it has none.
    pub fn location(&self) -> Span {
        self.ident.as_ref().map_or(self.span, |i| i.span)
    }
}

/// A batch of sibling declarations handed off together, like the declarators of one declaration
/// statement.
#[derive(Debug, Clone, Copy)]
pub struct DeclGroupRef<'a> {
    decls: &'a [DeclId],
}

impl<'a> DeclGroupRef<'a> {
    pub fn iter(&self) -> impl Iterator<Item = DeclId> + 'a {
        self.decls.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    language: Language,
    decls: Vec<Decl>,
    groups: Vec<Vec<DeclId>>,
    redecls: HashMap<FunctionKey, Vec<DeclId>>,
}

impl TranslationUnit {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            decls: Vec::new(),
            groups: Vec::new(),
            redecls: HashMap::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Number of declarations, nested ones included.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.0]
    }

    /// Every declaration, in the order it was added.
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Decl)> {
        self.decls.iter().enumerate().map(|(i, d)| (DeclId(i), d))
    }

    /// The function declared by `id`, if it is a function declaration.
    pub fn function(&self, id: DeclId) -> Option<&FunctionDecl> {
        match &self.decl(id).kind {
            DeclKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = DeclGroupRef<'_>> {
        self.groups.iter().map(|g| DeclGroupRef { decls: g })
    }

    pub fn group(&self, index: usize) -> Option<DeclGroupRef<'_>> {
        self.groups.get(index).map(|g| DeclGroupRef { decls: g })
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// All declarations of the function with this key, in source order.
    pub fn redecls(&self, key: &FunctionKey) -> &[DeclId] {
        self.redecls.get(key).map_or(&[], Vec::as_slice)
    }

    /// The nearest declaration of the same function that comes before `id`, if any.
    pub fn previous_decl(&self, id: DeclId) -> Option<(DeclId, &FunctionDecl)> {
        let key = &self.function(id)?.key;
        let chain = self.redecls(key);
        let pos = chain.iter().position(|d| *d == id)?;
        let prev = *chain.get(pos.checked_sub(1)?)?;
        self.function(prev).map(|f| (prev, f))
    }

    /// Adds a declaration, registering functions in their redeclaration chain. Declarations
    /// have to be added in source order.
    pub fn add_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId(self.decls.len());
        if let DeclKind::Function(f) = &decl.kind {
            self.redecls.entry(f.key.clone()).or_default().push(id);
        }
        self.decls.push(decl);
        id
    }

    pub fn add_child(&mut self, parent: DeclId, child: DeclId) {
        self.decls[parent.0].children.push(child);
    }

    /// Closes a group of top-level declarations and returns its index.
    pub fn add_group(&mut self, decls: Vec<DeclId>) -> usize {
        self.groups.push(decls);
        self.groups.len() - 1
    }
}
