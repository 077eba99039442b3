use crate::decl::{Decl, DeclId, FunctionDecl, TranslationUnit};

/// A pre-order, depth-first walk over declarations.
///
/// Override the `visit_*` methods for the declarations of interest. Every hook returns whether
/// the traversal should continue; returning `false` stops it without visiting anything else.
pub trait RecursiveDeclVisitor {
    /// Called for every declaration, before the more specific hooks.
    fn visit_decl(&mut self, _tu: &TranslationUnit, _id: DeclId, _decl: &Decl) -> bool {
        true
    }

    fn visit_function_decl(
        &mut self,
        _tu: &TranslationUnit,
        _id: DeclId,
        _func: &FunctionDecl,
    ) -> bool {
        true
    }

    /// Visits `id` and then every declaration nested in it. Returns `false` if one of the hooks
    /// asked to stop.
    fn traverse_decl(&mut self, tu: &TranslationUnit, id: DeclId) -> bool {
        let decl = tu.decl(id);
        if !self.visit_decl(tu, id, decl) {
            return false;
        }
        if let Some(func) = tu.function(id) {
            if !self.visit_function_decl(tu, id, func) {
                return false;
            }
        }
        decl.children
            .iter()
            .all(|child| self.traverse_decl(tu, *child))
    }
}
