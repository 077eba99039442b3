mod dot_tree;
mod inspect_decls;

use crate::decl::TranslationUnit;
use dot_tree::DotTree;

trait ToDot {
    fn to_dot(&self) -> DotTree;
}

pub fn inspect_decls(tu: &TranslationUnit) -> String {
    tu.to_dot().to_string()
}
