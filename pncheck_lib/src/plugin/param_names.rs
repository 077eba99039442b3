//! Warns when a function is redeclared with different names for the same parameters.
//!
//! Every declaration that has a prototype is compared with the nearest declaration of the same
//! function before it, position by position. Anonymous parameters and names starting with an
//! underscore are never compared.

#[cfg(test)]
mod tests;

use crate::{
    decl::{DeclGroupRef, DeclId, FunctionDecl, TranslationUnit},
    diagnostic::{Code, DiagnosticsEngine, Level},
    passes::visit::RecursiveDeclVisitor,
};

use super::{AstConsumer, PluginAction};

pub const PLUGIN_NAME: &str = "check-parameter-names";
pub const PLUGIN_DESCRIPTION: &str = "check for parameter names mismatch";

const MISMATCH_MESSAGE: &str = "parameter name mismatch";
const PREVIOUS_MESSAGE: &str = "parameter in previous function declaration was here";

#[derive(Debug, Default)]
pub struct ParameterNameChecker;

impl ParameterNameChecker {
    pub fn create() -> Box<dyn PluginAction> {
        Box::new(Self)
    }
}

impl PluginAction for ParameterNameChecker {
    fn parse_args(&mut self, args: &[String]) -> bool {
        if !args.is_empty() {
            tracing::debug!(target: "pncheck::param_names", ?args, "ignoring plugin arguments");
        }
        true
    }

    fn create_consumer<'d>(
        &self,
        diags: &'d mut DiagnosticsEngine,
        _source_name: &str,
    ) -> Box<dyn AstConsumer + 'd> {
        Box::new(FuncDeclConsumer::new(diags))
    }
}

/// Runs a [`FuncDeclVisitor`] over every declaration of every group it is handed.
pub struct FuncDeclConsumer<'d> {
    visitor: FuncDeclVisitor<'d>,
}

impl<'d> FuncDeclConsumer<'d> {
    pub fn new(diags: &'d mut DiagnosticsEngine) -> Self {
        Self {
            visitor: FuncDeclVisitor::new(diags),
        }
    }
}

impl AstConsumer for FuncDeclConsumer<'_> {
    fn handle_top_level_decl(&mut self, tu: &TranslationUnit, group: DeclGroupRef<'_>) -> bool {
        for id in group.iter() {
            self.visitor.traverse_decl(tu, id);
        }
        true
    }
}

pub struct FuncDeclVisitor<'d> {
    diags: &'d mut DiagnosticsEngine,
    mismatch: Code,
    previous: Code,
}

impl<'d> FuncDeclVisitor<'d> {
    pub fn new(diags: &'d mut DiagnosticsEngine) -> Self {
        let mismatch = diags.custom_diag_id(Level::Warning, MISMATCH_MESSAGE);
        let previous = diags.custom_diag_id(Level::Note, PREVIOUS_MESSAGE);
        Self {
            diags,
            mismatch,
            previous,
        }
    }
}

impl RecursiveDeclVisitor for FuncDeclVisitor<'_> {
    fn visit_function_decl(
        &mut self,
        tu: &TranslationUnit,
        id: DeclId,
        func: &FunctionDecl,
    ) -> bool {
        check_function_decl(tu, id, func, self.diags, self.mismatch, self.previous);
        true
    }
}

/// Compares the parameter names of `func` with those of its previous declaration, reporting a
/// `mismatch` warning on the parameter of `func` followed by a `previous` note on the earlier
/// one for every pair of names that differ.
pub fn check_function_decl(
    tu: &TranslationUnit,
    id: DeclId,
    func: &FunctionDecl,
    diags: &mut DiagnosticsEngine,
    mismatch: Code,
    previous: Code,
) {
    if !func.has_prototype {
        return;
    }
    let Some((prev_id, prev)) = tu.previous_decl(id) else {
        return;
    };
    if !prev.has_prototype {
        return;
    }

    for (param, prev_param) in func.params.iter().zip(&prev.params) {
        let (Some(name), Some(prev_name)) = (param.name(), prev_param.name()) else {
            continue;
        };
        if name.starts_with('_') || prev_name.starts_with('_') || name == prev_name {
            continue;
        }

        tracing::trace!(
            target: "pncheck::param_names",
            function = %func.key,
            decl = %id,
            previous = %prev_id,
            name,
            prev_name,
            "parameter name mismatch"
        );
        diags.report(param.location(), mismatch);
        diags.report(prev_param.location(), previous);
    }
}
