//! Analysis plugins and the registry the driver looks them up in.
//!
//! A plugin is a named factory for a [`PluginAction`]. The action checks its arguments and then
//! creates an [`AstConsumer`], which receives every top-level declaration group as soon as it
//! has been lowered.

pub mod param_names;

use std::sync::OnceLock;

use thiserror::Error;

use crate::{
    decl::{DeclGroupRef, TranslationUnit},
    diagnostic::DiagnosticsEngine,
    util::Ice,
};

pub trait AstConsumer {
    /// Handles one top-level declaration group. `tu` already contains the group and everything
    /// lowered before it, nothing after it.
    ///
    /// Returning `false` stops lowering: no further groups are built or handed over.
    fn handle_top_level_decl(&mut self, tu: &TranslationUnit, group: DeclGroupRef<'_>) -> bool;
}

pub trait PluginAction {
    /// Receives the arguments given to the plugin on the command line. Returning `false`
    /// rejects them and aborts the run.
    fn parse_args(&mut self, args: &[String]) -> bool;

    /// Creates the consumer for one source file, reporting into `diags`.
    fn create_consumer<'d>(
        &self,
        diags: &'d mut DiagnosticsEngine,
        source_name: &str,
    ) -> Box<dyn AstConsumer + 'd>;
}

pub type PluginFactory = fn() -> Box<dyn PluginAction>;

#[derive(Debug, Clone, Copy)]
pub struct PluginEntry {
    name: &'static str,
    description: &'static str,
    factory: PluginFactory,
}

impl PluginEntry {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn instantiate(&self) -> Box<dyn PluginAction> {
        (self.factory)()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PluginError {
    #[error("a plugin named `{0}` is already registered")]
    Duplicate(&'static str),
}

#[derive(Debug, Default)]
pub struct PluginRegistry {
    entries: Vec<PluginEntry>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry containing every plugin that ships with this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry
            .add(
                param_names::PLUGIN_NAME,
                param_names::PLUGIN_DESCRIPTION,
                param_names::ParameterNameChecker::create,
            )
            .ice();
        registry
    }

    pub fn add(
        &mut self,
        name: &'static str,
        description: &'static str,
        factory: PluginFactory,
    ) -> Result<(), PluginError> {
        if self.find(name).is_some() {
            return Err(PluginError::Duplicate(name));
        }
        tracing::debug!(target: "pncheck::plugin", name, "registered plugin");
        self.entries.push(PluginEntry {
            name,
            description,
            factory,
        });
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&PluginEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn instantiate(&self, name: &str) -> Option<Box<dyn PluginAction>> {
        self.find(name).map(PluginEntry::instantiate)
    }

    /// Registered plugins, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PluginEntry> {
        self.entries.iter()
    }
}

/// The process-wide registry, built on first use.
pub fn registry() -> &'static PluginRegistry {
    static REGISTRY: OnceLock<PluginRegistry> = OnceLock::new();
    REGISTRY.get_or_init(PluginRegistry::with_builtin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_plugins_are_registered() {
        let entry = registry().find("check-parameter-names").unwrap();
        assert_eq!(entry.description(), "check for parameter names mismatch");
        assert!(registry().instantiate("check-parameter-names").is_some());
        assert!(registry().instantiate("no-such-plugin").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = PluginRegistry::with_builtin();
        let res = registry.add(
            param_names::PLUGIN_NAME,
            "again",
            param_names::ParameterNameChecker::create,
        );

        assert_eq!(res, Err(PluginError::Duplicate("check-parameter-names")));
        assert_eq!(registry.iter().count(), 1);
    }
}
