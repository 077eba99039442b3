pub mod analyze;
pub mod diagnostic;
pub mod inspectors {
    pub mod dot;
}
pub mod passes {
    pub mod lower_tree;
    pub mod parse;
    pub mod visit;
}
pub mod plugin;
pub mod settings;
mod structures {
    pub mod decl;
}
mod util;

pub use structures::decl;
