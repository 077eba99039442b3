use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    C,
    Cpp,
}

impl Language {
    /// Guess the language from a file extension. Headers ending in `.h` are treated as C.
    pub fn from_path(path: &Path) -> Option<Language> {
        match path.extension()?.to_str()? {
            "c" | "h" => Some(Language::C),
            "cc" | "cpp" | "cxx" | "c++" | "hh" | "hpp" | "hxx" | "h++" => Some(Language::Cpp),
            _ => None,
        }
    }

    pub(crate) fn tree_sitter_language(&self) -> tree_sitter::Language {
        match self {
            Language::C => tree_sitter_c::LANGUAGE.into(),
            Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }

    /// Whether an empty parameter list `()` declares a function taking no arguments. In C it
    /// leaves the parameters unspecified instead.
    pub fn empty_params_is_prototype(&self) -> bool {
        match self {
            Language::C => false,
            Language::Cpp => true,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Language::C => "C",
            Language::Cpp => "C++",
        };
        write!(f, "{name}")
    }
}
