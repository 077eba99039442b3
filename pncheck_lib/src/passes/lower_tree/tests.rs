use pretty_assertions::assert_eq;

use super::*;
use crate::passes::parse::parse;

#[track_caller]
fn lower_source(source: &str, language: Language) -> TranslationUnit {
    let tree = parse(source, language)
        .into_value()
        .expect("tree-sitter always recovers");
    lower(&tree, source, language)
}

/// Name, parameter names and prototype flag of every function, in source order.
fn functions(tu: &TranslationUnit) -> Vec<(String, Vec<Option<String>>, bool)> {
    tu.iter()
        .filter_map(|(id, _)| tu.function(id))
        .map(|f| {
            let params = f
                .params
                .iter()
                .map(|p| p.name().map(str::to_owned))
                .collect();
            (f.ident.data.clone(), params, f.has_prototype)
        })
        .collect()
}

fn keys(tu: &TranslationUnit) -> Vec<String> {
    tu.iter()
        .filter_map(|(id, _)| tu.function(id))
        .map(|f| f.key.to_string())
        .collect()
}

fn named(names: &[&str]) -> Vec<Option<String>> {
    names.iter().map(|n| Some((*n).to_owned())).collect()
}

#[test]
fn declaration_and_definition_form_a_chain() {
    let source = "void f(int a, char *b);\nvoid f(int x, char *y) { }\n";
    let tu = lower_source(source, Language::C);

    assert_eq!(
        functions(&tu),
        vec![
            ("f".to_owned(), named(&["a", "b"]), true),
            ("f".to_owned(), named(&["x", "y"]), true),
        ]
    );
    assert_eq!(tu.group_count(), 2);
    assert_eq!(tu.redecls(&FunctionKey::new("f")).len(), 2);

    let definition = tu.redecls(&FunctionKey::new("f"))[1];
    assert!(tu.function(definition).unwrap().is_definition);
    let (previous, _) = tu.previous_decl(definition).unwrap();
    assert_eq!(previous, tu.redecls(&FunctionKey::new("f"))[0]);
}

#[test]
fn parameter_locations_point_at_names() {
    let source = "void f(int alpha, int);\n";
    let tu = lower_source(source, Language::C);
    let id = tu.redecls(&FunctionKey::new("f"))[0];
    let params = &tu.function(id).unwrap().params;

    let named = params[0].location();
    assert_eq!(&source[named.start()..named.excl_end()], "alpha");
    let anonymous = params[1].location();
    assert_eq!(&source[anonymous.start()..anonymous.excl_end()], "int");
}

#[test]
fn prototypes_follow_the_language() {
    let source = "void f();\nvoid g(void);\nvoid h(int a, ...);\n";

    let c = lower_source(source, Language::C);
    assert_eq!(
        functions(&c),
        vec![
            ("f".to_owned(), vec![], false),
            ("g".to_owned(), vec![], true),
            ("h".to_owned(), named(&["a"]), true),
        ]
    );

    let cpp = lower_source(source, Language::Cpp);
    assert_eq!(
        functions(&cpp),
        vec![
            ("f".to_owned(), vec![], true),
            ("g".to_owned(), vec![], true),
            ("h".to_owned(), named(&["a"]), true),
        ]
    );
    assert_eq!(keys(&cpp), vec!["f()", "g()", "h(int,...)"]);
}

#[test]
fn anonymous_parameters_have_no_name() {
    let tu = lower_source("void f(int, char *);\n", Language::C);
    assert_eq!(functions(&tu), vec![("f".to_owned(), vec![None, None], true)]);
}

#[test]
fn function_pointers_are_variables() {
    let source = "void (*fp)(int a);\nint (*get(int key))(double d);\n";
    let tu = lower_source(source, Language::C);

    assert_eq!(functions(&tu), vec![("get".to_owned(), named(&["key"]), true)]);
    let variables: Vec<_> = tu
        .iter()
        .filter_map(|(_, d)| match &d.kind {
            DeclKind::Variable(ident) => Some(ident.data.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(variables, vec!["fp"]);
}

#[test]
fn one_declaration_is_one_group() {
    let tu = lower_source("int a, f(int x), g(int y);\nint h(int z);\n", Language::C);

    assert_eq!(tu.group_count(), 2);
    assert_eq!(tu.group(0).unwrap().len(), 3);
    assert_eq!(tu.group(1).unwrap().len(), 1);
}

#[test]
fn every_preprocessor_branch_is_lowered() {
    let source = "#ifdef BIG\nvoid f(long a);\n#else\nvoid f(int b);\n#endif\n";
    let tu = lower_source(source, Language::C);

    assert_eq!(
        functions(&tu),
        vec![
            ("f".to_owned(), named(&["a"]), true),
            ("f".to_owned(), named(&["b"]), true),
        ]
    );
    assert_eq!(tu.group_count(), 2);
}

#[test]
fn block_scope_declarations_join_the_chain() {
    let source = "void f(int a);\nvoid g(void) {\n  if (1) {\n    void f(int b);\n  }\n}\n";
    let tu = lower_source(source, Language::C);

    let chain = tu.redecls(&FunctionKey::new("f"));
    assert_eq!(chain.len(), 2);
    let g = tu.redecls(&FunctionKey::new("g"))[0];
    assert_eq!(tu.decl(g).children, vec![chain[1]]);
}

#[test]
fn members_and_friends_are_keyed_by_scope() {
    let source = "\
namespace ns {
struct A {
    void f(int a) const;
    friend void g(int c);
};
}
void ns::A::f(int b) const { }
";
    let tu = lower_source(source, Language::Cpp);

    assert_eq!(
        keys(&tu),
        vec!["ns::A::f(int) const", "ns::g(int)", "ns::A::f(int) const"]
    );
    assert_eq!(
        tu.redecls(&FunctionKey::new("ns::A::f(int) const")).len(),
        2
    );
    // one namespace per group
    assert_eq!(tu.group_count(), 2);
}

#[test]
fn overloads_are_different_functions() {
    let source = "void f(int a);\nvoid f(double a);\nvoid f(int b = 1);\n";
    let tu = lower_source(source, Language::Cpp);

    assert_eq!(keys(&tu), vec!["f(int)", "f(double)", "f(int)"]);
    assert_eq!(tu.redecls(&FunctionKey::new("f(int)")).len(), 2);
}

#[test]
fn parameter_types_ignore_spelling() {
    let source = "void f(const char* name);\nvoid f(const char *  other);\n";
    let tu = lower_source(source, Language::Cpp);

    assert_eq!(keys(&tu), vec!["f(const char*)", "f(const char*)"]);
}

#[test]
fn attributes_are_not_part_of_the_type() {
    let source = "void f([[maybe_unused]] int a);\nvoid f(int b) { }\n";
    let tu = lower_source(source, Language::Cpp);

    assert_eq!(keys(&tu), vec!["f(int)", "f(int)"]);
    assert_eq!(tu.redecls(&FunctionKey::new("f(int)")).len(), 2);
}

#[test]
fn builtin_types_have_one_spelling() {
    let source = "\
void f(unsigned int a);
void f(unsigned b) { }
void g(long int w, short unsigned x, signed char y, long double z);
void h(const unsigned long long int *p);
";
    let tu = lower_source(source, Language::Cpp);

    assert_eq!(
        keys(&tu),
        vec![
            "f(unsigned int)",
            "f(unsigned int)",
            "g(long,unsigned short,signed char,long double)",
            "h(const unsigned long long*)",
        ]
    );
}

#[test]
fn templates_and_linkage_specs_are_traversed() {
    let source = "\
extern \"C\" {
void c_api(int handle);
}
template <typename T> void t(T a);
template <typename T> void t(T b) { }
";
    let tu = lower_source(source, Language::Cpp);

    assert_eq!(
        keys(&tu),
        vec![
            "c_api(int)",
            "template<typename T> t(T)",
            "template<typename T> t(T)"
        ]
    );
    let linkage = tu.group(0).unwrap().iter().next().unwrap();
    assert_eq!(tu.decl(linkage).kind, DeclKind::LinkageSpec);
    assert_eq!(tu.decl(linkage).children.len(), 1);
}

struct StopAfter(usize);

impl AstConsumer for StopAfter {
    fn handle_top_level_decl(&mut self, _tu: &TranslationUnit, _group: DeclGroupRef<'_>) -> bool {
        self.0 -= 1;
        self.0 > 0
    }
}

#[test]
fn consumer_can_stop_lowering() {
    let source = "void f(int a);\nvoid g(int b);\nvoid h(int c);\n";
    let tree = parse(source, Language::C).into_value().unwrap();
    let tu = lower_with_consumer(&tree, source, Language::C, &mut StopAfter(2));

    assert_eq!(tu.group_count(), 2);
    assert_eq!(
        functions(&tu),
        vec![
            ("f".to_owned(), named(&["a"]), true),
            ("g".to_owned(), named(&["b"]), true),
        ]
    );
}
