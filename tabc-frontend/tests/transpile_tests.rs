//! End-to-end tests: source text in, C text out

use indoc::indoc;
use pretty_assertions::assert_eq;
use tabc_frontend::{generate, parse, NodeKind, ParseError};

fn transpile(source: &str) -> String {
    let tree = parse(source).expect("source should parse");
    generate(&tree)
}

#[test]
fn test_functions_hoisted_before_entry_point() {
    let source = indoc! {"
        add(int a, int b) -> int:
        \treturn a
        main:
        \tC::> int x = 1
        \treturn 0
    "};

    let expected = indoc! {"
        int add(int a, int b)
        {
        \treturn a;
        }

        int main()
        {
        \tint x = 1;
        \treturn 0;
        }

    "};

    assert_eq!(transpile(source), expected);
}

#[test]
fn test_includes_and_comments_follow_declarations() {
    let source = indoc! {"
        # greeting program
        C::import stdio.h
        main:
        \tC::> greet() # say hello
        \treturn 0
        C::import local greet.h
        greet:
        \tC::> puts(\"hello\")
    "};

    let expected = indoc! {"
        void greet()
        {
        \tputs(\"hello\");
        }

        /* greeting program */
        #include <stdio.h>
        #include \"greet.h\"
        int main()
        {
        \t/* say hello */
        \tgreet();
        \treturn 0;
        }

    "};

    assert_eq!(transpile(source), expected);
}

#[test]
fn test_unnamed_parameter_is_discarded() {
    let output = transpile("greet(string):\n\tC::> puts(\"hi\")\n");
    assert_eq!(
        output,
        "void greet(string param_0_unused_)\n{\n\t(void)param_0_unused_;\n\tputs(\"hi\");\n}\n\n"
    );
}

#[test]
fn test_unused_names_never_collide() {
    let tree = parse("f(int param_0_unused__, int, char param_1_unused_):\n").unwrap();
    let id = tree.container(tree.root()).unwrap().function("f").unwrap();
    let params = &tree.function(id).unwrap().signature.parameters;

    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["param_0_unused__", "param_1_unused__", "param_1_unused_"]);
    assert_eq!(params.iter().filter(|p| p.unused).count(), 1);
}

#[test]
fn test_include_flavors() {
    assert_eq!(transpile("C::import local foo.h\n"), "#include \"foo.h\"\n");
    assert_eq!(transpile("C::import global foo.h\n"), "#include <foo.h>\n");
    assert_eq!(transpile("C::import foo.h\n"), "#include <foo.h>\n");
}

#[test]
fn test_none_return_type_and_empty_parameters() {
    assert_eq!(transpile("reset() -> none:\n"), "void reset()\n{\n}\n\n");
}

#[test]
fn test_blank_lines_do_not_close_scopes() {
    let source = "main:\n\tC::> a()\n\n\n\tC::> b()\n";
    assert_eq!(transpile(source), "int main()\n{\n\ta();\n\tb();\n}\n\n");
}

#[test]
fn test_duplicate_function_produces_no_tree() {
    let source = indoc! {"
        step:
        \tC::> x++
        step:
        \tC::> y++
    "};
    let err = parse(source).unwrap_err();
    assert!(matches!(err, ParseError::DuplicateFunction { ref name, .. } if name == "step"));
}

#[test]
fn test_return_outside_function_is_rejected() {
    let err = parse("C::import stdio.h\nreturn 0\n").unwrap_err();
    assert!(matches!(err, ParseError::ReturnOutsideFunction { .. }));
    assert_eq!(err.location().line, 2);
}

#[test]
fn test_depth_always_matches_open_containers() {
    // One level deeper than the open scope is only allowed right after a header
    let ok = indoc! {"
        a:
        \tb:
        \t\tC::> inner()
        \tC::> outer()
        C::> top()
    "};
    assert!(parse(ok).is_ok());

    let skipped = "a:\n\tC::> x()\n\t\tC::> y()\n";
    let err = parse(skipped).unwrap_err();
    assert!(matches!(
        err,
        ParseError::IndentationSkip {
            depth: 2,
            expected: 1,
            ..
        }
    ));
}

#[test]
fn test_nested_functions_keep_their_statements() {
    let tree = parse(indoc! {"
        outer:
        \tinner:
        \t\treturn
        \tC::> inner()
    "})
    .unwrap();

    let outer = tree.container(tree.root()).unwrap().function("outer").unwrap();
    let inner = tree.container(outer).unwrap().function("inner").unwrap();
    let body = tree.container(inner).unwrap();
    assert_eq!(tree.node(body.statements()[0]).kind, NodeKind::Return(None));
    assert_eq!(tree.enclosing_function(body.statements()[0]), Some(inner));
}

#[test]
fn test_tree_serializes_to_json() {
    let tree = parse("main:\n\treturn 0\n").unwrap();
    let json = serde_json::to_value(&tree).unwrap();
    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[2]["kind"]["Return"], "0");
}

#[test]
fn test_tree_json_lists_registries_in_name_order() {
    let tree = parse("zeta:\nmid:\nalpha:\n").unwrap();
    let json = serde_json::to_string(&tree).unwrap();

    let registry = json.find("\"functions\"").unwrap();
    let positions: Vec<usize> = ["\"alpha\"", "\"mid\"", "\"zeta\""]
        .iter()
        .map(|name| registry + json[registry..].find(name).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(json, serde_json::to_string(&parse("zeta:\nmid:\nalpha:\n").unwrap()).unwrap());
}

#[test]
fn test_native_struct_name_rejected_in_function_body() {
    let err = parse("f:\n\tstruct int\n").unwrap_err();
    assert!(matches!(err, ParseError::DuplicateType { ref name, .. } if name == "int"));
}

#[test]
fn test_single_entry_point_whatever_the_header() {
    let err = parse("main -> int:\n\treturn 0\nmain:\n\treturn 1\n").unwrap_err();
    assert!(matches!(err, ParseError::DuplicateEntryPoint { .. }));
    assert_eq!(transpile("main -> int:\n\treturn 0\n"), "int main()\n{\n\treturn 0;\n}\n\n");
}
