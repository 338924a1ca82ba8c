//! Tests for `fun` and `class` declarations.

use vesper_ast::nodes::AnyNode;
use vesper_parser::parser::Parser;

fn parse_one(source: &str) -> (vesper_ast::ast::AST, vesper_ast::nodes::NodeID) {
    let (ast, top_level) = Parser::parse_program(source).unwrap();
    assert_eq!(top_level.len(), 1);
    (ast, top_level[0])
}

#[test]
fn function_with_parameters_and_return_type() {
    let (ast, id) = parse_one("fun add(a: int, b: int) -> int {\n    return a + b;\n}\n");
    let AnyNode::Function(function) = &ast.get_node(id).unwrap().data else { panic!("expected function") };
    assert_eq!(function.name, "add");
    assert_eq!(function.parameters.len(), 2);
    assert!(function.return_type.is_some());
    assert_eq!(function.body.len(), 1);
}

#[test]
fn function_with_no_parameters_and_no_return_type() {
    let (ast, id) = parse_one("fun noop() {\n}\n");
    let AnyNode::Function(function) = &ast.get_node(id).unwrap().data else { panic!("expected function") };
    assert!(function.parameters.is_empty());
    assert!(function.return_type.is_none());
}

#[test]
fn class_with_fields_and_a_method() {
    let source = "class Point {\n    x: int\n    y: int\n    fun sum() -> int {\n        return x + y;\n    }\n}\n";
    let (ast, id) = parse_one(source);
    let AnyNode::Class(class) = &ast.get_node(id).unwrap().data else { panic!("expected class") };
    assert_eq!(class.name, "Point");
    assert_eq!(class.body.len(), 3);
    assert!(matches!(&ast.get_node(class.body[0]).unwrap().data, AnyNode::Declaration(_)));
    assert!(matches!(&ast.get_node(class.body[2]).unwrap().data, AnyNode::Function(_)));
}

#[test]
fn function_parameter_requires_a_type_annotation() {
    let err = Parser::parse_program("fun f(a) {\n}\n").unwrap_err();
    assert!(matches!(err, vesper_parser::error::ParseError::UnexpectedToken { .. }));
}

#[test]
fn duplicate_parameter_names_are_a_semantic_concern_not_a_parse_error() {
    // The grammar doesn't reject this; the analyzer's block-scoped
    // `declare_variable` does, when the parameters are injected as bindings.
    let (_, top_level) = Parser::parse_program("fun f(a: int, a: int) {\n}\n").unwrap();
    assert_eq!(top_level.len(), 1);
}
