//! Tests for type-annotation parsing, exercised through declarations since
//! `TypeAnnotation` itself isn't an arena node.

use vesper_ast::nodes::AnyNode;
use vesper_ast::type_annotation::TypeAnnotation;
use vesper_parser::parser::Parser;

fn parse_type(source: &str) -> TypeAnnotation {
    let (ast, top_level) = Parser::parse_program(source).unwrap();
    let AnyNode::Declaration(decl) = &ast.get_node(top_level[0]).unwrap().data else {
        panic!("expected declaration")
    };
    decl.type_annotation.clone().expect("expected a type annotation")
}

#[test]
fn primitive_types() {
    assert_eq!(parse_type("x: int;"), TypeAnnotation::Int);
    assert_eq!(parse_type("x: float;"), TypeAnnotation::Float);
    assert_eq!(parse_type("x: bool;"), TypeAnnotation::Bool);
    assert_eq!(parse_type("x: string;"), TypeAnnotation::String);
}

#[test]
fn list_and_dict_types() {
    assert_eq!(parse_type("x: [int];"), TypeAnnotation::List(Box::new(TypeAnnotation::Int)));
    assert_eq!(parse_type("x: {string};"), TypeAnnotation::Dict(Box::new(TypeAnnotation::String)));
}

#[test]
fn nested_container_types() {
    assert_eq!(
        parse_type("x: [{int}];"),
        TypeAnnotation::List(Box::new(TypeAnnotation::Dict(Box::new(TypeAnnotation::Int))))
    );
}

#[test]
fn object_type_is_a_bare_identifier() {
    assert_eq!(parse_type("x: Point;"), TypeAnnotation::Object("Point".to_string()));
}

#[test]
fn function_type_with_parameters_and_return() {
    assert_eq!(
        parse_type("x: fun(int, bool) -> string;"),
        TypeAnnotation::Fun {
            parameters: vec![TypeAnnotation::Int, TypeAnnotation::Bool],
            return_type: Some(Box::new(TypeAnnotation::String)),
        }
    );
}

#[test]
fn function_type_with_no_parameters_and_no_return() {
    assert_eq!(parse_type("x: fun();"), TypeAnnotation::Fun { parameters: Vec::new(), return_type: None });
}

#[test]
fn display_round_trips_through_source_syntax() {
    assert_eq!(TypeAnnotation::List(Box::new(TypeAnnotation::Int)).to_string(), "[int]");
    assert_eq!(
        TypeAnnotation::Fun { parameters: vec![TypeAnnotation::Int], return_type: None }.to_string(),
        "fun(int)"
    );
}
