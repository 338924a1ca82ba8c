//! Tests for statement parsing: declarations, control flow, print/return,
//! and automatic statement termination.

use vesper_ast::nodes::AnyNode;
use vesper_parser::parser::Parser;

fn parse_one(source: &str) -> (vesper_ast::ast::AST, vesper_ast::nodes::NodeID) {
    let (ast, top_level) = Parser::parse_program(source).unwrap();
    assert_eq!(top_level.len(), 1, "expected exactly one top-level statement");
    (ast, top_level[0])
}

#[test]
fn declaration_with_explicit_type_and_initializer() {
    let (ast, id) = parse_one("x: int = 1;");
    let AnyNode::Declaration(decl) = &ast.get_node(id).unwrap().data else { panic!("expected declaration") };
    assert_eq!(decl.name, "x");
    assert!(decl.type_annotation.is_some());
    assert!(decl.initializer.is_some());
}

#[test]
fn declaration_with_inferred_type() {
    let (ast, id) = parse_one("x = 1;");
    let AnyNode::Declaration(decl) = &ast.get_node(id).unwrap().data else { panic!("expected declaration") };
    assert!(decl.type_annotation.is_none());
    assert!(decl.initializer.is_some());
}

#[test]
fn bare_assignment_is_an_expression_statement_not_a_declaration() {
    let (ast, id) = parse_one("x.y = 1;");
    assert!(matches!(&ast.get_node(id).unwrap().data, AnyNode::ExpressionStmt(_)));
}

#[test]
fn print_statement() {
    let (ast, id) = parse_one(r#"print "hi";"#);
    assert!(matches!(&ast.get_node(id).unwrap().data, AnyNode::Print(_)));
}

#[test]
fn return_with_and_without_a_value() {
    let (ast, id) = parse_one("return 1;");
    let AnyNode::Return(ret) = &ast.get_node(id).unwrap().data else { panic!("expected return") };
    assert!(ret.value.is_some());

    let (ast, id) = parse_one("return;");
    let AnyNode::Return(ret) = &ast.get_node(id).unwrap().data else { panic!("expected return") };
    assert!(ret.value.is_none());
}

#[test]
fn if_elif_else_chain() {
    let (ast, id) = parse_one("if a { 1; } elif b { 2; } else { 3; }");
    let AnyNode::If(if_stmt) = &ast.get_node(id).unwrap().data else { panic!("expected if") };
    assert_eq!(if_stmt.then_body.len(), 1);
    assert_eq!(if_stmt.elif_clauses.len(), 1);
    assert!(if_stmt.else_body.is_some());
}

#[test]
fn while_loop() {
    let (ast, id) = parse_one("while true { x = 1; }");
    let AnyNode::While(while_stmt) = &ast.get_node(id).unwrap().data else { panic!("expected while") };
    assert_eq!(while_stmt.body.len(), 1);
}

#[test]
fn for_loop_with_and_without_an_index() {
    let (ast, id) = parse_one("for x in xs { print x; }");
    let AnyNode::For(for_stmt) = &ast.get_node(id).unwrap().data else { panic!("expected for") };
    assert_eq!(for_stmt.variable, "x");
    assert!(for_stmt.index.is_none());

    let (ast, id) = parse_one("for x, i in xs { print x; }");
    let AnyNode::For(for_stmt) = &ast.get_node(id).unwrap().data else { panic!("expected for") };
    assert_eq!(for_stmt.index.as_deref(), Some("i"));
}

#[test]
fn semicolon_and_newline_both_terminate_a_statement() {
    let (_, explicit) = Parser::parse_program("x = 1;\ny = 2;").unwrap();
    let (_, implicit) = Parser::parse_program("x = 1\ny = 2\n").unwrap();
    assert_eq!(explicit.len(), 2);
    assert_eq!(implicit.len(), 2);
}

#[test]
fn missing_terminator_is_a_parse_error() {
    let err = Parser::parse_program("x = 1 y = 2").unwrap_err();
    assert!(matches!(err, vesper_parser::error::ParseError::MissingTerminator { .. }));
}
