//! Tests for `use` and `export` statements at the parser level (module
//! *resolution* across files is covered in `resolver.rs`).

use vesper_ast::nodes::AnyNode;
use vesper_parser::parser::Parser;

fn parse_one(source: &str) -> (vesper_ast::ast::AST, vesper_ast::nodes::NodeID) {
    let (ast, top_level) = Parser::parse_program(source).unwrap();
    assert_eq!(top_level.len(), 1);
    (ast, top_level[0])
}

#[test]
fn bare_module_import() {
    let (ast, id) = parse_one(r#"use "collections";"#);
    let AnyNode::Use(use_stmt) = &ast.get_node(id).unwrap().data else { panic!("expected use") };
    assert!(use_stmt.targets.is_empty());
    assert_eq!(use_stmt.module_path, "collections");
}

#[test]
fn named_imports_from_a_module() {
    let (ast, id) = parse_one(r#"use Stack, Queue from "collections";"#);
    let AnyNode::Use(use_stmt) = &ast.get_node(id).unwrap().data else { panic!("expected use") };
    assert_eq!(use_stmt.targets, vec!["Stack".to_string(), "Queue".to_string()]);
    assert_eq!(use_stmt.module_path, "collections");
}

#[test]
fn named_import_without_a_module_path_is_a_parse_error() {
    let err = Parser::parse_program("use Stack;").unwrap_err();
    assert!(matches!(err, vesper_parser::error::ParseError::UnexpectedToken { .. }));
}

#[test]
fn export_wraps_a_function_declaration() {
    let (ast, id) = parse_one("export fun f() {\n}\n");
    let AnyNode::Export(export) = &ast.get_node(id).unwrap().data else { panic!("expected export") };
    assert!(matches!(&ast.get_node(export.inner).unwrap().data, AnyNode::Function(_)));
}

#[test]
fn export_wraps_a_class_declaration() {
    let (ast, id) = parse_one("export class C {\n}\n");
    let AnyNode::Export(export) = &ast.get_node(id).unwrap().data else { panic!("expected export") };
    assert!(matches!(&ast.get_node(export.inner).unwrap().data, AnyNode::Class(_)));
}

#[test]
fn export_wraps_a_use_statement() {
    let (ast, id) = parse_one(r#"export use "collections";"#);
    let AnyNode::Export(export) = &ast.get_node(id).unwrap().data else { panic!("expected export") };
    assert!(matches!(&ast.get_node(export.inner).unwrap().data, AnyNode::Use(_)));
}

#[test]
fn export_wraps_a_top_level_declaration() {
    let (ast, id) = parse_one("export x: int = 1;");
    let AnyNode::Export(export) = &ast.get_node(id).unwrap().data else { panic!("expected export") };
    assert!(matches!(&ast.get_node(export.inner).unwrap().data, AnyNode::Declaration(_)));
}

#[test]
fn export_of_an_expression_is_a_parse_error() {
    let err = Parser::parse_program("export 1 + 1;").unwrap_err();
    assert!(matches!(err, vesper_parser::error::ParseError::UnexpectedToken { .. }));
}
