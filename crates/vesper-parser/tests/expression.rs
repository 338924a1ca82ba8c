//! Tests for expression parsing: precedence, associativity, and the postfix
//! chain (call, index, slice, property, cast).

use vesper_ast::nodes::{AnyNode, BinaryOp, LogicalOp, UnaryOp};
use vesper_parser::parser::Parser;

fn parse_expr_stmt(source: &str) -> (vesper_ast::ast::AST, vesper_ast::nodes::NodeID) {
    let (ast, top_level) = Parser::parse_program(source).unwrap();
    let stmt = ast.get_node(top_level[0]).unwrap();
    let AnyNode::ExpressionStmt(expr_stmt) = &stmt.data else { panic!("expected expression statement") };
    (ast, expr_stmt.expr)
}

#[test]
fn additive_is_left_associative() {
    let (ast, id) = parse_expr_stmt("1 - 2 - 3;");
    let AnyNode::Binary(outer) = &ast.get_node(id).unwrap().data else { panic!("expected binary") };
    assert_eq!(outer.op, BinaryOp::Sub);
    let AnyNode::Binary(inner) = &ast.get_node(outer.left).unwrap().data else { panic!("expected binary") };
    assert_eq!(inner.op, BinaryOp::Sub);
}

#[test]
fn multiplicative_binds_tighter_than_additive() {
    let (ast, id) = parse_expr_stmt("1 + 2 * 3;");
    let AnyNode::Binary(outer) = &ast.get_node(id).unwrap().data else { panic!("expected binary") };
    assert_eq!(outer.op, BinaryOp::Add);
    let AnyNode::Binary(right) = &ast.get_node(outer.right).unwrap().data else { panic!("expected binary") };
    assert_eq!(right.op, BinaryOp::Mul);
}

#[test]
fn and_binds_tighter_than_or() {
    let (ast, id) = parse_expr_stmt("a or b and c;");
    let AnyNode::Logical(outer) = &ast.get_node(id).unwrap().data else { panic!("expected logical") };
    assert_eq!(outer.op, LogicalOp::Or);
    let AnyNode::Logical(right) = &ast.get_node(outer.right).unwrap().data else { panic!("expected logical") };
    assert_eq!(right.op, LogicalOp::And);
}

#[test]
fn unary_is_right_associative() {
    let (ast, id) = parse_expr_stmt("- - 1;");
    let AnyNode::Unary(outer) = &ast.get_node(id).unwrap().data else { panic!("expected unary") };
    assert_eq!(outer.op, UnaryOp::Minus);
    assert!(matches!(&ast.get_node(outer.operand).unwrap().data, AnyNode::Unary(_)));
}

#[test]
fn assignment_is_right_associative() {
    let (ast, id) = parse_expr_stmt("a = b = 1;");
    let AnyNode::Assign(outer) = &ast.get_node(id).unwrap().data else { panic!("expected assign") };
    assert!(matches!(&ast.get_node(outer.value).unwrap().data, AnyNode::Assign(_)));
}

#[test]
fn postfix_chain_associates_left_to_right() {
    // `a.b(c)[0]` should parse as Access(Call(Property(a, b), [c]), 0).
    let (ast, id) = parse_expr_stmt("a.b(c)[0];");
    let AnyNode::Access(access) = &ast.get_node(id).unwrap().data else { panic!("expected access") };
    let AnyNode::Call(call) = &ast.get_node(access.target).unwrap().data else { panic!("expected call") };
    let AnyNode::Property(property) = &ast.get_node(call.target).unwrap().data else {
        panic!("expected property")
    };
    assert_eq!(property.name, "b");
}

#[test]
fn cast_binds_as_postfix() {
    let (ast, id) = parse_expr_stmt("x as int;");
    assert!(matches!(&ast.get_node(id).unwrap().data, AnyNode::Cast(_)));
}

#[test]
fn slice_with_all_bounds_omitted() {
    let (ast, id) = parse_expr_stmt("xs[:];");
    let AnyNode::Slice(slice) = &ast.get_node(id).unwrap().data else { panic!("expected slice") };
    assert!(slice.start.is_none());
    assert!(slice.end.is_none());
    assert!(slice.step.is_none());
}

#[test]
fn range_expression() {
    let (ast, id) = parse_expr_stmt("1..10;");
    let AnyNode::Range(range) = &ast.get_node(id).unwrap().data else { panic!("expected range") };
    assert!(!range.inclusive);
}

#[test]
fn inclusive_range_expression() {
    let (ast, id) = parse_expr_stmt("1..=10;");
    let AnyNode::Range(range) = &ast.get_node(id).unwrap().data else { panic!("expected range") };
    assert!(range.inclusive);
}

#[test]
fn list_and_dict_literals() {
    let (ast, id) = parse_expr_stmt("[1, 2, 3];");
    let AnyNode::List(list) = &ast.get_node(id).unwrap().data else { panic!("expected list") };
    assert_eq!(list.elements.len(), 3);

    let (ast, id) = parse_expr_stmt(r#"{"a": 1, "b": 2};"#);
    let AnyNode::Dictionary(dict) = &ast.get_node(id).unwrap().data else { panic!("expected dict") };
    assert_eq!(dict.entries.len(), 2);
}

#[test]
fn object_literal_disambiguated_from_a_bare_identifier() {
    let (ast, id) = parse_expr_stmt("Point { x: 1, y: 2 };");
    let AnyNode::Object(object) = &ast.get_node(id).unwrap().data else { panic!("expected object") };
    assert_eq!(object.class_name, "Point");
    assert_eq!(object.arguments.len(), 2);
}

#[test]
fn string_escape_sequences_are_unescaped() {
    let (ast, id) = parse_expr_stmt(r#""a\nb\t\"c\"";"#);
    let AnyNode::StringLit(s) = &ast.get_node(id).unwrap().data else { panic!("expected string") };
    assert_eq!(s.value, "a\nb\t\"c\"");
}

#[test]
fn invalid_escape_is_a_parse_error() {
    let err = Parser::parse_program(r#""\q";"#).unwrap_err();
    assert!(matches!(err, vesper_parser::error::ParseError::InvalidEscape { .. }));
}
