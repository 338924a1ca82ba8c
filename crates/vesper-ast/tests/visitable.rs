//! Tests for the Visitable trait implementation

use vesper_ast::ast::AST;
use vesper_ast::nodes::{
    AnyNode,
    BinaryExpr,
    BinaryOp,
    BooleanExpr,
    CallExpr,
    DeclarationStmt,
    DictionaryExpr,
    IntegerExpr,
    ListExpr,
    LogicalExpr,
    LogicalOp,
    NodeID,
    NodeKind,
    PropertyExpr,
    UnaryExpr,
    UnaryOp,
    VariableExpr,
};
use vesper_ast::type_annotation::TypeAnnotation;
use vesper_ast::visitor::{Visitable, Visitor, VisitorResult};
use vesper_source::types::Span;

struct TestVisitor {
    visited_nodes: Vec<&'static str>,
}

impl TestVisitor {
    const fn new() -> Self { Self { visited_nodes: Vec::new() } }
}

impl Visitor<()> for TestVisitor {
    fn visit(&mut self, _node_id: NodeID) -> Option<()> {
        self.visited_nodes.push("visit");
        None
    }

    fn visit_binary(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_binary");
        Ok(())
    }

    fn visit_logical(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_logical");
        Ok(())
    }

    fn visit_unary(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_unary");
        Ok(())
    }

    fn visit_integer(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_integer");
        Ok(())
    }

    fn visit_boolean(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_boolean");
        Ok(())
    }

    fn visit_declaration(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_declaration");
        Ok(())
    }

    fn visit_variable(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_variable");
        Ok(())
    }

    fn visit_call(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_call");
        Ok(())
    }

    fn visit_list_expr(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_list_expr");
        Ok(())
    }

    fn visit_dictionary(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_dictionary");
        Ok(())
    }

    fn visit_property(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_property");
        Ok(())
    }
}

#[test]
fn test_any_node_visitable_binary() {
    let mut ast = AST::new();
    let span = Span::new(0, 5);

    let left = ast.alloc_node(
        NodeKind::Expression,
        AnyNode::Integer(IntegerExpr::new(1, NodeID::placeholder(), span)),
        span,
    );
    let right = ast.alloc_node(
        NodeKind::Expression,
        AnyNode::Integer(IntegerExpr::new(2, NodeID::placeholder(), span)),
        span,
    );
    let binary = BinaryExpr::new(BinaryOp::Add, left, right, NodeID::placeholder(), span);
    let binary_id = ast.alloc_node(NodeKind::Expression, AnyNode::Binary(binary), span);

    let mut visitor = TestVisitor::new();
    if let Some(node) = ast.get_node(binary_id) {
        drop(node.data.accept(&mut visitor, binary_id));
    }

    assert_eq!(visitor.visited_nodes, vec!["visit_binary"]);
}

#[test]
fn test_any_node_visitable_logical() {
    let mut ast = AST::new();
    let span = Span::new(0, 5);

    let left = ast.alloc_node(
        NodeKind::Expression,
        AnyNode::Boolean(BooleanExpr::new(true, NodeID::placeholder(), span)),
        span,
    );
    let right = ast.alloc_node(
        NodeKind::Expression,
        AnyNode::Boolean(BooleanExpr::new(false, NodeID::placeholder(), span)),
        span,
    );
    let logical = LogicalExpr::new(LogicalOp::And, left, right, NodeID::placeholder(), span);
    let logical_id = ast.alloc_node(NodeKind::Expression, AnyNode::Logical(logical), span);

    let mut visitor = TestVisitor::new();
    if let Some(node) = ast.get_node(logical_id) {
        drop(node.data.accept(&mut visitor, logical_id));
    }

    assert_eq!(visitor.visited_nodes, vec!["visit_logical"]);
}

#[test]
fn test_any_node_visitable_unary() {
    let mut ast = AST::new();
    let span = Span::new(0, 5);

    let operand = ast.alloc_node(
        NodeKind::Expression,
        AnyNode::Integer(IntegerExpr::new(7, NodeID::placeholder(), span)),
        span,
    );
    let unary = UnaryExpr::new(UnaryOp::Minus, operand, NodeID::placeholder(), span);
    let unary_id = ast.alloc_node(NodeKind::Expression, AnyNode::Unary(unary), span);

    let mut visitor = TestVisitor::new();
    if let Some(node) = ast.get_node(unary_id) {
        drop(node.data.accept(&mut visitor, unary_id));
    }

    assert_eq!(visitor.visited_nodes, vec!["visit_unary"]);
}

#[test]
fn test_any_node_visitable_declaration() {
    let mut ast = AST::new();
    let span = Span::new(0, 5);

    let decl = DeclarationStmt::new(
        "x".to_string(),
        Some(TypeAnnotation::Int),
        None,
        NodeID::placeholder(),
        span,
    );
    let decl_id = ast.alloc_node(NodeKind::Declaration, AnyNode::Declaration(decl), span);

    let mut visitor = TestVisitor::new();
    if let Some(node) = ast.get_node(decl_id) {
        drop(node.data.accept(&mut visitor, decl_id));
    }

    assert_eq!(visitor.visited_nodes, vec!["visit_declaration"]);
}

#[test]
fn test_multiple_node_types_visitable() {
    let mut ast = AST::new();
    let span = Span::new(0, 5);

    let var = VariableExpr::new("x".to_string(), NodeID::placeholder(), span);
    let var_id = ast.alloc_node(NodeKind::Expression, AnyNode::Variable(var), span);

    let list = ListExpr::new(vec![var_id], NodeID::placeholder(), span);
    let list_id = ast.alloc_node(NodeKind::Expression, AnyNode::List(list), span);

    let call = CallExpr::new(var_id, vec![list_id], NodeID::placeholder(), span);
    let call_id = ast.alloc_node(NodeKind::Expression, AnyNode::Call(call), span);

    let mut visitor = TestVisitor::new();

    if let Some(node) = ast.get_node(var_id) {
        drop(node.data.accept(&mut visitor, var_id));
    }
    if let Some(node) = ast.get_node(list_id) {
        drop(node.data.accept(&mut visitor, list_id));
    }
    if let Some(node) = ast.get_node(call_id) {
        drop(node.data.accept(&mut visitor, call_id));
    }

    assert_eq!(visitor.visited_nodes, vec!["visit_variable", "visit_list_expr", "visit_call"]);
}

#[test]
fn test_concrete_type_visitable() {
    let span = Span::new(0, 5);

    let binary = BinaryExpr::new(
        BinaryOp::Add,
        NodeID::placeholder(),
        NodeID::placeholder(),
        NodeID::placeholder(),
        span,
    );

    let mut visitor = TestVisitor::new();
    let node_id = NodeID::new(1, 1);
    drop(binary.accept(&mut visitor, node_id));

    assert_eq!(visitor.visited_nodes, vec!["visit_binary"]);
}

#[test]
fn test_container_types_visitable() {
    let span = Span::new(0, 5);
    let mut visitor = TestVisitor::new();
    let dummy_id = NodeID::new(1, 1);

    let dict = DictionaryExpr::new(vec![("k".to_string(), dummy_id)], dummy_id, span);
    drop(dict.accept(&mut visitor, dummy_id));

    let list = ListExpr::new(vec![dummy_id], dummy_id, span);
    drop(list.accept(&mut visitor, dummy_id));

    assert_eq!(visitor.visited_nodes, vec!["visit_dictionary", "visit_list_expr"]);
}

#[test]
fn test_property_access_visitable() {
    let span = Span::new(0, 5);
    let mut visitor = TestVisitor::new();
    let dummy_id = NodeID::new(1, 1);

    let property = PropertyExpr::new(dummy_id, "field".to_string(), dummy_id, span);
    drop(property.accept(&mut visitor, dummy_id));

    assert_eq!(visitor.visited_nodes, vec!["visit_property"]);
}

#[test]
fn test_get_as_type_mismatch_and_match() {
    let mut ast = AST::new();
    let span = Span::new(0, 5);

    let integer = IntegerExpr::new(42, NodeID::placeholder(), span);
    let int_id = ast.alloc_node(NodeKind::Expression, AnyNode::Integer(integer), span);

    let as_integer = ast.get_as::<IntegerExpr>(int_id);
    assert!(as_integer.is_ok());
    assert_eq!(as_integer.unwrap().value, 42);

    let as_boolean = ast.get_as::<BooleanExpr>(int_id);
    assert!(as_boolean.is_err());
}
