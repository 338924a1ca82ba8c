//! Cast/unary/binary/access operator tables.
//!
//! These tables are the canonical contract the code pass consults to assign
//! both a result `Type` and a monomorphized operator variant to every
//! cast/unary/binary/access expression. The compiler later maps each variant
//! 1:1 onto a typed opcode (e.g. `Binary::AddInt` -> `ADD_INT`). Any
//! combination not listed here is a type error.

use vesper_ast::nodes::{AccessKind, BinaryOp, UnaryOp};

use super::Type;

/// Monomorphized cast variant, selected by (source type, target type).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastVariant {
    IntToFloat,
    IntToBool,
    IntToString,
    FloatToInt,
    FloatToBool,
    FloatToString,
    BoolToInt,
    BoolToFloat,
    BoolToString,
    ListToBool,
    ListToString,
    ListToInt,
    DictToBool,
    DictToString,
    DictToInt,
    StringToBool,
    StringToInt,
}

/// Looks up the cast table entry for `source as target`, per SPEC_FULL.md §4.2.
#[must_use]
pub fn cast_variant(source: &Type, target: &Type) -> Option<(CastVariant, Type)> {
    use CastVariant::{
        BoolToFloat, BoolToInt, BoolToString, DictToBool, DictToInt, DictToString, FloatToBool,
        FloatToInt, FloatToString, IntToBool, IntToFloat, IntToString, ListToBool, ListToInt,
        ListToString, StringToBool, StringToInt,
    };

    let variant = match (source, target) {
        (Type::Int, Type::Float) => IntToFloat,
        (Type::Int, Type::Bool) => IntToBool,
        (Type::Int, Type::String) => IntToString,
        (Type::Float, Type::Int) => FloatToInt,
        (Type::Float, Type::Bool) => FloatToBool,
        (Type::Float, Type::String) => FloatToString,
        (Type::Bool, Type::Int) => BoolToInt,
        (Type::Bool, Type::Float) => BoolToFloat,
        (Type::Bool, Type::String) => BoolToString,
        (Type::List(_), Type::Bool) => ListToBool,
        (Type::List(_), Type::String) => ListToString,
        (Type::List(_), Type::Int) => ListToInt,
        (Type::Dict(_), Type::Bool) => DictToBool,
        (Type::Dict(_), Type::String) => DictToString,
        (Type::Dict(_), Type::Int) => DictToInt,
        (Type::String, Type::Bool) => StringToBool,
        (Type::String, Type::Int) => StringToInt,
        _ => return None,
    };

    Some((variant, target.clone()))
}

/// Monomorphized unary-operator variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryVariant {
    NotBool,
    PlusInt,
    PlusFloat,
    PlusBool,
    MinusInt,
    MinusFloat,
    MinusBool,
}

/// Looks up the unary table entry for `op operand`, per SPEC_FULL.md §4.2.
#[must_use]
pub fn unary_variant(op: UnaryOp, operand: &Type) -> Option<(UnaryVariant, Type)> {
    match (op, operand) {
        (UnaryOp::Not, Type::Bool) => Some((UnaryVariant::NotBool, Type::Bool)),
        (UnaryOp::Plus, Type::Int) => Some((UnaryVariant::PlusInt, Type::Int)),
        (UnaryOp::Plus, Type::Float) => Some((UnaryVariant::PlusFloat, Type::Float)),
        (UnaryOp::Plus, Type::Bool) => Some((UnaryVariant::PlusBool, Type::Int)),
        (UnaryOp::Minus, Type::Int) => Some((UnaryVariant::MinusInt, Type::Int)),
        (UnaryOp::Minus, Type::Float) => Some((UnaryVariant::MinusFloat, Type::Float)),
        (UnaryOp::Minus, Type::Bool) => Some((UnaryVariant::MinusBool, Type::Int)),
        _ => None,
    }
}

/// Monomorphized binary-operator variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryVariant {
    AddInt,
    AddFloat,
    AddString,
    AddBool,
    AddList,
    AddDict,
    SubInt,
    SubFloat,
    SubBool,
    MulInt,
    MulFloat,
    MulBool,
    MulIntString,
    MulStringInt,
    MulIntList,
    MulListInt,
    DivIntInt,
    DivFloatFloat,
    DivStringInt,
    DivListInt,
    EqInt,
    EqFloat,
    EqString,
    EqBool,
    EqList,
    EqDict,
    NotEqInt,
    NotEqFloat,
    NotEqString,
    NotEqBool,
    NotEqList,
    NotEqDict,
    LtInt,
    LtFloat,
    LtString,
    LtBool,
    LeInt,
    LeFloat,
    LeString,
    LeBool,
    GtInt,
    GtFloat,
    GtString,
    GtBool,
    GeInt,
    GeFloat,
    GeString,
    GeBool,
}

/// Looks up the binary table entry for `left op right`, per SPEC_FULL.md §4.2.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn binary_variant(op: BinaryOp, left: &Type, right: &Type) -> Option<(BinaryVariant, Type)> {
    use BinaryVariant::{
        AddBool, AddDict, AddFloat, AddInt, AddList, AddString, DivFloatFloat, DivIntInt,
        DivListInt, DivStringInt, EqBool, EqDict, EqFloat, EqInt, EqList, EqString, GeBool,
        GeFloat, GeInt, GeString, GtBool, GtFloat, GtInt, GtString, LeBool, LeFloat, LeInt,
        LeString, LtBool, LtFloat, LtInt, LtString, MulBool, MulFloat, MulInt, MulIntList,
        MulIntString, MulListInt, MulStringInt, NotEqBool, NotEqDict, NotEqFloat, NotEqInt,
        NotEqList, NotEqString, SubBool, SubFloat, SubInt,
    };

    match op {
        BinaryOp::Add => match (left, right) {
            (Type::Int, Type::Int) => Some((AddInt, Type::Int)),
            (Type::Float, Type::Float) => Some((AddFloat, Type::Float)),
            (Type::String, Type::String) => Some((AddString, Type::String)),
            (Type::Bool, Type::Bool) => Some((AddBool, Type::Int)),
            (Type::List(l), Type::List(r)) if l == r => Some((AddList, left.clone())),
            (Type::Dict(l), Type::Dict(r)) if l == r => Some((AddDict, left.clone())),
            _ => None,
        },
        BinaryOp::Sub => match (left, right) {
            (Type::Int, Type::Int) => Some((SubInt, Type::Int)),
            (Type::Float, Type::Float) => Some((SubFloat, Type::Float)),
            (Type::Bool, Type::Bool) => Some((SubBool, Type::Int)),
            _ => None,
        },
        BinaryOp::Mul => match (left, right) {
            (Type::Int, Type::Int) => Some((MulInt, Type::Int)),
            (Type::Float, Type::Float) => Some((MulFloat, Type::Float)),
            (Type::Bool, Type::Bool) => Some((MulBool, Type::Int)),
            (Type::Int, Type::String) => Some((MulIntString, Type::String)),
            (Type::String, Type::Int) => Some((MulStringInt, Type::String)),
            (Type::Int, Type::List(_)) => Some((MulIntList, right.clone())),
            (Type::List(_), Type::Int) => Some((MulListInt, left.clone())),
            _ => None,
        },
        BinaryOp::Div => match (left, right) {
            (Type::Int, Type::Int) => Some((DivIntInt, Type::Float)),
            (Type::Float, Type::Float) => Some((DivFloatFloat, Type::Float)),
            (Type::String, Type::Int) => Some((DivStringInt, Type::list(Type::String))),
            (Type::List(elem), Type::Int) => {
                Some((DivListInt, Type::list(Type::List(elem.clone()))))
            }
            _ => None,
        },
        BinaryOp::Eq | BinaryOp::NotEq => {
            if left != right {
                return None;
            }
            let is_eq = op == BinaryOp::Eq;
            let variant = match left {
                Type::Int => {
                    if is_eq {
                        EqInt
                    } else {
                        NotEqInt
                    }
                }
                Type::Float => {
                    if is_eq {
                        EqFloat
                    } else {
                        NotEqFloat
                    }
                }
                Type::String => {
                    if is_eq {
                        EqString
                    } else {
                        NotEqString
                    }
                }
                Type::Bool => {
                    if is_eq {
                        EqBool
                    } else {
                        NotEqBool
                    }
                }
                Type::List(_) => {
                    if is_eq {
                        EqList
                    } else {
                        NotEqList
                    }
                }
                Type::Dict(_) => {
                    if is_eq {
                        EqDict
                    } else {
                        NotEqDict
                    }
                }
                _ => return None,
            };
            Some((variant, Type::Bool))
        }
        BinaryOp::Less | BinaryOp::LessEq | BinaryOp::Greater | BinaryOp::GreaterEq => {
            if left != right {
                return None;
            }
            let variant = match (op, left) {
                (BinaryOp::Less, Type::Int) => LtInt,
                (BinaryOp::Less, Type::Float) => LtFloat,
                (BinaryOp::Less, Type::String) => LtString,
                (BinaryOp::Less, Type::Bool) => LtBool,
                (BinaryOp::LessEq, Type::Int) => LeInt,
                (BinaryOp::LessEq, Type::Float) => LeFloat,
                (BinaryOp::LessEq, Type::String) => LeString,
                (BinaryOp::LessEq, Type::Bool) => LeBool,
                (BinaryOp::Greater, Type::Int) => GtInt,
                (BinaryOp::Greater, Type::Float) => GtFloat,
                (BinaryOp::Greater, Type::String) => GtString,
                (BinaryOp::Greater, Type::Bool) => GtBool,
                (BinaryOp::GreaterEq, Type::Int) => GeInt,
                (BinaryOp::GreaterEq, Type::Float) => GeFloat,
                (BinaryOp::GreaterEq, Type::String) => GeString,
                (BinaryOp::GreaterEq, Type::Bool) => GeBool,
                _ => return None,
            };
            Some((variant, Type::Bool))
        }
    }
}

/// Resolves the `Access` kind and result type for `target[index]`.
#[must_use]
pub fn access_kind(target: &Type) -> Option<(AccessKind, Type)> {
    match target {
        Type::String => Some((AccessKind::String, Type::String)),
        Type::List(elem) => Some((AccessKind::List, (**elem).clone())),
        Type::Dict(value) => Some((AccessKind::Dict, (**value).clone())),
        _ => None,
    }
}
