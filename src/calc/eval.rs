//! Evaluation of validated expression trees.
//!
//! The evaluator is environment-free: there are no names to look up and no
//! functions to call. Arithmetic follows the original host semantics:
//! `/` is always float division, `//` and `%` floor toward the divisor's
//! sign, and mixed int/float operations promote to float. Integer overflow
//! is a reported error, never a wrap.

use super::ast::{BinOp, Expr, UnaryOp};
use crate::error::{EvalError, EvalResult};
use std::fmt;

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Tuple(Vec<Value>),
    List(Vec<Value>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            // integral floats keep a trailing .0 so float division is visible
            Value::Float(x) if x.fract() == 0.0 && x.is_finite() => write!(f, "{x:.1}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0]),
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                write!(f, ")")
            }
            Value::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

pub fn eval(expr: &Expr) -> EvalResult<Value> {
    match expr {
        Expr::Int(n) => Ok(Value::Int(*n)),
        Expr::Float(x) => Ok(Value::Float(*x)),
        Expr::Unary { op, operand } => eval_unary(*op, eval(operand)?),
        Expr::Binary { op, left, right } => eval_binary(*op, eval(left)?, eval(right)?),
        Expr::Tuple(items) => Ok(Value::Tuple(eval_items(items)?)),
        Expr::List(items) => Ok(Value::List(eval_items(items)?)),
        // The validator rejects these before evaluation; refuse them again
        // rather than trust the caller.
        Expr::Name(_) | Expr::Call { .. } | Expr::Attribute { .. } | Expr::Index { .. } => {
            Err(EvalError::DisallowedNode(expr.kind()))
        }
    }
}

fn eval_items(items: &[Expr]) -> EvalResult<Vec<Value>> {
    items.iter().map(eval).collect()
}

fn eval_unary(op: UnaryOp, value: Value) -> EvalResult<Value> {
    match (op, value) {
        (UnaryOp::Pos, v @ (Value::Int(_) | Value::Float(_))) => Ok(v),
        (UnaryOp::Neg, Value::Int(n)) => {
            n.checked_neg().map(Value::Int).ok_or(EvalError::Overflow("-"))
        }
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Pos, _) => Err(EvalError::UnsupportedOperand("+")),
        (UnaryOp::Neg, _) => Err(EvalError::UnsupportedOperand("-")),
    }
}

fn eval_binary(op: BinOp, left: Value, right: Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int(op, a, b),
        (Value::Int(a), Value::Float(b)) => eval_float(op, a as f64, b),
        (Value::Float(a), Value::Int(b)) => eval_float(op, a, b as f64),
        (Value::Float(a), Value::Float(b)) => eval_float(op, a, b),
        _ => Err(EvalError::UnsupportedOperand(op.symbol())),
    }
}

fn eval_int(op: BinOp, a: i64, b: i64) -> EvalResult<Value> {
    match op {
        BinOp::Add => a.checked_add(b).map(Value::Int).ok_or(EvalError::Overflow("+")),
        BinOp::Sub => a.checked_sub(b).map(Value::Int).ok_or(EvalError::Overflow("-")),
        BinOp::Mul => a.checked_mul(b).map(Value::Int).ok_or(EvalError::Overflow("*")),
        // true division always yields a float
        BinOp::Div => {
            if b == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(Value::Float(a as f64 / b as f64))
            }
        }
        BinOp::FloorDiv => {
            if b == 0 {
                Err(EvalError::DivisionByZero)
            } else if a == i64::MIN && b == -1 {
                Err(EvalError::Overflow("//"))
            } else {
                Ok(Value::Int(floor_div(a, b)))
            }
        }
        BinOp::Mod => {
            if b == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(Value::Int(floor_mod(a, b)))
            }
        }
        BinOp::Pow => int_pow(a, b),
        BinOp::BitAnd => Ok(Value::Int(a & b)),
        BinOp::BitOr => Ok(Value::Int(a | b)),
        BinOp::BitXor => Ok(Value::Int(a ^ b)),
        BinOp::Shl => {
            let shift = check_shift(b)?;
            a.checked_shl(shift)
                .filter(|shifted| shifted.checked_shr(shift) == Some(a))
                .map(Value::Int)
                .ok_or(EvalError::Overflow("<<"))
        }
        BinOp::Shr => {
            if b < 0 {
                return Err(EvalError::NegativeShift);
            }
            // arithmetic shift; counts past the width saturate at the sign bit
            let shifted = if b >= 64 {
                if a < 0 {
                    -1
                } else {
                    0
                }
            } else {
                a >> b
            };
            Ok(Value::Int(shifted))
        }
    }
}

fn eval_float(op: BinOp, a: f64, b: f64) -> EvalResult<Value> {
    match op {
        BinOp::Add => Ok(Value::Float(a + b)),
        BinOp::Sub => Ok(Value::Float(a - b)),
        BinOp::Mul => Ok(Value::Float(a * b)),
        BinOp::Div => {
            if b == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(Value::Float(a / b))
            }
        }
        BinOp::FloorDiv => {
            if b == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(Value::Float((a / b).floor()))
            }
        }
        BinOp::Mod => {
            if b == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                let r = a % b;
                if r != 0.0 && (r < 0.0) != (b < 0.0) {
                    Ok(Value::Float(r + b))
                } else {
                    Ok(Value::Float(r))
                }
            }
        }
        BinOp::Pow => Ok(Value::Float(a.powf(b))),
        BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::Shl | BinOp::Shr => {
            Err(EvalError::UnsupportedOperand(op.symbol()))
        }
    }
}

/// Floor division, rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Modulo with the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> i64 {
    // i64::MIN % -1 would overflow the native rem
    let r = a.checked_rem(b).unwrap_or(0);
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

/// Integer power for non-negative exponents; negative exponents promote to
/// float.
fn int_pow(a: i64, b: i64) -> EvalResult<Value> {
    if b < 0 {
        if a == 0 {
            return Err(EvalError::DivisionByZero);
        }
        return Ok(Value::Float((a as f64).powf(b as f64)));
    }
    let exp = u32::try_from(b).map_err(|_| EvalError::Overflow("**"))?;
    a.checked_pow(exp)
        .map(Value::Int)
        .ok_or(EvalError::Overflow("**"))
}

fn check_shift(count: i64) -> EvalResult<u32> {
    if count < 0 {
        Err(EvalError::NegativeShift)
    } else if count >= 64 {
        Err(EvalError::Overflow("<<"))
    } else {
        Ok(count as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::parser::parse;

    fn eval_str(input: &str) -> EvalResult<Value> {
        eval(&parse(input).unwrap())
    }

    #[test]
    fn test_true_division_is_float() {
        assert_eq!(eval_str("10/2"), Ok(Value::Float(5.0)));
        assert_eq!(eval_str("10/4"), Ok(Value::Float(2.5)));
    }

    #[test]
    fn test_floor_division_rounds_down() {
        assert_eq!(eval_str("7//2"), Ok(Value::Int(3)));
        assert_eq!(eval_str("-7//2"), Ok(Value::Int(-4)));
        assert_eq!(eval_str("7//-2"), Ok(Value::Int(-4)));
        assert_eq!(eval_str("7.0//2"), Ok(Value::Float(3.0)));
    }

    #[test]
    fn test_modulo_takes_divisor_sign() {
        assert_eq!(eval_str("7%2"), Ok(Value::Int(1)));
        assert_eq!(eval_str("-7%2"), Ok(Value::Int(1)));
        assert_eq!(eval_str("7%-2"), Ok(Value::Int(-1)));
    }

    #[test]
    fn test_power() {
        assert_eq!(eval_str("2**10"), Ok(Value::Int(1024)));
        assert_eq!(eval_str("2**-1"), Ok(Value::Float(0.5)));
        assert_eq!(eval_str("0**-1"), Err(EvalError::DivisionByZero));
        assert_eq!(eval_str("2.0**2"), Ok(Value::Float(4.0)));
    }

    #[test]
    fn test_bitwise_and_shifts() {
        assert_eq!(eval_str("6&3"), Ok(Value::Int(2)));
        assert_eq!(eval_str("6|3"), Ok(Value::Int(7)));
        assert_eq!(eval_str("6^3"), Ok(Value::Int(5)));
        assert_eq!(eval_str("1<<3"), Ok(Value::Int(8)));
        assert_eq!(eval_str("16>>2"), Ok(Value::Int(4)));
        assert_eq!(eval_str("16>>100"), Ok(Value::Int(0)));
        assert_eq!(eval_str("-16>>100"), Ok(Value::Int(-1)));
    }

    #[test]
    fn test_bitwise_rejects_floats() {
        assert_eq!(eval_str("1.5&2"), Err(EvalError::UnsupportedOperand("&")));
        assert_eq!(eval_str("1<<2.0"), Err(EvalError::UnsupportedOperand("<<")));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval_str("1/0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval_str("1//0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval_str("1%0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval_str("1/0.0"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(
            eval_str("9223372036854775807+1"),
            Err(EvalError::Overflow("+"))
        );
        assert_eq!(eval_str("2**64"), Err(EvalError::Overflow("**")));
        assert_eq!(eval_str("1<<64"), Err(EvalError::Overflow("<<")));
        assert_eq!(eval_str("1<<-1"), Err(EvalError::NegativeShift));
    }

    #[test]
    fn test_sequence_literals_evaluate() {
        assert_eq!(
            eval_str("(1, 2)"),
            Ok(Value::Tuple(vec![Value::Int(1), Value::Int(2)]))
        );
        assert_eq!(
            eval_str("[1, 2.5]"),
            Ok(Value::List(vec![Value::Int(1), Value::Float(2.5)]))
        );
    }

    #[test]
    fn test_sequence_arithmetic_rejected() {
        assert_eq!(
            eval_str("(1,2)+(3,4)"),
            Err(EvalError::UnsupportedOperand("+"))
        );
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(Value::Int(14).to_string(), "14");
        assert_eq!(Value::Float(5.0).to_string(), "5.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(
            Value::Tuple(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "(1, 2)"
        );
        assert_eq!(Value::Tuple(vec![Value::Int(1)]).to_string(), "(1,)");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "[1, 2]"
        );
    }
}
