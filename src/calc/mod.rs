//! Safe arithmetic evaluation for untrusted input.
//!
//! The pipeline layers independent defenses: a character pre-filter blocks
//! identifiers and keywords before any parsing, the parse itself only admits
//! a small expression grammar, and two tree walks reject call nodes and any
//! node kind outside the arithmetic allow-list. Evaluation runs with no
//! ambient names, so nothing beyond arithmetic is reachable even if a check
//! were bypassed.

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod parser;

pub use eval::Value;

use crate::error::{EvalError, EvalResult};

/// Inputs past this size are rejected before lexing.
const MAX_EXPR_LEN: usize = 4096;

/// Validate and evaluate an arithmetic expression.
///
/// Accepts numeric literals, unary plus/minus, the binary operators
/// `+ - * / // % ** & | ^ << >>`, grouping, and tuple/list literals.
/// Anything that could name an identifier, call a function, or reach an
/// attribute fails with a descriptive [`EvalError`].
pub fn evaluate(expr: &str) -> EvalResult<Value> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(EvalError::EmptyExpression);
    }
    if expr.len() > MAX_EXPR_LEN {
        return Err(EvalError::TooLong(expr.len()));
    }
    // Coarse pre-filter: no alphabetic character may appear anywhere. This
    // is stricter than the grammar below and intentionally so.
    if let Some(c) = expr.chars().find(|c| c.is_alphabetic()) {
        return Err(EvalError::InvalidCharacter(c));
    }

    let tree = parser::parse(expr)?;

    // The pre-filter cannot catch letterless call forms like `(1)(2)`, so
    // the tree is checked regardless.
    for node in tree.walk() {
        if matches!(node, ast::Expr::Call { .. }) {
            return Err(EvalError::DisallowedCall);
        }
    }
    for node in tree.walk() {
        ensure_allowed(node)?;
    }

    eval::eval(&tree)
}

/// Allow-list over node kinds: arithmetic structure passes, everything else
/// is rejected by tag.
fn ensure_allowed(node: &ast::Expr) -> EvalResult<()> {
    use ast::Expr;
    match node {
        Expr::Int(_)
        | Expr::Float(_)
        | Expr::Unary { .. }
        | Expr::Binary { .. }
        | Expr::Tuple(_)
        | Expr::List(_) => Ok(()),
        Expr::Name(_) | Expr::Call { .. } | Expr::Attribute { .. } | Expr::Index { .. } => {
            Err(EvalError::DisallowedNode(node.kind()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_basic_arithmetic() {
        assert_eq!(evaluate("2+3*4"), Ok(Value::Int(14)));
        assert_eq!(evaluate("10/2"), Ok(Value::Float(5.0)));
        assert_eq!(evaluate("(2+3)*4"), Ok(Value::Int(20)));
        assert_eq!(evaluate("-2**2"), Ok(Value::Int(-4)));
    }

    #[test]
    fn test_empty_expression_rejected() {
        assert_eq!(evaluate(""), Err(EvalError::EmptyExpression));
        assert_eq!(evaluate("   "), Err(EvalError::EmptyExpression));
    }

    #[test]
    fn test_letters_rejected_before_parsing() {
        assert_eq!(evaluate("2+a"), Err(EvalError::InvalidCharacter('a')));
        assert_eq!(
            evaluate("os.system(\"ls\")"),
            Err(EvalError::InvalidCharacter('o'))
        );
        // the pre-filter is Unicode-wide
        assert_eq!(evaluate("π*2"), Err(EvalError::InvalidCharacter('π')));
    }

    #[test]
    fn test_letterless_call_forms_rejected() {
        assert_eq!(evaluate("(1)(2)"), Err(EvalError::DisallowedCall));
        assert_eq!(evaluate("(1,2)(3)"), Err(EvalError::DisallowedCall));
    }

    #[test]
    fn test_letterless_names_and_subscripts_rejected() {
        // `_1` is a valid identifier with no alphabetic character in it
        assert_eq!(evaluate("_1"), Err(EvalError::DisallowedNode("name")));
        assert_eq!(
            evaluate("(1,2)[0]"),
            Err(EvalError::DisallowedNode("subscript"))
        );
        assert_eq!(
            evaluate("(1)._2"),
            Err(EvalError::DisallowedNode("attribute"))
        );
    }

    #[test]
    fn test_call_check_runs_before_kind_check() {
        // `_1(2)` holds both a name and a call; the call walk fires first
        assert_eq!(evaluate("(1)._2(3)"), Err(EvalError::DisallowedCall));
    }

    #[test]
    fn test_oversized_input_rejected() {
        let long = "1+".repeat(4096) + "1";
        assert!(matches!(evaluate(&long), Err(EvalError::TooLong(_))));
    }

    #[test]
    fn test_malformed_syntax_rejected() {
        assert!(matches!(evaluate("2++"), Err(EvalError::Syntax(_))));
        assert!(matches!(evaluate("1 2"), Err(EvalError::Syntax(_))));
        assert!(matches!(evaluate("$1"), Err(EvalError::Syntax(_))));
    }

    #[test]
    fn test_unary_chain() {
        assert_eq!(evaluate("--2"), Ok(Value::Int(2)));
        assert_eq!(evaluate("+-2"), Ok(Value::Int(-2)));
    }
}
