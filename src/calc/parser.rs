//! Pratt parser for the calculator grammar.
//!
//! Operator precedence and `**` right-associativity follow the original
//! arithmetic semantics (`-2**2` is `-(2**2)`). Call, attribute, and
//! subscript postfix forms parse so the validator can reject them by kind.

use super::ast::{BinOp, Expr, UnaryOp};
use super::lexer::{self, Token};
use crate::error::{EvalError, EvalResult};

/// Recursion bound for untrusted input.
const MAX_DEPTH: usize = 64;

/// Binding power of unary `+`/`-`: below `**`, above `*`.
const UNARY_BP: u8 = 13;

pub fn parse(input: &str) -> EvalResult<Expr> {
    let tokens = lexer::tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_expr(0)?;
    match parser.peek() {
        None => Ok(expr),
        Some(tok) => Err(EvalError::Syntax(format!("unexpected token '{tok}'"))),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> EvalResult<()> {
        match self.advance() {
            Some(ref tok) if tok == expected => Ok(()),
            Some(tok) => Err(EvalError::Syntax(format!(
                "expected '{expected}', found '{tok}'"
            ))),
            None => Err(EvalError::Syntax(format!(
                "expected '{expected}', found end of input"
            ))),
        }
    }

    fn parse_expr(&mut self, min_bp: u8) -> EvalResult<Expr> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::TooDeep);
        }

        let mut lhs = self.parse_prefix()?;
        lhs = self.parse_postfix(lhs)?;

        while let Some(op) = self.peek().and_then(binary_op) {
            let (lbp, rbp) = binding_power(op);
            if lbp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr(rbp)?;
            lhs = Expr::Binary {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            };
        }

        self.depth -= 1;
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> EvalResult<Expr> {
        match self.advance() {
            Some(Token::Int(n)) => Ok(Expr::Int(n)),
            Some(Token::Float(x)) => Ok(Expr::Float(x)),
            Some(Token::Ident(name)) => Ok(Expr::Name(name)),
            Some(Token::Plus) => self.parse_unary(UnaryOp::Pos),
            Some(Token::Minus) => self.parse_unary(UnaryOp::Neg),
            Some(Token::LParen) => self.parse_group(),
            Some(Token::LBracket) => {
                let items = self.parse_sequence(&Token::RBracket)?;
                Ok(Expr::List(items))
            }
            Some(tok) => Err(EvalError::Syntax(format!("unexpected token '{tok}'"))),
            None => Err(EvalError::Syntax("unexpected end of input".to_string())),
        }
    }

    fn parse_unary(&mut self, op: UnaryOp) -> EvalResult<Expr> {
        let operand = self.parse_expr(UNARY_BP)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// Parenthesized group, or a tuple if a comma appears.
    fn parse_group(&mut self) -> EvalResult<Expr> {
        if self.peek() == Some(&Token::RParen) {
            self.advance();
            return Ok(Expr::Tuple(Vec::new()));
        }
        let first = self.parse_expr(0)?;
        if self.peek() == Some(&Token::Comma) {
            self.advance();
            let mut items = vec![first];
            items.extend(self.parse_sequence(&Token::RParen)?);
            return Ok(Expr::Tuple(items));
        }
        self.expect(&Token::RParen)?;
        Ok(first)
    }

    /// Comma-separated items up to `close`. Trailing commas are accepted.
    fn parse_sequence(&mut self, close: &Token) -> EvalResult<Vec<Expr>> {
        let mut items = Vec::new();
        loop {
            if self.peek() == Some(close) {
                self.advance();
                return Ok(items);
            }
            items.push(self.parse_expr(0)?);
            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                }
                Some(tok) if tok == close => {
                    self.advance();
                    return Ok(items);
                }
                Some(tok) => {
                    return Err(EvalError::Syntax(format!(
                        "expected ',' or '{close}', found '{tok}'"
                    )));
                }
                None => {
                    return Err(EvalError::Syntax(format!(
                        "expected '{close}', found end of input"
                    )));
                }
            }
        }
    }

    /// Call, subscript, and attribute forms bind tightest.
    fn parse_postfix(&mut self, mut expr: Expr) -> EvalResult<Expr> {
        loop {
            match self.peek() {
                Some(Token::LParen) => {
                    self.advance();
                    let args = self.parse_sequence(&Token::RParen)?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                Some(Token::LBracket) => {
                    self.advance();
                    let index = self.parse_expr(0)?;
                    self.expect(&Token::RBracket)?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                Some(Token::Dot) => {
                    self.advance();
                    match self.advance() {
                        Some(Token::Ident(name)) => {
                            expr = Expr::Attribute {
                                object: Box::new(expr),
                                name,
                            };
                        }
                        Some(tok) => {
                            return Err(EvalError::Syntax(format!(
                                "expected attribute name after '.', found '{tok}'"
                            )));
                        }
                        None => {
                            return Err(EvalError::Syntax(
                                "expected attribute name after '.'".to_string(),
                            ));
                        }
                    }
                }
                _ => return Ok(expr),
            }
        }
    }
}

fn binary_op(token: &Token) -> Option<BinOp> {
    match token {
        Token::Plus => Some(BinOp::Add),
        Token::Minus => Some(BinOp::Sub),
        Token::Star => Some(BinOp::Mul),
        Token::Slash => Some(BinOp::Div),
        Token::SlashSlash => Some(BinOp::FloorDiv),
        Token::Percent => Some(BinOp::Mod),
        Token::StarStar => Some(BinOp::Pow),
        Token::Amp => Some(BinOp::BitAnd),
        Token::Pipe => Some(BinOp::BitOr),
        Token::Caret => Some(BinOp::BitXor),
        Token::Shl => Some(BinOp::Shl),
        Token::Shr => Some(BinOp::Shr),
        _ => None,
    }
}

/// Left/right binding powers. `**` is right-associative and binds tighter
/// than unary minus on its left.
fn binding_power(op: BinOp) -> (u8, u8) {
    match op {
        BinOp::BitOr => (1, 2),
        BinOp::BitXor => (3, 4),
        BinOp::BitAnd => (5, 6),
        BinOp::Shl | BinOp::Shr => (7, 8),
        BinOp::Add | BinOp::Sub => (9, 10),
        BinOp::Mul | BinOp::Div | BinOp::FloorDiv | BinOp::Mod => (11, 12),
        BinOp::Pow => (16, 15),
    }
}
