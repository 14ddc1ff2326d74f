//! Tokenizer for the calculator grammar.
//!
//! Produces the token stream the parser consumes. Identifiers are lexed so
//! that inputs like `_1` become a name node the validator can reject by kind
//! instead of an opaque syntax error.

use crate::error::{EvalError, EvalResult};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Float(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(n) => write!(f, "{n}"),
            Token::Float(x) => write!(f, "{x}"),
            Token::Ident(name) => write!(f, "{name}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::StarStar => write!(f, "**"),
            Token::Slash => write!(f, "/"),
            Token::SlashSlash => write!(f, "//"),
            Token::Percent => write!(f, "%"),
            Token::Amp => write!(f, "&"),
            Token::Pipe => write!(f, "|"),
            Token::Caret => write!(f, "^"),
            Token::Shl => write!(f, "<<"),
            Token::Shr => write!(f, ">>"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
        }
    }
}

pub fn tokenize(input: &str) -> EvalResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' => tokens.push(lex_number(&mut chars)?),
            '.' => {
                chars.next();
                // `.5` is a float literal; a lone `.` is the attribute dot
                if chars.peek().is_some_and(|d| d.is_ascii_digit()) {
                    tokens.push(lex_fraction(&mut chars)?);
                } else {
                    tokens.push(Token::Dot);
                }
            }
            c if c == '_' || c.is_alphabetic() => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n == '_' || n.is_alphanumeric() {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::StarStar);
                } else {
                    tokens.push(Token::Star);
                }
            }
            '/' => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    tokens.push(Token::SlashSlash);
                } else {
                    tokens.push(Token::Slash);
                }
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '&' => {
                chars.next();
                tokens.push(Token::Amp);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            '^' => {
                chars.next();
                tokens.push(Token::Caret);
            }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'<') {
                    chars.next();
                    tokens.push(Token::Shl);
                } else {
                    return Err(EvalError::Syntax("unexpected character '<'".to_string()));
                }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'>') {
                    chars.next();
                    tokens.push(Token::Shr);
                } else {
                    return Err(EvalError::Syntax("unexpected character '>'".to_string()));
                }
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            other => {
                return Err(EvalError::Syntax(format!(
                    "unexpected character {other:?}"
                )));
            }
        }
    }

    Ok(tokens)
}

/// Lex a number starting with a digit. Underscore separators are accepted.
fn lex_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> EvalResult<Token> {
    let mut digits = String::new();
    consume_digits(chars, &mut digits);

    if chars.peek() == Some(&'.') {
        chars.next();
        digits.push('.');
        consume_digits(chars, &mut digits);
        parse_float(&digits)
    } else {
        digits
            .parse::<i64>()
            .map(Token::Int)
            .map_err(|_| EvalError::Syntax(format!("integer literal out of range: {digits}")))
    }
}

/// Lex a float that started with a bare `.` (the dot is already consumed).
fn lex_fraction(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> EvalResult<Token> {
    let mut digits = String::from("0.");
    consume_digits(chars, &mut digits);
    parse_float(&digits)
}

fn consume_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            out.push(c);
            chars.next();
        } else if c == '_' {
            // separator only; dropped from the literal
            chars.next();
        } else {
            break;
        }
    }
}

fn parse_float(digits: &str) -> EvalResult<Token> {
    digits
        .parse::<f64>()
        .map(Token::Float)
        .map_err(|_| EvalError::Syntax(format!("invalid number literal: {digits}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_arithmetic() {
        let tokens = tokenize("2+3*4").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Int(2),
                Token::Plus,
                Token::Int(3),
                Token::Star,
                Token::Int(4)
            ]
        );
    }

    #[test]
    fn test_tokenize_compound_operators() {
        let tokens = tokenize("2 ** 3 // 4 << 1 >> 1").unwrap();
        assert!(tokens.contains(&Token::StarStar));
        assert!(tokens.contains(&Token::SlashSlash));
        assert!(tokens.contains(&Token::Shl));
        assert!(tokens.contains(&Token::Shr));
    }

    #[test]
    fn test_tokenize_float_forms() {
        assert_eq!(tokenize("2.5").unwrap(), vec![Token::Float(2.5)]);
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Float(0.5)]);
        assert_eq!(tokenize("5.").unwrap(), vec![Token::Float(5.0)]);
    }

    #[test]
    fn test_tokenize_underscore_separators() {
        assert_eq!(tokenize("1_000").unwrap(), vec![Token::Int(1000)]);
    }

    #[test]
    fn test_tokenize_identifier() {
        assert_eq!(
            tokenize("_1").unwrap(),
            vec![Token::Ident("_1".to_string())]
        );
    }

    #[test]
    fn test_tokenize_rejects_stray_characters() {
        assert!(matches!(tokenize("1 < 2"), Err(EvalError::Syntax(_))));
        assert!(matches!(tokenize("1 = 2"), Err(EvalError::Syntax(_))));
        assert!(matches!(tokenize("\"ls\""), Err(EvalError::Syntax(_))));
    }

    #[test]
    fn test_tokenize_huge_integer_literal() {
        assert!(matches!(
            tokenize("99999999999999999999999999"),
            Err(EvalError::Syntax(_))
        ));
    }
}
