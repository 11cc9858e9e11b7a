//! Recursive-descent evaluator for canonical arithmetic expressions.
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := number | '(' expr ')'
//! ```
//!
//! There are no identifiers, calls, or assignments, so nothing but
//! arithmetic can ever run. `%` here is the floating-point remainder; percent
//! literals have already been rewritten by the sanitizer.

use super::error::CalcError;

/// Nesting limit for parentheses and unary signs.
const MAX_DEPTH: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Num(n) => format!("number {}", n),
            Self::Plus => "'+'".to_string(),
            Self::Minus => "'-'".to_string(),
            Self::Star => "'*'".to_string(),
            Self::Slash => "'/'".to_string(),
            Self::Percent => "'%'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
        }
    }
}

/// A token together with its character offset in the source.
type Spanned = (usize, Token);

fn tokenize(input: &str) -> Result<Vec<Spanned>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '%' => Some(Token::Percent),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        };
        if let Some(token) = simple {
            tokens.push((i, token));
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }

            let literal: String = chars[start..i].iter().collect();
            if literal == "." {
                return Err(CalcError::syntax(start, "expected digits around '.'"));
            }
            let value: f64 = literal
                .parse()
                .map_err(|_| CalcError::syntax(start, format!("invalid number '{}'", literal)))?;
            tokens.push((start, Token::Num(value)));
            continue;
        }

        return Err(CalcError::syntax(i, format!("unexpected character '{}'", c)));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|&(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |&(at, _)| at)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn enter(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::syntax(self.offset(), "expression nested too deeply"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    value /= self.unary()?;
                }
                Some(Token::Percent) => {
                    self.advance();
                    value %= self.unary()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, CalcError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                self.enter()?;
                let value = self.unary()?;
                self.leave();
                Ok(-value)
            }
            Some(Token::Plus) => {
                self.advance();
                self.enter()?;
                let value = self.unary()?;
                self.leave();
                Ok(value)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        let at = self.offset();
        match self.peek() {
            Some(Token::Num(n)) => {
                self.advance();
                Ok(n)
            }
            Some(Token::LParen) => {
                self.advance();
                self.enter()?;
                let value = self.expr()?;
                self.leave();
                match self.peek() {
                    Some(Token::RParen) => {
                        self.advance();
                        Ok(value)
                    }
                    Some(other) => Err(CalcError::syntax(
                        self.offset(),
                        format!("expected ')' but found {}", other.describe()),
                    )),
                    None => Err(CalcError::syntax(self.offset(), "unclosed '('")),
                }
            }
            Some(other) => Err(CalcError::syntax(
                at,
                format!("expected a number but found {}", other.describe()),
            )),
            None => Err(CalcError::syntax(at, "unexpected end of expression")),
        }
    }
}

/// Evaluate a canonical arithmetic expression.
///
/// The returned value may be non-finite; callers decide how to treat that.
pub(crate) fn eval_canonical(input: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(input)?;
    let end = input.chars().count();
    let mut parser = Parser {
        tokens,
        pos: 0,
        end,
        depth: 0,
    };

    let value = parser.expr()?;

    if let Some(extra) = parser.peek() {
        return Err(CalcError::syntax(
            parser.offset(),
            format!("unexpected {}", extra.describe()),
        ));
    }

    Ok(value)
}
