// src/script/parser.rs
//
// Line-oriented parser for chain scripts.
//
//   line    := identifier "=" expr | "return" expr | expr
//   expr    := operand
//            | operand "add" operand
//            | "dbl" operand
//            | operand "shl" integer
//            | operand "shl" integer "add" operand
//   operand := integer | "[" integer "]" | identifier
//
// "+" is accepted for "add" and "<<" for "shl". Text after "#" is a comment.

use num::{BigUint, ToPrimitive};

use crate::error::{ChainError, Result};

const KEYWORDS: [&str; 4] = ["add", "dbl", "shl", "return"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Integer literal; refers to a position holding that value.
    Constant(BigUint),
    /// Explicit chain position, written [i].
    Index(usize),
    Identifier(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Operand(Operand),
    Add(Operand, Operand),
    Double(Operand),
    Shift(Operand, u32),
    /// (x shl s) add y
    ShiftAdd(Operand, u32, Operand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Assign { name: String, expr: Expr },
    Return(Expr),
}

/// A statement with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub statement: Statement,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Int(BigUint),
    Assign,
    Open,
    Close,
    Add,
    Shl,
}

fn error(line: usize, message: impl Into<String>) -> ChainError {
    ChainError::Parse { line, message: message.into() }
}

fn tokenize(text: &str, line: usize) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        match c {
            '=' => tokens.push(Token::Assign),
            '[' => tokens.push(Token::Open),
            ']' => tokens.push(Token::Close),
            '+' => tokens.push(Token::Add),
            '<' if chars.get(i + 1) == Some(&'<') => {
                tokens.push(Token::Shl);
                i += 1;
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i + 1 < chars.len() && chars[i + 1].is_ascii_digit() {
                    i += 1;
                }
                let digits: String = chars[start..=i].iter().collect();
                let value = BigUint::parse_bytes(digits.as_bytes(), 10)
                    .ok_or_else(|| error(line, format!("invalid integer {}", digits)))?;
                tokens.push(Token::Int(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i + 1 < chars.len() && (chars[i + 1].is_ascii_alphanumeric() || chars[i + 1] == '_') {
                    i += 1;
                }
                let word: String = chars[start..=i].iter().collect();
                match word.as_str() {
                    "add" => tokens.push(Token::Add),
                    "shl" => tokens.push(Token::Shl),
                    _ => tokens.push(Token::Ident(word)),
                }
            }
            c => return Err(error(line, format!("unexpected character {:?}", c))),
        }
        i += 1;
    }
    Ok(tokens)
}

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn operand(&mut self) -> Result<Operand> {
        let line = self.line;
        match self.next() {
            Some(Token::Int(v)) => Ok(Operand::Constant(v)),
            Some(Token::Ident(name)) if !KEYWORDS.contains(&name.as_str()) => {
                Ok(Operand::Identifier(name))
            }
            Some(Token::Open) => {
                let index = match self.next() {
                    Some(Token::Int(v)) => v
                        .to_usize()
                        .ok_or_else(|| error(line, format!("index {} is too large", v)))?,
                    _ => return Err(error(line, "expected index after '['")),
                };
                match self.next() {
                    Some(Token::Close) => Ok(Operand::Index(index)),
                    _ => Err(error(line, "expected ']'")),
                }
            }
            Some(t) => Err(error(line, format!("expected operand, found {:?}", t))),
            None => Err(error(line, "expected operand")),
        }
    }

    fn shift_amount(&mut self) -> Result<u32> {
        let line = self.line;
        match self.next() {
            Some(Token::Int(v)) => v
                .to_u32()
                .ok_or_else(|| error(line, format!("shift {} is too large", v))),
            _ => Err(error(line, "expected shift amount")),
        }
    }

    fn expr(&mut self) -> Result<Expr> {
        if let Some(Token::Ident(word)) = self.peek() {
            if word == "dbl" {
                self.pos += 1;
                return Ok(Expr::Double(self.operand()?));
            }
        }

        let x = self.operand()?;
        match self.peek() {
            None => Ok(Expr::Operand(x)),
            Some(Token::Add) => {
                self.pos += 1;
                Ok(Expr::Add(x, self.operand()?))
            }
            Some(Token::Shl) => {
                self.pos += 1;
                let s = self.shift_amount()?;
                if let Some(Token::Add) = self.peek() {
                    self.pos += 1;
                    return Ok(Expr::ShiftAdd(x, s, self.operand()?));
                }
                Ok(Expr::Shift(x, s))
            }
            Some(t) => Err(error(self.line, format!("unexpected {:?}", t))),
        }
    }

    fn finish(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(t) => Err(error(self.line, format!("trailing {:?}", t))),
        }
    }
}

fn statement(tokens: &[Token], line: usize) -> Result<Statement> {
    let mut cursor = Cursor { tokens, pos: 0, line };

    let statement = match tokens {
        [Token::Ident(word), ..] if word == "return" => {
            cursor.pos = 1;
            Statement::Return(cursor.expr()?)
        }
        [Token::Ident(name), Token::Assign, ..] => {
            if KEYWORDS.contains(&name.as_str()) {
                return Err(error(line, format!("cannot assign to keyword {}", name)));
            }
            cursor.pos = 2;
            Statement::Assign { name: name.clone(), expr: cursor.expr()? }
        }
        _ => Statement::Return(cursor.expr()?),
    };

    cursor.finish()?;
    Ok(statement)
}

/// Parses a script into statements. Blank and comment-only lines are skipped.
pub fn parse(text: &str) -> Result<Script> {
    let mut script = Script::default();
    for (i, raw) in text.lines().enumerate() {
        let number = i + 1;
        let code = match raw.find('#') {
            Some(p) => &raw[..p],
            None => raw,
        };
        let tokens = tokenize(code, number)?;
        if tokens.is_empty() {
            continue;
        }
        script.lines.push(Line { number, statement: statement(&tokens, number)? });
    }
    Ok(script)
}
