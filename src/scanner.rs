use core::fmt;

use logos::{Lexer, Logos, Skip};

use crate::error::{Expected, SyntaxError};

fn whitespace(lex: &mut Lexer<Token>) -> Skip {
    lex.extras += lex.slice().chars().filter(|&c| c == '\n').count();
    Skip
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Logos)]
#[logos(extras = usize)]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+(\.[0-9]*)?")]
    #[regex(r"\.[0-9]+")]
    Number,

    #[token("=")]
    Assign,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Mult,

    #[token("/")]
    Div,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("==")]
    Eq,

    #[token("!=")]
    Ne,

    #[token("<")]
    Lt,

    #[token("<=")]
    Le,

    #[token(">")]
    Gt,

    #[token(">=")]
    Ge,

    #[token("OR")]
    Or,

    #[token("AND")]
    And,

    #[token("NOT")]
    Not,

    #[token("IF")]
    If,

    #[token("THEN")]
    Then,

    #[token("ELSIF")]
    Elsif,

    #[token("ELSE")]
    Else,

    #[token("FI")]
    Fi,

    #[token("WHILE")]
    While,

    #[token("DO")]
    Do,

    #[token("OD")]
    Od,

    #[token("HOME")]
    Home,

    #[token("PENUP")]
    PenUp,

    #[token("PENDOWN")]
    PenDown,

    #[token("PUSHSTATE")]
    PushState,

    #[token("POPSTATE")]
    PopState,

    #[token("FORWARD")]
    Forward,

    #[token("LEFT")]
    Left,

    #[token("RIGHT")]
    Right,

    // Only counts lines, never produced
    #[doc(hidden)]
    #[regex(r"[ \t\r\f\n]+", whitespace)]
    Whitespace,

    // End of text, produced by the scanner once the input is exhausted
    Eot,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Self::Ident => "identifier",
            Self::Number => "number",
            Self::Assign => "=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mult => "*",
            Self::Div => "/",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Or => "OR",
            Self::And => "AND",
            Self::Not => "NOT",
            Self::If => "IF",
            Self::Then => "THEN",
            Self::Elsif => "ELSIF",
            Self::Else => "ELSE",
            Self::Fi => "FI",
            Self::While => "WHILE",
            Self::Do => "DO",
            Self::Od => "OD",
            Self::Home => "HOME",
            Self::PenUp => "PENUP",
            Self::PenDown => "PENDOWN",
            Self::PushState => "PUSHSTATE",
            Self::PopState => "POPSTATE",
            Self::Forward => "FORWARD",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Whitespace => "whitespace",
            Self::Eot => "end of input",
        })
    }
}

/// Payload carried next to an identifier or number token.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Identifier(String),
    Number(f64),
}

/// A token together with its attribute and the 1-based line it was read on.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub attribute: Option<Attribute>,
    pub line: usize,
}

impl Lexeme {
    /// Text used to describe this lexeme in error messages.
    pub fn describe(&self) -> String {
        match &self.attribute {
            Some(Attribute::Identifier(name)) => name.clone(),
            Some(Attribute::Number(value)) => value.to_string(),
            None => self.token.to_string(),
        }
    }
}

/// Anything the parser can pull tokens from. Once the input is exhausted
/// the source keeps returning [Token::Eot].
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Lexeme, SyntaxError>;
}

pub struct Scanner<'a> {
    lexer: Lexer<'a, Token>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { lexer: Token::lexer(input) }
    }

    pub fn line(&self) -> usize {
        self.lexer.extras + 1
    }
}

impl<'a> TokenSource for Scanner<'a> {
    fn next_token(&mut self) -> Result<Lexeme, SyntaxError> {
        let token = match self.lexer.next() {
            Some(Ok(token)) => token,
            Some(Err(())) => return Err(SyntaxError::new(self.line(), self.lexer.slice(), Expected::ValidToken)),
            None => Token::Eot,
        };

        let attribute = match token {
            Token::Ident => Some(Attribute::Identifier(self.lexer.slice().to_owned())),
            Token::Number => match self.lexer.slice().parse::<f64>() {
                Ok(value) if value.is_finite() => Some(Attribute::Number(value)),
                _ => return Err(SyntaxError::new(self.line(), self.lexer.slice(), Expected::FiniteNumber)),
            },
            _ => None,
        };

        Ok(Lexeme { token, attribute, line: self.line() })
    }
}
