use core::mem;

use crate::{
    ast::{ArithOp, CmpOp, Expr, LogicOp, Program, Stmt},
    error::{Expected, SyntaxError},
    scanner::{Attribute, Lexeme, Scanner, Token, TokenSource},
};

pub type ParseResult<O> = Result<O, SyntaxError>;

/// Bound on nested blocks, parentheses and unary operators, and on the
/// height of any expression tree.
pub const MAX_NESTING: usize = 256;

/// Predictive parser with a single token of lookahead.
pub struct Parser<S> {
    source: S,
    lookahead: Lexeme,
    // Open blocks, parentheses and unary operators around the lookahead
    depth: usize,
    // Height of the expression returned last
    height: usize,
}

/// Parses a whole program out of `source`, up to and including the end of input.
pub fn parse<S: TokenSource>(source: S) -> ParseResult<Program> {
    Parser::new(source)?.program()
}

pub fn parse_str(input: &str) -> ParseResult<Program> {
    parse(Scanner::new(input))
}

impl<S: TokenSource> Parser<S> {
    pub fn new(mut source: S) -> ParseResult<Self> {
        let lookahead = source.next_token()?;
        Ok(Self { source, lookahead, depth: 0, height: 0 })
    }

    fn peek(&self) -> Token {
        self.lookahead.token
    }

    fn error(&self, expected: Expected) -> SyntaxError {
        SyntaxError::new(self.lookahead.line, self.lookahead.describe(), expected)
    }

    // Consumes the lookahead, which must be `expected`, and returns it
    fn expect(&mut self, expected: Token) -> ParseResult<Lexeme> {
        if self.peek() != expected {
            return Err(self.error(Expected::Token(expected)));
        }
        let next = self.source.next_token()?;
        Ok(mem::replace(&mut self.lookahead, next))
    }

    fn nested<O>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<O>) -> ParseResult<O> {
        if self.depth == MAX_NESTING {
            return Err(self.error(Expected::Nesting(MAX_NESTING)));
        }
        self.depth += 1;
        let result = parse(self)?;
        self.depth -= 1;
        Ok(result)
    }

    // Records the height of a node whose tallest operand is `below` high
    fn grow(&mut self, below: usize) -> ParseResult<()> {
        if below >= MAX_NESTING {
            return Err(self.error(Expected::Nesting(MAX_NESTING)));
        }
        self.height = below + 1;
        Ok(())
    }

    fn identifier(&mut self) -> ParseResult<String> {
        match self.expect(Token::Ident)?.attribute {
            Some(Attribute::Identifier(name)) => Ok(name),
            _ => Err(self.error(Expected::Token(Token::Ident))),
        }
    }

    fn number(&mut self) -> ParseResult<f64> {
        match self.expect(Token::Number)?.attribute {
            Some(Attribute::Number(value)) => Ok(value),
            _ => Err(self.error(Expected::Token(Token::Number))),
        }
    }

    pub fn program(mut self) -> ParseResult<Program> {
        let mut statements = vec![];
        while self.peek() != Token::Eot {
            statements.push(self.stmt()?);
        }
        self.expect(Token::Eot)?;
        Ok(Program::new(statements))
    }

    fn stmt(&mut self) -> ParseResult<Stmt> {
        match self.peek() {
            Token::Ident => self.assign(),
            Token::If => self.if_stmt(),
            Token::While => self.while_stmt(),
            _ => self.action(),
        }
    }

    fn assign(&mut self) -> ParseResult<Stmt> {
        let name = self.identifier()?;
        self.expect(Token::Assign)?;
        let value = self.expr()?;
        Ok(Stmt::Assign { name, value })
    }

    // One or more statements, ended by whichever keyword closes the construct.
    // Stopping at end of input leaves the caller to report the missing keyword.
    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = vec![self.stmt()?];
        while !matches!(self.peek(), Token::Fi | Token::Od | Token::Else | Token::Elsif | Token::Eot) {
            statements.push(self.stmt()?);
        }
        Ok(statements)
    }

    fn while_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(Token::While)?;
        let condition = self.bool_()?;
        self.expect(Token::Do)?;
        let body = self.nested(Self::block)?;
        self.expect(Token::Od)?;
        Ok(Stmt::While { condition, body })
    }

    fn if_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(Token::If)?;
        self.conditional()
    }

    // Shared tail of IF and ELSIF: `bool_ THEN block else_part`
    fn conditional(&mut self) -> ParseResult<Stmt> {
        let condition = self.bool_()?;
        self.expect(Token::Then)?;
        let body = self.nested(Self::block)?;
        let alternative = self.else_part()?.map(Box::new);
        Ok(Stmt::If { condition, body, alternative })
    }

    fn else_part(&mut self) -> ParseResult<Option<Stmt>> {
        match self.peek() {
            Token::Elsif => {
                self.expect(Token::Elsif)?;
                Ok(Some(self.nested(Self::conditional)?))
            },
            Token::Else => {
                self.expect(Token::Else)?;
                let body = self.nested(Self::block)?;
                self.expect(Token::Fi)?;
                Ok(Some(Stmt::Block(body)))
            },
            Token::Fi => {
                self.expect(Token::Fi)?;
                Ok(None)
            },
            _ => Err(self.error(Expected::ElsePart)),
        }
    }

    fn action(&mut self) -> ParseResult<Stmt> {
        let stmt = match self.peek() {
            Token::Home => Stmt::Home,
            Token::PenUp => Stmt::PenUp,
            Token::PenDown => Stmt::PenDown,
            Token::PushState => Stmt::PushState,
            Token::PopState => Stmt::PopState,
            Token::Forward => {
                self.expect(Token::Forward)?;
                return Ok(Stmt::Forward(self.expr()?));
            },
            Token::Left => {
                self.expect(Token::Left)?;
                return Ok(Stmt::Left(self.expr()?));
            },
            Token::Right => {
                self.expect(Token::Right)?;
                return Ok(Stmt::Right(self.expr()?));
            },
            _ => return Err(self.error(Expected::Action)),
        };
        self.expect(self.peek())?;
        Ok(stmt)
    }

    fn expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;
        loop {
            let op = match self.peek() {
                Token::Plus => ArithOp::Add,
                Token::Minus => ArithOp::Sub,
                _ => return Ok(expr),
            };
            self.expect(self.peek())?;
            let below = self.height;
            let rhs = self.term()?;
            self.grow(below.max(self.height))?;
            expr = Expr::arith(op, expr, rhs);
        }
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;
        loop {
            let op = match self.peek() {
                Token::Mult => ArithOp::Mul,
                Token::Div => ArithOp::Div,
                _ => return Ok(expr),
            };
            self.expect(self.peek())?;
            let below = self.height;
            let rhs = self.factor()?;
            self.grow(below.max(self.height))?;
            expr = Expr::arith(op, expr, rhs);
        }
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Token::Plus => {
                self.expect(Token::Plus)?;
                self.nested(Self::factor)
            },
            Token::Minus => {
                self.expect(Token::Minus)?;
                let operand = self.nested(Self::factor)?;
                self.grow(self.height)?;
                Ok(Expr::neg(operand))
            },
            Token::LeftParen => {
                self.expect(Token::LeftParen)?;
                let expr = self.nested(Self::expr)?;
                self.expect(Token::RightParen)?;
                Ok(expr)
            },
            Token::Ident => {
                self.height = 1;
                Ok(Expr::Var(self.identifier()?))
            },
            Token::Number => {
                self.height = 1;
                Ok(Expr::Const(self.number()?))
            },
            _ => Err(self.error(Expected::Factor)),
        }
    }

    fn bool_(&mut self) -> ParseResult<Expr> {
        let mut expr = self.bool_term()?;
        while self.peek() == Token::Or {
            self.expect(Token::Or)?;
            let below = self.height;
            let rhs = self.bool_term()?;
            self.grow(below.max(self.height))?;
            expr = Expr::logic(LogicOp::Or, expr, rhs);
        }
        Ok(expr)
    }

    fn bool_term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.bool_factor()?;
        while self.peek() == Token::And {
            self.expect(Token::And)?;
            let below = self.height;
            let rhs = self.bool_factor()?;
            self.grow(below.max(self.height))?;
            expr = Expr::logic(LogicOp::And, expr, rhs);
        }
        Ok(expr)
    }

    fn bool_factor(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Token::Not => {
                self.expect(Token::Not)?;
                let operand = self.nested(Self::bool_factor)?;
                self.grow(self.height)?;
                Ok(Expr::not(operand))
            },
            Token::LeftParen => {
                self.expect(Token::LeftParen)?;
                let expr = self.nested(Self::bool_)?;
                self.expect(Token::RightParen)?;
                Ok(expr)
            },
            _ => self.cmp(),
        }
    }

    // At most one comparison; without one the arithmetic value is the truth value
    fn cmp(&mut self) -> ParseResult<Expr> {
        let lhs = self.expr()?;
        let op = match self.peek() {
            Token::Ne => CmpOp::Ne,
            Token::Lt => CmpOp::Lt,
            Token::Le => CmpOp::Le,
            Token::Gt => CmpOp::Gt,
            Token::Ge => CmpOp::Ge,
            Token::Eq => CmpOp::Eq,
            _ => return Ok(lhs),
        };
        self.expect(self.peek())?;
        let below = self.height;
        let rhs = self.expr()?;
        self.grow(below.max(self.height))?;
        Ok(Expr::cmp(op, lhs, rhs))
    }
}
