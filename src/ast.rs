use core::fmt;

use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    Or,
    And,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

// Expressions always evaluate to a number, booleans being 0.0 and 1.0
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var(String),
    Const(f64),
    Neg(Box<Expr>),
    Not(Box<Expr>),
    Arith(ArithOp, Box<Expr>, Box<Expr>),
    Logic(LogicOp, Box<Expr>, Box<Expr>),
    Cmp(CmpOp, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign { name: String, value: Expr },
    While { condition: Expr, body: Vec<Stmt> },
    /// `alternative` is either another [Stmt::If] for an ELSIF, or a
    /// [Stmt::Block] for an ELSE.
    If { condition: Expr, body: Vec<Stmt>, alternative: Option<Box<Stmt>> },
    Block(Vec<Stmt>),
    Home,
    PenUp,
    PenDown,
    PushState,
    PopState,
    Forward(Expr),
    Left(Expr),
    Right(Expr),
}

/// The top level statements of a parsed source, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stmt> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Stmt;
    type IntoIter = std::slice::Iter<'a, Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    pub fn neg(operand: Expr) -> Self {
        Self::Neg(Box::new(operand))
    }

    pub fn not(operand: Expr) -> Self {
        Self::Not(Box::new(operand))
    }

    pub fn arith(op: ArithOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Arith(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn logic(op: LogicOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Logic(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn cmp(op: CmpOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Cmp(op, Box::new(lhs), Box::new(rhs))
    }

    // Binding strength used when printing, mirrors the grammar layers
    fn precedence(&self) -> u8 {
        match self {
            Self::Logic(LogicOp::Or, ..) => 1,
            Self::Logic(LogicOp::And, ..) => 2,
            Self::Not(_) => 3,
            Self::Cmp(..) => 4,
            Self::Arith(ArithOp::Add | ArithOp::Sub, ..) => 5,
            Self::Arith(ArithOp::Mul | ArithOp::Div, ..) => 6,
            Self::Neg(_) => 7,
            Self::Var(_) | Self::Const(_) => 8,
        }
    }

    fn is_arithmetic(&self) -> bool {
        matches!(self, Self::Var(_) | Self::Const(_) | Self::Neg(_) | Self::Arith(..))
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8, in_condition: bool) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else if in_condition {
            write!(f, "{}", Condition(self))
        } else {
            write!(f, "{}", self)
        }
    }

    fn fmt_binary(&self, f: &mut fmt::Formatter<'_>, op: &str, lhs: &Expr, rhs: &Expr, in_condition: bool) -> fmt::Result {
        // Left associative, so only the right operand needs the stricter bound
        let precedence = self.precedence();
        lhs.fmt_operand(f, precedence, in_condition)?;
        write!(f, " {} ", op)?;
        rhs.fmt_operand(f, precedence + 1, in_condition && !matches!(self, Self::Cmp(..)))
    }
}

/// Prints an expression where the grammar expects a condition. There a
/// leading '(' always opens a boolean group, so arithmetic that would start
/// with one is written behind a unary '+'.
pub struct Condition<'a>(pub &'a Expr);

impl fmt::Display for Condition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.to_string();
        if self.0.is_arithmetic() && text.starts_with('(') {
            write!(f, "+")?;
        }
        write!(f, "{}", text)
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        })
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Self::Or => "OR",
            Self::And => "AND",
        })
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
        })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(name) => write!(f, "{}", name),
            Self::Const(value) => write!(f, "{}", value),
            Self::Neg(operand) => {
                write!(f, "-")?;
                operand.fmt_operand(f, self.precedence(), false)
            },
            Self::Not(operand) => {
                write!(f, "NOT ")?;
                operand.fmt_operand(f, self.precedence(), true)
            },
            Self::Arith(op, lhs, rhs) => self.fmt_binary(f, &op.to_string(), lhs, rhs, false),
            Self::Logic(op, lhs, rhs) => self.fmt_binary(f, &op.to_string(), lhs, rhs, true),
            Self::Cmp(op, lhs, rhs) => self.fmt_binary(f, &op.to_string(), lhs, rhs, true),
        }
    }
}

const INDENT: &str = "    ";

fn fmt_body(f: &mut fmt::Formatter<'_>, body: &[Stmt], depth: usize) -> fmt::Result {
    for stmt in body {
        stmt.fmt_indented(f, depth)?;
    }
    Ok(())
}

impl Stmt {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = INDENT.repeat(depth);
        match self {
            Self::Assign { name, value } => writeln!(f, "{}{} = {}", indent, name, value),
            Self::While { condition, body } => {
                writeln!(f, "{}WHILE {} DO", indent, Condition(condition))?;
                fmt_body(f, body, depth + 1)?;
                writeln!(f, "{}OD", indent)
            },
            Self::If { condition, body, alternative } => {
                writeln!(f, "{}IF {} THEN", indent, Condition(condition))?;
                fmt_body(f, body, depth + 1)?;
                Self::fmt_alternative(f, alternative.as_deref(), depth)
            },
            Self::Block(body) => fmt_body(f, body, depth),
            Self::Home => writeln!(f, "{}HOME", indent),
            Self::PenUp => writeln!(f, "{}PENUP", indent),
            Self::PenDown => writeln!(f, "{}PENDOWN", indent),
            Self::PushState => writeln!(f, "{}PUSHSTATE", indent),
            Self::PopState => writeln!(f, "{}POPSTATE", indent),
            Self::Forward(distance) => writeln!(f, "{}FORWARD {}", indent, distance),
            Self::Left(angle) => writeln!(f, "{}LEFT {}", indent, angle),
            Self::Right(angle) => writeln!(f, "{}RIGHT {}", indent, angle),
        }
    }

    fn fmt_alternative(f: &mut fmt::Formatter<'_>, alternative: Option<&Stmt>, depth: usize) -> fmt::Result {
        let indent = INDENT.repeat(depth);
        match alternative {
            None => writeln!(f, "{}FI", indent),
            Some(Self::If { condition, body, alternative }) => {
                writeln!(f, "{}ELSIF {} THEN", indent, Condition(condition))?;
                fmt_body(f, body, depth + 1)?;
                Self::fmt_alternative(f, alternative.as_deref(), depth)
            },
            Some(Self::Block(body)) => {
                writeln!(f, "{}ELSE", indent)?;
                fmt_body(f, body, depth + 1)?;
                writeln!(f, "{}FI", indent)
            },
            Some(other) => {
                writeln!(f, "{}ELSE", indent)?;
                other.fmt_indented(f, depth + 1)?;
                writeln!(f, "{}FI", indent)
            },
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.statements.iter().join(""))
    }
}
