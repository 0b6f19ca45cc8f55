
mod ast;
mod command;
mod context;
mod error;
mod interpreter;
mod parser;
mod scanner;

#[cfg(test)]
mod test_utils;

pub use ast::{ArithOp, CmpOp, Condition, Expr, LogicOp, Program, Stmt};
pub use command::{Command, CommandSink, ProtocolWriter};
pub use context::{EvaluationContext, Options};
pub use error::{Expected, RuntimeError, SyntaxError, TurtleError};
pub use interpreter::{evaluate, Environment, Executor};
pub use parser::{parse, parse_str, Parser, MAX_NESTING};
pub use scanner::{Attribute, Lexeme, Scanner, Token, TokenSource};
