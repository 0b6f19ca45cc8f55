#![no_main]

use core::fmt;

use itertools::Itertools;
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};

#[derive(Arbitrary, Debug)]
enum Variable {
    X, Y, Size, Angle,
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Variable::X => "x",
            Variable::Y => "y",
            Variable::Size => "size",
            Variable::Angle => "angle",
        })
    }
}

#[derive(Arbitrary, Debug)]
enum Arith {
    Var(Variable),
    Number(u16),
    Neg(Box<Arith>),
    Add(Box<Arith>, Box<Arith>),
    Sub(Box<Arith>, Box<Arith>),
    Mul(Box<Arith>, Box<Arith>),
    Div(Box<Arith>, Box<Arith>),
}

impl fmt::Display for Arith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arith::Var(variable) => write!(f, "{}", variable),
            Arith::Number(value) => write!(f, "{}", value),
            Arith::Neg(operand) => write!(f, "-({})", operand),
            Arith::Add(a, b) => write!(f, "({} + {})", a, b),
            Arith::Sub(a, b) => write!(f, "({} - {})", a, b),
            Arith::Mul(a, b) => write!(f, "({} * {})", a, b),
            Arith::Div(a, b) => write!(f, "({} / {})", a, b),
        }
    }
}

#[derive(Arbitrary, Debug)]
enum Condition {
    Less(Arith, Arith),
    Equal(Arith, Arith),
    Truthy(Arith),
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // A leading '(' would open a boolean group, hence the unary '+'
            Condition::Less(a, b) => write!(f, "+{} < {}", a, b),
            Condition::Equal(a, b) => write!(f, "+{} == {}", a, b),
            Condition::Truthy(a) => write!(f, "+{}", a),
            Condition::Not(condition) => write!(f, "NOT ({})", condition),
            Condition::And(a, b) => write!(f, "({}) AND ({})", a, b),
            Condition::Or(a, b) => write!(f, "({}) OR ({})", a, b),
        }
    }
}

#[derive(Arbitrary, Debug)]
enum TurtleStatement {
    Assign(Variable, Arith),
    While(Condition, Vec<TurtleStatement>),
    If(Condition, Vec<TurtleStatement>, Option<Vec<TurtleStatement>>),
    Home, PenUp, PenDown, PushState, PopState,
    Forward(Arith),
    Left(Arith),
    Right(Arith),
}

fn stringify_block(statements: &[TurtleStatement]) -> String {
    // Empty blocks are a syntax error, keep the program well formed
    if statements.is_empty() { return "HOME".to_owned() }
    statements.iter()
        .map(TurtleStatement::to_string)
        .join("\n")
}

impl fmt::Display for TurtleStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurtleStatement::Assign(variable, value) => write!(f, "{} = {}", variable, value),
            TurtleStatement::While(condition, body) => write!(f, "WHILE {} DO\n{}\nOD", condition, stringify_block(body)),
            TurtleStatement::If(condition, body, None) => write!(f, "IF {} THEN\n{}\nFI", condition, stringify_block(body)),
            TurtleStatement::If(condition, body, Some(alternative)) =>
                write!(f, "IF {} THEN\n{}\nELSE\n{}\nFI", condition, stringify_block(body), stringify_block(alternative)),
            TurtleStatement::Home => write!(f, "HOME"),
            TurtleStatement::PenUp => write!(f, "PENUP"),
            TurtleStatement::PenDown => write!(f, "PENDOWN"),
            TurtleStatement::PushState => write!(f, "PUSHSTATE"),
            TurtleStatement::PopState => write!(f, "POPSTATE"),
            TurtleStatement::Forward(distance) => write!(f, "FORWARD {}", distance),
            TurtleStatement::Left(angle) => write!(f, "LEFT {}", angle),
            TurtleStatement::Right(angle) => write!(f, "RIGHT {}", angle),
        }
    }
}

fuzz_target!(|statements: Vec<TurtleStatement>| {
    let source = statements.iter().map(TurtleStatement::to_string).join("\n");
    let program = match turtle::parse_str(&source) {
        Ok(program) => program,
        Err(err) if matches!(err.expected, turtle::Expected::Nesting(_)) => return,
        Err(err) => panic!("Generated program failed to parse: {}\n{}", err, source),
    };

    let mut context = turtle::EvaluationContext::new()
        .with_options(turtle::Options { max_steps: Some(10_000) });
    let _ = context.execute(&program);
});
