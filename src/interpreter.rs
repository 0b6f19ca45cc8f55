use std::collections::HashMap;

use crate::{
    ast::{ArithOp, CmpOp, Expr, LogicOp, Stmt},
    command::{Command, CommandSink},
    error::RuntimeError,
};

pub type EvaluationResult<T> = Result<T, RuntimeError>;

fn truth(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

// Any nonzero value is true, NaN included
fn is_true(value: f64) -> bool {
    value != 0.0
}

/// Variable bindings of a running program.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, f64>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> EvaluationResult<f64> {
        self.bindings.get(name)
            .copied()
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_owned() })
    }

    /// Creates the binding or overwrites its value.
    pub fn put(&mut self, name: &str, value: f64) {
        match self.bindings.get_mut(name) {
            Some(slot) => *slot = value,
            None => { self.bindings.insert(name.to_owned(), value); }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

/// Evaluates `expr` strictly: every operand is evaluated, even when the
/// result of an OR or AND is already known.
pub fn evaluate(expr: &Expr, environment: &Environment) -> EvaluationResult<f64> {
    Ok(match expr {
        Expr::Var(name) => environment.get(name)?,
        Expr::Const(value) => *value,
        Expr::Neg(operand) => -evaluate(operand, environment)?,
        Expr::Not(operand) => truth(!is_true(evaluate(operand, environment)?)),
        Expr::Arith(op, lhs, rhs) => {
            let (lhs, rhs) = (evaluate(lhs, environment)?, evaluate(rhs, environment)?);
            match op {
                ArithOp::Add => lhs + rhs,
                ArithOp::Sub => lhs - rhs,
                ArithOp::Mul => lhs * rhs,
                ArithOp::Div => lhs / rhs,
            }
        },
        Expr::Logic(op, lhs, rhs) => {
            let (lhs, rhs) = (is_true(evaluate(lhs, environment)?), is_true(evaluate(rhs, environment)?));
            truth(match op {
                LogicOp::Or => lhs || rhs,
                LogicOp::And => lhs && rhs,
            })
        },
        Expr::Cmp(op, lhs, rhs) => {
            let (lhs, rhs) = (evaluate(lhs, environment)?, evaluate(rhs, environment)?);
            truth(match op {
                CmpOp::Ne => lhs != rhs,
                CmpOp::Lt => lhs < rhs,
                CmpOp::Le => lhs <= rhs,
                CmpOp::Gt => lhs > rhs,
                CmpOp::Ge => lhs >= rhs,
                CmpOp::Eq => lhs == rhs,
            })
        },
    })
}

/// Executes statements against an environment, sending turtle commands
/// to a sink. Every statement and every loop test costs one step.
pub struct Executor<'a, S: CommandSink> {
    environment: &'a mut Environment,
    sink: &'a mut S,
    max_steps: Option<u64>,
    steps: u64,
}

impl<'a, S: CommandSink> Executor<'a, S> {
    pub fn new(environment: &'a mut Environment, sink: &'a mut S) -> Self {
        Self { environment, sink, max_steps: None, steps: 0 }
    }

    pub fn with_max_steps(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn step(&mut self) -> EvaluationResult<()> {
        self.steps += 1;
        match self.max_steps {
            Some(limit) if self.steps > limit => Err(RuntimeError::StepLimitExceeded { limit }),
            _ => Ok(()),
        }
    }

    fn condition(&mut self, condition: &Expr) -> EvaluationResult<bool> {
        Ok(is_true(evaluate(condition, self.environment)?))
    }

    // LEFT and RIGHT differ only in the sign handed to this
    fn rotate(&mut self, angle: f64) -> EvaluationResult<()> {
        self.sink.emit(Command::Rotate(angle))
    }

    pub fn execute_all(&mut self, statements: &[Stmt]) -> EvaluationResult<()> {
        statements.iter().try_for_each(|stmt| self.execute(stmt))
    }

    pub fn execute(&mut self, stmt: &Stmt) -> EvaluationResult<()> {
        self.step()?;
        match stmt {
            Stmt::Assign { name, value } => {
                let value = evaluate(value, self.environment)?;
                self.environment.put(name, value);
                Ok(())
            },
            Stmt::While { condition, body } => {
                while self.condition(condition)? {
                    self.execute_all(body)?;
                    self.step()?;
                }
                Ok(())
            },
            Stmt::If { condition, body, alternative } => {
                if self.condition(condition)? {
                    self.execute_all(body)
                } else if let Some(alternative) = alternative {
                    self.execute(alternative)
                } else {
                    Ok(())
                }
            },
            Stmt::Block(body) => self.execute_all(body),
            Stmt::Home => self.sink.emit(Command::Home),
            Stmt::PenUp => self.sink.emit(Command::PenUp),
            Stmt::PenDown => self.sink.emit(Command::PenDown),
            Stmt::PushState => self.sink.emit(Command::PushState),
            Stmt::PopState => self.sink.emit(Command::PopState),
            Stmt::Forward(distance) => {
                let distance = evaluate(distance, self.environment)?;
                self.sink.emit(Command::Move(distance))
            },
            Stmt::Left(angle) => {
                let angle = evaluate(angle, self.environment)?;
                self.rotate(angle)
            },
            Stmt::Right(angle) => {
                let angle = evaluate(angle, self.environment)?;
                self.rotate(-angle)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_str;

    use super::*;

    fn eval_str(source: &str) -> f64 {
        let program = parse_str(&format!("result = {}", source)).unwrap();
        let mut environment = Environment::new();
        let mut sink: Vec<Command> = vec![];
        Executor::new(&mut environment, &mut sink).execute_all(&program.statements).unwrap();
        environment.get("result").unwrap()
    }

    fn eval_condition(source: &str, environment: &Environment) -> EvaluationResult<f64> {
        let program = parse_str(&format!("IF {} THEN HOME FI", source)).unwrap();
        match &program.statements[0] {
            Stmt::If { condition, .. } => evaluate(condition, environment),
            other => panic!("Expected an IF statement, got {:?}", other),
        }
    }

    fn run(source: &str, environment: &mut Environment) -> (Vec<Command>, EvaluationResult<()>) {
        let program = parse_str(source).unwrap();
        let mut sink: Vec<Command> = vec![];
        let result = Executor::new(environment, &mut sink).execute_all(&program.statements);
        (sink, result)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval_str("2+3*4"), 14.0);
        assert_eq!(eval_str("(2+3)*4"), 20.0);
        assert_eq!(eval_str("10-3-2"), 5.0);
        assert_eq!(eval_str("--5"), 5.0);
        assert_eq!(eval_str("-+5"), -5.0);
        assert_eq!(eval_str("7/2"), 3.5);
    }

    #[test]
    fn division_by_zero_follows_ieee() {
        assert_eq!(eval_str("1/0"), f64::INFINITY);
        assert_eq!(eval_str("-1/0"), f64::NEG_INFINITY);
        assert!(eval_str("0/0").is_nan());
    }

    #[test]
    fn comparisons_yield_zero_or_one() {
        let environment = Environment::new();
        assert_eq!(eval_condition("3<5", &environment).unwrap(), 1.0);
        assert_eq!(eval_condition("5<3", &environment).unwrap(), 0.0);
        assert_eq!(eval_condition("5<=5", &environment).unwrap(), 1.0);
        assert_eq!(eval_condition("5>=6", &environment).unwrap(), 0.0);
        assert_eq!(eval_condition("4==4", &environment).unwrap(), 1.0);
        assert_eq!(eval_condition("4!=4", &environment).unwrap(), 0.0);
    }

    #[test]
    fn nan_compares_false_except_not_equal() {
        let mut environment = Environment::new();
        environment.put("nan", f64::NAN);
        assert_eq!(eval_condition("nan == nan", &environment).unwrap(), 0.0);
        assert_eq!(eval_condition("nan < 1", &environment).unwrap(), 0.0);
        assert_eq!(eval_condition("nan >= 1", &environment).unwrap(), 0.0);
        assert_eq!(eval_condition("nan != nan", &environment).unwrap(), 1.0);
        // but NaN itself is a true condition
        assert_eq!(eval_condition("nan AND 1", &environment).unwrap(), 1.0);
    }

    #[test]
    fn logic_coerces_to_zero_or_one() {
        let environment = Environment::new();
        assert_eq!(eval_condition("3 AND 4", &environment).unwrap(), 1.0);
        assert_eq!(eval_condition("3 AND 0", &environment).unwrap(), 0.0);
        assert_eq!(eval_condition("0 OR -2", &environment).unwrap(), 1.0);
        assert_eq!(eval_condition("0 OR 0", &environment).unwrap(), 0.0);
    }

    #[test]
    fn not_inverts_truth() {
        let environment = Environment::new();
        assert_eq!(eval_condition("NOT 3<5", &environment).unwrap(), 0.0);
        assert_eq!(eval_condition("NOT 5<3", &environment).unwrap(), 1.0);
        assert_eq!(eval_condition("NOT NOT 7", &environment).unwrap(), 1.0);
    }

    #[test]
    fn logic_does_not_short_circuit() {
        let environment = Environment::new();
        let error = eval_condition("1 OR missing", &environment).unwrap_err();
        assert!(matches!(error, RuntimeError::UndefinedVariable { name } if name == "missing"));

        let error = eval_condition("0 AND missing", &environment).unwrap_err();
        assert!(matches!(error, RuntimeError::UndefinedVariable { .. }));
    }

    #[test]
    fn left_and_right_have_opposite_signs() {
        let (commands, result) = run("LEFT 30 RIGHT 30 RIGHT -15", &mut Environment::new());
        result.unwrap();
        assert_eq!(commands, vec![Command::Rotate(30.0), Command::Rotate(-30.0), Command::Rotate(15.0)]);
    }

    #[test]
    fn while_loop_assigns_without_drawing() {
        let mut environment = Environment::new();
        environment.put("x", 0.0);
        let (commands, result) = run("WHILE x<5 DO x=x+1 OD", &mut environment);
        result.unwrap();
        assert!(commands.is_empty());
        assert_eq!(environment.get("x").unwrap(), 5.0);
    }

    #[test]
    fn if_takes_the_first_true_branch() {
        let source = "IF x<1 THEN FORWARD 1 ELSIF x<2 THEN FORWARD 2 ELSIF x<3 THEN FORWARD 3 ELSE FORWARD 4 FI";
        for (x, expected) in [(0.0, 1.0), (1.0, 2.0), (2.5, 3.0), (9.0, 4.0)] {
            let mut environment = Environment::new();
            environment.put("x", x);
            let (commands, result) = run(source, &mut environment);
            result.unwrap();
            assert_eq!(commands, vec![Command::Move(expected)]);
        }

        let (commands, result) = run("IF 0 THEN FORWARD 10 FI", &mut Environment::new());
        result.unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn undefined_variable_stops_execution() {
        let (commands, result) = run("FORWARD 1 FORWARD y FORWARD 2", &mut Environment::new());
        assert_eq!(commands, vec![Command::Move(1.0)]);
        assert!(matches!(result, Err(RuntimeError::UndefinedVariable { name }) if name == "y"));
    }

    #[test]
    fn assignment_overwrites() {
        let mut environment = Environment::new();
        let (_, result) = run("a = 1 a = a + 1 b = a * 10", &mut environment);
        result.unwrap();
        assert_eq!(environment.get("a").unwrap(), 2.0);
        assert_eq!(environment.get("b").unwrap(), 20.0);
        assert_eq!(environment.iter().count(), 2);
    }

    #[test]
    fn step_limit_bounds_endless_loops() {
        let program = parse_str("WHILE 1 DO FORWARD 1 OD").unwrap();
        let mut environment = Environment::new();
        let mut sink: Vec<Command> = vec![];
        let mut executor = Executor::new(&mut environment, &mut sink).with_max_steps(Some(10));

        let error = executor.execute_all(&program.statements).unwrap_err();
        assert!(matches!(error, RuntimeError::StepLimitExceeded { limit: 10 }));
        assert_eq!(executor.steps(), 11);
        // 1 for the loop, then 2 per iteration
        assert_eq!(sink.len(), 5);
    }
}
