use crate::{
    ast::Program,
    command::{Command, CommandSink},
    error::{RuntimeError, TurtleError},
    interpreter::{Environment, Executor},
    parser::parse_str,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Statements plus loop tests allowed per execution, unbounded when `None`.
    pub max_steps: Option<u64>,
}

/// An evaluation context that parses and runs turtle programs.
///
/// The environment lives as long as the context, so variables assigned by
/// one program are visible to the next one run in the same context. Use one
/// context per independent program.
pub struct EvaluationContext<S: CommandSink = Vec<Command>> {
    environment: Environment,
    sink: S,
    options: Options,
}

impl EvaluationContext<Vec<Command>> {
    pub fn new() -> Self {
        Self::with_sink(Vec::new())
    }
}

impl Default for EvaluationContext<Vec<Command>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CommandSink> EvaluationContext<S> {
    pub fn with_sink(sink: S) -> Self {
        Self { environment: Environment::new(), sink, options: Options::default() }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Parses all of `source` before running any of it, so a syntax error
    /// never produces commands.
    pub fn evaluate_str(&mut self, source: &str) -> Result<(), TurtleError> {
        let program = parse_str(source)?;
        self.execute(&program)?;
        Ok(())
    }

    /// Runs an already parsed program. Commands emitted before a failure
    /// stay in the sink.
    pub fn execute(&mut self, program: &Program) -> Result<(), RuntimeError> {
        Executor::new(&mut self.environment, &mut self.sink)
            .with_max_steps(self.options.max_steps)
            .execute_all(&program.statements)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
