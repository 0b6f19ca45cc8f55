use std::io::{self, Read, Write};

use anyhow::{bail, Context};
use turtle::{Command, EvaluationContext, Options, ProtocolWriter};

const USAGE: &str = "usage: turtle [--json] [FILE]";

fn options_from_env() -> anyhow::Result<Options> {
    let max_steps = match std::env::var("TURTLE_MAX_STEPS") {
        Ok(value) => Some(value.parse().with_context(|| format!("TURTLE_MAX_STEPS is not a number: {}", value))?),
        Err(_) => None,
    };
    Ok(Options { max_steps })
}

fn read_source(path: Option<&str>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Could not read {}", path)),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        },
    }
}

fn main() -> anyhow::Result<()> {
    let mut json = false;
    let mut path = None;
    for argument in std::env::args().skip(1) {
        match argument.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            },
            _ if path.is_none() => path = Some(argument),
            _ => bail!(USAGE),
        }
    }

    let source = read_source(path.as_deref())?;
    let options = options_from_env()?;

    if json {
        // Commands emitted before a runtime error are still printed
        let mut context = EvaluationContext::new().with_options(options);
        let result = context.evaluate_str(&source);
        let commands: Vec<Command> = context.into_sink();
        if !commands.is_empty() || result.is_ok() {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &commands)?;
            writeln!(stdout)?;
        }
        result?;
    } else {
        let mut context = EvaluationContext::with_sink(ProtocolWriter::new(io::stdout().lock())).with_options(options);
        context.evaluate_str(&source)?;
    }

    Ok(())
}
