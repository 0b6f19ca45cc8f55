use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use turtle::{EvaluationContext, Options, ProtocolWriter};

async fn query(stdout: &mut io::Stdout, lines: &mut io::Lines<io::BufReader<io::Stdin>>) -> io::Result<Option<String>> {
    stdout.write_all("> ".as_bytes()).await?;
    stdout.flush().await?;
    lines.next_line().await
}

// Each line is a complete program; variables carry over from line to line
#[tokio::main]
async fn main() {
    let sink = ProtocolWriter::new(std::io::stdout());
    let mut context = EvaluationContext::with_sink(sink)
        .with_options(Options { max_steps: Some(100_000) });
    let mut lines = io::BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    while let Ok(Some(line)) = query(&mut stdout, &mut lines).await {
        match line.trim() {
            "" => continue,
            ":vars" => {
                for (name, value) in context.environment().iter() {
                    println!("{} = {}", name, value);
                }
            },
            source => {
                if let Err(err) = context.evaluate_str(source) {
                    println!("Error: {}", err);
                }
            },
        }
    }
}
