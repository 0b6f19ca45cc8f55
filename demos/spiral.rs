use turtle::{parse_str, EvaluationContext};

fn main() -> anyhow::Result<()> {
    let source = "
        # square spiral, growing by 5 each side
        length = 5
        PENDOWN
        WHILE length <= 50 DO
            FORWARD length
            RIGHT 90
            length = length + 5
        OD
        PENUP
        HOME
    ";

    let program = parse_str(source)?;
    print!("{}", program);

    let mut context = EvaluationContext::new();
    context.execute(&program)?;
    for command in context.sink() {
        println!("{}", command);
    }

    Ok(())
}
