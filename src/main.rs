use smallsh::Interpreter;

fn main() -> anyhow::Result<()> {
    Interpreter::new().repl()
}
