use chordmood::{logging, repl};

fn main() -> anyhow::Result<()> {
    logging::init();
    repl::start()
}
