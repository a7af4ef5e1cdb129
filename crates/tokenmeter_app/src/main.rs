mod attachment;
mod effects;
mod logging;
mod repl;

fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::File);
    repl::run()
}
