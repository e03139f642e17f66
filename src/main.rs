use clap::Parser;
use tickdigits::cli::{init_logging, run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging();
    run(cli)
}
