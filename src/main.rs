use clap::Parser;
use git_sweep::cli::{execute_command, Cli};
use git_sweep::utils::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = execute_command(cli) {
        eprintln!("git-sweep: {}", e);
        std::process::exit(1);
    }
}
