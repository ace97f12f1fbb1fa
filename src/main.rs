use arbor::cli::commands::Cli;
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = arbor::tui::run(
        cli.server.as_deref(),
        cli.token.as_deref(),
        cli.outline.as_deref(),
        cli.config.as_deref(),
    ) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
