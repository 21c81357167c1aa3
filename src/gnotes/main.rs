use colored::Colorize;

mod cli;
mod tui;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        eprintln!("Run 'gnotes help' for usage.");
        std::process::exit(1);
    }
}
