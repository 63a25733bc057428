use colored::Colorize;
use replace_env::cli;

fn main() {
    if let Err(e) = cli::run(cli::parse()) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
