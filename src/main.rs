use std::process::ExitCode;

fn main() -> ExitCode {
    cogwright::cli::run()
}
