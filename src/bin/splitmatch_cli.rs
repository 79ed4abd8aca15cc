use std::process::ExitCode;

fn main() -> ExitCode {
    ExitCode::from(splitmatch::cli::run() as u8)
}
