use std::process::ExitCode;

use preserve::{app, cli, output as out};

fn main() -> ExitCode {
    let args = cli::parse_partition();
    match app::partition::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::from(1)
        }
    }
}
