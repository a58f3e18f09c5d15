//! leveler - Group dependent tasks into parallel execution levels

use std::process::ExitCode;

fn main() -> ExitCode {
    leveler::cli::run()
}
