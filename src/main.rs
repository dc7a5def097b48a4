//! gitforge-rofi binary entry point.

use std::process::ExitCode;

use gitforge::ui::output;

fn main() -> ExitCode {
    match gitforge::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
