//! ui::launcher
//!
//! Starting the menu program and opening selected changesets.
//!
//! When run outside the menu, the binary starts the launcher in script mode
//! with itself as the mode script:
//!
//! ```text
//! rofi -show fb -modes "fb: /path/to/gitforge-rofi" -width 70 -theme Arc-Dark -i
//! ```

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;

use crate::core::config::Config;

/// Name of the script mode registered with the launcher.
pub const MODE_NAME: &str = "fb";

/// Errors from launching external programs.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' exited with {status}")]
    Status { program: String, status: ExitStatus },

    #[error("failed to open '{url}'")]
    Open {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// Build the launcher command with `exe` as the mode script.
pub fn menu_command(config: &Config, exe: &Path) -> Command {
    let mut command = Command::new(config.menu_program());
    command
        .arg("-show")
        .arg(MODE_NAME)
        .arg("-modes")
        .arg(format!("{}: {}", MODE_NAME, exe.display()))
        .arg("-width")
        .arg(config.menu_width().to_string())
        .arg("-theme")
        .arg(config.menu_theme())
        .arg("-i");
    command
}

/// Run the launcher and wait for it to exit.
pub fn run_menu(config: &Config, exe: &Path) -> Result<(), LaunchError> {
    let program = config.menu_program();
    let status = menu_command(config, exe)
        .status()
        .map_err(|source| LaunchError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !status.success() {
        return Err(LaunchError::Status { program, status });
    }
    Ok(())
}

/// Open `url` with the desktop's default handler.
pub fn open_url(url: &str) -> Result<(), LaunchError> {
    open::that(url).map_err(|source| LaunchError::Open {
        url: url.to_string(),
        source,
    })
}
