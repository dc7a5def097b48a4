//! cli
//!
//! Command-line interface layer for gitforge-rofi.
//!
//! # Responsibilities
//!
//! - Detect the invocation mode from the menu environment
//! - Resolve paths and load configuration
//! - Delegate to the [`crate::engine`] dispatcher
//!
//! Library errors are `thiserror` enums; here they are collected into
//! `anyhow` so `main` can print the whole chain.

pub mod args;

pub use args::{Cli, Invocation};

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

use crate::core::config::{Config, DEFAULT_MENU_PROMPT};
use crate::core::paths::ForgePaths;
use crate::engine::Dispatcher;
use crate::forge;
use crate::ui::launcher;
use crate::ui::output::{self, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let invocation = Invocation::from_env(&cli);

    let (paths, config) = match load() {
        Ok(loaded) => loaded,
        Err(err) if invocation == Invocation::List => {
            return Err(fallback_menu(DEFAULT_MENU_PROMPT, err));
        }
        Err(err) => return Err(err),
    };
    let verbosity = config.verbosity();
    match config.path() {
        Some(path) => output::debug(format!("config: {}", path.display()), verbosity),
        None => output::debug("config: defaults", verbosity),
    }
    output::debug(format!("invocation: {:?}", invocation), verbosity);

    match invocation {
        Invocation::Launch => {
            let exe = std::env::current_exe().context("failed to locate own executable")?;
            launcher::run_menu(&config, &exe)?;
            Ok(())
        }
        Invocation::Open(url) => {
            output::debug(format!("opening {}", url), verbosity);
            launcher::open_url(&url)?;
            Ok(())
        }
        Invocation::Ignore => Ok(()),
        Invocation::List => {
            let dispatcher = match dispatcher(&config, &paths) {
                Ok(dispatcher) => dispatcher,
                Err(err) => return Err(fallback_menu(&config.menu_prompt(), err)),
            };
            output::debug(
                format!("listing {}", dispatcher.forge_names().join(", ")),
                verbosity,
            );
            write_menu(&dispatcher)
        }
        Invocation::Refresh => {
            let dispatcher = dispatcher(&config, &paths)?;
            block_on(async { Ok(dispatcher.refresh().await?) })
        }
    }
}

fn load() -> Result<(ForgePaths, Config)> {
    let paths = ForgePaths::from_env()?;
    let config = Config::load(&paths)?;
    Ok((paths, config))
}

fn dispatcher(config: &Config, paths: &ForgePaths) -> Result<Dispatcher> {
    let forges = forge::create_forges(config, paths)?;
    Ok(Dispatcher::new(forges, config.menu_prompt()))
}

fn write_menu(dispatcher: &Dispatcher) -> Result<()> {
    block_on(async {
        let mut out = BufWriter::new(std::io::stdout());
        let listed = dispatcher.list(&mut out).await;
        let flushed = out.flush().context("failed to write menu output");
        listed?;
        flushed
    })
}

/// Write a menu with only the prompt and `refresh` rows, then hand back
/// `err`. The `refresh` action stays reachable when setup fails.
fn fallback_menu(prompt: &str, err: anyhow::Error) -> anyhow::Error {
    if let Err(write_err) = write_menu(&Dispatcher::new(Vec::new(), prompt)) {
        output::warn(format!("{:#}", write_err), Verbosity::Normal);
    }
    err
}

fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    rt.block_on(future)
}
