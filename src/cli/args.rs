//! cli::args
//!
//! Command-line arguments and invocation mode detection.
//!
//! # Invocation Modes
//!
//! The menu program runs the binary once per interaction and describes the
//! interaction through environment variables:
//!
//! | `ROFI_RETV` | meaning | action |
//! |---|---|---|
//! | unset | started by the user | start the menu |
//! | `0` | initial call | list changesets |
//! | `1` | row selected | refresh, or open `ROFI_INFO` |
//! | `2` | custom text entered | nothing |
//! | `3` | row deleted | nothing |
//!
//! The selected row's text arrives as the positional argument. On menu
//! re-entry that text is arbitrary, so flags are not interpreted there.

use std::ffi::OsString;

use clap::{CommandFactory, FromArgMatches, Parser};

use crate::ui::menu::REFRESH_ACTION;

/// Environment variable carrying the menu return value.
pub const RETV_ENV: &str = "ROFI_RETV";

/// Environment variable carrying the selected row's `info` field.
pub const INFO_ENV: &str = "ROFI_INFO";

/// gitforge-rofi - open changesets from your forges in a rofi menu
#[derive(Parser, Debug, Default)]
#[command(name = "gitforge-rofi")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Text of the selected menu row (passed by rofi)
    #[arg(allow_hyphen_values = true)]
    pub selection: Option<String>,
}

impl Cli {
    /// Parse command-line arguments.
    ///
    /// Under the menu (`ROFI_RETV` set) the arguments go through
    /// [`Cli::parse_selection`] instead, so row text can never print help or
    /// change the exit status.
    pub fn parse_args() -> Self {
        if std::env::var_os(RETV_ENV).is_some() {
            Self::parse_selection(std::env::args_os())
        } else {
            Parser::parse()
        }
    }

    /// Parse a menu re-entry with `--help` and `--version` disabled.
    ///
    /// Arguments that still fail to parse yield no selection.
    pub fn parse_selection<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Cli::command()
            .disable_help_flag(true)
            .disable_version_flag(true)
            .try_get_matches_from(args)
            .and_then(|matches| Cli::from_arg_matches(&matches))
            .unwrap_or_default()
    }
}

/// What this process was started to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Started outside the menu; start the menu.
    Launch,
    /// Print the menu rows.
    List,
    /// Refresh every forge cache.
    Refresh,
    /// Open a selected changeset.
    Open(String),
    /// Interaction needing no action.
    Ignore,
}

impl Invocation {
    /// Decide the invocation from the menu environment and arguments.
    ///
    /// `retv` and `info` are the raw values of `ROFI_RETV` and `ROFI_INFO`.
    /// An unparseable `retv` is treated like an initial call. A selection
    /// without `info` falls back to the selected text when it is a URL.
    pub fn detect(retv: Option<&str>, info: Option<&str>, selection: Option<&str>) -> Self {
        let Some(retv) = retv else {
            return Invocation::Launch;
        };

        match retv.trim().parse::<u8>() {
            Ok(1) => {
                if selection.map(str::trim) == Some(REFRESH_ACTION) {
                    return Invocation::Refresh;
                }
                let target = info
                    .map(str::trim)
                    .filter(|i| !i.is_empty())
                    .or_else(|| selection.map(str::trim).filter(|s| is_url(s)));
                match target {
                    Some(url) => Invocation::Open(url.to_string()),
                    None => Invocation::Ignore,
                }
            }
            Ok(2) | Ok(3) => Invocation::Ignore,
            _ => Invocation::List,
        }
    }

    /// Decide the invocation from the process environment.
    pub fn from_env(cli: &Cli) -> Self {
        let retv = std::env::var(RETV_ENV).ok();
        let info = std::env::var(INFO_ENV).ok();
        Self::detect(retv.as_deref(), info.as_deref(), cli.selection.as_deref())
    }
}

fn is_url(s: &str) -> bool {
    s.starts_with("https://") || s.starts_with("http://")
}
