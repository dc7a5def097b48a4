//! ui::menu
//!
//! Rendering for the rofi script-mode line protocol.
//!
//! # Protocol
//!
//! Every line printed on stdout is either an option row or a mode row:
//!
//! ```text
//! \0prompt\x1fGitforge changesets
//! octocat/hello-world#42                   Add feature                                        [feature]\0info\x1fhttps://github.com/octocat/hello-world/pull/42\x1fmeta\x1fgithub
//! refresh
//! ```
//!
//! The `info` field travels back to us in `ROFI_INFO` when the row is
//! selected; `meta` is matched by rofi's filter so the forge name is
//! searchable without being displayed.

use std::io::{self, Write};

use crate::core::types::ChangesetRecord;

/// Row that triggers a refresh when selected.
pub const REFRESH_ACTION: &str = "refresh";

/// Separator between a row and its out-of-band fields.
const ROW_OPTIONS: char = '\0';

/// Separator between out-of-band field names and values.
const UNIT_SEPARATOR: char = '\x1f';

/// Width of the `<repo>#<number>` column.
const KEY_WIDTH: usize = 40;

/// Width of the title column.
const TITLE_WIDTH: usize = 50;

/// Mode row setting the prompt.
pub fn prompt_line(prompt: &str) -> String {
    format!("{ROW_OPTIONS}prompt{UNIT_SEPARATOR}{}", clean(prompt))
}

/// Option row for one changeset.
pub fn entry_line(record: &ChangesetRecord) -> String {
    format!(
        "{:<key_w$} {:<title_w$} [{}]{ROW_OPTIONS}info{UNIT_SEPARATOR}{}{UNIT_SEPARATOR}meta{UNIT_SEPARATOR}{}",
        record.key(),
        clean(&record.title),
        clean(&record.source_branch),
        clean(&record.url),
        clean(&record.forge),
        key_w = KEY_WIDTH,
        title_w = TITLE_WIDTH,
    )
}

/// Write the prompt mode row.
pub fn write_prompt(out: &mut (dyn Write + Send), prompt: &str) -> io::Result<()> {
    writeln!(out, "{}", prompt_line(prompt))
}

/// Write one option row per changeset.
pub fn write_entries(
    out: &mut (dyn Write + Send),
    records: &[ChangesetRecord],
) -> io::Result<()> {
    for record in records {
        writeln!(out, "{}", entry_line(record))?;
    }
    Ok(())
}

/// Write the trailing refresh action row.
pub fn write_refresh(out: &mut (dyn Write + Send)) -> io::Result<()> {
    writeln!(out, "{}", REFRESH_ACTION)
}

/// Strip characters that would break the line protocol.
fn clean(field: &str) -> String {
    field
        .chars()
        .map(|c| match c {
            '\n' | '\r' | ROW_OPTIONS | UNIT_SEPARATOR => ' ',
            _ => c,
        })
        .collect()
}
