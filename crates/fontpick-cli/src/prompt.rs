//! Interactive prompts
//!
//! Prompts are generic over their input and output streams so tests can
//! drive them with in-memory buffers.

use colored::Colorize;
use fontpick_core::activate::{CursorStep, EntrySource, TreeCursor};
use fontpick_core::selection::{parse_menu_selection, QUIT_TOKEN};
use fontpick_core::{FontpickError, FontpickResult, MenuChoice};
use std::io::{BufRead, Write};
use std::path::PathBuf;

const MENU_COLUMNS: usize = 3;

/// Lay out numbered font names in columns, filled row by row
pub fn render_menu(fonts: &[String]) -> Vec<String> {
    let width = fonts.iter().map(String::len).max().unwrap_or(0);
    let number_width = fonts.len().to_string().len();

    fonts
        .chunks(MENU_COLUMNS)
        .enumerate()
        .map(|(row, chunk)| {
            chunk
                .iter()
                .enumerate()
                .map(|(col, name)| {
                    let n = row * MENU_COLUMNS + col + 1;
                    format!("{n:>number_width$}) {name:<width$}")
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}

fn read_trimmed<R: BufRead>(input: &mut R) -> FontpickResult<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn alert<E: Write>(err: &mut E, message: &str) -> FontpickResult<()> {
    writeln!(err, "{}", message.red())?;
    Ok(())
}

/// Show the menu and read selections until one parses.
///
/// Invalid entries re-prompt; a blank line is `NoSelectionMade`; end of
/// input counts as quitting.
pub fn choose_fonts<R, W, E>(
    fonts: &[String],
    input: &mut R,
    out: &mut W,
    err: &mut E,
) -> FontpickResult<MenuChoice>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    for line in render_menu(fonts) {
        writeln!(out, "{line}")?;
    }

    loop {
        write!(
            out,
            "Select fonts (e.g. 1,3-5) or '{QUIT_TOKEN}' to quit: "
        )?;
        out.flush()?;

        let Some(line) = read_trimmed(input)? else {
            return Ok(MenuChoice::Quit);
        };

        match parse_menu_selection(&line, fonts) {
            Ok(choice) => return Ok(choice),
            Err(FontpickError::InvalidSelectionToken { token, reason }) => {
                log::debug!("Rejected menu input {:?}", line);
                alert(err, &format!("Invalid selection '{token}': {reason}. Try again."))?;
            }
            Err(other) => return Err(other),
        }
    }
}

/// Walk a directory tree until the user picks a file, quits, or input ends
pub fn browse<S, R, W, E>(
    cursor: &mut TreeCursor<'_, S>,
    input: &mut R,
    out: &mut W,
    err: &mut E,
) -> FontpickResult<Option<PathBuf>>
where
    S: EntrySource + ?Sized,
    R: BufRead,
    W: Write,
    E: Write,
{
    loop {
        writeln!(out, "{}", cursor.current_dir().display().to_string().bold())?;
        if cursor.entries().is_empty() {
            writeln!(out, "  (no fonts here)")?;
        }
        for (i, entry) in cursor.entries().iter().enumerate() {
            let name = entry
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            writeln!(out, "{:>3}) {}", i + 1, name)?;
        }

        write!(out, "Pick a number, 'b' to go back or '{QUIT_TOKEN}' to quit: ")?;
        out.flush()?;

        let Some(line) = read_trimmed(input)? else {
            return Ok(None);
        };

        match line.as_str() {
            QUIT_TOKEN => return Ok(None),
            "b" => {
                if !cursor.back()? {
                    alert(err, "Already at the top level.")?;
                }
            }
            raw => match raw.parse::<usize>() {
                Ok(n) if n >= 1 => match cursor.select_entry(n - 1) {
                    Ok(CursorStep::Descended) => {}
                    Ok(CursorStep::Picked(path)) => return Ok(Some(path)),
                    Err(FontpickError::InvalidSelectionToken { token, reason }) => {
                        alert(err, &format!("Invalid selection '{token}': {reason}"))?;
                    }
                    Err(other) => return Err(other),
                },
                _ => alert(err, &format!("Invalid selection '{raw}'"))?,
            },
        }
    }
}
