//! Coloured status lines for stderr and plain rendering for pipes.
//!
//! Each helper takes the writer and whether it supports colour, so callers
//! decide once (via `is-terminal`) and tests can capture plain output.

use std::io::{self, Write};

use owo_colors::{AnsiColors, OwoColorize};

/// The kinds of status line the CLI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warn,
    Error,
}

impl MessageKind {
    fn color(self) -> AnsiColors {
        match self {
            MessageKind::Info => AnsiColors::Cyan,
            MessageKind::Success => AnsiColors::Green,
            MessageKind::Warn => AnsiColors::Yellow,
            MessageKind::Error => AnsiColors::Red,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            MessageKind::Info => "",
            MessageKind::Success => "",
            MessageKind::Warn => "Warning: ",
            MessageKind::Error => "Error: ",
        }
    }
}

pub fn print_message<W: Write>(writer: &mut W, kind: MessageKind, msg: &str, supports_color: bool) -> io::Result<()> {
    let line = format!("{}{}", kind.prefix(), msg);
    if supports_color {
        writeln!(writer, "{}", line.color(kind.color()))
    } else {
        writeln!(writer, "{}", line)
    }
}

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Info, msg, supports_color)
}

pub fn print_success_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Success, msg, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Warn, msg, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Error, msg, supports_color)
}

/// Renders `field: message` pairs, one per line, field names in bold when
/// colour is enabled.
pub fn print_field_errors<'a, W, I>(writer: &mut W, errors: I, supports_color: bool) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    for (field, message) in errors {
        if supports_color {
            writeln!(writer, "  {}: {}", field.bold(), message.color(AnsiColors::Red))?;
        } else {
            writeln!(writer, "  {}: {}", field, message)?;
        }
    }
    Ok(())
}
