// src/command/response.rs

use arrayvec::ArrayString;
use core::fmt::{self, Write};

/// Room for the longest single-line reply.
pub const REPLY_CAPACITY: usize = 64;

pub type ReplyText = ArrayString<REPLY_CAPACITY>;

/// Everything the interpreter can answer with. Each variant maps to exactly one
/// CRLF-terminated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResponse {
    Ok,
    UnknownCommand,
    NumericFormatInvalid,
    IndexOutOfRange,
    IndexMissing,
    /// Static multi-line help page.
    HelpText(&'static str),
    /// The operator asked for a halt; the caller decides what halting means.
    Halted,
    /// Formatted reply of a recognised command.
    Handled(ReplyText),
}

impl CommandResponse {
    pub const OK_TEXT: &'static str = "Ok\r\n";
    pub const UNKNOWN_COMMAND_TEXT: &'static str = "Unknown command !\r\n";
    pub const NUMERIC_FORMAT_TEXT: &'static str = "Unsigned int format expected.\r\n";
    pub const INDEX_RANGE_TEXT: &'static str = "Index range Exceeded.\r\n";
    pub const INDEX_MISSING_TEXT: &'static str = "Index Expected.\r\n";
    pub const HALTED_TEXT: &'static str = "System Halted !\r\n";

    /// Builds a [`CommandResponse::Handled`] from format arguments.
    pub fn handled(args: fmt::Arguments<'_>) -> Self {
        let mut text = ReplyText::new();
        if text.write_fmt(args).is_err() {
            log::warn!("reply truncated at {} bytes", REPLY_CAPACITY);
        }
        CommandResponse::Handled(text)
    }

    pub fn as_str(&self) -> &str {
        match self {
            CommandResponse::Ok => Self::OK_TEXT,
            CommandResponse::UnknownCommand => Self::UNKNOWN_COMMAND_TEXT,
            CommandResponse::NumericFormatInvalid => Self::NUMERIC_FORMAT_TEXT,
            CommandResponse::IndexOutOfRange => Self::INDEX_RANGE_TEXT,
            CommandResponse::IndexMissing => Self::INDEX_MISSING_TEXT,
            CommandResponse::HelpText(text) => text,
            CommandResponse::Halted => Self::HALTED_TEXT,
            CommandResponse::Handled(text) => text.as_str(),
        }
    }

    #[inline]
    pub fn is_halt(&self) -> bool {
        matches!(self, CommandResponse::Halted)
    }

    /// True for the generic error replies.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            CommandResponse::UnknownCommand
                | CommandResponse::NumericFormatInvalid
                | CommandResponse::IndexOutOfRange
                | CommandResponse::IndexMissing
        )
    }
}

impl fmt::Display for CommandResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
