// src/command/mod.rs

//! Line-oriented command interpreter.
//!
//! A line is `<TOKEN>[<index>]=<payload>`; see [`token`] for the lexical rules
//! and [`dispatcher`] for what each token does.

pub mod dispatcher;
pub mod help;
pub mod response;
pub mod token;

pub use dispatcher::{parse, CommandLetter, Dispatcher, NamedRegister, ParsedCommand, RawMemory, RegisterTable};
pub use help::{help_page, HELP_PAGE_1};
pub use response::{CommandResponse, ReplyText};
pub use token::{tokenize, IndexField, Tokens};
