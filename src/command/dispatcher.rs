// src/command/dispatcher.rs

use super::help::help_page;
use super::response::CommandResponse;
use super::token::{tokenize, IndexField, Tokens};
use crate::common::hal_traits::MemoryPeek;
use crate::common::numeric::{format_hex, DataWidth};

/// Recognised command families.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandLetter {
    /// Execute command `[x]`.
    C,
    /// Data set `[x]`.
    D,
    /// Help page `[x]`, or halt when it is the whole line.
    H,
    /// Status set `[x]`.
    S,
    /// Streaming status set `[x]`.
    SS,
    /// Memory word at `[addr]`.
    M,
}

/// A command line that passed validation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ParsedCommand {
    pub letter: CommandLetter,
    /// Always present, and below 256 for every letter except `M`. `None` only for halt.
    pub index: Option<u32>,
    /// Optional value after `=`.
    pub payload: Option<u32>,
}

impl ParsedCommand {
    #[inline]
    pub fn is_halt(&self) -> bool {
        self.letter == CommandLetter::H && self.index.is_none()
    }
}

/// Validates a line. On failure the error is the reply to send.
pub fn parse(line: &[u8]) -> Result<ParsedCommand, CommandResponse> {
    let tokens = tokenize(line);

    let single = tokens.token().len() == 1;
    let letter = match tokens.letter() {
        Some(b'H') if tokens.line_len == 1 => {
            return Ok(ParsedCommand { letter: CommandLetter::H, index: None, payload: None });
        }
        Some(b'C') if single => CommandLetter::C,
        Some(b'D') if single => CommandLetter::D,
        Some(b'H') if single => CommandLetter::H,
        Some(b'S') if single => CommandLetter::S,
        Some(b'S') if tokens.token() == b"SS" => CommandLetter::SS,
        Some(b'M') if single => CommandLetter::M,
        _ => return Err(CommandResponse::UnknownCommand),
    };

    let index = match letter {
        CommandLetter::M => tokens.index.value().ok_or(CommandResponse::IndexMissing)?,
        _ => byte_index(&tokens)?,
    };

    let payload = tokens
        .payload
        .transpose()
        .map_err(|_| CommandResponse::NumericFormatInvalid)?;

    Ok(ParsedCommand { letter, index: Some(index), payload })
}

fn byte_index(tokens: &Tokens) -> Result<u32, CommandResponse> {
    match tokens.index {
        IndexField::Value(v) if v <= u32::from(u8::MAX) => Ok(v),
        IndexField::Value(_) => Err(CommandResponse::IndexOutOfRange),
        IndexField::Absent | IndexField::Malformed => Err(CommandResponse::IndexMissing),
    }
}

/// Executes validated commands and renders their replies.
///
/// `M[addr]` reads go through the supplied [`MemoryPeek`]; the default
/// [`RegisterTable`] refuses every address.
#[derive(Debug, Default)]
pub struct Dispatcher<P: MemoryPeek = RegisterTable<'static>> {
    memory: P,
    handled: u32,
}

impl<P: MemoryPeek> Dispatcher<P> {
    pub fn new(memory: P) -> Self {
        Dispatcher { memory, handled: 0 }
    }

    /// Parses and executes one line.
    pub fn dispatch(&mut self, line: &[u8]) -> CommandResponse {
        self.handled = self.handled.wrapping_add(1);
        let response = match parse(line) {
            Ok(command) => self.execute(&command),
            Err(response) => response,
        };
        log::debug!("command #{}: {} bytes -> {:?}", self.handled, line.len(), response.as_str());
        response
    }

    pub fn execute(&mut self, command: &ParsedCommand) -> CommandResponse {
        // Payloads are accepted but no command consumes one yet.
        let index = match command.index {
            Some(index) => index,
            None => return CommandResponse::Halted,
        };
        match command.letter {
            CommandLetter::C => CommandResponse::handled(format_args!("Command requested: C[{}]\r\n", index)),
            CommandLetter::D => CommandResponse::handled(format_args!("Data set requested: D[{}]\r\n", index)),
            CommandLetter::S => CommandResponse::handled(format_args!("Status requested: S[{}]\r\n", index)),
            CommandLetter::SS => {
                CommandResponse::handled(format_args!("Streaming status requested: SS[{}]\r\n", index))
            }
            CommandLetter::H => match help_page(index as u8) {
                Some(text) => CommandResponse::HelpText(text),
                None => CommandResponse::handled(format_args!(
                    "Help page requested: H[{}] - does not exist !\r\n",
                    index
                )),
            },
            CommandLetter::M => {
                let address = format_hex(index, DataWidth::Bits32);
                match self.memory.peek_u32(index) {
                    Some(value) => CommandResponse::handled(format_args!(
                        "Memory/IO query: M[0x{}] = 0x{}\r\n",
                        address,
                        format_hex(value, DataWidth::Bits32)
                    )),
                    None => {
                        log::info!("memory peek refused at 0x{}", address.as_str());
                        CommandResponse::handled(format_args!("Memory/IO query: M[0x{}] - not readable !\r\n", address))
                    }
                }
            }
        }
    }

    pub fn memory(&mut self) -> &mut P {
        &mut self.memory
    }

    /// Lines dispatched so far.
    pub fn handled(&self) -> u32 {
        self.handled
    }
}

// --- Memory peek providers ---

/// A readable location exposed to `M[addr]`.
#[derive(Debug, Copy, Clone)]
pub struct NamedRegister {
    pub name: &'static str,
    pub address: u32,
    pub read: fn() -> u32,
}

/// Allowlist of readable locations. Anything not listed is refused.
#[derive(Debug, Copy, Clone, Default)]
pub struct RegisterTable<'a> {
    entries: &'a [NamedRegister],
}

impl<'a> RegisterTable<'a> {
    pub const EMPTY: RegisterTable<'static> = RegisterTable { entries: &[] };

    pub const fn new(entries: &'a [NamedRegister]) -> Self {
        RegisterTable { entries }
    }

    pub fn lookup(&self, address: u32) -> Option<&NamedRegister> {
        self.entries.iter().find(|r| r.address == address)
    }
}

impl<'a> MemoryPeek for RegisterTable<'a> {
    fn peek_u32(&mut self, address: u32) -> Option<u32> {
        self.lookup(address).map(|r| (r.read)())
    }
}

/// Unrestricted volatile reads of the processor address space.
#[derive(Debug)]
pub struct RawMemory {
    _private: (),
}

impl RawMemory {
    /// # Safety
    ///
    /// Every word-aligned address an operator may type must be readable without
    /// faulting or side effects on the target. Reading some peripheral registers
    /// clears status flags.
    pub const unsafe fn new() -> Self {
        RawMemory { _private: () }
    }
}

impl MemoryPeek for RawMemory {
    fn peek_u32(&mut self, address: u32) -> Option<u32> {
        if address % 4 != 0 {
            return None;
        }
        // Safety: guaranteed by the contract of `RawMemory::new`.
        Some(unsafe { core::ptr::read_volatile(address as usize as *const u32) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::help::HELP_PAGE_1;

    fn reply(line: &str) -> CommandResponse {
        Dispatcher::<RegisterTable<'static>>::default().dispatch(line.as_bytes())
    }

    #[test]
    fn test_execute_command() {
        assert_eq!(reply("c[3]").as_str(), "Command requested: C[3]\r\n");
        assert_eq!(reply("C[0x10]").as_str(), "Command requested: C[16]\r\n");
        assert_eq!(reply("c[255]").as_str(), "Command requested: C[255]\r\n");
    }

    #[test]
    fn test_index_errors() {
        assert_eq!(reply("c[999]"), CommandResponse::IndexOutOfRange);
        assert_eq!(reply("c[256]"), CommandResponse::IndexOutOfRange);
        assert_eq!(reply("c"), CommandResponse::IndexMissing);
        assert_eq!(reply("d[]"), CommandResponse::IndexMissing);
        assert_eq!(reply("s[abc]"), CommandResponse::IndexMissing);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(reply("zzz"), CommandResponse::UnknownCommand);
        assert_eq!(reply(""), CommandResponse::UnknownCommand);
        assert_eq!(reply("cc[1]"), CommandResponse::UnknownCommand);
        assert_eq!(reply("[1]"), CommandResponse::UnknownCommand);
        assert_eq!(reply("h "), CommandResponse::UnknownCommand);
        assert_eq!(reply("sss[1]"), CommandResponse::UnknownCommand);
    }

    #[test]
    fn test_data_and_status() {
        assert_eq!(reply("d[7]").as_str(), "Data set requested: D[7]\r\n");
        assert_eq!(reply("d[7]=0x20").as_str(), "Data set requested: D[7]\r\n");
        assert_eq!(reply("s[1]").as_str(), "Status requested: S[1]\r\n");
        assert_eq!(reply("ss[7]").as_str(), "Streaming status requested: SS[7]\r\n");
        assert_eq!(reply("SS[300]"), CommandResponse::IndexOutOfRange);
    }

    #[test]
    fn test_bad_payload() {
        assert_eq!(reply("d[7]=oops"), CommandResponse::NumericFormatInvalid);
        // Index problems are reported before payload problems.
        assert_eq!(reply("d[]=oops"), CommandResponse::IndexMissing);
    }

    #[test]
    fn test_help_and_halt() {
        assert_eq!(reply("h[1]"), CommandResponse::HelpText(HELP_PAGE_1));
        assert_eq!(reply("h[2]").as_str(), "Help page requested: H[2] - does not exist !\r\n");
        assert!(reply("h").is_halt());
        assert!(reply("H").is_halt());
        assert_eq!(reply("h").as_str(), "System Halted !\r\n");
        assert_eq!(reply("h[]"), CommandResponse::IndexMissing);
    }

    #[test]
    fn test_parse_structure() {
        let cmd = parse(b"m[0x20000000]=5").unwrap();
        assert_eq!(cmd.letter, CommandLetter::M);
        assert_eq!(cmd.index, Some(0x2000_0000));
        assert_eq!(cmd.payload, Some(5));
        assert!(parse(b"h").unwrap().is_halt());
        assert!(!parse(b"h[1]").unwrap().is_halt());
    }

    fn read_id() -> u32 {
        0x1234_ABCD
    }

    static REGISTERS: [NamedRegister; 1] = [NamedRegister { name: "DEVICE_ID", address: 0xE004_2000, read: read_id }];

    #[test]
    fn test_memory_peek_allowlist() {
        let mut dispatcher = Dispatcher::new(RegisterTable::new(&REGISTERS));
        assert_eq!(
            dispatcher.dispatch(b"m[0xE0042000]").as_str(),
            "Memory/IO query: M[0xE0042000] = 0x1234ABCD\r\n"
        );
        assert_eq!(
            dispatcher.dispatch(b"m[16]").as_str(),
            "Memory/IO query: M[0x00000010] - not readable !\r\n"
        );
        // Full 32-bit range is accepted for M.
        assert_eq!(
            dispatcher.dispatch(b"m[4294967295]").as_str(),
            "Memory/IO query: M[0xFFFFFFFF] - not readable !\r\n"
        );
        assert_eq!(dispatcher.dispatch(b"m"), CommandResponse::IndexMissing);
        assert_eq!(dispatcher.handled(), 4);
        assert_eq!(dispatcher.memory().lookup(0xE004_2000).map(|r| r.name), Some("DEVICE_ID"));
    }

    #[test]
    fn test_raw_memory_rejects_misaligned() {
        let mut raw = unsafe { RawMemory::new() };
        assert_eq!(raw.peek_u32(0x2000_0001), None);
    }
}
