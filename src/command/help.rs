// src/command/help.rs

/// Help page 1: overview of the command set.
pub const HELP_PAGE_1: &str = concat!(
    "\r\nHelp page #1 - Command Interpreter Overview: ----------- \r\n\r\n",
    "c[x]    - \"Execute Command #x\"       (may include parameters)\r\n",
    "s[x]    - \"Read a Status Set\"        (no parameters, read only)\r\n",
    "d[x]    - \"Data Set\", R/W            (if W, command followed by = data.)\r\n",
    "m[xxxx] - \"I/O,SFR,Mem.,@[addr],\"R/W (if W, command followed by = uint8_t.)\r\n",
    "h[x]    - \"Display help page\"        (Page# = x)\r\n",
    "\r\n",
    "h       - \"h\" or \"H\" halts (and resets) the system.\r\n",
    "\r\n",
    "Notes:\r\n",
    "\r\n",
    "x \t= uint_8t , index range 0 to 255.\r\n",
    "xxxx\t= uint_32t, address range 0x00000000 to 0xFFFFFFFF\r\n",
    "\r\n",
    "Codes c,s and d are made more specific by adding [x].\r\n",
    "Exactly what they do will be determined by enumeration of [x].\r\n",
    "\r\n",
    "Code m directly reads/writes the address space of the processor,\r\n",
    "(possibly with some restrictions).\r\n",
    "------------------------------------------------------------- \r\n\r\n",
);

/// Text of help page `page`, if it exists.
pub fn help_page(page: u8) -> Option<&'static str> {
    match page {
        1 => Some(HELP_PAGE_1),
        _ => None,
    }
}
