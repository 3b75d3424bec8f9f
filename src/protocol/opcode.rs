//! Opcode definitions
//!
//! Request opcodes and the leading bytes the backend answers with.

/// Request opcodes understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Authenticate = b'R',
    Salt = b'M',
    Info = b'I',
    Health = b'H',
    NodeCount = b'L',
    Watchdog = b'W',
    ProcessInfo = b'P',
    ProcessCount = b'N',
    PoolStatus = b'B',
    TransactionAck = b'T',
}

impl Opcode {
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Opcodes whose success reply echoes the request byte (in either case)
pub const UPPER_ECHO_OPCODES: [Opcode; 10] = [
    Opcode::Authenticate,
    Opcode::Salt,
    Opcode::Info,
    Opcode::Health,
    Opcode::NodeCount,
    Opcode::Watchdog,
    Opcode::ProcessInfo,
    Opcode::ProcessCount,
    Opcode::PoolStatus,
    Opcode::TransactionAck,
];

/// Error response
pub const ERROR_MARKER: u8 = b'E';

/// Notice response
pub const NOTICE_MARKER: u8 = b'N';

/// Command-complete family
pub const COMPLETE_MARKERS: [u8; 4] = [b'c', b'd', b'a', b'z'];

const ECHO_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    let mut i = 0;
    while i < UPPER_ECHO_OPCODES.len() {
        table[UPPER_ECHO_OPCODES[i] as usize] = true;
        i += 1;
    }
    table
};

/// Whether a request with this opcode is acknowledged by an echo
pub fn expects_upper_echo(opcode: u8) -> bool {
    ECHO_TABLE[opcode as usize]
}

pub fn is_error_marker(code: u8) -> bool {
    code == ERROR_MARKER || code == NOTICE_MARKER
}

pub fn is_complete_marker(code: u8) -> bool {
    COMPLETE_MARKERS.contains(&code)
}
