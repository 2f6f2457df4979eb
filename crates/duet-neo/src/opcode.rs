//! VM opcode bytes used by the assembler and the standard witness scripts.

pub const PUSH0: u8 = 0x00;
pub const PUSHF: u8 = PUSH0;
pub const PUSHBYTES1: u8 = 0x01;
pub const PUSHBYTES33: u8 = 0x21;
pub const PUSHBYTES64: u8 = 0x40;
pub const PUSHBYTES75: u8 = 0x4b;
pub const PUSHDATA1: u8 = 0x4c;
pub const PUSHDATA2: u8 = 0x4d;
pub const PUSHDATA4: u8 = 0x4e;
pub const PUSHM1: u8 = 0x4f;
pub const PUSH1: u8 = 0x51;
pub const PUSHT: u8 = PUSH1;
pub const PUSH16: u8 = 0x60;

pub const NOP: u8 = 0x61;
pub const JMP: u8 = 0x62;
pub const JMPIF: u8 = 0x63;
pub const JMPIFNOT: u8 = 0x64;
pub const CALL: u8 = 0x65;
pub const RET: u8 = 0x66;
pub const APPCALL: u8 = 0x67;
pub const SYSCALL: u8 = 0x68;
pub const TAILCALL: u8 = 0x69;

pub const CHECKSIG: u8 = 0xac;
pub const VERIFY: u8 = 0xad;
pub const CHECKMULTISIG: u8 = 0xae;

pub const PACK: u8 = 0xc1;
pub const UNPACK: u8 = 0xc2;

/// Whether `op` is followed by an operand in the script.
pub fn takes_operand(op: u8) -> bool {
    matches!(
        op,
        PUSHBYTES1..=PUSHDATA4 | JMP..=CALL | APPCALL..=TAILCALL
    )
}

/// Mnemonic for logging; `None` for bytes without a fixed name.
pub fn name(op: u8) -> Option<&'static str> {
    Some(match op {
        PUSH0 => "PUSH0",
        PUSHBYTES1..=PUSHBYTES75 => "PUSHBYTES",
        PUSHDATA1 => "PUSHDATA1",
        PUSHDATA2 => "PUSHDATA2",
        PUSHDATA4 => "PUSHDATA4",
        PUSHM1 => "PUSHM1",
        PUSH1..=PUSH16 => "PUSHN",
        NOP => "NOP",
        JMP => "JMP",
        JMPIF => "JMPIF",
        JMPIFNOT => "JMPIFNOT",
        CALL => "CALL",
        RET => "RET",
        APPCALL => "APPCALL",
        SYSCALL => "SYSCALL",
        TAILCALL => "TAILCALL",
        CHECKSIG => "CHECKSIG",
        VERIFY => "VERIFY",
        CHECKMULTISIG => "CHECKMULTISIG",
        PACK => "PACK",
        UNPACK => "UNPACK",
        _ => return None,
    })
}
