//! Append-only VM script assembler.
//!
//! Every `emit_*` call returns `&mut Self` so calls chain. The first failure
//! is recorded and every later emit becomes a no-op; the error is returned
//! from [`ScriptBuilder::to_bytes`] or [`ScriptBuilder::hash`].

use tracing::trace;

use duet_keys::address::ScriptHash;

use crate::error::ScriptError;
use crate::opcode::{
    self, APPCALL, CALL, JMP, JMPIF, JMPIFNOT, PUSH0, PUSH1, PUSHBYTES75, PUSHDATA1, PUSHDATA2,
    PUSHDATA4, PUSHF, PUSHM1, PUSHT, SYSCALL, TAILCALL,
};

/// Longest syscall name the length byte can describe.
pub const MAX_SYSCALL_NAME: usize = 252;

/// One opcode and its operand bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op {
    pub code: u8,
    pub arg: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    ops: Vec<Op>,
    error: Option<ScriptError>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear both the ops and any recorded error.
    pub fn reset(&mut self) -> &mut Self {
        self.ops.clear();
        self.error = None;
        self
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn error(&self) -> Option<&ScriptError> {
        self.error.as_ref()
    }

    fn fail(&mut self, err: ScriptError) -> &mut Self {
        if self.error.is_none() {
            trace!(at = self.ops.len(), error = %err, "script assembler error");
            self.error = Some(err);
        }
        self
    }

    /// Append a raw opcode with its operand.
    pub fn emit(&mut self, code: u8, arg: &[u8]) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if arg.is_empty() && opcode::takes_operand(code) {
            return self.fail(ScriptError::NullArgument(code));
        }
        trace!(
            at = self.ops.len(),
            op = opcode::name(code).unwrap_or("?"),
            code,
            arg = %hex::encode(arg),
            "emit"
        );
        self.ops.push(Op {
            code,
            arg: arg.to_vec(),
        });
        self
    }

    /// Push an integer using the shortest encoding.
    ///
    /// -1 and 0..=16 have dedicated opcodes; anything else is pushed as the
    /// minimal big-endian bytes of its magnitude, reversed. No sign byte is
    /// added, so 128 is `01 80` and the sign of a negative number is lost.
    pub fn emit_push_integer(&mut self, number: i64) -> &mut Self {
        match number {
            -1 => self.emit(PUSHM1, &[]),
            0 => self.emit(PUSH0, &[]),
            1..=16 => self.emit(PUSH1 + (number as u8 - 1), &[]),
            _ => self.emit_push_bytes(&integer_bytes(number)),
        }
    }

    pub fn emit_push_bool(&mut self, value: bool) -> &mut Self {
        self.emit(if value { PUSHT } else { PUSHF }, &[])
    }

    pub fn emit_push_string(&mut self, value: &str) -> &mut Self {
        self.emit_push_bytes(value.as_bytes())
    }

    /// Push a byte array, choosing inline, 1-, 2- or 4-byte length forms.
    pub fn emit_push_bytes(&mut self, data: &[u8]) -> &mut Self {
        let len = data.len();
        if len == 0 {
            return self.emit(PUSH0, &[]);
        }
        if len <= PUSHBYTES75 as usize {
            return self.emit(len as u8, data);
        }
        let mut arg = Vec::with_capacity(len + 4);
        let code = if len < 0x100 {
            arg.push(len as u8);
            PUSHDATA1
        } else if len < 0x10000 {
            arg.extend_from_slice(&(len as u16).to_le_bytes());
            PUSHDATA2
        } else {
            match u32::try_from(len) {
                Ok(n) => arg.extend_from_slice(&n.to_le_bytes()),
                Err(_) => return self.fail(ScriptError::NullArgument(PUSHDATA4)),
            }
            PUSHDATA4
        };
        arg.extend_from_slice(data);
        self.emit(code, &arg)
    }

    /// Call a deployed contract by its 20-byte script hash.
    pub fn emit_app_call(&mut self, script_hash: &[u8], tail_call: bool) -> &mut Self {
        if script_hash.len() != 20 {
            return self.fail(ScriptError::InvalidScriptHash(script_hash.len()));
        }
        self.emit(if tail_call { TAILCALL } else { APPCALL }, script_hash)
    }

    /// Relative jump or call; `op` must be JMP, JMPIF, JMPIFNOT or CALL.
    pub fn emit_jump(&mut self, op: u8, offset: i16) -> &mut Self {
        if !matches!(op, JMP | JMPIF | JMPIFNOT | CALL) {
            return self.fail(ScriptError::InvalidOpcode(op));
        }
        self.emit(op, &offset.to_le_bytes())
    }

    /// Interop service call by name.
    pub fn emit_syscall(&mut self, api: &str) -> &mut Self {
        if api.is_empty() {
            return self.fail(ScriptError::InvalidSyscall("empty api name".into()));
        }
        if api.len() > MAX_SYSCALL_NAME {
            return self.fail(ScriptError::InvalidSyscall(format!(
                "api name is {} bytes, limit {MAX_SYSCALL_NAME}",
                api.len()
            )));
        }
        let mut arg = Vec::with_capacity(api.len() + 1);
        arg.push(api.len() as u8);
        arg.extend_from_slice(api.as_bytes());
        self.emit(SYSCALL, &arg)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ScriptError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let mut out = Vec::with_capacity(self.ops.iter().map(|op| 1 + op.arg.len()).sum());
        for op in &self.ops {
            out.push(op.code);
            out.extend_from_slice(&op.arg);
        }
        Ok(out)
    }

    /// hash160 of the assembled bytes.
    pub fn hash(&self) -> Result<ScriptHash, ScriptError> {
        self.to_bytes().map(|bytes| ScriptHash::from_script(&bytes))
    }
}

/// Little-endian bytes of `|n|` with high zero bytes dropped.
fn integer_bytes(n: i64) -> Vec<u8> {
    let mut bytes = n.unsigned_abs().to_le_bytes().to_vec();
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::{PACK, PUSH16, RET};

    fn assembled(f: impl FnOnce(&mut ScriptBuilder)) -> Vec<u8> {
        let mut sb = ScriptBuilder::new();
        f(&mut sb);
        sb.to_bytes().unwrap()
    }

    #[test]
    fn small_integers_use_dedicated_opcodes() {
        assert_eq!(assembled(|s| { s.emit_push_integer(-1); }), vec![PUSHM1]);
        assert_eq!(assembled(|s| { s.emit_push_integer(0); }), vec![PUSH0]);
        assert_eq!(assembled(|s| { s.emit_push_integer(1); }), vec![PUSH1]);
        assert_eq!(assembled(|s| { s.emit_push_integer(16); }), vec![PUSH16]);
    }

    #[test]
    fn larger_integers_pushed_as_reversed_magnitude() {
        assert_eq!(assembled(|s| { s.emit_push_integer(17); }), vec![0x01, 0x11]);
        assert_eq!(assembled(|s| { s.emit_push_integer(127); }), vec![0x01, 0x7f]);
        assert_eq!(assembled(|s| { s.emit_push_integer(128); }), vec![0x01, 0x80]);
        assert_eq!(assembled(|s| { s.emit_push_integer(200); }), vec![0x01, 0xc8]);
        assert_eq!(assembled(|s| { s.emit_push_integer(255); }), vec![0x01, 0xff]);
        assert_eq!(assembled(|s| { s.emit_push_integer(32768); }), vec![0x02, 0x00, 0x80]);
        assert_eq!(assembled(|s| { s.emit_push_integer(1000); }), vec![0x02, 0xe8, 0x03]);
        assert_eq!(
            assembled(|s| { s.emit_push_integer(100_000_000); }),
            vec![0x04, 0x00, 0xe1, 0xf5, 0x05]
        );
    }

    #[test]
    fn negative_integers_push_magnitude() {
        assert_eq!(assembled(|s| { s.emit_push_integer(-2); }), vec![0x01, 0x02]);
        assert_eq!(assembled(|s| { s.emit_push_integer(-129); }), vec![0x01, 0x81]);
        assert_eq!(integer_bytes(i64::MIN), vec![0, 0, 0, 0, 0, 0, 0, 0x80]);
    }

    #[test]
    fn push_bytes_length_forms() {
        assert_eq!(assembled(|s| { s.emit_push_bytes(&[]); }), vec![PUSH0]);

        let inline = assembled(|s| { s.emit_push_bytes(&[0xaa; 75]); });
        assert_eq!(inline[0], 75);
        assert_eq!(inline.len(), 76);

        let one = assembled(|s| { s.emit_push_bytes(&[0xaa; 76]); });
        assert_eq!(&one[..2], &[PUSHDATA1, 76]);
        assert_eq!(one.len(), 78);

        let two = assembled(|s| { s.emit_push_bytes(&[0xaa; 0x100]); });
        assert_eq!(&two[..3], &[PUSHDATA2, 0x00, 0x01]);

        let four = assembled(|s| { s.emit_push_bytes(&vec![0xaa; 0x10000]); });
        assert_eq!(&four[..5], &[PUSHDATA4, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(four.len(), 5 + 0x10000);
    }

    #[test]
    fn bools_and_strings() {
        assert_eq!(assembled(|s| { s.emit_push_bool(true).emit_push_bool(false); }), vec![PUSHT, PUSHF]);
        assert_eq!(
            assembled(|s| { s.emit_push_string("transfer"); }),
            [&[8u8][..], b"transfer"].concat()
        );
    }

    #[test]
    fn app_call_requires_twenty_bytes() {
        let hash = [0x11u8; 20];
        let bytes = assembled(|s| { s.emit_app_call(&hash, false); });
        assert_eq!(bytes[0], APPCALL);
        assert_eq!(&bytes[1..], &hash);
        assert_eq!(assembled(|s| { s.emit_app_call(&hash, true); })[0], TAILCALL);

        let mut sb = ScriptBuilder::new();
        sb.emit_app_call(&[0u8; 19], false);
        assert_eq!(sb.to_bytes(), Err(ScriptError::InvalidScriptHash(19)));
    }

    #[test]
    fn first_error_is_sticky() {
        let mut sb = ScriptBuilder::new();
        sb.emit_push_integer(1)
            .emit_app_call(&[0u8; 3], false)
            .emit_jump(RET, 0)
            .emit_push_integer(2);
        assert_eq!(sb.ops().len(), 1);
        assert_eq!(sb.to_bytes(), Err(ScriptError::InvalidScriptHash(3)));
        assert_eq!(sb.hash(), Err(ScriptError::InvalidScriptHash(3)));

        sb.reset().emit_push_integer(2);
        assert_eq!(sb.to_bytes().unwrap(), vec![PUSH1 + 1]);
    }

    #[test]
    fn jumps() {
        assert_eq!(assembled(|s| { s.emit_jump(JMP, -3); }), vec![JMP, 0xfd, 0xff]);
        assert_eq!(assembled(|s| { s.emit_jump(CALL, 0x0102); }), vec![CALL, 0x02, 0x01]);

        let mut sb = ScriptBuilder::new();
        sb.emit_jump(PACK, 1);
        assert_eq!(sb.error(), Some(&ScriptError::InvalidOpcode(PACK)));
    }

    #[test]
    fn syscalls() {
        let bytes = assembled(|s| { s.emit_syscall("Neo.Runtime.Log"); });
        assert_eq!(bytes[0], SYSCALL);
        assert_eq!(bytes[1] as usize, "Neo.Runtime.Log".len());
        assert_eq!(&bytes[2..], b"Neo.Runtime.Log");

        let mut sb = ScriptBuilder::new();
        sb.emit_syscall("");
        assert!(matches!(sb.to_bytes(), Err(ScriptError::InvalidSyscall(_))));

        let mut sb = ScriptBuilder::new();
        sb.emit_syscall(&"a".repeat(253));
        assert!(matches!(sb.to_bytes(), Err(ScriptError::InvalidSyscall(_))));
        sb.reset().emit_syscall(&"a".repeat(252));
        assert_eq!(sb.to_bytes().unwrap().len(), 254);
    }

    #[test]
    fn operand_opcode_without_argument() {
        let mut sb = ScriptBuilder::new();
        sb.emit(APPCALL, &[]);
        assert_eq!(sb.to_bytes(), Err(ScriptError::NullArgument(APPCALL)));
    }

    #[test]
    fn hash_is_hash160() {
        let mut sb = ScriptBuilder::new();
        sb.emit(RET, &[]);
        let bytes = sb.to_bytes().unwrap();
        assert_eq!(sb.hash().unwrap(), ScriptHash::from_script(&bytes));
    }

    // --- proptest ---

    use proptest::prelude::*;

    fn decode_magnitude(bytes: &[u8]) -> u64 {
        let mut buf = [0u8; 8];
        buf[..bytes.len()].copy_from_slice(bytes);
        u64::from_le_bytes(buf)
    }

    proptest! {
        #[test]
        fn integer_bytes_are_minimal_magnitude(n in any::<i64>()) {
            let bytes = integer_bytes(n);
            prop_assert_eq!(decode_magnitude(&bytes), n.unsigned_abs());
            prop_assert_ne!(bytes.last(), Some(&0));
        }
    }
}
