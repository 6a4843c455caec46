use std::io;

use thiserror::Error;

use crate::memory::SegmentId;

/// A fatal condition that terminates the VM. Every variant corresponds to a
/// row of the fault taxonomy; none are recoverable by the guest program.
#[derive(Error, Debug)]
pub enum VmError {
    #[error("register index {0} out of range 0..7")]
    BadRegister(u32),

    #[error("segment {0} is not mapped")]
    Unmapped(SegmentId),

    #[error("offset {offset} out of bounds for segment {id} (length {len})")]
    OutOfBounds { id: SegmentId, offset: u32, len: usize },

    #[error("cannot unmap segment {0}")]
    FaultyUnmap(SegmentId),

    #[error("division by zero")]
    DivisionByZero,

    #[error("output value {0} exceeds a single byte")]
    IOOutOfRange(u32),

    #[error("program counter {pc} reached end of segment 0 (length {len}) without halting")]
    CounterOutOfBounds { pc: u32, len: usize },

    #[error("opcode {0} does not name an instruction")]
    UnknownOpcode(u32),

    #[error("value {value} does not fit in {width} bits")]
    Overflow { value: i64, width: u32 },

    #[error("program length {0} bytes is not a multiple of 4")]
    TruncatedProgram(usize),

    #[error("failed to read program file: {0}")]
    Io(#[from] io::Error),
}
