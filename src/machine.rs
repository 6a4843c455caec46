//! Ties the segmented memory, register file, decoder, and executor together
//! into the fetch-decode-execute dispatch loop, and reads a program file
//! into the initial segment 0.

use std::io::{Read, Write};

use log::{debug, trace};

use crate::decode::Instruction;
use crate::error::VmError;
use crate::exec::{self, ControlFlow};
use crate::memory::SegmentStore;
use crate::registers::RegisterFile;

/// Reads `bytes` as a big-endian stream of 32-bit words. A length that is
/// not a multiple of 4 is a malformed program.
pub fn load_program(bytes: &[u8]) -> Result<Vec<u32>, VmError> {
    if bytes.len() % 4 != 0 {
        return Err(VmError::TruncatedProgram(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// The assembled virtual machine: register file, segmented memory, and
/// program counter.
pub struct Machine {
    regs: RegisterFile,
    mem: SegmentStore,
    pc: u32,
}

impl Machine {
    /// Boots a machine with `words` installed as segment 0 and PC at 0.
    pub fn boot(words: Vec<u32>) -> Self {
        debug!("loaded program: {} words", words.len());
        Machine { regs: RegisterFile::new(), mem: SegmentStore::install_program(words), pc: 0 }
    }

    /// Runs the fetch-decode-execute loop to completion: `Ok(())` on HALT,
    /// `Err(fault)` the moment any instruction faults.
    ///
    /// The loop caches a pointer to segment 0's current length so it does
    /// not need to re-derive it on every fetch; the cache is refreshed only
    /// when LOADP replaces segment 0's buffer (i.e. when the jump target
    /// came from a `duplicate_into_zero` call), matching the performance
    /// requirement that segment 0 not be re-fetched on every iteration.
    pub fn run(
        &mut self,
        input: &mut impl Read,
        output: &mut impl Write,
    ) -> Result<(), VmError> {
        let mut program_len = self.mem.program().len();

        loop {
            if self.pc as usize >= program_len {
                return Err(VmError::CounterOutOfBounds {
                    pc: self.pc,
                    len: program_len,
                });
            }

            let word = self.mem.program()[self.pc as usize];
            trace!("pc={} word={word:#010x}", self.pc);
            let instr = Instruction::decode(word)?;

            let reloads_zero = match instr {
                crate::decode::Instruction::Standard {
                    op: crate::decode::Opcode::LoadP,
                    b,
                    ..
                } => self.regs.get(b)? != 0,
                _ => false,
            };

            let signal =
                exec::execute(instr, &mut self.regs, &mut self.mem, input, output)?;

            match signal {
                ControlFlow::Continue => {
                    self.pc += 1;
                }
                ControlFlow::Jump(target) => {
                    self.pc = target;
                    if reloads_zero {
                        program_len = self.mem.program().len();
                    }
                }
                ControlFlow::Halt => return Ok(()),
            }
        }
    }
}
