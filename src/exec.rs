//! One function per opcode. Each validates its operands, applies its effect
//! to the register file / segment store / host I/O, and returns the
//! continuation signal the dispatch loop consumes.

use std::io::{Read, Write};

use log::info;

use crate::decode::{Instruction, Opcode};
use crate::error::VmError;
use crate::memory::SegmentStore;
use crate::registers::RegisterFile;

/// Directive to the dispatch loop after an instruction has executed.
pub enum ControlFlow {
    Continue,
    Jump(u32),
    Halt,
}

/// Executes one decoded instruction. `input`/`output` are the host I/O
/// streams OUT/IN operate against.
pub fn execute(
    instr: Instruction,
    regs: &mut RegisterFile,
    mem: &mut SegmentStore,
    input: &mut impl Read,
    output: &mut impl Write,
) -> Result<ControlFlow, VmError> {
    match instr {
        Instruction::LoadValue { a, value } => {
            regs.set(a, value)?;
            Ok(ControlFlow::Continue)
        }
        Instruction::Standard { op, a, b, c } => match op {
            Opcode::CMov => {
                if regs.get(c)? != 0 {
                    let v = regs.get(b)?;
                    regs.set(a, v)?;
                }
                Ok(ControlFlow::Continue)
            }
            Opcode::SLoad => {
                let seg = regs.get(b)?;
                let offset = regs.get(c)?;
                let v = mem.read(seg, offset)?;
                regs.set(a, v)?;
                Ok(ControlFlow::Continue)
            }
            Opcode::SStore => {
                let seg = regs.get(a)?;
                let offset = regs.get(b)?;
                let v = regs.get(c)?;
                mem.write(seg, offset, v)?;
                Ok(ControlFlow::Continue)
            }
            Opcode::Add => {
                let v = regs.get(b)?.wrapping_add(regs.get(c)?);
                regs.set(a, v)?;
                Ok(ControlFlow::Continue)
            }
            Opcode::Mul => {
                let v = regs.get(b)?.wrapping_mul(regs.get(c)?);
                regs.set(a, v)?;
                Ok(ControlFlow::Continue)
            }
            Opcode::Div => {
                let divisor = regs.get(c)?;
                if divisor == 0 {
                    return Err(VmError::DivisionByZero);
                }
                let v = regs.get(b)? / divisor;
                regs.set(a, v)?;
                Ok(ControlFlow::Continue)
            }
            Opcode::Nand => {
                let v = !(regs.get(b)? & regs.get(c)?);
                regs.set(a, v)?;
                Ok(ControlFlow::Continue)
            }
            Opcode::Halt => {
                info!("halt");
                Ok(ControlFlow::Halt)
            }
            Opcode::Map => {
                let n = regs.get(c)?;
                let id = mem.map(n);
                info!("map {n} words -> segment {id}");
                regs.set(b, id)?;
                Ok(ControlFlow::Continue)
            }
            Opcode::Unmap => {
                let id = regs.get(c)?;
                mem.unmap(id)?;
                info!("unmap segment {id}");
                Ok(ControlFlow::Continue)
            }
            Opcode::Out => {
                let v = regs.get(c)?;
                if v > 0xFF {
                    return Err(VmError::IOOutOfRange(v));
                }
                output
                    .write_all(&[v as u8])
                    .and_then(|_| output.flush())
                    .map_err(VmError::Io)?;
                Ok(ControlFlow::Continue)
            }
            Opcode::In => {
                let mut byte = [0u8; 1];
                let v = match input.read(&mut byte).map_err(VmError::Io)? {
                    1 => byte[0] as u32,
                    _ => 0xFFFF_FFFF,
                };
                regs.set(c, v)?;
                Ok(ControlFlow::Continue)
            }
            Opcode::LoadP => {
                let source = regs.get(b)?;
                let target_pc = regs.get(c)?;
                if source != 0 {
                    mem.duplicate_into_zero(source)?;
                }
                Ok(ControlFlow::Jump(target_pc))
            }
            Opcode::LoadValue => unreachable!("LoadValue decodes as Instruction::LoadValue"),
        },
    }
}
