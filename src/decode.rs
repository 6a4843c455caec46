//! Splits a 32-bit code word into an opcode and its operand fields.

use crate::error::VmError;
use crate::word;

const OP_WIDTH: u32 = 4;
const OP_LSB: u32 = 28;

const REG_WIDTH: u32 = 3;
const A_LSB: u32 = 6;
const B_LSB: u32 = 3;
const C_LSB: u32 = 0;

const LV_A_LSB: u32 = 25;
const LV_WIDTH: u32 = 25;
const LV_LSB: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    CMov,
    SLoad,
    SStore,
    Add,
    Mul,
    Div,
    Nand,
    Halt,
    Map,
    Unmap,
    Out,
    In,
    LoadP,
    LoadValue,
}

impl Opcode {
    fn from_u32(raw: u32) -> Result<Self, VmError> {
        Ok(match raw {
            0 => Opcode::CMov,
            1 => Opcode::SLoad,
            2 => Opcode::SStore,
            3 => Opcode::Add,
            4 => Opcode::Mul,
            5 => Opcode::Div,
            6 => Opcode::Nand,
            7 => Opcode::Halt,
            8 => Opcode::Map,
            9 => Opcode::Unmap,
            10 => Opcode::Out,
            11 => Opcode::In,
            12 => Opcode::LoadP,
            13 => Opcode::LoadValue,
            other => return Err(VmError::UnknownOpcode(other)),
        })
    }
}

/// Decoded operands, shaped by the instruction's operand format rather than
/// carried as a single struct with always-present fields.
#[derive(Debug, Clone, Copy)]
pub enum Instruction {
    Standard { op: Opcode, a: u32, b: u32, c: u32 },
    LoadValue { a: u32, value: u32 },
}

impl Instruction {
    pub fn decode(code: u32) -> Result<Self, VmError> {
        let raw_op = word::get_unsigned(code as u64, OP_WIDTH, OP_LSB) as u32;
        let op = Opcode::from_u32(raw_op)?;
        Ok(match op {
            Opcode::LoadValue => {
                let a =
                    word::get_unsigned(code as u64, REG_WIDTH, LV_A_LSB) as u32;
                let value =
                    word::get_unsigned(code as u64, LV_WIDTH, LV_LSB) as u32;
                Instruction::LoadValue { a, value }
            }
            _ => {
                let a = word::get_unsigned(code as u64, REG_WIDTH, A_LSB) as u32;
                let b = word::get_unsigned(code as u64, REG_WIDTH, B_LSB) as u32;
                let c = word::get_unsigned(code as u64, REG_WIDTH, C_LSB) as u32;
                Instruction::Standard { op, a, b, c }
            }
        })
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Standard { op, .. } => *op,
            Instruction::LoadValue { .. } => Opcode::LoadValue,
        }
    }
}
