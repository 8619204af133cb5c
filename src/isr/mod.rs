mod error;
mod opcode;
mod mask;
mod instruction;
pub use error::*;
pub use opcode::*;
pub use mask::*;
pub use instruction::*;

/// Trace type token leading every AiM host request line
pub const TRACE_TYPE: &str = "AiM";

/// Request buffer capacity of the AiM DRAM controller, in operand units
pub const MAX_OPERAND_SIZE: u32 = 32;

pub const MAX_CHANNEL_COUNT: usize = 32;

pub const MAX_BANK_COUNT: usize = 16;

/// Banks per bank group
pub const BANK_GROUP_SIZE: usize = 4;

/// Bank group a bank id belongs to
#[inline]
pub fn bank_group(bank: u16) -> usize {
    bank as usize / BANK_GROUP_SIZE
}
