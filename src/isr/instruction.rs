use std::fmt::Display;
use super::{ChannelMask, Opcode, TRACE_TYPE};

/// One single-bank AiM host request
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct DataInstruction {
    pub opcode: Opcode,
    pub operand_size: u32,
    pub channel_mask: ChannelMask,
    pub bank: u16,
    pub row: u32,
}

/// One line of a trace.
///
/// ```text
/// AiM WR_SBK 0 0xffffffff 4 0
/// AiM EOC
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Data(DataInstruction),
    Eoc,
}

impl Instruction {
    pub fn data(opcode: Opcode, operand_size: u32, channel_mask: ChannelMask, bank: u16, row: u32) -> Self {
        Self::Data(DataInstruction::new(opcode, operand_size, channel_mask, bank, row))
    }

    #[inline]
    pub fn is_eoc(&self) -> bool {
        matches!(self, Self::Eoc)
    }
}

impl From<DataInstruction> for Instruction {
    fn from(data: DataInstruction) -> Self {
        Self::Data(data)
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data(data) => write!(
                f,
                "{} {} {} {} {} {}",
                TRACE_TYPE,
                data.opcode,
                data.operand_size,
                data.channel_mask,
                data.bank,
                data.row,
            ),
            Self::Eoc => write!(f, "{} {}", TRACE_TYPE, Opcode::Eoc),
        }
    }
}
