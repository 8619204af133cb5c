use std::path::PathBuf;
use crate::isr::Opcode;
use super::TraceConfigBuilderError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("operand size {0} overflows the request buffer, expect at most {1}")]
    OperandSizeOverflow(u32, u32),

    #[error("row count must be positive")]
    ZeroRowCount,

    #[error("row count {0} exceed row address range")]
    RowCountOverflow(u32),

    #[error("burst count must be positive")]
    ZeroBurstCount,

    #[error("bank order is empty")]
    EmptyBankOrder,

    #[error("bank {0} out of range, expect less than {1}")]
    BankOutOfRange(u16, usize),

    #[error("bank {0} appears more than once in bank order")]
    DuplicateBank(u16),

    #[error("channel mask selects no channel")]
    EmptyChannelMask,

    #[error("channel count {0} out of range, expect 1..={1}")]
    ChannelCountOutOfRange(usize, usize),

    #[error("opcode {0} can not be used as data instruction")]
    NonDataOpcode(Opcode),

    #[error("burst group loop order needs a positive operand size")]
    ZeroOperandSizeInBurstGroup,

    #[error("burst count {0} is not a multiple of operand size {1}")]
    UnalignedBurstGroup(u32, u32),

    #[error("invalid output path '{0}'")]
    InvalidOutputPath(PathBuf),

    #[error("trace has more data lines than a u64 can count")]
    TraceTooLarge,

    #[error(transparent)]
    Builder(#[from] TraceConfigBuilderError),
}
